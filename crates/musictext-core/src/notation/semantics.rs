//! Semantic mapping from syntax nodes to resolved pitches.
//!
//! The parser recognises the shape of a note (letter, accidental marks,
//! octave marks) and hands the raw nodes to a [`Semantics`] adapter, which
//! decides what number they stand for.
//!
//! ## Pitch formula
//!
//! ```text
//! pitch = 60 + octave_offset * 12 + letter_offset + accidental
//! ```
//!
//! `octave_offset` is `+up` when up marks (`'`) are present, otherwise
//! `-down - 1`. A note with no octave marks therefore lands one octave
//! below middle C's octave: `c` is 48, `c'` is 72.

/// Classified accidental marks following a note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccidentalNode {
    /// One or more `#` marks.
    Sharp(usize),
    /// One or more `b` marks.
    Flat(usize),
    /// An explicit `n`, or no accidental at all.
    Natural,
}

/// Raw note syntax as recognised by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteNode {
    /// Note letter as written (`a`-`g`, either case).
    pub letter: char,
    /// Accidental value already mapped by [`Semantics::accidental`].
    pub accidental: i32,
    /// Count of `'` marks, `None` when there are none.
    pub up_octave: Option<usize>,
    /// Count of `,` marks.
    pub down_octave: usize,
}

/// Callbacks the parser invokes while building a score.
pub trait Semantics {
    /// Map an accidental node to a signed semitone offset.
    fn accidental(&mut self, node: &AccidentalNode) -> i32;

    /// Map a note node to its MIDI-style pitch.
    fn note(&mut self, node: &NoteNode) -> i32;
}

/// Default semantics: sharps and flats are counted, pitches follow the
/// formula in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchSemantics;

impl Semantics for PitchSemantics {
    fn accidental(&mut self, node: &AccidentalNode) -> i32 {
        accidental_offset(node)
    }

    fn note(&mut self, node: &NoteNode) -> i32 {
        note_pitch(node)
    }
}

/// `+sharps`, `-flats`, or 0.
pub fn accidental_offset(node: &AccidentalNode) -> i32 {
    match *node {
        AccidentalNode::Sharp(count) => count as i32,
        AccidentalNode::Flat(count) => -(count as i32),
        AccidentalNode::Natural => 0,
    }
}

/// Semitones above C for a natural note letter.
///
/// Returns `None` for anything outside `a`-`g`.
pub fn letter_offset(letter: char) -> Option<i32> {
    match letter.to_ascii_lowercase() {
        'c' => Some(0),
        'd' => Some(2),
        'e' => Some(4),
        'f' => Some(5),
        'g' => Some(7),
        'a' => Some(9),
        'b' => Some(11),
        _ => None,
    }
}

/// Signed octave offset from the octave marks of a note.
pub fn octave_offset(up_octave: Option<usize>, down_octave: usize) -> i32 {
    match up_octave {
        Some(up) => up as i32,
        None => -(down_octave as i32) - 1,
    }
}

/// Resolve a note node to its pitch.
///
/// The parser only builds nodes with valid letters; an invalid letter is
/// treated as C.
pub fn note_pitch(node: &NoteNode) -> i32 {
    let letter = letter_offset(node.letter).unwrap_or(0);
    60 + octave_offset(node.up_octave, node.down_octave) * 12 + letter + node.accidental
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(letter: char, accidental: i32, up: Option<usize>, down: usize) -> NoteNode {
        NoteNode {
            letter,
            accidental,
            up_octave: up,
            down_octave: down,
        }
    }

    #[test]
    fn accidental_counts_marks() {
        let mut sem = PitchSemantics;
        assert_eq!(sem.accidental(&AccidentalNode::Sharp(2)), 2);
        assert_eq!(sem.accidental(&AccidentalNode::Flat(3)), -3);
        assert_eq!(sem.accidental(&AccidentalNode::Natural), 0);
    }

    #[test]
    fn a_sharp_one_octave_up() {
        assert_eq!(note_pitch(&node('a', 1, Some(1), 0)), 82);
    }

    #[test]
    fn bare_c_defaults_one_octave_down() {
        assert_eq!(note_pitch(&node('c', 0, None, 0)), 48);
    }

    #[test]
    fn down_marks_stack_on_default() {
        assert_eq!(note_pitch(&node('c', 0, None, 1)), 36);
        assert_eq!(note_pitch(&node('c', 0, None, 2)), 24);
    }

    #[test]
    fn uppercase_letters_map_like_lowercase() {
        assert_eq!(
            note_pitch(&node('G', 0, Some(1), 0)),
            note_pitch(&node('g', 0, Some(1), 0))
        );
    }

    #[test]
    fn letter_offsets_follow_the_c_scale() {
        let offsets: Vec<i32> = "cdefgab".chars().filter_map(letter_offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(letter_offset('h'), None);
    }

    #[test]
    fn flats_lower_pitch() {
        // b flat, one octave up: 60 + 12 + 11 - 1
        assert_eq!(note_pitch(&node('b', -1, Some(1), 0)), 82);
    }
}

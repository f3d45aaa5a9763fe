//! Recursive descent parser for musictext notation.
//!
//! ```text
//! % a bar of quarter notes, then a pair, a triplet and a chord
//! c d e f
//! (g a) (b c' d')
//! {c' e' g' | c e g}
//! ```
//!
//! ## Grammar
//!
//! ```text
//! score       ::= beat+
//! beat        ::= note | rest | group | harmony
//! note        ::= letter accidental? octave?
//! letter      ::= [a-gA-G]
//! accidental  ::= '#'+ | 'b'+ | 'n'
//! octave      ::= "'"+ | ','+
//! rest        ::= 'r' | 'R'
//! group       ::= '(' beat beat ')' | '(' beat beat beat ')'
//! harmony     ::= '{' melody ( '|' melody )+ '}'
//! melody      ::= beat+
//! ```
//!
//! Beats are separated by whitespace or delimiters; `%` starts a comment
//! that runs to the end of the line. Groups and harmonies nest at most
//! [`MAX_NESTING`] levels deep.

use super::ast::{Beat, Score};
use super::semantics::{AccidentalNode, NoteNode, PitchSemantics, Semantics};

/// Deepest allowed nesting of groups and harmonies.
///
/// Parsing, synthesis and dropping a [`Beat`] all recurse once per level.
pub const MAX_NESTING: usize = 256;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A character that cannot start or continue a beat here.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    /// Input ended where a beat was required.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// `(` without a matching `)`.
    #[error("unclosed group (expected ')')")]
    UnclosedGroup,
    /// `{` without a matching `}`.
    #[error("unclosed harmony (expected '}}')")]
    UnclosedHarmony,
    /// A parenthesised group holds neither two nor three beats.
    #[error("group must hold two or three beats (found {0})")]
    GroupSize(usize),
    /// A harmony with a single voice.
    #[error("harmony requires at least 2 voices (found {0})")]
    TooFewVoices(usize),
    /// Nothing between two `|` separators of a harmony.
    #[error("empty voice in harmony")]
    EmptyVoice,
    /// A note or rest runs straight into another character.
    #[error("expected whitespace after beat, found '{0}'")]
    MissingSeparator(char),
    /// The document has no beats at all.
    #[error("score contains no beats")]
    EmptyScore,
    /// A `(` or `{` opened past [`MAX_NESTING`] levels.
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// A parse error with its position in the input.
///
/// No partial score accompanies a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseFailure {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl ParseFailure {
    fn new(src: &str, offset: usize, kind: ParseErrorKind) -> Self {
        let before = &src[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            kind,
            offset,
            line,
            column,
        }
    }

    /// Human-readable diagnostic, including the position.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// LL(1) parser, single byte lookahead.
///
/// Only ASCII bytes are ever consumed outside comments, so `pos` always sits
/// on a UTF-8 boundary.
struct Parser<'a, S: ?Sized> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
    depth: usize,
    semantics: &'a mut S,
}

impl<'a, S: Semantics + ?Sized> Parser<'a, S> {
    fn new(src: &'a str, semantics: &'a mut S) -> Self {
        Self {
            src,
            input: src.as_bytes(),
            pos: 0,
            depth: 0,
            semantics,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn current_char(&self) -> char {
        self.src[self.pos..].chars().next().unwrap_or('\0')
    }

    fn error_at(&self, offset: usize, kind: ParseErrorKind) -> ParseFailure {
        ParseFailure::new(self.src, offset, kind)
    }

    fn unexpected(&self) -> ParseFailure {
        match self.peek() {
            Some(_) => self.error_at(self.pos, ParseErrorKind::UnexpectedChar(self.current_char())),
            None => self.error_at(self.pos, ParseErrorKind::UnexpectedEnd),
        }
    }

    /// Skip whitespace and `%` comments.
    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.advance();
            } else if b == b'%' {
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Count and consume a run of `mark` bytes.
    fn count_run(&mut self, mark: u8) -> usize {
        let start = self.pos;
        while self.peek() == Some(mark) {
            self.advance();
        }
        self.pos - start
    }

    /// `score ::= beat+`
    fn parse_score(&mut self) -> Result<Score, ParseFailure> {
        let mut beats = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek().is_none() {
                break;
            }
            beats.push(self.parse_beat()?);
        }
        if beats.is_empty() {
            return Err(self.error_at(0, ParseErrorKind::EmptyScore));
        }
        Ok(Score::new(beats))
    }

    /// `beat ::= note | rest | group | harmony`
    fn parse_beat(&mut self) -> Result<Beat, ParseFailure> {
        self.skip_trivia();
        match self.peek() {
            Some(b'(') => self.parse_group(),
            Some(b'{') => self.parse_harmony(),
            Some(b'r' | b'R') => {
                self.advance();
                self.expect_separator()?;
                Ok(Beat::Rest)
            }
            Some(b'a'..=b'g' | b'A'..=b'G') => self.parse_note(),
            _ => Err(self.unexpected()),
        }
    }

    /// `note ::= letter accidental? octave?`
    fn parse_note(&mut self) -> Result<Beat, ParseFailure> {
        let letter = char::from(self.input[self.pos]);
        self.advance();

        let accidental = match self.peek() {
            Some(b'#') => AccidentalNode::Sharp(self.count_run(b'#')),
            Some(b'b') => AccidentalNode::Flat(self.count_run(b'b')),
            Some(b'n') => {
                self.advance();
                AccidentalNode::Natural
            }
            _ => AccidentalNode::Natural,
        };

        let (up_octave, down_octave) = match self.peek() {
            Some(b'\'') => (Some(self.count_run(b'\'')), 0),
            Some(b',') => (None, self.count_run(b',')),
            _ => (None, 0),
        };

        self.expect_separator()?;

        let accidental = self.semantics.accidental(&accidental);
        let pitch = self.semantics.note(&NoteNode {
            letter,
            accidental,
            up_octave,
            down_octave,
        });
        Ok(Beat::Note { pitch })
    }

    /// A leaf must be followed by whitespace, a delimiter, a comment, or the end.
    fn expect_separator(&self) -> Result<(), ParseFailure> {
        match self.peek() {
            None => Ok(()),
            Some(b) if b.is_ascii_whitespace() => Ok(()),
            Some(b'(' | b')' | b'{' | b'}' | b'|' | b'%') => Ok(()),
            Some(_) => Err(self.error_at(
                self.pos,
                ParseErrorKind::MissingSeparator(self.current_char()),
            )),
        }
    }

    /// Consume an opening bracket one level deeper, returning its offset.
    fn open_nested(&mut self) -> Result<usize, ParseFailure> {
        let open_pos = self.pos;
        if self.depth >= MAX_NESTING {
            return Err(self.error_at(open_pos, ParseErrorKind::NestingTooDeep(MAX_NESTING)));
        }
        self.depth += 1;
        self.advance();
        Ok(open_pos)
    }

    /// `group ::= '(' beat beat ')' | '(' beat beat beat ')'`
    fn parse_group(&mut self) -> Result<Beat, ParseFailure> {
        let open_pos = self.open_nested()?;

        let mut beats = Vec::with_capacity(3);
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(b')') => {
                    self.advance();
                    self.depth -= 1;
                    break;
                }
                None => return Err(self.error_at(open_pos, ParseErrorKind::UnclosedGroup)),
                Some(_) => beats.push(self.parse_beat()?),
            }
        }

        let beats = match <[Beat; 2]>::try_from(beats) {
            Ok(pair) => return Ok(Beat::Pair(Box::new(pair))),
            Err(beats) => beats,
        };
        match <[Beat; 3]>::try_from(beats) {
            Ok(triplet) => Ok(Beat::Triplet(Box::new(triplet))),
            Err(beats) => Err(self.error_at(open_pos, ParseErrorKind::GroupSize(beats.len()))),
        }
    }

    /// `harmony ::= '{' melody ( '|' melody )+ '}'`
    fn parse_harmony(&mut self) -> Result<Beat, ParseFailure> {
        let open_pos = self.open_nested()?;

        let mut melodies = Vec::new();
        let mut current = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(b'|' | b'}') => {
                    if current.is_empty() {
                        return Err(self.error_at(self.pos, ParseErrorKind::EmptyVoice));
                    }
                    melodies.push(std::mem::take(&mut current));
                    let closing = self.peek() == Some(b'}');
                    self.advance();
                    if closing {
                        self.depth -= 1;
                        break;
                    }
                }
                None => return Err(self.error_at(open_pos, ParseErrorKind::UnclosedHarmony)),
                Some(_) => current.push(self.parse_beat()?),
            }
        }

        if melodies.len() < 2 {
            return Err(self.error_at(open_pos, ParseErrorKind::TooFewVoices(melodies.len())));
        }
        Ok(Beat::Harmony { melodies })
    }
}

/// Parse notation text into a [`Score`] with the default [`PitchSemantics`].
///
/// # Errors
///
/// Returns [`ParseFailure`] if the text does not follow the grammar.
///
/// # Example
///
/// ```rust
/// use musictext_core::{Beat, parse_score};
///
/// let score = parse_score("a#' (c r)").unwrap();
/// assert_eq!(score.beats()[0], Beat::note(82));
/// ```
pub fn parse_score(text: &str) -> Result<Score, ParseFailure> {
    parse_score_with(text, &mut PitchSemantics)
}

/// Parse notation text, resolving notes through a custom [`Semantics`].
///
/// # Errors
///
/// Returns [`ParseFailure`] if the text does not follow the grammar.
pub fn parse_score_with<S: Semantics + ?Sized>(
    text: &str,
    semantics: &mut S,
) -> Result<Score, ParseFailure> {
    let mut parser = Parser::new(text, semantics);
    let score = parser.parse_score()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(beats = score.len(), "parsed score");

    Ok(score)
}

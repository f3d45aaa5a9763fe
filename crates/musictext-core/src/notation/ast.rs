//! Canonical beat tree produced by the parser.
//!
//! Pitches are already resolved to MIDI-style note numbers, so the
//! synthesis engine never sees letters, accidentals or octave marks.

use crate::settings::SynthSettings;

/// A unit of musical time-content.
///
/// Top-level beats each occupy one tempo beat. Nested beats subdivide the
/// budget of their parent, except [`Beat::Harmony`] whose voices always run
/// at full tempo-beat length.
#[derive(Debug, Clone, PartialEq)]
pub enum Beat {
    /// A pitched note that excites the resonator.
    Note {
        /// MIDI-style note number (60 = middle C). Not range-checked.
        pitch: i32,
    },
    /// Silence: lets whatever resonance is present decay faster.
    Rest,
    /// Two beats sharing the parent budget, each getting `budget / 2`.
    Pair(Box<[Beat; 2]>),
    /// Three beats sharing the parent budget, each getting `budget / 3`.
    Triplet(Box<[Beat; 3]>),
    /// Parallel voices, summed sample-wise.
    Harmony {
        /// One melody per voice; each melody is rendered like a score.
        melodies: Vec<Vec<Beat>>,
    },
}

impl Beat {
    /// Shorthand for [`Beat::Note`].
    pub fn note(pitch: i32) -> Self {
        Beat::Note { pitch }
    }

    /// Build a [`Beat::Pair`].
    pub fn pair(first: Beat, second: Beat) -> Self {
        Beat::Pair(Box::new([first, second]))
    }

    /// Build a [`Beat::Triplet`].
    pub fn triplet(first: Beat, second: Beat, third: Beat) -> Self {
        Beat::Triplet(Box::new([first, second, third]))
    }

    /// Build a [`Beat::Harmony`] from its voices.
    pub fn harmony(melodies: Vec<Vec<Beat>>) -> Self {
        Beat::Harmony { melodies }
    }

    /// Number of samples this beat emits when given `budget` samples.
    ///
    /// `beat_samples` is the length of one tempo beat, used by harmony
    /// voices which ignore the incoming budget.
    pub fn rendered_len(&self, budget: usize, beat_samples: usize) -> usize {
        rendered_len(self, budget, beat_samples)
    }
}

/// Number of samples `beat` emits for a given budget.
///
/// Pairs and triplets truncate: a pair of leaves with budget 5 emits 4.
/// A harmony is as long as its shortest voice.
pub fn rendered_len(beat: &Beat, budget: usize, beat_samples: usize) -> usize {
    match beat {
        Beat::Note { .. } | Beat::Rest => budget,
        Beat::Pair(sub) => sub
            .iter()
            .map(|b| rendered_len(b, budget / 2, beat_samples))
            .sum(),
        Beat::Triplet(sub) => sub
            .iter()
            .map(|b| rendered_len(b, budget / 3, beat_samples))
            .sum(),
        Beat::Harmony { melodies } => melodies
            .iter()
            .map(|m| melody_len(m, beat_samples))
            .min()
            .unwrap_or(0),
    }
}

/// Length of a melody where every beat gets a full tempo beat.
pub(crate) fn melody_len(beats: &[Beat], beat_samples: usize) -> usize {
    beats
        .iter()
        .map(|b| rendered_len(b, beat_samples, beat_samples))
        .sum()
}

/// An ordered sequence of top-level beats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    beats: Vec<Beat>,
}

impl Score {
    /// Create a score from its top-level beats.
    pub fn new(beats: Vec<Beat>) -> Self {
        Self { beats }
    }

    /// Top-level beats in playing order.
    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    /// Number of top-level beats.
    pub fn len(&self) -> usize {
        self.beats.len()
    }

    /// True if the score has no beats.
    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Total number of samples [`synthesize`](crate::synthesize) will emit.
    pub fn rendered_len(&self, settings: &SynthSettings) -> usize {
        melody_len(&self.beats, settings.beat_samples())
    }

    /// Consume the score and return its beats.
    pub fn into_beats(self) -> Vec<Beat> {
        self.beats
    }
}

impl From<Vec<Beat>> for Score {
    fn from(beats: Vec<Beat>) -> Self {
        Self::new(beats)
    }
}

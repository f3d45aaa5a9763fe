//! Beat tree → sample stream.
//!
//! Rendering is a pull-based state machine: instead of recursing through
//! the beat tree, each renderer keeps an explicit stack of frames and emits
//! one sample per [`Iterator::next`] call. Stack depth follows notation
//! nesting; the number of samples does not affect it.
//!
//! ## Budget rules
//!
//! | Beat | Budget given to children | Samples emitted |
//! |------|--------------------------|-----------------|
//! | Note / Rest | n/a | `budget` |
//! | Pair | `budget / 2` each | sum of children |
//! | Triplet | `budget / 3` each | sum of children |
//! | Harmony | one tempo beat per melody beat | shortest voice |
//!
//! Filter state flows from each sub-beat into the next. Every top-level beat
//! and every harmony voice starts from a fresh [`FilterState`].

use core::slice;

use super::loudness::{EqualLoudness, LoudnessModel};
use super::resonator::{Coefficients, FilterState, hz_to_omega, midi_to_freq};
use crate::notation::ast::{Beat, Score, melody_len, rendered_len};
use crate::settings::SynthSettings;

/// Default loudness model shared by [`synthesize`].
static EQUAL_LOUDNESS: EqualLoudness = EqualLoudness;

/// A resonator leaf (note or rest) in progress.
#[derive(Debug)]
struct Leaf {
    coeffs: Coefficients,
    /// Added on top of the recurrence at the second sample (notes only).
    excitation: Option<f64>,
    emitted: usize,
    budget: usize,
}

#[derive(Debug)]
enum Frame<'a, L> {
    Leaf(Leaf),
    /// Pair or triplet: remaining sub-beats, each with the same budget.
    Group {
        beats: slice::Iter<'a, Beat>,
        budget: usize,
    },
    /// Independent voices summed sample-wise until the first one ends.
    Harmony { voices: Vec<Samples<'a, L>> },
}

/// Renders one beat with a given budget and incoming [`FilterState`].
///
/// After the iterator is exhausted, [`BeatRender::state`] holds the state a
/// following sibling beat would start from.
#[derive(Debug)]
pub struct BeatRender<'a, L = EqualLoudness> {
    state: FilterState,
    stack: Vec<Frame<'a, L>>,
    settings: SynthSettings,
    loudness: &'a L,
    remaining: usize,
}

impl<'a, L: LoudnessModel> BeatRender<'a, L> {
    fn new(
        beat: &'a Beat,
        budget: usize,
        state: FilterState,
        settings: SynthSettings,
        loudness: &'a L,
    ) -> Self {
        let mut render = Self {
            state,
            stack: Vec::new(),
            settings,
            loudness,
            remaining: rendered_len(beat, budget, settings.beat_samples()),
        };
        render.enter(beat, budget);
        render
    }

    /// Current filter state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Push the frame that renders `beat` with `budget` samples.
    fn enter(&mut self, beat: &'a Beat, budget: usize) {
        match beat {
            Beat::Note { pitch } => {
                let freq = midi_to_freq(*pitch);
                self.state.omega = hz_to_omega(freq, self.settings.sample_rate);
                self.state.alpha = self.settings.note_decay;
                let coeffs = self.state.coefficients();
                let gain = self
                    .loudness
                    .gain(freq, self.settings.loudness_reference);
                self.stack.push(Frame::Leaf(Leaf {
                    coeffs,
                    excitation: Some(coeffs.a1 * self.settings.amplitude * gain),
                    emitted: 0,
                    budget,
                }));
            }
            Beat::Rest => {
                self.state.alpha = self.settings.rest_decay;
                self.stack.push(Frame::Leaf(Leaf {
                    coeffs: self.state.coefficients(),
                    excitation: None,
                    emitted: 0,
                    budget,
                }));
            }
            Beat::Pair(sub) => self.stack.push(Frame::Group {
                beats: sub.iter(),
                budget: budget / 2,
            }),
            Beat::Triplet(sub) => self.stack.push(Frame::Group {
                beats: sub.iter(),
                budget: budget / 3,
            }),
            Beat::Harmony { melodies } => {
                let voices = melodies
                    .iter()
                    .map(|melody| Samples::new(melody, self.settings, self.loudness))
                    .collect();
                self.stack.push(Frame::Harmony { voices });
            }
        }
    }
}

impl<L: LoudnessModel> Iterator for BeatRender<'_, L> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame {
                Frame::Leaf(leaf) => {
                    if leaf.emitted == leaf.budget {
                        self.stack.pop();
                        continue;
                    }
                    let mut sample = leaf.coeffs.next(&self.state);
                    if leaf.emitted == 1
                        && let Some(excitation) = leaf.excitation
                    {
                        sample += excitation;
                    }
                    leaf.emitted += 1;
                    self.remaining -= 1;
                    return Some(self.state.push(sample));
                }
                Frame::Group { beats, budget } => {
                    let budget = *budget;
                    match beats.next() {
                        Some(beat) => self.enter(beat, budget),
                        None => {
                            self.stack.pop();
                        }
                    }
                }
                Frame::Harmony { voices } => {
                    let mut sum = 0.0;
                    let mut ended = voices.is_empty();
                    for voice in voices.iter_mut() {
                        match voice.next() {
                            Some(sample) => sum += sample,
                            None => {
                                ended = true;
                                break;
                            }
                        }
                    }
                    if ended {
                        self.stack.pop();
                        continue;
                    }
                    self.remaining -= 1;
                    return Some(self.state.push(sum));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<L: LoudnessModel> ExactSizeIterator for BeatRender<'_, L> {}

/// Lazy sample stream for a sequence of tempo beats.
///
/// Produced by [`synthesize`] for a whole score, and used internally for
/// each harmony voice. Each beat gets one tempo beat of budget and a fresh
/// [`FilterState`].
#[derive(Debug)]
pub struct Samples<'a, L = EqualLoudness> {
    beats: slice::Iter<'a, Beat>,
    current: Option<BeatRender<'a, L>>,
    settings: SynthSettings,
    loudness: &'a L,
    remaining: usize,
}

impl<'a, L: LoudnessModel> Samples<'a, L> {
    fn new(beats: &'a [Beat], settings: SynthSettings, loudness: &'a L) -> Self {
        Self {
            beats: beats.iter(),
            current: None,
            settings,
            loudness,
            remaining: melody_len(beats, settings.beat_samples()),
        }
    }

    /// Settings this stream was created with.
    pub fn settings(&self) -> &SynthSettings {
        &self.settings
    }
}

impl<L: LoudnessModel> Iterator for Samples<'_, L> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            if let Some(render) = self.current.as_mut()
                && let Some(sample) = render.next()
            {
                self.remaining -= 1;
                return Some(sample);
            }
            let beat = self.beats.next()?;
            self.current = Some(BeatRender::new(
                beat,
                self.settings.beat_samples(),
                FilterState::new(),
                self.settings,
                self.loudness,
            ));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<L: LoudnessModel> ExactSizeIterator for Samples<'_, L> {}

/// Synthesize a score with the default equal-loudness model.
///
/// Returns a lazy iterator; nothing is computed until samples are pulled,
/// and dropping it early stops synthesis.
///
/// # Example
///
/// ```rust
/// use musictext_core::{SynthSettings, parse_score, synthesize};
///
/// let score = parse_score("c e g").unwrap();
/// let settings = SynthSettings::default();
/// let samples = synthesize(&score, &settings);
/// assert_eq!(samples.len(), 3 * 22050);
/// ```
pub fn synthesize<'a>(score: &'a Score, settings: &SynthSettings) -> Samples<'a, EqualLoudness> {
    synthesize_with(score, settings, &EQUAL_LOUDNESS)
}

/// Synthesize a score with a caller-supplied loudness model.
pub fn synthesize_with<'a, L: LoudnessModel>(
    score: &'a Score,
    settings: &SynthSettings,
    loudness: &'a L,
) -> Samples<'a, L> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        beats = score.len(),
        beat_samples = settings.beat_samples(),
        sample_rate = settings.sample_rate,
        "synthesize"
    );

    Samples::new(score.beats(), *settings, loudness)
}

/// Render a single beat with an explicit budget and incoming state.
///
/// This is the recursive rendering rule exposed directly: pairs split the
/// budget in two, triplets in three, leaves emit exactly `budget` samples.
/// Read [`BeatRender::state`] after exhausting the iterator for the
/// outgoing state.
pub fn render_beat<'a, L: LoudnessModel>(
    beat: &'a Beat,
    budget: usize,
    state: FilterState,
    settings: &SynthSettings,
    loudness: &'a L,
) -> BeatRender<'a, L> {
    BeatRender::new(beat, budget, state, *settings, loudness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::loudness::FlatLoudness;

    const FLAT: FlatLoudness = FlatLoudness(40.0);

    fn settings(sample_rate: u32, tempo_bpm: f64) -> SynthSettings {
        SynthSettings::new(sample_rate, tempo_bpm)
    }

    fn render(beat: &Beat, budget: usize, settings: &SynthSettings) -> Vec<f64> {
        render_beat(beat, budget, FilterState::new(), settings, &FLAT).collect()
    }

    #[test]
    fn note_emits_exactly_budget() {
        let s = settings(44100, 120.0);
        assert_eq!(render(&Beat::note(69), 37, &s).len(), 37);
        assert!(render(&Beat::note(69), 0, &s).is_empty());
    }

    #[test]
    fn fresh_note_starts_at_zero_then_excites() {
        let s = settings(44100, 120.0);
        let out = render(&Beat::note(69), 4, &s);
        assert_eq!(out[0], 0.0);

        let c = Coefficients::new(s.note_decay, hz_to_omega(440.0, 44100));
        let expected = c.a1 * s.amplitude;
        assert!((out[1] - expected).abs() < 1e-15);
        assert!((out[2] - c.b1 * out[1]).abs() < 1e-15);
    }

    #[test]
    fn single_sample_note_has_no_excitation() {
        let s = settings(44100, 120.0);
        assert_eq!(render(&Beat::note(69), 1, &s), vec![0.0]);
    }

    #[test]
    fn rest_from_silence_stays_silent() {
        let s = settings(44100, 120.0);
        assert!(render(&Beat::Rest, 100, &s).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn pair_with_odd_budget_emits_four() {
        let s = settings(44100, 120.0);
        let pair = Beat::pair(Beat::note(60), Beat::note(64));
        assert_eq!(render(&pair, 5, &s).len(), 4);
    }

    #[test]
    fn triplet_budget_ten_emits_nine() {
        let s = settings(44100, 120.0);
        let triplet = Beat::triplet(Beat::note(60), Beat::Rest, Beat::note(67));
        let r = render_beat(&triplet, 10, FilterState::new(), &s, &FLAT);
        assert_eq!(r.len(), 9);
        assert_eq!(r.count(), 9);
    }

    #[test]
    fn pair_carries_state_into_second_half() {
        let s = settings(44100, 120.0);
        let pair = Beat::pair(Beat::note(69), Beat::Rest);
        let out = render(&pair, 200, &s);

        // The rest keeps ringing at the note's frequency, decaying faster
        let first_half = render(&Beat::note(69), 100, &s);
        assert_eq!(&out[..100], &first_half[..]);

        let mut state = FilterState::new();
        for &y in &first_half {
            state.push(y);
        }
        state.omega = hz_to_omega(440.0, 44100);
        state.alpha = s.rest_decay;
        let c = state.coefficients();
        let continued = c.next(&state);
        assert!((out[100] - continued).abs() < 1e-15);
        assert!(out[100] != 0.0);
    }

    #[test]
    fn rest_keeps_incoming_omega() {
        let s = settings(44100, 120.0);
        let incoming = FilterState {
            alpha: s.note_decay,
            omega: 0.3,
            y1: 0.5,
            y2: 0.25,
        };
        let mut r = render_beat(&Beat::Rest, 3, incoming, &s, &FLAT);
        let c = Coefficients::new(s.rest_decay, 0.3);
        let first = r.next().unwrap();
        assert!((first - (c.b1 * 0.5 + c.b2 * 0.25)).abs() < 1e-15);
        r.by_ref().for_each(drop);
        assert_eq!(r.state().omega, 0.3);
        assert_eq!(r.state().alpha, s.rest_decay);
    }

    #[test]
    fn harmony_length_is_shortest_voice() {
        // beat_samples = 10
        let s = settings(10, 60.0);
        let harmony = Beat::harmony(vec![
            vec![Beat::note(60); 10],
            vec![Beat::note(64); 8],
            vec![Beat::note(67); 12],
        ]);
        let out = render(&harmony, 10, &s);
        assert_eq!(out.len(), 80);
    }

    #[test]
    fn harmony_is_sum_of_independent_voices() {
        let s = settings(1000, 60.0);
        let voices = vec![
            vec![Beat::note(60), Beat::note(62)],
            vec![Beat::note(64)],
            vec![Beat::pair(Beat::note(67), Beat::Rest), Beat::note(72)],
        ];
        let harmony = Beat::harmony(voices.clone());

        // Incoming state must not leak into the voices
        let incoming = FilterState {
            alpha: 0.1,
            omega: 0.2,
            y1: 0.3,
            y2: 0.4,
        };
        let out: Vec<f64> = render_beat(&harmony, 7, incoming, &s, &FLAT).collect();
        assert_eq!(out.len(), 1000);

        let rendered: Vec<Vec<f64>> = voices
            .iter()
            .map(|v| {
                let score = Score::new(v.clone());
                synthesize_with(&score, &s, &FLAT).collect()
            })
            .collect();
        for (i, &x) in out.iter().enumerate() {
            let expected: f64 = rendered.iter().map(|v| v[i]).sum();
            assert!((x - expected).abs() < 1e-15, "index {i}");
        }
    }

    #[test]
    fn harmony_updates_history_but_not_tone() {
        let s = settings(100, 60.0);
        let harmony = Beat::harmony(vec![vec![Beat::note(60)], vec![Beat::note(64)]]);
        let incoming = FilterState {
            alpha: 0.5,
            omega: 0.25,
            ..FilterState::default()
        };
        let mut r = render_beat(&harmony, 1, incoming, &s, &FLAT);
        let out: Vec<f64> = r.by_ref().collect();
        let state = r.state();
        assert_eq!((state.alpha, state.omega), (0.5, 0.25));
        assert_eq!(state.y1, out[out.len() - 1]);
        assert_eq!(state.y2, out[out.len() - 2]);
    }

    #[test]
    fn empty_harmony_emits_nothing() {
        let s = settings(100, 60.0);
        assert!(render(&Beat::harmony(Vec::new()), 10, &s).is_empty());
    }

    #[test]
    fn top_level_beats_start_fresh() {
        let s = settings(100, 60.0);
        let score = Score::new(vec![Beat::note(69), Beat::Rest]);
        let out: Vec<f64> = synthesize_with(&score, &s, &FLAT).collect();
        assert_eq!(out.len(), 200);
        assert!(out[..100].iter().any(|&x| x != 0.0));
        assert!(out[100..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn size_hint_tracks_progress() {
        let s = settings(100, 60.0);
        let score = Score::new(vec![
            Beat::note(60),
            Beat::triplet(Beat::note(60), Beat::note(62), Beat::note(64)),
        ]);
        let mut samples = synthesize(&score, &s);
        assert_eq!(samples.len(), 199);
        samples.nth(49);
        assert_eq!(samples.len(), 149);
        assert_eq!(samples.count(), 149);
    }

    #[test]
    fn early_termination_with_take() {
        let s = settings(44100, 1.0);
        let score = Score::new(vec![Beat::note(60); 1000]);
        let head: Vec<f64> = synthesize(&score, &s).take(10).collect();
        assert_eq!(head.len(), 10);
    }

    #[test]
    fn loudness_model_scales_excitation() {
        let s = settings(44100, 120.0);
        let beat = Beat::note(69);
        let flat = render(&beat, 2, &s)[1];
        let loud = FlatLoudness(46.0);
        let boosted: Vec<f64> = render_beat(&beat, 2, FilterState::new(), &s, &loud).collect();
        // +6 dB is roughly double
        assert!((boosted[1] / flat - 1.9953).abs() < 1e-3);
    }
}

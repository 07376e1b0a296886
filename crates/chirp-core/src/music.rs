//! The background music loop.
//!
//! Four voices are layered over a four-chord progression:
//! - a chord pad holding the three chord tones
//! - a plucked melody stepping through the chord once per beat
//! - short noise hits on every half beat
//! - a bass line one octave below the chord root
//!
//! The noise hits are the only random part of the loop. The random source is
//! owned by [`MusicLoop`], so seeding it makes the whole clip reproducible.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::source::{sine, WaveformSource};

/// Length of one beat in seconds.
pub const BEAT_LENGTH: f64 = 0.5;
/// Beats per measure.
pub const BEATS_PER_MEASURE: usize = 4;
/// Length of one measure in seconds.
pub const MEASURE_LENGTH: f64 = BEAT_LENGTH * BEATS_PER_MEASURE as f64;

const PAD_GAIN: f64 = 0.15;
const MELODY_GAIN: f64 = 0.2;
const PERCUSSION_GAIN: f64 = 0.05;
const BASS_GAIN: f64 = 0.1;

/// Fraction of each half-beat slot during which the noise hit sounds.
const PERCUSSION_WINDOW: f64 = 0.1;
const PERCUSSION_DECAY: f64 = 100.0;

/// Three chord tones, lowest first, in Hz.
pub type Chord = [f64; 3];

/// The chord progression, one chord per measure.
pub type ChordTable = [Chord; 4];

/// C, G, Am, F.
pub const CHORDS: ChordTable = [
    [261.63, 329.63, 392.00],
    [196.00, 246.94, 293.66],
    [220.00, 261.63, 329.63],
    [174.61, 220.00, 261.63],
];

/// Index of the chord sounding at `t` in a clip of length `d`.
pub fn chord_index(t: f64, d: f64) -> usize {
    ((t % d) / MEASURE_LENGTH) as usize % CHORDS.len()
}

/// The chord sounding at `t` in a clip of length `d`.
pub fn chord_at(t: f64, d: f64) -> &'static Chord {
    &CHORDS[chord_index(t, d)]
}

/// Pitch of the melody note at `t` over `chord`.
///
/// The melody walks the three chord tones and then a fifth above the middle
/// tone, one note per beat.
pub fn melody_frequency(chord: &Chord, t: f64) -> f64 {
    let note = ((t / BEAT_LENGTH) % BEATS_PER_MEASURE as f64) as usize;
    match note {
        0..=2 => chord[note],
        _ => chord[1] * 1.5,
    }
}

/// Background loop generator.
pub struct MusicLoop<R: Rng = StdRng> {
    rng: R,
}

impl MusicLoop<StdRng> {
    /// Creates a loop whose noise hits differ on every run.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a loop whose noise hits are reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MusicLoop<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MusicLoop<R> {
    /// Creates a loop drawing its noise from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// The sustained chord voice.
    pub fn pad(&self, t: f64, d: f64) -> f64 {
        let chord = chord_at(t, d);
        chord.iter().map(|&frequency| sine(frequency, t)).sum::<f64>() * PAD_GAIN
    }

    /// The plucked melody voice.
    ///
    /// Each note starts at full level and decays quadratically to silence by
    /// the end of its beat.
    pub fn melody(&self, t: f64, d: f64) -> f64 {
        let frequency = melody_frequency(chord_at(t, d), t);
        let envelope = (1.0 - (t % BEAT_LENGTH) / BEAT_LENGTH).powi(2);
        sine(frequency, t) * MELODY_GAIN * envelope
    }

    /// The noise-hit voice. Exactly zero outside the start of each half beat.
    pub fn percussion(&mut self, t: f64) -> f64 {
        let slot = BEAT_LENGTH / 2.0;
        if (t / slot).fract() >= PERCUSSION_WINDOW {
            return 0.0;
        }

        let noise: f64 = self.rng.gen_range(-1.0..=1.0);
        noise * PERCUSSION_GAIN * (-(t % slot) * PERCUSSION_DECAY).exp()
    }

    /// The bass voice, an octave below the chord root.
    pub fn bass(&self, t: f64, d: f64) -> f64 {
        let root = chord_at(t, d)[0];
        sine(root / 2.0, t) * BASS_GAIN
    }
}

impl<R: Rng> WaveformSource for MusicLoop<R> {
    fn evaluate(&mut self, t: f64, d: f64) -> f64 {
        // Layers are pre-scaled; peaks over 1.0 are left for the renderer to clamp.
        self.pad(t, d) + self.melody(t, d) + self.percussion(t) + self.bass(t, d)
    }
}

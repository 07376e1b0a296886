//! One-shot sound effects: the "drop" thud and the "merge" sweep.

use crate::source::{sine, WaveformSource};

/// A sinusoid whose pitch decays exponentially, under a faster amplitude decay.
///
/// The pitch follows `start_frequency * e^(-sweep_rate * t)` and the loudness
/// follows `e^(-decay_rate * t)`. The two rates are independent; with the
/// defaults the pitch falls away before the thud goes quiet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropEffect {
    /// Starting pitch in Hz
    pub start_frequency: f64,
    /// Exponential rate of the pitch sweep, per second
    pub sweep_rate: f64,
    /// Exponential rate of the amplitude decay, per second
    pub decay_rate: f64,
}

impl Default for DropEffect {
    fn default() -> Self {
        Self {
            start_frequency: 600.0,
            sweep_rate: 10.0,
            decay_rate: 15.0,
        }
    }
}

impl DropEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantaneous pitch at `t`, in Hz.
    pub fn frequency_at(&self, t: f64) -> f64 {
        self.start_frequency * (-self.sweep_rate * t).exp()
    }

    /// Amplitude envelope at `t`, `1.0` at the start of the clip.
    pub fn envelope(&self, t: f64) -> f64 {
        (-self.decay_rate * t).exp()
    }
}

impl WaveformSource for DropEffect {
    fn evaluate(&mut self, t: f64, _d: f64) -> f64 {
        sine(self.frequency_at(t), t) * self.envelope(t)
    }
}

/// A linear pitch ramp across the length of a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub from: f64,
    pub to: f64,
}

impl Sweep {
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Pitch at `progress` (`t / d`), where 0 is the start and 1 the end.
    pub fn frequency_at(&self, progress: f64) -> f64 {
        self.from + (self.to - self.from) * progress
    }
}

/// Two rising tones mixed together under a linear fade-out.
///
/// Silent at exactly `t = d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeEffect {
    pub primary: Sweep,
    pub secondary: Sweep,
    /// Level of the secondary voice relative to the primary
    pub secondary_gain: f64,
}

impl Default for MergeEffect {
    fn default() -> Self {
        Self {
            primary: Sweep::new(400.0, 1200.0),
            secondary: Sweep::new(600.0, 1000.0),
            secondary_gain: 0.5,
        }
    }
}

impl MergeEffect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WaveformSource for MergeEffect {
    fn evaluate(&mut self, t: f64, d: f64) -> f64 {
        let progress = t / d;
        let primary = sine(self.primary.frequency_at(progress), t);
        let secondary = sine(self.secondary.frequency_at(progress), t);
        let mixed = (primary + self.secondary_gain * secondary) / (1.0 + self.secondary_gain);

        mixed * (1.0 - progress)
    }
}

//! Clip parameters.

use crate::{error::RenderError, source::WaveformSource, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Most 16-bit mono samples a WAV data chunk can hold.
pub const MAX_SAMPLES: usize = ((u32::MAX - 36) / 2) as usize;

/// Everything the renderer needs to produce one clip.
///
/// Built by the caller and consumed by one of the `render_*` functions.
pub struct AudioClipSpec<S> {
    pub(crate) source: S,
    pub(crate) duration_seconds: f64,
    pub(crate) volume: f64,
    pub(crate) sample_rate: u32,
}

impl<S: WaveformSource> AudioClipSpec<S> {
    /// Creates a clip at [`DEFAULT_SAMPLE_RATE`].
    pub fn new(source: S, duration_seconds: f64, volume: f64) -> Self {
        Self {
            source,
            duration_seconds,
            volume,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples the clip renders to: `round(duration * sample_rate)`.
    pub fn sample_count(&self) -> usize {
        (self.duration_seconds * self.sample_rate as f64).round() as usize
    }

    /// Header of the mono 16-bit integer PCM file this clip encodes to.
    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    /// Rejects parameters that would silently produce empty or silent output.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(RenderError::InvalidParameter {
                name: "sample rate",
                value: 0.0,
                reason: "must be positive",
            });
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(RenderError::InvalidParameter {
                name: "duration",
                value: self.duration_seconds,
                reason: "must be a positive number of seconds",
            });
        }
        if (self.duration_seconds * self.sample_rate as f64).round() > MAX_SAMPLES as f64 {
            return Err(RenderError::InvalidParameter {
                name: "duration",
                value: self.duration_seconds,
                reason: "too long for a WAV file at this sample rate",
            });
        }
        if !self.volume.is_finite() || self.volume <= 0.0 || self.volume > 1.0 {
            return Err(RenderError::InvalidParameter {
                name: "volume",
                value: self.volume,
                reason: "must be in (0, 1]",
            });
        }
        Ok(())
    }
}

//! Turning a waveform source into 16-bit PCM.

use std::{
    io::{Seek, Write},
    path::{Path, PathBuf},
};

use hound::WavWriter;
use tracing::{debug, info};

use crate::{
    clip::AudioClipSpec, error::RenderError, export::WavSink, source::WaveformSource, Result,
};

/// Largest magnitude of an encoded sample. Both polarities stop at 32767.
pub const PCM_PEAK: i16 = i16::MAX;

/// What a successful file render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub samples: usize,
    pub sample_rate: u32,
    /// Largest absolute sample value written
    pub peak: i16,
}

/// Converts a volume-scaled amplitude to a PCM sample.
///
/// Values beyond `[-1, 1]` clamp to `±32767`.
pub fn quantize(amplitude: f64) -> i16 {
    let peak = PCM_PEAK as f64;
    (amplitude * peak).round().clamp(-peak, peak) as i16
}

/// Evaluates every sample of `clip` in temporal order, handing each to `emit`.
fn generate<S, F>(clip: AudioClipSpec<S>, mut emit: F) -> Result<usize>
where
    S: WaveformSource,
    F: FnMut(i16) -> Result<()>,
{
    clip.validate()?;

    let AudioClipSpec {
        mut source,
        duration_seconds,
        volume,
        sample_rate,
    } = clip;
    let count = (duration_seconds * sample_rate as f64).round() as usize;
    let rate = sample_rate as f64;

    debug!(
        "rendering {} samples ({}s at {} Hz, volume {})",
        count, duration_seconds, sample_rate, volume
    );

    for index in 0..count {
        let time = index as f64 / rate;
        let value = source.evaluate(time, duration_seconds);
        if !value.is_finite() {
            return Err(RenderError::NonFiniteSample { index, time, value });
        }
        emit(quantize(value * volume))?;
    }

    Ok(count)
}

/// Renders `clip` into memory.
pub fn render_samples<S: WaveformSource>(clip: AudioClipSpec<S>) -> Result<Vec<i16>> {
    clip.validate()?;

    let mut samples = Vec::with_capacity(clip.sample_count());
    generate(clip, |sample| {
        samples.push(sample);
        Ok(())
    })?;
    Ok(samples)
}

/// Renders `clip` as a WAV stream into `writer`.
///
/// The caller owns `writer`; on failure its contents are unspecified.
pub fn render_to_writer<S, W>(clip: AudioClipSpec<S>, writer: W) -> Result<usize>
where
    S: WaveformSource,
    W: Write + Seek,
{
    clip.validate()?;

    let mut wav = WavWriter::new(writer, clip.wav_spec()).map_err(RenderError::from_stream)?;
    let count = generate(clip, |sample| {
        wav.write_sample(sample).map_err(RenderError::from_stream)
    })?;
    wav.finalize().map_err(RenderError::from_stream)?;

    Ok(count)
}

/// Renders `clip` to a WAV file at `path`, creating parent directories.
///
/// Parameters are checked before the file is touched. If rendering fails
/// after the file was created, it is removed again.
pub fn render_to_file<S: WaveformSource>(
    clip: AudioClipSpec<S>,
    path: impl AsRef<Path>,
) -> Result<RenderSummary> {
    clip.validate()?;

    let sample_rate = clip.sample_rate();
    let mut sink = WavSink::create(path, clip.wav_spec())?;
    let mut peak: i16 = 0;
    generate(clip, |sample| {
        peak = peak.max(sample.abs());
        sink.write_sample(sample)
    })?;
    let samples = sink.written();
    let path = sink.finalize()?;

    info!("Generated: {}", path.display());

    Ok(RenderSummary {
        path,
        samples,
        sample_rate,
        peak,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{effects::DropEffect, source::from_fn};

    fn constant(value: f64) -> impl WaveformSource {
        from_fn(move |_, _| value)
    }

    #[test]
    fn test_quantize_clamps_symmetrically() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32767);
        assert_eq!(quantize(2.0), 32767);
        assert_eq!(quantize(-2.0), -32767);
        assert_eq!(quantize(0.5), 16384);
    }

    #[test]
    fn test_constant_overdrive_clamps() {
        let high = render_samples(AudioClipSpec::new(constant(2.0), 0.01, 1.0)).unwrap();
        assert!(high.iter().all(|&s| s == 32767));

        let low = render_samples(AudioClipSpec::new(constant(-2.0), 0.01, 1.0)).unwrap();
        assert!(low.iter().all(|&s| s == -32767));
    }

    #[test]
    fn test_sample_count() {
        for (duration, rate) in [(0.3, 44_100), (0.5, 44_100), (1.0, 8_000), (0.123, 22_050)] {
            let samples = render_samples(
                AudioClipSpec::new(constant(0.1), duration, 1.0).with_sample_rate(rate),
            )
            .unwrap();
            assert_eq!(samples.len(), (duration * rate as f64).round() as usize);
        }
    }

    #[test]
    fn test_volume_is_monotonic() {
        let quiet = render_samples(AudioClipSpec::new(DropEffect::new(), 0.3, 0.25)).unwrap();
        let loud = render_samples(AudioClipSpec::new(DropEffect::new(), 0.3, 0.5)).unwrap();

        assert_eq!(quiet.len(), loud.len());
        assert!(quiet
            .iter()
            .zip(&loud)
            .all(|(q, l)| l.unsigned_abs() >= q.unsigned_abs()));
        assert!(quiet
            .iter()
            .zip(&loud)
            .any(|(q, l)| l.unsigned_abs() > q.unsigned_abs()));
    }

    #[test]
    fn test_time_steps_by_sample_period() {
        let mut times = Vec::new();
        let source = from_fn(|t, d| {
            assert_eq!(d, 0.5);
            times.push(t);
            0.0
        });
        render_samples(AudioClipSpec::new(source, 0.5, 1.0).with_sample_rate(4)).unwrap();
        assert_eq!(times, vec![0.0, 0.25]);
    }

    #[test]
    fn test_non_finite_rejected() {
        let source = from_fn(|t, _| if t > 0.001 { f64::NAN } else { 0.0 });
        let result = render_samples(AudioClipSpec::new(source, 0.01, 1.0));
        assert!(matches!(result, Err(RenderError::NonFiniteSample { .. })));

        let result = render_samples(AudioClipSpec::new(constant(f64::INFINITY), 0.01, 1.0));
        assert!(matches!(
            result,
            Err(RenderError::NonFiniteSample { index: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_parameters_skip_evaluation() {
        let mut called = false;
        let source = from_fn(|_, _| {
            called = true;
            0.0
        });
        let result = render_samples(AudioClipSpec::new(source, 0.0, 1.0));
        assert!(matches!(result, Err(RenderError::InvalidParameter { .. })));
        assert!(!called);
    }

    #[test]
    fn test_huge_duration_rejected_before_allocating() {
        let result = render_samples(AudioClipSpec::new(constant(0.0), 1e20, 1.0));
        assert!(matches!(
            result,
            Err(RenderError::InvalidParameter { name: "duration", .. })
        ));
    }

    /// Accepts the header, then fails every write after `budget` bytes.
    struct FailingWriter {
        inner: Cursor<Vec<u8>>,
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.inner.get_ref().len() + buf.len() > self.budget {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Seek for FailingWriter {
        fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_failing_writer_reports_io() {
        let writer = FailingWriter {
            inner: Cursor::new(Vec::new()),
            budget: 64,
        };
        let result = render_to_writer(AudioClipSpec::new(DropEffect::new(), 1.0, 0.5), writer);
        assert!(matches!(result, Err(RenderError::Stream(_))));

        let writer = FailingWriter {
            inner: Cursor::new(Vec::new()),
            budget: 0,
        };
        let result = render_to_writer(AudioClipSpec::new(DropEffect::new(), 1.0, 0.5), writer);
        assert!(matches!(result, Err(RenderError::Stream(_))));
    }

    #[test]
    fn test_writer_header() {
        let mut bytes = Cursor::new(Vec::new());
        let count = render_to_writer(
            AudioClipSpec::new(DropEffect::new(), 0.3, 0.5),
            &mut bytes,
        )
        .unwrap();
        assert_eq!(count, 13_230);

        let data = bytes.into_inner();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        // 44 byte canonical header followed by two bytes per sample.
        assert_eq!(data.len(), 44 + 2 * 13_230);

        let reader = hound::WavReader::new(Cursor::new(data)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(reader.len(), 13_230);
    }

    #[test]
    fn test_samples_little_endian() {
        let mut bytes = Cursor::new(Vec::new());
        render_to_writer(
            AudioClipSpec::new(constant(-2.0), 1.0, 1.0).with_sample_rate(2),
            &mut bytes,
        )
        .unwrap();

        let data = bytes.into_inner();
        let expected = (-32767_i16).to_le_bytes();
        assert_eq!(&data[44..], &[expected, expected].concat()[..]);
    }
}

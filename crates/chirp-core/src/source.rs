//! The waveform source abstraction shared by every generator.

/// Anything that maps a point in time to an amplitude.
///
/// `t` is the time in seconds since the start of the clip and `d` is the
/// total clip duration. The returned amplitude is nominally in `[-1, 1]` but
/// is not clamped here; the renderer owns clamping and quantization.
///
/// Implementations must not fault for `t > d`.
pub trait WaveformSource {
    fn evaluate(&mut self, t: f64, d: f64) -> f64;
}

impl<S: WaveformSource + ?Sized> WaveformSource for Box<S> {
    fn evaluate(&mut self, t: f64, d: f64) -> f64 {
        (**self).evaluate(t, d)
    }
}

impl<S: WaveformSource + ?Sized> WaveformSource for &mut S {
    fn evaluate(&mut self, t: f64, d: f64) -> f64 {
        (**self).evaluate(t, d)
    }
}

/// A source backed by a closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnSource<F>(F);

/// Wraps a `(t, d) -> amplitude` closure as a [`WaveformSource`].
///
/// ```
/// use chirp_core::{from_fn, WaveformSource};
///
/// let mut ramp = from_fn(|t, d| t / d);
/// assert_eq!(ramp.evaluate(1.0, 4.0), 0.25);
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut(f64, f64) -> f64,
{
    FnSource(f)
}

impl<F> WaveformSource for FnSource<F>
where
    F: FnMut(f64, f64) -> f64,
{
    fn evaluate(&mut self, t: f64, d: f64) -> f64 {
        (self.0)(t, d)
    }
}

/// Sine of a frequency at time `t`, with zero phase at `t = 0`.
pub(crate) fn sine(frequency: f64, t: f64) -> f64 {
    (std::f64::consts::TAU * frequency * t).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_source() {
        let mut source = from_fn(|t, d| t / d);
        assert_eq!(source.evaluate(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn WaveformSource> = Box::new(from_fn(|_, _| -0.5));
        assert_eq!(source.evaluate(0.0, 1.0), -0.5);
    }

    #[test]
    fn test_borrowed_source() {
        fn evaluate_twice<S: WaveformSource>(mut source: S) {
            source.evaluate(0.0, 1.0);
            source.evaluate(0.1, 1.0);
        }

        let mut calls = 0;
        {
            let mut counting = from_fn(|_, _| {
                calls += 1;
                0.0
            });
            evaluate_twice(&mut counting);
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_sine_zero_phase() {
        assert_eq!(sine(440.0, 0.0), 0.0);
        assert!((sine(1.0, 0.25) - 1.0).abs() < 1e-12);
    }
}

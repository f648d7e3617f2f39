//! Numeric Backend
//!
//! Constants and the narrow math interface the generators depend on.
//! Generators are generic over [`MathBackend`] so that a hardware-accelerated
//! DSP implementation can replace [`PortableMath`] without touching the
//! stimulus code; any backend must agree with the portable one within
//! [`FLOAT32_TOLERANCE`].

/// Six significant digits: the agreement required between backends.
pub const FLOAT32_TOLERANCE: f32 = 0.000_001;

/// π in radians
pub const PI: f32 = std::f32::consts::PI;

/// π/2 in radians
pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;

/// 2π in radians
pub const TWO_PI: f32 = std::f32::consts::TAU;

/// Euler's number
pub const E: f32 = std::f32::consts::E;

/// Lower (exclusive) bound of generatable tone frequencies in Hz
///
/// Tones below 20 Hz are inaudible; 10 Hz leaves headroom for
/// infrasonic calibration stimuli.
pub const MIN_FREQUENCY: f32 = 10.0;

/// Upper (exclusive) bound of generatable tone frequencies in Hz
pub const MAX_FREQUENCY: f32 = 20_000.0;

/// Math routines consumed by stimulus generators
///
/// Scalar functions mirror the `f32` intrinsics. Vector functions operate
/// element-wise over `min(src.len(), dst.len())` elements, the way CMSIS-DSP
/// style routines process a caller-supplied block length.
///
/// # Example
///
/// ```
/// use asg::{MathBackend, PortableMath};
///
/// let math = PortableMath;
/// let mut out = [0.0f32; 3];
/// math.vector_scale(&[1.0, -2.0, 0.5], 2.0, &mut out);
/// assert_eq!(out, [2.0, -4.0, 1.0]);
/// assert_eq!(math.vector_max(&out), Some((2.0, 0)));
/// ```
pub trait MathBackend: Send {
    /// Sine of `x` radians
    fn sin(&self, x: f32) -> f32;

    /// Cosine of `x` radians
    fn cos(&self, x: f32) -> f32;

    /// Square root
    fn sqrt(&self, x: f32) -> f32;

    /// Absolute value
    fn abs(&self, x: f32) -> f32;

    /// Round to nearest integer, ties away from zero
    fn round(&self, x: f32) -> f32;

    /// `dst[i] = a[i] * b[i]`
    fn vector_multiply(&self, a: &[f32], b: &[f32], dst: &mut [f32]) {
        for ((out, &x), &y) in dst.iter_mut().zip(a).zip(b) {
            *out = x * y;
        }
    }

    /// `dst[i] = src[i] + offset`
    fn vector_offset(&self, src: &[f32], offset: f32, dst: &mut [f32]) {
        for (out, &x) in dst.iter_mut().zip(src) {
            *out = x + offset;
        }
    }

    /// `dst[i] = src[i] * scale`
    fn vector_scale(&self, src: &[f32], scale: f32, dst: &mut [f32]) {
        for (out, &x) in dst.iter_mut().zip(src) {
            *out = x * scale;
        }
    }

    /// Largest element and the index of its first occurrence
    ///
    /// Returns `None` for an empty slice. NaN elements never win.
    fn vector_max(&self, src: &[f32]) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for (index, &value) in src.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            match best {
                Some((max, _)) if value <= max => {}
                _ => best = Some((value, index)),
            }
        }
        best
    }
}

/// Portable backend built on the standard `f32` intrinsics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortableMath;

impl MathBackend for PortableMath {
    #[inline]
    fn sin(&self, x: f32) -> f32 {
        x.sin()
    }

    #[inline]
    fn cos(&self, x: f32) -> f32 {
        x.cos()
    }

    #[inline]
    fn sqrt(&self, x: f32) -> f32 {
        x.sqrt()
    }

    #[inline]
    fn abs(&self, x: f32) -> f32 {
        x.abs()
    }

    #[inline]
    fn round(&self, x: f32) -> f32 {
        x.round()
    }
}

/// Wrap an angle into `[0, 2π)`
///
/// Non-finite input has no meaningful angle and maps to `0.0`.
#[inline]
pub fn normalize_radians(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TWO_PI);
    // rem_euclid can land exactly on 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Convert a duration to a whole number of samples at `sampling_frequency`
///
/// Negative or NaN products yield 0; values beyond `u32::MAX` saturate.
#[inline]
pub fn seconds_to_samples(seconds: f32, sampling_frequency: f32) -> u32 {
    (seconds as f64 * sampling_frequency as f64).round() as u32
}

/// Round to nearest, ties toward negative infinity
///
/// Used by the unsigned DAC path so that a zero-level input lands on the
/// lower of the two midscale codes (127 for 8 bits).
#[inline]
pub fn round_half_down(x: f64) -> f64 {
    (x - 0.5).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_portable_scalar_functions() {
        let math = PortableMath;
        assert_abs_diff_eq!(math.sin(HALF_PI), 1.0, epsilon = FLOAT32_TOLERANCE);
        assert_abs_diff_eq!(math.cos(PI), -1.0, epsilon = FLOAT32_TOLERANCE);
        assert_abs_diff_eq!(math.sqrt(2.0), std::f32::consts::SQRT_2);
        assert_eq!(math.abs(-0.25), 0.25);
        assert_eq!(math.round(2.5), 3.0);
        assert_eq!(math.round(-2.5), -3.0);
    }

    #[test]
    fn test_vector_operations() {
        let math = PortableMath;
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, -1.0, 2.0];
        let mut out = [0.0; 3];

        math.vector_multiply(&a, &b, &mut out);
        assert_eq!(out, [0.5, -2.0, 6.0]);

        math.vector_offset(&a, -1.0, &mut out);
        assert_eq!(out, [0.0, 1.0, 2.0]);

        math.vector_scale(&a, 0.5, &mut out);
        assert_eq!(out, [0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_vector_ops_stop_at_shorter_slice() {
        let math = PortableMath;
        let mut out = [9.0; 4];
        math.vector_scale(&[1.0, 2.0], 3.0, &mut out);
        assert_eq!(out, [3.0, 6.0, 9.0, 9.0]);
    }

    #[test]
    fn test_vector_max() {
        let math = PortableMath;
        assert_eq!(math.vector_max(&[]), None);
        assert_eq!(math.vector_max(&[0.1, 0.9, 0.9, -3.0]), Some((0.9, 1)));
        assert_eq!(math.vector_max(&[f32::NAN, -1.0]), Some((-1.0, 1)));
        assert_eq!(math.vector_max(&[f32::NAN]), None);
    }

    #[test]
    fn test_normalize_radians() {
        assert_eq!(normalize_radians(0.0), 0.0);
        assert_abs_diff_eq!(normalize_radians(TWO_PI + 1.0), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(normalize_radians(-HALF_PI), 3.0 * HALF_PI, epsilon = 1e-5);
        assert_eq!(normalize_radians(TWO_PI), 0.0);
        assert_eq!(normalize_radians(f32::NAN), 0.0);
        assert_eq!(normalize_radians(f32::INFINITY), 0.0);

        let tiny = normalize_radians(-1e-9);
        assert!((0.0..TWO_PI).contains(&tiny));
    }

    #[test]
    fn test_seconds_to_samples() {
        assert_eq!(seconds_to_samples(1.0, 44_100.0), 44_100);
        assert_eq!(seconds_to_samples(0.5, 48_000.0), 24_000);
        assert_eq!(seconds_to_samples(-1.0, 48_000.0), 0);
        assert_eq!(seconds_to_samples(f32::NAN, 48_000.0), 0);
    }

    #[test]
    fn test_round_half_down() {
        assert_eq!(round_half_down(127.5), 127.0);
        assert_eq!(round_half_down(127.6), 128.0);
        assert_eq!(round_half_down(127.4), 127.0);
        assert_eq!(round_half_down(255.0), 255.0);
        assert_eq!(round_half_down(0.0), 0.0);
    }
}

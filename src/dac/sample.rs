//! DAC Output Sample Formats
//!
//! Quantization rules for each buffer element type the adapter can fill.
//!
//! - Unsigned: `(x + 1) / 2 * (dynamic_range - 1)`, rounded to nearest with
//!   ties downward, so `-1 -> 0`, `0 -> dynamic_range/2 - 1`,
//!   `+1 -> dynamic_range - 1`.
//! - Signed: `x * scale_factor`, truncated toward zero, so `±1 -> ±scale_factor`.
//!
//! The two paths intentionally differ (rounding vs truncation). All casts
//! saturate, so out-of-range input clips instead of wrapping.

use crate::math::round_half_down;

mod sealed {
    pub trait Sealed {}
}

/// Buffer element type accepted by [`DacAdapter::generate`](super::DacAdapter::generate)
///
/// Implemented for `u32`, `i32`, `u16`, `i16`, `u8`, `i8` and `f32`
/// (pass-through of the normalized stimulus output).
pub trait DacSample: Copy + sealed::Sealed {
    /// Bit width of the element; the DAC resolution may not exceed it
    const BITS: u16;

    /// Smallest buffer length accepted in one call
    const MIN_BLOCK: usize = 1;

    /// Quantize a normalized sample in `[-1, 1]`
    fn quantize(value: f32, dynamic_range: u64, scale_factor: u32) -> Self;
}

macro_rules! unsigned_sample {
    ($($ty:ty => $min_block:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl DacSample for $ty {
                const BITS: u16 = <$ty>::BITS as u16;
                const MIN_BLOCK: usize = $min_block;

                #[inline]
                fn quantize(value: f32, dynamic_range: u64, _scale_factor: u32) -> Self {
                    let top = dynamic_range.saturating_sub(1) as f64;
                    round_half_down((value as f64 + 1.0) / 2.0 * top) as $ty
                }
            }
        )*
    };
}

macro_rules! signed_sample {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl DacSample for $ty {
                const BITS: u16 = <$ty>::BITS as u16;

                #[inline]
                fn quantize(value: f32, _dynamic_range: u64, scale_factor: u32) -> Self {
                    (value as f64 * scale_factor as f64) as $ty
                }
            }
        )*
    };
}

// 32-bit unsigned output has always required at least two samples per call
unsigned_sample!(u32 => 2, u16 => 1, u8 => 1);
signed_sample!(i32, i16, i8);

impl sealed::Sealed for f32 {}

impl DacSample for f32 {
    const BITS: u16 = 32;

    #[inline]
    fn quantize(value: f32, _dynamic_range: u64, _scale_factor: u32) -> Self {
        value
    }
}

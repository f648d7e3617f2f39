//! Stimulus to DAC Adapter
//!
//! Pulls a stimulus one sample at a time and stores each sample quantized
//! into the integer format of the target converter. The adapter borrows the
//! stimulus; it never owns or outlives it.

pub mod sample;

pub use sample::DacSample;

use crate::stimulus::{Generated, Stimulus};

/// Converter that quantizes a stimulus into fixed-point DAC samples
///
/// # Example
///
/// ```
/// use asg::{DacAdapter, PureTone};
///
/// let mut tone = PureTone::with_sampling_frequency(44_100.0).unwrap();
/// tone.set_tone_frequency(441.0).unwrap();
///
/// let mut dac = DacAdapter::with_stimulus(&mut tone, 16);
/// let mut block = [0i16; 100];
/// let generated = dac.generate(&mut block);
/// assert!(generated.is_complete(100));
/// assert_eq!(block[0], 0);
/// assert!(block[25] >= 32_766);
/// ```
pub struct DacAdapter<'a> {
    /// Borrowed source of normalized samples
    stimulus: Option<&'a mut dyn Stimulus>,
    /// Converter resolution in bits
    dac_resolution: u16,
    /// 2^dac_resolution
    dynamic_range: u64,
    /// dynamic_range/2 - 1, the signed full-scale code
    scale_factor: u32,
}

impl<'a> DacAdapter<'a> {
    /// Resolution used when none is given
    pub const DEFAULT_RESOLUTION: u16 = 24;

    /// Create an adapter with no stimulus attached
    pub fn new(dac_resolution: u16) -> Self {
        let mut adapter = DacAdapter {
            stimulus: None,
            dac_resolution: 0,
            dynamic_range: 0,
            scale_factor: 0,
        };
        adapter.set_dac_resolution(dac_resolution);
        adapter
    }

    /// Create an adapter reading from `stimulus`
    pub fn with_stimulus(stimulus: &'a mut dyn Stimulus, dac_resolution: u16) -> Self {
        let mut adapter = Self::new(dac_resolution);
        adapter.stimulus = Some(stimulus);
        adapter
    }

    /// Attached stimulus, if any
    pub fn get_stimulus(&self) -> Option<&(dyn Stimulus + 'a)> {
        self.stimulus.as_deref()
    }

    /// Attached stimulus, mutable
    pub fn get_stimulus_mut(&mut self) -> Option<&mut (dyn Stimulus + 'a)> {
        self.stimulus.as_deref_mut()
    }

    /// Attach or detach the stimulus
    pub fn set_stimulus(&mut self, stimulus: Option<&'a mut dyn Stimulus>) {
        self.stimulus = stimulus;
    }

    /// Detach and return the stimulus
    pub fn take_stimulus(&mut self) -> Option<&'a mut dyn Stimulus> {
        self.stimulus.take()
    }

    /// True when a stimulus is attached
    pub fn has_stimulus(&self) -> bool {
        self.stimulus.is_some()
    }

    /// Converter resolution in bits
    pub fn get_dac_resolution(&self) -> u16 {
        self.dac_resolution
    }

    /// Set the converter resolution in bits
    ///
    /// Not validated here: a resolution wider than the buffer element is
    /// rejected by [`generate`](Self::generate) at call time.
    pub fn set_dac_resolution(&mut self, dac_resolution: u16) {
        self.dac_resolution = dac_resolution;
        self.dynamic_range = if dac_resolution >= 64 {
            u64::MAX
        } else {
            1u64 << dac_resolution
        };
        self.scale_factor =
            u32::try_from((self.dynamic_range / 2).saturating_sub(1)).unwrap_or(u32::MAX);
    }

    /// Number of codes: 2^resolution
    pub fn get_dynamic_range(&self) -> u64 {
        self.dynamic_range
    }

    /// Signed full-scale code: dynamic_range/2 - 1
    pub fn get_scale_factor(&self) -> u32 {
        self.scale_factor
    }

    /// Fill `buffer` with quantized samples pulled from the stimulus
    ///
    /// Returns [`Generated::NONE`] without touching the buffer when no
    /// stimulus is attached, the buffer is empty (or shorter than
    /// `T::MIN_BLOCK`), or the resolution exceeds `T::BITS`.
    ///
    /// If the stimulus stops producing part way through, generation stops
    /// and the returned count covers only the slots filled so far. The sync
    /// index is the buffer position of the first pulled sample carrying a
    /// synchronization mark.
    pub fn generate<T: DacSample>(&mut self, buffer: &mut [T]) -> Generated {
        let dynamic_range = self.dynamic_range;
        let scale_factor = self.scale_factor;
        let resolution = self.dac_resolution;

        let Some(stimulus) = self.stimulus.as_deref_mut() else {
            tracing::debug!("DAC generation without a stimulus");
            return Generated::NONE;
        };
        if buffer.is_empty() || buffer.len() < T::MIN_BLOCK || resolution > T::BITS {
            tracing::debug!(
                len = buffer.len(),
                resolution,
                width = T::BITS,
                "DAC generation preconditions not met"
            );
            return Generated::NONE;
        }

        let requested = buffer.len();
        let mut sync = None;
        let mut pulled = [0.0f32; 1];
        for (index, slot) in buffer.iter_mut().enumerate() {
            let single = stimulus.generate(&mut pulled);
            if single.is_empty() {
                tracing::warn!(
                    produced = index,
                    requested,
                    "stimulus stopped producing"
                );
                return Generated::new(index, sync);
            }
            *slot = T::quantize(pulled[0], dynamic_range, scale_factor);
            if sync.is_none() && single.sync.is_some() {
                sync = Some(index);
            }
        }
        Generated::new(requested, sync)
    }

    /// Quantize pre-recorded samples to signed 32-bit codes
    ///
    /// Applies the signed rule to `src` directly; no stimulus is needed and
    /// no early stop is possible. `dst` must hold at least `src.len()`
    /// samples. Recorded samples carry no synchronization marks, so `sync`
    /// is always `None`.
    pub fn reproduce(&self, src: &[f32], dst: &mut [i32]) -> Generated {
        if src.is_empty() || dst.len() < src.len() || self.dac_resolution > i32::BITS as u16 {
            tracing::debug!(
                src = src.len(),
                dst = dst.len(),
                resolution = self.dac_resolution,
                "DAC reproduction preconditions not met"
            );
            return Generated::NONE;
        }
        for (out, &x) in dst.iter_mut().zip(src) {
            *out = i32::quantize(x, self.dynamic_range, self.scale_factor);
        }
        Generated::new(src.len(), None)
    }
}

impl Default for DacAdapter<'_> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESOLUTION)
    }
}

impl std::fmt::Debug for DacAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DacAdapter")
            .field("has_stimulus", &self.has_stimulus())
            .field("dac_resolution", &self.dac_resolution)
            .field("dynamic_range", &self.dynamic_range)
            .field("scale_factor", &self.scale_factor)
            .finish()
    }
}

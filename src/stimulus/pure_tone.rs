//! Pure Tone Generator
//!
//! Single-frequency sinusoid `sin(step * n + phase)` where `n` is the
//! absolute sample index within the current period. The running position
//! wraps at the period length, so successive blocks continue the waveform
//! exactly where the previous block stopped and every period start is
//! reported as a synchronization mark.

use super::{Generated, Stimulus, StimulusParameters, StimulusState};
use crate::math::{self, MathBackend, PortableMath, MAX_FREQUENCY, MIN_FREQUENCY, TWO_PI};
use crate::{AsgError, Result};

/// Single-frequency tone generator
///
/// Derived fields (`step_argument`, `period_size_samples`) are recomputed
/// whenever the tone frequency or sampling frequency changes and are never
/// set directly. A rate written straight into [`Stimulus::state_mut`] is
/// picked up by the next accessor or generation call.
///
/// Blocks join seamlessly only when `fs / f` is an integer. Otherwise the
/// position wraps at the rounded period, so a block starting after a wrap
/// jumps by the rounding error in phase.
///
/// # Example
///
/// ```
/// use asg::{PureTone, Stimulus};
///
/// let mut tone = PureTone::with_sampling_frequency(44_100.0).unwrap();
/// tone.set_tone_frequency(1_000.0).unwrap();
/// assert_eq!(tone.get_period_size_samples(), 44);
///
/// let mut block = [0.0f32; 64];
/// let generated = tone.generate(&mut block);
/// assert_eq!(generated.samples, 64);
/// assert_eq!(generated.sync, Some(0));
/// assert_eq!(tone.get_position(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct PureTone<M: MathBackend = PortableMath> {
    state: StimulusState,
    /// Tone frequency in Hz, inside (MIN_FREQUENCY, MAX_FREQUENCY)
    tone_frequency: f32,
    /// Phase offset in [0, 2π)
    phase: f32,
    /// Phase increment per sample: 2π·f/fs
    step_argument: f32,
    /// Samples per period: round(fs/f)
    period_size_samples: u32,
    /// Sampling frequency the derived fields were computed from
    derived_for: f32,
    math: M,
}

/// Tone frequency a new generator starts with
pub const DEFAULT_TONE_FREQUENCY: f32 = 500.0;

impl PureTone<PortableMath> {
    /// Create a 500 Hz tone on the portable backend
    ///
    /// The sampling frequency starts at 1 Hz, which leaves the tone
    /// degenerate until a real rate is set.
    pub fn new() -> Self {
        Self::with_backend(PortableMath)
    }

    /// Create a 500 Hz tone sampled at `sampling_frequency` Hz
    pub fn with_sampling_frequency(sampling_frequency: f32) -> Result<Self> {
        let mut tone = Self::new();
        tone.set_sampling_frequency(sampling_frequency)?;
        Ok(tone)
    }
}

impl Default for PureTone<PortableMath> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MathBackend> PureTone<M> {
    /// Create a 500 Hz tone computing samples through `math`
    pub fn with_backend(math: M) -> Self {
        let mut tone = PureTone {
            state: StimulusState::new(),
            tone_frequency: DEFAULT_TONE_FREQUENCY,
            phase: 0.0,
            step_argument: 0.0,
            period_size_samples: 0,
            derived_for: 0.0,
            math,
        };
        tone.update_derived();
        tone
    }

    /// Tone frequency in Hz
    pub fn get_tone_frequency(&self) -> f32 {
        self.tone_frequency
    }

    /// Set the tone frequency in Hz
    ///
    /// The interval is open: `MIN_FREQUENCY` and `MAX_FREQUENCY` themselves
    /// are rejected, as is NaN. On rejection nothing changes.
    pub fn set_tone_frequency(&mut self, frequency: f32) -> Result<()> {
        if frequency.is_nan() || frequency <= MIN_FREQUENCY || frequency >= MAX_FREQUENCY {
            tracing::debug!("rejected tone frequency {}", frequency);
            return Err(AsgError::InvalidFrequency(frequency));
        }
        self.tone_frequency = frequency;
        self.update_derived();
        Ok(())
    }

    /// Phase offset in radians, in [0, 2π)
    pub fn get_phase(&self) -> f32 {
        self.phase
    }

    /// Set the phase offset in radians
    ///
    /// Stored modulo 2π. Non-finite values reset the phase to 0.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = math::normalize_radians(phase);
    }

    /// Phase increment per sample in radians
    pub fn get_step_argument(&self) -> f32 {
        if self.is_stale() {
            return self.derive().0;
        }
        self.step_argument
    }

    /// Samples in one period, 0 while the configuration is degenerate
    pub fn get_period_size_samples(&self) -> u32 {
        if self.is_stale() {
            return self.derive().1;
        }
        self.period_size_samples
    }

    /// Step and period for the current tone and sampling frequencies
    fn derive(&self) -> (f32, u32) {
        let sampling_frequency = self.state.get_sampling_frequency();
        let step = TWO_PI * self.tone_frequency / sampling_frequency;
        let period = self.math.round(sampling_frequency / self.tone_frequency) as u32;
        (step, period)
    }

    fn update_derived(&mut self) {
        (self.step_argument, self.period_size_samples) = self.derive();
        self.derived_for = self.state.get_sampling_frequency();
    }

    fn is_stale(&self) -> bool {
        self.derived_for != self.state.get_sampling_frequency()
    }

    fn refresh_derived(&mut self) {
        if self.is_stale() {
            tracing::debug!(
                sampling_frequency = self.state.get_sampling_frequency(),
                "sampling frequency changed through state, recomputing tone"
            );
            self.update_derived();
        }
    }

    fn is_degenerate(&self) -> bool {
        self.tone_frequency == 0.0 || self.period_size_samples == 0
    }

    /// Index of the first period boundary among `len` samples from the current position
    fn first_sync(&self, len: usize) -> Option<usize> {
        let period = u64::from(self.period_size_samples);
        let position = u64::from(self.state.get_position());
        let offset = (period - position % period) % period;
        (offset < len as u64).then_some(offset as usize)
    }

    fn advance(&mut self, count: usize) {
        let period = u64::from(self.period_size_samples);
        let next = u64::from(self.state.get_position()) + count as u64;
        let wrapped = if next >= period { next % period } else { next };
        // wrapped < period <= u32::MAX
        self.state.set_position(wrapped as u32);
    }
}

impl<M: MathBackend> Stimulus for PureTone<M> {
    /// Fill `buffer` with the next samples of the tone
    ///
    /// The position wraps at `period_size_samples`, so split calls match a
    /// single call exactly only for an integer `fs / f`.
    fn generate(&mut self, buffer: &mut [f32]) -> Generated {
        self.refresh_derived();
        if buffer.is_empty() || self.is_degenerate() {
            tracing::debug!(
                len = buffer.len(),
                frequency = self.tone_frequency,
                period = self.period_size_samples,
                "pure tone generation skipped"
            );
            return Generated::NONE;
        }

        let position = u64::from(self.state.get_position());
        for (index, sample) in buffer.iter_mut().enumerate() {
            let n = (position + index as u64) as f32;
            *sample = self.math.sin(self.step_argument * n + self.phase);
        }

        let sync = self.first_sync(buffer.len());
        self.advance(buffer.len());
        tracing::trace!(samples = buffer.len(), ?sync, "pure tone block");
        Generated::new(buffer.len(), sync)
    }

    fn reproduce(&mut self, src: &[f32], dst: &mut [f32]) -> Generated {
        self.refresh_derived();
        if src.is_empty() || dst.len() < src.len() || self.is_degenerate() {
            tracing::debug!(
                src = src.len(),
                dst = dst.len(),
                "pure tone reproduction skipped"
            );
            return Generated::NONE;
        }

        let dst = &mut dst[..src.len()];
        for (out, &x) in dst.iter_mut().zip(src) {
            *out = self.math.abs(x);
        }
        let peak = self.math.vector_max(dst).map_or(0.0, |(value, _)| value);
        if peak > 1.0 {
            self.math.vector_scale(src, 1.0 / peak, dst);
        } else {
            dst.copy_from_slice(src);
        }

        let sync = self.first_sync(src.len());
        self.advance(src.len());
        Generated::new(src.len(), sync)
    }

    fn configure(&mut self, parameters: &StimulusParameters) -> Result<()> {
        match parameters {
            StimulusParameters::PureTone(params) => self.set_tone_frequency(params.frequency),
        }
    }

    fn get_period_secs(&self) -> f32 {
        1.0 / self.tone_frequency
    }

    fn state(&self) -> &StimulusState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StimulusState {
        &mut self.state
    }

    fn set_sampling_frequency(&mut self, sampling_frequency: f32) -> Result<()> {
        self.state.set_sampling_frequency(sampling_frequency)?;
        self.update_derived();
        Ok(())
    }
}

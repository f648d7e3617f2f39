//! Stimulus Generation
//!
//! The capability contract every stimulus generator satisfies, the shared
//! position / sampling-rate bookkeeping, and the concrete generators.
//!
//! Generation is pull based: a caller hands in a buffer, the stimulus fills
//! it starting at its running sample position and reports the first sample
//! that falls on a period boundary (the synchronization mark).

pub mod params;
pub mod pure_tone;

pub use params::{PureToneParameters, StimulusKind, StimulusParameters};
pub use pure_tone::PureTone;

use crate::{AsgError, Result};

/// Outcome of a generation or reproduction call
///
/// `samples` is the number of leading buffer slots that hold valid output;
/// `0` signals a precondition failure, a count below the requested size an
/// upstream failure part way through. `sync` is the in-buffer index of the
/// first sample that marks a period boundary, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generated {
    /// Samples written
    pub samples: usize,
    /// Index of the first synchronization sample
    pub sync: Option<usize>,
}

impl Generated {
    /// Nothing written, no synchronization mark
    pub const NONE: Generated = Generated {
        samples: 0,
        sync: None,
    };

    /// Create an outcome
    pub fn new(samples: usize, sync: Option<usize>) -> Self {
        Generated { samples, sync }
    }

    /// True when no sample was produced
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// True when every one of `requested` samples was produced
    pub fn is_complete(&self, requested: usize) -> bool {
        requested > 0 && self.samples == requested
    }
}

/// Position and sampling-rate bookkeeping shared by all stimuli
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StimulusState {
    /// Index of the next sample to generate
    position: u32,
    /// Samples per second, always > 0
    sampling_frequency: f32,
}

impl StimulusState {
    /// Create state at position 0 with a sampling frequency of 1 Hz
    pub fn new() -> Self {
        StimulusState {
            position: 0,
            sampling_frequency: 1.0,
        }
    }

    /// Index of the next sample to generate
    pub fn get_position(&self) -> u32 {
        self.position
    }

    /// Move the running sample index
    pub fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    /// Sampling frequency in Hz
    pub fn get_sampling_frequency(&self) -> f32 {
        self.sampling_frequency
    }

    /// Set the sampling frequency in Hz
    ///
    /// Rejects values `<= 0` and NaN, leaving the previous rate in place.
    pub fn set_sampling_frequency(&mut self, sampling_frequency: f32) -> Result<()> {
        if sampling_frequency.is_nan() || sampling_frequency <= 0.0 {
            tracing::debug!("rejected sampling frequency {}", sampling_frequency);
            return Err(AsgError::InvalidSamplingFrequency(sampling_frequency));
        }
        self.sampling_frequency = sampling_frequency;
        Ok(())
    }
}

impl Default for StimulusState {
    fn default() -> Self {
        Self::new()
    }
}

/// Common interface for stimulus generators
///
/// Implementors own a [`StimulusState`] and expose it through [`state`] /
/// [`state_mut`]; position and sampling-rate accessors are provided on top
/// of it and may be overridden when a stimulus keeps state derived from
/// them.
///
/// Instances are single owner: calls mutate the running position in place
/// and must be issued sequentially.
///
/// [`state`]: Stimulus::state
/// [`state_mut`]: Stimulus::state_mut
///
/// # Example
///
/// ```
/// use asg::{PureTone, Stimulus};
///
/// fn fill<S: Stimulus + ?Sized>(stimulus: &mut S, block: &mut [f32]) -> Option<usize> {
///     stimulus.generate(block).sync
/// }
///
/// let mut tone = PureTone::with_sampling_frequency(48_000.0).unwrap();
/// tone.set_tone_frequency(480.0).unwrap();
/// let mut block = [0.0f32; 150];
/// assert_eq!(fill(&mut tone, &mut block), Some(0));
/// assert_eq!(fill(&mut tone, &mut block), Some(50));
/// ```
pub trait Stimulus: Send {
    /// Fill `buffer` with consecutive samples starting at the current position
    ///
    /// Returns [`Generated::NONE`] on any precondition failure (empty
    /// buffer, degenerate frequency or sampling rate). Only the first
    /// synchronization mark within the call is reported.
    fn generate(&mut self, buffer: &mut [f32]) -> Generated;

    /// Normalize previously generated samples from `src` into `dst` for playback
    ///
    /// Failure and synchronization semantics match [`generate`](Stimulus::generate).
    fn reproduce(&mut self, src: &[f32], dst: &mut [f32]) -> Generated;

    /// Apply a parameter block
    ///
    /// Fails when the block belongs to another stimulus kind or holds
    /// values the stimulus rejects; state is unchanged on failure.
    fn configure(&mut self, parameters: &StimulusParameters) -> Result<()>;

    /// Length of one period of the stimulus in seconds
    fn get_period_secs(&self) -> f32;

    /// Shared bookkeeping
    fn state(&self) -> &StimulusState;

    /// Shared bookkeeping, mutable
    fn state_mut(&mut self) -> &mut StimulusState;

    /// Index of the next sample to generate
    fn get_position(&self) -> u32 {
        self.state().get_position()
    }

    /// Move the running sample index
    fn set_position(&mut self, position: u32) {
        self.state_mut().set_position(position);
    }

    /// Restart at sample 0
    fn reset_position(&mut self) {
        self.set_position(0);
    }

    /// Sampling frequency in Hz
    fn get_sampling_frequency(&self) -> f32 {
        self.state().get_sampling_frequency()
    }

    /// Set the sampling frequency in Hz (rejects `<= 0` and NaN)
    fn set_sampling_frequency(&mut self, sampling_frequency: f32) -> Result<()> {
        self.state_mut().set_sampling_frequency(sampling_frequency)
    }

    /// Least common multiple of two period lengths, see [`least_common_multiple`]
    fn least_common_multiple(&self, a: u32, b: u32) -> u32 {
        least_common_multiple(a, b)
    }
}

/// Least common multiple via Euclid's greatest common divisor
///
/// Sizes buffers that span whole periods of several components. Returns 0
/// when either input is 0. The product is formed in 64 bits and saturates
/// at `u32::MAX`.
///
/// ```
/// assert_eq!(asg::least_common_multiple(4, 6), 12);
/// assert_eq!(asg::least_common_multiple(0, 5), 0);
/// ```
pub fn least_common_multiple(a: u32, b: u32) -> u32 {
    let (mut x, mut y) = (a, b);
    while y != 0 {
        (x, y) = (y, x % y);
    }
    let gcd = x;
    if gcd == 0 {
        return 0;
    }
    let lcm = u64::from(a / gcd) * u64::from(b);
    u32::try_from(lcm).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults() {
        let state = StimulusState::default();
        assert_eq!(state.get_position(), 0);
        assert_eq!(state.get_sampling_frequency(), 1.0);
    }

    #[test]
    fn test_sampling_frequency_rejects_invalid() {
        let mut state = StimulusState::new();
        state.set_sampling_frequency(48_000.0).unwrap();

        for bad in [0.0, -1.0, f32::NAN, -0.0] {
            assert!(state.set_sampling_frequency(bad).is_err(), "{bad} accepted");
            assert_eq!(state.get_sampling_frequency(), 48_000.0);
        }
    }

    #[test]
    fn test_least_common_multiple() {
        assert_eq!(least_common_multiple(4, 6), 12);
        assert_eq!(least_common_multiple(6, 4), 12);
        assert_eq!(least_common_multiple(0, 5), 0);
        assert_eq!(least_common_multiple(5, 0), 0);
        assert_eq!(least_common_multiple(0, 0), 0);
        assert_eq!(least_common_multiple(7, 7), 7);
        assert_eq!(least_common_multiple(1, 441), 441);
        assert_eq!(least_common_multiple(100, 147), 14_700);
    }

    #[test]
    fn test_least_common_multiple_large_inputs() {
        // Divide before multiplying keeps this in range
        assert_eq!(least_common_multiple(65_536, 131_072), 131_072);
        // Coprime inputs whose product exceeds u32 saturate
        assert_eq!(least_common_multiple(65_537, 65_539), u32::MAX);
    }

    #[test]
    fn test_generated_helpers() {
        assert!(Generated::NONE.is_empty());
        assert!(!Generated::NONE.is_complete(0));
        let block = Generated::new(8, Some(3));
        assert!(block.is_complete(8));
        assert!(!block.is_complete(10));
    }
}

//! Generator Configuration
//!
//! JSON description of a complete generation setup: sampling rate, DAC
//! resolution, phase and the stimulus parameter block. Missing fields take
//! their defaults.
//!
//! ```json
//! {
//!   "sampling_frequency": 48000.0,
//!   "dac_resolution": 16,
//!   "phase": 0.0,
//!   "stimulus": { "kind": "pure-tone", "frequency": 1000.0 }
//! }
//! ```

use crate::dac::DacAdapter;
use crate::stimulus::{PureTone, PureToneParameters, Stimulus, StimulusParameters};
use crate::{AsgError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Highest DAC resolution any output format can carry
pub const MAX_DAC_RESOLUTION: u16 = 32;

/// Complete stimulus generation setup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Sampling frequency in Hz
    pub sampling_frequency: f32,
    /// DAC resolution in bits (1-32)
    pub dac_resolution: u16,
    /// Phase offset in radians
    pub phase: f32,
    /// Stimulus parameter block
    pub stimulus: StimulusParameters,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            sampling_frequency: 44_100.0,
            dac_resolution: 16,
            phase: 0.0,
            stimulus: StimulusParameters::PureTone(PureToneParameters::new(1_000.0)),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::debug!("loading generator configuration from {}", path.as_ref().display());
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against the rules the generators enforce
    pub fn validate(&self) -> Result<()> {
        if self.dac_resolution == 0 || self.dac_resolution > MAX_DAC_RESOLUTION {
            return Err(AsgError::Config(format!(
                "DAC resolution must be 1-{} bits, got {}",
                MAX_DAC_RESOLUTION, self.dac_resolution
            )));
        }
        self.build_pure_tone().map(|_| ())
    }

    /// Build the configured tone
    ///
    /// The sampling frequency is applied first so that derived period and
    /// step values come out of the final frequency pair.
    pub fn build_pure_tone(&self) -> Result<PureTone> {
        let mut tone = PureTone::with_sampling_frequency(self.sampling_frequency)?;
        tone.configure(&self.stimulus)?;
        tone.set_phase(self.phase);
        Ok(tone)
    }

    /// Wrap `stimulus` in an adapter at the configured resolution
    pub fn dac_adapter<'a>(&self, stimulus: &'a mut dyn Stimulus) -> DacAdapter<'a> {
        DacAdapter::with_stimulus(stimulus, self.dac_resolution)
    }
}

//! Audio Export
//!
//! Renders quantized stimulus output to files for offline inspection.

pub mod wav;

pub use wav::render_to_wav;

/// Settings for a rendered file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportConfig {
    /// Sample rate written to the file header in Hz
    pub sample_rate: u32,
    /// Bits per sample: 8, 16 or 32
    pub bits: u16,
    /// Length of the rendering in seconds
    pub duration_secs: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            bits: 16,
            duration_secs: 1.0,
        }
    }
}

impl ExportConfig {
    /// Create a configuration for `sample_rate` Hz with the other fields defaulted
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Set bits per sample
    pub fn bits(mut self, bits: u16) -> Self {
        self.bits = bits;
        self
    }

    /// Set the rendering length in seconds
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration_secs = seconds;
        self
    }
}

/// What a rendering produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Samples the configuration asked for
    pub requested: usize,
    /// Samples actually written
    pub written: usize,
    /// Absolute index of the first synchronization sample
    pub first_sync: Option<usize>,
}

impl ExportSummary {
    /// True when the stimulus delivered every requested sample
    pub fn is_complete(&self) -> bool {
        self.written == self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_config_builder() {
        let config = ExportConfig::new(48_000).bits(8).duration(0.5);
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.bits, 8);
        assert_eq!(config.duration_secs, 0.5);
    }

    #[test]
    fn test_summary_completion() {
        let summary = ExportSummary {
            requested: 10,
            written: 7,
            first_sync: None,
        };
        assert!(!summary.is_complete());
    }
}

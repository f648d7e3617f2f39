//! Auditory Stimulus Generator
//!
//! Sample-by-sample synthesis of periodic auditory test stimuli and their
//! conversion into the fixed-point formats a Digital-to-Analog Converter
//! expects. Generation is phase continuous across calls, so a stimulus can
//! be streamed in arbitrarily sized blocks while period boundaries are
//! reported as synchronization marks.
//!
//! # Features
//! - Pluggable numeric backend (`MathBackend`) with a portable `f32` implementation
//! - `Stimulus` trait with shared position / sampling-rate bookkeeping
//! - Pure tone generator with exact period wrap and first-sync detection
//! - DAC adapter quantizing to signed/unsigned 8, 16 and 32 bit samples
//! - JSON generator configuration
//! - WAV rendering of quantized output
//!
//! # Crate feature flags
//! - `export-wav` (default): WAV rendering through `hound` (`export`)
//! - `cli` (default): the `asg-render` command line tool
//!
//! # Quick start
//! ```
//! use asg::{DacAdapter, PureTone};
//!
//! let mut tone = PureTone::with_sampling_frequency(44_100.0).unwrap();
//! tone.set_tone_frequency(441.0).unwrap();
//!
//! let mut dac = DacAdapter::with_stimulus(&mut tone, 8);
//! let mut buffer = [0u8; 256];
//! let block = dac.generate(&mut buffer);
//! assert_eq!(block.samples, 256);
//! assert_eq!(block.sync, Some(0));
//! assert_eq!(buffer[0], 127);
//! ```

#![warn(missing_docs)]

pub mod config; // Generator configuration (JSON)
pub mod dac; // Stimulus to DAC quantization
pub mod math; // Numeric backend and constants
pub mod stimulus; // Stimulus contract and generators

#[cfg(feature = "export-wav")]
pub mod export; // WAV rendering

/// Error types for stimulus configuration and output
#[derive(thiserror::Error, Debug)]
pub enum AsgError {
    /// Tone frequency NaN or outside the open generatable interval
    #[error("Invalid tone frequency: {0} Hz")]
    InvalidFrequency(f32),

    /// Sampling frequency NaN or not strictly positive
    #[error("Invalid sampling frequency: {0} Hz")]
    InvalidSamplingFrequency(f32),

    /// Packed parameter block does not match the layout of its kind
    #[error("Parameter block for {kind} must be {expected} bytes, got {actual}")]
    ParameterSize {
        /// Stimulus kind the block was decoded as
        kind: stimulus::StimulusKind,
        /// Size of the packed layout for that kind
        expected: usize,
        /// Size actually supplied
        actual: usize,
    },

    /// Unknown stimulus kind tag
    #[error("Unknown stimulus kind: {0}")]
    UnknownStimulusKind(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),
}

/// Result type for stimulus operations
pub type Result<T> = std::result::Result<T, AsgError>;

// Public API exports
pub use config::GeneratorConfig;
pub use dac::{DacAdapter, DacSample};
pub use math::{MathBackend, PortableMath};
pub use stimulus::{
    least_common_multiple, Generated, PureTone, PureToneParameters, Stimulus, StimulusKind,
    StimulusParameters, StimulusState,
};

#[cfg(feature = "export-wav")]
pub use export::{render_to_wav, ExportConfig, ExportSummary};

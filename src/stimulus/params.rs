//! Stimulus Parameter Blocks
//!
//! One variant per stimulus kind. Blocks arriving as raw bytes (from a
//! host link or a stored protocol) are checked against the packed layout of
//! their kind in [`StimulusParameters::decode`]; JSON configuration goes
//! through serde with an internal `kind` tag.

use crate::{AsgError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag naming a stimulus kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StimulusKind {
    /// Single-frequency sinusoid
    PureTone,
}

impl StimulusKind {
    /// Tag as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            StimulusKind::PureTone => "pure-tone",
        }
    }

    /// Size in bytes of the packed parameter block for this kind
    pub fn packed_size(&self) -> usize {
        match self {
            StimulusKind::PureTone => PureToneParameters::PACKED_SIZE,
        }
    }
}

impl fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StimulusKind {
    type Err = AsgError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pure-tone" | "puretone" | "tone" => Ok(StimulusKind::PureTone),
            _ => Err(AsgError::UnknownStimulusKind(value.to_string())),
        }
    }
}

/// Pure tone parameters
///
/// Packed layout: a single little-endian IEEE-754 `f32` frequency in Hz,
/// no padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PureToneParameters {
    /// Tone frequency in Hz
    pub frequency: f32,
}

impl PureToneParameters {
    /// Packed block size in bytes
    pub const PACKED_SIZE: usize = 4;

    /// Create parameters for a tone of `frequency` Hz
    pub fn new(frequency: f32) -> Self {
        PureToneParameters { frequency }
    }
}

impl Default for PureToneParameters {
    fn default() -> Self {
        PureToneParameters { frequency: 10.0 }
    }
}

/// Parameter block for any stimulus kind
///
/// ```
/// use asg::{StimulusKind, StimulusParameters};
///
/// let block = 1000.0f32.to_le_bytes();
/// let params = StimulusParameters::decode(StimulusKind::PureTone, &block).unwrap();
/// assert_eq!(params.kind(), StimulusKind::PureTone);
/// assert!(StimulusParameters::decode(StimulusKind::PureTone, &block[..2]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StimulusParameters {
    /// Single-frequency sinusoid
    PureTone(PureToneParameters),
}

impl StimulusParameters {
    /// Kind tag of this block
    pub fn kind(&self) -> StimulusKind {
        match self {
            StimulusParameters::PureTone(_) => StimulusKind::PureTone,
        }
    }

    /// Decode a packed block, validating its size against `kind`
    pub fn decode(kind: StimulusKind, block: &[u8]) -> Result<Self> {
        let size_error = || AsgError::ParameterSize {
            kind,
            expected: kind.packed_size(),
            actual: block.len(),
        };
        match kind {
            StimulusKind::PureTone => {
                let bytes: [u8; PureToneParameters::PACKED_SIZE] =
                    block.try_into().map_err(|_| size_error())?;
                Ok(StimulusParameters::PureTone(PureToneParameters::new(
                    f32::from_le_bytes(bytes),
                )))
            }
        }
    }

    /// Encode to the packed layout of this kind
    pub fn encode(&self) -> Vec<u8> {
        match self {
            StimulusParameters::PureTone(p) => p.frequency.to_le_bytes().to_vec(),
        }
    }
}

impl From<PureToneParameters> for StimulusParameters {
    fn from(params: PureToneParameters) -> Self {
        StimulusParameters::PureTone(params)
    }
}

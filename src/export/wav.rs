//! WAV file export functionality

use super::{ExportConfig, ExportSummary};
use crate::dac::{DacAdapter, DacSample};
use crate::math::seconds_to_samples;
use crate::stimulus::Stimulus;
use crate::{AsgError, Result};
use std::path::Path;

/// Samples pulled from the adapter per block
const CHUNK_SAMPLES: usize = 4096;

/// Render DAC output to a mono PCM WAV file
///
/// Pulls `duration_secs` worth of samples through `adapter` in the sample
/// format WAV uses for the configured width: unsigned 8 bit, signed 16 or
/// signed 32 bit. A stimulus that stops early leaves a shorter file and is
/// reported through [`ExportSummary::written`], not as an error.
///
/// # Examples
///
/// ```no_run
/// use asg::{render_to_wav, DacAdapter, ExportConfig, PureTone};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut tone = PureTone::with_sampling_frequency(48_000.0)?;
/// tone.set_tone_frequency(1_000.0)?;
///
/// let mut dac = DacAdapter::with_stimulus(&mut tone, 16);
/// let summary = render_to_wav(&mut dac, "tone.wav", ExportConfig::new(48_000).duration(2.0))?;
/// assert!(summary.is_complete());
/// # Ok(())
/// # }
/// ```
pub fn render_to_wav<P: AsRef<Path>>(
    adapter: &mut DacAdapter<'_>,
    output_path: P,
    config: ExportConfig,
) -> Result<ExportSummary> {
    if !matches!(config.bits, 8 | 16 | 32) {
        return Err(AsgError::Config(format!(
            "WAV export supports 8, 16 or 32 bits, got {}",
            config.bits
        )));
    }
    if adapter.get_dac_resolution() > config.bits {
        return Err(AsgError::Config(format!(
            "DAC resolution {} does not fit {}-bit samples",
            adapter.get_dac_resolution(),
            config.bits
        )));
    }
    let Some(stimulus) = adapter.get_stimulus() else {
        return Err(AsgError::Config("no stimulus attached to the DAC adapter".into()));
    };
    let stimulus_rate = stimulus.get_sampling_frequency();
    if (stimulus_rate - config.sample_rate as f32).abs() > f32::EPSILON * stimulus_rate {
        tracing::warn!(
            "stimulus sampled at {} Hz written with a {} Hz header",
            stimulus_rate,
            config.sample_rate
        );
    }

    let requested = seconds_to_samples(config.duration_secs, config.sample_rate as f32) as usize;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: config.sample_rate,
        bits_per_sample: config.bits,
        sample_format: hound::SampleFormat::Int,
    };
    let path = output_path.as_ref();
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| AsgError::AudioFileError(format!("Failed to create WAV file: {}", e)))?;

    tracing::info!(
        "Rendering {} samples ({:.2}s) at {} bits to {}",
        requested,
        config.duration_secs,
        config.bits,
        path.display()
    );

    // WAV stores 8-bit PCM unsigned; hound takes it as i8 and re-biases by 128
    let (written, first_sync) = match config.bits {
        8 => pump::<u8, _>(adapter, requested, |code| {
            write_sample(&mut writer, (code ^ 0x80) as i8)
        })?,
        16 => pump::<i16, _>(adapter, requested, |code| write_sample(&mut writer, code))?,
        _ => pump::<i32, _>(adapter, requested, |code| write_sample(&mut writer, code))?,
    };

    writer
        .finalize()
        .map_err(|e| AsgError::AudioFileError(format!("Failed to finalize WAV file: {}", e)))?;

    if written < requested {
        tracing::warn!("stimulus stopped after {} of {} samples", written, requested);
    } else {
        tracing::info!("Export complete");
    }

    Ok(ExportSummary {
        requested,
        written,
        first_sync,
    })
}

fn write_sample<W, S>(writer: &mut hound::WavWriter<W>, sample: S) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
    S: hound::Sample,
{
    writer
        .write_sample(sample)
        .map_err(|e| AsgError::AudioFileError(format!("Failed to write sample: {}", e)))
}

/// Pull `total` samples in blocks, handing each to `sink`
///
/// Returns the count written and the absolute index of the first sync mark.
fn pump<T, F>(
    adapter: &mut DacAdapter<'_>,
    total: usize,
    mut sink: F,
) -> Result<(usize, Option<usize>)>
where
    T: DacSample + Default,
    F: FnMut(T) -> Result<()>,
{
    let mut buffer = vec![T::default(); CHUNK_SAMPLES.min(total)];
    let mut written = 0;
    let mut first_sync = None;

    while written < total {
        let len = (total - written).min(CHUNK_SAMPLES);
        let block = adapter.generate(&mut buffer[..len]);
        if first_sync.is_none() {
            first_sync = block.sync.map(|index| written + index);
        }
        for &code in &buffer[..block.samples] {
            sink(code)?;
        }
        written += block.samples;
        if block.samples < len {
            break;
        }
    }
    Ok((written, first_sync))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::PureTone;

    fn tone_441() -> PureTone {
        let mut tone = PureTone::with_sampling_frequency(44_100.0).unwrap();
        tone.set_tone_frequency(441.0).unwrap();
        tone
    }

    #[test]
    fn test_render_16bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone16.wav");
        let mut tone = tone_441();
        let mut dac = DacAdapter::with_stimulus(&mut tone, 16);

        let summary =
            render_to_wav(&mut dac, &path, ExportConfig::new(44_100).duration(0.1)).unwrap();
        assert_eq!(summary.requested, 4_410);
        assert!(summary.is_complete());
        assert_eq!(summary.first_sync, Some(0));

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 4_410);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], 0);
        assert!(samples[25] >= 32_766);
        assert!(samples[75] <= -32_766);
    }

    #[test]
    fn test_render_8bit_unsigned_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone8.wav");
        let mut tone = tone_441();
        let mut dac = DacAdapter::with_stimulus(&mut tone, 8);

        let config = ExportConfig::new(44_100).bits(8).duration(0.01);
        let summary = render_to_wav(&mut dac, &path, config).unwrap();
        assert_eq!(summary.written, 441);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let first = reader.samples::<i8>().next().unwrap().unwrap();
        // Code 127 re-biased to signed
        assert_eq!(first, -1);
    }

    #[test]
    fn test_render_spans_multiple_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");
        let mut tone = tone_441();
        tone.set_position(50);
        let mut dac = DacAdapter::with_stimulus(&mut tone, 32);

        let config = ExportConfig::new(44_100).bits(32).duration(0.25);
        let summary = render_to_wav(&mut dac, &path, config).unwrap();
        assert_eq!(summary.written, 11_025);
        assert_eq!(summary.first_sync, Some(50));
        assert_eq!(hound::WavReader::open(&path).unwrap().len(), 11_025);
    }

    #[test]
    fn test_render_rejects_bad_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let mut tone = tone_441();

        let mut dac = DacAdapter::with_stimulus(&mut tone, 16);
        let config = ExportConfig::new(44_100).bits(24);
        assert!(matches!(
            render_to_wav(&mut dac, &path, config),
            Err(AsgError::Config(_))
        ));

        let config = ExportConfig::new(44_100).bits(8);
        assert!(matches!(
            render_to_wav(&mut dac, &path, config),
            Err(AsgError::Config(_))
        ));

        let mut empty = DacAdapter::new(16);
        assert!(matches!(
            render_to_wav(&mut empty, &path, ExportConfig::default()),
            Err(AsgError::Config(_))
        ));
    }

    #[test]
    fn test_render_keeps_stimulus_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pos.wav");
        let mut tone = tone_441();
        {
            let mut dac = DacAdapter::with_stimulus(&mut tone, 16);
            render_to_wav(&mut dac, &path, ExportConfig::new(44_100).duration(0.001)).unwrap();
        }
        // 44 samples into a 100-sample period
        assert_eq!(tone.get_position(), 44);
    }
}

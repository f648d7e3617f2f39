//! Render an auditory test stimulus to a WAV file.
//!
//! Settings come from an optional JSON generator configuration; any flag
//! given on the command line overrides the matching configuration field.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use asg::{
    render_to_wav, ExportConfig, GeneratorConfig, PureToneParameters, Stimulus, StimulusKind,
    StimulusParameters,
};

#[derive(Parser)]
#[command(name = "asg-render")]
#[command(about = "Render a pure tone through a DAC model to a WAV file")]
struct Args {
    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// JSON generator configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stimulus kind (pure-tone)
    #[arg(short, long)]
    kind: Option<String>,

    /// Tone frequency in Hz
    #[arg(short, long)]
    frequency: Option<f32>,

    /// Sampling rate in Hz
    #[arg(short = 'r', long)]
    sampling_rate: Option<u32>,

    /// Phase offset in radians
    #[arg(short, long)]
    phase: Option<f32>,

    /// DAC resolution and WAV sample width in bits (8, 16 or 32)
    #[arg(short, long)]
    bits: Option<u16>,

    /// Length of the rendering in seconds
    #[arg(short, long, default_value_t = 1.0)]
    duration: f32,

    /// Print the effective configuration as JSON before rendering
    #[arg(long)]
    show_config: bool,
}

fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(rate) = args.sampling_rate {
        config.sampling_frequency = rate as f32;
    }
    let kind = match &args.kind {
        Some(name) => name.parse::<StimulusKind>()?,
        None => config.stimulus.kind(),
    };
    if let Some(frequency) = args.frequency {
        config.stimulus = match kind {
            StimulusKind::PureTone => {
                StimulusParameters::PureTone(PureToneParameters::new(frequency))
            }
        };
    } else if kind != config.stimulus.kind() {
        bail!("stimulus kind {} needs its parameters on the command line", kind);
    }
    if let Some(phase) = args.phase {
        config.phase = phase;
    }
    if let Some(bits) = args.bits {
        config.dac_resolution = bits;
    }

    config.validate().context("invalid generator settings")?;
    Ok(config)
}

fn wav_width(resolution: u16) -> Result<u16> {
    match resolution {
        1..=8 => Ok(8),
        9..=16 => Ok(16),
        17..=32 => Ok(32),
        other => bail!("no WAV sample width holds a {}-bit DAC", other),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    if args.show_config {
        println!("{}", config.to_json_pretty()?);
    }

    let sample_rate = config.sampling_frequency.round() as u32;
    let export = ExportConfig::new(sample_rate)
        .bits(wav_width(config.dac_resolution)?)
        .duration(args.duration);

    let mut tone = config.build_pure_tone()?;
    tracing::info!(
        frequency = tone.get_tone_frequency(),
        period_samples = tone.get_period_size_samples(),
        period_secs = tone.get_period_secs(),
        "tone ready"
    );

    let mut dac = config.dac_adapter(&mut tone);
    let summary = render_to_wav(&mut dac, &args.output, export)
        .with_context(|| format!("rendering {}", args.output.display()))?;

    println!(
        "Wrote {} of {} samples ({} Hz, {} bit) to {}",
        summary.written,
        summary.requested,
        export.sample_rate,
        export.bits,
        args.output.display()
    );
    if let Some(sync) = summary.first_sync {
        println!("First period boundary at sample {}", sync);
    }
    if !summary.is_complete() {
        bail!("stimulus stopped before the requested duration");
    }
    Ok(())
}

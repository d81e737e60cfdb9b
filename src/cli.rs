//! Command-line argument parsing.

use crate::error::SynthError;
use crate::patch_yaml::{load_patch, Patch};
use crate::settings::{Normalization, Settings, MAX_OSCILLATORS};
use crate::synth::OscillatorConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "mixing-deck")]
#[command(about = "Mix up to three oscillators to hear and see beats", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log debugging information
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the mixed waveform and print it as JSON
    Synthesize(SynthesizeArgs),
    /// Render the mix and print its magnitude spectrum as JSON
    Spectrum(SpectrumArgs),
}

#[derive(clap::Args, Debug)]
pub struct SynthesizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Render the short visualization window instead of the playback duration
    #[arg(long)]
    pub preview: bool,

    /// Also write the mix to a WAV file
    #[arg(long, value_name = "FILE")]
    pub wav: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SpectrumArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Highest frequency reported (Hz)
    #[arg(long, value_name = "HZ")]
    pub max_frequency: Option<f64>,
}

/// Where the oscillators and settings come from. Shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// YAML patch with settings and oscillators
    #[arg(long, value_name = "FILE")]
    pub patch: Option<PathBuf>,

    /// Inline oscillator, appended after the patch ones (e.g. 440:sine:100)
    #[arg(long = "osc", value_name = "FREQ:WAVE[:VOLUME]", value_parser = parse_oscillator)]
    pub oscillators: Vec<OscillatorConfig>,

    /// Sample rate (Hz)
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Rendered duration (seconds), overriding the configured one
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Normalization policy: peak-limit or divide-by-count
    #[arg(long, value_name = "POLICY", value_parser = parse_normalization)]
    pub normalization: Option<Normalization>,

    /// Pretty print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl InputArgs {
    /// Merges patch, inline oscillators and overrides into a validated [Patch].
    pub fn resolve(&self) -> Result<Patch, SynthError> {
        let mut patch = match &self.patch {
            Some(path) => load_patch(path)?,
            None => Patch {
                settings: Settings::default(),
                oscillators: Vec::new(),
            },
        };

        patch.oscillators.extend(self.oscillators.iter().cloned());
        if patch.oscillators.len() > MAX_OSCILLATORS {
            return Err(SynthError::TooManyOscillators {
                given: patch.oscillators.len(),
                max: MAX_OSCILLATORS,
            });
        }

        if let Some(sample_rate) = self.sample_rate {
            patch.settings.sample_rate = sample_rate;
        }
        if let Some(normalization) = self.normalization {
            patch.settings.normalization = normalization;
        }
        patch.settings.validate()?;

        Ok(patch)
    }
}

fn parse_oscillator(s: &str) -> Result<OscillatorConfig, SynthError> {
    s.parse()
}

fn parse_normalization(s: &str) -> Result<Normalization, SynthError> {
    s.parse()
}

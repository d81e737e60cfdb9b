mod back_end;
mod cli;
mod error;
mod parameter;
mod patch_yaml;
mod response;
mod settings;
mod synth;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use serde::Serialize;
use std::io::Write;

// DEBUGGING, LOGGING
use simplelog::*;

// MY STUFF
use cli::{Args, Command, InputArgs, SpectrumArgs, SynthesizeArgs};
use response::{SpectrumResponse, SynthesizeResponse};
use settings::RenderMode;
use synth::{OscillatorConfig, Synthesizer};

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    // LOGGER INIT
    // stdout carries the JSON payload
    TermLogger::init(
        if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("Failed to start simplelog")?;

    #[cfg(feature = "verbose_modules")]
    warn!("<red><b>Verbose modules</> prints every oscillator of every render.");

    match args.command {
        Command::Synthesize(synth_args) => synthesize(synth_args),
        Command::Spectrum(spectrum_args) => spectrum(spectrum_args),
    }
}

fn synthesize(args: SynthesizeArgs) -> Result<(), anyhow::Error> {
    let patch = args.input.resolve()?;
    log_oscillators(&patch.oscillators);
    let synth = Synthesizer::new(patch.settings)?;

    let mode = if args.preview {
        RenderMode::Preview
    } else {
        RenderMode::Standard
    };
    let buffer = match args.input.duration {
        Some(duration) => synth.generate(&patch.oscillators, duration)?,
        None => synth.render(&patch.oscillators, mode)?,
    };
    if buffer.is_empty() {
        warn!("<b>Rendered <yellow>no samples</><b>.</>");
    } else {
        info!("<b>Mix peaks at <cyan>{:.3}</>", buffer.peak());
    }

    if let Some(path) = &args.wav {
        back_end::write_wav(path, &buffer)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    print_json(&SynthesizeResponse::new(buffer, mode), &args.input)?;
    info!("<green><tick></> <b>Program finished <green>successfully</>");
    Ok(())
}

fn spectrum(args: SpectrumArgs) -> Result<(), anyhow::Error> {
    let mut patch = args.input.resolve()?;
    log_oscillators(&patch.oscillators);
    if let Some(max_frequency) = args.max_frequency {
        patch.settings.spectrum_max_frequency = max_frequency;
    }
    let synth = Synthesizer::new(patch.settings)?;

    let duration = args
        .input
        .duration
        .unwrap_or(synth.get_settings().playback_duration);

    let spectrum = synth.analyze(&patch.oscillators, duration)?;
    info!(
        "<b>Spectrum holds <cyan>{}</> <b>bins of {:.3} Hz</>",
        spectrum.len(),
        spectrum.resolution()
    );
    if let Some((freq, magnitude)) = spectrum.peak() {
        info!("<b>Strongest bin: <cyan>{} Hz</> <b>({})</>", freq, magnitude);
    }

    let response = SpectrumResponse::new(spectrum, synth.get_settings().sample_rate, duration);
    print_json(&response, &args.input)?;
    info!("<green><tick></> <b>Program finished <green>successfully</>");
    Ok(())
}

fn log_oscillators(oscillators: &[OscillatorConfig]) {
    for (index, osc) in oscillators.iter().enumerate() {
        debug!("Oscillator {}: {}", index, osc);
    }
}

fn print_json<T: Serialize>(value: &T, input: &InputArgs) -> Result<(), anyhow::Error> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if input.pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;

    Ok(())
}

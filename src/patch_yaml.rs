//! Loads a deck patch (settings plus oscillators) from a YAML document.
//!
//! ```yaml
//! version: 0.1
//! settings:
//!   sample-rate: 44100
//!   playback-duration: 2.0
//!   normalization: peak-limit
//! oscillators:
//!   - oscillator:
//!       frequency: 440
//!       wave-type: sine
//!       volume: 100
//!       enabled: true
//!       adsr:
//!         attack: 0.1
//!         decay: 0.2
//!         sustain: 1.0
//!         release: 0.5
//! ```
//!
//! Every key but `version` is optional. Missing oscillator fields take the
//! [OscillatorBuilder] defaults and missing settings take the [Settings] defaults.

use crate::error::SynthError;
use crate::settings::{Settings, MAX_OSCILLATORS};
use crate::synth::{Envelope, OscillatorBuilder, OscillatorConfig, WaveShape};
use simplelog::{error, info};
use std::fs;
use std::path::Path;
use yaml_rust::{Yaml, YamlLoader};

const YAML_VERSION: f64 = 0.1;

/// Everything a patch file describes.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub settings: Settings,
    pub oscillators: Vec<OscillatorConfig>,
}

pub fn load_patch(path: &Path) -> Result<Patch, SynthError> {
    info!("<b>Loading patch from <red>{}</><b>.</>", path.display());
    let yaml = fs::read_to_string(path)?;
    parse_patch(&yaml)
}

pub fn parse_patch(source: &str) -> Result<Patch, SynthError> {
    let docs = YamlLoader::load_from_str(source)
        .map_err(|e| SynthError::InvalidPatch(format!("malformed YAML: {}", e)))?;
    let doc = docs
        .first()
        .ok_or_else(|| SynthError::InvalidPatch("empty document".to_string()))?;

    let version = as_number(&doc["version"], "version")?;
    if version != Some(YAML_VERSION) {
        error!("<b>Please use the <red>latest YAML</> <b>version.</>");
        return Err(SynthError::InvalidPatch(format!(
            "unsupported version {:?}, expected {}",
            version, YAML_VERSION
        )));
    }
    info!(
        "<b>Using <magenta>YAML parsing</> <b>version: <b><cyan>{}</>",
        YAML_VERSION
    );

    let settings = parse_settings(&doc["settings"])?;
    settings.validate()?;

    let oscillators = match &doc["oscillators"] {
        Yaml::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_oscillator(&item["oscillator"], index))
            .collect::<Result<Vec<_>, _>>()?,
        Yaml::BadValue | Yaml::Null => Vec::new(),
        _ => {
            return Err(SynthError::InvalidPatch(
                "'oscillators' must be a list".to_string(),
            ))
        }
    };

    if oscillators.len() > MAX_OSCILLATORS {
        return Err(SynthError::TooManyOscillators {
            given: oscillators.len(),
            max: MAX_OSCILLATORS,
        });
    }

    info!("<b>Patch loaded with {} oscillator(s).</>", oscillators.len());
    Ok(Patch {
        settings,
        oscillators,
    })
}

fn parse_settings(yaml: &Yaml) -> Result<Settings, SynthError> {
    let mut settings = Settings::default();

    if yaml.is_badvalue() || yaml.is_null() {
        return Ok(settings);
    }

    if let Some(sample_rate) = as_number(&yaml["sample-rate"], "sample-rate")? {
        if sample_rate.fract() != 0.0 || sample_rate <= 0.0 || sample_rate > u32::MAX as f64 {
            return Err(SynthError::InvalidSettings(format!(
                "sample rate must be a positive integer, got {}",
                sample_rate
            )));
        }
        settings.sample_rate = sample_rate as u32;
    }
    if let Some(duration) = as_number(&yaml["playback-duration"], "playback-duration")? {
        settings.playback_duration = duration;
    }
    if let Some(duration) = as_number(&yaml["preview-duration"], "preview-duration")? {
        settings.preview_duration = duration;
    }
    if let Some(max) = as_number(&yaml["spectrum-max-frequency"], "spectrum-max-frequency")? {
        settings.spectrum_max_frequency = max;
    }
    if let Some(normalization) = as_text(&yaml["normalization"], "normalization")? {
        settings.normalization = normalization.parse()?;
    }

    Ok(settings)
}

fn parse_oscillator(yaml: &Yaml, index: usize) -> Result<OscillatorConfig, SynthError> {
    info!("> Processing <cyan>oscillator {}</>", index);

    if yaml.is_badvalue() {
        return Err(SynthError::InvalidPatch(format!(
            "entry {} is not an 'oscillator' map",
            index
        )));
    }

    let mut builder = OscillatorBuilder::new();

    if let Some(frequency) = as_number(&yaml["frequency"], "frequency")? {
        info!("  |_ frequency: {}", frequency);
        builder = builder.with_frequency(frequency);
    }
    if let Some(wave_type) = as_text(&yaml["wave-type"], "wave-type")? {
        info!("  |_ wave type: {}", wave_type);
        builder = builder.with_wave_shape(wave_type.parse::<WaveShape>()?);
    }
    if let Some(volume) = as_number(&yaml["volume"], "volume")? {
        builder = builder.with_volume(volume);
    }
    match &yaml["enabled"] {
        Yaml::Boolean(enabled) => builder = builder.enabled(*enabled),
        Yaml::BadValue => {}
        _ => {
            return Err(SynthError::InvalidPatch(
                "'enabled' must be true or false".to_string(),
            ))
        }
    }

    let adsr = &yaml["adsr"];
    if !adsr.is_badvalue() {
        let stage = |tag: &str| -> Result<f64, SynthError> {
            Ok(as_number(&adsr[tag], tag)?.unwrap_or(0.0))
        };
        let envelope = Envelope::new(
            stage("attack")?,
            stage("decay")?,
            stage("sustain")?,
            stage("release")?,
        )?;
        info!("  |_ envelope: {}", envelope);
        builder = builder.with_envelope(envelope);
    }

    builder.build()
}

/// Reads integers and reals alike. `None` if the key is missing.
fn as_number(yaml: &Yaml, tag: &str) -> Result<Option<f64>, SynthError> {
    match yaml {
        Yaml::Real(_) => Ok(yaml.as_f64()),
        Yaml::Integer(value) => Ok(Some(*value as f64)),
        Yaml::BadValue => Ok(None),
        _ => Err(SynthError::InvalidPatch(format!(
            "'{}' must be a number",
            tag
        ))),
    }
}

fn as_text<'a>(yaml: &'a Yaml, tag: &str) -> Result<Option<&'a str>, SynthError> {
    match yaml {
        Yaml::String(value) => Ok(Some(value.as_str())),
        Yaml::BadValue => Ok(None),
        _ => Err(SynthError::InvalidPatch(format!("'{}' must be text", tag))),
    }
}

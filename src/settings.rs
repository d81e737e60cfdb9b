//! Process wide defaults. Nothing here changes once a [Settings] value has been built.

use crate::error::SynthError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const SAMPLE_RATE: u32 = 44100;
/// Seconds rendered for listening.
pub const PLAYBACK_DURATION: f64 = 2.0;
/// Seconds rendered for a readable waveform plot.
pub const PREVIEW_DURATION: f64 = 0.05;
/// Highest frequency kept in a spectrum. Covers the oscillator ceiling and its second harmonic.
pub const SPECTRUM_MAX_FREQUENCY: f64 = 4000.0;
pub const MAX_OSCILLATORS: usize = 3;
/// Largest buffer a single render may allocate. About six minutes at 44.1 kHz.
pub const MAX_SAMPLES: usize = 1 << 24;

/// Tolerance absorbed before truncating `sample_rate * duration`, so that durations such as
/// 0.7 s do not lose a sample to their binary representation.
const SAMPLE_COUNT_EPSILON: f64 = 1e-9;

/// How a mix of several oscillators is kept inside [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Leaves the mix alone unless it clips. A clipping mix is scaled so its peak lands on
    /// [HEADROOM](const@crate::synth::HEADROOM).
    #[default]
    PeakLimit,
    /// Divides the mix by the amount of enabled oscillators.
    DivideByCount,
}

impl FromStr for Normalization {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "peak-limit" | "peak" => Ok(Normalization::PeakLimit),
            "divide-by-count" | "count" => Ok(Normalization::DivideByCount),
            other => Err(SynthError::UnknownNormalization(other.to_string())),
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::PeakLimit => write!(f, "peak-limit"),
            Normalization::DivideByCount => write!(f, "divide-by-count"),
        }
    }
}

/// Which of the two configured durations a render uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Standard,
    Preview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sample_rate: u32,
    pub playback_duration: f64,
    pub preview_duration: f64,
    pub spectrum_max_frequency: f64,
    pub normalization: Normalization,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            playback_duration: PLAYBACK_DURATION,
            preview_duration: PREVIEW_DURATION,
            spectrum_max_frequency: SPECTRUM_MAX_FREQUENCY,
            normalization: Normalization::default(),
        }
    }
}

impl Settings {
    pub fn duration_for(&self, mode: RenderMode) -> f64 {
        match mode {
            RenderMode::Standard => self.playback_duration,
            RenderMode::Preview => self.preview_duration,
        }
    }

    pub fn validate(&self) -> Result<(), SynthError> {
        if self.sample_rate == 0 {
            return Err(SynthError::InvalidSettings(
                "sample rate must be greater than zero".to_string(),
            ));
        }

        for duration in [self.playback_duration, self.preview_duration] {
            validate_duration(duration)?;
            sample_count(self.sample_rate, duration)?;
        }

        if !self.spectrum_max_frequency.is_finite() || self.spectrum_max_frequency <= 0.0 {
            return Err(SynthError::InvalidSettings(format!(
                "spectrum max frequency must be positive, got {}",
                self.spectrum_max_frequency
            )));
        }

        Ok(())
    }
}

/// Configured durations must be a positive amount of seconds.
pub fn validate_duration(duration: f64) -> Result<(), SynthError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SynthError::InvalidSettings(format!(
            "duration must be a positive amount of seconds, got {}",
            duration
        )));
    }
    Ok(())
}

/// Amount of samples in `duration` seconds. Always truncates.
///
/// A zero duration gives an empty buffer. Negative or non finite durations, and renders longer
/// than [MAX_SAMPLES], are rejected.
pub fn sample_count(sample_rate: u32, duration: f64) -> Result<usize, SynthError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(SynthError::InvalidSettings(format!(
            "duration must be a non negative amount of seconds, got {}",
            duration
        )));
    }

    let count = (sample_rate as f64 * duration + SAMPLE_COUNT_EPSILON).floor();
    if count > MAX_SAMPLES as f64 {
        return Err(SynthError::InvalidSettings(format!(
            "{} s at {} Hz exceeds the limit of {} samples",
            duration, sample_rate, MAX_SAMPLES
        )));
    }

    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.sample_rate, 44100);
        assert_eq!(settings.playback_duration, 2.0);
        assert_eq!(settings.preview_duration, 0.05);
        assert_eq!(settings.normalization, Normalization::PeakLimit);
        assert!(settings.validate().is_ok(), "Defaults must be valid");
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(44100, 2.0).unwrap(), 88200);
        assert_eq!(sample_count(44100, 0.05).unwrap(), 2205);
        assert_eq!(
            sample_count(44100, 0.7).unwrap(),
            30870,
            "Representation error lost a sample"
        );
        assert_eq!(sample_count(44100, 0.00001).unwrap(), 0, "Must truncate");
        assert_eq!(sample_count(44100, 0.0).unwrap(), 0);
        assert!(sample_count(44100, f64::NAN).is_err());
        assert!(sample_count(44100, -0.1).is_err());
    }

    #[test]
    fn test_sample_count_limit() {
        let limit = MAX_SAMPLES as f64 / 44100.0;

        assert!(sample_count(44100, limit).is_ok(), "Limit itself must fit");
        assert!(matches!(
            sample_count(44100, 1e300),
            Err(SynthError::InvalidSettings(_))
        ));
        assert!(sample_count(u32::MAX, 1.0).is_err());
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = Settings::default();
        settings.sample_rate = 0;
        assert!(settings.validate().is_err(), "Zero sample rate accepted");

        let mut settings = Settings::default();
        settings.playback_duration = -1.0;
        assert!(settings.validate().is_err(), "Negative duration accepted");

        let mut settings = Settings::default();
        settings.preview_duration = f64::INFINITY;
        assert!(settings.validate().is_err(), "Infinite duration accepted");

        let mut settings = Settings::default();
        settings.preview_duration = 0.0;
        assert!(settings.validate().is_err(), "Zero configured duration accepted");

        let mut settings = Settings::default();
        settings.playback_duration = 3600.0;
        assert!(settings.validate().is_err(), "Oversized playback accepted");

        let mut settings = Settings::default();
        settings.spectrum_max_frequency = 0.0;
        assert!(settings.validate().is_err(), "Empty spectrum range accepted");
    }

    #[test]
    fn test_normalization_from_str() {
        assert_eq!(
            "peak-limit".parse::<Normalization>().unwrap(),
            Normalization::PeakLimit
        );
        assert_eq!(
            "Divide-By-Count".parse::<Normalization>().unwrap(),
            Normalization::DivideByCount
        );
        assert!("loudest".parse::<Normalization>().is_err());
    }

    #[test]
    fn test_duration_for() {
        let settings = Settings::default();

        assert_eq!(settings.duration_for(RenderMode::Standard), PLAYBACK_DURATION);
        assert_eq!(settings.duration_for(RenderMode::Preview), PREVIEW_DURATION);
    }
}

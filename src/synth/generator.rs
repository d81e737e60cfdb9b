use super::buffer::SampleBuffer;
use super::mixer::Mixer;
use super::osc::OscillatorConfig;
use super::spectrum::{analyze_buffer, SpectrumResult};
use crate::error::SynthError;
use crate::settings::{sample_count, RenderMode, Settings, MAX_OSCILLATORS};
use simplelog::{info, warn};

/// Turns oscillator configurations into samples and spectra.
///
/// The synthesizer keeps nothing between calls: every render starts from scratch, so the same
/// input always gives back the same output.
///
/// # Usage
/// ```rust,ignore
/// let oscillators = vec![
///     OscillatorBuilder::new().with_frequency(440.0).build()?,
///     OscillatorBuilder::new().with_frequency(436.0).build()?,
/// ];
///
/// let synth = Synthesizer::new(Settings::default())?;
/// let buffer = synth.render(&oscillators, RenderMode::Preview)?;
/// let spectrum = synth.analyze(&oscillators, 1.0)?;
/// ```
#[derive(Debug, Clone)]
pub struct Synthesizer {
    settings: Settings,
    mixer: Mixer,
}

impl Default for Synthesizer {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            mixer: Mixer::new(settings.normalization),
            settings,
        }
    }
}

impl Synthesizer {
    pub fn new(settings: Settings) -> Result<Self, SynthError> {
        settings.validate()?;

        Ok(Self {
            mixer: Mixer::new(settings.normalization),
            settings,
        })
    }

    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Renders the mix of every enabled oscillator for `duration` seconds.
    ///
    /// A zero duration gives back an empty buffer.
    ///
    /// # Expected errors
    /// * More than [MAX_OSCILLATORS] oscillators.
    /// * A negative or non finite duration.
    /// * A render longer than [MAX_SAMPLES](const@crate::settings::MAX_SAMPLES) samples.
    pub fn generate(
        &self,
        oscillators: &[OscillatorConfig],
        duration: f64,
    ) -> Result<SampleBuffer, SynthError> {
        check_oscillator_count(oscillators)?;

        let sample_rate = self.settings.sample_rate;
        let samples = sample_count(sample_rate, duration)?;

        let enabled: Vec<&OscillatorConfig> =
            oscillators.iter().filter(|osc| osc.is_enabled()).collect();

        if enabled.is_empty() {
            if !oscillators.is_empty() {
                warn!("<b>Every oscillator is <yellow>disabled</><b>. Rendering silence.</>");
            }
            return Ok(SampleBuffer::silent(samples, sample_rate, duration));
        }

        info!(
            "<b>Rendering <cyan>{}</> <b>samples from {} oscillator(s)</>",
            samples,
            enabled.len()
        );

        let voices: Vec<Vec<f32>> = enabled
            .iter()
            .map(|osc| {
                #[cfg(feature = "verbose_modules")]
                info!("  |_ {}", osc);

                osc.render(sample_rate, samples)
            })
            .collect();

        Ok(SampleBuffer::new(
            self.mixer.mix(&voices, samples),
            sample_rate,
            duration,
        ))
    }

    /// Renders with the duration configured for `mode`.
    pub fn render(
        &self,
        oscillators: &[OscillatorConfig],
        mode: RenderMode,
    ) -> Result<SampleBuffer, SynthError> {
        self.generate(oscillators, self.settings.duration_for(mode))
    }

    /// Renders the mix for `duration` seconds and returns its spectrum, truncated at the
    /// configured maximum frequency.
    pub fn analyze(
        &self,
        oscillators: &[OscillatorConfig],
        duration: f64,
    ) -> Result<SpectrumResult, SynthError> {
        let buffer = self.generate(oscillators, duration)?;
        Ok(self.analyze_buffer(&buffer))
    }

    /// Spectrum of an already rendered buffer.
    pub fn analyze_buffer(&self, buffer: &SampleBuffer) -> SpectrumResult {
        analyze_buffer(buffer, self.settings.spectrum_max_frequency)
    }
}

fn check_oscillator_count(oscillators: &[OscillatorConfig]) -> Result<(), SynthError> {
    if oscillators.len() > MAX_OSCILLATORS {
        return Err(SynthError::TooManyOscillators {
            given: oscillators.len(),
            max: MAX_OSCILLATORS,
        });
    }
    Ok(())
}

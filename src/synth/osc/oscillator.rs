use super::oscillator_math::WaveShape;
use crate::error::SynthError;
use crate::parameter;
use crate::synth::envelope::Envelope;
use std::fmt;
use std::str::FromStr;

/// One of the (up to three) sources of the deck. It renders a raw signal following the
/// properties defined by its attributes.
///
/// # Usage
/// To get a **new oscillator**, use the [OscillatorBuilder] instead. The builder is the only
/// way in, so an [OscillatorConfig] always holds values inside their ranges.
///
/// # Parameters
/// * **Frequency (f)**: the tone, from 20 Hz to 2 kHz.
/// * **Wave shape**: sine, triangle, sawtooth or square.
/// * **Volume (A)**: the gain, given as a percentage and stored as a fraction of one.
/// * **Enabled**: a disabled oscillator is skipped altogether, even when normalizing the mix.
/// * **Envelope**: optional [Envelope] shaping the volume over time.
///
/// # Behaviour
/// The value at sample `i` follows:
///
/// `x = A * shape(f * t)` with `t = i / sample_rate`
///
/// multiplied, if present, by the envelope gain at that sample.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorConfig {
    frequency: f64,
    wave_shape: WaveShape,
    /// Fraction of one
    volume: f64,
    enabled: bool,
    envelope: Option<Envelope>,
}

impl OscillatorConfig {
    pub fn get_frequency(&self) -> f64 {
        self.frequency
    }

    pub fn get_wave_shape(&self) -> WaveShape {
        self.wave_shape
    }

    /// Volume as a fraction in [0, 1].
    pub fn get_amplitude(&self) -> f64 {
        self.volume
    }

    /// Volume as a percentage in [0, 100].
    pub fn get_volume(&self) -> f64 {
        self.volume * 100.0
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// Renders `sample_count` samples of this oscillator alone, ignoring the enabled flag.
    pub fn render(&self, sample_rate: u32, sample_count: usize) -> Vec<f32> {
        let sample_rate_f = sample_rate as f64;
        let amplitude = self.get_amplitude();

        let mut samples: Vec<f32> = (0..sample_count)
            .map(|i| {
                let t = i as f64 / sample_rate_f;
                (amplitude * self.wave_shape.sample(self.frequency * t)) as f32
            })
            .collect();

        if let Some(envelope) = &self.envelope {
            let gain = envelope.render(sample_rate, sample_count);
            samples
                .iter_mut()
                .zip(gain.iter())
                .for_each(|(sample, gain)| *sample *= gain);
        }

        samples
    }
}

impl fmt::Display for OscillatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz {} at {}%",
            self.get_frequency(),
            self.get_wave_shape(),
            self.get_volume()
        )?;
        if let Some(envelope) = self.get_envelope() {
            write!(f, " with {}", envelope)?;
        }
        if !self.is_enabled() {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}

/// Parses the inline form `FREQ:WAVE[:VOLUME]`, e.g. `440:sine:80`. Volume defaults to 100%.
impl FromStr for OscillatorConfig {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').map(|field| field.trim()).collect();

        if fields.len() < 2 || fields.len() > 3 {
            return Err(SynthError::InvalidOscillator(s.to_string()));
        }

        let frequency: f64 = fields[0]
            .parse()
            .map_err(|_| SynthError::InvalidOscillator(s.to_string()))?;
        let wave_shape: WaveShape = fields[1].parse()?;

        let mut builder = OscillatorBuilder::new()
            .with_frequency(frequency)
            .with_wave_shape(wave_shape);

        if let Some(volume) = fields.get(2) {
            let volume: f64 = volume
                .parse()
                .map_err(|_| SynthError::InvalidOscillator(s.to_string()))?;
            builder = builder.with_volume(volume);
        }

        builder.build()
    }
}

/// The [OscillatorBuilder] is the proper way of generating an [OscillatorConfig].
/// # Usage
/// ```rust
/// let osc = OscillatorBuilder::new().build().unwrap(); // Default oscillator
///
/// let osc = OscillatorBuilder::new() // With most values
///     .with_frequency(436.0)
///     .with_wave_shape(WaveShape::Square)
///     .with_volume(50.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct OscillatorBuilder {
    frequency: Option<f64>,
    wave_shape: Option<WaveShape>,
    volume: Option<f64>,
    enabled: Option<bool>,
    envelope: Option<Envelope>,
}

impl OscillatorBuilder {
    /// Sets the defaults for the oscillator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frequency, in Hz.
    pub fn with_frequency(mut self, freq: f64) -> Self {
        self.frequency = Some(freq);
        self
    }

    pub fn with_wave_shape(mut self, shape: WaveShape) -> Self {
        self.wave_shape = Some(shape);
        self
    }

    /// Sets the volume, as a percentage.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Tries to generate an oscillator from the given configuration.
    ///
    /// # Default values:
    /// * Frequency: 440 Hz
    /// * Wave shape: sine
    /// * Volume: 100%
    /// * Enabled: yes
    /// * Envelope: none
    ///
    /// # Expected errors
    /// * Frequency or volume out of range, or not a finite number.
    pub fn build(self) -> Result<OscillatorConfig, SynthError> {
        let frequency = parameter::frequency().check(self.frequency.unwrap_or(440.0))?;
        let volume = parameter::volume().check(self.volume.unwrap_or(100.0))?;

        Ok(OscillatorConfig {
            frequency,
            wave_shape: self.wave_shape.unwrap_or_default(),
            volume: volume / 100.0,
            enabled: self.enabled.unwrap_or(true),
            envelope: self.envelope,
        })
    }
}

/// Amplitude over time, produced once by the [Synthesizer](struct@crate::synth::Synthesizer)
/// and never modified afterwards.
///
/// The time axis is implicit: sample `i` happens at `i / sample_rate` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    duration: f64,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, duration: f64) -> Self {
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    /// An all zero buffer of `sample_count` samples.
    pub fn silent(sample_count: usize, sample_rate: u32, duration: f64) -> Self {
        Self::new(vec![0.0; sample_count], sample_rate, duration)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

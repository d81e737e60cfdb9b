//! The **mixer** adds the signal of every enabled oscillator.
//!
//! # Behavior
//! Voices get summed sample by sample, and then the mix is normalized following the configured
//! [Normalization] policy so that no sample falls outside [-1, 1].
//!
//! # Warning
//! Summing three full volume oscillators easily reaches 3.0 in absolute value. The policy is
//! what keeps that from clipping once the buffer hits a sound card, so it is always applied.

use crate::settings::Normalization;
#[cfg(feature = "verbose_modules")]
use simplelog::info;

/// Peak level of a mix scaled down by [Normalization::PeakLimit].
pub const HEADROOM: f32 = 0.95;

#[derive(Debug, Clone, Copy, Default)]
pub struct Mixer {
    normalization: Normalization,
}

impl Mixer {
    pub fn new(normalization: Normalization) -> Self {
        Self { normalization }
    }

    /// Sums the voices into a buffer of `sample_count` samples and normalizes the result.
    ///
    /// Every voice counts as an enabled oscillator. An empty list gives back silence.
    pub fn mix(&self, voices: &[Vec<f32>], sample_count: usize) -> Vec<f32> {
        let mut mixed = vec![0.0f32; sample_count];

        for voice in voices.iter() {
            mixed
                .iter_mut()
                .zip(voice.iter())
                .for_each(|(out, sample)| *out += sample);
        }

        self.normalize(&mut mixed, voices.len());
        mixed
    }

    fn normalize(&self, mixed: &mut [f32], voice_count: usize) {
        if voice_count == 0 {
            return;
        }

        match self.normalization {
            Normalization::PeakLimit => {
                let peak = mixed.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));

                if peak > 1.0 {
                    #[cfg(feature = "verbose_modules")]
                    info!("<b>Mix peaks at <yellow>{}</><b>, scaling down</>", peak);

                    let gain = HEADROOM / peak;
                    mixed.iter_mut().for_each(|s| *s *= gain);
                }
            }
            Normalization::DivideByCount => {
                let count = voice_count as f32;
                mixed.iter_mut().for_each(|s| *s /= count);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_mix() {
        let mixer = Mixer::default();

        assert_eq!(mixer.mix(&[], 16), vec![0.0; 16]);
    }

    #[test]
    fn test_peak_limit_keeps_quiet_mix() {
        let mixer = Mixer::new(Normalization::PeakLimit);
        let voices = vec![vec![0.25, -0.5, 0.1], vec![0.25, 0.0, -0.2]];

        let mixed = mixer.mix(&voices, 3);
        assert_eq!(mixed, vec![0.5, -0.5, -0.1], "A mix within range must be left alone");
    }

    #[test]
    fn test_peak_limit_scales_loud_mix() {
        let mixer = Mixer::new(Normalization::PeakLimit);
        let voices = vec![vec![1.0, -1.0, 0.5], vec![1.0, -0.5, 0.5]];

        let mixed = mixer.mix(&voices, 3);
        assert!((mixed[0] - HEADROOM).abs() < 1e-6, "Peak must land on the headroom");
        assert!((mixed[1] + 0.75 * HEADROOM).abs() < 1e-6, "Shape must be preserved");
        assert!((mixed[2] - 0.5 * HEADROOM).abs() < 1e-6, "Shape must be preserved");
    }

    #[test]
    fn test_divide_by_count() {
        let mixer = Mixer::new(Normalization::DivideByCount);
        let voices = vec![vec![1.0, 0.3], vec![1.0, 0.3], vec![1.0, 0.3]];

        let mixed = mixer.mix(&voices, 2);
        assert!((mixed[0] - 1.0).abs() < 1e-6);
        assert!((mixed[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_divide_by_count_single_voice() {
        let mixer = Mixer::new(Normalization::DivideByCount);

        assert_eq!(mixer.mix(&[vec![0.5, -0.5]], 2), vec![0.5, -0.5]);
    }
}

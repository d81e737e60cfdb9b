//! An [ADSR](https://en.wikipedia.org/wiki/Envelope_(music)) envelope shaping the volume of a
//! single oscillator over the whole render.
//!
//! # Behaviour
//! Every stage is a **time** in seconds, the sustain included: the envelope holds
//! [SUSTAIN_LEVEL] for `sustain` seconds and then releases. Whatever is left of the buffer after
//! the release stays silent.
//!
//! If the four stages do not fit in the buffer, they get shrunk proportionally.

use crate::error::SynthError;
use crate::parameter::envelope_stage;
use std::fmt;

/// Level held during the sustain stage.
pub const SUSTAIN_LEVEL: f32 = 0.7;
/// Shortest attack allowed, in seconds. Avoids clicks at the start of the render.
pub const MIN_ATTACK: f64 = 0.01;
/// Buffers shorter than this get a flat envelope at [SUSTAIN_LEVEL].
const MIN_ENVELOPE_SAMPLES: usize = 100;
/// Longest stage, in samples. Keeps the sum of the four stages finite.
const MAX_STAGE_SAMPLES: f64 = f64::MAX / 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
}

impl Envelope {
    /// Creates an envelope. Every stage must be a finite, non negative amount of seconds.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Result<Self, SynthError> {
        Ok(Self {
            attack: envelope_stage("attack").check(attack)?,
            decay: envelope_stage("decay").check(decay)?,
            sustain: envelope_stage("sustain").check(sustain)?,
            release: envelope_stage("release").check(release)?,
        })
    }

    pub fn get_attack(&self) -> f64 {
        self.attack
    }

    pub fn get_decay(&self) -> f64 {
        self.decay
    }

    pub fn get_sustain(&self) -> f64 {
        self.sustain
    }

    pub fn get_release(&self) -> f64 {
        self.release
    }

    /// Renders the gain curve for a buffer of `total_samples` samples.
    pub fn render(&self, sample_rate: u32, total_samples: usize) -> Vec<f32> {
        if total_samples < MIN_ENVELOPE_SAMPLES {
            return vec![SUSTAIN_LEVEL; total_samples];
        }

        // Stage lengths stay in f64 until they fit the buffer
        let to_samples =
            |seconds: f64| (seconds * sample_rate as f64).floor().min(MAX_STAGE_SAMPLES);
        let stages = [
            to_samples(self.attack.max(MIN_ATTACK)),
            to_samples(self.decay),
            to_samples(self.sustain),
            to_samples(self.release),
        ];

        let stages_total: f64 = stages.iter().sum();
        let [attack, decay, sustain, release] = if stages_total > total_samples as f64 {
            let scale = total_samples as f64 / stages_total;
            stages.map(|samples| ((samples * scale) as usize).max(1))
        } else {
            stages.map(|samples| samples as usize)
        };

        let mut envelope = vec![0.0f32; total_samples];
        let mut current = 0usize;

        // ATTACK
        if attack > 0 {
            let end = (current + attack).min(total_samples);
            fill_ramp(&mut envelope[current..end], 0.0, 1.0);
            current = end;
        } else {
            envelope[current] = 1.0;
        }

        // DECAY
        if decay > 0 && current < total_samples {
            let end = (current + decay).min(total_samples);
            fill_ramp(&mut envelope[current..end], 1.0, SUSTAIN_LEVEL);
            current = end;
        } else if decay == 0 && current < total_samples {
            envelope[current] = SUSTAIN_LEVEL;
        }

        // SUSTAIN
        if sustain > 0 && current < total_samples {
            let end = (current + sustain).min(total_samples);
            envelope[current..end].fill(SUSTAIN_LEVEL);
            current = end;
        }

        // RELEASE
        if release > 0 && current < total_samples {
            let end = (current + release).min(total_samples);
            fill_ramp(&mut envelope[current..end], SUSTAIN_LEVEL, 0.0);
        }

        envelope
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ADSR {}/{}/{}/{} s",
            self.get_attack(),
            self.get_decay(),
            self.get_sustain(),
            self.get_release()
        )
    }
}

/// Linear ramp including both ends.
fn fill_ramp(segment: &mut [f32], from: f32, to: f32) {
    let steps = segment.len();
    if steps == 1 {
        segment[0] = from;
        return;
    }

    for (i, value) in segment.iter_mut().enumerate() {
        *value = from + (to - from) * (i as f32 / (steps - 1) as f32);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::settings::SAMPLE_RATE;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn test_invalid_stages() {
        assert!(Envelope::new(-0.1, 0.1, 0.1, 0.1).is_err(), "Negative attack");
        assert!(Envelope::new(0.1, f64::NAN, 0.1, 0.1).is_err(), "NaN decay");
        assert!(Envelope::new(0.1, 0.1, 0.1, f64::INFINITY).is_err(), "Infinite release");
        assert!(Envelope::new(0.0, 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_stages() {
        // 0.1 s each at 1 kHz: 100 samples per stage, 500 samples in total
        let envelope = Envelope::new(0.1, 0.1, 0.1, 0.1).unwrap();
        let curve = envelope.render(1000, 500);

        assert_eq!(curve.len(), 500, "Length mismatch");
        assert_eq!(curve[0], 0.0, "Attack must start silent");
        assert!((curve[99] - 1.0).abs() < TOLERANCE, "Attack must reach full level");
        assert!((curve[199] - SUSTAIN_LEVEL).abs() < TOLERANCE, "Decay must reach sustain");
        assert!(curve[200..300]
            .iter()
            .all(|v| (v - SUSTAIN_LEVEL).abs() < TOLERANCE));
        assert!(curve[399].abs() < TOLERANCE, "Release must end silent");
        assert!(curve[400..].iter().all(|v| *v == 0.0), "Tail must be silent");
    }

    #[test]
    fn test_monotonic_attack() {
        let envelope = Envelope::new(0.05, 0.0, 0.5, 0.0).unwrap();
        let curve = envelope.render(SAMPLE_RATE, SAMPLE_RATE as usize);

        let attack = (0.05 * SAMPLE_RATE as f64) as usize;
        assert!(curve[..attack].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_minimum_attack() {
        let envelope = Envelope::new(0.0, 0.0, 0.0, 0.0).unwrap();
        let curve = envelope.render(1000, 200);

        // 0.01 s at 1 kHz
        assert_eq!(curve[0], 0.0);
        assert!((curve[9] - 1.0).abs() < TOLERANCE);
        assert!((curve[10] - SUSTAIN_LEVEL).abs() < TOLERANCE, "Empty decay jumps to sustain");
        assert!(curve[11..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_stages_get_shrunk() {
        // 4 seconds of stages in a 1 second buffer
        let envelope = Envelope::new(1.0, 1.0, 1.0, 1.0).unwrap();
        let curve = envelope.render(1000, 1000);

        assert_eq!(curve.len(), 1000);
        assert!((curve[249] - 1.0).abs() < TOLERANCE, "Attack not shrunk");
        assert!((curve[499] - SUSTAIN_LEVEL).abs() < TOLERANCE, "Decay not shrunk");
        assert!(curve[999].abs() < TOLERANCE, "Release not shrunk");
    }

    #[test]
    fn test_huge_stages_get_shrunk() {
        let envelope = Envelope::new(1e15, 1e15, 0.0, 0.0).unwrap();
        let curve = envelope.render(1000, 1000);

        assert_eq!(curve.len(), 1000);
        assert_eq!(curve[0], 0.0, "Attack must start silent");
        assert!(curve.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(
            curve.iter().any(|v| (v - 1.0).abs() < TOLERANCE),
            "Attack never reached full level"
        );
        assert!(
            (curve[999] - SUSTAIN_LEVEL).abs() < TOLERANCE,
            "Decay must end on sustain"
        );

        let envelope = Envelope::new(f64::MAX, 0.0, 0.0, f64::MAX).unwrap();
        let curve = envelope.render(SAMPLE_RATE, 1000);
        assert!(curve.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_display() {
        let envelope = Envelope::new(0.1, 0.0, 0.5, 0.25).unwrap();

        assert_eq!(envelope.to_string(), "ADSR 0.1/0/0.5/0.25 s");
    }

    #[test]
    fn test_short_buffer() {
        let envelope = Envelope::new(0.1, 0.1, 0.1, 0.1).unwrap();
        let curve = envelope.render(SAMPLE_RATE, 50);

        assert_eq!(curve, vec![SUSTAIN_LEVEL; 50]);
    }
}

//! Magnitude spectrum of a [SampleBuffer], through a discrete Fourier transform.

use super::buffer::SampleBuffer;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;
use simplelog::debug;

/// Absorbs rounding when locating the last bin below the truncation frequency.
const BIN_EPSILON: f64 = 1e-9;

/// Two parallel sequences: the frequency of each bin (Hz) and its magnitude.
///
/// Magnitudes are one sided amplitudes, so a full scale sine sitting exactly on a bin shows up
/// with a magnitude of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumResult {
    frequencies: Vec<f32>,
    magnitudes: Vec<f32>,
    /// Width of a bin in Hz. Zero for an empty spectrum.
    resolution: f64,
}

impl SpectrumResult {
    pub fn empty() -> Self {
        Self {
            frequencies: Vec::new(),
            magnitudes: Vec::new(),
            resolution: 0.0,
        }
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency and magnitude of the strongest bin, if any bin holds energy.
    pub fn peak(&self) -> Option<(f32, f32)> {
        self.frequencies()
            .iter()
            .zip(self.magnitudes().iter())
            .filter(|(_, magnitude)| **magnitude > 0.0)
            .fold(None, |best: Option<(f32, f32)>, (freq, magnitude)| match best {
                Some((_, best_magnitude)) if best_magnitude >= *magnitude => best,
                _ => Some((*freq, *magnitude)),
            })
    }
}

/// Transforms the whole buffer (no window, no padding) and keeps the bins between 0 Hz and
/// `max_frequency`, or the Nyquist frequency if that comes first.
///
/// Bin `k` sits at `k * sample_rate / N`. Its magnitude is `|X[k]| * 2 / N`, except for the DC
/// bin and the Nyquist bin, which appear only once in the full spectrum and use `|X[k]| / N`.
pub fn analyze_buffer(buffer: &SampleBuffer, max_frequency: f64) -> SpectrumResult {
    let n = buffer.len();
    if n == 0 || buffer.sample_rate() == 0 {
        return SpectrumResult::empty();
    }

    let sample_rate = buffer.sample_rate() as f64;
    let resolution = sample_rate / n as f64;
    let nyquist_bin = n / 2;

    let last_bin = if max_frequency.is_finite() && max_frequency >= 0.0 {
        ((max_frequency / resolution + BIN_EPSILON).floor() as usize).min(nyquist_bin)
    } else {
        nyquist_bin
    };

    debug!(
        "Spectrum of {} samples: {} bins of {:.3} Hz",
        n,
        last_bin + 1,
        resolution
    );

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut spectrum: Vec<Complex<f64>> = buffer
        .samples()
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();

    fft.process(&mut spectrum);

    let (frequencies, magnitudes) = spectrum[..=last_bin]
        .iter()
        .enumerate()
        .map(|(k, bin)| {
            let single = k == 0 || (n % 2 == 0 && k == nyquist_bin);
            let scale = (if single { 1.0 } else { 2.0 }) / n as f64;

            ((k as f64 * resolution) as f32, (bin.norm() * scale) as f32)
        })
        .unzip();

    SpectrumResult {
        frequencies,
        magnitudes,
        resolution,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, amplitude: f64, sample_rate: u32, n: usize) -> SampleBuffer {
        let samples = (0..n)
            .map(|i| (amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin()) as f32)
            .collect();
        SampleBuffer::new(samples, sample_rate, n as f64 / sample_rate as f64)
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = SampleBuffer::new(vec![], 44100, 0.0);

        assert!(analyze_buffer(&buffer, 4000.0).is_empty());
        assert_eq!(analyze_buffer(&buffer, 4000.0).peak(), None);
    }

    #[test]
    fn test_silent_buffer() {
        let buffer = SampleBuffer::silent(4410, 44100, 0.1);
        let spectrum = analyze_buffer(&buffer, 4000.0);

        // 10 Hz bins from 0 up to 4 kHz
        assert_eq!(spectrum.len(), 401, "Bin count mismatch");
        assert!(spectrum.magnitudes().iter().all(|m| *m == 0.0));
        assert_eq!(spectrum.peak(), None);
    }

    #[test]
    fn test_unit_sine_magnitude() {
        let buffer = tone(1000.0, 1.0, 8000, 800);
        let spectrum = analyze_buffer(&buffer, f64::INFINITY);

        let (freq, magnitude) = spectrum.peak().unwrap();
        assert_eq!(freq, 1000.0, "Peak misplaced");
        assert!((magnitude - 1.0).abs() < 1e-4, "Amplitude not preserved: {}", magnitude);
    }

    #[test]
    fn test_dc_bin() {
        let buffer = SampleBuffer::new(vec![0.5; 100], 1000, 0.1);
        let spectrum = analyze_buffer(&buffer, 500.0);

        assert!((spectrum.magnitudes()[0] - 0.5).abs() < 1e-6, "DC is not scaled by 1/N");
        assert!(spectrum.magnitudes()[1..].iter().all(|m| m.abs() < 1e-6));
    }

    #[test]
    fn test_truncation() {
        let buffer = tone(100.0, 1.0, 8000, 800);

        let spectrum = analyze_buffer(&buffer, 1000.0);
        assert_eq!(spectrum.len(), 101);
        assert_eq!(*spectrum.frequencies().last().unwrap(), 1000.0);

        let spectrum = analyze_buffer(&buffer, 1e9);
        assert_eq!(spectrum.len(), 401, "Must stop at Nyquist");
        assert_eq!(*spectrum.frequencies().last().unwrap(), 4000.0);
    }

    #[test]
    fn test_odd_length() {
        let buffer = tone(100.0, 1.0, 1000, 101);
        let spectrum = analyze_buffer(&buffer, f64::INFINITY);

        assert_eq!(spectrum.len(), 51, "Odd buffers keep (N - 1) / 2 + 1 bins");
        assert!(spectrum.frequencies().iter().all(|f| *f < 500.0));
    }
}

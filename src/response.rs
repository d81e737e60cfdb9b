//! What the deck hands back to its caller, ready to be serialized.

use crate::settings::RenderMode;
use crate::synth::{SampleBuffer, SpectrumResult};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingInfo {
    pub total_duration_seconds: f64,
    pub total_duration_milliseconds: f64,
    pub sample_rate_hz: u32,
    pub sample_count: usize,
}

impl TimingInfo {
    pub fn from_buffer(buffer: &SampleBuffer) -> Self {
        Self {
            total_duration_seconds: buffer.duration(),
            total_duration_milliseconds: buffer.duration() * 1000.0,
            sample_rate_hz: buffer.sample_rate(),
            sample_count: buffer.len(),
        }
    }
}

/// Reply to a synthesize request. The time axis is rebuilt from `timing_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizeResponse {
    pub success: bool,
    pub mode: RenderMode,
    pub duration: f64,
    pub timing_info: TimingInfo,
    pub samples: Vec<f32>,
}

impl SynthesizeResponse {
    pub fn new(buffer: SampleBuffer, mode: RenderMode) -> Self {
        let timing_info = TimingInfo::from_buffer(&buffer);

        Self {
            success: true,
            mode,
            duration: buffer.duration(),
            timing_info,
            samples: buffer.into_samples(),
        }
    }
}

/// Reply to a spectrum request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumResponse {
    pub success: bool,
    pub sample_rate_hz: u32,
    pub duration: f64,
    #[serde(flatten)]
    pub spectrum: SpectrumResult,
}

impl SpectrumResponse {
    pub fn new(spectrum: SpectrumResult, sample_rate_hz: u32, duration: f64) -> Self {
        Self {
            success: true,
            sample_rate_hz,
            duration,
            spectrum,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::synth::analyze_buffer;
    use serde_json::json;

    #[test]
    fn test_synthesize_json() {
        let buffer = SampleBuffer::new(vec![0.0, 0.5, -0.5, 0.25], 4, 1.0);
        let response = SynthesizeResponse::new(buffer, RenderMode::Preview);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "mode": "preview",
                "duration": 1.0,
                "timing_info": {
                    "total_duration_seconds": 1.0,
                    "total_duration_milliseconds": 1000.0,
                    "sample_rate_hz": 4,
                    "sample_count": 4
                },
                "samples": [0.0, 0.5, -0.5, 0.25]
            })
        );
    }

    #[test]
    fn test_spectrum_json() {
        let buffer = SampleBuffer::new(vec![1.0; 4], 4, 1.0);
        let response = SpectrumResponse::new(analyze_buffer(&buffer, 100.0), 4, 1.0);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["frequencies"], json!([0.0, 1.0, 2.0]));
        assert_eq!(value["resolution"], json!(1.0));
        assert_eq!(
            value["magnitudes"].as_array().unwrap().len(),
            3,
            "Frequencies and magnitudes must be parallel"
        );
        assert_eq!(value["magnitudes"][0], json!(1.0), "DC bin differs");
    }
}

mod buffer;
mod envelope;
mod generator;
mod mixer;
mod osc;
mod spectrum;

pub use buffer::SampleBuffer;
pub use envelope::Envelope;
pub use generator::Synthesizer;
pub use mixer::HEADROOM;
pub use osc::{OscillatorBuilder, OscillatorConfig, WaveShape};
pub use spectrum::{analyze_buffer, SpectrumResult};

mod oscillator;
mod oscillator_math;

pub use oscillator::{OscillatorBuilder, OscillatorConfig};
pub use oscillator_math::WaveShape;

use crate::error::SynthError;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The four shapes an oscillator can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveShape {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl WaveShape {
    /// Value of a unit amplitude wave after `cycles` periods (`f * t`).
    pub fn sample(&self, cycles: f64) -> f64 {
        match self {
            WaveShape::Sine => cycles.sine(),
            WaveShape::Triangle => cycles.tri(),
            WaveShape::Sawtooth => cycles.saw(),
            WaveShape::Square => cycles.sqr(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaveShape::Sine => "sine",
            WaveShape::Triangle => "triangle",
            WaveShape::Sawtooth => "sawtooth",
            WaveShape::Square => "square",
        }
    }
}

impl FromStr for WaveShape {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sine" | "sin" => Ok(WaveShape::Sine),
            "triangle" | "tri" => Ok(WaveShape::Triangle),
            "sawtooth" | "saw" => Ok(WaveShape::Sawtooth),
            "square" | "sqr" => Ok(WaveShape::Square),
            _ => Err(SynthError::UnknownWaveType(s.to_string())),
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit amplitude wave shapes, evaluated on a phase measured in cycles.
///
/// None of them divides by the frequency, so a zero frequency simply yields silence
/// (or a constant, for shapes that are not zero at the origin).
pub trait OscillatorMath {
    fn sine(&self) -> Self;
    fn sqr(&self) -> Self;
    fn tri(&self) -> Self;
    fn saw(&self) -> Self;
}

impl OscillatorMath for f64 {
    fn sine(&self) -> Self {
        (2.0 * PI * self).sin()
    }

    // sign(0) is 0, unlike f64::signum
    fn sqr(&self) -> Self {
        let value = self.sine();
        if value > 0.0 {
            1.0
        } else if value < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    fn tri(&self) -> Self {
        2.0 * self.sine().asin() / PI
    }

    /// Ramps from -1 to 1 once per cycle, crossing zero at whole cycles.
    fn saw(&self) -> Self {
        2.0 * (self - (self + 0.5).floor())
    }
}

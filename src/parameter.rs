use crate::error::SynthError;

/// Parameters describe which values a user facing setting may take. An oscillator frequency,
/// a volume or an envelope stage are all parameters: each one owns a tag (used in error
/// messages) and the inclusive range every incoming value is checked against.
///
/// Values are **never clamped**. A value out of range is reported back to the caller so the
/// boundary layer can decide what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Maximum value that the parameter can reach.
    max: f64,
    /// Minimum value that the parameter can reach.
    min: f64,
    /// Identifier of the parameter.
    tag: String,
}

impl Parameter {
    /// Checks a value against the range of the parameter and hands it back if valid.
    pub fn check(&self, value: f64) -> Result<f64, SynthError> {
        if !value.is_finite() {
            return Err(SynthError::NotFinite(self.tag.clone()));
        }

        if value < self.min || value > self.max {
            return Err(SynthError::OutOfRange {
                tag: self.tag.clone(),
                value,
                min: self.min,
                max: self.max,
            });
        }

        Ok(value)
    }
}

/// Oscillator frequency in Hz.
pub fn frequency() -> Parameter {
    Parameter {
        min: 20.0,
        max: 2000.0,
        tag: "frequency".to_string(),
    }
}

/// Oscillator volume, expressed as a percentage.
pub fn volume() -> Parameter {
    Parameter {
        min: 0.0,
        max: 100.0,
        tag: "volume".to_string(),
    }
}

/// Length of an envelope stage, in seconds.
pub fn envelope_stage(tag: &str) -> Parameter {
    Parameter {
        min: 0.0,
        max: f64::MAX,
        tag: tag.to_string(),
    }
}

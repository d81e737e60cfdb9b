use thiserror::Error;

/// Everything that can go wrong between reading a patch and handing back samples.
///
/// None of these are retryable: the input has to change before the call can succeed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    #[error("parameter '{tag}' out of range: {value} is not within [{min}, {max}]")]
    OutOfRange {
        tag: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("parameter '{0}' is not a finite number")]
    NotFinite(String),
    #[error("unknown wave type '{0}'. Expected one of: sine, triangle, sawtooth, square")]
    UnknownWaveType(String),
    #[error("unknown normalization policy '{0}'. Expected 'peak-limit' or 'divide-by-count'")]
    UnknownNormalization(String),
    #[error("too many oscillators: {given} given, at most {max} allowed")]
    TooManyOscillators { given: usize, max: usize },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("invalid oscillator description '{0}'. Expected FREQ:WAVE[:VOLUME]")]
    InvalidOscillator(String),
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wav(#[from] hound::Error),
}

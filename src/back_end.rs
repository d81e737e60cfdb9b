// Output back-end: hands a rendered buffer over to the outside world as a WAV file.

use crate::error::SynthError;
use crate::synth::SampleBuffer;
use simplelog::info;
use std::path::Path;

/// Writes the buffer as a mono, 32 bit float WAV file.
///
/// # Arguments
/// * `path` - destination file. Gets overwritten if it exists.
/// * `buffer` - the rendered mix.
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<(), SynthError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in buffer.samples() {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    info!(
        "<b>Wrote <cyan>{}</> <b>samples to <blue>{}</>",
        buffer.len(),
        path.display()
    );
    Ok(())
}

use std::path::Path;

use anyhow::Result;

/// Encoder for one sound file format.
pub trait SoundFileWriter {
    /// Whether this writer handles `filename`, typically by extension.
    fn check(filename: &Path) -> bool
    where
        Self: Sized;

    fn open(&mut self, filename: &Path, sample_rate: u32, channel_count: u32) -> Result<()>;

    /// Appends interleaved samples.
    fn write(&mut self, samples: &[i16]) -> Result<()>;
}

use anyhow::Result;

use crate::InputStream;

/// Properties of an opened sound file.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SoundInfo {
    /// Total samples across all channels.
    pub sample_count: u64,
    pub channel_count: u32,
    pub sample_rate: u32,
}

/// Decoder for one sound file format.
///
/// Samples are signed 16-bit, interleaved by channel.
pub trait SoundFileReader {
    /// Whether `stream` looks like this reader's format.
    ///
    /// The stream is positioned at its start. Implementations may leave it
    /// anywhere.
    fn check(stream: &mut dyn InputStream) -> bool
    where
        Self: Sized;

    /// Takes ownership of `stream` and reads its header.
    fn open(&mut self, stream: Box<dyn InputStream>) -> Result<SoundInfo>;

    /// Moves to `sample_offset` (counted across all channels).
    fn seek(&mut self, sample_offset: u64) -> Result<()>;

    /// Fills `samples`; returns how many were written, 0 at the end.
    fn read(&mut self, samples: &mut [i16]) -> Result<usize>;
}

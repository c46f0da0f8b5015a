//! Pica audio crate.
//!
//! Sound files are decoded by reader/writer types registered with a
//! [`SoundFileFactory`]. The factory picks the first registered reader whose
//! `check` accepts a source. No codecs are bundled; applications register
//! their own.

mod factory;
mod reader;
mod stream;
mod writer;

pub use factory::SoundFileFactory;
pub use reader::{SoundFileReader, SoundInfo};
pub use stream::InputStream;
pub use writer::SoundFileWriter;

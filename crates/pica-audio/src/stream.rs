use std::io::{Read, Seek};

/// Seekable byte source a reader decodes from (file, memory, custom).
pub trait InputStream: Read + Seek {}

impl<T: Read + Seek + ?Sized> InputStream for T {}

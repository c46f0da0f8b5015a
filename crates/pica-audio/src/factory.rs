use std::any::TypeId;
use std::fs::File;
use std::io::{BufReader, Cursor, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

use crate::{InputStream, SoundFileReader, SoundFileWriter};

struct ReaderFactory {
    type_id: TypeId,
    name: &'static str,
    check: fn(&mut dyn InputStream) -> bool,
    create: fn() -> Box<dyn SoundFileReader>,
}

struct WriterFactory {
    type_id: TypeId,
    name: &'static str,
    check: fn(&Path) -> bool,
    create: fn() -> Box<dyn SoundFileWriter>,
}

fn create_reader<R: SoundFileReader + Default + 'static>() -> Box<dyn SoundFileReader> {
    Box::new(R::default())
}

fn create_writer<W: SoundFileWriter + Default + 'static>() -> Box<dyn SoundFileWriter> {
    Box::new(W::default())
}

/// Registry of sound file readers and writers.
///
/// Build one at startup, register the formats the application supports and
/// pass it to whatever loads sounds. Readers are tried in registration order.
#[derive(Default)]
pub struct SoundFileFactory {
    readers: Vec<ReaderFactory>,
    writers: Vec<WriterFactory>,
}

impl SoundFileFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `R`. Registering again moves it to the end of the list.
    pub fn register_reader<R: SoundFileReader + Default + 'static>(&mut self) {
        self.unregister_reader::<R>();
        self.readers.push(ReaderFactory {
            type_id: TypeId::of::<R>(),
            name: std::any::type_name::<R>(),
            check: R::check,
            create: create_reader::<R>,
        });
        log::debug!("registered sound reader {}", std::any::type_name::<R>());
    }

    pub fn unregister_reader<R: SoundFileReader + 'static>(&mut self) {
        let id = TypeId::of::<R>();
        self.readers.retain(|f| f.type_id != id);
    }

    pub fn is_reader_registered<R: SoundFileReader + 'static>(&self) -> bool {
        let id = TypeId::of::<R>();
        self.readers.iter().any(|f| f.type_id == id)
    }

    /// Registers `W`. Registering again moves it to the end of the list.
    pub fn register_writer<W: SoundFileWriter + Default + 'static>(&mut self) {
        self.unregister_writer::<W>();
        self.writers.push(WriterFactory {
            type_id: TypeId::of::<W>(),
            name: std::any::type_name::<W>(),
            check: W::check,
            create: create_writer::<W>,
        });
        log::debug!("registered sound writer {}", std::any::type_name::<W>());
    }

    pub fn unregister_writer<W: SoundFileWriter + 'static>(&mut self) {
        let id = TypeId::of::<W>();
        self.writers.retain(|f| f.type_id != id);
    }

    pub fn is_writer_registered<W: SoundFileWriter + 'static>(&self) -> bool {
        let id = TypeId::of::<W>();
        self.writers.iter().any(|f| f.type_id == id)
    }

    /// Picks a reader for the file at `filename`.
    ///
    /// The returned reader is not opened yet.
    pub fn create_reader_from_filename(
        &self,
        filename: impl AsRef<Path>,
    ) -> Result<Box<dyn SoundFileReader>> {
        let filename = filename.as_ref();
        let file = File::open(filename)
            .with_context(|| format!("failed to open sound file {}", filename.display()))?;
        let mut stream = BufReader::new(file);

        self.find_reader(&mut stream)?
            .with_context(|| format!("no registered reader supports {}", filename.display()))
    }

    /// Picks a reader for an in-memory file.
    pub fn create_reader_from_memory(&self, data: &[u8]) -> Result<Box<dyn SoundFileReader>> {
        let mut stream = Cursor::new(data);
        self.find_reader(&mut stream)?
            .with_context(|| format!("no registered reader supports the {}-byte memory buffer", data.len()))
    }

    /// Picks a reader for a custom stream. The stream is rewound before
    /// every check.
    pub fn create_reader_from_stream(
        &self,
        stream: &mut dyn InputStream,
    ) -> Result<Box<dyn SoundFileReader>> {
        self.find_reader(stream)?
            .context("no registered reader supports the input stream")
    }

    /// Picks a writer for `filename`. The returned writer is not opened yet.
    pub fn create_writer_from_filename(
        &self,
        filename: impl AsRef<Path>,
    ) -> Result<Box<dyn SoundFileWriter>> {
        let filename = filename.as_ref();
        let factory = self
            .writers
            .iter()
            .find(|f| (f.check)(filename))
            .with_context(|| format!("no registered writer supports {}", filename.display()))?;

        log::debug!("writing {} with {}", filename.display(), factory.name);
        Ok((factory.create)())
    }

    fn find_reader(&self, stream: &mut dyn InputStream) -> Result<Option<Box<dyn SoundFileReader>>> {
        for factory in &self.readers {
            stream
                .seek(SeekFrom::Start(0))
                .context("failed to rewind sound stream")?;

            if (factory.check)(stream) {
                log::debug!("reading sound with {}", factory.name);
                return Ok(Some((factory.create)()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use anyhow::bail;

    use crate::SoundInfo;

    use super::*;

    fn has_magic(stream: &mut dyn InputStream, magic: &[u8; 4]) -> bool {
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).is_ok() && &buf == magic
    }

    /// "RAW1" + u32 LE sample count + i16 LE samples, mono 8 kHz.
    #[derive(Default)]
    struct RawReader {
        samples: Vec<i16>,
        pos: usize,
    }

    impl SoundFileReader for RawReader {
        fn check(stream: &mut dyn InputStream) -> bool {
            has_magic(stream, b"RAW1")
        }

        fn open(&mut self, mut stream: Box<dyn InputStream>) -> Result<SoundInfo> {
            let mut bytes = Vec::new();
            stream.read_to_end(&mut bytes)?;
            if bytes.len() < 8 || &bytes[..4] != b"RAW1" {
                bail!("not a RAW1 stream");
            }
            self.samples = bytes[8..]
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]))
                .collect();
            self.pos = 0;
            Ok(SoundInfo {
                sample_count: self.samples.len() as u64,
                channel_count: 1,
                sample_rate: 8000,
            })
        }

        fn seek(&mut self, sample_offset: u64) -> Result<()> {
            self.pos = (sample_offset as usize).min(self.samples.len());
            Ok(())
        }

        fn read(&mut self, out: &mut [i16]) -> Result<usize> {
            let n = out.len().min(self.samples.len() - self.pos);
            out[..n].copy_from_slice(&self.samples[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Accepts anything; used to check ordering.
    #[derive(Default)]
    struct AnyReader;

    impl SoundFileReader for AnyReader {
        fn check(_stream: &mut dyn InputStream) -> bool {
            true
        }

        fn open(&mut self, _stream: Box<dyn InputStream>) -> Result<SoundInfo> {
            Ok(SoundInfo::default())
        }

        fn seek(&mut self, _sample_offset: u64) -> Result<()> {
            Ok(())
        }

        fn read(&mut self, _samples: &mut [i16]) -> Result<usize> {
            Ok(0)
        }
    }

    #[derive(Default)]
    struct RawWriter {
        written: usize,
    }

    impl SoundFileWriter for RawWriter {
        fn check(filename: &Path) -> bool {
            filename.extension().is_some_and(|e| e.eq_ignore_ascii_case("raw"))
        }

        fn open(&mut self, _filename: &Path, _sample_rate: u32, _channel_count: u32) -> Result<()> {
            Ok(())
        }

        fn write(&mut self, samples: &[i16]) -> Result<()> {
            self.written += samples.len();
            Ok(())
        }
    }

    fn raw_file(samples: &[i16]) -> Vec<u8> {
        let mut bytes = b"RAW1".to_vec();
        bytes.extend_from_slice(&(samples.len() as u32).to_le_bytes());
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn register_and_unregister() {
        let mut factory = SoundFileFactory::new();
        assert!(!factory.is_reader_registered::<RawReader>());

        factory.register_reader::<RawReader>();
        factory.register_reader::<RawReader>();
        assert!(factory.is_reader_registered::<RawReader>());
        assert_eq!(factory.readers.len(), 1);

        factory.unregister_reader::<RawReader>();
        assert!(!factory.is_reader_registered::<RawReader>());
    }

    #[test]
    fn writers_register_separately() {
        let mut factory = SoundFileFactory::new();
        factory.register_writer::<RawWriter>();
        assert!(factory.is_writer_registered::<RawWriter>());
        assert!(!factory.is_reader_registered::<RawReader>());
    }

    // ── reader selection ──────────────────────────────────────────────────

    #[test]
    fn memory_source_picks_matching_reader() {
        let mut factory = SoundFileFactory::new();
        factory.register_reader::<RawReader>();

        let bytes = raw_file(&[1, -2, 3]);
        let mut reader = factory.create_reader_from_memory(&bytes).unwrap();
        let info = reader.open(Box::new(Cursor::new(bytes.clone()))).unwrap();
        assert_eq!(info.sample_count, 3);

        let mut out = [0i16; 8];
        assert_eq!(reader.read(&mut out).unwrap(), 3);
        assert_eq!(&out[..3], &[1, -2, 3]);

        reader.seek(2).unwrap();
        assert_eq!(reader.read(&mut out).unwrap(), 1);
        assert_eq!(out[0], 3);
    }

    #[test]
    fn no_matching_reader_is_an_error() {
        let mut factory = SoundFileFactory::new();
        factory.register_reader::<RawReader>();
        let err = factory.create_reader_from_memory(b"OggS....").err().unwrap();
        assert!(err.to_string().contains("no registered reader"));
    }

    #[test]
    fn stream_is_rewound_before_each_check() {
        let mut factory = SoundFileFactory::new();
        factory.register_reader::<RawReader>();

        let mut stream = Cursor::new(raw_file(&[7]));
        stream.set_position(6);
        assert!(factory.create_reader_from_stream(&mut stream).is_ok());
    }

    #[test]
    fn first_registered_match_wins() {
        let mut factory = SoundFileFactory::new();
        factory.register_reader::<AnyReader>();
        factory.register_reader::<RawReader>();

        let bytes = raw_file(&[5, 6]);
        let mut reader = factory.create_reader_from_memory(&bytes).unwrap();
        // AnyReader reports an empty file.
        let info = reader.open(Box::new(Cursor::new(bytes))).unwrap();
        assert_eq!(info, SoundInfo::default());
    }

    #[test]
    fn filename_source_reads_from_disk() {
        let mut factory = SoundFileFactory::new();
        factory.register_reader::<RawReader>();

        let path = std::env::temp_dir().join(format!("pica-audio-{}.raw", std::process::id()));
        std::fs::write(&path, raw_file(&[1, 2])).unwrap();
        let result = factory.create_reader_from_filename(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut factory = SoundFileFactory::new();
        factory.register_reader::<AnyReader>();
        assert!(factory.create_reader_from_filename("/nonexistent/pica.raw").is_err());
    }

    // ── writer selection ──────────────────────────────────────────────────

    #[test]
    fn writer_chosen_by_filename() {
        let mut factory = SoundFileFactory::new();
        factory.register_writer::<RawWriter>();

        let mut writer = factory.create_writer_from_filename("out.RAW").unwrap();
        writer.open(Path::new("out.RAW"), 8000, 1).unwrap();
        writer.write(&[1, 2, 3]).unwrap();

        assert!(factory.create_writer_from_filename("out.wav").is_err());
    }
}

//! Buffered file reader implementing [`ReadStream`]

use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use rspan_core::{ReadStream, SpanError};

use crate::{Error, Result};

/// Sequential reader over a file on disk
///
/// The stream is named by the file name, so owners filled from it report
/// violations against that name.
pub struct FileStream {
    reader: BufReader<File>,
    pos: usize,
    size: usize,
    name: String,
}

impl FileStream {
    /// Open `path` for reading from the start
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = usize::try_from(file.metadata()?.len()).map_err(|_| Error::TooLarge {
            path: path.to_path_buf(),
            size: u64::MAX,
            limit: usize::MAX as u64,
        })?;

        log::trace!("opened {} ({size} bytes)", path.display());
        Ok(Self {
            reader: BufReader::new(file),
            pos: 0,
            size,
            name: display_name(path),
        })
    }

    /// Move to an absolute byte position; the end of the file is valid
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.size {
            return Err(SpanError::InvalidSeek {
                target: pos as i128,
                size: self.size,
            }
            .into());
        }
        self.reader.seek(SeekFrom::Start(pos as u64))?;
        self.pos = pos;
        Ok(())
    }

    /// Whether every byte has been consumed
    pub fn eos(&self) -> bool {
        self.pos >= self.size
    }
}

impl ReadStream for FileStream {
    type Error = Error;

    fn pos(&self) -> usize {
        self.pos
    }

    fn size(&self) -> usize {
        self.size
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() > self.remaining() {
            return Err(SpanError::UnexpectedEof {
                pos: self.pos,
                requested: buf.len(),
                size: self.size,
            }
            .into());
        }
        self.reader.read_exact(buf)?;
        self.pos += buf.len();
        Ok(())
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// File name of `path`, or the whole path if it has none
pub(crate) fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

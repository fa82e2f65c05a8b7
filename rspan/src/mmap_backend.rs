//! Memory-mapped resource backend
//!
//! Maps a file read-only and exposes it as a named byte view without
//! copying. The mapping lives as long as the [`MappedFile`], and every view
//! handed out borrows from it.

use std::{borrow::Cow, fs::File, path::Path};

use memmap2::{Mmap, MmapOptions};
use rspan_core::{MemoryReadStream, NamedSpan, SpanBase, SpanSlice};

use crate::{file_stream::display_name, Error, Result};

/// Read-only memory mapping of a whole file
pub struct MappedFile {
    mmap: Mmap,
    name: String,
}

impl MappedFile {
    /// Map `path`, naming the view after the file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let name = display_name(path.as_ref());
        Self::open_named(path, name)
    }

    /// Map `path` under an explicit display name
    pub fn open_named<P: AsRef<Path>>(path: P, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        // SAFETY: read-only mapping; the file is not expected to change while
        // the resource is loaded.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|source| Error::Mmap {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(Self {
            mmap,
            name: name.into(),
        })
    }

    /// Named view of the whole file at source offset zero
    pub fn span(&self) -> NamedSpan<'_, u8> {
        NamedSpan::new(&self.mmap[..], self.name.as_str())
    }

    /// Sequential reader over the whole file
    pub fn stream(&self) -> MemoryReadStream<'_> {
        MemoryReadStream::with_name(&self.mmap[..], self.name.as_str())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SpanBase for MappedFile {
    type Item = u8;

    fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn source_byte_offset(&self) -> Option<usize> {
        Some(0)
    }
}

impl SpanSlice for MappedFile {
    fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile")
            .field("name", &self.name)
            .field("len", &self.mmap.len())
            .finish()
    }
}

//! Error type for resource loading

use std::{io, path::PathBuf};

use rspan_core::SpanError;

/// Errors produced while opening, mapping or streaming resources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Span(#[from] SpanError),

    #[error("{} is {size} bytes, over the {limit}-byte limit", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("failed to memory-map {}", .path.display())]
    Mmap {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for span access and stream reads

use alloc::string::String;
use core::fmt;

/// The kind of access being validated
///
/// Only the wording of the diagnostic depends on the mode; the bounds
/// arithmetic is identical for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationMode {
    /// Reading elements out of the view
    Read,
    /// Writing elements into the view
    Write,
    /// Moving a cursor or carving out a subspan
    Seek,
}

impl ValidationMode {
    /// Verb used in diagnostics ("reading", "writing", "seeking")
    pub const fn verb(self) -> &'static str {
        match self {
            ValidationMode::Read => "reading",
            ValidationMode::Write => "writing",
            ValidationMode::Seek => "seeking",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Everything needed to describe a rejected access
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundsViolation {
    /// Which kind of access was attempted
    pub mode: ValidationMode,
    /// Display name of the view (file name, or address for unnamed views)
    pub name: String,
    /// Element index the access started at
    pub index: usize,
    /// Requested access length in bytes (negative for look-backs)
    pub delta_in_bytes: isize,
    /// Size of one element of the view in bytes
    pub element_size: usize,
    /// Number of elements in the view
    pub size: usize,
    /// Source byte offset of the view, present only for named views
    pub source_byte_offset: Option<usize>,
}

impl fmt::Display for BoundsViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element_size = self.element_size.max(1) as isize;
        write!(
            f,
            "Access violation {} {}: {} + {} > {}",
            self.mode,
            self.name,
            self.index,
            self.delta_in_bytes / element_size,
            self.size
        )?;

        if let Some(source) = self.source_byte_offset {
            let index_in_bytes = (self.index as u128) * (self.element_size as u128);
            let size_in_bytes = (self.size as u128) * (self.element_size as u128);
            write!(
                f,
                " (abs: {} + {} > {})",
                source as u128 + index_in_bytes,
                self.delta_in_bytes,
                source as u128 + size_in_bytes
            )?;
        }

        Ok(())
    }
}

/// Errors that can occur while validating or streaming span data
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpanError {
    /// An access fell outside the view
    OutOfBounds(BoundsViolation),
    /// A stream's remaining bytes are not a whole number of elements
    PartialElement {
        /// Bytes left in the stream
        remaining: usize,
        /// Size of the element type being read
        element_size: usize,
    },
    /// A stream read ran past the end of the stream
    UnexpectedEof {
        /// Stream position at the time of the read
        pos: usize,
        /// Number of bytes requested
        requested: usize,
        /// Total stream size
        size: usize,
    },
    /// A seek targeted a position outside the stream
    InvalidSeek {
        /// Requested absolute position (may be negative)
        target: i128,
        /// Total stream size
        size: usize,
    },
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanError::OutOfBounds(violation) => write!(f, "{violation}"),
            SpanError::PartialElement {
                remaining,
                element_size,
            } => write!(
                f,
                "{remaining} remaining stream bytes do not divide into {element_size}-byte elements"
            ),
            SpanError::UnexpectedEof {
                pos,
                requested,
                size,
            } => write!(
                f,
                "Unexpected end of stream reading {requested} bytes at {pos} of {size}"
            ),
            SpanError::InvalidSeek { target, size } => {
                write!(f, "Invalid seek to {target} in stream of {size} bytes")
            }
        }
    }
}

impl core::error::Error for SpanError {}

impl From<BoundsViolation> for SpanError {
    fn from(violation: BoundsViolation) -> Self {
        SpanError::OutOfBounds(violation)
    }
}

/// Result type for fallible span operations
pub type Result<T> = core::result::Result<T, SpanError>;

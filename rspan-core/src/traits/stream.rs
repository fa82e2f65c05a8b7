//! Stream collaborator interface
//!
//! Owners can be filled from any sequential byte source that knows its
//! position and total size. The crate ships an in-memory implementation;
//! file and memory-mapped readers live in the `rspan` crate.

/// Sequential, sized source of bytes
pub trait ReadStream {
    /// Error type for read failures
    type Error;

    /// Current read position in bytes
    fn pos(&self) -> usize;

    /// Total size of the stream in bytes
    fn size(&self) -> usize;

    /// Fill `buf` completely from the current position, advancing it
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Display identity of the stream, such as a file name
    fn name(&self) -> Option<&str> {
        None
    }

    /// Bytes left between the current position and the end
    fn remaining(&self) -> usize {
        self.size().saturating_sub(self.pos())
    }
}

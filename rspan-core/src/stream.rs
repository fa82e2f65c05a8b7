//! In-memory sequential reader over borrowed bytes

use alloc::borrow::Cow;

use crate::{
    endian::{read_u24_le, ByteOrder},
    traits::stream::ReadStream,
    Result, SpanError,
};

/// Sequential reader over a borrowed byte slice
///
/// The stream never owns its bytes; it is produced by
/// [`SpanBase::to_stream`](crate::SpanBase::to_stream) or wraps any slice.
#[derive(Debug, Clone)]
pub struct MemoryReadStream<'a> {
    data: &'a [u8],
    pos: usize,
    name: Option<Cow<'a, str>>,
}

impl<'a> MemoryReadStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            name: None,
        }
    }

    pub fn with_name(data: &'a [u8], name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            data,
            pos: 0,
            name: Some(name.into()),
        }
    }

    /// Move to an absolute position; the end of the data is a valid target
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(SpanError::InvalidSeek {
                target: pos as i128,
                size: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Move relative to the current position
    pub fn skip(&mut self, delta: isize) -> Result<()> {
        let target = self.pos as i128 + delta as i128;
        if target < 0 || target > self.data.len() as i128 {
            return Err(SpanError::InvalidSeek {
                target,
                size: self.data.len(),
            });
        }
        self.pos = target as usize;
        Ok(())
    }

    /// Whether every byte has been consumed
    pub fn eos(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(SpanError::UnexpectedEof {
                pos: self.pos,
                requested: len,
                size: self.data.len(),
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_array()?;
        Ok(byte)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(ByteOrder::Little.read_u16(self.read_array()?))
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(ByteOrder::Big.read_u16(self.read_array()?))
    }

    pub fn read_u24_le(&mut self) -> Result<u32> {
        Ok(read_u24_le(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(ByteOrder::Little.read_u32(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(ByteOrder::Big.read_u32(self.read_array()?))
    }

    /// Bytes not yet consumed
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ReadStream for MemoryReadStream<'_> {
    type Error = SpanError;

    fn pos(&self) -> usize {
        self.pos
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(self.read_bytes(buf.len())?);
        Ok(())
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

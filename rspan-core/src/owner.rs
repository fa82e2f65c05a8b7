//! Exclusive owner of a span's storage
//!
//! [`SpanOwner`] is the one place in the crate that allocates. It owns a
//! boxed slice plus the naming metadata of the view over it, and exposes the
//! full [`SpanBase`] surface directly so callers rarely need the inner view.

use alloc::{borrow::Cow, boxed::Box, format, string::String, vec::Vec};
use core::{fmt, mem};

use crate::{
    traits::stream::ReadStream, NamedSpan, NamedSpanMut, Span, SpanBase, SpanBaseMut, SpanError,
    SpanMut, SpanSlice, SpanSliceMut,
};

/// Owning buffer with a bounds-checked view over it
///
/// An owner is either empty or holds exactly one allocation. Cloning makes
/// an independent deep copy; moving or [`SpanOwner::take_from`] transfers
/// the allocation and leaves the source empty.
pub struct SpanOwner<T: bytemuck::Pod> {
    data: Option<Box<[T]>>,
    name: String,
    source_byte_offset: usize,
}

impl<T: bytemuck::Pod> SpanOwner<T> {
    /// Empty owner
    pub const fn new() -> Self {
        Self {
            data: None,
            name: String::new(),
            source_byte_offset: 0,
        }
    }

    /// Adopt an existing vector
    pub fn from_vec(data: Vec<T>) -> Self {
        Self::from_boxed(data.into_boxed_slice())
    }

    /// Adopt an existing boxed slice
    pub fn from_boxed(data: Box<[T]>) -> Self {
        Self {
            data: Some(data),
            ..Self::new()
        }
    }

    /// Set the display name used in diagnostics
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name of the owned buffer; empty for unnamed owners
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the owner currently holds an allocation
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    #[track_caller]
    fn assert_empty(&self, op: &str) {
        assert!(
            self.data.is_none(),
            "{op} on an owner that already holds {} elements ({})",
            self.size(),
            self.display_name()
        );
    }

    /// Allocate `count` zeroed elements
    ///
    /// The owner must be empty.
    #[track_caller]
    pub fn allocate(&mut self, count: usize, name: impl Into<String>) -> &mut Self {
        self.assert_empty("allocate");
        self.data = Some(alloc::vec![T::zeroed(); count].into_boxed_slice());
        self.name = name.into();
        self.source_byte_offset = 0;
        log::trace!("allocated {count} elements for {}", self.display_name());
        self
    }

    /// Allocate a copy of `view`'s elements
    ///
    /// Named and retyped-from-named views pass on their name and source
    /// byte offset. The owner must be empty.
    #[track_caller]
    pub fn allocate_from_span<S>(&mut self, view: &S) -> &mut Self
    where
        S: SpanBase<Item = T> + ?Sized,
    {
        self.assert_empty("allocate_from_span");
        let mut data = alloc::vec![T::zeroed(); view.size()].into_boxed_slice();
        bytemuck::cast_slice_mut(&mut data[..]).copy_from_slice(view.as_bytes());
        self.data = Some(data);
        match view.source_byte_offset() {
            Some(offset) => {
                self.name = view.display_name().into_owned();
                self.source_byte_offset = offset;
            }
            None => {
                self.name.clear();
                self.source_byte_offset = 0;
            }
        }
        log::trace!(
            "copied {} elements into owner {}",
            view.size(),
            self.display_name()
        );
        self
    }

    /// Allocate and fill from the stream's current position
    ///
    /// `count` defaults to every remaining whole element; if the remaining
    /// bytes end in a partial element that is reported as
    /// [`SpanError::PartialElement`]. An explicit `count` must fit in the
    /// remaining bytes. `name` defaults to the stream's name. The owner must
    /// be empty, and stays empty if the read fails.
    #[track_caller]
    pub fn allocate_from_stream<S>(
        &mut self,
        stream: &mut S,
        count: Option<usize>,
        name: Option<&str>,
    ) -> Result<&mut Self, S::Error>
    where
        S: ReadStream + ?Sized,
        S::Error: From<SpanError>,
    {
        self.assert_empty("allocate_from_stream");

        let element_size = mem::size_of::<T>().max(1);
        let remaining = stream.remaining();
        let count = match count {
            Some(count) => {
                assert!(
                    count
                        .checked_mul(element_size)
                        .is_some_and(|bytes| bytes <= remaining),
                    "cannot read {count} elements of {element_size} bytes from a stream with {remaining} bytes left"
                );
                count
            }
            None => {
                if remaining % element_size != 0 {
                    return Err(SpanError::PartialElement {
                        remaining,
                        element_size,
                    }
                    .into());
                }
                remaining / element_size
            }
        };

        let mut data = alloc::vec![T::zeroed(); count].into_boxed_slice();
        stream.read_exact(bytemuck::cast_slice_mut(&mut data[..]))?;

        self.data = Some(data);
        self.name = String::from(name.or_else(|| stream.name()).unwrap_or_default());
        self.source_byte_offset = 0;
        log::debug!(
            "read {count} elements from stream into {}",
            self.display_name()
        );
        Ok(self)
    }

    /// Replace this owner's contents with `other`'s, leaving `other` empty
    pub fn take_from(&mut self, other: &mut Self) -> &mut Self {
        self.clear();
        self.data = other.data.take();
        self.name = mem::take(&mut other.name);
        self.source_byte_offset = mem::take(&mut other.source_byte_offset);
        log::trace!("transferred ownership of {}", self.display_name());
        self
    }

    /// Hand out the allocation without freeing it, leaving the owner empty
    pub fn release(&mut self) -> Option<Box<[T]>> {
        self.name.clear();
        self.source_byte_offset = 0;
        self.data.take()
    }

    /// Free the allocation, if any
    pub fn clear(&mut self) {
        self.data = None;
        self.name.clear();
        self.source_byte_offset = 0;
    }

    /// Named read-only view of the whole buffer
    pub fn span(&self) -> NamedSpan<'_, T> {
        NamedSpan::with_offset(
            Span::new(self.as_slice()),
            self.display_name(),
            self.source_byte_offset,
        )
    }

    /// Named writable view of the whole buffer
    pub fn span_mut(&mut self) -> NamedSpanMut<'_, T> {
        let name: Cow<'_, str> = if self.name.is_empty() {
            Cow::Owned(format!("{:p}", self.data()))
        } else {
            Cow::Borrowed(&self.name)
        };
        let data = match self.data.as_deref_mut() {
            Some(data) => data,
            None => &mut [],
        };
        NamedSpanMut::with_offset(SpanMut::new(data), name, self.source_byte_offset)
    }
}

impl<T: bytemuck::Pod> Default for SpanOwner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: bytemuck::Pod> Clone for SpanOwner<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            name: self.name.clone(),
            source_byte_offset: self.source_byte_offset,
        }
    }
}

impl<T: bytemuck::Pod> From<Vec<T>> for SpanOwner<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: bytemuck::Pod> SpanBase for SpanOwner<T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    fn display_name(&self) -> Cow<'_, str> {
        if self.name.is_empty() {
            Cow::Owned(format!("{:p}", self.data()))
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    fn source_byte_offset(&self) -> Option<usize> {
        (!self.name.is_empty()).then_some(self.source_byte_offset)
    }
}

impl<T: bytemuck::Pod> SpanSlice for SpanOwner<T> {
    fn as_slice(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }
}

impl<T: bytemuck::Pod> SpanBaseMut for SpanOwner<T> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.as_mut_slice())
    }
}

impl<T: bytemuck::Pod> SpanSliceMut for SpanOwner<T> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        match self.data.as_deref_mut() {
            Some(data) => data,
            None => &mut [],
        }
    }
}

impl_span_index!(mut SpanOwner);

impl<T: bytemuck::Pod> fmt::Debug for SpanOwner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanOwner")
            .field("name", &self.display_name())
            .field("size", &self.size())
            .field("allocated", &self.is_allocated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryReadStream;
    use alloc::vec;

    #[test]
    fn test_empty_owner() {
        let mut owner = SpanOwner::<u8>::new();
        assert!(!owner.is_allocated());
        assert_eq!(owner.size(), 0);
        assert!(owner.release().is_none());
        owner.clear();
        assert!(!owner.is_allocated());
    }

    #[test]
    fn test_allocate_zeroes() {
        let mut owner = SpanOwner::<u32>::new();
        owner.allocate(4, "buf");
        assert!(owner.is_allocated());
        assert_eq!(owner.size(), 4);
        assert_eq!(owner.byte_size(), 16);
        assert!(owner.iter().all(|word| word == 0));
        assert_eq!(owner.span().name(), "buf");
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn test_allocate_twice() {
        let mut owner = SpanOwner::<u8>::new();
        owner.allocate(1, "a");
        owner.allocate(1, "b");
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = SpanOwner::from_vec(vec![1u8, 2, 3]).with_name("orig");
        let copy = original.clone();
        original[0] = 9;

        assert_eq!(copy.get(0), 1);
        assert_eq!(copy.name(), "orig");
        assert_ne!(original.data(), copy.data());

        let empty = SpanOwner::<u8>::new();
        assert!(!empty.clone().is_allocated());
    }

    #[test]
    fn test_take_from_transfers() {
        let mut source = SpanOwner::from_vec(vec![1u16, 2]).with_name("src");
        let address = source.data();
        let mut target = SpanOwner::from_vec(vec![7u16]);

        target.take_from(&mut source);
        assert_eq!(target.data(), address);
        assert_eq!(target.name(), "src");
        assert_eq!(target.size(), 2);
        assert!(!source.is_allocated());
        assert_eq!(source.name(), "");
    }

    #[test]
    fn test_release_and_clear_are_idempotent() {
        let mut owner = SpanOwner::from_vec(vec![5u8; 3]);
        let released = owner.release().unwrap();
        assert_eq!(&*released, &[5, 5, 5]);
        assert!(owner.release().is_none());

        owner.allocate(2, "again");
        owner.clear();
        owner.clear();
        assert!(!owner.is_allocated());
        assert_eq!(owner.display_name(), format!("{:p}", owner.data()));
    }

    #[test]
    fn test_allocate_from_named_span() {
        let words = [1u32, 2, 3, 4];
        let named = NamedSpan::with_offset(Span::new(&words), "room.dat", 64);
        let mut owner = SpanOwner::new();
        owner.allocate_from_span(&named.subspan(1, Some(2)));

        assert_eq!(owner.size(), 2);
        assert_eq!(owner[1], 3);
        assert_eq!(owner.name(), "room.dat");
        assert_eq!(owner.span().source_byte_offset(), 68);
        assert_ne!(owner.data(), words[1..].as_ptr());
    }

    #[test]
    fn test_allocate_from_unnamed_span() {
        let bytes = [1u8, 2, 3];
        let mut owner = SpanOwner::new();
        owner.allocate_from_span(&Span::new(&bytes));
        assert_eq!(owner.name(), "");
        assert_eq!(SpanBase::source_byte_offset(&owner), None);
    }

    #[test]
    fn test_allocate_from_stream() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let mut stream = MemoryReadStream::with_name(&bytes, "pal.bin");
        stream.seek(1).unwrap();

        let mut owner = SpanOwner::<u16>::new();
        owner
            .allocate_from_stream(&mut stream, None, None)
            .unwrap();
        assert_eq!(owner.size(), 4);
        assert_eq!(owner.name(), "pal.bin");
        assert_eq!(owner.get_uint16_be_at(0), 0x0203);
        assert!(stream.eos());
    }

    #[test]
    fn test_allocate_from_stream_with_count_and_name() {
        let bytes = [0xaa; 10];
        let mut stream = MemoryReadStream::new(&bytes);
        let mut owner = SpanOwner::<u32>::new();
        owner
            .allocate_from_stream(&mut stream, Some(2), Some("header"))
            .unwrap();
        assert_eq!(owner.size(), 2);
        assert_eq!(owner.name(), "header");
        assert_eq!(stream.remaining(), 2);
    }

    #[test]
    fn test_allocate_from_stream_partial_element() {
        let bytes = [0u8; 7];
        let mut stream = MemoryReadStream::new(&bytes);
        let mut owner = SpanOwner::<u32>::new();
        let err = owner
            .allocate_from_stream(&mut stream, None, None)
            .unwrap_err();
        assert_eq!(
            err,
            SpanError::PartialElement {
                remaining: 7,
                element_size: 4
            }
        );
        assert!(!owner.is_allocated());
    }

    #[test]
    #[should_panic(expected = "cannot read 3 elements")]
    fn test_allocate_from_stream_count_too_large() {
        let bytes = [0u8; 8];
        let mut stream = MemoryReadStream::new(&bytes);
        let mut owner = SpanOwner::<u32>::new();
        let _ = owner.allocate_from_stream(&mut stream, Some(3), None);
    }

    #[test]
    fn test_span_mut_writes_through() {
        let mut owner = SpanOwner::<u8>::new();
        owner.allocate(4, "out");
        {
            let mut view = owner.span_mut();
            view.set(3, 0x7f);
            assert_eq!(view.name(), "out");
        }
        owner.set(0, 0x01);
        assert_eq!(owner.get_uint32_be_at(0), 0x0100_007f);
    }

    #[test]
    #[should_panic(expected = "Access violation reading owned.bin: 2 + 1 > 2")]
    fn test_owner_index_past_end() {
        let owner = SpanOwner::from_vec(vec![0u8; 2]).with_name("owned.bin");
        let _ = owner[2];
    }
}

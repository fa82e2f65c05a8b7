//! Views reinterpreted as a different element type
//!
//! Retyping a run of `T` as `U` only requires its byte length to divide by
//! the size of `U`. The run may start at any address, for example one byte
//! into a packed record, so a retyped view keeps plain bytes and reads or
//! writes each element by value. When the start does happen to be aligned,
//! [`RetypedSpan::try_as_span`] hands back an ordinary slice-backed view.

use alloc::{borrow::Cow, format};
use core::{marker::PhantomData, mem::size_of, ops::Range};

use crate::{
    traits::view::subspan_range,
    validation::{
        bounds::child_offset,
        layout::{assert_retypable, is_aligned_for, retype, retype_mut},
    },
    Span, SpanBase, SpanBaseMut, SpanMut,
};

/// Read-only view of bytes as elements of `T`, at any alignment
///
/// A view retyped from a named one keeps the resource name and reports
/// absolute offsets in its diagnostics, like [`NamedSpan`](crate::NamedSpan).
#[derive(Clone)]
pub struct RetypedSpan<'a, T: bytemuck::Pod> {
    bytes: &'a [u8],
    name: Option<Cow<'a, str>>,
    source_byte_offset: usize,
    _phantom: PhantomData<T>,
}

impl<'a, T: bytemuck::Pod> RetypedSpan<'a, T> {
    /// View `bytes` as elements of `T`
    ///
    /// Panics if the length is not a whole number of elements.
    #[track_caller]
    pub fn new(bytes: &'a [u8]) -> Self {
        assert_retypable::<u8, T>(bytes.len());
        Self {
            bytes,
            name: None,
            source_byte_offset: 0,
            _phantom: PhantomData,
        }
    }

    /// Attach a resource name and the byte offset of the first element in it
    pub fn with_name(mut self, name: impl Into<Cow<'a, str>>, source_byte_offset: usize) -> Self {
        self.name = Some(name.into());
        self.source_byte_offset = source_byte_offset;
        self
    }

    /// Name of the resource this view was retyped from, if it had one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The covered bytes, with the lifetime of the underlying buffer
    pub fn into_bytes(self) -> &'a [u8] {
        self.bytes
    }

    /// Slice-backed view of the same elements, if the start is aligned for `T`
    pub fn try_as_span(&self) -> Option<Span<'a, T>> {
        is_aligned_for::<T>(self.bytes.as_ptr()).then(|| Span::new(retype(self.bytes)))
    }

    /// View of elements `index..index + len`, keeping name and advancing the offset
    #[track_caller]
    pub fn subspan(&self, index: usize, len: Option<usize>) -> RetypedSpan<'a, T> {
        let range = byte_range::<T>(subspan_range(self, index, len));
        RetypedSpan {
            bytes: &self.bytes[range],
            name: self.name.clone(),
            source_byte_offset: child_offset::<T>(self.source_byte_offset, index),
            _phantom: PhantomData,
        }
    }

    /// View of elements `index..index + len` reinterpreted as `U`
    #[track_caller]
    pub fn subspan_as<U: bytemuck::Pod>(
        &self,
        index: usize,
        len: Option<usize>,
    ) -> RetypedSpan<'a, U> {
        let count = len.unwrap_or_else(|| self.size().saturating_sub(index));
        assert_retypable::<T, U>(count);
        self.subspan(index, Some(count)).cast()
    }

    /// Reinterpret the whole view as elements of type `U`
    #[track_caller]
    pub fn cast<U: bytemuck::Pod>(self) -> RetypedSpan<'a, U> {
        assert_retypable::<u8, U>(self.bytes.len());
        RetypedSpan {
            bytes: self.bytes,
            name: self.name,
            source_byte_offset: self.source_byte_offset,
            _phantom: PhantomData,
        }
    }
}

impl<T: bytemuck::Pod> SpanBase for RetypedSpan<'_, T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        self.bytes
    }

    fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(&**name),
            None => Cow::Owned(format!("{:p}", self.bytes.as_ptr())),
        }
    }

    fn source_byte_offset(&self) -> Option<usize> {
        self.name.is_some().then_some(self.source_byte_offset)
    }
}

impl_span_identity!(RetypedSpan<'a>);

/// Writable view of bytes as elements of `T`, at any alignment
pub struct RetypedSpanMut<'a, T: bytemuck::Pod> {
    bytes: &'a mut [u8],
    name: Option<Cow<'a, str>>,
    source_byte_offset: usize,
    _phantom: PhantomData<T>,
}

impl<'a, T: bytemuck::Pod> RetypedSpanMut<'a, T> {
    #[track_caller]
    pub fn new(bytes: &'a mut [u8]) -> Self {
        assert_retypable::<u8, T>(bytes.len());
        Self {
            bytes,
            name: None,
            source_byte_offset: 0,
            _phantom: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<Cow<'a, str>>, source_byte_offset: usize) -> Self {
        self.name = Some(name.into());
        self.source_byte_offset = source_byte_offset;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn into_bytes(self) -> &'a mut [u8] {
        self.bytes
    }

    /// Shared view of the same elements
    pub fn as_retyped(&self) -> RetypedSpan<'_, T> {
        RetypedSpan {
            bytes: &*self.bytes,
            name: self.name.as_deref().map(Cow::Borrowed),
            source_byte_offset: self.source_byte_offset,
            _phantom: PhantomData,
        }
    }

    /// Slice-backed writable view, if the start is aligned for `T`
    ///
    /// Hands the view back unchanged when it is not.
    pub fn try_into_span_mut(self) -> Result<SpanMut<'a, T>, Self> {
        if is_aligned_for::<T>(self.bytes.as_ptr()) {
            Ok(SpanMut::new(retype_mut(self.bytes)))
        } else {
            Err(self)
        }
    }

    #[track_caller]
    pub fn subspan(&self, index: usize, len: Option<usize>) -> RetypedSpan<'_, T> {
        self.as_retyped().subspan(index, len)
    }

    /// Writable view of elements `index..index + len`, reborrowing this one
    #[track_caller]
    pub fn subspan_mut(&mut self, index: usize, len: Option<usize>) -> RetypedSpanMut<'_, T> {
        let range = byte_range::<T>(subspan_range(&*self, index, len));
        RetypedSpanMut {
            bytes: &mut self.bytes[range],
            name: self.name.as_deref().map(Cow::Borrowed),
            source_byte_offset: child_offset::<T>(self.source_byte_offset, index),
            _phantom: PhantomData,
        }
    }

    /// Writable view of elements `index..index + len`, consuming this one
    #[track_caller]
    pub fn into_subspan(self, index: usize, len: Option<usize>) -> RetypedSpanMut<'a, T> {
        let range = byte_range::<T>(subspan_range(&self, index, len));
        let source_byte_offset = child_offset::<T>(self.source_byte_offset, index);
        let bytes = self.bytes;
        RetypedSpanMut {
            bytes: &mut bytes[range],
            name: self.name,
            source_byte_offset,
            _phantom: PhantomData,
        }
    }

    /// Reinterpret the whole view as elements of type `U`
    #[track_caller]
    pub fn cast<U: bytemuck::Pod>(self) -> RetypedSpanMut<'a, U> {
        assert_retypable::<u8, U>(self.bytes.len());
        RetypedSpanMut {
            bytes: self.bytes,
            name: self.name,
            source_byte_offset: self.source_byte_offset,
            _phantom: PhantomData,
        }
    }
}

impl<T: bytemuck::Pod> SpanBase for RetypedSpanMut<'_, T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        &*self.bytes
    }

    fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(&**name),
            None => Cow::Owned(format!("{:p}", self.bytes.as_ptr())),
        }
    }

    fn source_byte_offset(&self) -> Option<usize> {
        self.name.is_some().then_some(self.source_byte_offset)
    }
}

impl<T: bytemuck::Pod> SpanBaseMut for RetypedSpanMut<'_, T> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }
}

impl_span_identity!(RetypedSpanMut<'a>);

fn byte_range<T>(elements: Range<usize>) -> Range<usize> {
    elements.start * size_of::<T>()..elements.end * size_of::<T>()
}

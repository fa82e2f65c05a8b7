//! Views that carry a display name and provenance offset
//!
//! A named view remembers which resource it came from and where in that
//! resource its first byte lives. Subspans inherit both, so a diagnostic
//! raised deep inside a parser still points at the absolute position in the
//! original file.

use alloc::{borrow::Cow, format};

use crate::{
    traits::view::subspan_range,
    validation::{bounds::child_offset, layout::assert_retypable},
    RetypedSpan, RetypedSpanMut, Span, SpanBase, SpanBaseMut, SpanMut, SpanSlice, SpanSliceMut,
};

/// Read-only view with a name and source byte offset
#[derive(Clone)]
pub struct NamedSpan<'a, T: bytemuck::Pod> {
    span: Span<'a, T>,
    name: Cow<'a, str>,
    source_byte_offset: usize,
}

impl<'a, T: bytemuck::Pod> NamedSpan<'a, T> {
    /// Named view of `data` starting at offset zero of its resource
    pub fn new(data: &'a [T], name: impl Into<Cow<'a, str>>) -> Self {
        Self::with_offset(Span::new(data), name, 0)
    }

    /// Named view of `span` whose first byte sits at `source_byte_offset`
    pub fn with_offset(
        span: Span<'a, T>,
        name: impl Into<Cow<'a, str>>,
        source_byte_offset: usize,
    ) -> Self {
        Self {
            span,
            name: name.into(),
            source_byte_offset,
        }
    }

    /// Name of the resource this view belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the first element within the named resource
    pub fn source_byte_offset(&self) -> usize {
        self.source_byte_offset
    }

    /// The underlying unnamed view
    pub fn as_span(&self) -> Span<'a, T> {
        self.span
    }

    /// Named view of elements `index..index + len`
    ///
    /// `name` and `source_byte_offset` override what the subspan would
    /// otherwise inherit; by default it keeps the parent's name and its
    /// offset advances by `index` elements.
    #[track_caller]
    pub fn subspan_named(
        &self,
        index: usize,
        len: Option<usize>,
        name: Option<Cow<'a, str>>,
        source_byte_offset: Option<usize>,
    ) -> NamedSpan<'a, T> {
        let name = match name {
            Some(name) => name,
            None => self.name.clone(),
        };
        let source_byte_offset = source_byte_offset
            .unwrap_or_else(|| child_offset::<T>(self.source_byte_offset, index));

        // validated against this view so the diagnostic names the parent
        let range = subspan_range(self, index, len);
        NamedSpan::with_offset(
            Span::new(&self.span.into_slice()[range]),
            name,
            source_byte_offset,
        )
    }

    /// Named view of elements `index..index + len`, inheriting name and offset
    #[track_caller]
    pub fn subspan(&self, index: usize, len: Option<usize>) -> NamedSpan<'a, T> {
        self.subspan_named(index, len, None, None)
    }

    /// Elements `index..index + len` reinterpreted as `U`, keeping provenance
    ///
    /// `name` and `source_byte_offset` behave as in
    /// [`NamedSpan::subspan_named`]; the default offset advances by `index`
    /// elements of `T`. Only the byte length must divide by `size_of::<U>()`.
    #[track_caller]
    pub fn subspan_named_as<U: bytemuck::Pod>(
        &self,
        index: usize,
        len: Option<usize>,
        name: Option<Cow<'a, str>>,
        source_byte_offset: Option<usize>,
    ) -> RetypedSpan<'a, U> {
        let count = len.unwrap_or_else(|| self.size().saturating_sub(index));
        assert_retypable::<T, U>(count);
        let name = match name {
            Some(name) => name,
            None => self.name.clone(),
        };
        let source_byte_offset = source_byte_offset
            .unwrap_or_else(|| child_offset::<T>(self.source_byte_offset, index));

        let range = subspan_range(self, index, Some(count));
        RetypedSpan::new(bytemuck::cast_slice(&self.span.into_slice()[range]))
            .with_name(name, source_byte_offset)
    }

    /// Elements `index..index + len` as `U`, inheriting name and offset
    #[track_caller]
    pub fn subspan_as<U: bytemuck::Pod>(
        &self,
        index: usize,
        len: Option<usize>,
    ) -> RetypedSpan<'a, U> {
        self.subspan_named_as(index, len, None, None)
    }
}

impl<'a, T: bytemuck::Pod> From<Span<'a, T>> for NamedSpan<'a, T> {
    fn from(span: Span<'a, T>) -> Self {
        let name = format!("{:p}", span.data());
        Self::with_offset(span, name, 0)
    }
}

impl<'a, T: bytemuck::Pod> From<NamedSpan<'a, T>> for Span<'a, T> {
    fn from(named: NamedSpan<'a, T>) -> Self {
        named.span
    }
}

impl<T: bytemuck::Pod> SpanBase for NamedSpan<'_, T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        self.span.as_bytes()
    }

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn source_byte_offset(&self) -> Option<usize> {
        Some(self.source_byte_offset)
    }
}

impl<T: bytemuck::Pod> SpanSlice for NamedSpan<'_, T> {
    fn as_slice(&self) -> &[T] {
        self.span.into_slice()
    }
}

impl_span_index!(NamedSpan<'a>);
impl_span_identity!(NamedSpan<'a>);

/// Writable view with a name and source byte offset
pub struct NamedSpanMut<'a, T: bytemuck::Pod> {
    span: SpanMut<'a, T>,
    name: Cow<'a, str>,
    source_byte_offset: usize,
}

impl<'a, T: bytemuck::Pod> NamedSpanMut<'a, T> {
    pub fn new(data: &'a mut [T], name: impl Into<Cow<'a, str>>) -> Self {
        Self::with_offset(SpanMut::new(data), name, 0)
    }

    pub fn with_offset(
        span: SpanMut<'a, T>,
        name: impl Into<Cow<'a, str>>,
        source_byte_offset: usize,
    ) -> Self {
        Self {
            span,
            name: name.into(),
            source_byte_offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_byte_offset(&self) -> usize {
        self.source_byte_offset
    }

    /// Shared named view of the same elements
    pub fn as_named_span(&self) -> NamedSpan<'_, T> {
        NamedSpan::with_offset(
            self.span.as_span(),
            Cow::Borrowed(&*self.name),
            self.source_byte_offset,
        )
    }

    /// Read-only named view of elements `index..index + len`
    #[track_caller]
    pub fn subspan(&self, index: usize, len: Option<usize>) -> NamedSpan<'_, T> {
        self.as_named_span().subspan(index, len)
    }

    /// Writable named view of elements `index..index + len`, reborrowing this one
    ///
    /// `name` and `source_byte_offset` override what the subspan would
    /// otherwise inherit, as in [`NamedSpan::subspan_named`].
    #[track_caller]
    pub fn subspan_named_mut<'s>(
        &'s mut self,
        index: usize,
        len: Option<usize>,
        name: Option<Cow<'s, str>>,
        source_byte_offset: Option<usize>,
    ) -> NamedSpanMut<'s, T> {
        let range = subspan_range(&*self, index, len);
        let source_byte_offset = source_byte_offset
            .unwrap_or_else(|| child_offset::<T>(self.source_byte_offset, index));
        let name = match name {
            Some(name) => name,
            None => Cow::Borrowed(&*self.name),
        };
        NamedSpanMut::with_offset(
            SpanMut::new(&mut self.span.as_mut_slice()[range]),
            name,
            source_byte_offset,
        )
    }

    /// Writable named view of elements `index..index + len`, inheriting name and offset
    #[track_caller]
    pub fn subspan_mut(&mut self, index: usize, len: Option<usize>) -> NamedSpanMut<'_, T> {
        self.subspan_named_mut(index, len, None, None)
    }

    /// Writable named view of elements `index..index + len`, consuming this one
    #[track_caller]
    pub fn into_subspan(self, index: usize, len: Option<usize>) -> NamedSpanMut<'a, T> {
        let range = subspan_range(&self, index, len);
        let source_byte_offset = child_offset::<T>(self.source_byte_offset, index);
        let data = self.span.into_slice();
        NamedSpanMut::with_offset(
            SpanMut::new(&mut data[range]),
            self.name,
            source_byte_offset,
        )
    }

    /// Writable elements `index..index + len` reinterpreted as `U`, reborrowing this one
    ///
    /// See [`NamedSpan::subspan_named_as`] for the override rules.
    #[track_caller]
    pub fn subspan_named_mut_as<'s, U: bytemuck::Pod>(
        &'s mut self,
        index: usize,
        len: Option<usize>,
        name: Option<Cow<'s, str>>,
        source_byte_offset: Option<usize>,
    ) -> RetypedSpanMut<'s, U> {
        let count = len.unwrap_or_else(|| self.size().saturating_sub(index));
        assert_retypable::<T, U>(count);
        let range = subspan_range(&*self, index, Some(count));
        let source_byte_offset = source_byte_offset
            .unwrap_or_else(|| child_offset::<T>(self.source_byte_offset, index));
        let name = match name {
            Some(name) => name,
            None => Cow::Borrowed(&*self.name),
        };
        RetypedSpanMut::new(bytemuck::cast_slice_mut(&mut self.span.as_mut_slice()[range]))
            .with_name(name, source_byte_offset)
    }

    /// Writable elements `index..index + len` as `U`, consuming this one
    #[track_caller]
    pub fn into_subspan_as<U: bytemuck::Pod>(
        self,
        index: usize,
        len: Option<usize>,
    ) -> RetypedSpanMut<'a, U> {
        let count = len.unwrap_or_else(|| self.size().saturating_sub(index));
        assert_retypable::<T, U>(count);
        let range = subspan_range(&self, index, Some(count));
        let source_byte_offset = child_offset::<T>(self.source_byte_offset, index);
        let data = self.span.into_slice();
        RetypedSpanMut::new(bytemuck::cast_slice_mut(&mut data[range]))
            .with_name(self.name, source_byte_offset)
    }
}

impl<'a, T: bytemuck::Pod> From<SpanMut<'a, T>> for NamedSpanMut<'a, T> {
    fn from(span: SpanMut<'a, T>) -> Self {
        let name = format!("{:p}", span.data());
        Self::with_offset(span, name, 0)
    }
}

impl<T: bytemuck::Pod> SpanBase for NamedSpanMut<'_, T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        self.span.as_bytes()
    }

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn source_byte_offset(&self) -> Option<usize> {
        Some(self.source_byte_offset)
    }
}

impl<T: bytemuck::Pod> SpanSlice for NamedSpanMut<'_, T> {
    fn as_slice(&self) -> &[T] {
        self.span.as_slice()
    }
}

impl<T: bytemuck::Pod> SpanBaseMut for NamedSpanMut<'_, T> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.span.as_bytes_mut()
    }
}

impl<T: bytemuck::Pod> SpanSliceMut for NamedSpanMut<'_, T> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self.span.as_mut_slice()
    }
}

impl_span_index!(mut NamedSpanMut<'a>);
impl_span_identity!(NamedSpanMut<'a>);

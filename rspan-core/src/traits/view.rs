//! Validated buffer view capability
//!
//! [`SpanBase`] is implemented by every view-like type in the crate (plain
//! spans, named spans, owners, retyped views) and provides the whole
//! read/decode surface on top of a single `as_bytes` accessor. Elements are
//! read by value, so the bytes may sit at any alignment. [`SpanSlice`] adds
//! element references for views whose storage is a real `[T]`. Every
//! data-producing method validates its access first and treats a violation
//! as fatal.

use alloc::{borrow::Cow, format, string::String};
use core::{
    mem::size_of,
    ops::Range,
};

use crate::{
    endian::{read_u24_le, ByteOrder, DEFAULT_BYTE_ORDER},
    iter::SpanIter,
    stream::MemoryReadStream,
    validation::bounds::{self, byte_delta, check_invalid_bounds, ViewIdentity},
    SpanError, ValidationMode,
};

/// Read access to a bounds-checked run of elements
pub trait SpanBase {
    /// Element type of the view
    type Item: bytemuck::Pod;

    /// The bytes covered by the view
    fn as_bytes(&self) -> &[u8];

    /// Name used in diagnostics
    ///
    /// Unnamed views are identified by the address of their first element.
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{:p}", self.as_bytes().as_ptr()))
    }

    /// Byte offset of the first element within the original named buffer
    ///
    /// `None` for views that carry no provenance.
    fn source_byte_offset(&self) -> Option<usize> {
        None
    }

    /// Number of elements
    fn size(&self) -> usize {
        self.as_bytes().len() / size_of::<Self::Item>().max(1)
    }

    /// Number of bytes covered by the view
    fn byte_size(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the view covers no elements
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Address of the first element, for identity checks only
    ///
    /// Retyped views may return an address that is not aligned for the
    /// element type; never dereference it.
    fn data(&self) -> *const Self::Item {
        self.as_bytes().as_ptr().cast()
    }

    /// Check an access without failing
    fn check_bounds(
        &self,
        index: usize,
        delta_in_bytes: isize,
        mode: ValidationMode,
    ) -> Result<(), SpanError> {
        let element_size = size_of::<Self::Item>();
        if !check_invalid_bounds(index, delta_in_bytes, element_size, self.size()) {
            return Ok(());
        }

        let name = self.display_name();
        bounds::validate(
            index,
            delta_in_bytes,
            element_size,
            self.size(),
            mode,
            ViewIdentity {
                name: &name,
                source_byte_offset: self.source_byte_offset(),
            },
        )
    }

    /// Validate an access, failing fatally with a diagnostic if it is out of range
    #[track_caller]
    fn validate(&self, index: usize, delta_in_bytes: isize, mode: ValidationMode) {
        if let Err(err) = self.check_bounds(index, delta_in_bytes, mode) {
            bounds::raise(err);
        }
    }

    /// Copy of the element at `index`
    #[track_caller]
    fn get(&self, index: usize) -> Self::Item {
        let element_size = size_of::<Self::Item>();
        self.validate(index, element_size as isize, ValidationMode::Read);
        let start = index * element_size;
        bytemuck::pod_read_unaligned(&self.as_bytes()[start..start + element_size])
    }

    /// `N` raw bytes starting at element `index`
    #[track_caller]
    fn read_bytes_at<const N: usize>(&self, index: usize) -> [u8; N] {
        self.validate(index, N as isize, ValidationMode::Read);
        let start = index * size_of::<Self::Item>();
        let mut out = [0u8; N];
        out.copy_from_slice(&self.as_bytes()[start..start + N]);
        out
    }

    #[track_caller]
    fn get_int8_at(&self, index: usize) -> i8 {
        self.get_uint8_at(index) as i8
    }

    #[track_caller]
    fn get_uint8_at(&self, index: usize) -> u8 {
        let [byte] = self.read_bytes_at::<1>(index);
        byte
    }

    #[track_caller]
    fn get_int16_be_at(&self, index: usize) -> i16 {
        self.get_uint16_be_at(index) as i16
    }

    #[track_caller]
    fn get_int16_le_at(&self, index: usize) -> i16 {
        self.get_uint16_le_at(index) as i16
    }

    #[track_caller]
    fn get_uint16_be_at(&self, index: usize) -> u16 {
        ByteOrder::Big.read_u16(self.read_bytes_at(index))
    }

    #[track_caller]
    fn get_uint16_le_at(&self, index: usize) -> u16 {
        ByteOrder::Little.read_u16(self.read_bytes_at(index))
    }

    /// Little-endian 24-bit value; there is no big-endian variant
    #[track_caller]
    fn get_uint24_le_at(&self, index: usize) -> u32 {
        read_u24_le(self.read_bytes_at(index))
    }

    /// 32-bit value in [`DEFAULT_BYTE_ORDER`]
    #[track_caller]
    fn get_uint32_at(&self, index: usize) -> u32 {
        DEFAULT_BYTE_ORDER.read_u32(self.read_bytes_at(index))
    }

    #[track_caller]
    fn get_int32_be_at(&self, index: usize) -> i32 {
        self.get_uint32_be_at(index) as i32
    }

    #[track_caller]
    fn get_int32_le_at(&self, index: usize) -> i32 {
        self.get_uint32_le_at(index) as i32
    }

    #[track_caller]
    fn get_uint32_be_at(&self, index: usize) -> u32 {
        ByteOrder::Big.read_u32(self.read_bytes_at(index))
    }

    #[track_caller]
    fn get_uint32_le_at(&self, index: usize) -> u32 {
        ByteOrder::Little.read_u32(self.read_bytes_at(index))
    }

    /// Raw bytes of a string starting at element `index`
    ///
    /// With no explicit length the run stops at the first NUL byte, or at
    /// the end of the view if there is none.
    #[track_caller]
    fn get_string_bytes_at(&self, index: usize, len: Option<usize>) -> &[u8] {
        let element_size = size_of::<Self::Item>();
        let count = match len {
            Some(count) => count,
            None => {
                self.validate(index, 0, ValidationMode::Read);
                let tail = &self.as_bytes()[index * element_size..];
                let nul = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
                nul / element_size
            }
        };

        self.validate(index, byte_delta(count, element_size), ValidationMode::Read);
        let start = index * element_size;
        &self.as_bytes()[start..start + count * element_size]
    }

    /// Text starting at element `index`, see [`SpanBase::get_string_bytes_at`]
    ///
    /// Invalid UTF-8 is replaced rather than rejected; resource strings are
    /// frequently in legacy code pages.
    #[track_caller]
    fn get_string_at(&self, index: usize, len: Option<usize>) -> String {
        String::from_utf8_lossy(self.get_string_bytes_at(index, len)).into_owned()
    }

    /// Sequential reader over elements `index..index + len`
    ///
    /// The stream borrows the view's memory; it never takes ownership.
    #[track_caller]
    fn to_stream(&self, index: usize, len: Option<usize>) -> MemoryReadStream<'_> {
        let element_size = size_of::<Self::Item>();
        let range = access_range(self, index, len, ValidationMode::Read);
        let bytes = &self.as_bytes()[range.start * element_size..range.end * element_size];
        MemoryReadStream::with_name(bytes, self.display_name())
    }

    /// Copy the whole view into `target`
    ///
    /// `target` must have room for every byte of this view. To copy only a
    /// portion, take a subspan first.
    #[track_caller]
    fn copy_data_to<D>(&self, target: &mut D)
    where
        D: SpanBaseMut + ?Sized,
    {
        let byte_size = self.byte_size();
        assert!(
            byte_size % size_of::<D::Item>() == 0,
            "cannot copy {byte_size} bytes into {}-byte elements",
            size_of::<D::Item>()
        );
        target.validate(0, byte_delta(byte_size, 1), ValidationMode::Write);
        target.as_bytes_mut()[..byte_size].copy_from_slice(self.as_bytes());
    }

    /// Copy the whole view to a raw destination without any validation
    ///
    /// # Safety
    ///
    /// `target` must be valid for writes of [`SpanBase::byte_size`] bytes and
    /// must not overlap this view.
    unsafe fn unsafe_copy_data_to(&self, target: *mut u8) {
        let bytes = self.as_bytes();
        // SAFETY: the caller guarantees `target` can hold `bytes.len()` bytes
        // and does not alias the source.
        unsafe { core::ptr::copy_nonoverlapping(bytes.as_ptr(), target, bytes.len()) }
    }

    /// Bidirectional, bounds-checked cursor positioned at the first element
    fn iter(&self) -> SpanIter<'_, Self> {
        SpanIter::new(self, 0)
    }

    /// Cursor positioned at `index`, validated as a seek
    #[track_caller]
    fn cursor_at(&self, index: usize) -> SpanIter<'_, Self> {
        SpanIter::new(self, index)
    }

    /// Whether both views cover exactly the same memory
    fn same_as<O>(&self, other: &O) -> bool
    where
        O: SpanBase + ?Sized,
    {
        self.as_bytes().as_ptr() == other.as_bytes().as_ptr() && self.size() == other.size()
    }

    /// Distance from `other`'s first element to this view's, in elements
    fn offset_from<O>(&self, other: &O) -> isize
    where
        O: SpanBase<Item = Self::Item> + ?Sized,
    {
        let element_size = size_of::<Self::Item>().max(1) as isize;
        let delta = self.as_bytes().as_ptr() as isize - other.as_bytes().as_ptr() as isize;
        delta / element_size
    }
}

/// Views backed by a properly aligned `[Item]`
pub trait SpanSlice: SpanBase {
    /// The elements covered by the view
    fn as_slice(&self) -> &[Self::Item];

    /// Element at `index`
    #[track_caller]
    fn element(&self, index: usize) -> &Self::Item {
        self.validate(
            index,
            size_of::<Self::Item>() as isize,
            ValidationMode::Read,
        );
        &self.as_slice()[index]
    }

    /// Elements `index..index + len` after a single up-front validation
    ///
    /// Use this only in hot loops, like per-pixel or per-sample processing,
    /// where validating every read would be too slow. `None` takes the rest
    /// of the view.
    #[track_caller]
    fn get_unsafe_data_at(&self, index: usize, len: Option<usize>) -> &[Self::Item] {
        let range = access_range(self, index, len, ValidationMode::Read);
        &self.as_slice()[range]
    }
}

/// Write access to a bounds-checked run of elements
pub trait SpanBaseMut: SpanBase {
    /// The bytes covered by the view
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Overwrite the element at `index`
    #[track_caller]
    fn set(&mut self, index: usize, value: Self::Item) {
        let element_size = size_of::<Self::Item>();
        self.validate(index, element_size as isize, ValidationMode::Write);
        let start = index * element_size;
        self.as_bytes_mut()[start..start + element_size]
            .copy_from_slice(bytemuck::bytes_of(&value));
    }
}

/// Mutable element access for views backed by an aligned `[Item]`
pub trait SpanSliceMut: SpanSlice + SpanBaseMut {
    /// The elements covered by the view
    fn as_mut_slice(&mut self) -> &mut [Self::Item];

    /// Mutable element at `index`
    #[track_caller]
    fn element_mut(&mut self, index: usize) -> &mut Self::Item {
        self.validate(
            index,
            size_of::<Self::Item>() as isize,
            ValidationMode::Write,
        );
        &mut self.as_mut_slice()[index]
    }

    /// Mutable iteration over every element
    fn iter_mut(&mut self) -> core::slice::IterMut<'_, Self::Item> {
        self.as_mut_slice().iter_mut()
    }

    /// Mutable elements `index..index + len` after a single validation
    ///
    /// See [`SpanSlice::get_unsafe_data_at`].
    #[track_caller]
    fn get_unsafe_data_at_mut(&mut self, index: usize, len: Option<usize>) -> &mut [Self::Item] {
        let range = access_range(self, index, len, ValidationMode::Write);
        &mut self.as_mut_slice()[range]
    }
}

/// Clip an optional length to the rest of the view and validate the range
#[track_caller]
pub(crate) fn access_range<S>(
    span: &S,
    index: usize,
    len: Option<usize>,
    mode: ValidationMode,
) -> Range<usize>
where
    S: SpanBase + ?Sized,
{
    let count = len.unwrap_or_else(|| span.size().saturating_sub(index));
    span.validate(index, byte_delta(count, size_of::<S::Item>()), mode);
    index..index + count
}

/// Range of a subspan, validated as a seek
#[track_caller]
pub(crate) fn subspan_range<S>(span: &S, index: usize, len: Option<usize>) -> Range<usize>
where
    S: SpanBase + ?Sized,
{
    access_range(span, index, len, ValidationMode::Seek)
}

//! Non-owning, bounds-checked views over element storage
//!
//! [`Span`] is a shared view and [`SpanMut`] a unique, writable one. Neither
//! ever frees memory; the borrow checker ties them to whatever owns the
//! buffer, so a view cannot outlive its storage.

use crate::{
    traits::view::subspan_range, validation::layout::assert_retypable, RetypedSpan,
    RetypedSpanMut, SpanBase, SpanBaseMut, SpanSlice, SpanSliceMut,
};

/// Read-only view over a contiguous run of `T`
#[derive(Clone, Copy)]
pub struct Span<'a, T: bytemuck::Pod> {
    data: &'a [T],
}

impl<'a, T: bytemuck::Pod> Span<'a, T> {
    /// Wrap a slice
    pub const fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    /// Build a view from a raw pointer and element count
    ///
    /// # Safety
    ///
    /// `data` must be valid for reads of `len` elements for `'a` and the
    /// memory must not be mutated while the view is alive.
    pub unsafe fn from_raw_parts(data: *const T, len: usize) -> Self {
        // SAFETY: upheld by the caller.
        Self {
            data: unsafe { core::slice::from_raw_parts(data, len) },
        }
    }

    /// The covered elements, with the lifetime of the underlying buffer
    pub const fn into_slice(self) -> &'a [T] {
        self.data
    }

    /// Reinterpret the whole view as elements of type `U`
    ///
    /// Panics if the byte length does not divide by `size_of::<U>()`. The
    /// data may sit at any alignment.
    #[track_caller]
    pub fn cast<U: bytemuck::Pod>(self) -> RetypedSpan<'a, U> {
        assert_retypable::<T, U>(self.data.len());
        RetypedSpan::new(bytemuck::cast_slice(self.data))
    }

    /// View of elements `index..index + len`
    ///
    /// `None` takes everything from `index` to the end.
    #[track_caller]
    pub fn subspan(&self, index: usize, len: Option<usize>) -> Span<'a, T> {
        let range = subspan_range(self, index, len);
        Span::new(&self.data[range])
    }

    /// View of elements `index..index + len` reinterpreted as `U`
    ///
    /// The byte length of the range must divide evenly by `size_of::<U>()`;
    /// the start may sit at any alignment.
    #[track_caller]
    pub fn subspan_as<U: bytemuck::Pod>(
        &self,
        index: usize,
        len: Option<usize>,
    ) -> RetypedSpan<'a, U> {
        let count = len.unwrap_or_else(|| self.data.len().saturating_sub(index));
        assert_retypable::<T, U>(count);
        let range = subspan_range(self, index, Some(count));
        RetypedSpan::new(bytemuck::cast_slice(&self.data[range]))
    }

    /// Reset to an empty view
    pub fn clear(&mut self) {
        self.data = &[];
    }
}

impl<T: bytemuck::Pod> Default for Span<'_, T> {
    fn default() -> Self {
        Self { data: &[] }
    }
}

impl<'a, T: bytemuck::Pod> From<&'a [T]> for Span<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T: bytemuck::Pod, const N: usize> From<&'a [T; N]> for Span<'a, T> {
    fn from(data: &'a [T; N]) -> Self {
        Self::new(data)
    }
}

impl<T: bytemuck::Pod> SpanBase for Span<'_, T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.data)
    }
}

impl<T: bytemuck::Pod> SpanSlice for Span<'_, T> {
    fn as_slice(&self) -> &[T] {
        self.data
    }
}

impl_span_index!(Span<'a>);
impl_span_identity!(Span<'a>);

/// Writable view over a contiguous run of `T`
pub struct SpanMut<'a, T: bytemuck::Pod> {
    data: &'a mut [T],
}

impl<'a, T: bytemuck::Pod> SpanMut<'a, T> {
    /// Wrap a mutable slice
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }

    /// Build a view from a raw pointer and element count
    ///
    /// # Safety
    ///
    /// `data` must be valid for reads and writes of `len` elements for `'a`
    /// and nothing else may access that memory while the view is alive.
    pub unsafe fn from_raw_parts(data: *mut T, len: usize) -> Self {
        // SAFETY: upheld by the caller.
        Self {
            data: unsafe { core::slice::from_raw_parts_mut(data, len) },
        }
    }

    /// The covered elements, with the lifetime of the underlying buffer
    pub fn into_slice(self) -> &'a mut [T] {
        self.data
    }

    /// Shared view of the same elements
    pub fn as_span(&self) -> Span<'_, T> {
        Span::new(self.data)
    }

    /// Reinterpret the whole view as elements of type `U`, at any alignment
    #[track_caller]
    pub fn cast<U: bytemuck::Pod>(self) -> RetypedSpanMut<'a, U> {
        assert_retypable::<T, U>(self.data.len());
        RetypedSpanMut::new(bytemuck::cast_slice_mut(self.data))
    }

    /// Read-only view of elements `index..index + len`
    #[track_caller]
    pub fn subspan(&self, index: usize, len: Option<usize>) -> Span<'_, T> {
        self.as_span().subspan(index, len)
    }

    /// Writable view of elements `index..index + len`, reborrowing this one
    #[track_caller]
    pub fn subspan_mut(&mut self, index: usize, len: Option<usize>) -> SpanMut<'_, T> {
        let range = subspan_range(self, index, len);
        SpanMut::new(&mut self.data[range])
    }

    /// Writable view of elements `index..index + len`, consuming this one
    #[track_caller]
    pub fn into_subspan(self, index: usize, len: Option<usize>) -> SpanMut<'a, T> {
        let range = subspan_range(&self, index, len);
        let data = self.data;
        SpanMut::new(&mut data[range])
    }

    /// Writable view of elements `index..index + len` reinterpreted as `U`
    ///
    /// Like [`Span::subspan_as`], only the byte length must divide evenly.
    #[track_caller]
    pub fn into_subspan_as<U: bytemuck::Pod>(
        self,
        index: usize,
        len: Option<usize>,
    ) -> RetypedSpanMut<'a, U> {
        let count = len.unwrap_or_else(|| self.data.len().saturating_sub(index));
        assert_retypable::<T, U>(count);
        let range = subspan_range(&self, index, Some(count));
        let data = self.data;
        RetypedSpanMut::new(bytemuck::cast_slice_mut(&mut data[range]))
    }

    /// Reset to an empty view
    pub fn clear(&mut self) {
        self.data = &mut [];
    }
}

impl<T: bytemuck::Pod> Default for SpanMut<'_, T> {
    fn default() -> Self {
        Self { data: &mut [] }
    }
}

impl<'a, T: bytemuck::Pod> From<&'a mut [T]> for SpanMut<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        Self::new(data)
    }
}

impl<T: bytemuck::Pod> SpanBase for SpanMut<'_, T> {
    type Item = T;

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&*self.data)
    }
}

impl<T: bytemuck::Pod> SpanSlice for SpanMut<'_, T> {
    fn as_slice(&self) -> &[T] {
        &*self.data
    }
}

impl<T: bytemuck::Pod> SpanBaseMut for SpanMut<'_, T> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut *self.data)
    }
}

impl<T: bytemuck::Pod> SpanSliceMut for SpanMut<'_, T> {
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

impl_span_index!(mut SpanMut<'a>);
impl_span_identity!(SpanMut<'a>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationMode;

    static BYTES: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn test_sizes() {
        let words = [1u32, 2, 3];
        let span = Span::new(&words);
        assert_eq!(span.size(), 3);
        assert_eq!(span.byte_size(), 12);
        assert!(!span.is_empty());
        assert!(Span::<u32>::default().is_empty());
    }

    #[test]
    fn test_typed_decoding() {
        let span = Span::new(&BYTES);
        assert_eq!(span.get_uint32_be_at(0), 0x0102_0304);
        assert_eq!(span.get_uint32_le_at(0), 0x0403_0201);
        assert_eq!(span.get_uint16_be_at(4), 0x0506);
        assert_eq!(span.get_uint16_le_at(4), 0x0605);
        assert_eq!(span.subspan(4, Some(4)).get_uint32_be_at(0), 0x0506_0708);
        assert_eq!(span.get_uint32_at(0), 0x0403_0201);
        assert_eq!(span.get_uint8_at(7), 0x08);
    }

    #[test]
    fn test_signed_decoding() {
        let bytes = [0xff, 0xfe, 0x80, 0x00, 0x00, 0x00];
        let span = Span::new(&bytes);
        assert_eq!(span.get_int8_at(0), -1);
        assert_eq!(span.get_int16_be_at(0), -2);
        assert_eq!(span.get_int16_le_at(0), -257);
        assert_eq!(span.get_int32_le_at(2), 0x80);
        assert_eq!(span.get_int32_be_at(0), 0xfffe_8000_u32 as i32);
    }

    #[test]
    fn test_uint24() {
        let bytes = [0x10, 0x20, 0x30];
        assert_eq!(Span::new(&bytes).get_uint24_le_at(0), 0x0030_2010);
    }

    #[test]
    fn test_decoding_on_wider_elements_uses_element_offsets() {
        let words = [
            u16::from_ne_bytes([0x01, 0x02]),
            u16::from_ne_bytes([0x03, 0x04]),
            u16::from_ne_bytes([0x05, 0x06]),
        ];
        let span = Span::new(&words);
        // element 1 starts at byte 2
        assert_eq!(span.get_uint16_le_at(1), 0x0403);
        assert_eq!(span.get_uint32_le_at(1), 0x0605_0403);
    }

    #[test]
    fn test_strings() {
        let bytes = *b"hi\0x";
        let span = Span::new(&bytes);
        assert_eq!(span.get_string_at(0, None), "hi");
        assert_eq!(span.get_string_at(0, Some(4)), "hi\0x");
        assert_eq!(span.get_string_at(3, None), "x");
        assert_eq!(span.get_string_at(4, None), "");
        assert_eq!(span.get_string_bytes_at(1, Some(1)), b"i");
    }

    #[test]
    fn test_subspan_round_trip() {
        let span = Span::new(&BYTES);
        for i in 0..=BYTES.len() {
            for j in i..=BYTES.len() {
                let sub = span.subspan(i, Some(j - i));
                assert_eq!(sub.size(), j - i);
                assert_eq!(sub.data(), BYTES[i..].as_ptr());
            }
        }
    }

    #[test]
    fn test_subspan_default_length_clips() {
        let span = Span::new(&BYTES);
        assert_eq!(span.subspan(3, None).size(), 5);
        assert_eq!(span.subspan(8, None).size(), 0);
    }

    #[test]
    #[should_panic(expected = "Access violation seeking")]
    fn test_subspan_past_end() {
        let bytes = [0u8; 6];
        Span::new(&bytes).subspan(5, Some(10));
    }

    #[test]
    #[should_panic(expected = "Access violation seeking")]
    fn test_subspan_index_past_end() {
        let bytes = [0u8; 6];
        Span::new(&bytes).subspan(7, None);
    }

    #[test]
    fn test_subspan_as() {
        let words = [
            u32::from_ne_bytes([0x01, 0x02, 0x03, 0x04]),
            u32::from_ne_bytes([0x05, 0x06, 0x07, 0x08]),
        ];
        let span = Span::new(&words);

        let halves: RetypedSpan<'_, u16> = span.subspan_as(0, None);
        assert_eq!(halves.size(), 4);
        assert_eq!(halves.get(0), u16::from_ne_bytes([0x01, 0x02]));
        assert_eq!(
            halves.try_as_span().map(|s| s[3]),
            Some(u16::from_ne_bytes([0x07, 0x08]))
        );

        let bytes: RetypedSpan<'_, u8> = span.subspan_as(1, Some(1));
        assert_eq!(bytes.size(), 4);
        assert_eq!(bytes.get(0), 0x05);
    }

    #[test]
    fn test_subspan_as_at_odd_offset() {
        let bytes = &BYTES[..7];
        let halves = Span::new(bytes).subspan_as::<u16>(1, Some(4));
        assert_eq!(halves.size(), 2);
        assert_eq!(halves.get(0), u16::from_ne_bytes([0x02, 0x03]));
        assert_eq!(halves.get(1), u16::from_ne_bytes([0x04, 0x05]));

        let words = Span::new(&BYTES).subspan_as::<u32>(1, Some(4));
        assert_eq!(words.get(0), u32::from_ne_bytes([0x02, 0x03, 0x04, 0x05]));
    }

    #[test]
    #[should_panic(expected = "cannot retype")]
    fn test_subspan_as_requires_divisible_length() {
        let halves: [u16; 3] = [1, 2, 3];
        let _: RetypedSpan<'_, u32> = Span::new(&halves).subspan_as(0, Some(3));
    }

    #[test]
    fn test_empty_access_at_end() {
        let span = Span::new(&BYTES);
        span.validate(8, 0, ValidationMode::Read);
        assert_eq!(span.get_unsafe_data_at(8, None).len(), 0);
        assert!(span.check_bounds(9, 0, ValidationMode::Read).is_err());
    }

    #[test]
    #[should_panic(expected = "Access violation reading")]
    fn test_index_past_end() {
        let span = Span::new(&BYTES);
        let _ = span[8];
    }

    #[test]
    #[should_panic(expected = "Access violation reading")]
    fn test_decode_straddling_end() {
        Span::new(&BYTES).get_uint32_be_at(6);
    }

    #[test]
    fn test_unsafe_data() {
        let span = Span::new(&BYTES);
        assert_eq!(span.get_unsafe_data_at(2, Some(3)), &[0x03, 0x04, 0x05]);
        assert_eq!(span.get_unsafe_data_at(6, None), &[0x07, 0x08]);
    }

    #[test]
    fn test_identity_comparisons() {
        let span = Span::new(&BYTES);
        let same = Span::new(&BYTES[..]);
        let shorter = span.subspan(0, Some(4));
        let later = span.subspan(4, None);

        assert_eq!(span, same);
        assert_ne!(span, shorter);
        assert!(shorter < span);
        assert!(span < later);
        assert_eq!(later.offset_from(&span), 4);

        let copy = BYTES;
        assert_ne!(span, Span::new(&copy));
    }

    #[test]
    fn test_copy_data_to() {
        let mut target = [0u8; 10];
        let mut dest = SpanMut::new(&mut target);
        Span::new(&BYTES).copy_data_to(&mut dest);
        assert_eq!(&target[..8], &BYTES);
        assert_eq!(&target[8..], &[0, 0]);
    }

    #[test]
    fn test_copy_data_to_retyped_target() {
        let mut words = [0u16; 4];
        Span::new(&BYTES).copy_data_to(&mut SpanMut::new(&mut words));
        assert_eq!(words[0], u16::from_ne_bytes([0x01, 0x02]));
    }

    #[test]
    #[should_panic(expected = "Access violation writing")]
    fn test_copy_data_to_small_target() {
        let mut target = [0u8; 4];
        Span::new(&BYTES).copy_data_to(&mut SpanMut::new(&mut target));
    }

    #[test]
    fn test_unsafe_copy_data_to() {
        let mut target = [0u8; 8];
        // SAFETY: target holds exactly byte_size bytes.
        unsafe { Span::new(&BYTES).unsafe_copy_data_to(target.as_mut_ptr()) };
        assert_eq!(target, BYTES);
    }

    #[test]
    fn test_span_mut_writes() {
        let mut buffer = [0u8; 6];
        let mut span = SpanMut::new(&mut buffer);
        span[0] = 0xaa;
        span.set(5, 0xbb);
        {
            let mut tail = span.subspan_mut(2, Some(2));
            tail[1] = 0xcc;
        }
        for byte in span.get_unsafe_data_at_mut(1, Some(1)) {
            *byte = 0xdd;
        }
        assert_eq!(span.get_uint16_be_at(0), 0xaadd);
        assert_eq!(buffer, [0xaa, 0xdd, 0x00, 0xcc, 0x00, 0xbb]);
    }

    #[test]
    #[should_panic(expected = "Access violation writing")]
    fn test_span_mut_write_past_end() {
        let mut buffer = [0u8; 2];
        SpanMut::new(&mut buffer)[2] = 1;
    }

    #[test]
    fn test_into_subspan() {
        let mut buffer = [0u8; 8];
        let mut span = SpanMut::new(&mut buffer);
        span.iter_mut().for_each(|b| *b = 0x11);
        let half = span.into_subspan(4, None);
        assert_eq!(half.size(), 4);
        assert_eq!(half.get_uint32_le_at(0), 0x1111_1111);
    }

    #[test]
    fn test_cast_mut_round_trip() {
        let mut words = [0u32; 2];
        {
            let mut bytes = SpanMut::new(&mut words).cast::<u8>();
            assert_eq!(bytes.size(), 8);
            for index in 0..8 {
                bytes.set(index, index as u8 + 1);
            }
            assert_eq!(bytes.get_uint32_be_at(4), 0x0506_0708);
        }
        assert_eq!(words[0], u32::from_ne_bytes([0x01, 0x02, 0x03, 0x04]));
        assert_eq!(words[1], u32::from_ne_bytes([0x05, 0x06, 0x07, 0x08]));

        let halves = SpanMut::new(&mut words).cast::<u16>();
        let mut back = match halves.try_into_span_mut() {
            Ok(span) => span,
            Err(_) => panic!("u32 storage is aligned for u16"),
        };
        back[3] = 0;
        assert_eq!(words[1], u32::from_ne_bytes([0x05, 0x06, 0x00, 0x00]));
    }

    #[test]
    #[should_panic(expected = "cannot retype 3 elements of 2 bytes into 4-byte elements")]
    fn test_cast_mut_requires_divisible_length() {
        let mut halves = [0u16; 3];
        SpanMut::new(&mut halves).cast::<u32>();
    }

    #[test]
    fn test_into_subspan_as_round_trip() {
        let mut buffer = [0u8; 8];
        {
            let mut words = SpanMut::new(&mut buffer).into_subspan_as::<u32>(2, Some(4));
            assert_eq!(words.size(), 1);
            words.set(0, u32::from_ne_bytes([0xde, 0xad, 0xbe, 0xef]));
            assert_eq!(words.get_uint32_be_at(0), 0xdead_beef);
        }
        assert_eq!(buffer, [0, 0, 0xde, 0xad, 0xbe, 0xef, 0, 0]);

        let mut halves = [0u16; 4];
        {
            let mut bytes = SpanMut::new(&mut halves).into_subspan_as::<u8>(1, None);
            assert_eq!(bytes.size(), 6);
            bytes.set(0, 0x12);
            bytes.set(5, 0x34);
        }
        assert_eq!(halves[1], u16::from_ne_bytes([0x12, 0x00]));
        assert_eq!(halves[3], u16::from_ne_bytes([0x00, 0x34]));
    }

    #[test]
    #[should_panic(expected = "Access violation seeking")]
    fn test_into_subspan_as_past_end() {
        let mut buffer = [0u8; 8];
        SpanMut::new(&mut buffer).into_subspan_as::<u16>(6, Some(4));
    }

    #[test]
    fn test_clear() {
        let mut span = Span::new(&BYTES);
        span.clear();
        assert!(span.is_empty());
    }
}

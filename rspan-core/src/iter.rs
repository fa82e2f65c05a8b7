//! Bounds-checked cursor over a view

use core::{mem::size_of, ptr};

use crate::{SpanBase, ValidationMode};

/// Position within a view that validates every move and read
///
/// A cursor may sit anywhere in `0..=size`; moving outside that range is a
/// seek violation. Iterating yields copies of the remaining elements in order.
pub struct SpanIter<'s, S: SpanBase + ?Sized> {
    span: &'s S,
    index: usize,
    end: usize,
}

impl<'s, S: SpanBase + ?Sized> SpanIter<'s, S> {
    /// Cursor at `index`, validated as a seek
    #[track_caller]
    pub fn new(span: &'s S, index: usize) -> Self {
        span.validate(index, 0, ValidationMode::Seek);
        Self {
            span,
            index,
            end: span.size(),
        }
    }

    /// View this cursor walks
    pub fn span(&self) -> &'s S {
        self.span
    }

    /// Current element index
    pub fn position(&self) -> usize {
        self.index
    }

    /// Move by `delta` elements in either direction
    #[track_caller]
    pub fn seek(&mut self, delta: isize) -> &mut Self {
        let delta_in_bytes = delta.saturating_mul(size_of::<S::Item>() as isize);
        self.span
            .validate(self.index, delta_in_bytes, ValidationMode::Seek);
        self.index = self.index.wrapping_add_signed(delta);
        self
    }

    /// Cursor moved by `delta` elements, leaving this one in place
    #[track_caller]
    pub fn offset(&self, delta: isize) -> Self {
        let mut moved = *self;
        moved.seek(delta);
        moved
    }

    /// Elements from `other` to this cursor
    ///
    /// Both cursors must walk the same view.
    #[track_caller]
    pub fn distance_to(&self, other: &Self) -> isize {
        assert!(
            ptr::addr_eq(self.span, other.span),
            "cursors belong to different views"
        );
        self.index as isize - other.index as isize
    }

    /// Element under the cursor
    #[track_caller]
    pub fn current(&self) -> S::Item {
        self.span.get(self.index)
    }

    /// Element `offset` positions past the cursor
    #[track_caller]
    pub fn get(&self, offset: usize) -> S::Item {
        self.span.get(self.index.saturating_add(offset))
    }

    /// Whether the cursor sits at the end of the view
    pub fn at_end(&self) -> bool {
        self.index >= self.span.size()
    }

    #[track_caller]
    pub fn get_uint8(&self) -> u8 {
        self.span.get_uint8_at(self.index)
    }

    #[track_caller]
    pub fn get_int8(&self) -> i8 {
        self.get_uint8() as i8
    }

    #[track_caller]
    pub fn get_uint16_le(&self) -> u16 {
        self.span.get_uint16_le_at(self.index)
    }

    #[track_caller]
    pub fn get_uint16_be(&self) -> u16 {
        self.span.get_uint16_be_at(self.index)
    }

    #[track_caller]
    pub fn get_int16_le(&self) -> i16 {
        self.get_uint16_le() as i16
    }

    #[track_caller]
    pub fn get_int16_be(&self) -> i16 {
        self.get_uint16_be() as i16
    }

    #[track_caller]
    pub fn get_uint24_le(&self) -> u32 {
        self.span.get_uint24_le_at(self.index)
    }

    /// 32-bit value in the crate's default byte order
    #[track_caller]
    pub fn get_uint32(&self) -> u32 {
        self.span.get_uint32_at(self.index)
    }

    #[track_caller]
    pub fn get_uint32_le(&self) -> u32 {
        self.span.get_uint32_le_at(self.index)
    }

    #[track_caller]
    pub fn get_uint32_be(&self) -> u32 {
        self.span.get_uint32_be_at(self.index)
    }

    #[track_caller]
    pub fn get_int32_le(&self) -> i32 {
        self.get_uint32_le() as i32
    }

    #[track_caller]
    pub fn get_int32_be(&self) -> i32 {
        self.get_uint32_be() as i32
    }
}

impl<S: SpanBase + ?Sized> Clone for SpanIter<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: SpanBase + ?Sized> Copy for SpanIter<'_, S> {}

impl<S: SpanBase + ?Sized> PartialEq for SpanIter<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        ptr::addr_eq(self.span, other.span) && self.index == other.index
    }
}

impl<S: SpanBase + ?Sized> Eq for SpanIter<'_, S> {}

impl<S: SpanBase + ?Sized> core::fmt::Debug for SpanIter<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpanIter")
            .field("span", &self.span.display_name())
            .field("index", &self.index)
            .field("end", &self.end)
            .finish()
    }
}

impl<S: SpanBase + ?Sized> Iterator for SpanIter<'_, S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.end {
            return None;
        }
        let item = self.span.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end.saturating_sub(self.index);
        (len, Some(len))
    }
}

impl<S: SpanBase + ?Sized> DoubleEndedIterator for SpanIter<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.end <= self.index {
            return None;
        }
        self.end -= 1;
        Some(self.span.get(self.end))
    }
}

impl<S: SpanBase + ?Sized> ExactSizeIterator for SpanIter<'_, S> {}

impl<S: SpanBase + ?Sized> core::iter::FusedIterator for SpanIter<'_, S> {}

#[cfg(test)]
mod tests {
    use crate::{NamedSpan, Span, SpanBase};

    static BYTES: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn test_iterate_in_order() {
        let span = Span::new(&BYTES);
        let collected: alloc::vec::Vec<u8> = span.iter().collect();
        assert_eq!(collected, BYTES);
        assert_eq!(span.iter().len(), 8);
        assert_eq!(span.iter().rev().next(), Some(0x08));
    }

    #[test]
    fn test_seek_and_read() {
        let span = Span::new(&BYTES);
        let mut cursor = span.iter();
        assert_eq!(cursor.get_uint32_be(), 0x0102_0304);
        cursor.seek(4);
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.get_uint16_le(), 0x0605);
        assert_eq!(cursor.get_uint24_le(), 0x0007_0605);
        assert_eq!(cursor.current(), 0x05);
        assert_eq!(cursor.get(3), 0x08);
        cursor.seek(-2);
        assert_eq!(cursor.get_uint8(), 0x03);
    }

    #[test]
    fn test_seek_to_end_is_allowed() {
        let span = Span::new(&BYTES);
        let mut cursor = span.iter();
        cursor.seek(8);
        assert!(cursor.at_end());
        assert_eq!(cursor.next(), None);
    }

    #[test]
    #[should_panic(expected = "Access violation seeking")]
    fn test_seek_past_end() {
        let span = Span::new(&BYTES);
        span.cursor_at(6).seek(3);
    }

    #[test]
    #[should_panic(expected = "Access violation seeking")]
    fn test_seek_before_start() {
        let span = Span::new(&BYTES);
        span.cursor_at(2).seek(-3);
    }

    #[test]
    #[should_panic(expected = "Access violation reading cursor.bin")]
    fn test_read_past_end_names_view() {
        let named = NamedSpan::new(&BYTES[..], "cursor.bin");
        named.cursor_at(6).get_uint32_le();
    }

    #[test]
    fn test_distance_and_equality() {
        let span = Span::new(&BYTES);
        let start = span.iter();
        let later = start.offset(5);
        assert_eq!(later.distance_to(&start), 5);
        assert_eq!(start.distance_to(&later), -5);
        assert_eq!(later, span.cursor_at(5));
        assert_ne!(later, start);
    }

    #[test]
    #[should_panic(expected = "different views")]
    fn test_distance_across_views() {
        let a = Span::new(&BYTES);
        let b = Span::new(&BYTES);
        a.iter().distance_to(&b.iter());
    }

    #[test]
    fn test_signed_reads() {
        let bytes = [0xff, 0xff, 0xff, 0xfe];
        let span = Span::new(&bytes);
        let cursor = span.iter();
        assert_eq!(cursor.get_int8(), -1);
        assert_eq!(cursor.get_int16_le(), -1);
        assert_eq!(cursor.get_int32_be(), -2);
        assert_eq!(cursor.get_uint32(), 0xfeff_ffff);
    }
}

/// Validated `Index` (and optionally `IndexMut`) for a view type
macro_rules! impl_span_index {
    (mut $ty:ident $(<$lt:lifetime>)?) => {
        impl_span_index!($ty $(<$lt>)?);

        impl<$($lt,)? T: bytemuck::Pod> core::ops::IndexMut<usize> for $ty<$($lt,)? T> {
            #[track_caller]
            fn index_mut(&mut self, index: usize) -> &mut T {
                $crate::SpanSliceMut::element_mut(self, index)
            }
        }
    };
    ($ty:ident $(<$lt:lifetime>)?) => {
        impl<$($lt,)? T: bytemuck::Pod> core::ops::Index<usize> for $ty<$($lt,)? T> {
            type Output = T;

            #[track_caller]
            fn index(&self, index: usize) -> &T {
                $crate::SpanSlice::element(self, index)
            }
        }
    };
}

/// Address-based equality and ordering for a view type
///
/// Views compare by the memory they cover, never by content.
macro_rules! impl_span_identity {
    ($ty:ident $(<$lt:lifetime>)?) => {
        impl<$($lt,)? T: bytemuck::Pod> PartialEq for $ty<$($lt,)? T> {
            fn eq(&self, other: &Self) -> bool {
                $crate::SpanBase::same_as(self, other)
            }
        }

        impl<$($lt,)? T: bytemuck::Pod> Eq for $ty<$($lt,)? T> {}

        impl<$($lt,)? T: bytemuck::Pod> PartialOrd for $ty<$($lt,)? T> {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<$($lt,)? T: bytemuck::Pod> Ord for $ty<$($lt,)? T> {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                let this = ($crate::SpanBase::data(self), $crate::SpanBase::size(self));
                let that = ($crate::SpanBase::data(other), $crate::SpanBase::size(other));
                this.cmp(&that)
            }
        }

        impl<$($lt,)? T: bytemuck::Pod> core::fmt::Debug for $ty<$($lt,)? T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("name", &$crate::SpanBase::display_name(self))
                    .field("size", &$crate::SpanBase::size(self))
                    .field("source_byte_offset", &$crate::SpanBase::source_byte_offset(self))
                    .finish()
            }
        }
    };
}

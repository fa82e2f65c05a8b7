//! Element layout validation for retyped views
//!
//! Reinterpreting a run of `T` as a run of `U` is a format contract: the
//! byte length must divide evenly by the size of `U`. Breaking it is a
//! programming error, so the asserting helpers panic. Alignment only matters
//! when a retyped run is handed out as a real `&[U]`; byte-backed retyped
//! views read at any address.

use core::mem::{align_of, size_of};

/// Byte length of `count` elements of `T`, if it fits in `usize`
pub const fn checked_byte_len<T>(count: usize) -> Option<usize> {
    count.checked_mul(size_of::<T>())
}

/// Number of `U` elements covering `count` elements of `T`
///
/// Returns `None` when the byte length does not divide evenly by the size
/// of `U` (or either type is zero-sized).
pub const fn retyped_len<T, U>(count: usize) -> Option<usize> {
    let new_size = size_of::<U>();
    if size_of::<T>() == 0 || new_size == 0 {
        return None;
    }

    match checked_byte_len::<T>(count) {
        Some(bytes) if bytes % new_size == 0 => Some(bytes / new_size),
        _ => None,
    }
}

/// Check that a pointer is suitably aligned for `U`
pub fn is_aligned_for<U>(ptr: *const u8) -> bool {
    (ptr as usize) % align_of::<U>() == 0
}

/// Assert that `count` elements of `T` divide evenly into elements of `U`
#[track_caller]
pub fn assert_retypable<T, U>(count: usize) {
    assert!(
        retyped_len::<T, U>(count).is_some(),
        "cannot retype {count} elements of {} bytes into {}-byte elements",
        size_of::<T>(),
        size_of::<U>()
    );
}

/// Reinterpret a slice of `T` as a slice of `U`
///
/// Panics if the byte length does not divide by `size_of::<U>()` or the
/// slice is not aligned for `U`. Check [`is_aligned_for`] first, or use a
/// [`RetypedSpan`](crate::RetypedSpan) when the start may be unaligned.
#[track_caller]
pub fn retype<T: bytemuck::Pod, U: bytemuck::Pod>(slice: &[T]) -> &[U] {
    assert_retypable::<T, U>(slice.len());
    match bytemuck::try_cast_slice(slice) {
        Ok(retyped) => retyped,
        Err(err) => panic!("cannot retype span: {err}"),
    }
}

/// Mutable counterpart of [`retype`]
#[track_caller]
pub fn retype_mut<T: bytemuck::Pod, U: bytemuck::Pod>(slice: &mut [T]) -> &mut [U] {
    assert_retypable::<T, U>(slice.len());
    match bytemuck::try_cast_slice_mut(slice) {
        Ok(retyped) => retyped,
        Err(err) => panic!("cannot retype span: {err}"),
    }
}

//! Access bounds validation for span views
//!
//! This module provides the pure arithmetic that decides whether an access
//! at an element index, spanning a number of bytes, stays inside a view.
//! Nothing here touches memory.

use crate::{BoundsViolation, SpanError, ValidationMode};
use alloc::string::String;

/// Decide whether an access is out of range
///
/// `index` is an element offset into a view of `size` elements, each
/// `element_size` bytes wide. `delta_in_bytes` is the length of the access
/// starting at that element and may be negative for look-backs.
///
/// Large bogus operands could overflow if combined directly, so every
/// quantity is widened to `i128` and each condition is checked on its own.
pub const fn check_invalid_bounds(
    index: usize,
    delta_in_bytes: isize,
    element_size: usize,
    size: usize,
) -> bool {
    let byte_size = size as i128 * element_size as i128;
    let max_byte_offset = index as i128 * element_size as i128 + delta_in_bytes as i128;

    index > size
        || delta_in_bytes as i128 > byte_size
        || max_byte_offset > byte_size
        || max_byte_offset < 0
}

/// Convert an element count into a byte delta for validation
///
/// Counts whose byte length cannot be represented saturate to `isize::MAX`,
/// which is always rejected since no view is that large.
pub const fn byte_delta(count: usize, element_size: usize) -> isize {
    match count.checked_mul(element_size) {
        Some(bytes) if bytes <= isize::MAX as usize => bytes as isize,
        _ => isize::MAX,
    }
}

/// Source offset of element `index` of a view whose first byte is at `parent`
pub(crate) const fn child_offset<T>(parent: usize, index: usize) -> usize {
    parent.saturating_add(index.saturating_mul(core::mem::size_of::<T>()))
}

/// Identity of the view being validated, used only for diagnostics
#[derive(Debug, Clone, Copy)]
pub struct ViewIdentity<'a> {
    /// Display name of the view
    pub name: &'a str,
    /// Source byte offset for named views
    pub source_byte_offset: Option<usize>,
}

/// Validate an access and describe it on failure
///
/// Returns `Ok(())` if the access is in range, otherwise a
/// [`SpanError::OutOfBounds`] carrying everything the diagnostic needs.
pub fn validate(
    index: usize,
    delta_in_bytes: isize,
    element_size: usize,
    size: usize,
    mode: ValidationMode,
    identity: ViewIdentity<'_>,
) -> Result<(), SpanError> {
    if !check_invalid_bounds(index, delta_in_bytes, element_size, size) {
        return Ok(());
    }

    Err(SpanError::OutOfBounds(BoundsViolation {
        mode,
        name: String::from(identity.name),
        index,
        delta_in_bytes,
        element_size,
        size,
        source_byte_offset: identity.source_byte_offset,
    }))
}

/// Report a failed validation as a fatal error
///
/// Bounds violations mean the resource is corrupt or the parser is wrong,
/// so the current load cannot continue.
#[cold]
#[track_caller]
pub fn raise(err: SpanError) -> ! {
    log::error!("{err}");
    panic!("{err}")
}

//! Validation utilities for span access
//!
//! This module contains pure validation functions with no I/O dependencies:
//! bounds arithmetic for element access and layout checks for retyping.

pub mod bounds;
pub mod layout;

pub use bounds::{check_invalid_bounds, validate, ViewIdentity};
pub use layout::{assert_retypable, is_aligned_for, retype, retyped_len};

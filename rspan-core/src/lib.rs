#![no_std]

//! rspan Core - Bounds-Checked Buffer Views
//!
//! This crate provides validated, non-owning views over contiguous element
//! storage, their named variants that carry resource provenance, retyped
//! views that read elements at any alignment, and an owning buffer type.
//! Every access is checked against the view's bounds and a violation is
//! reported with the view's name and absolute offsets.

extern crate alloc;

#[macro_use]
mod macros;

pub mod endian;
pub mod error;
pub mod iter;
pub mod named;
pub mod owner;
pub mod retyped;
pub mod span;
pub mod stream;
pub mod traits;
pub mod validation;

pub use endian::{ByteOrder, DEFAULT_BYTE_ORDER};
pub use error::*;
pub use iter::SpanIter;
pub use named::{NamedSpan, NamedSpanMut};
pub use owner::SpanOwner;
pub use retyped::{RetypedSpan, RetypedSpanMut};
pub use span::{Span, SpanMut};
pub use stream::MemoryReadStream;
pub use traits::{ReadStream, SpanBase, SpanBaseMut, SpanSlice, SpanSliceMut};

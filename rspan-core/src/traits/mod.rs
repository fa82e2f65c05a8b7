//! Abstract interfaces for span views and stream collaborators
//!
//! This module defines the capability traits shared by every view type and
//! the interface owners use to fill themselves from a byte source.

pub mod stream;
pub mod view;

pub use stream::ReadStream;
pub use view::{SpanBase, SpanBaseMut, SpanSlice, SpanSliceMut};

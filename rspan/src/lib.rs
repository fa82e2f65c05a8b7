//! rspan - Bounds-Checked Views over Loaded Resources
//!
//! This library loads binary resources from disk and exposes them through
//! the validated views of `rspan-core`, either read into an owned buffer or
//! memory-mapped.
//!
//! ## Architecture
//!
//! rspan follows a clean core/implementation separation:
//!
//! - **rspan-core**: Views, owners, validation and in-memory streams (no I/O)
//! - **rspan**: File streams, memory mapping and resource loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rspan::{LoadConfig, LoadStrategy, ResourceLoader, SpanBase};
//!
//! fn example() -> rspan::Result<()> {
//!     let config = LoadConfig::with_strategy(LoadStrategy::Auto).with_max_size(64 << 20);
//!     let resource = ResourceLoader::new(config).load("room.dat")?;
//!
//!     // Subspans keep the file name and absolute offset for diagnostics
//!     let header = resource.span().subspan(0, Some(8));
//!     println!("room size: {}", header.get_uint32_le_at(4));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Memory-mapped I/O** (`mmap`): Zero-copy access to large resources
//! - **Serde** (`serde`): Serializable load configuration and errors

pub use rspan_core::*;

pub mod error;
pub mod file_stream;
pub mod loader;
#[cfg(feature = "mmap")]
pub mod mmap_backend;

pub use error::{Error, Result};
pub use file_stream::FileStream;
pub use loader::{LoadConfig, LoadStrategy, Resource, ResourceLoader};
#[cfg(feature = "mmap")]
pub use mmap_backend::MappedFile;

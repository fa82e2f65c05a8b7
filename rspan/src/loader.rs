//! Resource loading with configurable read or map strategy

use std::{borrow::Cow, fs, path::Path};

use rspan_core::{NamedSpan, SpanBase, SpanOwner, SpanSlice};

#[cfg(feature = "mmap")]
use crate::MappedFile;
use crate::{file_stream::display_name, Error, FileStream, Result};

/// How a resource's bytes are brought into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStrategy {
    /// Read the whole file into an owned buffer
    Read,
    /// Memory-map the file
    Mmap,
    /// Map files at or above the configured threshold, read the rest
    Auto,
}

/// Configuration for [`ResourceLoader`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadConfig {
    /// Read or map strategy
    pub strategy: LoadStrategy,
    /// Smallest file size in bytes that `Auto` maps instead of reading
    pub mmap_threshold: u64,
    /// Largest file size in bytes that may be loaded
    pub max_size: Option<u64>,
    /// Display name used instead of the file name
    pub name: Option<String>,
}

impl LoadConfig {
    /// Config using the given strategy and default limits
    pub fn with_strategy(strategy: LoadStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Set the size at which `Auto` switches to mapping
    pub fn with_mmap_threshold(mut self, mmap_threshold: u64) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }

    /// Reject files larger than `max_size` bytes
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Override the display name of loaded resources
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether a file of `size` bytes should be mapped
    pub fn should_map(&self, size: u64) -> bool {
        match self.strategy {
            LoadStrategy::Read => false,
            LoadStrategy::Mmap => true,
            LoadStrategy::Auto => size >= self.mmap_threshold,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            strategy: LoadStrategy::Auto,
            mmap_threshold: 1024 * 1024, // 1 MiB
            max_size: None,
            name: None,
        }
    }
}

/// A loaded resource, either read into memory or mapped
#[derive(Debug)]
pub enum Resource {
    Owned(SpanOwner<u8>),
    #[cfg(feature = "mmap")]
    Mapped(MappedFile),
}

impl Resource {
    /// Named view of the whole resource
    pub fn span(&self) -> NamedSpan<'_, u8> {
        match self {
            Resource::Owned(owner) => owner.span(),
            #[cfg(feature = "mmap")]
            Resource::Mapped(mapped) => mapped.span(),
        }
    }

    /// Whether the bytes are backed by a memory mapping
    pub fn is_mapped(&self) -> bool {
        match self {
            Resource::Owned(_) => false,
            #[cfg(feature = "mmap")]
            Resource::Mapped(_) => true,
        }
    }

    /// Take the owned buffer, if this resource was read into memory
    pub fn into_owner(self) -> Option<SpanOwner<u8>> {
        match self {
            Resource::Owned(owner) => Some(owner),
            #[cfg(feature = "mmap")]
            Resource::Mapped(_) => None,
        }
    }
}

impl SpanBase for Resource {
    type Item = u8;

    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    fn display_name(&self) -> Cow<'_, str> {
        match self {
            Resource::Owned(owner) => owner.display_name(),
            #[cfg(feature = "mmap")]
            Resource::Mapped(mapped) => mapped.display_name(),
        }
    }

    fn source_byte_offset(&self) -> Option<usize> {
        match self {
            Resource::Owned(owner) => owner.source_byte_offset(),
            #[cfg(feature = "mmap")]
            Resource::Mapped(mapped) => mapped.source_byte_offset(),
        }
    }
}

impl SpanSlice for Resource {
    fn as_slice(&self) -> &[u8] {
        match self {
            Resource::Owned(owner) => owner.as_slice(),
            #[cfg(feature = "mmap")]
            Resource::Mapped(mapped) => mapped.as_slice(),
        }
    }
}

/// Loads files as named resources according to a [`LoadConfig`]
#[derive(Debug, Clone, Default)]
pub struct ResourceLoader {
    config: LoadConfig,
}

impl ResourceLoader {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Load `path` as a resource
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Resource> {
        let path = path.as_ref();
        let size = fs::metadata(path)?.len();

        if let Some(limit) = self.config.max_size {
            if size > limit {
                return Err(Error::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        let name = match &self.config.name {
            Some(name) => name.clone(),
            None => display_name(path),
        };

        if self.config.should_map(size) {
            #[cfg(feature = "mmap")]
            {
                match MappedFile::open_named(path, name.as_str()) {
                    Ok(mapped) => return Ok(Resource::Mapped(mapped)),
                    Err(err) => {
                        log::warn!("mapping {} failed, reading instead: {err}", path.display());
                    }
                }
            }

            #[cfg(not(feature = "mmap"))]
            log::warn!(
                "mapping {} requested without mmap support, reading instead",
                path.display()
            );
        }

        let mut stream = FileStream::open(path)?;
        let mut owner = SpanOwner::new();
        owner.allocate_from_stream(&mut stream, None, Some(&name))?;
        log::debug!("read {} ({size} bytes) as {name}", path.display());
        Ok(Resource::Owned(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map() {
        let config = LoadConfig::default().with_mmap_threshold(16);
        assert!(!config.should_map(15));
        assert!(config.should_map(16));
        assert!(!LoadConfig::with_strategy(LoadStrategy::Read).should_map(u64::MAX));
        assert!(LoadConfig::with_strategy(LoadStrategy::Mmap).should_map(0));
    }

    #[test]
    fn test_builder() {
        let config = LoadConfig::with_strategy(LoadStrategy::Read)
            .with_max_size(64)
            .with_name("override");
        assert_eq!(config.strategy, LoadStrategy::Read);
        assert_eq!(config.max_size, Some(64));
        assert_eq!(config.name.as_deref(), Some("override"));
        assert_eq!(config.mmap_threshold, 1024 * 1024);
    }
}

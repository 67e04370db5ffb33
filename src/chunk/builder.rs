//! Builder for constructing store chunks.

use super::error::BuildError;
use super::{build_store_chunk, StoreChunk};
use crate::reducer::Selector;
use crate::structure::Structure;

/// Where a chunk is mounted in the host state tree.
///
/// Defaults mount the chunk at `state[name]` with action types prefixed by
/// `name`.
#[derive(Clone, Debug, Default)]
pub struct ChunkOptions {
    pub base_selector: Option<Selector>,
    pub location: Option<String>,
}

impl ChunkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the chunk's state with `selector` instead of `state[name]`.
    pub fn base_selector(mut self, selector: Selector) -> Self {
        self.base_selector = Some(selector);
        self
    }

    /// Prefix action types with `location` instead of the chunk name.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Builder for store chunks with a fluent API.
pub struct StoreChunkBuilder {
    name: String,
    structure: Option<Structure>,
    options: ChunkOptions,
}

impl StoreChunkBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structure: None,
            options: ChunkOptions::default(),
        }
    }

    /// Set the structure to compile (required).
    pub fn structure(mut self, structure: Structure) -> Self {
        self.structure = Some(structure);
        self
    }

    pub fn options(mut self, options: ChunkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn base_selector(mut self, selector: Selector) -> Self {
        self.options = self.options.base_selector(selector);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.options = self.options.location(location);
        self
    }

    /// Build the chunk.
    /// Returns an error if the structure is missing or malformed.
    pub fn build(self) -> Result<StoreChunk, BuildError> {
        let structure = self.structure.ok_or(BuildError::MissingStructure)?;
        build_store_chunk(&self.name, &structure, self.options)
    }
}

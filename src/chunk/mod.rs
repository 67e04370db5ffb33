//! Store-chunk builder: the entry point of the crate.
//!
//! A chunk bundles the reducers, action creators and selectors compiled from
//! one named structure. Mounting the chunk's reducer into a store and
//! dispatching against it is left to the host application.

mod builder;
pub mod error;

pub use builder::{ChunkOptions, StoreChunkBuilder};
pub use error::BuildError;

use crate::reducer::{
    build_reducers, compile_leaf, contains_boundary, escape_segment, ActionCreator, CompileOptions,
    LeafActions, Operation, Reducer, Selector, Tree,
};
use crate::structure::Structure;
use crate::validation::audit;
use serde_json::Value;
use stillwater::validation::Validation;
use tracing::debug;

/// Reducers, actions and selectors compiled from one named structure.
///
/// The three trees always have identical keys at every depth. A flat chunk
/// (no nested reducer boundary) has a single leaf in each tree and no
/// `reset_all`.
#[derive(Clone, Debug)]
pub struct StoreChunk {
    name: String,
    location: String,
    reducer: Reducer,
    pub reducers: Tree<Reducer>,
    pub actions: Tree<LeafActions>,
    pub selectors: Tree<Selector>,
    /// Resets every leaf of the chunk; only present on nested chunks.
    pub reset_all: Option<ActionCreator>,
}

impl StoreChunk {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_nested(&self) -> bool {
        self.reset_all.is_some()
    }

    /// The single reducer the host mounts for this chunk's slice of state.
    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    pub fn initial_state(&self) -> Value {
        self.reducer.initial_state()
    }
}

/// Compile `structure` into a store chunk named `name`.
///
/// # Example
///
/// ```rust
/// use storechunk::chunk::{build_store_chunk, ChunkOptions};
/// use storechunk::structure::{number, reducer, shape, string};
/// use serde_json::json;
///
/// let structure = shape(vec![
///     ("title", string()),
///     ("counter", reducer(shape(vec![("value", number())]))),
/// ]);
/// let chunk = build_store_chunk("app", &structure, ChunkOptions::default()).unwrap();
///
/// let rename = chunk.actions.leaf(&["title"]).unwrap().replace(json!("Inbox"));
/// let slice = chunk.reducer().reduce(None, &rename);
/// assert_eq!(slice, json!({"title": "Inbox", "counter": {"value": 0}}));
///
/// let state = json!({ "app": slice });
/// assert_eq!(chunk.selectors.select(&["title"], &state), Some(&json!("Inbox")));
/// ```
pub fn build_store_chunk(
    name: &str,
    structure: &Structure,
    options: ChunkOptions,
) -> Result<StoreChunk, BuildError> {
    if let Validation::Failure(issues) = audit(structure) {
        return Err(BuildError::InvalidStructure {
            issues: issues.iter().cloned().collect(),
        });
    }

    let location = options
        .location
        .unwrap_or_else(|| escape_segment(name));
    let base_selector = options
        .base_selector
        .unwrap_or_else(|| Selector::key(name));
    let root = unwrap_boundaries(structure);

    let (tree, reset_all) = if contains_boundary(&root) {
        let compile_options = CompileOptions {
            base_selector,
            location: location.clone(),
        };
        let tree = build_reducers(name, &root, &compile_options)?;
        let reset_all = ActionCreator::new(Operation::ResetAll, &location);
        (tree, Some(reset_all))
    } else {
        let leaf = compile_leaf(&root, &location, base_selector)?;
        (Tree::Leaf(leaf), None)
    };

    let reducers = tree.map(|leaf| leaf.reducer.clone());
    let actions = tree.map(|leaf| leaf.actions.clone());
    let selectors = tree.map(|leaf| leaf.selector.clone());
    let reducer = reducers.combined();

    debug!(
        chunk = name,
        location = %location,
        nested = reset_all.is_some(),
        leaves = tree.leaves().len(),
        "Built store chunk"
    );

    Ok(StoreChunk {
        name: name.to_string(),
        location,
        reducer,
        reducers,
        actions,
        selectors,
        reset_all,
    })
}

/// Strip reducer boundaries wrapping the chunk root; the chunk itself is one.
fn unwrap_boundaries(structure: &Structure) -> Structure {
    Structure::from(structure.resolve_inner())
}

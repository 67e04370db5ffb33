//! Reducer compiler.
//!
//! Walks a structure tree and emits, for every position, a pure reducer,
//! its action creators and its selector. Positions containing a reducer
//! boundary become branches; everything else is a leaf that owns its value.
//!
//! All state handled here is `serde_json::Value`, and every reducer returns
//! a new value instead of mutating the previous one.

pub mod action;
mod compiler;
mod leaf;
mod selector;
pub mod tree;

pub use action::{
    child_location, create_combined_action, escape_segment, Action, ActionCreator, LeafActions,
    LeafKind, Operation, BATCH_ACTION_TYPE, INIT_ACTION_TYPE,
};
pub use compiler::{build_reducers, contains_boundary, CompileOptions, CompiledLeaf};
pub(crate) use compiler::compile_leaf;
pub use leaf::{combine_reducers, create_reducer, Reducer};
pub use selector::Selector;
pub use tree::{Branch, Tree};

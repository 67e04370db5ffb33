//! Storechunk: declare a state structure once, derive its reducers.
//!
//! A nested application-state shape is declared once as a structure. From
//! it the crate mechanically derives matching reducers, action creators and
//! selectors, plus a validation engine that sanitizes untrusted input
//! against the same shape.
//!
//! Everything is pure: reducers are `(state, action) -> state` functions over
//! `serde_json::Value` and never mutate their input. Holding the state and
//! dispatching actions is the host store's job.
//!
//! # Core Concepts
//!
//! - **Structures**: declarative description of a state slice ([`structure`])
//! - **Validation**: runtime sanitizing that never fails on bad data ([`validation`])
//! - **Reducer compiler**: leaf and branch reducers, actions, selectors ([`reducer`])
//! - **Store chunks**: the compiled bundle for one named structure ([`chunk`])
//!
//! # Example
//!
//! ```rust
//! use storechunk::chunk::{build_store_chunk, ChunkOptions};
//! use storechunk::reducer::create_combined_action;
//! use storechunk::structure::{array_of, number, reducer, shape, string};
//! use serde_json::json;
//!
//! let structure = shape(vec![
//!     ("title", string().with_default(json!("foo"))),
//!     ("list", reducer(shape(vec![("items", array_of(number()))]))),
//! ]);
//! let chunk = build_store_chunk("app", &structure, ChunkOptions::default()).unwrap();
//!
//! let title = chunk.actions.leaf(&["title"]).unwrap();
//! let items = chunk.actions.leaf(&["list", "items"]).unwrap();
//! let batch = create_combined_action(
//!     "fill",
//!     vec![title.replace(json!("bar")), items.replace(json!([1, 2, 3]))],
//! );
//!
//! let slice = chunk.reducer().reduce(None, &batch);
//! assert_eq!(slice, json!({"title": "bar", "list": {"items": [1, 2, 3]}}));
//!
//! let reset = chunk.reset_all.as_ref().unwrap().create(json!(null));
//! let slice = chunk.reducer().reduce(Some(&slice), &reset);
//! assert_eq!(slice, json!({"title": "foo", "list": {"items": []}}));
//! ```

pub mod chunk;
pub mod reducer;
pub mod structure;
pub mod validation;

// Re-export commonly used types
pub use chunk::{build_store_chunk, BuildError, ChunkOptions, StoreChunk, StoreChunkBuilder};
pub use reducer::{create_combined_action, Action, Reducer, Selector, Tree};
pub use structure::{Structure, StructureNode};
pub use validation::{validate_array, validate_shape, validate_value, ValidationError};

//! Structure definition language.
//!
//! Structures describe the shape of one slice of application state. They are
//! declared once, before any store exists, and are then handed to the
//! reducer compiler and the validation engine.
//!
//! - Primitives: [`string`], [`number`], [`boolean`], [`any`]
//! - Containers: [`shape`] (named children plus an optional wildcard) and [`array_of`]
//! - [`custom`] nodes validated by a caller-supplied predicate
//! - [`reducer`] marks a subtree as an independently resettable unit

mod key;
pub mod macros;
mod node;
mod walk;

pub use key::ShapeKey;
pub use node::{PrimitiveKind, Structure, StructureNode, TypeTag, MAX_DEFERRED_HOPS};
pub(crate) use walk::{DeferredPath, Step};

use crate::validation::Validator;
use serde_json::Value;

/// A scalar leaf of the given kind.
pub fn primitive(kind: PrimitiveKind) -> Structure {
    Structure::new(StructureNode::Primitive {
        kind,
        default: None,
    })
}

pub fn string() -> Structure {
    primitive(PrimitiveKind::String)
}

pub fn number() -> Structure {
    primitive(PrimitiveKind::Number)
}

pub fn boolean() -> Structure {
    primitive(PrimitiveKind::Boolean)
}

/// Accepts every value, including `null`.
pub fn any() -> Structure {
    primitive(PrimitiveKind::Any)
}

/// A mapping of named children, optionally with one wildcard entry.
///
/// # Example
///
/// ```rust
/// use storechunk::structure::{number, shape, string, wildcard_key, ShapeKey};
///
/// let user = shape(vec![
///     (ShapeKey::from("name"), string()),
///     (wildcard_key(), number()),
/// ]);
/// # let _ = user;
/// ```
pub fn shape<K, I>(entries: I) -> Structure
where
    K: Into<ShapeKey>,
    I: IntoIterator<Item = (K, Structure)>,
{
    Structure::new(node::shape_node(entries))
}

/// A sequence whose elements all conform to `element`.
pub fn array_of(element: Structure) -> Structure {
    Structure::new(StructureNode::ArrayOf {
        element,
        default: None,
    })
}

/// A leaf validated by an arbitrary predicate.
///
/// `validation_error_message` is reported when a runtime value is dropped.
pub fn custom<F>(validator: F, validation_error_message: impl Into<String>) -> Structure
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Structure::new(StructureNode::Custom {
        validator: Validator::custom(validator),
        error_message: validation_error_message.into(),
        default: None,
    })
}

/// Compile `inner` as its own reducer boundary. Boundaries may nest.
pub fn reducer(inner: Structure) -> Structure {
    Structure::new(StructureNode::Reducer { wrapped: inner })
}

/// The sentinel key matching any property not listed in a shape.
pub fn wildcard_key() -> ShapeKey {
    ShapeKey::Wildcard
}

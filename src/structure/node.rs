//! Structure nodes and the deferred descriptors that produce them.
//!
//! A [`Structure`] is a descriptor: either a ready node or a thunk that
//! yields one on demand. Thunks let a shape refer to itself or to a
//! sibling that is declared later.

use super::key::ShapeKey;
use crate::validation::Validator;
use serde_json::{Map, Value};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Upper bound on thunk hops (and boundary wrappers) followed by one resolve.
pub const MAX_DEFERRED_HOPS: usize = 64;

/// Scalar kinds understood by the built-in validators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Any,
}

impl PrimitiveKind {
    /// Check whether a runtime value belongs to this kind.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Any => true,
        }
    }

    pub fn type_tag(self) -> TypeTag {
        match self {
            Self::String => TypeTag::String,
            Self::Number => TypeTag::Number,
            Self::Boolean => TypeTag::Boolean,
            Self::Any => TypeTag::Any,
        }
    }
}

/// Type tag carried by every structure node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Any,
    Custom,
    Shape,
    ArrayOf,
    Reducer,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::Custom => "custom",
            Self::Shape => "shape",
            Self::ArrayOf => "arrayOf",
            Self::Reducer => "reducer",
        }
    }

    /// Zero value used when a node declares no explicit default.
    ///
    /// This is the single place where implicit defaults come from.
    pub fn zero_value(self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Number => Value::from(0),
            Self::Boolean => Value::Bool(false),
            Self::Any | Self::Custom | Self::Reducer => Value::Null,
            Self::Shape => Value::Object(Map::new()),
            Self::ArrayOf => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved node of a structure tree.
#[derive(Clone, Debug)]
pub enum StructureNode {
    Primitive {
        kind: PrimitiveKind,
        default: Option<Value>,
    },
    Custom {
        validator: Validator,
        error_message: String,
        default: Option<Value>,
    },
    Shape {
        children: Vec<(String, Structure)>,
        wildcard: Option<Structure>,
        default: Option<Value>,
    },
    ArrayOf {
        element: Structure,
        default: Option<Value>,
    },
    /// Marks a subtree as an independently dispatchable and resettable unit.
    Reducer { wrapped: Structure },
}

impl StructureNode {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Primitive { kind, .. } => kind.type_tag(),
            Self::Custom { .. } => TypeTag::Custom,
            Self::Shape { .. } => TypeTag::Shape,
            Self::ArrayOf { .. } => TypeTag::ArrayOf,
            Self::Reducer { .. } => TypeTag::Reducer,
        }
    }

    /// The default declared for this node, if any.
    pub fn explicit_default(&self) -> Option<&Value> {
        match self {
            Self::Primitive { default, .. }
            | Self::Custom { default, .. }
            | Self::Shape { default, .. }
            | Self::ArrayOf { default, .. } => default.as_ref(),
            Self::Reducer { .. } => None,
        }
    }

    /// The value a leaf built from this node starts from and resets to.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Reducer { wrapped } => wrapped.resolve_inner().default_value(),
            _ => self
                .explicit_default()
                .cloned()
                .unwrap_or_else(|| self.type_tag().zero_value()),
        }
    }

    fn with_default(&self, value: Value) -> Self {
        let mut node = self.clone();
        match &mut node {
            Self::Primitive { default, .. }
            | Self::Custom { default, .. }
            | Self::Shape { default, .. }
            | Self::ArrayOf { default, .. } => *default = Some(value),
            Self::Reducer { wrapped } => *wrapped = wrapped.clone().with_default(value),
        }
        node
    }
}

type Thunk = Arc<dyn Fn() -> Structure + Send + Sync>;

#[derive(Clone)]
enum Descriptor {
    Ready(Arc<StructureNode>),
    Deferred {
        thunk: Thunk,
        /// Set for capture-free thunks, which behave identically per type.
        stateless: Option<TypeId>,
    },
}

/// Identity of a deferred descriptor's thunk.
///
/// A capture-free thunk (such as a named `fn`) is identified by its type, so
/// the fresh descriptors produced on every call of a recursive `fn` compare
/// equal. Capturing thunks are identified by their allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ThunkId {
    Stateless(TypeId),
    Instance(usize),
}

/// Descriptor for one structure node.
///
/// Cloning is cheap: nodes are shared behind `Arc`.
///
/// # Example
///
/// ```rust
/// use storechunk::structure::{array_of, number, shape, Structure, TypeTag};
///
/// fn tree() -> Structure {
///     shape(vec![
///         ("value", number()),
///         ("children", array_of(Structure::lazy(tree))),
///     ])
/// }
///
/// assert_eq!(tree().type_tag(), TypeTag::Shape);
/// ```
#[derive(Clone)]
pub struct Structure(Descriptor);

impl Structure {
    pub fn new(node: StructureNode) -> Self {
        Self(Descriptor::Ready(Arc::new(node)))
    }

    /// Defer construction of a node until it is first needed.
    pub fn lazy<F>(thunk: F) -> Self
    where
        F: Fn() -> Structure + Send + Sync + 'static,
    {
        let stateless = (std::mem::size_of::<F>() == 0).then(TypeId::of::<F>);
        Self(Descriptor::Deferred {
            thunk: Arc::new(thunk),
            stateless,
        })
    }

    /// Evaluate the descriptor, following a chain of deferred thunks.
    ///
    /// Returns `None` when the chain is still deferred after
    /// [`MAX_DEFERRED_HOPS`] evaluations, as with a thunk returning itself.
    pub fn try_resolve(&self) -> Option<Arc<StructureNode>> {
        let mut current = self.clone();
        for _ in 0..=MAX_DEFERRED_HOPS {
            match current.0 {
                Descriptor::Ready(node) => return Some(node),
                Descriptor::Deferred { thunk, .. } => current = thunk(),
            }
        }
        None
    }

    /// Evaluate the descriptor, following any chain of deferred thunks.
    ///
    /// A chain that never produces a node resolves to a custom node that
    /// rejects every value, so runtime data is still sanitized. The structure
    /// audit reports such chains before a chunk is built.
    pub fn resolve(&self) -> Arc<StructureNode> {
        self.try_resolve().unwrap_or_else(|| {
            warn!(
                hops = MAX_DEFERRED_HOPS,
                "Deferred structure never produced a node, rejecting all values"
            );
            unresolved()
        })
    }

    /// Resolve and look through any reducer-boundary wrappers.
    pub fn resolve_inner(&self) -> Arc<StructureNode> {
        let mut node = self.resolve();
        for _ in 0..=MAX_DEFERRED_HOPS {
            match node.as_ref() {
                StructureNode::Reducer { wrapped } => node = wrapped.resolve(),
                _ => return node,
            }
        }
        warn!(
            hops = MAX_DEFERRED_HOPS,
            "Reducer boundaries nest without end, rejecting all values"
        );
        unresolved()
    }

    /// The node, if it is available without evaluating a thunk.
    pub fn peek(&self) -> Option<&StructureNode> {
        match &self.0 {
            Descriptor::Ready(node) => Some(node.as_ref()),
            Descriptor::Deferred { .. } => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.0, Descriptor::Deferred { .. })
    }

    pub(crate) fn thunk_id(&self) -> Option<ThunkId> {
        match &self.0 {
            Descriptor::Ready(_) => None,
            Descriptor::Deferred {
                stateless: Some(type_id),
                ..
            } => Some(ThunkId::Stateless(*type_id)),
            Descriptor::Deferred { thunk, .. } => {
                Some(ThunkId::Instance(Arc::as_ptr(thunk) as *const () as usize))
            }
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.resolve().type_tag()
    }

    pub fn default_value(&self) -> Value {
        self.resolve_inner().default_value()
    }

    /// Replace the node's default. Deferred descriptors stay deferred.
    pub fn with_default(self, value: Value) -> Self {
        match self.0 {
            Descriptor::Ready(node) => Self::new(node.with_default(value)),
            Descriptor::Deferred { thunk, .. } => Self::lazy(move || {
                Structure::new(thunk().resolve().with_default(value.clone()))
            }),
        }
    }
}

impl fmt::Debug for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Descriptor::Ready(node) => node.fmt(f),
            Descriptor::Deferred { .. } => f.write_str("Structure(<deferred>)"),
        }
    }
}

impl From<Arc<StructureNode>> for Structure {
    fn from(node: Arc<StructureNode>) -> Self {
        Self(Descriptor::Ready(node))
    }
}

impl From<StructureNode> for Structure {
    fn from(node: StructureNode) -> Self {
        Self::new(node)
    }
}

fn unresolved() -> Arc<StructureNode> {
    Arc::new(StructureNode::Custom {
        validator: Validator::custom(|_| false),
        error_message: "Deferred structure never produced a node".to_string(),
        default: None,
    })
}

/// Normalize shape entries: the last entry for a name wins, as does the
/// last wildcard.
pub(crate) fn shape_node<K, I>(entries: I) -> StructureNode
where
    K: Into<ShapeKey>,
    I: IntoIterator<Item = (K, Structure)>,
{
    let mut children: Vec<(String, Structure)> = Vec::new();
    let mut wildcard = None;
    for (key, structure) in entries {
        match key.into() {
            ShapeKey::Wildcard => wildcard = Some(structure),
            ShapeKey::Named(name) => {
                match children.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(slot) => slot.1 = structure,
                    None => children.push((name, structure)),
                }
            }
        }
    }
    StructureNode::Shape {
        children,
        wildcard,
        default: None,
    }
}

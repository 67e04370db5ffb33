//! Scalar validators and their lookup by type tag.

use super::error::ValidationError;
use crate::structure::{PrimitiveKind, StructureNode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Pure predicate deciding whether a scalar value is kept.
#[derive(Clone)]
pub enum Validator {
    Kind(PrimitiveKind),
    Custom(Predicate),
}

impl Validator {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    pub fn check(&self, value: &Value) -> bool {
        match self {
            Self::Kind(kind) => kind.accepts(value),
            Self::Custom(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Validator registered for a node's type tag, without the error path.
pub(crate) fn registered(node: &StructureNode) -> Option<Validator> {
    match node {
        StructureNode::Primitive { kind, .. } => Some(Validator::Kind(*kind)),
        StructureNode::Custom { validator, .. } => Some(validator.clone()),
        StructureNode::Reducer { wrapped } => registered(&wrapped.resolve_inner()),
        StructureNode::Shape { .. } | StructureNode::ArrayOf { .. } => None,
    }
}

/// Look up the validator registered for `node`'s type tag.
///
/// Containers have no scalar validator; asking for one is a configuration
/// mistake and fails with [`ValidationError::UnknownType`].
pub fn get_type_validation(node: &StructureNode) -> Result<Validator, ValidationError> {
    registered(node).ok_or(ValidationError::UnknownType {
        tag: node.type_tag(),
    })
}

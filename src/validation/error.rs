//! Validation configuration errors.

use crate::structure::TypeTag;
use thiserror::Error;

/// Raised when a structure is malformed. Runtime data never produces these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No validation registered for structure type '{tag}'")]
    UnknownType { tag: TypeTag },
}

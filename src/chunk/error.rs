//! Build errors for store chunks.

use crate::validation::{StructureIssue, ValidationError};
use thiserror::Error;

/// Errors that can occur when building a store chunk.
///
/// All of them point at a programming mistake in the declared structure.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Store structure not specified. Call .structure(structure) before .build()")]
    MissingStructure,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Structure failed its audit with {} issue(s)", .issues.len())]
    InvalidStructure { issues: Vec<StructureIssue> },
}

//! Validation engine.
//!
//! Two strictly separated failure modes:
//! - Runtime data that does not fit a structure is sanitized: scalars are
//!   dropped, mismatched containers are coerced to empty ones, and non-array
//!   input to an array becomes `[]`. None of this ever returns an error.
//! - A malformed structure is a programming mistake and fails loudly with
//!   [`ValidationError`] (or a [`StructureIssue`] from [`audit`]).

mod audit;
mod engine;
pub mod error;
mod validator;

pub use audit::{audit, StructureIssue};
pub use engine::{get_value_type, has_wildcard_key, validate_array, validate_shape, validate_value};
pub use error::ValidationError;
pub use validator::{get_type_validation, Validator};

pub(crate) use engine::conform;

//! Structure audit run before compilation.
//!
//! Uses `Validation` so that every problem in a structure is reported in one
//! pass instead of one per build attempt.

use super::engine::conform;
use crate::reducer::contains_boundary;
use crate::structure::{DeferredPath, Step, Structure, StructureNode};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A configuration problem found while auditing a structure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructureIssue {
    #[error("Default declared at '{path}' does not satisfy its own structure")]
    DefaultMismatch { path: String },

    #[error("Reducer boundary at '{path}' sits inside an array element and would be ignored")]
    BoundaryInArray { path: String },

    #[error("Structure at '{path}' refers back to itself through a reducer boundary")]
    RecursiveBoundary { path: String },

    #[error("Deferred structure at '{path}' never produces a node")]
    UnresolvedDeferred { path: String },
}

type AuditCheck = Validation<(), NonEmptyVec<StructureIssue>>;

/// Audit a structure, accumulating ALL issues.
///
/// Deferred descriptors are expanded, each thunk at most once per path, so
/// self-referential structures terminate. Recursion is only an issue when a
/// reducer boundary lies on the cycle outside any array, since compiling it
/// would never end.
pub fn audit(structure: &Structure) -> AuditCheck {
    let mut checks: Vec<AuditCheck> = Vec::new();
    collect(structure, "$", false, &mut DeferredPath::default(), &mut checks);

    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

fn collect(
    structure: &Structure,
    path: &str,
    in_array: bool,
    expanding: &mut DeferredPath,
    checks: &mut Vec<AuditCheck>,
) {
    expanding.walk(structure, |expanding, step| {
        let node = match step {
            Step::Node(node) => node,
            Step::Cycle => {
                if !in_array && contains_boundary(structure) {
                    checks.push(Validation::fail(StructureIssue::RecursiveBoundary {
                        path: path.to_string(),
                    }));
                }
                return;
            }
            Step::Unresolved => {
                checks.push(Validation::fail(StructureIssue::UnresolvedDeferred {
                    path: path.to_string(),
                }));
                return;
            }
        };

        if let Some(default) = node.explicit_default() {
            if conform(structure, default).as_ref() != Some(default) {
                checks.push(Validation::fail(StructureIssue::DefaultMismatch {
                    path: path.to_string(),
                }));
            }
        }

        match node.as_ref() {
            StructureNode::Primitive { .. } | StructureNode::Custom { .. } => {}
            StructureNode::Shape {
                children, wildcard, ..
            } => {
                for (name, child) in children {
                    collect(child, &format!("{path}.{name}"), in_array, expanding, checks);
                }
                if let Some(wildcard) = wildcard {
                    collect(wildcard, &format!("{path}.*"), in_array, expanding, checks);
                }
            }
            StructureNode::ArrayOf { element, .. } => {
                collect(element, &format!("{path}[]"), true, expanding, checks);
            }
            StructureNode::Reducer { wrapped } => {
                if in_array {
                    checks.push(Validation::fail(StructureIssue::BoundaryInArray {
                        path: path.to_string(),
                    }));
                }
                collect(wrapped, path, in_array, expanding, checks);
            }
        }
    });
}

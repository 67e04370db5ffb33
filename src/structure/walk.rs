//! Guarded traversal through deferred descriptors.
//!
//! Compile-time walks (boundary detection, the audit) expand deferred
//! descriptors like any other node. A walk stops when it re-enters a thunk
//! that is already being expanded on the current path, which is what keeps
//! self-referential structures finite.

use super::node::{Structure, StructureNode, ThunkId, MAX_DEFERRED_HOPS};
use std::sync::Arc;

/// What a walk finds at one structure position.
pub(crate) enum Step {
    Node(Arc<StructureNode>),
    /// The position re-enters a thunk already open on this path.
    Cycle,
    /// The thunk chain never produced a node.
    Unresolved,
}

/// Thunks currently being expanded, outermost first.
#[derive(Default)]
pub(crate) struct DeferredPath {
    open: Vec<ThunkId>,
}

impl DeferredPath {
    /// Resolve `structure` and hand the result to `visit`.
    ///
    /// While `visit` runs, the thunk behind `structure` (if any) counts as
    /// open, so nested calls see it as a cycle.
    pub(crate) fn walk<R>(
        &mut self,
        structure: &Structure,
        visit: impl FnOnce(&mut Self, Step) -> R,
    ) -> R {
        let id = structure.thunk_id();
        let reentered = id.is_some_and(|id| self.open.contains(&id))
            || (id.is_some() && self.open.len() >= MAX_DEFERRED_HOPS);
        if reentered {
            return visit(self, Step::Cycle);
        }

        let Some(node) = structure.try_resolve() else {
            return visit(self, Step::Unresolved);
        };
        match id {
            Some(id) => {
                self.open.push(id);
                let result = visit(self, Step::Node(node));
                self.open.pop();
                result
            }
            None => visit(self, Step::Node(node)),
        }
    }
}

//! Recursive compilation of a structure into reducers, actions and selectors.

use super::action::{child_location, LeafActions};
use super::leaf::{create_reducer, Reducer};
use super::selector::Selector;
use super::tree::{Branch, Tree};
use crate::structure::{DeferredPath, Step, Structure, StructureNode};
use crate::validation::ValidationError;
use tracing::trace;

/// Everything compiled for one leaf position.
#[derive(Clone, Debug)]
pub struct CompiledLeaf {
    pub reducer: Reducer,
    pub actions: LeafActions,
    pub selector: Selector,
}

/// Where a compiled subtree is mounted in the host state.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Reads this subtree's state out of the host state.
    pub base_selector: Selector,
    /// Dot-joined path used to name action types.
    pub location: String,
}

/// Whether `structure` is, or has among its shape descendants, a reducer
/// boundary.
///
/// Deferred descriptors are expanded, each thunk at most once per path.
/// Array elements are not searched: arrays always compile to leaves.
pub fn contains_boundary(structure: &Structure) -> bool {
    boundary_within(structure, &mut DeferredPath::default())
}

fn boundary_within(structure: &Structure, path: &mut DeferredPath) -> bool {
    path.walk(structure, |path, step| match step {
        Step::Node(node) => match node.as_ref() {
            StructureNode::Reducer { .. } => true,
            StructureNode::Shape { children, .. } => children
                .iter()
                .any(|(_, child)| boundary_within(child, path)),
            _ => false,
        },
        Step::Cycle | Step::Unresolved => false,
    })
}

/// Compile a reducer boundary into a tree of leaves.
///
/// Each named child that contains a reducer boundary is compiled
/// recursively with `location` extended by its (escaped) name and a selector
/// that indexes into it; every other child becomes one leaf reducer owning
/// its whole value. A boundary around a non-shape compiles to a single leaf.
/// Wildcard entries of a compiled shape are not represented.
///
/// The top-level call is treated as a boundary. Structures that recurse
/// through a boundary compile without end; [`crate::validation::audit`]
/// rejects them.
pub fn build_reducers(
    name: &str,
    structure: &Structure,
    options: &CompileOptions,
) -> Result<Tree<CompiledLeaf>, ValidationError> {
    compile_subtree(name, structure, options, true)
}

fn compile_subtree(
    name: &str,
    structure: &Structure,
    options: &CompileOptions,
    boundary: bool,
) -> Result<Tree<CompiledLeaf>, ValidationError> {
    let node = structure.resolve_inner();
    let StructureNode::Shape { children, .. } = node.as_ref() else {
        let leaf = compile_leaf(structure, &options.location, options.base_selector.clone())?;
        return Ok(Tree::Leaf(leaf));
    };

    trace!(branch = name, boundary, location = %options.location, "Compiling branch");

    let mut compiled = Vec::with_capacity(children.len());
    for (child_name, child) in children {
        let location = child_location(&options.location, child_name);
        let selector = options.base_selector.then_key(child_name.as_str());

        let subtree = if contains_boundary(child) {
            let child_options = CompileOptions {
                base_selector: selector,
                location,
            };
            let child_boundary = matches!(child.resolve().as_ref(), StructureNode::Reducer { .. });
            compile_subtree(child_name, child, &child_options, child_boundary)?
        } else {
            Tree::Leaf(compile_leaf(child, &location, selector)?)
        };
        compiled.push((child_name.clone(), subtree));
    }

    let branch = if boundary {
        Branch::boundary(options.location.clone(), compiled)
    } else {
        Branch::new(options.location.clone(), compiled)
    };
    Ok(Tree::Branch(branch))
}

pub(crate) fn compile_leaf(
    structure: &Structure,
    location: &str,
    selector: Selector,
) -> Result<CompiledLeaf, ValidationError> {
    let (reducer, actions) = create_reducer(structure, location)?;
    trace!(location, kind = %structure.resolve_inner().type_tag(), "Compiled leaf reducer");
    Ok(CompiledLeaf {
        reducer,
        actions,
        selector,
    })
}

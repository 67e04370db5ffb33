//! Leaf reducers: the update, reset and removal logic of one container.

use super::action::{Action, LeafActions, LeafKind, Operation};
use super::tree::Tree;
use crate::structure::{Structure, StructureNode};
use crate::validation::{get_type_validation, validate_array, validate_shape, ValidationError, Validator};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type ReduceFn = dyn Fn(Option<&Value>, &Action) -> Value + Send + Sync;

/// Pure state-transition function `(state, action) -> state`.
///
/// `None` stands for "no state yet"; every compiled reducer answers it
/// with its declared default. The previous state is never mutated.
#[derive(Clone)]
pub struct Reducer {
    reduce: Arc<ReduceFn>,
}

impl Reducer {
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Value + Send + Sync + 'static,
    {
        Self {
            reduce: Arc::new(reduce),
        }
    }

    pub fn reduce(&self, state: Option<&Value>, action: &Action) -> Value {
        (self.reduce)(state, action)
    }

    /// State before any action has been dispatched.
    pub fn initial_state(&self) -> Value {
        self.reduce(None, &Action::init())
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer(<fn>)")
    }
}

/// Combine named reducers into one reducer over an object of their states.
pub fn combine_reducers(children: Vec<(String, Reducer)>) -> Reducer {
    Reducer::new(move |state, action| {
        let mut next = Map::new();
        for (name, child) in &children {
            let previous = state.and_then(|state| state.get(name.as_str()));
            next.insert(name.clone(), child.reduce(previous, action));
        }
        Value::Object(next)
    })
}

impl Tree<Reducer> {
    /// One reducer for this whole subtree.
    pub fn combined(&self) -> Reducer {
        match self {
            Self::Leaf(reducer) => reducer.clone(),
            Self::Branch(branch) => combine_reducers(
                branch
                    .children()
                    .iter()
                    .map(|(name, child)| (name.clone(), child.combined()))
                    .collect(),
            ),
        }
    }
}

enum Container {
    Value(Validator),
    Shape,
    Array,
}

struct LeafReducer {
    structure: Structure,
    container: Container,
    default: Value,
    actions: LeafActions,
}

impl LeafReducer {
    fn apply(&self, state: Value, action: &Action) -> Value {
        if action.is_batch() {
            return action
                .actions
                .iter()
                .filter(|entry| entry.is_batch() || self.addresses(entry))
                .fold(state, |state, entry| self.apply(state, entry));
        }

        match self.actions.operation_for(&action.action_type) {
            Some(Operation::Replace) => self.replace(state, &action.payload),
            Some(Operation::Update) => self.update(state, &action.payload),
            Some(Operation::Reset) => self.default.clone(),
            Some(Operation::RemoveAtIndex) => remove_at(state, action.index),
            Some(Operation::ResetAll) => state,
            None if self.reset_by(action) => self.default.clone(),
            None => state,
        }
    }

    fn addresses(&self, action: &Action) -> bool {
        self.actions.operation_for(&action.action_type).is_some() || self.reset_by(action)
    }

    /// Whether `action` is the reset-all of a boundary enclosing this leaf.
    fn reset_by(&self, action: &Action) -> bool {
        Operation::ResetAll
            .location_of(&action.action_type)
            .is_some_and(|boundary| is_within(self.actions.location(), boundary))
    }

    fn replace(&self, state: Value, payload: &Value) -> Value {
        match &self.container {
            Container::Value(validator) => {
                if validator.check(payload) {
                    payload.clone()
                } else {
                    debug!(
                        location = self.actions.location(),
                        payload = %payload,
                        "Rejected replace payload, keeping previous state"
                    );
                    state
                }
            }
            Container::Shape => validate_shape(&self.structure, payload),
            Container::Array => Value::Array(validate_array(&self.structure, payload)),
        }
    }

    fn update(&self, state: Value, payload: &Value) -> Value {
        let mut merged = match state {
            Value::Object(entries) => entries,
            _ => Map::new(),
        };
        if let Value::Object(patch) = validate_shape(&self.structure, payload) {
            merged.extend(patch);
        }
        Value::Object(merged)
    }
}

fn remove_at(state: Value, index: Option<usize>) -> Value {
    match (state, index) {
        (Value::Array(mut items), Some(index)) if index < items.len() => {
            items.remove(index);
            Value::Array(items)
        }
        (state, _) => state,
    }
}

fn is_within(location: &str, boundary: &str) -> bool {
    location
        .strip_prefix(boundary)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Compile the leaf reducer for a structure mounted at `location`.
///
/// The leaf owns its value wholesale: objects are replaced or shallow-merged,
/// arrays are replaced or shortened, scalars are replaced. Batches are
/// filtered down to the entries addressed to this leaf and applied in order.
///
/// # Example
///
/// ```rust
/// use storechunk::reducer::create_reducer;
/// use storechunk::structure::string;
/// use serde_json::json;
///
/// let (reducer, actions) = create_reducer(&string().with_default(json!("foo")), "app.title").unwrap();
/// let state = reducer.reduce(None, &actions.replace(json!("bar")));
/// assert_eq!(state, json!("bar"));
/// assert_eq!(reducer.reduce(Some(&state), &actions.reset()), json!("foo"));
/// ```
pub fn create_reducer(
    structure: &Structure,
    location: &str,
) -> Result<(Reducer, LeafActions), ValidationError> {
    let node = structure.resolve_inner();
    let (container, kind) = match node.as_ref() {
        StructureNode::Shape { .. } => (Container::Shape, LeafKind::Shape),
        StructureNode::ArrayOf { .. } => (Container::Array, LeafKind::Array),
        scalar => (Container::Value(get_type_validation(scalar)?), LeafKind::Value),
    };

    let actions = LeafActions::new(location, kind);
    let leaf = LeafReducer {
        structure: structure.clone(),
        container,
        default: node.default_value(),
        actions: actions.clone(),
    };

    let reducer = Reducer::new(move |state, action| {
        let current = state.cloned().unwrap_or_else(|| leaf.default.clone());
        leaf.apply(current, action)
    });
    Ok((reducer, actions))
}

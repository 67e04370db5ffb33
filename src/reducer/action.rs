//! Actions, action types and action creators.

use super::tree::Tree;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Action type carried by combined actions.
pub const BATCH_ACTION_TYPE: &str = "@@storechunk/BATCH";

/// Action type no compiled reducer responds to; used to obtain initial state.
pub const INIT_ACTION_TYPE: &str = "@@storechunk/INIT";

/// A dispatched action, in its wire shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,

    #[serde(default)]
    pub payload: Value,

    /// Target index of a `removeAtIndex` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// Descriptive label of a combined action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Entries of a combined action, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl Action {
    pub fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
            index: None,
            name: None,
            actions: Vec::new(),
        }
    }

    pub fn init() -> Self {
        Self::new(INIT_ACTION_TYPE, Value::Null)
    }

    pub fn is_batch(&self) -> bool {
        self.action_type == BATCH_ACTION_TYPE
    }
}

/// Package already-built actions into one combined action.
///
/// Dispatching the result produces the same state as dispatching each entry
/// on its own, in order. `name` is only a label.
///
/// # Example
///
/// ```rust
/// use storechunk::reducer::{create_combined_action, Action};
/// use serde_json::json;
///
/// let batch = create_combined_action(
///     "rename",
///     vec![
///         Action::new("user.first/REPLACE", json!("Ada")),
///         Action::new("user.last/REPLACE", json!("Lovelace")),
///     ],
/// );
/// assert!(batch.is_batch());
/// assert_eq!(batch.actions.len(), 2);
/// ```
pub fn create_combined_action(name: impl Into<String>, actions: Vec<Action>) -> Action {
    Action {
        action_type: BATCH_ACTION_TYPE.to_string(),
        payload: Value::Null,
        index: None,
        name: Some(name.into()),
        actions,
    }
}

/// Operations a compiled reducer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Replace,
    Update,
    Reset,
    RemoveAtIndex,
    ResetAll,
}

impl Operation {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Replace => "REPLACE",
            Self::Update => "UPDATE",
            Self::Reset => "RESET",
            Self::RemoveAtIndex => "REMOVE_AT_INDEX",
            Self::ResetAll => "RESET_ALL",
        }
    }

    /// Action type for this operation at a location path.
    pub fn action_type(self, location: &str) -> String {
        format!("{location}/{}", self.suffix())
    }

    /// Location encoded in `action_type`, if it belongs to this operation.
    pub fn location_of(self, action_type: &str) -> Option<&str> {
        action_type
            .strip_suffix(self.suffix())
            .and_then(|rest| rest.strip_suffix('/'))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Location of the child `name` mounted under `parent`.
///
/// `name` is escaped with [`escape_segment`], so a property called `"a.b"`
/// and the path `a` then `b` get different locations.
pub fn child_location(parent: &str, name: &str) -> String {
    format!("{parent}.{}", escape_segment(name))
}

/// Escape `\`, `.` and `/` in one location segment with a leading `\`.
pub fn escape_segment(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if matches!(ch, '\\' | '.' | '/') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Builds actions of one fixed type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCreator {
    operation: Operation,
    action_type: String,
}

impl ActionCreator {
    pub fn new(operation: Operation, location: &str) -> Self {
        Self {
            operation,
            action_type: operation.action_type(location),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn create(&self, payload: Value) -> Action {
        Action::new(self.action_type.clone(), payload)
    }

    pub fn create_at(&self, index: usize) -> Action {
        Action {
            index: Some(index),
            ..self.create(Value::Null)
        }
    }
}

/// Container kind of a compiled leaf; decides which operations it supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    Value,
    Shape,
    Array,
}

/// Action creators of one leaf.
///
/// Every leaf supports `replace` and `reset`; shape leaves add `update`,
/// array leaves add `remove_at_index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafActions {
    location: String,
    replace: ActionCreator,
    update: Option<ActionCreator>,
    reset: ActionCreator,
    remove_at_index: Option<ActionCreator>,
}

impl LeafActions {
    pub fn new(location: &str, kind: LeafKind) -> Self {
        Self {
            location: location.to_string(),
            replace: ActionCreator::new(Operation::Replace, location),
            update: (kind == LeafKind::Shape).then(|| ActionCreator::new(Operation::Update, location)),
            reset: ActionCreator::new(Operation::Reset, location),
            remove_at_index: (kind == LeafKind::Array)
                .then(|| ActionCreator::new(Operation::RemoveAtIndex, location)),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn replace(&self, payload: Value) -> Action {
        self.replace.create(payload)
    }

    /// `None` unless this leaf holds a shape.
    pub fn update(&self, payload: Value) -> Option<Action> {
        self.update.as_ref().map(|creator| creator.create(payload))
    }

    pub fn reset(&self) -> Action {
        self.reset.create(Value::Null)
    }

    /// `None` unless this leaf holds an array.
    pub fn remove_at_index(&self, index: usize) -> Option<Action> {
        self.remove_at_index
            .as_ref()
            .map(|creator| creator.create_at(index))
    }

    /// All creators of this leaf, in a fixed order.
    pub fn creators(&self) -> impl Iterator<Item = &ActionCreator> {
        [
            Some(&self.replace),
            self.update.as_ref(),
            Some(&self.reset),
            self.remove_at_index.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.creators().any(|creator| creator.operation() == operation)
    }

    /// The operation `action_type` asks of this leaf, if it is addressed to it.
    pub fn operation_for(&self, action_type: &str) -> Option<Operation> {
        self.creators()
            .find(|creator| creator.action_type() == action_type)
            .map(ActionCreator::operation)
    }
}

impl Tree<LeafActions> {
    /// The reset-all creator of a reducer-boundary branch.
    ///
    /// Leaves and plain intermediate shapes have none.
    pub fn reset_all(&self) -> Option<ActionCreator> {
        self.as_branch()
            .filter(|branch| branch.is_boundary())
            .map(|branch| ActionCreator::new(Operation::ResetAll, branch.location()))
    }
}

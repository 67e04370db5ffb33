//! State-read functions.

use super::tree::Tree;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type SelectFn = dyn for<'a> Fn(&'a Value) -> Option<&'a Value> + Send + Sync;

/// Pure function reading one position out of the host's state tree.
#[derive(Clone)]
pub struct Selector {
    select: Arc<SelectFn>,
}

impl Selector {
    pub fn new<F>(select: F) -> Self
    where
        F: for<'a> Fn(&'a Value) -> Option<&'a Value> + Send + Sync + 'static,
    {
        Self {
            select: Arc::new(select),
        }
    }

    /// Selects the whole state.
    pub fn identity() -> Self {
        Self::new(|state| Some(state))
    }

    /// Selects `state[key]`.
    pub fn key(key: impl Into<String>) -> Self {
        Self::identity().then_key(key)
    }

    /// This selector, then index the result by `key`.
    pub fn then_key(&self, key: impl Into<String>) -> Self {
        let base = self.clone();
        let key = key.into();
        Self::new(move |state| base.select(state).and_then(|value| value.get(key.as_str())))
    }

    pub fn select<'a>(&self, state: &'a Value) -> Option<&'a Value> {
        (self.select)(state)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(<fn>)")
    }
}

impl Tree<Selector> {
    /// Read the leaf at `path` out of `state`.
    pub fn select<'a>(&self, path: &[&str], state: &'a Value) -> Option<&'a Value> {
        self.leaf(path)?.select(state)
    }
}

//! Keys of a shape's children.

use std::fmt;

/// Key of a shape entry: a property name or the wildcard sentinel.
///
/// The wildcard is its own variant, so no property name can ever be
/// mistaken for it. Build it with [`wildcard_key`](super::wildcard_key).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    Named(String),
    Wildcard,
}

impl ShapeKey {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl From<&str> for ShapeKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ShapeKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Wildcard => f.write_str("<wildcard>"),
        }
    }
}

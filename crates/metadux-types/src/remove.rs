//! Remove-request variants.
//!
//! A host may ask the reducer to remove metadata in three ways: one path, a
//! list of paths, or a tree whose leaf key-paths name what to remove. The
//! JSON payload is classified once, at the boundary, into a
//! [`RemoveRequest`]; the reducer then dispatches on the variant.

use serde_json::Value;

use crate::Meta;

/// What a remove-meta action asks to delete.
///
/// Borrows from the dispatched action so classification never copies the
/// payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveRequest<'a> {
    /// A single dot-separated path, e.g. `"some.nested.key"`.
    Path(&'a str),
    /// An ordered list of paths. Non-string entries of the source array are
    /// dropped during classification.
    Paths(Vec<&'a str>),
    /// A tree whose leaf key-paths are each removed.
    Tree(&'a Meta),
}

impl<'a> RemoveRequest<'a> {
    /// Classify a `payload.remove` value.
    ///
    /// An explicit `null` is an empty request: it names nothing but is still
    /// accepted. Returns `None` for booleans and numbers, which are rejected
    /// and leave the state untouched.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(path) => Some(Self::Path(path.as_str())),
            Value::Array(items) => Some(Self::Paths(
                items.iter().filter_map(Value::as_str).collect(),
            )),
            Value::Object(tree) => Some(Self::Tree(tree)),
            Value::Null => Some(Self::Paths(Vec::new())),
            Value::Bool(_) | Value::Number(_) => None,
        }
    }
}

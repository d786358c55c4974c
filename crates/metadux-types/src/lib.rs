//! Shared type definitions for the metadux state extension.
//!
//! This crate is the single source of truth for the action wire shape that a
//! host state container dispatches into the metadata reducer. The [`Action`]
//! type flows downstream to `TypeScript` via `ts-rs` so hosts written in TS
//! build the same JSON.
//!
//! # Modules
//!
//! - [`actions`] -- Action wire shape, action creators, and typed parsing
//!   into [`MetaAction`].
//! - [`remove`] -- The three forms a remove request can take.

pub mod actions;
pub mod remove;

// Re-export all public types at crate root for convenience.
pub use actions::{
    ADD_META, Action, ActionRejection, MetaAction, REMOVE_META, add_meta, remove_meta,
};
pub use remove::RemoveRequest;

use serde_json::Value;

/// A metadata mapping: string keys to arbitrarily nested JSON values.
///
/// The reducer state, add-meta fragments, and tree-form remove requests all
/// share this shape.
pub type Meta = serde_json::Map<String, Value>;

/// Name the JSON type of a value, for rejection messages and logs.
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

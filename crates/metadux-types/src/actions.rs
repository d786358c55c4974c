//! Action wire shape, action creators, and typed parsing.
//!
//! Hosts dispatch plain [`Action`] values (`{ "type": ..., "payload": ... }`).
//! Only two kinds concern the metadata reducer, [`ADD_META`] and
//! [`REMOVE_META`]; everything else passes through untouched. The creators
//! [`add_meta`] and [`remove_meta`] accept any JSON value and leave shape
//! checks to [`MetaAction::try_from`], which the reducer calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::remove::RemoveRequest;
use crate::{Meta, value_kind};

// ---------------------------------------------------------------------------
// Action kinds
// ---------------------------------------------------------------------------

/// Action type for merging a metadata fragment into the state.
pub const ADD_META: &str = "ADD_META";

/// Action type for removing metadata paths from the state.
pub const REMOVE_META: &str = "REMOVE_META";

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// A dispatched action as the host state container sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Action {
    /// The action type, e.g. [`ADD_META`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form payload. Missing payloads deserialize as `null`.
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Build an action from a type string and payload.
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// Build an add-meta action: `{type: ADD_META, payload: {meta}}`.
///
/// Any JSON value is accepted here. The reducer ignores fragments that are
/// not objects.
pub fn add_meta(meta: impl Into<Value>) -> Action {
    Action::new(ADD_META, single_field_payload("meta", meta.into()))
}

/// Build a remove-meta action: `{type: REMOVE_META, payload: {remove}}`.
///
/// `remove` may be a path string, an array of path strings, or an object
/// whose leaf key-paths are removed.
pub fn remove_meta(remove: impl Into<Value>) -> Action {
    Action::new(REMOVE_META, single_field_payload("remove", remove.into()))
}

fn single_field_payload(field: &str, value: Value) -> Value {
    let mut payload = Meta::new();
    payload.insert(field.to_owned(), value);
    Value::Object(payload)
}

// ---------------------------------------------------------------------------
// Typed parsing
// ---------------------------------------------------------------------------

/// Why an action does not produce a metadata transition.
///
/// Rejections are never surfaced to the dispatcher: the reducer logs them
/// and returns the state it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejection {
    /// The action type is not one the metadata reducer handles.
    #[error("action type is not handled by the metadata reducer")]
    UnknownKind,

    /// The payload lacks the field the action type requires.
    #[error("payload is missing the `{0}` field")]
    MissingField(&'static str),

    /// The payload field has an unusable JSON type.
    #[error("payload field `{field}` must be {expected}, got {found}")]
    WrongType {
        /// The offending payload field.
        field: &'static str,
        /// Description of the accepted shapes.
        expected: &'static str,
        /// The JSON type that was found.
        found: &'static str,
    },
}

/// A validated metadata action, borrowing from the dispatched [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetaAction<'a> {
    /// Deep-merge this fragment into the state.
    Add(&'a Meta),
    /// Remove the described paths from the state.
    Remove(RemoveRequest<'a>),
}

impl<'a> TryFrom<&'a Action> for MetaAction<'a> {
    type Error = ActionRejection;

    fn try_from(action: &'a Action) -> Result<Self, Self::Error> {
        match action.kind.as_str() {
            ADD_META => {
                let meta = payload_field(action, "meta")?;
                meta.as_object()
                    .map(Self::Add)
                    .ok_or_else(|| ActionRejection::WrongType {
                        field: "meta",
                        expected: "an object",
                        found: value_kind(meta),
                    })
            }
            REMOVE_META => {
                let remove = payload_field(action, "remove")?;
                RemoveRequest::from_value(remove)
                    .map(Self::Remove)
                    .ok_or_else(|| ActionRejection::WrongType {
                        field: "remove",
                        expected: "a string, array, or object",
                        found: value_kind(remove),
                    })
            }
            _ => Err(ActionRejection::UnknownKind),
        }
    }
}

fn payload_field<'a>(action: &'a Action, field: &'static str) -> Result<&'a Value, ActionRejection> {
    action
        .payload
        .get(field)
        .ok_or(ActionRejection::MissingField(field))
}

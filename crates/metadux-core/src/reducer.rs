//! The metadata reducer.
//!
//! A pure transition function over [`MetaState`]. Two action kinds change
//! the state; every other action, and every malformed metadata action,
//! hands back the *same* `Arc` so hosts comparing references see no change.
//!
//! # Transitions
//!
//! | Action | Payload | Result |
//! |--------|---------|--------|
//! | `ADD_META` | object | new state, fragment deep-merged |
//! | `ADD_META` | missing or not an object | same state |
//! | `REMOVE_META` | string, array, or object | new state, paths removed |
//! | `REMOVE_META` | `null` | new state, nothing removed |
//! | `REMOVE_META` | missing, boolean, number | same state |
//! | anything else | -- | same state |
//!
//! A valid remove always produces a new reference, even when none of the
//! paths existed.

use std::sync::Arc;

use tracing::{debug, trace};

use metadux_types::{Action, ActionRejection, Meta, MetaAction, RemoveRequest};

use crate::MetaState;
use crate::draft::MetaDraft;
use crate::path::{MetaPath, deep_keys};

/// The state a host store starts from: an empty mapping.
pub fn initial_state() -> MetaState {
    Arc::new(Meta::new())
}

/// Apply `action` to `state`.
///
/// Never fails and never mutates `state`.
pub fn reduce(state: &MetaState, action: &Action) -> MetaState {
    match MetaAction::try_from(action) {
        Ok(MetaAction::Add(fragment)) => add(state, fragment),
        Ok(MetaAction::Remove(request)) => remove(state, &request),
        Err(ActionRejection::UnknownKind) => {
            trace!(kind = %action.kind, "action passed through metadata reducer");
            Arc::clone(state)
        }
        Err(rejection) => {
            debug!(kind = %action.kind, %rejection, "ignoring malformed metadata action");
            Arc::clone(state)
        }
    }
}

fn add(state: &MetaState, fragment: &Meta) -> MetaState {
    let mut draft = MetaDraft::new(state);
    draft.merge(fragment);
    debug!(keys = fragment.len(), "merged metadata fragment");
    draft.finish()
}

fn remove(state: &MetaState, request: &RemoveRequest<'_>) -> MetaState {
    let mut draft = MetaDraft::new(state);
    let mut requested = 0_usize;
    let mut remove_one = |path: &MetaPath| {
        requested = requested.saturating_add(1);
        draft.remove(path);
    };

    match request {
        RemoveRequest::Path(path) => remove_one(&MetaPath::parse(path)),
        RemoveRequest::Paths(paths) => {
            for path in paths {
                remove_one(&MetaPath::parse(path));
            }
        }
        RemoveRequest::Tree(tree) => {
            for path in deep_keys(tree) {
                remove_one(&path);
            }
        }
    }

    debug!(requested, removed = draft.removed(), "removed metadata paths");
    draft.finish()
}

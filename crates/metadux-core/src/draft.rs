//! Working-copy builder for state transitions.
//!
//! A [`MetaDraft`] takes one copy of a [`MetaState`], accepts edits, and
//! hands back a fresh `Arc`. The state it was built from is never touched,
//! so holders of the old reference keep a consistent snapshot.

use std::sync::Arc;

use metadux_types::Meta;

use crate::MetaState;
use crate::merge::merge_into;
use crate::path::{self, MetaPath};

/// Mutable working copy of a metadata state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use metadux_core::draft::MetaDraft;
/// use metadux_core::path::MetaPath;
/// use serde_json::json;
///
/// let state = Arc::new(json!({"a": {"b": 1, "c": 2}}).as_object().cloned().unwrap_or_default());
/// let mut draft = MetaDraft::new(&state);
/// draft.remove(&MetaPath::parse("a.b"));
/// draft.remove(&MetaPath::parse("not.there"));
/// assert_eq!(draft.removed(), 1);
///
/// let next = draft.finish();
/// assert!(!Arc::ptr_eq(&state, &next));
/// assert_eq!(next.get("a"), Some(&json!({"c": 2})));
/// ```
#[derive(Debug)]
pub struct MetaDraft {
    working: Meta,
    removed: usize,
}

impl MetaDraft {
    /// Start a draft from a copy of `state`.
    pub fn new(state: &MetaState) -> Self {
        Self {
            working: Meta::clone(state),
            removed: 0,
        }
    }

    /// Delete the entry at `path`, if it exists.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, path: &MetaPath) -> bool {
        let found = path::remove(&mut self.working, path);
        if found {
            self.removed = self.removed.saturating_add(1);
        }
        found
    }

    /// Deep-merge a fragment into the draft.
    pub fn merge(&mut self, fragment: &Meta) {
        merge_into(&mut self.working, fragment);
    }

    /// Number of paths that [`remove`](Self::remove) actually found.
    pub const fn removed(&self) -> usize {
        self.removed
    }

    /// Consume the draft and produce the new state.
    pub fn finish(self) -> MetaState {
        Arc::new(self.working)
    }
}

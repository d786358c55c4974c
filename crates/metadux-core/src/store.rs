//! A minimal host store wiring the reducer and selectors together.
//!
//! [`MetaStore`] owns a [`RootState`] and the [`MetaSelectors`] caches that
//! read from it. Dispatch runs [`reduce`] over the meta slice and swaps in
//! the result; the caches live and die with the store.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use metadux_types::{Action, Meta};

use crate::MetaState;
use crate::config::StoreConfig;
use crate::reducer::{initial_state, reduce};
use crate::selectors::{MetaSelectors, MetaValueSelector, RootState};

/// Owns the root state and its selector caches.
#[derive(Debug)]
pub struct MetaStore {
    root: RootState,
    selectors: MetaSelectors,
    dispatched: u64,
}

impl MetaStore {
    /// Create a store whose meta slice is the reducer's initial state.
    pub fn new() -> Self {
        Self::with_state(initial_state())
    }

    /// Create a store seeded with `meta`.
    pub fn with_meta(meta: Meta) -> Self {
        Self::with_state(Arc::new(meta))
    }

    /// Create a store seeded from configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        info!(
            keys = config.initial_meta.len(),
            "seeding metadata store from config"
        );
        Self::with_meta(config.initial_meta.clone())
    }

    fn with_state(meta: MetaState) -> Self {
        Self {
            root: RootState {
                meta: Some(meta),
                slices: Meta::new(),
            },
            selectors: MetaSelectors::new(),
            dispatched: 0,
        }
    }

    /// Run `action` through the reducer.
    ///
    /// Returns whether the meta slice changed reference. A valid remove that
    /// matched nothing still counts as a change.
    pub fn dispatch(&mut self, action: &Action) -> bool {
        self.dispatched = self.dispatched.saturating_add(1);
        let current = self.meta();
        let next = reduce(&current, action);
        let changed = !Arc::ptr_eq(&current, &next);
        debug!(
            kind = %action.kind,
            changed,
            dispatched = self.dispatched,
            "dispatched action"
        );
        if changed {
            self.root.meta = Some(next);
        }
        changed
    }

    /// The current root state.
    pub const fn state(&self) -> &RootState {
        &self.root
    }

    /// The current meta slice.
    pub fn meta(&self) -> MetaState {
        self.selectors.get_meta(Some(&self.root))
    }

    /// Number of actions dispatched so far.
    pub const fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Read `path` from the meta slice through the store's memoized
    /// selector.
    pub fn get_meta_value(&self, path: &str, default: Option<&Value>) -> Option<Value> {
        self.selectors
            .get_meta_value(Some(&self.root), path, default)
    }

    /// Build a pre-bound selector that shares this store's caches.
    pub fn meta_value_selector(&self, path: &str, default: Option<Value>) -> MetaValueSelector {
        self.selectors.create_meta_value_selector(path, default)
    }

    /// The store-owned selector caches.
    pub const fn selectors(&self) -> &MetaSelectors {
        &self.selectors
    }
}

impl Default for MetaStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Memoized read access to the metadata slice.
//!
//! Selectors derive values from a host [`RootState`]. Each selector owns its
//! cache: there are no process-wide memo tables. Whoever wires selectors into
//! a store (see [`MetaStore`](crate::store::MetaStore)) owns the caches and
//! drops them with the store.
//!
//! # Memoization
//!
//! Caches hold one entry. A cached result is reused while the meta slice is
//! the *same* `Arc` and the extra arguments (path, default) are equal; any
//! new meta reference forces a recomputation, even if its contents happen to
//! be equal.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use metadux_types::Meta;

use crate::MetaState;
use crate::path::{self, MetaPath};

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

/// The host application's root state.
///
/// Only the `meta` slice belongs to this crate. Other slices are carried
/// along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    /// The metadata slice managed by the reducer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaState>,
    /// Every other slice of the host state.
    #[serde(flatten)]
    pub slices: Meta,
}

/// Return the metadata slice of `root`, or an empty mapping.
///
/// The empty fallback is freshly allocated on every call. Use
/// [`MetaSelectors::get_meta`] for a fallback with a stable identity.
pub fn get_meta(root: Option<&RootState>) -> MetaState {
    root.and_then(|root| root.meta.clone())
        .unwrap_or_else(|| Arc::new(Meta::new()))
}

fn lookup(meta: &Meta, at: &MetaPath, default: Option<&Value>) -> Option<Value> {
    path::get(meta, at).or(default).cloned()
}

// ---------------------------------------------------------------------------
// Memo cell
// ---------------------------------------------------------------------------

/// Single-entry memo cell.
///
/// Not thread-safe: a selector and its cache belong to one consumer.
#[derive(Debug)]
pub struct Memo<K, R> {
    slot: RefCell<Option<(K, R)>>,
    recomputations: Cell<u64>,
}

impl<K, R: Clone> Memo<K, R> {
    /// Create an empty memo.
    pub const fn new() -> Self {
        Self {
            slot: RefCell::new(None),
            recomputations: Cell::new(0),
        }
    }

    /// Return the cached result when `is_hit` accepts the cached key,
    /// otherwise build a key, compute, and cache.
    pub fn get_or_compute(
        &self,
        is_hit: impl FnOnce(&K) -> bool,
        make_key: impl FnOnce() -> K,
        compute: impl FnOnce(&K) -> R,
    ) -> R {
        if let Some((key, result)) = self.slot.borrow().as_ref() {
            if is_hit(key) {
                return result.clone();
            }
        }

        let key = make_key();
        let result = compute(&key);
        self.recomputations
            .set(self.recomputations.get().saturating_add(1));
        *self.slot.borrow_mut() = Some((key, result.clone()));
        result
    }

    /// How many times the result has been computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }

    /// Drop the cached entry and reset the counter.
    pub fn reset(&self) {
        self.slot.borrow_mut().take();
        self.recomputations.set(0);
    }
}

impl<K, R: Clone> Default for Memo<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Cache key for [`MetaSelectors::get_meta_value`].
#[derive(Debug)]
struct MetaValueKey {
    meta: MetaState,
    path: String,
    default: Option<Value>,
}

/// Store-owned selector caches.
#[derive(Debug)]
pub struct MetaSelectors {
    /// Fallback returned when the root has no meta slice. One allocation,
    /// so "no metadata" keeps a single identity across calls.
    empty: MetaState,
    meta_value: Memo<MetaValueKey, Option<Value>>,
}

impl MetaSelectors {
    /// Create a fresh set of selector caches.
    pub fn new() -> Self {
        Self {
            empty: Arc::new(Meta::new()),
            meta_value: Memo::new(),
        }
    }

    /// Return the metadata slice of `root`, or the shared empty mapping.
    pub fn get_meta(&self, root: Option<&RootState>) -> MetaState {
        root.and_then(|root| root.meta.as_ref())
            .map_or_else(|| Arc::clone(&self.empty), Arc::clone)
    }

    /// Read `path` from the metadata slice, falling back to `default`.
    ///
    /// Returns `None` only when the path is missing and no default was given.
    pub fn get_meta_value(
        &self,
        root: Option<&RootState>,
        path: &str,
        default: Option<&Value>,
    ) -> Option<Value> {
        let meta = self.get_meta(root);
        self.meta_value.get_or_compute(
            |key| {
                Arc::ptr_eq(&key.meta, &meta)
                    && key.path == path
                    && key.default.as_ref() == default
            },
            || MetaValueKey {
                meta: Arc::clone(&meta),
                path: path.to_owned(),
                default: default.cloned(),
            },
            |key| Self::meta_value_result_fn(&key.meta, &key.path, key.default.as_ref()),
        )
    }

    /// The projection behind [`get_meta_value`](Self::get_meta_value),
    /// evaluated directly on a metadata mapping without touching the memo.
    pub fn meta_value_result_fn(meta: &Meta, path: &str, default: Option<&Value>) -> Option<Value> {
        lookup(meta, &MetaPath::parse(path), default)
    }

    /// How many times [`get_meta_value`](Self::get_meta_value) recomputed.
    pub fn meta_value_recomputations(&self) -> u64 {
        self.meta_value.recomputations()
    }

    /// Build a selector with `path` and `default` bound up front.
    ///
    /// The selector shares this instance's empty fallback, so roots without
    /// metadata do not defeat its memo.
    pub fn create_meta_value_selector(
        &self,
        path: &str,
        default: Option<Value>,
    ) -> MetaValueSelector {
        MetaValueSelector {
            path: MetaPath::parse(path),
            default,
            empty: Arc::clone(&self.empty),
            memo: Memo::new(),
        }
    }
}

impl Default for MetaSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a standalone selector with `path` and `default` bound up front.
pub fn create_meta_value_selector(path: &str, default: Option<Value>) -> MetaValueSelector {
    MetaSelectors::new().create_meta_value_selector(path, default)
}

/// A pre-bound, memoized path reader over the metadata slice.
#[derive(Debug)]
pub struct MetaValueSelector {
    path: MetaPath,
    default: Option<Value>,
    empty: MetaState,
    memo: Memo<MetaState, Option<Value>>,
}

impl MetaValueSelector {
    /// Select the bound path from `root`.
    ///
    /// Recomputes only when the meta slice is a different `Arc` than the
    /// one seen last time.
    pub fn select(&self, root: Option<&RootState>) -> Option<Value> {
        let meta = root
            .and_then(|root| root.meta.as_ref())
            .map_or_else(|| Arc::clone(&self.empty), Arc::clone);
        self.memo.get_or_compute(
            |cached| Arc::ptr_eq(cached, &meta),
            || Arc::clone(&meta),
            |meta| self.result_fn(meta),
        )
    }

    /// Evaluate the projection directly on a metadata mapping, bypassing
    /// the memo.
    pub fn result_fn(&self, meta: &Meta) -> Option<Value> {
        lookup(meta, &self.path, self.default.as_ref())
    }

    /// The bound path.
    pub const fn path(&self) -> &MetaPath {
        &self.path
    }

    /// How many times [`select`](Self::select) recomputed.
    pub fn recomputations(&self) -> u64 {
        self.memo.recomputations()
    }
}

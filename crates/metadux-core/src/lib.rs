//! Path-addressed metadata state for a host state container.
//!
//! This crate owns the metadata slice of a host's state: a reducer that
//! merges and removes arbitrarily nested metadata by dot-separated path, and
//! memoized selectors that read paths back out.
//!
//! # Modules
//!
//! - [`path`] -- [`MetaPath`](path::MetaPath) parsing, `get` / `set` /
//!   `remove`, and leaf-path enumeration.
//! - [`merge`] -- Non-mutating deep merge.
//! - [`draft`] -- Working-copy builder used for every transition.
//! - [`reducer`] -- The pure `(state, action) -> state` function.
//! - [`selectors`] -- Store-owned, memoized path readers.
//! - [`store`] -- A minimal store wiring reducer and selectors together.
//! - [`config`] -- YAML configuration for store seeding and logging.
//!
//! # State identity
//!
//! State is an `Arc<Meta>`. Hosts detect changes with [`Arc::ptr_eq`]:
//! malformed and foreign actions return the same `Arc`, accepted actions
//! return a new one.
//!
//! ```
//! use std::sync::Arc;
//! use metadux_core::reducer::{initial_state, reduce};
//! use metadux_types::{add_meta, remove_meta};
//! use serde_json::json;
//!
//! let state = initial_state();
//! let added = reduce(&state, &add_meta(json!({"some": {"nested": "data"}})));
//! assert!(!Arc::ptr_eq(&state, &added));
//!
//! let unchanged = reduce(&added, &add_meta(json!(["not", "an", "object"])));
//! assert!(Arc::ptr_eq(&added, &unchanged));
//!
//! let removed = reduce(&added, &remove_meta("some.nested"));
//! assert_eq!(removed.get("some"), Some(&json!({})));
//! ```

pub mod config;
pub mod draft;
pub mod merge;
pub mod path;
pub mod reducer;
pub mod selectors;
pub mod store;

use std::sync::Arc;

use metadux_types::Meta;

// Re-export primary entry points at crate root.
pub use config::{ConfigError, MetaduxConfig};
pub use reducer::{initial_state, reduce};
pub use selectors::{MetaSelectors, MetaValueSelector, RootState, create_meta_value_selector, get_meta};
pub use store::MetaStore;

/// The metadata state: a shared, immutable mapping.
pub type MetaState = Arc<Meta>;

//! JobDeck Dashboard - customizable per-user job search dashboard.
//!
//! This crate provides the widget catalogue, the per-user layout and metrics
//! stores, and a terminal UI for arranging and viewing dashboard widgets.
//!
//! # Overview
//!
//! A user's dashboard is an ordered list of [`WidgetInstance`]s, each naming
//! a widget from the [`WidgetRegistry`] with a size and a visibility flag.
//! The [`LayoutStore`] owns that list: it loads it from key-value storage,
//! repairs anything the registry no longer accepts, applies edits and
//! persists every committed change. The [`MetricsStore`] does the same for
//! the counters the widgets display.
//!
//! Stores publish committed state on `tokio::sync::watch` channels, which is
//! how the TUI learns to redraw.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use jobdeck_dashboard::layout::LayoutStore;
//! use jobdeck_dashboard::registry::WidgetRegistry;
//! use jobdeck_dashboard::storage::MemoryStorage;
//! use jobdeck_dashboard::types::WidgetSize;
//!
//! let mut store = LayoutStore::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(WidgetRegistry::builtin()),
//! );
//! store.load("alice");
//!
//! store.update_widget_size("quickStats", WidgetSize::L).unwrap();
//! assert_eq!(store.widget("quickStats").unwrap().size, WidgetSize::L);
//! ```
//!
//! # Modules
//!
//! - [`types`]: persisted shapes (widget sizes, instances, metrics)
//! - [`registry`]: the compiled-in widget catalogue
//! - [`storage`]: key-value storage backends
//! - [`layout`]: the per-user layout store
//! - [`metrics`]: the per-user metrics store
//! - [`session`]: both stores opened for one user
//! - [`singleton`]: single-instance registration for floating overlays
//! - [`config`]: configuration from environment variables
//! - [`error`]: error types
//! - [`tui`]: terminal user interface

pub mod config;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod registry;
pub mod session;
pub mod singleton;
pub mod storage;
pub mod tui;
pub mod types;

pub use config::{Config, ConfigError};
pub use error::{DashboardError, Result, TuiError};
pub use layout::{default_layout, LayoutStore, LoadState, StoreError};
pub use metrics::MetricsStore;
pub use registry::{RegistryError, WidgetContent, WidgetDefinition, WidgetRegistry};
pub use session::Session;
pub use singleton::{SingletonGuard, SingletonRegistry};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use types::{MetricsUpdate, UserMetrics, WidgetInstance, WidgetSize};

//! Per-user dashboard layout store.
//!
//! The [`LayoutStore`] owns the authoritative ordered list of
//! [`WidgetInstance`]s for one user and keeps it durable in a
//! [`KeyValueStorage`] under the key `dashboard_layout_v2_<userId>`.
//!
//! # State Machine
//!
//! ```text
//! +---------------+   load(user)   +---------+   normalized   +-------+
//! | Uninitialized | -------------> | Loading | -------------> | Ready |
//! +---------------+                +---------+                +-------+
//! ```
//!
//! Loading validates every persisted entry against the [`WidgetRegistry`]:
//! unknown ids and duplicates are dropped, and unsupported sizes fall back to
//! the widget's default size. If nothing is persisted, the data cannot be
//! parsed, storage fails, or validation leaves the list empty, the fixed
//! [`default_layout`] is used.
//!
//! # Persistence
//!
//! Every mutation builds the next layout, renumbers `order` to a contiguous
//! 0-based sequence, writes it to storage, and only then replaces the
//! in-memory list and notifies subscribers. Storage failures are logged and
//! swallowed: the in-memory layout still advances and the next successful
//! write catches storage up.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use jobdeck_dashboard::layout::LayoutStore;
//! use jobdeck_dashboard::registry::WidgetRegistry;
//! use jobdeck_dashboard::storage::MemoryStorage;
//!
//! let mut store = LayoutStore::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(WidgetRegistry::builtin()),
//! );
//! store.load("alice");
//!
//! assert_eq!(store.get_visible_widgets().len(), 6);
//!
//! store.update_widget_visibility("streaks", true).unwrap();
//! let visible = store.get_visible_widgets();
//! assert_eq!(visible.len(), 7);
//! assert_eq!(visible.last().unwrap().id, "streaks");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::registry::WidgetRegistry;
use crate::storage::KeyValueStorage;
use crate::types::{WidgetInstance, WidgetSize};

/// Storage key prefix for persisted layouts.
pub const LAYOUT_KEY_PREFIX: &str = "dashboard_layout_v2_";

/// The fixed default layout as `(id, size, visible)`, in render order.
const DEFAULT_LAYOUT: [(&str, WidgetSize, bool); 8] = [
    ("overallProgress", WidgetSize::L, true),
    ("quickStats", WidgetSize::M, true),
    ("nextActions", WidgetSize::M, true),
    ("communityHighlight", WidgetSize::M, true),
    ("recentApplications", WidgetSize::M, true),
    ("suggestedTasks", WidgetSize::M, true),
    ("translatorShortcut", WidgetSize::S, false),
    ("streaks", WidgetSize::S, false),
];

/// Returns the storage key of a user's layout.
#[must_use]
pub fn layout_key(user_id: &str) -> String {
    format!("{LAYOUT_KEY_PREFIX}{user_id}")
}

/// Returns the fixed default layout with contiguous `order` values.
#[must_use]
pub fn default_layout() -> Vec<WidgetInstance> {
    DEFAULT_LAYOUT
        .iter()
        .enumerate()
        .map(|(order, (id, size, visible))| {
            WidgetInstance::new(*id, *size, *visible, order as u32)
        })
        .collect()
}

/// Lifecycle state of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No user has been loaded yet.
    #[default]
    Uninitialized,
    /// Persisted data is being read and validated.
    Loading,
    /// The store holds a validated layout and accepts mutations.
    Ready,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadState::Uninitialized => "uninitialized",
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
        };
        f.write_str(label)
    }
}

/// Errors returned by store operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// A mutation was attempted before the store finished loading.
    #[error("store is not ready (current state: {0})")]
    NotReady(LoadState),
}

/// Sorts by `order` (stable) and rewrites `order` as the 0-based position.
pub fn renumber(widgets: &mut [WidgetInstance]) {
    widgets.sort_by_key(|w| w.order);
    for (idx, widget) in widgets.iter_mut().enumerate() {
        widget.order = idx as u32;
    }
}

/// Validates raw entries against the registry.
///
/// Unknown ids and duplicate ids are dropped (first occurrence wins);
/// unsupported sizes fall back to the widget's default size.
#[must_use]
pub fn sanitize(widgets: Vec<WidgetInstance>, registry: &WidgetRegistry) -> Vec<WidgetInstance> {
    let mut seen = HashSet::new();
    let mut sanitized = Vec::with_capacity(widgets.len());

    for mut widget in widgets {
        let Some(definition) = registry.get_widget_by_id(&widget.id) else {
            debug!(id = %widget.id, "Dropping layout entry for unknown widget");
            continue;
        };
        if !seen.insert(widget.id.clone()) {
            debug!(id = %widget.id, "Dropping duplicate layout entry");
            continue;
        }
        if !definition.supports(widget.size) {
            debug!(
                id = %widget.id,
                size = %widget.size,
                "Unsupported size in layout entry, using default"
            );
            widget.size = definition.default_size();
        }
        sanitized.push(widget);
    }

    sanitized
}

/// Parses a persisted layout, skipping entries that do not deserialize.
///
/// Returns `None` if the payload is not a JSON array.
fn parse_persisted(raw: &str) -> Option<Vec<WidgetInstance>> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Persisted layout is not valid JSON");
            return None;
        }
    };
    let Value::Array(entries) = value else {
        warn!("Persisted layout is not a JSON array");
        return None;
    };

    let widgets = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<WidgetInstance>(entry) {
            Ok(widget) => Some(widget),
            Err(e) => {
                debug!(error = %e, "Skipping malformed layout entry");
                None
            }
        })
        .collect();
    Some(widgets)
}

/// Authoritative per-user widget layout with durable persistence.
pub struct LayoutStore {
    storage: Arc<dyn KeyValueStorage>,
    registry: Arc<WidgetRegistry>,
    user_id: Option<String>,
    state: LoadState,
    widgets: Vec<WidgetInstance>,
    changes: watch::Sender<Vec<WidgetInstance>>,
}

impl fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutStore")
            .field("user_id", &self.user_id)
            .field("state", &self.state)
            .field("widgets", &self.widgets)
            .finish_non_exhaustive()
    }
}

impl LayoutStore {
    /// Creates an uninitialized store.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, registry: Arc<WidgetRegistry>) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            storage,
            registry,
            user_id: None,
            state: LoadState::Uninitialized,
            widgets: Vec::new(),
            changes,
        }
    }

    /// Loads the persisted layout for `user_id` and transitions to `Ready`.
    ///
    /// Never fails: read and parse errors are logged and the default layout is
    /// used instead. Loading a different user replaces the current layout.
    ///
    /// Accepted entries are held in render order. Their `order` values are
    /// kept as stored until the next mutation renumbers them.
    pub fn load(&mut self, user_id: &str) {
        self.state = LoadState::Loading;
        self.user_id = Some(user_id.to_string());

        let key = layout_key(user_id);
        let persisted = match self.storage.get(&key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read layout, using defaults");
                None
            }
        };

        let widgets = persisted
            .as_deref()
            .and_then(parse_persisted)
            .map(|raw| {
                let mut widgets = sanitize(raw, &self.registry);
                widgets.sort_by_key(|w| w.order);
                widgets
            })
            .filter(|widgets| !widgets.is_empty());

        self.widgets = match widgets {
            Some(widgets) => {
                debug!(user_id, count = widgets.len(), "Loaded persisted layout");
                widgets
            }
            None => {
                debug!(user_id, "No usable persisted layout, using defaults");
                default_layout()
            }
        };

        self.state = LoadState::Ready;
        self.changes.send_replace(self.widgets.clone());
        info!(
            user_id,
            widgets = self.widgets.len(),
            visible = self.widgets.iter().filter(|w| w.visible).count(),
            "Layout ready"
        );
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns `true` once a layout has been loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    /// Returns the loaded user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the registry this store validates against.
    #[must_use]
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Returns every widget instance, visible or not, in render order.
    #[must_use]
    pub fn widgets(&self) -> &[WidgetInstance] {
        &self.widgets
    }

    /// Returns the instance with the given id, if present.
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Subscribes to committed layout changes.
    ///
    /// The receiver always holds the latest layout; intermediate values may
    /// be skipped by slow readers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<WidgetInstance>> {
        self.changes.subscribe()
    }

    /// Returns the visible widgets sorted by `order`.
    ///
    /// The sort is stable, so equal `order` values keep their stored order.
    #[must_use]
    pub fn get_visible_widgets(&self) -> Vec<WidgetInstance> {
        let mut visible: Vec<WidgetInstance> =
            self.widgets.iter().filter(|w| w.visible).cloned().collect();
        visible.sort_by_key(|w| w.order);
        visible
    }

    /// Sets the visibility of a widget. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn update_widget_visibility(&mut self, id: &str, visible: bool) -> Result<(), StoreError> {
        self.ensure_ready()?;

        let Some(idx) = self.position(id) else {
            debug!(id, "Visibility update for absent widget ignored");
            return Ok(());
        };

        let mut next = self.widgets.clone();
        next[idx].visible = visible;
        self.commit(next);
        Ok(())
    }

    /// Changes a widget's size if the definition supports it.
    ///
    /// Unsupported sizes and unknown ids leave the layout unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn update_widget_size(&mut self, id: &str, size: WidgetSize) -> Result<(), StoreError> {
        self.ensure_ready()?;

        if !self.registry.supports_size(id, size) {
            debug!(id, %size, "Unsupported widget size ignored");
            return Ok(());
        }
        let Some(idx) = self.position(id) else {
            debug!(id, "Size update for absent widget ignored");
            return Ok(());
        };

        let mut next = self.widgets.clone();
        next[idx].size = size;
        self.commit(next);
        Ok(())
    }

    /// Replaces the layout with `ordered`, renumbering `order` by position.
    ///
    /// Entries are validated the same way as on load.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn reorder_widgets(&mut self, ordered: Vec<WidgetInstance>) -> Result<(), StoreError> {
        self.ensure_ready()?;

        let mut next = sanitize(ordered, &self.registry);
        for (idx, widget) in next.iter_mut().enumerate() {
            widget.order = idx as u32;
        }
        self.commit(next);
        Ok(())
    }

    /// Moves a widget to `index` in the full layout, hidden widgets included.
    ///
    /// `index` is clamped to the last position. Returns `false` without
    /// touching the layout if `id` is not present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn move_widget(&mut self, id: &str, index: usize) -> Result<bool, StoreError> {
        self.ensure_ready()?;

        let Some(from) = self.position(id) else {
            debug!(id, "Move for absent widget ignored");
            return Ok(false);
        };

        let mut next = self.widgets.clone();
        let widget = next.remove(from);
        let to = index.min(next.len());
        next.insert(to, widget);
        self.reorder_widgets(next)?;
        Ok(true)
    }

    /// Adds a widget, or makes it visible if it is already in the layout.
    ///
    /// A new instance uses `size` when the definition supports it, otherwise
    /// the definition's first supported size, and is appended last.
    /// Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn add_widget(&mut self, id: &str, size: Option<WidgetSize>) -> Result<(), StoreError> {
        self.ensure_ready()?;

        if self.position(id).is_some() {
            return self.update_widget_visibility(id, true);
        }
        let Some(definition) = self.registry.get_widget_by_id(id) else {
            debug!(id, "Add for unknown widget ignored");
            return Ok(());
        };

        let size = size
            .filter(|s| definition.supports(*s))
            .unwrap_or_else(|| definition.default_size());
        let order = self.widgets.len() as u32;

        let mut next = self.widgets.clone();
        next.push(WidgetInstance::new(id, size, true, order));
        self.commit(next);
        Ok(())
    }

    /// Hides a widget. Instances are never deleted from the layout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn remove_widget(&mut self, id: &str) -> Result<(), StoreError> {
        self.update_widget_visibility(id, false)
    }

    /// Overwrites the layout with [`default_layout`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no layout is loaded.
    pub fn reset_to_defaults(&mut self) -> Result<(), StoreError> {
        self.ensure_ready()?;
        info!(user_id = ?self.user_id, "Resetting layout to defaults");
        self.commit(default_layout());
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        if self.state == LoadState::Ready {
            Ok(())
        } else {
            Err(StoreError::NotReady(self.state))
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == id)
    }

    /// Renumbers, persists, then publishes `next`.
    fn commit(&mut self, mut next: Vec<WidgetInstance>) {
        renumber(&mut next);
        self.persist(&next);
        self.widgets = next;
        self.changes.send_replace(self.widgets.clone());
    }

    fn persist(&self, widgets: &[WidgetInstance]) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        let json = match serde_json::to_string(widgets) {
            Ok(json) => json,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to serialize layout");
                return;
            }
        };
        if let Err(e) = self.storage.set(&layout_key(user_id), &json) {
            warn!(user_id, error = %e, "Failed to persist layout");
        }
    }
}

//! Customization modal state.
//!
//! The modal keeps a local copy of the layout for immediate feedback. Every
//! discrete action (visibility toggle, size change, reorder drop, add, reset)
//! is forwarded to the [`LayoutStore`] right away and the local copy is then
//! re-synced from the store, so the store stays the single source of truth.
//!
//! # Reordering
//!
//! A drag starts on the selected row ([`CustomizeModal::begin_drag`]), follows
//! the arrow keys or the mouse pointer, and ends with
//! [`CustomizeModal::drop_drag`], which moves the item, renumbers the list and
//! hands the full list to [`LayoutStore::reorder_widgets`]. Cancelling a drag
//! restores the store's order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use jobdeck_dashboard::layout::LayoutStore;
//! use jobdeck_dashboard::registry::WidgetRegistry;
//! use jobdeck_dashboard::storage::MemoryStorage;
//! use jobdeck_dashboard::tui::CustomizeModal;
//!
//! let mut store = LayoutStore::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(WidgetRegistry::builtin()),
//! );
//! store.load("alice");
//!
//! let mut modal = CustomizeModal::open(&store, Vec::new());
//! modal.begin_drag();
//! modal.move_drag(2);
//! modal.drop_drag(&mut store).unwrap();
//!
//! assert_eq!(store.widgets()[2].id, "overallProgress");
//! ```

use tracing::debug;

use crate::layout::{LayoutStore, StoreError};
use crate::registry::WidgetDefinition;
use crate::types::WidgetInstance;

/// Interaction mode of the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    /// Navigating and editing the layout list.
    #[default]
    Browse,
    /// Picking a widget to add; `selected` indexes the addable list.
    Adding { selected: usize },
    /// Waiting for the user to confirm a reset.
    ConfirmReset,
}

/// An in-progress reorder gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Index the dragged item started at.
    pub from: usize,
    /// Current drop target index.
    pub to: usize,
}

/// Computes the list index under `pointer_row`.
///
/// Rows above the list map to the first item and rows below it to the last.
/// Returns 0 for an empty list.
#[must_use]
pub fn drop_target_index(pointer_row: u16, list_top: u16, row_height: u16, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let offset = pointer_row.saturating_sub(list_top);
    let idx = usize::from(offset / row_height.max(1));
    idx.min(len - 1)
}

/// Moves the item at `from` to `to`, shifting the items in between.
///
/// Out-of-range indexes are clamped to the list bounds.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if items.is_empty() {
        return;
    }
    let last = items.len() - 1;
    let from = from.min(last);
    let to = to.min(last);
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// State of the open customization modal.
#[derive(Debug, Clone)]
pub struct CustomizeModal {
    items: Vec<WidgetInstance>,
    selected: usize,
    drag: Option<DragState>,
    mode: ModalMode,
    feature_flags: Vec<String>,
}

impl CustomizeModal {
    /// Opens the modal over the store's current layout.
    #[must_use]
    pub fn open(store: &LayoutStore, feature_flags: Vec<String>) -> Self {
        let mut modal = Self {
            items: Vec::new(),
            selected: 0,
            drag: None,
            mode: ModalMode::Browse,
            feature_flags,
        };
        modal.sync_from(store);
        modal
    }

    /// Replaces the local copy with the store's layout, sorted by `order`.
    pub fn sync_from(&mut self, store: &LayoutStore) {
        let mut items = store.widgets().to_vec();
        items.sort_by_key(|w| w.order);
        self.items = items;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    /// Returns the local layout copy.
    #[must_use]
    pub fn items(&self) -> &[WidgetInstance] {
        &self.items
    }

    /// Returns the rows to display, with an in-progress drag applied.
    #[must_use]
    pub fn preview_items(&self) -> Vec<&WidgetInstance> {
        let mut rows: Vec<&WidgetInstance> = self.items.iter().collect();
        if let Some(drag) = self.drag {
            move_item(&mut rows, drag.from, drag.to);
        }
        rows
    }

    /// Returns the highlighted row index.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns the highlighted instance.
    #[must_use]
    pub fn selected_item(&self) -> Option<&WidgetInstance> {
        self.items.get(self.selected)
    }

    /// Returns the in-progress drag, if any.
    #[must_use]
    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Returns the interaction mode.
    #[must_use]
    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    /// Highlights the row at `index`, clamped to the list.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.items.len().saturating_sub(1));
    }

    /// Moves the highlight by `delta` rows.
    pub fn select_by(&mut self, delta: isize) {
        self.select(self.selected.saturating_add_signed(delta));
    }

    // ============================================
    // Discrete Actions
    // ============================================

    /// Flips the visibility of the highlighted widget.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::NotReady`] from the store.
    pub fn toggle_visibility(&mut self, store: &mut LayoutStore) -> Result<(), StoreError> {
        let Some(item) = self.selected_item() else {
            return Ok(());
        };
        let (id, visible) = (item.id.clone(), !item.visible);
        store.update_widget_visibility(&id, visible)?;
        self.sync_from(store);
        Ok(())
    }

    /// Advances the highlighted widget to its next supported size.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::NotReady`] from the store.
    pub fn cycle_size(&mut self, store: &mut LayoutStore) -> Result<(), StoreError> {
        let Some(item) = self.selected_item() else {
            return Ok(());
        };
        let Some(definition) = store.registry().get_widget_by_id(&item.id) else {
            return Ok(());
        };
        let (id, size) = (item.id.clone(), definition.next_size(item.size));
        store.update_widget_size(&id, size)?;
        self.sync_from(store);
        Ok(())
    }

    // ============================================
    // Drag and Drop
    // ============================================

    /// Starts dragging the highlighted row.
    pub fn begin_drag(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.drag = Some(DragState {
            from: self.selected,
            to: self.selected,
        });
    }

    /// Moves the drop target by `delta` rows.
    pub fn move_drag(&mut self, delta: isize) {
        if let Some(drag) = self.drag {
            self.drag_to(drag.to.saturating_add_signed(delta));
        }
    }

    /// Sets the drop target, clamped to the list.
    pub fn drag_to(&mut self, index: usize) {
        let last = self.items.len().saturating_sub(1);
        if let Some(drag) = self.drag.as_mut() {
            drag.to = index.min(last);
        }
    }

    /// Completes the drag and persists the new order.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::NotReady`] from the store.
    pub fn drop_drag(&mut self, store: &mut LayoutStore) -> Result<(), StoreError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        if drag.from == drag.to {
            return Ok(());
        }

        let mut reordered = self.items.clone();
        move_item(&mut reordered, drag.from, drag.to);
        for (idx, widget) in reordered.iter_mut().enumerate() {
            widget.order = idx as u32;
        }
        debug!(from = drag.from, to = drag.to, "Reordering widgets");

        store.reorder_widgets(reordered)?;
        self.sync_from(store);
        self.select(drag.to);
        Ok(())
    }

    /// Abandons the drag and restores the store's order.
    pub fn cancel_drag(&mut self, store: &LayoutStore) {
        if self.drag.take().is_some() {
            self.sync_from(store);
        }
    }

    // ============================================
    // Reset
    // ============================================

    /// Asks for reset confirmation.
    pub fn request_reset(&mut self) {
        self.drag = None;
        self.mode = ModalMode::ConfirmReset;
    }

    /// Applies a confirmed reset.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::NotReady`] from the store.
    pub fn confirm_reset(&mut self, store: &mut LayoutStore) -> Result<(), StoreError> {
        if self.mode != ModalMode::ConfirmReset {
            return Ok(());
        }
        self.mode = ModalMode::Browse;
        store.reset_to_defaults()?;
        self.sync_from(store);
        self.select(0);
        Ok(())
    }

    /// Returns to browsing without resetting.
    pub fn cancel_reset(&mut self) {
        if self.mode == ModalMode::ConfirmReset {
            self.mode = ModalMode::Browse;
        }
    }

    // ============================================
    // Adding
    // ============================================

    /// Available widgets (under the active flags) that are not currently visible.
    #[must_use]
    pub fn addable_widgets<'a>(&self, store: &'a LayoutStore) -> Vec<&'a WidgetDefinition> {
        store
            .registry()
            .get_available_widgets(&self.feature_flags)
            .into_iter()
            .filter(|definition| {
                !self
                    .items
                    .iter()
                    .any(|w| w.id == definition.id && w.visible)
            })
            .collect()
    }

    /// Opens the add picker.
    pub fn begin_add(&mut self) {
        self.drag = None;
        self.mode = ModalMode::Adding { selected: 0 };
    }

    /// Moves the picker highlight by `delta`, clamped to `len` entries.
    pub fn select_addable_by(&mut self, delta: isize, len: usize) {
        if let ModalMode::Adding { selected } = self.mode {
            let next = selected
                .saturating_add_signed(delta)
                .min(len.saturating_sub(1));
            self.mode = ModalMode::Adding { selected: next };
        }
    }

    /// Adds the highlighted picker entry and returns to browsing.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::NotReady`] from the store.
    pub fn add_selected(&mut self, store: &mut LayoutStore) -> Result<(), StoreError> {
        let ModalMode::Adding { selected } = self.mode else {
            return Ok(());
        };
        self.mode = ModalMode::Browse;

        let Some(id) = self
            .addable_widgets(store)
            .get(selected)
            .map(|definition| definition.id)
        else {
            return Ok(());
        };

        store.add_widget(id, None)?;
        self.sync_from(store);
        if let Some(idx) = self.items.iter().position(|w| w.id == id) {
            self.select(idx);
        }
        Ok(())
    }

    /// Leaves the add picker without adding.
    pub fn cancel_add(&mut self) {
        if matches!(self.mode, ModalMode::Adding { .. }) {
            self.mode = ModalMode::Browse;
        }
    }
}

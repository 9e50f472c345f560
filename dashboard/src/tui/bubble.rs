//! Floating assistant bubble.
//!
//! A placeholder overlay that can be dragged around the screen. Only one
//! bubble may exist at a time: opening one claims the
//! [`ASSISTANT_SINGLETON`] name, and the claim is released when the bubble is
//! dropped. The bubble is always kept fully inside the screen bounds.

use ratatui::layout::Rect;

use crate::singleton::{SingletonGuard, SingletonRegistry};

/// Singleton name claimed by the assistant bubble.
pub const ASSISTANT_SINGLETON: &str = "assistant-bubble";

/// Bubble width in columns.
pub const BUBBLE_WIDTH: u16 = 30;

/// Bubble height in rows.
pub const BUBBLE_HEIGHT: u16 = 5;

/// Clamps a top-left position so a `width` x `height` box fits inside `bounds`.
///
/// When the box is larger than `bounds` it is pinned to the top-left corner.
#[must_use]
pub fn clamp_position(x: i32, y: i32, width: u16, height: u16, bounds: Rect) -> (u16, u16) {
    let min_x = i32::from(bounds.x);
    let min_y = i32::from(bounds.y);
    let max_x = (i32::from(bounds.right()) - i32::from(width)).max(min_x);
    let max_y = (i32::from(bounds.bottom()) - i32::from(height)).max(min_y);

    // Both results lie within u16 bounds by construction.
    let cx = x.clamp(min_x, max_x) as u16;
    let cy = y.clamp(min_y, max_y) as u16;
    (cx, cy)
}

/// The open assistant bubble.
#[derive(Debug)]
pub struct AssistantBubble {
    _guard: SingletonGuard,
    x: u16,
    y: u16,
    /// Pointer offset inside the bubble while a mouse drag is active.
    grab: Option<(u16, u16)>,
}

impl AssistantBubble {
    /// Opens the bubble in the bottom-right corner of `bounds`.
    ///
    /// Returns `None` if a bubble is already open.
    #[must_use]
    pub fn open(singletons: &SingletonRegistry, bounds: Rect) -> Option<Self> {
        let guard = singletons.register(ASSISTANT_SINGLETON)?;
        let (x, y) = clamp_position(i32::MAX, i32::MAX, BUBBLE_WIDTH, BUBBLE_HEIGHT, bounds);
        Some(Self {
            _guard: guard,
            x,
            y,
            grab: None,
        })
    }

    /// Returns the top-left corner.
    #[must_use]
    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Returns the on-screen area, clipped to `bounds`.
    #[must_use]
    pub fn area(&self, bounds: Rect) -> Rect {
        Rect::new(self.x, self.y, BUBBLE_WIDTH, BUBBLE_HEIGHT).intersection(bounds)
    }

    /// Returns `true` if the cell at (`column`, `row`) is inside the bubble.
    #[must_use]
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && column < self.x.saturating_add(BUBBLE_WIDTH)
            && row >= self.y
            && row < self.y.saturating_add(BUBBLE_HEIGHT)
    }

    /// Returns `true` while a mouse drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Moves the bubble by a delta, keeping it inside `bounds`.
    pub fn move_by(&mut self, dx: i32, dy: i32, bounds: Rect) {
        self.move_to(i32::from(self.x) + dx, i32::from(self.y) + dy, bounds);
    }

    /// Re-clamps the bubble after the screen changed size.
    pub fn clamp_to(&mut self, bounds: Rect) {
        self.move_to(i32::from(self.x), i32::from(self.y), bounds);
    }

    /// Starts a mouse drag if the pointer is on the bubble.
    pub fn begin_drag(&mut self, column: u16, row: u16) -> bool {
        if !self.contains(column, row) {
            return false;
        }
        self.grab = Some((column - self.x, row - self.y));
        true
    }

    /// Follows the pointer during a mouse drag.
    pub fn drag_to(&mut self, column: u16, row: u16, bounds: Rect) {
        if let Some((gx, gy)) = self.grab {
            self.move_to(
                i32::from(column) - i32::from(gx),
                i32::from(row) - i32::from(gy),
                bounds,
            );
        }
    }

    /// Ends a mouse drag.
    pub fn end_drag(&mut self) {
        self.grab = None;
    }

    fn move_to(&mut self, x: i32, y: i32, bounds: Rect) {
        (self.x, self.y) = clamp_position(x, y, BUBBLE_WIDTH, BUBBLE_HEIGHT, bounds);
    }
}

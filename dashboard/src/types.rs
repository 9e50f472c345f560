//! Core data types for the JobDeck dashboard.
//!
//! This module defines the persisted shapes shared by the layout store, the
//! metrics store, and the TUI. All types use serde for the on-device JSON
//! representation, which is part of the storage contract:
//!
//! - A layout is a JSON array of `{ "id", "size", "visible", "order" }`
//! - Metrics are a JSON object with camelCase counter fields

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display footprint of a widget on the dashboard.
///
/// Serialized as the bare strings `"S"`, `"M"` and `"L"`.
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::types::WidgetSize;
///
/// assert_eq!(serde_json::to_string(&WidgetSize::M).unwrap(), "\"M\"");
/// assert_eq!("l".parse::<WidgetSize>().unwrap(), WidgetSize::L);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WidgetSize {
    /// Small: a single block of the widget's minimum height.
    S,
    /// Medium: twice the minimum height.
    M,
    /// Large: three times the minimum height.
    L,
}

impl WidgetSize {
    /// All size variants, smallest first.
    pub const ALL: [WidgetSize; 3] = [WidgetSize::S, WidgetSize::M, WidgetSize::L];

    /// Returns how many multiples of a widget's minimum height this size occupies.
    #[must_use]
    pub fn height_multiplier(self) -> u16 {
        match self {
            WidgetSize::S => 1,
            WidgetSize::M => 2,
            WidgetSize::L => 3,
        }
    }

    /// Returns the single-letter label used in storage and on screen.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetSize::S => "S",
            WidgetSize::M => "M",
            WidgetSize::L => "L",
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for WidgetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(WidgetSize::S),
            "M" => Ok(WidgetSize::M),
            "L" => Ok(WidgetSize::L),
            other => Err(format!("unknown widget size '{other}', expected S, M or L")),
        }
    }
}

/// A per-user placement of a registered widget.
///
/// The `id` references a [`WidgetDefinition`](crate::registry::WidgetDefinition)
/// in the registry. `order` defines the render sequence; the layout store
/// renumbers it to a contiguous 0-based sequence on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Registry identifier of the widget.
    pub id: String,
    /// Selected size variant.
    pub size: WidgetSize,
    /// Whether the widget is rendered on the dashboard.
    pub visible: bool,
    /// Render position, ascending.
    pub order: u32,
}

impl WidgetInstance {
    /// Creates a new widget instance.
    #[must_use]
    pub fn new(id: impl Into<String>, size: WidgetSize, visible: bool, order: u32) -> Self {
        Self {
            id: id.into(),
            size,
            visible,
            order,
        }
    }
}

/// Display counters for a single user.
///
/// Missing fields in persisted data fall back to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserMetrics {
    /// Résumé completion percentage.
    pub resume_progress: u32,
    /// Applications submitted this week.
    pub applications_week: u32,
    /// Interviews scheduled in the future.
    pub interviews_upcoming: u32,
    /// Deadlines falling within the next 48 hours.
    #[serde(rename = "deadlines48h")]
    pub deadlines_48h: u32,
    /// Consecutive days with recorded activity.
    pub streak_days: u32,
}

/// A partial update to [`UserMetrics`].
///
/// Fields left as `None` keep their current value when merged.
///
/// # Example
///
/// ```
/// use jobdeck_dashboard::types::{MetricsUpdate, UserMetrics};
///
/// let current = UserMetrics { streak_days: 4, ..Default::default() };
/// let update = MetricsUpdate { resume_progress: Some(80), ..Default::default() };
///
/// let merged = update.apply_to(&current);
/// assert_eq!(merged.resume_progress, 80);
/// assert_eq!(merged.streak_days, 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsUpdate {
    pub resume_progress: Option<u32>,
    pub applications_week: Option<u32>,
    pub interviews_upcoming: Option<u32>,
    #[serde(rename = "deadlines48h")]
    pub deadlines_48h: Option<u32>,
    pub streak_days: Option<u32>,
}

impl MetricsUpdate {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges this update over `current` and returns the result.
    #[must_use]
    pub fn apply_to(&self, current: &UserMetrics) -> UserMetrics {
        UserMetrics {
            resume_progress: self.resume_progress.unwrap_or(current.resume_progress),
            applications_week: self.applications_week.unwrap_or(current.applications_week),
            interviews_upcoming: self
                .interviews_upcoming
                .unwrap_or(current.interviews_upcoming),
            deadlines_48h: self.deadlines_48h.unwrap_or(current.deadlines_48h),
            streak_days: self.streak_days.unwrap_or(current.streak_days),
        }
    }
}

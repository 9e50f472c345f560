//! Widget registry: the compiled-in catalogue of dashboard widgets.
//!
//! Each [`WidgetDefinition`] describes a widget's identity and display
//! constraints: which sizes it supports, its minimum render height, its icon,
//! and the component function that turns [`UserMetrics`] into displayable
//! [`WidgetContent`]. Definitions are never mutated at runtime.
//!
//! Lookups are pure and infallible. An unknown id is reported as `None`, never
//! as an error.
//!
//! # Example
//!
//! ```
//! use jobdeck_dashboard::registry::WidgetRegistry;
//! use jobdeck_dashboard::types::WidgetSize;
//!
//! let registry = WidgetRegistry::builtin();
//!
//! let quick_stats = registry.get_widget_by_id("quickStats").unwrap();
//! assert!(quick_stats.supports(WidgetSize::M));
//! assert!(registry.get_widget_by_id("weather").is_none());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{UserMetrics, WidgetSize};

/// Renders a widget's content for the given metrics and size.
pub type WidgetComponent = fn(&UserMetrics, WidgetSize) -> WidgetContent;

/// Renderer-agnostic content produced by a widget component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetContent {
    /// Primary line shown at every size.
    pub headline: String,
    /// Optional completion percentage, drawn as a gauge.
    pub progress: Option<u16>,
    /// Secondary lines; larger sizes show more of them.
    pub details: Vec<String>,
}

impl WidgetContent {
    fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Default::default()
        }
    }

    fn with_progress(mut self, percent: u32) -> Self {
        self.progress = Some(percent.min(100) as u16);
        self
    }

    fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }
}

/// Static description of a dashboard widget.
#[derive(Debug, Clone, Copy)]
pub struct WidgetDefinition {
    /// Unique identifier, also used as the storage key of instances.
    pub id: &'static str,
    /// Display-label reference.
    pub title_key: &'static str,
    /// English label shown when no translation table is loaded.
    pub title: &'static str,
    /// Short glyph drawn before the title.
    pub icon: &'static str,
    /// Supported size variants; the first entry is the default size.
    pub supports_sizes: &'static [WidgetSize],
    /// Minimum content height in terminal rows.
    pub min_height: u16,
    /// One-line description shown in the customization modal.
    pub description: &'static str,
    /// Feature flag gating availability, if any.
    pub feature_flag: Option<&'static str>,
    /// Content renderer.
    pub component: WidgetComponent,
}

impl WidgetDefinition {
    /// Returns `true` if `size` is one of the supported variants.
    #[must_use]
    pub fn supports(&self, size: WidgetSize) -> bool {
        self.supports_sizes.contains(&size)
    }

    /// Returns the first supported size.
    #[must_use]
    pub fn default_size(&self) -> WidgetSize {
        self.supports_sizes
            .first()
            .copied()
            .unwrap_or(WidgetSize::M)
    }

    /// Returns the supported size following `current`, wrapping around.
    ///
    /// Used by the customization modal to cycle sizes with a single key.
    #[must_use]
    pub fn next_size(&self, current: WidgetSize) -> WidgetSize {
        let sizes = self.supports_sizes;
        match sizes.iter().position(|s| *s == current) {
            Some(idx) => sizes[(idx + 1) % sizes.len()],
            None => self.default_size(),
        }
    }

    /// Renders this widget's content.
    #[must_use]
    pub fn render_content(&self, metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
        (self.component)(metrics, size)
    }
}

/// Errors raised when building a registry from custom definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two definitions share the same id.
    #[error("widget '{0}' registered more than once")]
    DuplicateId(String),

    /// A definition has an empty id.
    #[error("widget id cannot be empty")]
    EmptyId,

    /// A definition supports no sizes.
    #[error("widget '{0}' must support at least one size")]
    NoSupportedSizes(String),

    /// A definition has a zero minimum height.
    #[error("widget '{0}' must have a positive minimum height")]
    ZeroMinHeight(String),
}

/// The catalogue of available widgets, in registration order.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    widgets: Vec<WidgetDefinition>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WidgetRegistry {
    /// Builds a registry from custom definitions, validating their invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if an id is empty or duplicated, a
    /// definition supports no sizes, or a minimum height is zero.
    pub fn new(definitions: Vec<WidgetDefinition>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if definition.id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if !seen.insert(definition.id) {
                return Err(RegistryError::DuplicateId(definition.id.to_string()));
            }
            if definition.supports_sizes.is_empty() {
                return Err(RegistryError::NoSupportedSizes(definition.id.to_string()));
            }
            if definition.min_height == 0 {
                return Err(RegistryError::ZeroMinHeight(definition.id.to_string()));
            }
        }
        Ok(Self {
            widgets: definitions,
        })
    }

    /// Returns the registry of built-in dashboard widgets.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            widgets: BUILTIN_WIDGETS.to_vec(),
        }
    }

    /// Looks up a widget definition by id.
    #[must_use]
    pub fn get_widget_by_id(&self, id: &str) -> Option<&WidgetDefinition> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Returns every definition in registration order.
    #[must_use]
    pub fn get_all_widgets(&self) -> &[WidgetDefinition] {
        &self.widgets
    }

    /// Returns the widgets available under the given active feature flags.
    ///
    /// Widgets without a feature flag are always available. Widgets gated by
    /// a flag are included only when that flag is active.
    #[must_use]
    pub fn get_available_widgets<S: AsRef<str>>(&self, active_flags: &[S]) -> Vec<&WidgetDefinition> {
        self.widgets
            .iter()
            .filter(|w| match w.feature_flag {
                None => true,
                Some(flag) => active_flags.iter().any(|f| f.as_ref() == flag),
            })
            .collect()
    }

    /// Returns `true` if a widget with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get_widget_by_id(id).is_some()
    }

    /// Returns `true` if the widget exists and supports `size`.
    #[must_use]
    pub fn supports_size(&self, id: &str, size: WidgetSize) -> bool {
        self.get_widget_by_id(id)
            .is_some_and(|definition| definition.supports(size))
    }

    /// Returns the default size of a registered widget.
    #[must_use]
    pub fn default_size(&self, id: &str) -> Option<WidgetSize> {
        self.get_widget_by_id(id).map(WidgetDefinition::default_size)
    }

    /// Returns the number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if no widgets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

// =============================================================================
// Built-in Widgets
// =============================================================================

/// Feature flag gating the translator shortcut widget.
pub const TRANSLATOR_FLAG: &str = "translator";

const BUILTIN_WIDGETS: [WidgetDefinition; 8] = [
    WidgetDefinition {
        id: "overallProgress",
        title_key: "dashboard.widgets.overallProgress",
        title: "Overall Progress",
        icon: "◎",
        supports_sizes: &[WidgetSize::L, WidgetSize::M],
        min_height: 2,
        description: "Résumé completion and weekly momentum",
        feature_flag: None,
        component: overall_progress,
    },
    WidgetDefinition {
        id: "quickStats",
        title_key: "dashboard.widgets.quickStats",
        title: "Quick Stats",
        icon: "▤",
        supports_sizes: &[WidgetSize::M, WidgetSize::S, WidgetSize::L],
        min_height: 1,
        description: "Applications, interviews and deadlines at a glance",
        feature_flag: None,
        component: quick_stats,
    },
    WidgetDefinition {
        id: "nextActions",
        title_key: "dashboard.widgets.nextActions",
        title: "Next Actions",
        icon: "→",
        supports_sizes: &[WidgetSize::M, WidgetSize::L],
        min_height: 2,
        description: "What to do next to keep moving",
        feature_flag: None,
        component: next_actions,
    },
    WidgetDefinition {
        id: "communityHighlight",
        title_key: "dashboard.widgets.communityHighlight",
        title: "Community Highlight",
        icon: "✦",
        supports_sizes: &[WidgetSize::M, WidgetSize::L],
        min_height: 2,
        description: "A featured post from the community feed",
        feature_flag: None,
        component: community_highlight,
    },
    WidgetDefinition {
        id: "recentApplications",
        title_key: "dashboard.widgets.recentApplications",
        title: "Recent Applications",
        icon: "✉",
        supports_sizes: &[WidgetSize::M, WidgetSize::L],
        min_height: 2,
        description: "Applications sent this week",
        feature_flag: None,
        component: recent_applications,
    },
    WidgetDefinition {
        id: "suggestedTasks",
        title_key: "dashboard.widgets.suggestedTasks",
        title: "Suggested Tasks",
        icon: "☐",
        supports_sizes: &[WidgetSize::M, WidgetSize::L],
        min_height: 2,
        description: "Small tasks that improve your profile",
        feature_flag: None,
        component: suggested_tasks,
    },
    WidgetDefinition {
        id: "translatorShortcut",
        title_key: "dashboard.widgets.translatorShortcut",
        title: "Translator",
        icon: "⇄",
        supports_sizes: &[WidgetSize::S, WidgetSize::M],
        min_height: 1,
        description: "Jump to the job-post translator",
        feature_flag: Some(TRANSLATOR_FLAG),
        component: translator_shortcut,
    },
    WidgetDefinition {
        id: "streaks",
        title_key: "dashboard.widgets.streaks",
        title: "Streaks",
        icon: "✹",
        supports_sizes: &[WidgetSize::S, WidgetSize::M],
        min_height: 1,
        description: "Consecutive days of job-search activity",
        feature_flag: None,
        component: streaks,
    },
];

fn overall_progress(metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let mut content = WidgetContent::new(format!("Résumé {}% complete", metrics.resume_progress))
        .with_progress(metrics.resume_progress);
    if size >= WidgetSize::M {
        content = content.with_detail(format!(
            "{} applications this week",
            metrics.applications_week
        ));
    }
    if size == WidgetSize::L {
        content = content
            .with_detail(format!("{} interviews upcoming", metrics.interviews_upcoming))
            .with_detail(format!("{}-day streak", metrics.streak_days));
    }
    content
}

fn quick_stats(metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let mut content = WidgetContent::new(format!(
        "{} apps · {} interviews · {} due",
        metrics.applications_week, metrics.interviews_upcoming, metrics.deadlines_48h
    ));
    if size >= WidgetSize::M {
        content = content.with_detail(format!(
            "{} deadlines in the next 48 hours",
            metrics.deadlines_48h
        ));
    }
    content
}

fn next_actions(metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let mut actions = Vec::new();
    if metrics.resume_progress < 100 {
        actions.push("Finish your résumé".to_string());
    }
    if metrics.deadlines_48h > 0 {
        actions.push(format!("Submit {} application(s) due soon", metrics.deadlines_48h));
    }
    if metrics.interviews_upcoming > 0 {
        actions.push("Practice for your next interview".to_string());
    }
    if actions.is_empty() {
        actions.push("Browse new job postings".to_string());
    }

    let limit = usize::from(size.height_multiplier()) * 2;
    let mut content = WidgetContent::new(format!("{} suggested action(s)", actions.len()));
    for action in actions.into_iter().take(limit) {
        content = content.with_detail(action);
    }
    content
}

fn community_highlight(_metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let content = WidgetContent::new("How I landed interviews after 3 months of silence");
    if size == WidgetSize::L {
        content
            .with_detail("Tailor every cover letter to the posting.")
            .with_detail("Follow up one week after applying.")
    } else {
        content.with_detail("Tailor every cover letter to the posting.")
    }
}

fn recent_applications(metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let content = WidgetContent::new(format!(
        "{} application(s) sent this week",
        metrics.applications_week
    ));
    if size == WidgetSize::L {
        content.with_detail("Open the tracker to review statuses")
    } else {
        content
    }
}

fn suggested_tasks(metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let content = WidgetContent::new("Add a skills section")
        .with_progress(metrics.resume_progress);
    if size == WidgetSize::L {
        content
            .with_detail("Record a mock interview answer")
            .with_detail("Ask a peer for résumé feedback")
    } else {
        content.with_detail("Record a mock interview answer")
    }
}

fn translator_shortcut(_metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let content = WidgetContent::new("Translate a job posting");
    if size == WidgetSize::M {
        content.with_detail("Paste any posting to get a plain-language summary")
    } else {
        content
    }
}

fn streaks(metrics: &UserMetrics, size: WidgetSize) -> WidgetContent {
    let content = WidgetContent::new(format!("{}-day streak", metrics.streak_days));
    if size == WidgetSize::M {
        content.with_detail("Log one activity today to keep it going")
    } else {
        content
    }
}

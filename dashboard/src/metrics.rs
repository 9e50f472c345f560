//! Per-user display counters.
//!
//! [`MetricsStore`] follows the same lifecycle as the
//! [`LayoutStore`](crate::layout::LayoutStore): it must be loaded for a user
//! before updates are accepted, persists before updating memory, and falls
//! back to zeroed [`UserMetrics`] whenever the persisted value is missing or
//! unreadable.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::layout::{LoadState, StoreError};
use crate::storage::KeyValueStorage;
use crate::types::{MetricsUpdate, UserMetrics};

/// Storage key prefix for persisted metrics.
pub const METRICS_KEY_PREFIX: &str = "user_metrics_v2_";

/// Returns the storage key of a user's metrics.
#[must_use]
pub fn metrics_key(user_id: &str) -> String {
    format!("{METRICS_KEY_PREFIX}{user_id}")
}

/// Authoritative per-user metrics with durable persistence.
pub struct MetricsStore {
    storage: Arc<dyn KeyValueStorage>,
    user_id: Option<String>,
    state: LoadState,
    metrics: UserMetrics,
    changes: watch::Sender<UserMetrics>,
}

impl fmt::Debug for MetricsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsStore")
            .field("user_id", &self.user_id)
            .field("state", &self.state)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl MetricsStore {
    /// Creates an uninitialized store holding zeroed metrics.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (changes, _) = watch::channel(UserMetrics::default());
        Self {
            storage,
            user_id: None,
            state: LoadState::Uninitialized,
            metrics: UserMetrics::default(),
            changes,
        }
    }

    /// Loads the persisted metrics for `user_id` and transitions to `Ready`.
    pub fn load(&mut self, user_id: &str) {
        self.state = LoadState::Loading;
        self.user_id = Some(user_id.to_string());

        let raw = match self.storage.get(&metrics_key(user_id)) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read metrics, using defaults");
                None
            }
        };

        self.metrics = match raw.as_deref().map(serde_json::from_str::<UserMetrics>) {
            Some(Ok(metrics)) => metrics,
            Some(Err(e)) => {
                warn!(user_id, error = %e, "Persisted metrics are malformed, using defaults");
                UserMetrics::default()
            }
            None => {
                debug!(user_id, "No persisted metrics, using defaults");
                UserMetrics::default()
            }
        };

        self.state = LoadState::Ready;
        self.changes.send_replace(self.metrics);
        info!(user_id, "Metrics ready");
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns the current metrics.
    #[must_use]
    pub fn metrics(&self) -> UserMetrics {
        self.metrics
    }

    /// Subscribes to committed metrics changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UserMetrics> {
        self.changes.subscribe()
    }

    /// Merges `update` into the current metrics, persists, then publishes.
    ///
    /// An empty update is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] if no metrics are loaded.
    pub fn update_metrics(&mut self, update: MetricsUpdate) -> Result<(), StoreError> {
        if self.state != LoadState::Ready {
            return Err(StoreError::NotReady(self.state));
        }
        if update.is_empty() {
            return Ok(());
        }

        let next = update.apply_to(&self.metrics);
        self.persist(&next);
        self.metrics = next;
        self.changes.send_replace(next);
        Ok(())
    }

    fn persist(&self, metrics: &UserMetrics) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        let json = match serde_json::to_string(metrics) {
            Ok(json) => json,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to serialize metrics");
                return;
            }
        };
        if let Err(e) = self.storage.set(&metrics_key(user_id), &json) {
            warn!(user_id, error = %e, "Failed to persist metrics");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ready_store() -> (MetricsStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = MetricsStore::new(storage.clone());
        store.load("alice");
        (store, storage)
    }

    #[test]
    fn update_before_load_is_rejected() {
        let mut store = MetricsStore::new(Arc::new(MemoryStorage::new()));

        let result = store.update_metrics(MetricsUpdate {
            streak_days: Some(1),
            ..Default::default()
        });

        assert_eq!(result, Err(StoreError::NotReady(LoadState::Uninitialized)));
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let (store, _) = ready_store();

        assert_eq!(store.state(), LoadState::Ready);
        assert_eq!(store.metrics(), UserMetrics::default());
    }

    #[test]
    fn malformed_metrics_fall_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(&metrics_key("bob"), "[1, 2, 3]").unwrap();

        let mut store = MetricsStore::new(storage);
        store.load("bob");

        assert_eq!(store.metrics(), UserMetrics::default());
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let (mut store, _) = ready_store();
        store
            .update_metrics(MetricsUpdate {
                resume_progress: Some(40),
                streak_days: Some(3),
                ..Default::default()
            })
            .unwrap();

        store
            .update_metrics(MetricsUpdate {
                streak_days: Some(4),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.metrics().resume_progress, 40);
        assert_eq!(store.metrics().streak_days, 4);
    }

    #[test]
    fn update_is_persisted_as_camel_case_json() {
        let (mut store, storage) = ready_store();

        store
            .update_metrics(MetricsUpdate {
                deadlines_48h: Some(2),
                ..Default::default()
            })
            .unwrap();

        let raw = storage.get(&metrics_key("alice")).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["deadlines48h"], 2);
        assert_eq!(json["resumeProgress"], 0);
    }

    #[test]
    fn empty_update_does_not_write() {
        let (mut store, storage) = ready_store();

        store.update_metrics(MetricsUpdate::default()).unwrap();

        assert!(storage.is_empty());
    }

    #[test]
    fn reload_restores_persisted_metrics() {
        let (mut store, storage) = ready_store();
        store
            .update_metrics(MetricsUpdate {
                applications_week: Some(5),
                ..Default::default()
            })
            .unwrap();

        let mut reloaded = MetricsStore::new(storage);
        reloaded.load("alice");

        assert_eq!(reloaded.metrics(), store.metrics());
    }

    #[tokio::test]
    async fn subscribers_observe_updates() {
        let (mut store, _) = ready_store();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store
            .update_metrics(MetricsUpdate {
                interviews_upcoming: Some(2),
                ..Default::default()
            })
            .unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().interviews_upcoming, 2);
    }
}

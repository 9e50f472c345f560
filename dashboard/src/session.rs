//! Opening a user's dashboard state.
//!
//! A [`Session`] bundles the layout and metrics stores for one user over a
//! shared storage backend, both already loaded.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::layout::LayoutStore;
use crate::metrics::MetricsStore;
use crate::registry::WidgetRegistry;
use crate::storage::{FileStorage, KeyValueStorage};

/// Loaded layout and metrics stores for one user.
#[derive(Debug)]
pub struct Session {
    /// The user's widget layout.
    pub layout: LayoutStore,
    /// The user's dashboard counters.
    pub metrics: MetricsStore,
}

impl Session {
    /// Opens file storage under `config.data_dir` and loads both stores for
    /// `config.user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Storage`](crate::DashboardError::Storage) if
    /// the data directory cannot be created.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir)?;
        Ok(Self::with_storage(Arc::new(storage), &config.user_id))
    }

    /// Loads both stores for `user_id` over an existing backend.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn KeyValueStorage>, user_id: &str) -> Self {
        let mut layout = LayoutStore::new(storage.clone(), Arc::new(WidgetRegistry::builtin()));
        layout.load(user_id);
        let mut metrics = MetricsStore::new(storage);
        metrics.load(user_id);
        debug!(user_id, "Session opened");
        Self { layout, metrics }
    }
}

//! Named single-instance registration.
//!
//! UI elements that must never appear twice (the assistant bubble) register
//! a name before being created. Registration hands back a
//! [`SingletonGuard`]; while it is alive, further registrations of the same
//! name are refused. Dropping the guard frees the name.
//!
//! ```
//! use jobdeck_dashboard::singleton::SingletonRegistry;
//!
//! let registry = SingletonRegistry::new();
//! let guard = registry.register("assistant").unwrap();
//! assert!(registry.register("assistant").is_none());
//!
//! drop(guard);
//! assert!(registry.register("assistant").is_some());
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

/// Shared registry of active singleton names.
///
/// Cloning yields another handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct SingletonRegistry {
    active: Arc<Mutex<HashSet<String>>>,
}

impl SingletonRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name`, or returns `None` if it is already claimed.
    #[must_use]
    pub fn register(&self, name: &str) -> Option<SingletonGuard> {
        if !self.lock().insert(name.to_string()) {
            debug!(name, "Singleton already active");
            return None;
        }
        debug!(name, "Singleton registered");
        Some(SingletonGuard {
            name: name.to_string(),
            registry: self.clone(),
        })
    }

    /// Returns `true` if `name` is currently claimed.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Proof of a claimed singleton name; releases the name on drop.
#[derive(Debug)]
pub struct SingletonGuard {
    name: String,
    registry: SingletonRegistry,
}

impl SingletonGuard {
    /// Returns the claimed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for SingletonGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.name);
        debug!(name = %self.name, "Singleton released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_registration_is_refused() {
        let registry = SingletonRegistry::new();

        let _guard = registry.register("assistant").unwrap();

        assert!(registry.register("assistant").is_none());
        assert!(registry.is_active("assistant"));
    }

    #[test]
    fn dropping_guard_releases_name() {
        let registry = SingletonRegistry::new();

        let guard = registry.register("assistant").unwrap();
        assert_eq!(guard.name(), "assistant");
        drop(guard);

        assert!(!registry.is_active("assistant"));
        assert!(registry.register("assistant").is_some());
    }

    #[test]
    fn names_are_independent() {
        let registry = SingletonRegistry::new();

        let _a = registry.register("assistant").unwrap();
        let _b = registry.register("tour").unwrap();

        assert!(registry.is_active("assistant"));
        assert!(registry.is_active("tour"));
    }

    #[test]
    fn clones_share_state() {
        let registry = SingletonRegistry::new();
        let handle = registry.clone();

        let _guard = registry.register("assistant").unwrap();

        assert!(handle.register("assistant").is_none());
    }
}

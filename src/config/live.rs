//! Live backend settings shared between the proxies and the config watcher.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::BackendConfig;

/// Cheaply cloneable handle to the current backend settings.
///
/// Readers take a snapshot per request; the watcher swaps in a new value
/// atomically without blocking them.
#[derive(Debug, Clone)]
pub struct BackendHandle {
    inner: Arc<ArcSwap<BackendConfig>>,
}

impl BackendHandle {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Snapshot of the settings in effect right now.
    pub fn current(&self) -> Arc<BackendConfig> {
        self.inner.load_full()
    }

    /// Replace the settings. Returns true when the value actually changed.
    pub fn replace(&self, config: BackendConfig) -> bool {
        let changed = **self.inner.load() != config;
        self.inner.store(Arc::new(config));
        changed
    }
}

//! Configuration file watcher for hot reload.
//!
//! Only the backend section is live, and within it only the base URL and
//! the total timeout. Routes, the listener and the connect timeout are fixed
//! at startup; changed routes or connect timeout are logged and ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::live::BackendHandle;
use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    startup: GatewayConfig,
    backend: BackendHandle,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher publishing into `backend`.
    pub fn new(path: &Path, startup: GatewayConfig, backend: BackendHandle) -> Self {
        Self {
            path: path.to_path_buf(),
            startup,
            backend,
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        self.reload();
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }

    /// Changed settings that only take effect on restart.
    fn restart_required(&self, new_config: &GatewayConfig) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if new_config.routes != self.startup.routes {
            fields.push("routes");
        }
        if new_config.backend.connect_timeout_secs != self.startup.backend.connect_timeout_secs {
            fields.push("backend.connect_timeout_secs");
        }
        fields
    }

    fn reload(&self) {
        match load_config(&self.path) {
            Ok(new_config) => {
                for field in self.restart_required(&new_config) {
                    tracing::warn!(field, "Change requires a restart; ignoring it");
                }
                let base_url = new_config.backend.base_url.clone();
                if self.backend.replace(new_config.backend) {
                    tracing::info!(base_url = %base_url, "Backend settings reloaded");
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to reload config: {}. Keeping current configuration.",
                    e
                );
            }
        }
    }
}

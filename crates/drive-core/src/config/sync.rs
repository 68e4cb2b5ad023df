//! Folder synchronizer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the folder-navigation synchronizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Upper bound on a single folder lookup before falling back to root.
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_ms: u64,
    /// Capacity of the navigator command channel.
    #[serde(default = "default_command_buffer")]
    pub command_buffer_size: usize,
}

impl SyncConfig {
    /// Lookup timeout as a [`Duration`].
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout(),
            command_buffer_size: default_command_buffer(),
        }
    }
}

fn default_lookup_timeout() -> u64 {
    10_000
}

fn default_command_buffer() -> usize {
    64
}

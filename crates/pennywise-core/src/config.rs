// ── Runtime sync configuration ──
//
// Tuning for the sync controller. Built by the caller (the CLI maps its
// profile onto it); core never reads configuration files.

use std::time::Duration;

/// Default quiet period before a batch of changes is written back.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Configuration for [`SyncController`](crate::SyncController).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet period after the last collection change before persisting.
    pub debounce: Duration,
    /// Text stored in `AppState::error` when a reload fails.
    pub load_error_message: String,
    /// Text stored in `AppState::error` when a persist fails.
    pub save_error_message: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            load_error_message: "Failed to load your data. Please try again.".into(),
            save_error_message: "Failed to save your data. Please try again.".into(),
        }
    }
}

impl SyncConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

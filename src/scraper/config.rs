use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the headless-browser render path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Use the browser fallback when the static fetch yields nothing (default: true)
    pub enabled: bool,

    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Browser launch timeout in seconds (default: 10)
    pub launch_timeout_secs: u64,

    /// Navigation timeout in seconds (default: 20)
    pub navigation_timeout_secs: u64,

    /// Wait time after load for dynamic content in milliseconds (default: 2000)
    pub settle_ms: u64,

    /// Maximum concurrent browser contexts (default: 4)
    pub max_concurrency: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            headless: true,
            launch_timeout_secs: 10,
            navigation_timeout_secs: 20,
            settle_ms: 2000,
            max_concurrency: 4,
        }
    }
}

impl RenderConfig {
    /// Get the browser launch timeout as a Duration
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    /// Get the navigation timeout as a Duration
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Get the settle period as a Duration
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

pub mod http_fetcher;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::Result;
use crate::domain::FetchedPage;

pub use http_fetcher::HttpFetcher;

/// Configuration for the static (no JavaScript) fetch path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds (default: 15)
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fast-path page fetch.
///
/// Any network error, timeout or non-2xx status is reported as
/// [`NewsbriefError::Fetch`](crate::app::NewsbriefError::Fetch).
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

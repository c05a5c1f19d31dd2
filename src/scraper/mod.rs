//! Article body extraction.
//!
//! # Architecture
//!
//! ```text
//! URL → static fetch → locate → clean ─┬─→ ArticleBody
//!        (on any failure)              │
//!      → browser render → locate → clean ┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use newsbrief::scraper::{ChromeRenderer, Extractor, RenderConfig};
//!
//! let renderer = Arc::new(ChromeRenderer::new(RenderConfig::default(), headers));
//! let extractor = Extractor::new(fetcher, renderer.clone(), Normalizer::new());
//!
//! let body = extractor.extract("https://example.com/article").await?;
//! renderer.shutdown().await;
//! ```

mod chrome;
mod config;
mod extractor;
pub mod locator;

pub use chrome::ChromeRenderer;
pub use config::RenderConfig;
pub use extractor::Extractor;

use crate::app::{NewsbriefError, Result};
use crate::domain::FetchedPage;
use async_trait::async_trait;

/// Slow-path page fetch that executes JavaScript before returning HTML.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render a page and return its final HTML.
    ///
    /// Timeouts and driver failures are reported as
    /// [`NewsbriefError::Render`]; implementations never panic past the caller.
    async fn render(&self, url: &str) -> Result<FetchedPage>;

    /// Release any process or connection held by the renderer. Safe to call
    /// more than once.
    async fn shutdown(&self) {}
}

/// Renderer used when browser rendering is turned off in configuration
#[derive(Debug, Default)]
pub struct DisabledRenderer;

#[async_trait]
impl Renderer for DisabledRenderer {
    async fn render(&self, _url: &str) -> Result<FetchedPage> {
        Err(NewsbriefError::Render(
            "browser rendering is disabled".to_string(),
        ))
    }
}

use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::headlines::NewsApiClient;
use crate::normalizer::Normalizer;
use crate::scraper::{ChromeRenderer, DisabledRenderer, Extractor, Renderer};
use crate::summarizer::{HuggingFaceBackend, Summarizer};

/// Wires the pipeline stages together from configuration.
///
/// Clients that need an API key are built on demand so that commands which
/// don't use them work without the key.
pub struct AppContext {
    pub config: Config,
    pub extractor: Extractor,
    renderer: Arc<dyn Renderer>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.fetch, &config.headers)?);
        let renderer: Arc<dyn Renderer> = if config.render.enabled {
            Arc::new(ChromeRenderer::new(
                config.render.clone(),
                config.headers.clone(),
            ))
        } else {
            Arc::new(DisabledRenderer)
        };

        Ok(Self::with_parts(config, fetcher, renderer))
    }

    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let extractor = Extractor::new(fetcher, renderer.clone(), Normalizer::new());
        Self {
            config,
            extractor,
            renderer,
        }
    }

    pub fn summarizer(&self) -> Result<Summarizer> {
        let backend = HuggingFaceBackend::new(&self.config.summarizer)?;
        Ok(Summarizer::new(Arc::new(backend), &self.config.summarizer))
    }

    pub fn headlines(&self) -> Result<NewsApiClient> {
        NewsApiClient::new(&self.config.headlines)
    }

    /// Release the browser if one was launched.
    pub async fn shutdown(&self) {
        self.renderer.shutdown().await;
    }
}

use std::sync::Arc;

use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::app::{NewsbriefError, Result};
use crate::domain::{ArticleBody, ContentSource, FetchedPage};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::scraper::locator;
use crate::scraper::Renderer;

/// Extraction progress for a single URL.
enum Stage {
    FetchStatic,
    LocateStatic(FetchedPage),
    FetchRendered { static_failure: String },
    LocateRendered(FetchedPage),
}

/// Fetches a page and returns its cleaned article body, falling back to a
/// browser render when the static page is unreachable or unusable.
pub struct Extractor {
    fetcher: Arc<dyn Fetcher>,
    renderer: Arc<dyn Renderer>,
    normalizer: Normalizer,
}

impl Extractor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        renderer: Arc<dyn Renderer>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            normalizer,
        }
    }

    /// Extract the readable body of the article at `url`.
    ///
    /// Static fetch and location failures are absorbed by trying the renderer;
    /// only a failed render or unusable rendered HTML is returned as
    /// [`NewsbriefError::Extraction`].
    #[instrument(level = "info", skip(self))]
    pub async fn extract(&self, url: &str) -> Result<ArticleBody> {
        let url = validate_url(url)?;
        let mut stage = Stage::FetchStatic;

        loop {
            stage = match stage {
                Stage::FetchStatic => match self.fetcher.fetch(&url).await {
                    Ok(page) => Stage::LocateStatic(page),
                    Err(e) => {
                        warn!(error = %e, "Static fetch failed, falling back to renderer");
                        Stage::FetchRendered {
                            static_failure: e.to_string(),
                        }
                    }
                },
                Stage::LocateStatic(page) => match self.body_from(&page, ContentSource::Static) {
                    Ok(body) => return Ok(body),
                    Err(reason) => {
                        warn!(%reason, "Static page unusable, falling back to renderer");
                        Stage::FetchRendered {
                            static_failure: reason,
                        }
                    }
                },
                Stage::FetchRendered { static_failure } => match self.renderer.render(&url).await {
                    Ok(page) => Stage::LocateRendered(page),
                    Err(e) => {
                        return Err(NewsbriefError::Extraction(format!(
                            "all sources failed (static: {}; rendered: {})",
                            static_failure, e
                        )));
                    }
                },
                Stage::LocateRendered(page) => {
                    return self
                        .body_from(&page, ContentSource::Rendered)
                        .map_err(|reason| {
                            NewsbriefError::Extraction(format!(
                                "rendered HTML had no usable content: {}",
                                reason
                            ))
                        });
                }
            };
        }
    }

    /// Locate, collect and clean the body paragraphs of one fetched page.
    fn body_from(
        &self,
        page: &FetchedPage,
        source: ContentSource,
    ) -> std::result::Result<ArticleBody, String> {
        let document = Html::parse_document(&page.html);

        let located = locator::locate(&document).ok_or("article body not found")?;
        debug!(strategy = located.strategy, %source, "Located article body");

        let paragraphs = located.paragraph_texts();
        if paragraphs.is_empty() {
            return Err(format!(
                "no paragraph content inside {} match",
                located.strategy
            ));
        }

        let text = self.normalizer.clean_article(&paragraphs.join("\n\n"));
        let paragraph_count = Normalizer::paragraph_count(&text);
        if paragraph_count == 0 {
            return Err("no paragraphs left after cleanup".to_string());
        }

        info!(
            %source,
            strategy = located.strategy,
            paragraphs = paragraph_count,
            chars = text.chars().count(),
            "Extracted article body"
        );

        Ok(ArticleBody {
            url: page.url.clone(),
            text,
            paragraph_count,
            source,
        })
    }
}

/// Require an absolute http(s) URL.
fn validate_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(NewsbriefError::InvalidUrl("URL is required".to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| NewsbriefError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => Err(NewsbriefError::InvalidUrl(format!(
            "unsupported scheme {:?} in {}",
            other, url
        ))),
    }
}

//! Top-headline listing from NewsAPI.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use crate::app::{NewsbriefError, Result};
use crate::domain::Headline;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Headline API configuration, the `[headlines]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeadlinesConfig {
    pub base_url: String,

    /// API key; `NEWS_API_KEY` takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default two-letter country code (default: "us")
    pub country: String,

    /// Default number of headlines (default: 5)
    pub page_size: u32,

    pub timeout_secs: u64,

    /// NewsAPI rejects requests without a user agent
    pub user_agent: String,
}

impl Default for HeadlinesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            country: "us".to_string(),
            page_size: 5,
            timeout_secs: 15,
            user_agent: concat!("newsbrief/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TopHeadlinesResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    title: Option<String>,
    author: Option<String>,
    source: Option<ApiSource>,
    published_at: Option<DateTime<Utc>>,
    description: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct ApiSource {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

impl From<ApiArticle> for Headline {
    fn from(article: ApiArticle) -> Self {
        Headline {
            title: article.title,
            author: article.author,
            source: article.source.and_then(|s| s.name),
            published_at: article.published_at,
            description: article.description,
            url: article.url,
        }
    }
}

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(config: &HeadlinesConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(NewsbriefError::MissingApiKey("NEWS_API_KEY"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch the current top headlines for `country`.
    ///
    /// A non-2xx status or an unparseable body is an error; no partial list
    /// is returned.
    #[instrument(level = "info", skip(self))]
    pub async fn top_headlines(&self, country: &str, page_size: u32) -> Result<Vec<Headline>> {
        let page_size = page_size.to_string();
        let url = Url::parse_with_params(
            &format!("{}/top-headlines", self.base_url),
            &[("country", country), ("pageSize", page_size.as_str())],
        )
        .map_err(|e| NewsbriefError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Headline response received");

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(NewsbriefError::HeadlineApi {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TopHeadlinesResponse = serde_json::from_str(&body)
            .map_err(|e| NewsbriefError::MalformedResponse(format!("top headlines: {}", e)))?;

        let headlines: Vec<Headline> = parsed.articles.into_iter().map(Headline::from).collect();
        info!(count = headlines.len(), "Fetched top headlines");
        Ok(headlines)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::{NewsbriefError, Result};
use crate::summarizer::SummarizerConfig;

/// Body of one summarization call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRequest {
    pub inputs: String,
    pub parameters: SummaryParameters,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SummaryParameters {
    pub min_length: usize,
    pub max_length: usize,
    pub length_penalty: f64,
    pub early_stopping: bool,
    pub no_repeat_ngram_size: usize,
}

/// Result of a single backend call, classified for the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Ok(String),
    /// Worth retrying: rate limits, server errors, network failures
    TransientError(String),
    /// Retrying cannot help
    PermanentError(String),
}

/// A text-summarization model endpoint.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> SummaryOutcome;
}

/// Hosted inference API returning `[{"summary_text": "..."}]`.
pub struct HuggingFaceBackend {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HuggingFaceBackend {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(NewsbriefError::MissingApiKey("HUGGINGFACE_API_KEY"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl SummaryBackend for HuggingFaceBackend {
    async fn summarize(&self, request: &SummaryRequest) -> SummaryOutcome {
        let body = match serde_json::to_string(request) {
            Ok(body) => body,
            Err(e) => return SummaryOutcome::PermanentError(format!("Failed to encode request: {}", e)),
        };

        debug!(
            endpoint = %self.endpoint,
            max_length = request.parameters.max_length,
            min_length = request.parameters.min_length,
            "Sending summarization request"
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SummaryOutcome::TransientError(format!("Request failed: {}", e)),
        };

        let status = response.status();
        match response.text().await {
            Ok(text) => classify(status, &text),
            Err(e) => SummaryOutcome::TransientError(format!("Failed to read response: {}", e)),
        }
    }
}

#[derive(Deserialize)]
struct SummaryItem {
    #[serde(default)]
    summary_text: String,
}

/// Map a backend response onto an outcome.
///
/// 429 and 5xx are transient, any other non-2xx is permanent. A 2xx whose
/// body is not a non-empty summary list is treated as transient.
pub fn classify(status: StatusCode, body: &str) -> SummaryOutcome {
    if status.is_success() {
        return match serde_json::from_str::<Vec<SummaryItem>>(body) {
            Ok(items) => match items.into_iter().next() {
                Some(item) if !item.summary_text.trim().is_empty() => {
                    SummaryOutcome::Ok(item.summary_text.trim().to_string())
                }
                _ => SummaryOutcome::TransientError("response contained no summary".to_string()),
            },
            Err(e) => SummaryOutcome::TransientError(format!("malformed summary response: {}", e)),
        };
    }

    let excerpt: String = body.chars().take(200).collect();
    let detail = format!("HTTP {}: {}", status, excerpt.trim());

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        SummaryOutcome::TransientError(detail)
    } else {
        SummaryOutcome::PermanentError(detail)
    }
}

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::app::{NewsbriefError, Result};
use crate::normalizer::Normalizer;
use crate::summarizer::backend::{SummaryBackend, SummaryOutcome, SummaryParameters, SummaryRequest};
use crate::summarizer::budget::BudgetConfig;
use crate::summarizer::ModelParameters;

/// Retry schedule for transient backend failures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first (default: 3)
    pub max_attempts: usize,

    /// Delay after the first failure; doubles each attempt (default: 1000)
    pub base_delay_ms: u64,

    /// Upper bound of the random delay added to each backoff (default: 250)
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_jitter_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Deterministic part of the wait after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        Duration::from_millis(self.base_delay_ms.saturating_mul(1 << exponent))
    }

    /// Backoff plus jitter in `0..=max_jitter_ms`.
    pub fn delay(&self, attempt: usize) -> Duration {
        let jitter = rand::rng().random_range(0..=self.max_jitter_ms);
        self.backoff(attempt) + Duration::from_millis(jitter)
    }
}

/// Progress of one call through the retry loop.
#[derive(Debug, Clone, Default)]
pub struct RetryState {
    pub attempt: usize,
    pub max_attempts: usize,
    pub last_error: Option<String>,
}

impl RetryState {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
            last_error: None,
        }
    }

    pub fn exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// One logical summarization call with input cleanup and retries.
pub struct SummarizationClient {
    backend: Arc<dyn SummaryBackend>,
    normalizer: Normalizer,
    budget: BudgetConfig,
    model: ModelParameters,
    retry: RetryPolicy,
}

impl SummarizationClient {
    pub fn new(
        backend: Arc<dyn SummaryBackend>,
        budget: BudgetConfig,
        model: ModelParameters,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            normalizer: Normalizer::new(),
            budget,
            model,
            retry,
        }
    }

    /// Summarize `text` into at most `max_tokens` tokens.
    ///
    /// Transient failures are retried with exponential backoff until
    /// `max_attempts` is reached; a permanent failure returns at once. Text
    /// that is empty once flattened is rejected without calling the backend.
    #[instrument(level = "debug", skip(self, text), fields(chars = text.chars().count()))]
    pub async fn summarize(
        &self,
        text: &str,
        max_tokens: usize,
        min_length_fraction: f64,
    ) -> Result<String> {
        let request = self.request(text, max_tokens, min_length_fraction);
        if request.inputs.is_empty() {
            return Err(NewsbriefError::EmptyInput);
        }

        let mut state = RetryState::new(self.retry.max_attempts);

        while !state.exhausted() {
            state.attempt += 1;

            match self.backend.summarize(&request).await {
                SummaryOutcome::Ok(summary) => {
                    info!(
                        attempt = state.attempt,
                        approx_tokens = self.budget.estimate_tokens(summary.chars().count()),
                        "Summarization call succeeded"
                    );
                    return Ok(summary);
                }
                SummaryOutcome::PermanentError(detail) => {
                    error!(attempt = state.attempt, %detail, "Summarization call rejected");
                    return Err(NewsbriefError::PermanentBackend(detail));
                }
                SummaryOutcome::TransientError(detail) => {
                    state.last_error = Some(detail);
                    if state.exhausted() {
                        break;
                    }

                    let delay = self.retry.delay(state.attempt);
                    warn!(
                        attempt = state.attempt,
                        max_attempts = state.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = state.last_error.as_deref().unwrap_or_default(),
                        "Summarization call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let last_error = state.last_error.unwrap_or_default();
        error!(attempts = state.attempt, %last_error, "Summarization retries exhausted");
        Err(NewsbriefError::TransientBackend {
            attempts: state.attempt,
            last_error,
        })
    }

    fn request(&self, text: &str, max_tokens: usize, min_length_fraction: f64) -> SummaryRequest {
        SummaryRequest {
            inputs: self.normalizer.flatten(text),
            parameters: SummaryParameters {
                min_length: self.budget.min_length(max_tokens, min_length_fraction),
                max_length: max_tokens,
                length_penalty: self.model.length_penalty,
                early_stopping: self.model.early_stopping,
                no_repeat_ngram_size: self.model.no_repeat_ngram_size,
            },
        }
    }
}

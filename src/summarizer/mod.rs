//! Hierarchical summarization.
//!
//! Short texts are returned unchanged, texts that fit one call are summarized
//! directly, and anything longer is split into chunks whose summaries are
//! joined and summarized once more:
//!
//! ```text
//! text → clean → budget ─┬─ verbatim
//!                        ├─ single call
//!                        └─ chunk₁..chunkₙ → summaries → join → final call
//! ```

pub mod backend;
pub mod budget;
pub mod chunker;
mod client;
mod pipeline;

pub use backend::{HuggingFaceBackend, SummaryBackend, SummaryOutcome, SummaryRequest};
pub use budget::{BudgetConfig, ChunkPlan, Strategy};
pub use client::{RetryPolicy, RetryState, SummarizationClient};
pub use pipeline::{ChunkSummary, Summarizer};

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Summarization configuration, the `[summarizer]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Inference endpoint URL
    pub endpoint: String,

    /// API key; `HUGGINGFACE_API_KEY` takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds (default: 60)
    pub timeout_secs: u64,

    pub length_penalty: f64,
    pub early_stopping: bool,
    pub no_repeat_ngram_size: usize,

    /// Chunk summaries in flight at once (default: 1)
    pub chunk_concurrency: usize,

    pub budget: BudgetConfig,
    pub retry: RetryPolicy,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 60,
            length_penalty: 0.8,
            early_stopping: false,
            no_repeat_ngram_size: 3,
            chunk_concurrency: 1,
            budget: BudgetConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl SummarizerConfig {
    pub fn model(&self) -> ModelParameters {
        ModelParameters {
            length_penalty: self.length_penalty,
            early_stopping: self.early_stopping,
            no_repeat_ngram_size: self.no_repeat_ngram_size,
        }
    }
}

/// Generation parameters sent with every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    pub length_penalty: f64,
    pub early_stopping: bool,
    pub no_repeat_ngram_size: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        SummarizerConfig::default().model()
    }
}

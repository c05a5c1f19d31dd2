use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::app::Result;
use crate::normalizer::Normalizer;
use crate::summarizer::backend::SummaryBackend;
use crate::summarizer::budget::{BudgetConfig, ChunkPlan, Strategy};
use crate::summarizer::chunker;
use crate::summarizer::client::SummarizationClient;
use crate::summarizer::SummarizerConfig;

/// Summary of one chunk, kept in source order. `index` starts at 1.
#[derive(Debug, Clone)]
pub struct ChunkSummary {
    pub index: usize,
    pub source_chunk: String,
    pub summary_text: String,
}

/// Picks a summarization strategy for each text and runs it.
pub struct Summarizer {
    client: SummarizationClient,
    budget: BudgetConfig,
    normalizer: Normalizer,
    chunk_concurrency: usize,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn SummaryBackend>, config: &SummarizerConfig) -> Self {
        Self {
            client: SummarizationClient::new(
                backend,
                config.budget.clone(),
                config.model(),
                config.retry.clone(),
            ),
            budget: config.budget.clone(),
            normalizer: Normalizer::new(),
            chunk_concurrency: config.chunk_concurrency.max(1),
        }
    }

    /// Summarize an article body.
    ///
    /// Empty input yields an empty summary without calling the backend. Any
    /// failed call aborts the whole summary; partial results are discarded.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let cleaned = self.normalizer.prepare_for_summary(text);
        let char_count = cleaned.chars().count();

        match self.budget.strategy(char_count) {
            Strategy::Verbatim => {
                info!(
                    approx_tokens = self.budget.estimate_tokens(char_count),
                    "Text too short to summarize, returning as is"
                );
                Ok(cleaned)
            }
            Strategy::SinglePass { max_tokens } => {
                info!(max_tokens, "Text fits in a single chunk, skipping chunking");
                self.client
                    .summarize(&cleaned, max_tokens, self.budget.final_min_length_fraction)
                    .await
            }
            Strategy::MapReduce(plan) => self.map_reduce(&cleaned, plan).await,
        }
    }

    async fn map_reduce(&self, text: &str, plan: ChunkPlan) -> Result<String> {
        let summaries = self.summarize_chunks(text, plan).await?;

        let combined = summaries
            .iter()
            .map(|s| s.summary_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        info!(
            combined_tokens = self.budget.estimate_tokens(combined.chars().count()),
            max_tokens = self.budget.final_token_budget,
            "Reducing chunk summaries"
        );

        self.client
            .summarize(
                &combined,
                self.budget.final_token_budget,
                self.budget.final_min_length_fraction,
            )
            .await
    }

    /// Summarize every chunk of `text`, at most `chunk_concurrency` at a time.
    /// Results come back in source order.
    async fn summarize_chunks(&self, text: &str, plan: ChunkPlan) -> Result<Vec<ChunkSummary>> {
        let chunks = chunker::split(text, plan.chars_per_chunk);
        info!(
            chunks = chunks.len(),
            chars_per_chunk = plan.chars_per_chunk,
            tokens_per_chunk = plan.token_budget_per_chunk,
            "Summarizing in chunks"
        );

        stream::iter(chunks.into_iter().enumerate())
            .map(|(i, chunk)| self.summarize_chunk(i + 1, chunk, plan.token_budget_per_chunk))
            .buffered(self.chunk_concurrency)
            .try_collect()
            .await
    }

    async fn summarize_chunk(
        &self,
        index: usize,
        chunk: &str,
        max_tokens: usize,
    ) -> Result<ChunkSummary> {
        debug!(
            chunk = index,
            chars = chunk.chars().count(),
            max_tokens,
            "Summarizing chunk"
        );

        let summary_text = self
            .client
            .summarize(chunk, max_tokens, self.budget.chunk_min_length_fraction)
            .await?;

        Ok(ChunkSummary {
            index,
            source_chunk: chunk.to_string(),
            summary_text,
        })
    }
}

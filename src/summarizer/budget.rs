//! Token estimation and length budgets.
//!
//! Tokens are estimated from character counts with a fixed divisor; there is
//! no tokenizer. `max_tokens_per_chunk` sits below the backend's real input
//! limit to absorb the estimation error.

use serde::{Deserialize, Serialize};

/// Length and chunking constants for summarization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BudgetConfig {
    /// Characters per estimated token (default: 4)
    pub chars_per_token: usize,

    /// Inputs estimated below this are returned verbatim (default: 50)
    pub min_summarize_tokens: usize,

    /// Largest input, in estimated tokens, sent in one call (default: 900)
    pub max_tokens_per_chunk: usize,

    /// Max length of the final reduction call (default: 300)
    pub final_token_budget: usize,

    /// Single-pass budget as a fraction of the input's tokens (default: 0.25)
    pub quick_budget_fraction: f64,

    /// Lower clamp for the single-pass budget (default: 50)
    pub min_quick_budget: usize,

    /// Upper clamp for the single-pass budget (default: 200)
    pub max_quick_budget: usize,

    /// Min length as a fraction of max length for chunk calls (default: 0.8)
    pub chunk_min_length_fraction: f64,

    /// Min length as a fraction of max length for final calls (default: 0.8)
    pub final_min_length_fraction: f64,

    /// Absolute floor for any call's min length (default: 50)
    pub min_length_floor: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            chars_per_token: 4,
            min_summarize_tokens: 50,
            max_tokens_per_chunk: 900,
            final_token_budget: 300,
            quick_budget_fraction: 0.25,
            min_quick_budget: 50,
            max_quick_budget: 200,
            chunk_min_length_fraction: 0.8,
            final_min_length_fraction: 0.8,
            min_length_floor: 50,
        }
    }
}

/// How a text of a given length is split for summarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunk_count: usize,
    pub chars_per_chunk: usize,
    pub token_budget_per_chunk: usize,
}

/// What the summarizer does with a text of a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Too short to be worth summarizing; return it unchanged
    Verbatim,
    /// One backend call
    SinglePass { max_tokens: usize },
    /// One call per chunk, then one reduction call
    MapReduce(ChunkPlan),
}

impl BudgetConfig {
    pub fn estimate_tokens(&self, char_count: usize) -> usize {
        char_count / self.chars_per_token.max(1)
    }

    /// Chunk layout for a text of `char_count` characters.
    pub fn plan(&self, char_count: usize) -> ChunkPlan {
        let max_tokens = self.max_tokens_per_chunk.max(1);
        let chunk_count = self.estimate_tokens(char_count).div_ceil(max_tokens).max(1);

        ChunkPlan {
            chunk_count,
            chars_per_chunk: char_count.div_ceil(chunk_count).max(1),
            token_budget_per_chunk: (max_tokens / chunk_count).max(1),
        }
    }

    pub fn strategy(&self, char_count: usize) -> Strategy {
        let tokens = self.estimate_tokens(char_count);
        if tokens < self.min_summarize_tokens {
            return Strategy::Verbatim;
        }

        let plan = self.plan(char_count);
        if plan.chunk_count == 1 {
            Strategy::SinglePass {
                max_tokens: self.quick_budget(tokens),
            }
        } else {
            Strategy::MapReduce(plan)
        }
    }

    /// Single-pass budget, scaled to the input and clamped.
    pub fn quick_budget(&self, tokens: usize) -> usize {
        let scaled = (tokens as f64 * self.quick_budget_fraction) as usize;
        let upper = self.max_quick_budget.max(self.min_quick_budget);
        scaled.clamp(self.min_quick_budget, upper)
    }

    /// Minimum output length for a call with the given max length. Never
    /// exceeds `max_tokens`.
    pub fn min_length(&self, max_tokens: usize, fraction: f64) -> usize {
        let scaled = (max_tokens as f64 * fraction) as usize;
        scaled.max(self.min_length_floor).min(max_tokens)
    }
}

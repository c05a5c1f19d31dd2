//! # newsbrief
//!
//! Fetch news articles, extract their readable body and summarize them.
//!
//! ## Architecture
//!
//! newsbrief is two sequential pipelines:
//!
//! ```text
//! URL → Fetcher ─┬─→ Locator → Normalizer → ArticleBody
//!     → Renderer ┘
//!
//! ArticleBody → Budget → Chunker → SummarizationClient → summary
//! ```
//!
//! - [`fetcher`]: Static HTTP fetch with a browser-like header profile
//! - [`scraper`]: Content location and the headless-browser fallback
//! - [`normalizer`]: Text cleanup shared by both pipelines
//! - [`summarizer`]: Token budgets, chunking and the retrying backend client
//!
//! ## Quick Start
//!
//! ```bash
//! # List top headlines
//! newsbrief headlines --country us --page-size 5
//!
//! # Print the cleaned body of an article
//! newsbrief body https://example.com/story
//!
//! # Summarize one article, or every top headline
//! newsbrief summarize https://example.com/story
//! newsbrief digest
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`domain`]: Core domain models (Headline, ArticleBody)
//! - [`headlines`]: NewsAPI top-headlines client

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// fetcher, renderer, extractor, summarizer and headline client.
pub mod app;

/// Command-line interface using clap.
///
/// - `headlines` - List top headlines
/// - `body <url>` - Print an article's cleaned body
/// - `summarize <url>` - Summarize one article
/// - `digest` - Summarize every top headline
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/newsbrief/config.toml`; API keys may come from the
/// environment.
pub mod config;

/// Core domain models.
///
/// - [`Headline`](domain::Headline): Article metadata from the headline API
/// - [`FetchedPage`](domain::FetchedPage): Raw HTML from either fetch path
/// - [`ArticleBody`](domain::ArticleBody): Cleaned article text
pub mod domain;

/// Static page fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Top-headline listing.
pub mod headlines;

/// Text cleanup: entity decoding, boilerplate removal, whitespace.
pub mod normalizer;

/// Article body extraction.
///
/// - [`Extractor`](scraper::Extractor): Static fetch with render fallback
/// - [`ChromeRenderer`](scraper::ChromeRenderer): Headless Chrome via chromiumoxide
/// - [`locator`](scraper::locator): Prioritized content-location strategies
pub mod scraper;

/// Hierarchical summarization.
///
/// - [`Summarizer`](summarizer::Summarizer): Verbatim, single-pass or map-reduce
/// - [`SummarizationClient`](summarizer::SummarizationClient): Retrying backend calls
/// - [`BudgetConfig`](summarizer::BudgetConfig): Token estimates and length budgets
pub mod summarizer;

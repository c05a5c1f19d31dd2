//! Configuration management for newsbrief.
//!
//! Configuration is read from `~/.config/newsbrief/config.toml` at startup,
//! or from the path given with `--config`. If the file doesn't exist, a
//! default configuration with comments is created. API keys may also come
//! from the environment, which takes precedence over the file.

pub mod headers;

pub use headers::HeaderProfile;

use crate::fetcher::FetchConfig;
use crate::headlines::HeadlinesConfig;
use crate::scraper::RenderConfig;
use crate::summarizer::SummarizerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const NEWS_API_KEY_VAR: &str = "NEWS_API_KEY";
pub const HUGGINGFACE_API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub headers: HeaderProfile,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub summarizer: SummarizerConfig,
    pub headlines: HeadlinesConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// If the file doesn't exist, creates a default one with comments.
    /// If the file exists but is invalid, returns an error.
    /// Missing fields use default values. Environment keys are applied last.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        let mut config = Self::load_file(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/newsbrief/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsbrief").join("config.toml"))
    }

    /// Override API keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override API keys from `lookup`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(NEWS_API_KEY_VAR) {
            self.headlines.api_key = Some(key);
        }
        if let Some(key) = non_empty(HUGGINGFACE_API_KEY_VAR) {
            self.summarizer.api_key = Some(key);
        }
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# newsbrief configuration
#
# API keys can be set here or through the NEWS_API_KEY and
# HUGGINGFACE_API_KEY environment variables, which take precedence.

[headers]
# Browser identity used by both the static fetch and the browser render
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36"
locale = "en-US"
accept_language = "en-US,en;q=0.9"

[headers.extra]
Referer = "https://www.google.com/"
Upgrade-Insecure-Requests = "1"
DNT = "1"

[fetch]
# Static page request timeout in seconds
timeout_secs = 15

[render]
# Fall back to a headless browser when the static page has no usable body
enabled = true

# Run browser in headless mode (no visible window)
headless = true

# Browser launch and page navigation timeouts in seconds
launch_timeout_secs = 10
navigation_timeout_secs = 20

# Wait time after page load for dynamic content (milliseconds)
settle_ms = 2000

# Maximum concurrent browser pages
max_concurrency = 4

[summarizer]
endpoint = "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
# api_key = "hf_..."

# Per-request timeout in seconds
timeout_secs = 60

# Generation parameters sent with every request
length_penalty = 0.8
early_stopping = false
no_repeat_ngram_size = 3

# Chunk summaries requested in parallel
chunk_concurrency = 1

[summarizer.budget]
# Token counts are estimated as characters / chars_per_token
chars_per_token = 4

# Texts shorter than this many tokens are returned unchanged
min_summarize_tokens = 50

# Largest input sent in a single request
max_tokens_per_chunk = 900

# Length of the final summary of a chunked article
final_token_budget = 300

# Length of a single-request summary: a quarter of the input, clamped
quick_budget_fraction = 0.25
min_quick_budget = 50
max_quick_budget = 200

# Minimum summary length as a fraction of the maximum, with a floor
chunk_min_length_fraction = 0.8
final_min_length_fraction = 0.8
min_length_floor = 50

[summarizer.retry]
# Attempts per request for rate limits, server errors and network failures
max_attempts = 3

# Delay after the first failure, doubled on each retry (milliseconds)
base_delay_ms = 1000

# Random extra delay added to each retry (milliseconds)
max_jitter_ms = 250

[headlines]
base_url = "https://newsapi.org/v2"
# api_key = "..."

# Defaults for the headlines and digest commands
country = "us"
page_size = 5
timeout_secs = 15
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        // The commented file and the built-in defaults agree
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[render]
enabled = false

[summarizer.budget]
max_tokens_per_chunk = 500
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert!(!config.render.enabled);
        assert_eq!(config.summarizer.budget.max_tokens_per_chunk, 500);
        // Default values
        assert_eq!(config.render.navigation_timeout_secs, 20);
        assert_eq!(config.summarizer.budget.final_token_budget, 300);
        assert_eq!(config.headlines.country, "us");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_file(&path).unwrap();

        assert_eq!(config, Config::default());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# newsbrief configuration"));
    }

    #[test]
    fn test_load_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[headlines]\ncountry = \"gb\"\napi_key = \"from-file\"\n").unwrap();

        let config = Config::load_file(&path).unwrap();

        assert_eq!(config.headlines.country, "gb");
        assert_eq!(config.headlines.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetch]\ntimeout_secs = \"soon\"\n").unwrap();

        assert!(matches!(
            Config::load_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_environment_overrides_file_keys() {
        let mut config = Config::default();
        config.headlines.api_key = Some("from-file".to_string());

        config.apply_overrides(|name| match name {
            NEWS_API_KEY_VAR => Some("from-env".to_string()),
            HUGGINGFACE_API_KEY_VAR => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.headlines.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.summarizer.api_key, None);
    }
}

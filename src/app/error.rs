use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsbriefError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Summarization failed after {attempts} attempts: {last_error}")]
    TransientBackend { attempts: usize, last_error: String },

    #[error("Summarization rejected: {0}")]
    PermanentBackend(String),

    #[error("Headline request failed: HTTP {status}: {message}")]
    HeadlineApi { status: u16, message: String },

    #[error("Nothing to summarize: input is empty after cleanup")]
    EmptyInput,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NewsbriefError {
    /// Whether the failure came from the summarization backend
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::TransientBackend { .. } | Self::PermanentBackend(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NewsbriefError>;

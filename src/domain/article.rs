use serde::Serialize;

/// Which fetch path produced the HTML an article body was located in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Plain HTTP GET, no JavaScript
    Static,
    /// Headless browser render
    Rendered,
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Rendered => f.write_str("rendered"),
        }
    }
}

/// HTML returned by one of the fetch paths.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

/// Cleaned, human-readable body text of an article.
///
/// Always holds at least one non-empty paragraph; paragraphs are separated by
/// a single blank line.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleBody {
    pub url: String,
    pub text: String,
    pub paragraph_count: usize,
    pub source: ContentSource,
}

impl ArticleBody {
    /// Approximate word count, used only for display
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_source_display() {
        assert_eq!(ContentSource::Static.to_string(), "static");
        assert_eq!(ContentSource::Rendered.to_string(), "rendered");
    }

    #[test]
    fn test_article_body_serializes_source_lowercase() {
        let body = ArticleBody {
            url: "https://example.com/a".into(),
            text: "One two three.".into(),
            paragraph_count: 1,
            source: ContentSource::Rendered,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["source"], "rendered");
        assert_eq!(body.word_count(), 3);
    }
}

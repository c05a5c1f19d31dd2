use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article metadata returned by the headline API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Headline {
    pub title: Option<String>,
    pub author: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl Headline {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(Untitled)")
    }

    pub fn display_source(&self) -> &str {
        self.source.as_deref().unwrap_or("unknown source")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Headline {
        Headline {
            title: None,
            author: None,
            source: None,
            published_at: None,
            description: None,
            url: None,
        }
    }

    #[test]
    fn test_display_title_fallback() {
        assert_eq!(empty().display_title(), "(Untitled)");

        let mut headline = empty();
        headline.title = Some("Markets rally".into());
        assert_eq!(headline.display_title(), "Markets rally");
    }

    #[test]
    fn test_display_source_fallback() {
        let mut headline = empty();
        assert_eq!(headline.display_source(), "unknown source");
        headline.source = Some("Reuters".into());
        assert_eq!(headline.display_source(), "Reuters");
    }
}

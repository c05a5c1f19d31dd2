use serde::Serialize;
use tracing::warn;

use crate::app::{AppContext, Result};
use crate::domain::{ArticleBody, ContentSource, Headline};
use crate::summarizer::Summarizer;

/// One digest line: a headline with its summary or the reason it has none.
#[derive(Debug, Serialize)]
pub struct DigestEntry {
    pub headline: Headline,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ContentSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when extraction worked but the summarization backend failed
    #[serde(skip)]
    pub backend_failure: bool,
}

#[derive(Debug, Serialize)]
struct ArticleSummary<'a> {
    url: &'a str,
    source: ContentSource,
    paragraph_count: usize,
    summary: &'a str,
}

pub async fn list_headlines(
    ctx: &AppContext,
    country: Option<String>,
    page_size: Option<u32>,
    json: bool,
) -> Result<()> {
    let headlines = fetch_headlines(ctx, country, page_size).await?;

    if json {
        return print_json(&headlines);
    }

    if headlines.is_empty() {
        println!("No headlines");
        return Ok(());
    }

    for (i, headline) in headlines.iter().enumerate() {
        println!("{}", format_headline(i + 1, headline));
    }

    Ok(())
}

pub async fn show_body(ctx: &AppContext, url: &str, json: bool) -> Result<()> {
    let body = ctx.extractor.extract(url).await?;

    if json {
        return print_json(&body);
    }

    println!("{}", body.text);
    eprintln!(
        "\n{} paragraphs, {} words ({})",
        body.paragraph_count,
        body.word_count(),
        body.source
    );
    Ok(())
}

pub async fn summarize_article(ctx: &AppContext, url: &str, json: bool) -> Result<()> {
    let summarizer = ctx.summarizer()?;
    let body = ctx.extractor.extract(url).await?;
    let summary = summarizer.summarize(&body.text).await?;

    if json {
        return print_json(&ArticleSummary {
            url: &body.url,
            source: body.source,
            paragraph_count: body.paragraph_count,
            summary: &summary,
        });
    }

    println!("{}", summary);
    Ok(())
}

/// Summarize each top headline in turn. A failure on one article is recorded
/// in its entry and the rest are still processed.
pub async fn digest(
    ctx: &AppContext,
    country: Option<String>,
    page_size: Option<u32>,
    json: bool,
) -> Result<()> {
    let summarizer = ctx.summarizer()?;
    let headlines = fetch_headlines(ctx, country, page_size).await?;

    let mut entries = Vec::with_capacity(headlines.len());
    for headline in headlines {
        let entry = digest_entry(ctx, &summarizer, headline).await;
        if !json {
            println!("{}\n", format_entry(entries.len() + 1, &entry));
        }
        entries.push(entry);
    }

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No headlines");
    } else {
        println!("{}", format_tally(&entries));
    }
    Ok(())
}

async fn fetch_headlines(
    ctx: &AppContext,
    country: Option<String>,
    page_size: Option<u32>,
) -> Result<Vec<Headline>> {
    let client = ctx.headlines()?;
    let country = country.unwrap_or_else(|| ctx.config.headlines.country.clone());
    let page_size = page_size.unwrap_or(ctx.config.headlines.page_size);
    client.top_headlines(&country, page_size).await
}

async fn digest_entry(ctx: &AppContext, summarizer: &Summarizer, headline: Headline) -> DigestEntry {
    let Some(url) = headline.url.clone() else {
        return DigestEntry {
            headline,
            source: None,
            summary: None,
            error: Some("headline has no URL".to_string()),
            backend_failure: false,
        };
    };

    match summarize_url(ctx, summarizer, &url).await {
        Ok((body, summary)) => DigestEntry {
            headline,
            source: Some(body.source),
            summary: Some(summary),
            error: None,
            backend_failure: false,
        },
        Err(e) => {
            let backend_failure = e.is_backend_failure();
            warn!(%url, error = %e, backend_failure, "Skipping article");
            DigestEntry {
                headline,
                source: None,
                summary: None,
                error: Some(e.to_string()),
                backend_failure,
            }
        }
    }
}

async fn summarize_url(
    ctx: &AppContext,
    summarizer: &Summarizer,
    url: &str,
) -> Result<(ArticleBody, String)> {
    let body = ctx.extractor.extract(url).await?;
    let summary = summarizer.summarize(&body.text).await?;
    Ok((body, summary))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_headline(number: usize, headline: &Headline) -> String {
    let date = headline
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());

    let mut out = format!(
        "{:>2}. {} {} ({})",
        number,
        date,
        headline.display_title(),
        headline.display_source()
    );
    if let Some(url) = &headline.url {
        out.push_str("\n    ");
        out.push_str(url);
    }
    out
}

fn format_entry(number: usize, entry: &DigestEntry) -> String {
    let mut out = format_headline(number, &entry.headline);
    match (&entry.summary, &entry.error) {
        (Some(summary), _) => {
            out.push_str("\n\n    ");
            out.push_str(summary);
        }
        (None, Some(error)) => {
            out.push_str("\n    ! ");
            out.push_str(error);
        }
        (None, None) => {}
    }
    out
}

fn format_tally(entries: &[DigestEntry]) -> String {
    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    let backend = entries.iter().filter(|e| e.backend_failure).count();

    let mut out = format!(
        "Digest complete: {} summarized, {} failed",
        entries.len() - failed,
        failed
    );
    if backend > 0 {
        out.push_str(&format!(" ({} in summarization)", backend));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NewsbriefError;
    use chrono::{TimeZone, Utc};

    fn headline() -> Headline {
        Headline {
            title: Some("Markets rally".to_string()),
            author: None,
            source: Some("Reuters".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
            description: None,
            url: Some("https://example.com/markets".to_string()),
        }
    }

    #[test]
    fn test_format_headline() {
        assert_eq!(
            format_headline(3, &headline()),
            " 3. 2024-05-01 Markets rally (Reuters)\n    https://example.com/markets"
        );
    }

    #[test]
    fn test_format_headline_without_metadata() {
        let bare = Headline {
            title: None,
            author: None,
            source: None,
            published_at: None,
            description: None,
            url: None,
        };
        assert_eq!(
            format_headline(1, &bare),
            " 1.            (Untitled) (unknown source)"
        );
    }

    #[test]
    fn test_format_failed_entry() {
        let entry = DigestEntry {
            headline: headline(),
            source: None,
            summary: None,
            error: Some("Extraction failed: all sources failed".to_string()),
            backend_failure: false,
        };
        assert!(format_entry(1, &entry).ends_with("\n    ! Extraction failed: all sources failed"));
    }

    #[test]
    fn test_digest_entry_json_omits_empty_fields() {
        let entry = DigestEntry {
            headline: headline(),
            source: Some(ContentSource::Rendered),
            summary: Some("Stocks rose.".to_string()),
            error: None,
            backend_failure: false,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["source"], "rendered");
        assert_eq!(value["summary"], "Stocks rose.");
        assert!(value.get("error").is_none());
        assert!(value.get("backend_failure").is_none());
    }

    #[test]
    fn test_tally_separates_summarization_failures() {
        let failed = |err: NewsbriefError| DigestEntry {
            headline: headline(),
            source: None,
            summary: None,
            backend_failure: err.is_backend_failure(),
            error: Some(err.to_string()),
        };
        let done = DigestEntry {
            headline: headline(),
            source: Some(ContentSource::Static),
            summary: Some("Stocks rose.".to_string()),
            error: None,
            backend_failure: false,
        };

        let entries = vec![
            done,
            failed(NewsbriefError::Extraction("all sources failed".to_string())),
            failed(NewsbriefError::PermanentBackend("HTTP 401".to_string())),
        ];
        assert_eq!(
            format_tally(&entries),
            "Digest complete: 1 summarized, 2 failed (1 in summarization)"
        );
        assert_eq!(
            format_tally(&entries[..2]),
            "Digest complete: 1 summarized, 1 failed"
        );
    }
}

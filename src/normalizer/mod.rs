use html_escape::decode_html_entities;

/// Lines containing any of these (case-insensitive) are dropped as page chrome.
const BOILERPLATE_KEYWORDS: &[&str] = &[
    "cookie",
    "advertisement",
    "sign up",
    "privacy policy",
    "terms of use",
    "get the app",
];

/// Shorter lines with no lowercase letters are treated as navigation labels.
const NAV_LABEL_MAX_CHARS: usize = 40;

const PARAGRAPH_BREAK: &str = "\n\n";

/// Text cleanup shared by extraction and summarization.
///
/// [`clean_article`](Normalizer::clean_article) keeps paragraph structure;
/// [`flatten`](Normalizer::flatten) produces the single-line form sent to the
/// summarization backend. Both are fixed points: applying either one to its
/// own output changes nothing.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Decode entities, drop navigation and boilerplate lines, and rejoin the
    /// survivors as paragraphs separated by exactly one blank line.
    pub fn clean_article(&self, text: &str) -> String {
        let decoded = decode_entities(text);

        decoded
            .lines()
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .filter(|line| !is_nav_label(line))
            .filter(|line| !is_boilerplate(line))
            .collect::<Vec<_>>()
            .join(PARAGRAPH_BREAK)
    }

    /// Unify typographic punctuation and collapse all whitespace, including
    /// line breaks, into single spaces.
    pub fn flatten(&self, text: &str) -> String {
        let mut unified = String::with_capacity(text.len());

        for c in text.chars() {
            match c {
                '\u{201C}' | '\u{201D}' => unified.push('"'),
                '\u{2018}' | '\u{2019}' => unified.push('\''),
                '\u{2013}' | '\u{2014}' => unified.push('-'),
                '\u{2026}' => unified.push_str("..."),
                '\u{FFFD}' => {}
                other => unified.push(other),
            }
        }

        collapse_whitespace(&unified)
    }

    /// Full cleanup applied to anything headed for the summarization backend.
    pub fn prepare_for_summary(&self, text: &str) -> String {
        self.flatten(&self.clean_article(text))
    }

    /// Number of paragraphs in text produced by [`clean_article`](Self::clean_article).
    pub fn paragraph_count(text: &str) -> usize {
        text.split(PARAGRAPH_BREAK)
            .filter(|p| !p.trim().is_empty())
            .count()
    }
}

/// Decode until nothing changes so that a second pass is a no-op.
fn decode_entities(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let decoded = decode_html_entities(&current);
        if decoded == current {
            return current;
        }
        current = decoded.into_owned();
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_nav_label(line: &str) -> bool {
    line.chars().count() < NAV_LABEL_MAX_CHARS
        && line
            .chars()
            .all(|c| c.is_uppercase() || !c.is_alphabetic())
}

fn is_boilerplate(line: &str) -> bool {
    let lower = line.to_lowercase();
    BOILERPLATE_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_ARTICLE: &str = "HOME | WORLD | SPORTS\n\
        The council voted on Tuesday to approve the new budget.\n\
        \n\n\n\
        We use cookies to improve your experience.\n\
        Officials said   the plan would take effect &amp; run through 2026.\n\
        ADVERTISEMENT\n\
        Sign Up for our newsletter today and never miss a story\n\
        \t  Residents have until March to comment.  ";

    #[test]
    fn test_clean_article_drops_navigation_and_boilerplate() {
        let cleaned = Normalizer::new().clean_article(RAW_ARTICLE);

        assert_eq!(
            cleaned,
            "The council voted on Tuesday to approve the new budget.\n\n\
             Officials said the plan would take effect & run through 2026.\n\n\
             Residents have until March to comment."
        );
    }

    #[test]
    fn test_clean_article_is_fixed_point() {
        let normalizer = Normalizer::new();
        let once = normalizer.clean_article(RAW_ARTICLE);
        let twice = normalizer.clean_article(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_article_fully_decodes_nested_entities() {
        let normalizer = Normalizer::new();
        let once = normalizer.clean_article("Prices rose &amp;lt;5% according to the report.");
        assert_eq!(once, "Prices rose <5% according to the report.");
        assert_eq!(normalizer.clean_article(&once), once);
    }

    #[test]
    fn test_clean_article_keeps_short_mixed_case_lines() {
        let cleaned = Normalizer::new().clean_article("BREAKING\nHe said no.\n2024");
        assert_eq!(cleaned, "He said no.");
    }

    #[test]
    fn test_clean_article_keeps_caseless_scripts() {
        let cleaned = Normalizer::new().clean_article("東京で新しい法案が可決された。");
        assert_eq!(cleaned, "東京で新しい法案が可決された。");
    }

    #[test]
    fn test_clean_article_empty_and_whitespace() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.clean_article(""), "");
        assert_eq!(normalizer.clean_article("  \n\t\n  "), "");
    }

    #[test]
    fn test_flatten_unifies_punctuation() {
        let flat = Normalizer::new()
            .flatten("\u{201C}Yes,\u{201D} she said \u{2014} it\u{2019}s done\u{2026}\n\nNext\u{00A0}step\u{FFFD}.");
        assert_eq!(flat, "\"Yes,\" she said - it's done... Next step.");
    }

    #[test]
    fn test_flatten_is_fixed_point() {
        let normalizer = Normalizer::new();
        let once = normalizer.flatten("A\r\nB \u{2013}\tC\u{2026}");
        assert_eq!(normalizer.flatten(&once), once);
    }

    #[test]
    fn test_prepare_for_summary_is_fixed_point() {
        let normalizer = Normalizer::new();
        let once = normalizer.prepare_for_summary(RAW_ARTICLE);
        assert!(!once.contains('\n'));
        assert_eq!(normalizer.prepare_for_summary(&once), once);
    }

    #[test]
    fn test_paragraph_count() {
        assert_eq!(Normalizer::paragraph_count(""), 0);
        assert_eq!(Normalizer::paragraph_count("One."), 1);
        assert_eq!(Normalizer::paragraph_count("One.\n\nTwo.\n\nThree."), 3);
    }
}

//! Locates the element holding an article's body text.
//!
//! Strategies run in priority order and the first match wins. Each one is a
//! pure function over the parsed document, so the order lives in
//! [`STRATEGIES`] rather than in control flow.

use scraper::{ElementRef, Html};

/// A strategy returns the element it considers the article body, if any.
pub type Strategy = for<'a> fn(&'a Html) -> Option<ElementRef<'a>>;

/// Ordered locator strategies; earlier entries take precedence.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("article-element", semantic_article),
    ("article-body", article_body_container),
    ("class-pattern", class_pattern),
    ("paragraph-density", densest_div),
];

/// Class/id fragments tried by [`class_pattern`], with the tag each applies to.
const CLASS_PATTERNS: &[(&str, &str)] = &[
    ("div", "story-body"),
    ("div", "entry-content"),
    ("div", "post-content"),
    ("section", "article"),
    ("div", "article"),
];

const ARTICLE_BODY_TAGS: &[&str] = &["div", "section", "main"];

/// Pattern and density matches need at least this many paragraphs, which keeps
/// navigation widgets sharing a class fragment from winning.
const MIN_PARAGRAPHS: usize = 2;

/// A located body element and the strategy that found it.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub element: ElementRef<'a>,
    pub strategy: &'static str,
}

impl<'a> Located<'a> {
    /// Non-empty paragraph texts inside the located element, in document order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        paragraphs(self.element)
            .map(paragraph_text)
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// Run the strategies in order and return the first match.
pub fn locate(document: &Html) -> Option<Located<'_>> {
    STRATEGIES.iter().find_map(|&(name, strategy)| {
        strategy(document).map(|element| Located {
            element,
            strategy: name,
        })
    })
}

/// First `<article>` that holds at least one paragraph.
pub fn semantic_article(document: &Html) -> Option<ElementRef<'_>> {
    elements(document)
        .filter(|el| is_tag(el, "article"))
        .find(|el| paragraphs(*el).next().is_some())
}

/// First container whose class or id mentions `article-body`.
pub fn article_body_container(document: &Html) -> Option<ElementRef<'_>> {
    elements(document).find(|el| {
        ARTICLE_BODY_TAGS.iter().any(|tag| is_tag(el, tag))
            && class_or_id_contains(el, "article-body")
    })
}

/// Common CMS class names, each only accepted with enough paragraphs.
pub fn class_pattern(document: &Html) -> Option<ElementRef<'_>> {
    CLASS_PATTERNS.iter().find_map(|(tag, pattern)| {
        elements(document).find(|el| {
            is_tag(el, tag)
                && class_or_id_contains(el, pattern)
                && paragraphs(*el).count() >= MIN_PARAGRAPHS
        })
    })
}

/// The `<div>` with the most paragraph text among those holding at least
/// [`MIN_PARAGRAPHS`] paragraphs.
///
/// Every paragraph inside a div counts toward it, however deeply nested. A
/// div tying with an ancestor wins over it, so a page wrapper holding only the
/// story yields the story block. Ties between unrelated divs go to the earlier
/// one. This can pick a long comment thread over a short story.
pub fn densest_div(document: &Html) -> Option<ElementRef<'_>> {
    let mut best: Option<(ElementRef<'_>, usize)> = None;

    for div in elements(document).filter(|el| is_tag(el, "div")) {
        let (count, length) = paragraphs(div).fold((0usize, 0usize), |(count, length), p| {
            (count + 1, length + paragraph_text(p).chars().count())
        });
        if count < MIN_PARAGRAPHS {
            continue;
        }

        let better = match best {
            None => true,
            Some((best_div, best_length)) => {
                length > best_length
                    || (length == best_length && div.ancestors().any(|a| a.id() == best_div.id()))
            }
        };
        if better {
            best = Some((div, length));
        }
    }

    best.map(|(div, _)| div)
}

fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

fn paragraphs(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| is_tag(el, "p"))
}

fn paragraph_text(p: ElementRef<'_>) -> String {
    p.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_tag(element: &ElementRef<'_>, tag: &str) -> bool {
    element.value().name().eq_ignore_ascii_case(tag)
}

fn class_or_id_contains(element: &ElementRef<'_>, pattern: &str) -> bool {
    let value = element.value();
    [value.attr("class"), value.attr("id")]
        .into_iter()
        .flatten()
        .any(|attr| attr.to_lowercase().contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located_attr(html: &str, attr: &str) -> Option<(String, &'static str)> {
        let document = Html::parse_document(html);
        locate(&document).map(|found| {
            (
                found.element.value().attr(attr).unwrap_or_default().to_string(),
                found.strategy,
            )
        })
    }

    #[test]
    fn test_article_element_wins_over_other_containers() {
        let html = r#"<html><body>
            <div class="article-body" id="decoy"><p>Teaser one.</p><p>Teaser two.</p></div>
            <article id="main"><p>The real story.</p></article>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("main".into(), "article-element"))
        );
    }

    #[test]
    fn test_article_without_paragraphs_is_skipped() {
        let html = r#"<html><body>
            <article id="promo"><a href="/x">Read more</a></article>
            <div id="story-article-body"><p>Body text.</p></div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("story-article-body".into(), "article-body"))
        );
    }

    #[test]
    fn test_article_body_matches_without_paragraph_minimum() {
        let html = r#"<html><body>
            <section class="main Article-Body"><span>Only a span.</span></section>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "class"),
            Some(("main Article-Body".into(), "article-body"))
        );
    }

    #[test]
    fn test_class_pattern_requires_two_paragraphs() {
        let html = r#"<html><body>
            <div class="story-body-nav"><p>Sections</p></div>
            <div class="entry-content"><p>First.</p><p>Second.</p><p>Third.</p></div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "class"),
            Some(("entry-content".into(), "class-pattern"))
        );
    }

    #[test]
    fn test_class_pattern_tries_later_matches_of_same_pattern() {
        let html = r#"<html><body>
            <div class="story-body share"><p>Share this</p></div>
            <div class="Story-Body"><p>Para one.</p><p>Para two.</p></div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "class"),
            Some(("Story-Body".into(), "class-pattern"))
        );
    }

    #[test]
    fn test_section_pattern_precedes_div_pattern() {
        let html = r#"<html><body>
            <div class="article-list"><p>Other one.</p><p>Other two.</p></div>
            <section id="article-main"><p>Lead.</p><p>Follow.</p></section>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("article-main".into(), "class-pattern"))
        );
    }

    #[test]
    fn test_density_picks_longest_paragraph_block() {
        let html = r#"<html><body>
            <div id="short"><p>Tiny.</p><p>Small.</p></div>
            <div id="long"><p>This paragraph is considerably longer than the others.</p>
                <p>And it has a second paragraph with more words in it.</p></div>
            <div id="medium"><p>A medium paragraph here.</p><p>Another one.</p></div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("long".into(), "paragraph-density"))
        );
    }

    #[test]
    fn test_density_counts_nested_paragraphs() {
        let html = r#"<html><body>
            <div id="story">
                <div class="para"><p>The storm made landfall early on Monday.</p></div>
                <div class="para"><p>Thousands of homes lost power overnight.</p></div>
                <div class="para"><p>Crews expect repairs to take a week.</p></div>
            </div>
            <div id="related"><p>Other news.</p><p>More news.</p></div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("story".into(), "paragraph-density"))
        );
    }

    #[test]
    fn test_density_prefers_inner_block_over_wrapper() {
        let html = r#"<html><body>
            <div id="page">
                <div id="header"><a href="/">Home</a></div>
                <div id="story"><p>Alpha alpha alpha alpha.</p><p>Beta beta beta beta.</p></div>
            </div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("story".into(), "paragraph-density"))
        );
    }

    #[test]
    fn test_density_wrapper_outscores_its_parts() {
        let html = r#"<html><body>
            <div id="wrapper">
                <div id="left"><p>Alpha alpha alpha alpha.</p><p>Beta beta beta beta.</p></div>
                <div id="right"><p>Gamma.</p><p>Delta.</p></div>
            </div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("wrapper".into(), "paragraph-density"))
        );
    }

    #[test]
    fn test_density_ignores_single_paragraph_divs() {
        let html = r#"<html><body>
            <div id="one"><p>A single but very very very long paragraph of text.</p></div>
            <div id="two"><p>Short a.</p><p>Short b.</p></div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("two".into(), "paragraph-density"))
        );
    }

    #[test]
    fn test_density_is_best_effort_for_comment_threads() {
        // Known limitation: a longer comment thread outranks a short story.
        let html = r#"<html><body>
            <div id="story"><p>Brief report.</p><p>Two lines.</p></div>
            <div id="comments">
                <p>I completely disagree with this take and here is a long reason why.</p>
                <p>Another reader writes an even longer reply to the comment above this one.</p>
            </div>
        </body></html>"#;

        assert_eq!(
            located_attr(html, "id"),
            Some(("comments".into(), "paragraph-density"))
        );
    }

    #[test]
    fn test_nothing_qualifies() {
        let html = r#"<html><body>
            <nav><a href="/">Home</a></nav>
            <div><p>Only one paragraph.</p></div>
        </body></html>"#;

        assert!(located_attr(html, "id").is_none());
    }

    #[test]
    fn test_paragraph_texts_collapse_whitespace_and_skip_empty() {
        let html = r#"<html><body><article>
            <p>  Hello
               <b>bold</b>world. </p>
            <p>   </p>
            <p>Second&nbsp;line.</p>
        </article></body></html>"#;
        let document = Html::parse_document(html);
        let found = locate(&document).unwrap();

        assert_eq!(
            found.paragraph_texts(),
            vec!["Hello boldworld.".to_string(), "Second line.".to_string()]
        );
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["article-element", "article-body", "class-pattern", "paragraph-density"]
        );
    }
}

// src/scraping/extractor.rs
//! Structural-pattern extraction over captured page source. LinkedIn's DOM
//! is unstable, so every lookup is a prioritized list of selector
//! strategies; the first that yields usable text wins. All functions here
//! are pure so new layouts can be covered by adding strategies, not by
//! touching the session code.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{RawFragment, SectionKind};
use crate::utils::normalize_whitespace;

/// Post containers recognized anywhere on a page, in priority order.
const POST_CONTAINER_SELECTORS: &[&str] = &[
    "div[class*='occludable-update']",
    "div[class*='feed-shared-update-v2']",
];

/// Per-container text rules, tried in order; each is (element, class
/// pattern) expressed as an attribute selector.
const CONTENT_RULES: &[&str] = &[
    "div[class*='update-components-text']",
    "span[class*='break-words']",
    "div[class*='feed-shared-text']",
    "div[class*='feed-shared-inline-show-more-text']",
    "div[class*='feed-shared-update-v2__commentary']",
];

/// Canonical post links beat generic activity links, which beat any
/// sufficiently long same-domain link.
const CANONICAL_LINK_SELECTORS: &[&str] = &["a[href*='/posts/']", "a[href*='/pulse/']"];
const ACTIVITY_LINK_SELECTORS: &[&str] = &["a[href*='/activity/']", "a[href*='/feed/update/']"];
const ANY_PROFILE_LINK: &str = "a[href*='linkedin.com']";
const MIN_FALLBACK_LINK_LEN: usize = 30;

/// Text blocks shorter than this are UI chrome, not posts.
const MIN_FRAGMENT_CHARS: usize = 30;
/// Articles render more boilerplate per card, so the floor is higher.
const MIN_ARTICLE_CHARS: usize = 50;

/// Pull article cards from a recent-activity articles page.
pub fn extract_articles(page_source: &str, max_articles: usize) -> Vec<RawFragment> {
    let document = Html::parse_document(page_source);
    let mut fragments = Vec::new();

    for card in select_all(&document, "div[class*='artdeco-card']")
        .into_iter()
        .take(max_articles)
    {
        let text = element_lines(card);
        if text.chars().count() < MIN_ARTICLE_CHARS || text.contains("Loading") {
            continue;
        }
        fragments.push(RawFragment {
            section: SectionKind::Article,
            raw_text: text,
            url: None,
        });
    }
    fragments
}

/// Pull items out of the Featured section. Inside the section: list items
/// first, then cards. When the section is missing or empty the known
/// post-container patterns are matched against the whole page instead.
pub fn extract_featured(page_source: &str, max_items: usize) -> Vec<RawFragment> {
    let document = Html::parse_document(page_source);
    let mut fragments = Vec::new();

    let mut containers = match find_labeled_section(&document, "Featured") {
        Some(section) => {
            let mut items = select_within(section, "li");
            if items.is_empty() {
                items = select_within(section, "div[class*='artdeco-card']");
            }
            items
        }
        None => Vec::new(),
    };
    if containers.is_empty() {
        containers = find_post_containers(&document);
    }

    for container in containers.into_iter().take(max_items) {
        let text = element_lines(container);
        if text.chars().count() < MIN_FRAGMENT_CHARS {
            continue;
        }
        fragments.push(RawFragment {
            section: SectionKind::Featured,
            raw_text: text,
            url: None,
        });
    }
    fragments
}

/// Pull feed updates from an activity page (or the profile page when no
/// dedicated activity page was reachable). The only section whose
/// containers carry a post URL.
pub fn extract_activity(page_source: &str, max_posts: usize) -> Vec<RawFragment> {
    let document = Html::parse_document(page_source);
    let mut fragments = Vec::new();

    for container in find_post_containers(&document).into_iter().take(max_posts) {
        let text = container_text(container);
        if text.chars().count() < MIN_FRAGMENT_CHARS {
            continue;
        }
        let url = extract_post_url(container);
        fragments.push(RawFragment {
            section: SectionKind::Activity,
            raw_text: text,
            url,
        });
    }
    fragments
}

/// The About section as a last-resort content source: at most one fragment.
pub fn extract_about(page_source: &str) -> Vec<RawFragment> {
    let document = Html::parse_document(page_source);

    let Some(section) = find_labeled_section(&document, "About") else {
        return Vec::new();
    };
    let text = element_lines(section).replacen("About", "", 1).trim().to_string();
    if text.chars().count() < MIN_FRAGMENT_CHARS {
        return Vec::new();
    }
    vec![RawFragment {
        section: SectionKind::About,
        raw_text: text,
        url: None,
    }]
}

/// First `<section>` whose header span carries exactly the given label.
fn find_labeled_section<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let section_sel = parse_selector("section")?;
    let span_sel = parse_selector("span")?;

    document.select(&section_sel).find(|section| {
        section
            .select(&span_sel)
            .any(|span| span.text().collect::<String>().trim() == label)
    })
}

/// Whole-page container matches in selector priority order: all matches of
/// the first pattern that hits anything.
fn find_post_containers(document: &Html) -> Vec<ElementRef<'_>> {
    for selector_str in POST_CONTAINER_SELECTORS {
        let matches = select_all(document, selector_str);
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

/// Text for one container: first content rule that yields non-empty text,
/// otherwise every visible text node with normalized separators.
fn container_text(container: ElementRef<'_>) -> String {
    for rule in CONTENT_RULES {
        if let Some(selector) = parse_selector(rule) {
            if let Some(element) = container.select(&selector).next() {
                let text = element_lines(element);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    normalize_whitespace(&container.text().collect::<Vec<_>>().join(" "))
}

/// Best URL for a post container, or none.
fn extract_post_url(container: ElementRef<'_>) -> Option<String> {
    for rule in CANONICAL_LINK_SELECTORS.iter().chain(ACTIVITY_LINK_SELECTORS) {
        if let Some(href) = first_href(container, rule) {
            return Some(href);
        }
    }

    let selector = parse_selector(ANY_PROFILE_LINK)?;
    container
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .find(|href| href.len() > MIN_FALLBACK_LINK_LEN)
        .map(str::to_string)
}

fn first_href(container: ElementRef<'_>, selector_str: &str) -> Option<String> {
    let selector = parse_selector(selector_str)?;
    container
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .next()
        .map(str::to_string)
}

/// Visible text as trimmed, newline-separated lines so the normalizer's
/// line-based split applies to rendered structure, not markup layout.
fn element_lines(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn select_all<'a>(document: &'a Html, selector_str: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(selector_str) {
        Some(selector) => document.select(&selector).collect(),
        None => Vec::new(),
    }
}

fn select_within<'a>(element: ElementRef<'a>, selector_str: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(selector_str) {
        Some(selector) => element.select(&selector).collect(),
        None => Vec::new(),
    }
}

fn parse_selector(selector_str: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector {selector_str}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURED_PAGE: &str = r#"
        <html><body>
        <section><div><span>Featured</span></div>
        <ul>
        <li>Shipping the new platform
We rebuilt the ingestion pipeline from scratch and cut p99 latency in half.</li>
        <li>ok</li>
        </ul>
        </section>
        </body></html>"#;

    const ACTIVITY_PAGE: &str = r#"
        <html><body>
        <div class="feed-shared-update-v2">
          <div class="update-components-text">What a year for open source
Here is what our team learned from maintaining a public crate.</div>
          <a href="https://www.linkedin.com/feed/update/urn:li:activity:7212345678901234567/">activity</a>
          <a href="https://www.linkedin.com/posts/alice_open-source-activity-7212345678901234567-abcd">post</a>
        </div>
        </body></html>"#;

    #[test]
    fn featured_items_come_from_the_labeled_section() {
        let fragments = extract_featured(FEATURED_PAGE, 10);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].section, SectionKind::Featured);
        assert!(fragments[0].raw_text.starts_with("Shipping the new platform"));
    }

    #[test]
    fn short_blocks_are_suppressed() {
        let fragments = extract_featured(FEATURED_PAGE, 10);
        assert!(fragments.iter().all(|f| f.raw_text != "ok"));
    }

    #[test]
    fn featured_falls_back_to_page_wide_containers() {
        let page = r#"<html><body>
            <div class="occludable-update">A standalone update with enough text to clear the length floor.</div>
            </body></html>"#;
        let fragments = extract_featured(page, 10);
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn activity_containers_yield_text_and_url() {
        let fragments = extract_activity(ACTIVITY_PAGE, 10);
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].raw_text.starts_with("What a year for open source"));
        assert!(fragments[0].url.is_some());
    }

    #[test]
    fn canonical_post_link_beats_activity_link() {
        let fragments = extract_activity(ACTIVITY_PAGE, 10);
        let url = fragments[0].url.as_deref().unwrap();
        assert!(url.contains("/posts/"), "expected canonical link, got {url}");
    }

    #[test]
    fn item_caps_are_applied() {
        let page = r#"<html><body>
            <div class="feed-shared-update-v2"><div class="update-components-text">First update with plenty of text to pass the minimum floor.</div></div>
            <div class="feed-shared-update-v2"><div class="update-components-text">Second update with plenty of text to pass the minimum floor.</div></div>
            </body></html>"#;
        assert_eq!(extract_activity(page, 1).len(), 1);
    }

    #[test]
    fn about_section_strips_its_label() {
        let page = r#"<html><body>
            <section><span>About</span><div>Engineer and writer focused on distributed systems and storage engines.</div></section>
            </body></html>"#;
        let fragments = extract_about(page);
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].raw_text.starts_with("Engineer and writer"));
    }

    #[test]
    fn missing_sections_yield_nothing() {
        let page = "<html><body><p>hello</p></body></html>";
        assert!(extract_featured(page, 10).is_empty());
        assert!(extract_activity(page, 10).is_empty());
        assert!(extract_about(page).is_empty());
    }
}

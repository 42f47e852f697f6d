// src/scraping/normalizer.rs
//! Turns raw fragments into post records: per-fragment title/content split,
//! noise filtering, and one global first-seen deduplication pass.

use std::collections::HashSet;

use tracing::debug;

use super::{PostRecord, RawFragment, SectionKind};
use crate::utils::truncate_title;

/// Activity fragments open with engagement counters; real content starts
/// after the first line carrying one of these.
const ENGAGEMENT_MARKERS: &[&str] = &["likes", "comments", "reactions"];

/// Titles that are profile chrome rather than posts. Exact match only:
/// a post that merely starts with one of these is kept.
const NOISE_TITLES: &[&str] = &[
    "Open to work",
    "Share that you're hiring and attract qualified candidates",
];

/// Profile-metadata boilerplate; any occurrence in the content drops the
/// whole record.
const NOISE_CONTENT: &[&str] = &["Premium • You", "Visible to anyone"];

const MAX_TITLE_CHARS: usize = 50;
const MIN_TITLE_CHARS: usize = 5;
const FALLBACK_TITLE: &str = "LinkedIn Post";
const FINGERPRINT_CONTENT_CHARS: usize = 100;

/// Normalize fragments into records in discovery order. Duplicates (same
/// title + first 100 content chars) keep only their first occurrence; the
/// fingerprint is a lossy heuristic and collisions between genuinely
/// distinct posts are accepted. Never returns an empty list: with zero
/// survivors a single placeholder record is synthesized.
pub fn normalize(fragments: Vec<RawFragment>, profile_name: &str) -> Vec<PostRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<PostRecord> = Vec::new();

    for fragment in fragments {
        let (title, content) = split_fragment(&fragment);
        if title.is_empty() && content.is_empty() {
            continue;
        }
        if is_noise(&title, &content) {
            debug!("Dropping boilerplate fragment titled {title:?}");
            continue;
        }
        if !seen.insert(fingerprint(&title, &content)) {
            debug!("Dropping duplicate fragment titled {title:?}");
            continue;
        }
        records.push(PostRecord {
            index: records.len() + 1,
            title,
            content,
            url: fragment.url,
        });
    }

    if records.is_empty() {
        records.push(placeholder_record(profile_name));
    }
    records
}

/// Title/content split. Activity posts first skip past the engagement
/// counter line, then use the first substantive line as the title; other
/// sections take the first line as the title outright.
fn split_fragment(fragment: &RawFragment) -> (String, String) {
    match fragment.section {
        SectionKind::Activity => split_activity(&fragment.raw_text),
        _ => split_simple(&fragment.raw_text),
    }
}

fn split_simple(raw_text: &str) -> (String, String) {
    let mut lines = raw_text.lines();
    let title = lines.next().unwrap_or("").trim().to_string();
    let content = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    (title, content)
}

fn split_activity(raw_text: &str) -> (String, String) {
    let lines: Vec<&str> = raw_text.lines().collect();

    let mut content_start = 0;
    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if ENGAGEMENT_MARKERS.iter().any(|m| lower.contains(m)) {
            content_start = i + 1;
            break;
        }
    }

    let title = lines[content_start.min(lines.len())..]
        .iter()
        .take(3)
        .map(|line| line.trim())
        .find(|line| line.chars().count() > MIN_TITLE_CHARS)
        .unwrap_or(FALLBACK_TITLE);

    let mut content = lines[content_start.min(lines.len())..]
        .join("\n")
        .replacen(title, "", 1)
        .trim()
        .to_string();
    if content.is_empty() && content_start > 0 {
        // Nothing left after the title: keep the whole fragment as content
        // rather than emitting a bare headline.
        content = raw_text.trim().to_string();
    }

    (truncate_title(title, MAX_TITLE_CHARS), content)
}

fn is_noise(title: &str, content: &str) -> bool {
    NOISE_TITLES.iter().any(|t| title == *t)
        || NOISE_CONTENT.iter().any(|c| content.contains(c))
}

fn fingerprint(title: &str, content: &str) -> String {
    let prefix: String = content.chars().take(FINGERPRINT_CONTENT_CHARS).collect();
    format!("{title}{prefix}")
}

fn placeholder_record(profile_name: &str) -> PostRecord {
    PostRecord {
        index: 1,
        title: "LinkedIn Profile Information".to_string(),
        content: format!(
            "No posts were found on the LinkedIn profile {profile_name}. \
             The profile may have no public posts, or a different profile \
             name may be needed."
        ),
        url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(section: SectionKind, raw_text: &str) -> RawFragment {
        RawFragment {
            section,
            raw_text: raw_text.to_string(),
            url: None,
        }
    }

    #[test]
    fn activity_split_skips_engagement_line() {
        let posts = normalize(
            vec![fragment(
                SectionKind::Activity,
                "128 likes · 12 comments\nGreat milestone today!\nMore detail here.",
            )],
            "alice",
        );
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Great milestone today!");
        assert_eq!(posts[0].content, "More detail here.");
    }

    #[test]
    fn featured_split_uses_first_line_as_title() {
        let posts = normalize(
            vec![fragment(
                SectionKind::Featured,
                "Shipping the new platform\nWe rebuilt everything.\nTwice.",
            )],
            "alice",
        );
        assert_eq!(posts[0].title, "Shipping the new platform");
        assert_eq!(posts[0].content, "We rebuilt everything.\nTwice.");
    }

    #[test]
    fn long_activity_titles_are_truncated() {
        let long_line = "A".repeat(80);
        let posts = normalize(
            vec![fragment(
                SectionKind::Activity,
                &format!("3 comments\n{long_line}\nbody"),
            )],
            "alice",
        );
        assert_eq!(posts[0].title.chars().count(), 53);
        assert!(posts[0].title.ends_with("..."));
    }

    #[test]
    fn duplicate_fingerprints_keep_first_occurrence() {
        let body = format!("same lead-in {}\ndiffering tail one", "x".repeat(100));
        let body2 = body.replace("tail one", "tail two");
        let posts = normalize(
            vec![
                fragment(SectionKind::Featured, &format!("Same title\n{body}")),
                fragment(SectionKind::Featured, &format!("Same title\n{body2}")),
            ],
            "alice",
        );
        assert_eq!(posts.len(), 1);
        assert!(posts[0].content.contains("tail one"));
    }

    #[test]
    fn noise_titles_are_exact_match_only() {
        let posts = normalize(
            vec![
                fragment(SectionKind::Featured, "Open to work\nlooking for a role"),
                fragment(SectionKind::Featured, "Open to work today\nthoughts on job hunting"),
            ],
            "alice",
        );
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Open to work today");
    }

    #[test]
    fn profile_metadata_content_is_dropped() {
        let posts = normalize(
            vec![fragment(
                SectionKind::Featured,
                "Some title\nPremium • You\nrest of it",
            )],
            "alice",
        );
        assert_eq!(posts[0].title, "LinkedIn Profile Information");
    }

    #[test]
    fn empty_fragments_never_become_records() {
        let posts = normalize(vec![fragment(SectionKind::Featured, "\n\n")], "alice");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "LinkedIn Profile Information");
    }

    #[test]
    fn zero_survivors_yield_exactly_one_placeholder() {
        let posts = normalize(Vec::new(), "alice");
        assert_eq!(posts.len(), 1);
        assert!(posts[0].content.contains("alice"));
        assert!(!posts[0].title.is_empty());
    }

    #[test]
    fn indices_follow_emission_order() {
        let posts = normalize(
            vec![
                fragment(SectionKind::Featured, "First post title\nwith some body"),
                fragment(SectionKind::Activity, "9 likes\nSecond post title\nactivity body"),
            ],
            "alice",
        );
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].index, 1);
        assert_eq!(posts[1].index, 2);
        assert_eq!(posts[1].title, "Second post title");
    }
}

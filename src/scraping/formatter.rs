// src/scraping/formatter.rs
//! Renders post records as the numbered-list text handed to the generation
//! step, and recovers records from that text (or near-variants of it).
//! Recovery is an ordered list of pure parse attempts, first success wins;
//! malformed input degrades to a single untitled post, never a failure.

use regex::Regex;

use super::PostRecord;

const FALLBACK_TITLE: &str = "LinkedIn Post";
const MAX_INLINE_TITLE_CHARS: usize = 100;

/// Render `"<n>. <title>\n<content>"` blocks separated by blank lines.
/// Numbering follows rendering order; stored indices are advisory.
pub fn format_posts(posts: &[PostRecord]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| format!("{}. {}\n{}", i + 1, post.title, post.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse posts back out of generated or formatted text. Accepts a JSON
/// array, the numbered-list shape, or plain "title line + body" framing.
pub fn parse_posts(text: &str) -> Vec<PostRecord> {
    let posts = try_json_array(text)
        .or_else(|| try_numbered_list(text))
        .or_else(|| try_title_body(text))
        .unwrap_or_else(|| {
            vec![PostRecord {
                index: 1,
                title: FALLBACK_TITLE.to_string(),
                content: text.trim().to_string(),
                url: None,
            }]
        });
    reindex(posts)
}

/// A JSON array of `{title, content}` objects anywhere in the text.
fn try_json_array(text: &str) -> Option<Vec<PostRecord>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    let posts: Vec<PostRecord> = serde_json::from_str(&text[start..=end]).ok()?;
    (!posts.is_empty()).then_some(posts)
}

/// Items introduced by `<n>. ` at line starts; first line of each item is
/// the title, the rest its content.
fn try_numbered_list(text: &str) -> Option<Vec<PostRecord>> {
    let item_start = Regex::new(r"(?m)^\s*\d+\.\s+").ok()?;
    let starts: Vec<_> = item_start.find_iter(text).collect();
    if starts.is_empty() {
        return None;
    }

    let mut posts = Vec::new();
    for (i, m) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map(|next| next.start()).unwrap_or(text.len());
        let body = text[m.end()..end].trim();
        let (title, content) = match body.split_once('\n') {
            Some((first, rest)) => (first.trim(), rest.trim()),
            None => (body, ""),
        };
        if title.is_empty() && content.is_empty() {
            continue;
        }
        posts.push(PostRecord {
            index: posts.len() + 1,
            title: if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title.to_string()
            },
            content: content.to_string(),
            url: None,
        });
    }
    (!posts.is_empty()).then_some(posts)
}

/// Unnumbered "title line + body" framing: a short first line followed by
/// at least one line of body text.
fn try_title_body(text: &str) -> Option<Vec<PostRecord>> {
    let trimmed = text.trim();
    let (first, rest) = trimmed.split_once('\n')?;
    let title = first.trim();
    let content = rest.trim();
    if title.is_empty()
        || content.is_empty()
        || title.chars().count() > MAX_INLINE_TITLE_CHARS
    {
        return None;
    }
    Some(vec![PostRecord {
        index: 1,
        title: title.to_string(),
        content: content.to_string(),
        url: None,
    }])
}

fn reindex(mut posts: Vec<PostRecord>) -> Vec<PostRecord> {
    for (i, post) in posts.iter_mut().enumerate() {
        post.index = i + 1;
    }
    posts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, content: &str) -> PostRecord {
        PostRecord {
            index: 0,
            title: title.to_string(),
            content: content.to_string(),
            url: None,
        }
    }

    #[test]
    fn format_then_parse_round_trips() {
        let posts = vec![
            record("First title", "First body line.\nSecond body line."),
            record("Second title", "Another body."),
        ];
        let parsed = parse_posts(&format_posts(&posts));
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "First title");
        assert_eq!(parsed[0].content, "First body line.\nSecond body line.");
        assert_eq!(parsed[1].title, "Second title");
        assert_eq!(parsed[1].content, "Another body.");
    }

    #[test]
    fn json_arrays_are_recognized() {
        let text = r#"Here are the posts: [{"title": "From JSON", "content": "body text"}]"#;
        let parsed = parse_posts(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "From JSON");
        assert_eq!(parsed[0].content, "body text");
    }

    #[test]
    fn title_body_framing_without_numbers() {
        let parsed = parse_posts("A headline\nAnd the body of the post.");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "A headline");
        assert_eq!(parsed[0].content, "And the body of the post.");
    }

    #[test]
    fn malformed_input_becomes_one_untitled_post() {
        let parsed = parse_posts("just a single undecorated line");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "LinkedIn Post");
        assert_eq!(parsed[0].content, "just a single undecorated line");
    }

    #[test]
    fn parsed_indices_follow_position() {
        let parsed = parse_posts("1. One\nbody\n\n2. Two\nbody");
        assert_eq!(parsed[0].index, 1);
        assert_eq!(parsed[1].index, 2);
    }

    #[test]
    fn formatting_numbers_by_position_not_stored_index() {
        let mut posts = vec![record("Only", "body")];
        posts[0].index = 9;
        assert!(format_posts(&posts).starts_with("1. Only"));
    }
}

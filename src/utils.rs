// src/utils.rs
/// Collapse all runs of whitespace (including newlines) to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, appending "..." when anything was
/// cut. Character-based so multi-byte text is never split mid-code-point.
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let truncated: String = title.chars().take(max).collect();
    format!("{truncated}...")
}

/// Case-insensitive check for any of the given markers.
pub fn contains_any_ci(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|needle| lower.contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a  b\n\tc"), "a b c");
        assert_eq!(normalize_whitespace("  spaced  "), "spaced");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short", 50), "short");
        assert_eq!(truncate_title("abcdef", 3), "abc...");
        // char-based, not byte-based
        assert_eq!(truncate_title("ééééé", 2), "éé...");
    }

    #[test]
    fn test_contains_any_ci() {
        assert!(contains_any_ci("Security Check ahead", &["security check"]));
        assert!(!contains_any_ci("all clear", &["security check"]));
    }
}

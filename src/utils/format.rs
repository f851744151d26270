//! Output formatting utilities

/// Truncate a string to a maximum length
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return "...".to_string();
    }
    let trimmed: String = s.chars().take(max_len - 3).collect();
    format!("{trimmed}...")
}

/// Join tags for single-line display.
#[must_use]
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_string("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn tags_placeholder_when_empty() {
        assert_eq!(format_tags(&[]), "-");
        assert_eq!(format_tags(&["a".to_string(), "b".to_string()]), "a, b");
    }
}

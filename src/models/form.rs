//! Text-field encodings shared by the entity forms.
//!
//! Ordered string lists are edited as comma-separated text. The encoding is
//! lossy: an entry that itself contains a comma comes back as two entries
//! after a join/split round trip. There is no escaping.

/// Split comma-separated text into trimmed, non-empty entries
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render an ordered list back into editable text
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Empty text means "no value"
pub fn blank_to_none(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub fn none_to_blank(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

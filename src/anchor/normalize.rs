/// Text as compared by the resolver: trimmed and lower-cased.
/// Inner whitespace is kept as-is.
pub fn normalize_match_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The first `max_chars` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Snippet stored on an anchor: trimmed visible text, truncated.
pub fn text_snippet(raw: &str, max_chars: usize) -> String {
    truncate_chars(raw.trim(), max_chars).to_string()
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

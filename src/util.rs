/// Truncate a string to `max` characters, appending "…" if truncated.
/// Counts chars, not bytes, so multi-byte text is never split.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{truncated}…")
    }
}

/// Single-line preview of model output or an upstream error body for logs.
pub fn log_preview(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&flat, max)
}

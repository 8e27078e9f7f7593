//! Character-budget truncation applied to every extractor's output.

/// Fixed sentence appended when content is cut at the character budget.
pub const TRUNCATION_MARKER: &str =
    "\n\n[Note: Content has been truncated due to size limitations.]";

/// Characters reserved for the marker; the marker is shorter than this, so a
/// truncated result never exceeds the limit.
const MARKER_RESERVE: usize = 100;

/// Enforce `limit` on `text`, counted in characters.
///
/// Within the limit the text passes through unchanged. Over it, the first
/// `limit - 100` characters are kept and the marker is appended.
pub fn truncate(text: &str, limit: usize) -> String {
    debug_assert!(TRUNCATION_MARKER.chars().count() < MARKER_RESERVE);

    if text.chars().count() <= limit {
        return text.to_string();
    }

    let keep = limit.saturating_sub(MARKER_RESERVE);
    let cut = text
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
    out.push_str(&text[..cut]);
    out.push_str(TRUNCATION_MARKER);
    out
}

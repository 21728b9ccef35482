//! Source text helpers

/// Render source with `"<n>: "` prefixes, 1-based.
///
/// This is the form handed to external detectors so the line numbers they
/// report line up with ours.
pub fn numbered_source(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inclusive 0-based line window around `index`, clamped to `len`
pub fn line_window(index: usize, radius: usize, len: usize) -> std::ops::Range<usize> {
    let start = index.saturating_sub(radius);
    let end = (index + radius + 1).min(len);
    start..end
}

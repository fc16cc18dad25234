//! String utilities for the domain layer.

/// Single-line preview of a message for log output (UTF-8 safe)
///
/// Newlines and runs of whitespace collapse to one space. Output longer than
/// `max_chars` characters is cut and suffixed with `...`.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let cut: String = flat.chars().take(keep).collect();
    format!("{}...", cut)
}

//! Shared string helpers

/// Cut `s` to at most `max_bytes`, backing off to the previous char boundary.
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview of `s` no wider than `max_chars`, with an ellipsis
/// when anything was cut. Newlines are flattened to spaces.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_chars {
        return flat;
    }
    if max_chars == 0 {
        return String::new();
    }

    let keep = max_chars.saturating_sub(1);
    let mut out: String = flat.chars().take(keep).collect();
    out.push('…');
    out
}

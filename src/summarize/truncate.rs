//! Local, deterministic summarization

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_len` characters
///
/// Text that already fits is returned unchanged. Otherwise the text is cut
/// after the last full stop within the first `max_len - 3` characters when
/// that stop lies past the middle of the budget, and cut hard with a trailing
/// `...` when it does not.
pub fn truncate_summary(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let head_len = max_len.saturating_sub(ELLIPSIS.len());
    let head: String = text.chars().take(head_len).collect();

    let last_period = head
        .chars()
        .enumerate()
        .filter(|(_, c)| *c == '.')
        .map(|(i, _)| i)
        .last();

    match last_period {
        Some(p) if p > max_len / 2 => head.chars().take(p + 1).collect(),
        _ => with_ellipsis(head, max_len),
    }
}

/// Hard-cut `text` to `max_len` characters, marking the cut with `...`
///
/// Used for model output that ignored the requested length.
pub fn clamp_summary(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let head: String = text
        .chars()
        .take(max_len.saturating_sub(ELLIPSIS.len()))
        .collect();
    with_ellipsis(head, max_len)
}

fn with_ellipsis(mut head: String, max_len: usize) -> String {
    let room = max_len.saturating_sub(head.chars().count());
    head.push_str(&ELLIPSIS[..room.min(ELLIPSIS.len())]);
    head
}

//! Utility functions for request sanitizing and log output

/// Substrings that mark a form placeholder rather than a real image URL
const PLACEHOLDER_MARKERS: [&str; 6] = [
    "optional image",
    "placeholder",
    "sample",
    "attach",
    "choose",
    "select",
];

/// Normalize a caller-supplied image URL
///
/// # Returns
///
/// The trimmed URL when it parses as an absolute `http(s)` URL with a host,
/// `None` for absent, blank, placeholder-looking, malformed or non-HTTP values.
///
/// # Examples
///
/// ```
/// use insta_bridge::utils::sanitize_image_url;
///
/// assert_eq!(
///     sanitize_image_url(Some(" https://example.com/real.jpg ")),
///     Some("https://example.com/real.jpg".to_string())
/// );
/// assert_eq!(sanitize_image_url(Some("placeholder.jpg")), None);
/// assert_eq!(sanitize_image_url(Some("ftp://host/image.png")), None);
/// ```
pub fn sanitize_image_url(url: Option<&str>) -> Option<String> {
    let trimmed = url?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    if PLACEHOLDER_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return None;
    }

    let parsed = url::Url::parse(trimmed).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return None;
    }

    Some(trimmed.to_string())
}

/// First `max_chars` characters of `text`, with `...` appended when cut
///
/// Used to keep captions and post texts short in log lines.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Bearer tokens accepted by the debug endpoint at `now`
///
/// A token is `debug-<hours since the Unix epoch>`; the previous hour's
/// token stays valid so a token minted just before the hour turns over
/// keeps working.
pub fn debug_tokens(now: chrono::DateTime<chrono::Utc>) -> [String; 2] {
    let hour = now.timestamp().div_euclid(3600);
    [format!("debug-{hour}"), format!("debug-{}", hour - 1)]
}

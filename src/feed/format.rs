//! Small display helpers shared by the panels.

use chrono::{DateTime, Utc};

/// Icon for a file name, chosen by extension
pub fn file_icon(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "html" => "🌐",
        "css" => "🎨",
        "js" => "⚡",
        "json" => "📋",
        "md" => "📝",
        "sh" => "⚙️",
        "png" | "jpg" | "jpeg" => "🖼️",
        "pdf" => "📕",
        "sql" => "🗃️",
        "py" => "🐍",
        "ts" => "💠",
        _ => "📄",
    }
}

/// Icon for an attachment, preferring its recorded extension (".md")
pub fn attachment_icon(name: &str, ext: Option<&str>) -> &'static str {
    match ext {
        Some(ext) => file_icon(ext),
        None => file_icon(name),
    }
}

/// "just now", "5m ago", "3h ago", "2d ago", "1w ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        s => format!("{}w ago", s / 604_800),
    }
}

/// Keeps the first `limit` characters, marking the cut with "..."
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Splits source-message text into bullet points.
///
/// Text is cut at every hyphen surrounded by whitespace. Returns `None` when
/// that yields two segments or fewer, in which case the text is shown as is.
pub fn source_segments(text: &str) -> Option<Vec<String>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut from = 0;

    for window in chars.windows(3) {
        let [(_, before), (idx, '-'), (_, after)] = window else {
            continue;
        };
        if before.is_whitespace() && after.is_whitespace() {
            segments.push(&text[from..*idx]);
            from = idx + 1;
        }
    }
    segments.push(&text[from..]);

    let segments: Vec<String> = segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    (segments.len() > 2).then_some(segments)
}

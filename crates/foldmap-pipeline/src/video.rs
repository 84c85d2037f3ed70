//! YouTube URL to video-id extraction.

use url::Url;

/// Whether `s` looks like a bare 11-character video id.
fn is_video_id(s: &str) -> bool {
    s.len() == 11 && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Extract a video id from the supported URL shapes, or from a bare id.
///
/// Supported: `youtube.com/watch?v=ID`, `youtu.be/ID`,
/// `youtube.com/{embed,v,shorts,live}/ID`, with optional `www.` / `m.`
/// host prefixes. Returns `None` for anything else.
#[must_use]
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();

    if is_video_id(trimmed) {
        return Some(trimmed.to_string());
    }

    let parsed = Url::parse(trimmed).ok()?;
    let host = parsed.host_str()?.strip_prefix("www.").unwrap_or(parsed.host_str()?);

    if host == "youtu.be" {
        let id = parsed.path().trim_start_matches('/');
        return is_video_id(id).then(|| id.to_string());
    }

    if host != "youtube.com" && host != "m.youtube.com" {
        return None;
    }

    if parsed.path() == "/watch" {
        let id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?;
        return is_video_id(&id).then_some(id);
    }

    let mut segments = parsed.path_segments()?;
    let kind = segments.next()?;
    if matches!(kind, "embed" | "v" | "shorts" | "live") {
        let id = segments.next()?;
        return is_video_id(id).then(|| id.to_string());
    }

    None
}

//! Transcript retrieval contract with retry/backoff.
//!
//! The transport is behind [`TranscriptSource`] so callers can plug in an
//! HTTP client, a caching layer, or a test double. Retrying with
//! exponential backoff lives here, on top of the trait: transient fetch
//! failures are retried, "this video has no captions" is not.

use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

/// One caption segment as delivered by the transcript service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    pub text: String,
}

impl TranscriptSegment {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Fetch options forwarded to the source.
#[derive(Debug, Clone)]
pub struct TranscriptConfig {
    /// Caption language to request.
    pub lang: String,
    /// Optional proxy to route requests through.
    pub proxy_url: Option<Url>,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            proxy_url: None,
        }
    }
}

/// Transcript retrieval failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// No transcript exists for this video. Not retryable.
    Unavailable,
    /// A transcript exists but contains no text. Not retryable.
    Empty,
    /// Transport-level failure; retried with backoff.
    Fetch(String),
}

impl TranscriptError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(
                f,
                "No transcript available for this video. The video may not have captions enabled."
            ),
            Self::Empty => write!(f, "Transcript is empty."),
            Self::Fetch(msg) => write!(f, "transcript fetch failed: {msg}"),
        }
    }
}

impl std::error::Error for TranscriptError {}

/// Pluggable transcript transport.
pub trait TranscriptSource {
    /// Fetch the caption segments for one video.
    fn fetch(
        &self,
        video_id: &str,
        config: &TranscriptConfig,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Exponential backoff policy: attempt `n` (0-based) sleeps
/// `base_delay * 2^n` before retrying.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Fetch a video's transcript as one cleaned string.
///
/// Retries transient failures per `policy`, then joins segments, strips
/// embedded newlines, collapses runs of whitespace, and decodes the HTML
/// entities YouTube captions carry.
pub fn fetch_transcript_text(
    source: &dyn TranscriptSource,
    video_id: &str,
    config: &TranscriptConfig,
    policy: &RetryPolicy,
) -> Result<String, TranscriptError> {
    let mut attempt = 0;
    let segments = loop {
        match source.fetch(video_id, config) {
            Ok(segments) => break segments,
            Err(err) if err.is_retryable() && attempt + 1 < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(video_id, attempt, ?delay, %err, "transcript fetch failed, retrying");
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    };

    if segments.is_empty() {
        return Err(TranscriptError::Unavailable);
    }

    let joined = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\n', " ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = decode_html_entities(&collapsed);

    if text.is_empty() {
        return Err(TranscriptError::Empty);
    }
    debug!(video_id, chars = text.len(), "transcript fetched");
    Ok(text)
}

/// Decode the entities YouTube transcripts actually contain.
fn decode_html_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Source that fails `failures` times, then returns `segments`.
    struct FlakySource {
        failures: RefCell<u32>,
        segments: Vec<TranscriptSegment>,
    }

    impl FlakySource {
        fn new(failures: u32, segments: Vec<TranscriptSegment>) -> Self {
            Self {
                failures: RefCell::new(failures),
                segments,
            }
        }
    }

    impl TranscriptSource for FlakySource {
        fn fetch(
            &self,
            _video_id: &str,
            _config: &TranscriptConfig,
        ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
            let mut failures = self.failures.borrow_mut();
            if *failures > 0 {
                *failures -= 1;
                return Err(TranscriptError::Fetch("connection reset".into()));
            }
            Ok(self.segments.clone())
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn joins_and_cleans_segments() {
        let source = FlakySource::new(
            0,
            vec![
                TranscriptSegment::new("it&#39;s  a\ntest"),
                TranscriptSegment::new("of &quot;captions&quot; &amp; more"),
            ],
        );
        let text =
            fetch_transcript_text(&source, "abc", &TranscriptConfig::default(), &fast_policy())
                .unwrap();
        assert_eq!(text, "it's a test of \"captions\" & more");
    }

    #[test]
    fn retries_transient_failures_then_succeeds() {
        let source = FlakySource::new(2, vec![TranscriptSegment::new("hello")]);
        let text =
            fetch_transcript_text(&source, "abc", &TranscriptConfig::default(), &fast_policy())
                .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn exhausted_retries_surface_the_fetch_error() {
        let source = FlakySource::new(5, vec![TranscriptSegment::new("hello")]);
        let err =
            fetch_transcript_text(&source, "abc", &TranscriptConfig::default(), &fast_policy())
                .unwrap_err();
        assert!(matches!(err, TranscriptError::Fetch(_)));
    }

    #[test]
    fn unavailable_is_not_retried() {
        struct CountingSource(RefCell<u32>);
        impl TranscriptSource for CountingSource {
            fn fetch(
                &self,
                _video_id: &str,
                _config: &TranscriptConfig,
            ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
                *self.0.borrow_mut() += 1;
                Err(TranscriptError::Unavailable)
            }
        }
        let source = CountingSource(RefCell::new(0));
        let err =
            fetch_transcript_text(&source, "abc", &TranscriptConfig::default(), &fast_policy())
                .unwrap_err();
        assert_eq!(err, TranscriptError::Unavailable);
        assert_eq!(*source.0.borrow(), 1);
    }

    #[test]
    fn empty_segments_mean_unavailable() {
        let source = FlakySource::new(0, vec![]);
        let err =
            fetch_transcript_text(&source, "abc", &TranscriptConfig::default(), &fast_policy())
                .unwrap_err();
        assert_eq!(err, TranscriptError::Unavailable);
    }

    #[test]
    fn whitespace_only_segments_mean_empty() {
        let source = FlakySource::new(0, vec![TranscriptSegment::new("  \n  ")]);
        let err =
            fetch_transcript_text(&source, "abc", &TranscriptConfig::default(), &fast_policy())
                .unwrap_err();
        assert_eq!(err, TranscriptError::Empty);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
    }
}

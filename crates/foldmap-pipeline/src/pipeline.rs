//! End-to-end generation: URL in, mindmap markdown out.
//!
//! Orchestrates the three stages behind one call: resolve the video id
//! from the URL, fetch and clean the transcript, then turn the transcript
//! into outline markdown through an [`OutlineGenerator`]. Each stage maps
//! its failure to a user-facing [`PipelineError`] variant.

use std::fmt;

use tracing::{error, info};

use crate::generate::{OutlineGenerator, user_prompt};
use crate::transcript::{RetryPolicy, TranscriptConfig, TranscriptError, TranscriptSource, fetch_transcript_text};
use crate::video::extract_video_id;
use foldmap_outline::extract_title;

/// A completed generation, ready to render and to record in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindmapResult {
    pub url: String,
    pub video_id: String,
    pub title: String,
    pub markdown: String,
}

/// Failure of one pipeline stage, with a message fit for end users.
#[derive(Debug)]
pub enum PipelineError {
    /// The URL did not resolve to a video id.
    InvalidUrl,
    /// Transcript fetch or cleanup failed.
    Transcript(TranscriptError),
    /// The outline generator failed.
    Generation(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => {
                write!(f, "Invalid YouTube URL. Please enter a valid YouTube video link.")
            }
            Self::Transcript(err) => err.fmt(f),
            Self::Generation(_) => write!(f, "Failed to generate mindmap. Please try again."),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transcript(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TranscriptError> for PipelineError {
    fn from(err: TranscriptError) -> Self {
        Self::Transcript(err)
    }
}

/// Run the full pipeline for one video URL.
///
/// The title comes from the generated markdown's first heading, so the
/// result can be stored and listed without a second metadata fetch.
pub fn generate_mindmap(
    url: &str,
    source: &dyn TranscriptSource,
    generator: &dyn OutlineGenerator,
    config: &TranscriptConfig,
    policy: &RetryPolicy,
) -> Result<MindmapResult, PipelineError> {
    let Some(video_id) = extract_video_id(url) else {
        error!(url, "could not extract a video id");
        return Err(PipelineError::InvalidUrl);
    };

    let transcript = fetch_transcript_text(source, &video_id, config, policy).map_err(|err| {
        error!(video_id, %err, "transcript fetch failed");
        err
    })?;

    let markdown = generator
        .generate(&user_prompt(&transcript))
        .map_err(|err| {
            error!(video_id, %err, "outline generation failed");
            PipelineError::Generation(err.0)
        })?;

    let title = extract_title(&markdown);
    info!(video_id, title, "mindmap generated");

    Ok(MindmapResult {
        url: url.to_string(),
        video_id,
        title,
        markdown,
    })
}

#![forbid(unsafe_code)]

//! Transcript-to-outline pipeline glue for foldmap.
//!
//! Everything the navigation engine does not do lives here: turning a
//! video URL into an identifier, fetching the transcript (with retry and
//! backoff, behind a trait so transports stay pluggable), invoking an
//! opaque outline generator, and persisting past results in a capped
//! history store. The engine only ever sees the combined output — markdown
//! text.

pub mod generate;
pub mod history;
pub mod pipeline;
pub mod transcript;
pub mod video;

pub use generate::{GenerateError, OutlineGenerator, SYSTEM_PROMPT, user_prompt};
pub use history::{FileBackend, HistoryBackend, HistoryEntry, HistoryStore, MemoryBackend};
pub use pipeline::{MindmapResult, PipelineError, generate_mindmap};
pub use transcript::{
    RetryPolicy, TranscriptConfig, TranscriptError, TranscriptSegment, TranscriptSource,
    fetch_transcript_text,
};
pub use video::extract_video_id;

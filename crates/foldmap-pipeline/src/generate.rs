//! Outline generation contract and prompts.
//!
//! The generator is one opaque prompt-driven text call; the pipeline only
//! consumes its markdown output. Implementations wrap whatever model
//! backend the application uses.

use std::fmt;

/// Instructions for turning a transcript into a mind-map outline.
pub const SYSTEM_PROMPT: &str = "\
You are an expert at analyzing video transcripts and creating structured \
hierarchical summaries as markdown outlines for mindmap visualization.

Given a YouTube video transcript, create a structured markdown outline \
that captures the key topics, subtopics, and important details.

Rules:
- Use markdown headings (# ## ### ####) to create hierarchy
- The top-level # heading should be the main topic/title of the video
- Use 2-4 levels of depth depending on content complexity
- Use bullet points (- ) for leaf-level details under headings
- Keep each bullet point concise (under 10 words)
- Capture 5-10 main topics from the video
- Include key facts, numbers, names, and takeaways
- Do NOT include filler, repetition, or conversational artifacts like \"um\", \"uh\", \"you know\"
- Do NOT add any introduction, explanation, or commentary
- Output ONLY the markdown outline, nothing else";

/// User prompt carrying the transcript.
#[must_use]
pub fn user_prompt(transcript: &str) -> String {
    format!(
        "Create a structured markdown mindmap outline from this video transcript:\n\n{transcript}"
    )
}

/// Generation failure, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateError(pub String);

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outline generation failed: {}", self.0)
    }
}

impl std::error::Error for GenerateError {}

/// Opaque prompt-driven outline generator.
///
/// Implementations pair [`SYSTEM_PROMPT`] with the user prompt built by
/// [`user_prompt`] and return the raw markdown the model emits.
pub trait OutlineGenerator {
    /// Produce a markdown outline for one user prompt.
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

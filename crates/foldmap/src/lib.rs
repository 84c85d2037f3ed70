#![forbid(unsafe_code)]

//! Foldmap public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports common types from internal crates and offers a lightweight
//! prelude for day-to-day usage.

// --- Tree re-exports -------------------------------------------------------

pub use foldmap_tree::{AncestryIndex, Node, NodeId, OutlineTree};

// --- Engine re-exports -----------------------------------------------------

pub use foldmap_engine::{
    Direction, Engine, EngineError, HeadlessRenderer, InputDispatcher, InputSignal, LayoutError,
    LayoutTicket, Op, RenderCall, Renderer,
};

// --- Outline re-exports ----------------------------------------------------

pub use foldmap_outline::{build, extract_title};

// --- Pipeline re-exports ---------------------------------------------------

pub use foldmap_pipeline::{
    FileBackend, GenerateError, HistoryBackend, HistoryEntry, HistoryStore, MemoryBackend,
    MindmapResult, OutlineGenerator, PipelineError, RetryPolicy, TranscriptConfig, TranscriptError,
    TranscriptSegment, TranscriptSource, extract_video_id, generate_mindmap,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Direction, Engine, EngineError, HistoryStore, InputDispatcher, InputSignal, LayoutTicket,
        NodeId, OutlineTree, Renderer, build, extract_title, extract_video_id, generate_mindmap,
    };

    pub use crate::{engine, outline, pipeline, tree};
}

pub use foldmap_engine as engine;
pub use foldmap_outline as outline;
pub use foldmap_pipeline as pipeline;
pub use foldmap_tree as tree;

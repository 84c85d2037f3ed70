#![forbid(unsafe_code)]

//! Tree navigation and fold-state engine.
//!
//! The engine owns one in-memory outline tree, tracks which subtrees are
//! folded and which single node is focused, and implements the
//! keyboard-drivable operations over them: directional navigation, bulk
//! collapse/expand, and per-node toggling. It coordinates with an external
//! rendering layer through the [`Renderer`] contract; layout is the only
//! source of asynchrony and is modeled as a requested pass that later
//! *settles*, never as a thread the engine manages.
//!
//! # Single-flight rule
//!
//! At most one structural mutation (a fold change plus its layout pass) is
//! ever in flight. While one is pending, pure focus moves still apply
//! immediately — they cannot race with layout — and every operation that
//! may touch fold state is queued FIFO and drained after the pending pass
//! settles. There is no cancellation; a queued operation always waits.
//!
//! # One engine per document
//!
//! An [`Engine`] is constructed fresh for each loaded outline. Replacing
//! the document means dropping the engine and building a new one, which
//! makes a stale ancestry index or a focus pointing into a discarded tree
//! unrepresentable.

pub mod engine;
pub mod headless;
pub mod input;
pub mod renderer;

pub use engine::{Direction, Engine, EngineError, Op};
pub use headless::{HeadlessRenderer, RenderCall};
pub use input::{InputDispatcher, InputSignal};
pub use renderer::{LayoutError, LayoutTicket, Renderer};

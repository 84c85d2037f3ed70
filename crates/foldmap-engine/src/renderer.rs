//! Rendering-layer contract.
//!
//! The rendering layer performs animated layout and view transforms; the
//! engine never assumes layout is instantaneous. Each structural call
//! returns a [`LayoutTicket`]; the host delivers completion by calling
//! [`Engine::layout_settled`] with that ticket once animation settles.
//!
//! [`Engine::layout_settled`]: crate::engine::Engine::layout_settled

use std::fmt;

use foldmap_tree::{NodeId, OutlineTree};

/// Opaque handle for one in-flight layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutTicket(u64);

impl LayoutTicket {
    /// Wrap a renderer-chosen ticket value.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayoutTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout/{}", self.0)
    }
}

/// Failure reported by the rendering layer for a layout pass.
///
/// The engine never retries a failed layout; the recommended recovery is a
/// full re-render of the root via [`Engine::rerender`].
///
/// [`Engine::rerender`]: crate::engine::Engine::rerender
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The rendering layer rejected or aborted the pass.
    Failed(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(msg) => write!(f, "layout failed: {msg}"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// External rendering layer driven by the engine.
///
/// `render` and `toggle_node` start asynchronous, animated layout passes
/// and hand back tickets. `set_highlight`, `center_node`, and `fit` are
/// synchronous fire-and-forget view transforms.
///
/// The engine is the authority on fold flags: it mutates the tree before
/// calling `toggle_node`, and the renderer lays out from the flags it can
/// read on the tree it is given.
pub trait Renderer {
    /// (Re)lay out the subtree rooted at `scope`, honoring current fold
    /// flags. Resolves when animation settles.
    fn render(&mut self, tree: &OutlineTree, scope: NodeId) -> Result<LayoutTicket, LayoutError>;

    /// Re-lay out around a single node whose fold flag just changed.
    ///
    /// Shortcut for an animated single-node fold/unfold; equivalent in
    /// effect to `render` scoped to the node's parent region.
    fn toggle_node(&mut self, tree: &OutlineTree, node: NodeId)
    -> Result<LayoutTicket, LayoutError>;

    /// Move the focus highlight to `node`.
    fn set_highlight(&mut self, node: NodeId);

    /// Scroll/zoom so `node` is centered in the view.
    fn center_node(&mut self, node: NodeId);

    /// Re-fit the whole tree into the viewport.
    fn fit(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_round_trip() {
        let t = LayoutTicket::new(7);
        assert_eq!(t.value(), 7);
        assert_eq!(t, LayoutTicket::new(7));
        assert_eq!(t.to_string(), "layout/7");
    }

    #[test]
    fn layout_error_display() {
        let err = LayoutError::Failed("svg detached".into());
        assert_eq!(err.to_string(), "layout failed: svg detached");
    }
}

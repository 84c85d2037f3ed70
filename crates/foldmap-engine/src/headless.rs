//! Headless renderer with manual completion.
//!
//! Records every call the engine makes and allocates monotone tickets
//! without ever settling them on its own; the caller decides when a pass
//! "settles" by feeding the ticket back to the engine. Useful for driving
//! the engine without a visual layer and as the renderer double in tests.

use foldmap_tree::{NodeId, OutlineTree};

use crate::renderer::{LayoutError, LayoutTicket, Renderer};

/// One recorded rendering-layer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Render { scope: NodeId, ticket: LayoutTicket },
    ToggleNode { node: NodeId, ticket: LayoutTicket },
    SetHighlight(NodeId),
    CenterNode(NodeId),
    Fit,
}

/// Recording renderer that never settles layouts by itself.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_ticket: u64,
    calls: Vec<RenderCall>,
    last_ticket: Option<LayoutTicket>,
    fail_next: bool,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    /// Ticket of the most recently issued layout pass, if any.
    #[must_use]
    pub fn last_ticket(&self) -> Option<LayoutTicket> {
        self.last_ticket
    }

    /// Make the next `render`/`toggle_node` call fail once.
    pub fn fail_next_layout(&mut self) {
        self.fail_next = true;
    }

    fn issue(&mut self) -> Result<LayoutTicket, LayoutError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(LayoutError::Failed("simulated layout failure".into()));
        }
        self.next_ticket += 1;
        let ticket = LayoutTicket::new(self.next_ticket);
        self.last_ticket = Some(ticket);
        Ok(ticket)
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, _tree: &OutlineTree, scope: NodeId) -> Result<LayoutTicket, LayoutError> {
        let ticket = self.issue()?;
        self.calls.push(RenderCall::Render { scope, ticket });
        Ok(ticket)
    }

    fn toggle_node(
        &mut self,
        _tree: &OutlineTree,
        node: NodeId,
    ) -> Result<LayoutTicket, LayoutError> {
        let ticket = self.issue()?;
        self.calls.push(RenderCall::ToggleNode { node, ticket });
        Ok(ticket)
    }

    fn set_highlight(&mut self, node: NodeId) {
        self.calls.push(RenderCall::SetHighlight(node));
    }

    fn center_node(&mut self, node: NodeId) {
        self.calls.push(RenderCall::CenterNode(node));
    }

    fn fit(&mut self) {
        self.calls.push(RenderCall::Fit);
    }
}

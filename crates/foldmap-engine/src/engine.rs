//! The engine: fold-state controller, focus controller, and the
//! single-flight layout queue that keeps them honest.
//!
//! All legitimate edge cases (navigating past the root, descending into a
//! leaf, toggling a childless node) are silent no-ops so keyboard-driven
//! interaction stays forgiving. Errors are reserved for programmer-error
//! misuse: settling a ticket the engine never issued, or focusing a node
//! handle left over from a discarded tree.

use std::collections::VecDeque;
use std::fmt;

use foldmap_tree::{AncestryIndex, NodeId, OutlineTree};
use tracing::{debug, trace, warn};

use crate::renderer::{LayoutError, LayoutTicket, Renderer};

/// Directional navigation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One engine operation, as dispatched from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Directional navigation per the focus-controller rules.
    Navigate(Direction),
    /// Flip the focused node's fold state, keeping highlight anchored.
    ToggleFocused,
    /// Fold every subtree except the root's first level.
    CollapseAll,
    /// Unfold the whole tree.
    ExpandAll,
    /// Click-style direct focus on a node.
    Focus(NodeId),
}

impl Op {
    /// Whether this operation may mutate fold state and therefore must
    /// respect the single-flight rule.
    ///
    /// `Navigate(Right)` counts as structural even when the focused node
    /// turns out to be expanded: whether it unfolds depends on tree state
    /// at execution time, which a queued predecessor may change.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Op::Navigate(Direction::Right) | Op::ToggleFocused | Op::CollapseAll | Op::ExpandAll
        )
    }
}

/// Programmer-error-class misuse of the engine.
#[derive(Debug)]
pub enum EngineError {
    /// `layout_settled`/`layout_failed` called with a ticket that is not
    /// the pending one.
    UnknownTicket {
        got: LayoutTicket,
        pending: Option<LayoutTicket>,
    },
    /// A node handle that is not part of this engine's tree.
    UnknownNode(NodeId),
    /// The rendering layer failed a layout pass.
    Layout(LayoutError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTicket { got, pending: Some(p) } => {
                write!(f, "ticket {got} does not match pending {p}")
            }
            Self::UnknownTicket { got, pending: None } => {
                write!(f, "ticket {got} settled with no layout pending")
            }
            Self::UnknownNode(id) => write!(f, "node {id} is not part of the current tree"),
            Self::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for EngineError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

/// What to do once the pending layout pass settles.
#[derive(Debug, Clone, Copy)]
enum AfterLayout {
    /// Highlight and center a node (used when `right` reveals a child).
    Focus(NodeId),
    /// Re-fit the view, then highlight and center (used after fold ops).
    FitThenFocus(NodeId),
}

#[derive(Debug)]
struct Pending {
    ticket: LayoutTicket,
    then: AfterLayout,
}

/// Per-document navigation and fold-state engine.
///
/// Owns exactly one [`OutlineTree`], its derived [`AncestryIndex`], the
/// optional focus, and the renderer. Construct a new engine for each
/// loaded outline; the constructor builds the index, focuses the root,
/// and issues the initial full render (fit + root highlight once that
/// pass settles).
pub struct Engine<R: Renderer> {
    tree: OutlineTree,
    ancestry: AncestryIndex,
    focused: Option<NodeId>,
    renderer: R,
    pending: Option<Pending>,
    queue: VecDeque<Op>,
}

impl<R: Renderer> Engine<R> {
    /// Build an engine around a freshly built tree and request the
    /// initial layout of the whole tree.
    pub fn new(tree: OutlineTree, mut renderer: R) -> Result<Self, EngineError> {
        let ancestry = AncestryIndex::build(&tree);
        let root = tree.root();
        let ticket = renderer.render(&tree, root)?;
        debug!(nodes = tree.len(), %ticket, "engine created, initial render requested");
        Ok(Self {
            tree,
            ancestry,
            focused: Some(root),
            renderer,
            pending: Some(Pending {
                ticket,
                then: AfterLayout::FitThenFocus(root),
            }),
            queue: VecDeque::new(),
        })
    }

    /// The currently focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    #[must_use]
    pub fn tree(&self) -> &OutlineTree {
        &self.tree
    }

    #[must_use]
    pub fn ancestry(&self) -> &AncestryIndex {
        &self.ancestry
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Whether a layout pass is in flight.
    #[must_use]
    pub fn is_layout_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Operations waiting behind the in-flight layout.
    #[must_use]
    pub fn queued_ops(&self) -> usize {
        self.queue.len()
    }

    /// Apply one operation, honoring the single-flight rule.
    ///
    /// While a layout is pending, structural operations are queued and
    /// applied strictly after it settles; pure focus moves proceed
    /// immediately since they cannot race with the pending pass.
    pub fn apply(&mut self, op: Op) -> Result<(), EngineError> {
        if self.pending.is_some() && op.is_structural() {
            debug!(?op, queued = self.queue.len() + 1, "layout pending, queueing");
            self.queue.push_back(op);
            return Ok(());
        }
        self.execute(op)
    }

    /// Deliver completion of the pending layout pass.
    ///
    /// Runs the deferred focus/fit work for the settled pass, then drains
    /// queued operations until one starts a new pass (or the queue is
    /// empty).
    pub fn layout_settled(&mut self, ticket: LayoutTicket) -> Result<(), EngineError> {
        let Some(pending) = self.pending.take() else {
            return Err(EngineError::UnknownTicket {
                got: ticket,
                pending: None,
            });
        };
        if pending.ticket != ticket {
            let expected = pending.ticket;
            self.pending = Some(pending);
            return Err(EngineError::UnknownTicket {
                got: ticket,
                pending: Some(expected),
            });
        }
        trace!(%ticket, "layout settled");
        match pending.then {
            AfterLayout::Focus(node) => self.focus_node(node),
            AfterLayout::FitThenFocus(node) => {
                self.renderer.fit();
                self.focus_node(node);
            }
        }
        while self.pending.is_none() {
            let Some(op) = self.queue.pop_front() else { break };
            trace!(?op, "draining queued op");
            self.execute(op)?;
        }
        Ok(())
    }

    /// Deliver failure of the pending layout pass.
    ///
    /// Fold flags keep their logical values but the view is now stale;
    /// the queue is dropped so recovery via [`Engine::rerender`] starts
    /// from a clean slate.
    pub fn layout_failed(&mut self, ticket: LayoutTicket) -> Result<(), EngineError> {
        let Some(pending) = self.pending.take() else {
            return Err(EngineError::UnknownTicket {
                got: ticket,
                pending: None,
            });
        };
        if pending.ticket != ticket {
            let expected = pending.ticket;
            self.pending = Some(pending);
            return Err(EngineError::UnknownTicket {
                got: ticket,
                pending: Some(expected),
            });
        }
        warn!(%ticket, dropped = self.queue.len(), "layout failed, dropping queued ops");
        self.queue.clear();
        Ok(())
    }

    /// Recovery path after a failed layout: full re-render of the root,
    /// then fit and re-apply the current focus highlight.
    pub fn rerender(&mut self) -> Result<(), EngineError> {
        let root = self.tree.root();
        let ticket = self.renderer.render(&self.tree, root)?;
        let target = self.focused.unwrap_or(root);
        self.pending = Some(Pending {
            ticket,
            then: AfterLayout::FitThenFocus(target),
        });
        Ok(())
    }

    fn execute(&mut self, op: Op) -> Result<(), EngineError> {
        match op {
            Op::Navigate(direction) => self.navigate(direction),
            Op::ToggleFocused => self.toggle_focused(),
            Op::CollapseAll => self.collapse_all(),
            Op::ExpandAll => self.expand_all(),
            Op::Focus(node) => {
                if self.tree.get(node).is_none() {
                    return Err(EngineError::UnknownNode(node));
                }
                self.focus_node(node);
                Ok(())
            }
        }
    }

    /// Directional navigation.
    ///
    /// `right` conflates "reveal" and "descend": one key progressively
    /// drills in, unfolding on the way. `left` is strictly "go to parent"
    /// and never collapses, so collapsing only ever happens through a
    /// deliberate toggle or bulk operation.
    fn navigate(&mut self, direction: Direction) -> Result<(), EngineError> {
        let Some(current) = self.focused else {
            return Ok(());
        };
        match direction {
            Direction::Left => {
                if let Some(parent) = self.ancestry.parent(current) {
                    self.focus_node(parent);
                }
            }
            Direction::Up => {
                if let Some(parent) = self.ancestry.parent(current) {
                    let siblings = self.tree.children(parent);
                    let Some(pos) = siblings.iter().position(|&s| s == current) else {
                        return Ok(());
                    };
                    // first sibling wraps to the parent
                    let target = if pos == 0 { parent } else { siblings[pos - 1] };
                    self.focus_node(target);
                }
            }
            Direction::Down => {
                if let Some(parent) = self.ancestry.parent(current) {
                    let siblings = self.tree.children(parent);
                    let Some(pos) = siblings.iter().position(|&s| s == current) else {
                        return Ok(());
                    };
                    // last sibling wraps to the parent, not to the first sibling
                    let target = if pos + 1 == siblings.len() {
                        parent
                    } else {
                        siblings[pos + 1]
                    };
                    self.focus_node(target);
                }
            }
            Direction::Right => {
                let Some(&first) = self.tree.children(current).first() else {
                    return Ok(());
                };
                if self.tree.is_folded(current) {
                    // reveal, then descend once layout settles
                    self.tree.set_folded(current, false);
                    let ticket = self.renderer.toggle_node(&self.tree, current)?;
                    trace!(node = %current, %ticket, "unfold requested");
                    self.pending = Some(Pending {
                        ticket,
                        then: AfterLayout::Focus(first),
                    });
                } else {
                    self.focus_node(first);
                }
            }
        }
        Ok(())
    }

    /// Flip the focused node's fold state; once layout settles the view is
    /// re-fitted and highlight/center stay anchored to the same node.
    fn toggle_focused(&mut self) -> Result<(), EngineError> {
        let Some(current) = self.focused else {
            return Ok(());
        };
        if !self.tree.toggle(current) {
            return Ok(());
        }
        let ticket = self.renderer.toggle_node(&self.tree, current)?;
        trace!(node = %current, folded = self.tree.is_folded(current), %ticket, "toggle requested");
        self.pending = Some(Pending {
            ticket,
            then: AfterLayout::FitThenFocus(current),
        });
        Ok(())
    }

    fn collapse_all(&mut self) -> Result<(), EngineError> {
        self.tree.collapse_all();
        let root = self.tree.root();
        // focus moves to the root immediately; highlight follows on settle
        self.focused = Some(root);
        let ticket = self.renderer.render(&self.tree, root)?;
        debug!(%ticket, "collapse-all requested");
        self.pending = Some(Pending {
            ticket,
            then: AfterLayout::FitThenFocus(root),
        });
        Ok(())
    }

    fn expand_all(&mut self) -> Result<(), EngineError> {
        self.tree.expand_all();
        let root = self.tree.root();
        let target = self.focused.unwrap_or(root);
        let ticket = self.renderer.render(&self.tree, root)?;
        debug!(%ticket, "expand-all requested");
        self.pending = Some(Pending {
            ticket,
            then: AfterLayout::FitThenFocus(target),
        });
        Ok(())
    }

    /// Set focus and issue the view requests, highlight before center.
    fn focus_node(&mut self, node: NodeId) {
        self.focused = Some(node);
        self.renderer.set_highlight(node);
        self.renderer.center_node(node);
    }
}

impl<R: Renderer + fmt::Debug> fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("nodes", &self.tree.len())
            .field("focused", &self.focused)
            .field("pending", &self.pending)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessRenderer, RenderCall};

    /// a -> [b -> [d, e], c], all expanded, focus = a (settled).
    fn scenario() -> (Engine<HeadlessRenderer>, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = OutlineTree::new("a");
        let b = tree.add_child(tree.root(), "b");
        let c = tree.add_child(tree.root(), "c");
        let d = tree.add_child(b, "d");
        let e = tree.add_child(b, "e");
        let mut engine = Engine::new(tree, HeadlessRenderer::new()).unwrap();
        settle(&mut engine);
        engine.renderer_mut().take_calls();
        (engine, b, c, d, e)
    }

    fn settle(engine: &mut Engine<HeadlessRenderer>) {
        let ticket = engine.renderer().last_ticket().unwrap();
        engine.layout_settled(ticket).unwrap();
    }

    #[test]
    fn construction_renders_fits_and_focuses_root() {
        let tree = OutlineTree::new("a");
        let root = tree.root();
        let mut engine = Engine::new(tree, HeadlessRenderer::new()).unwrap();
        assert!(engine.is_layout_pending());
        assert_eq!(engine.focused(), Some(root));

        settle(&mut engine);
        let calls = engine.renderer_mut().take_calls();
        assert_eq!(
            calls,
            vec![
                RenderCall::Render {
                    scope: root,
                    ticket: LayoutTicket::new(1)
                },
                RenderCall::Fit,
                RenderCall::SetHighlight(root),
                RenderCall::CenterNode(root),
            ]
        );
    }

    #[test]
    fn right_descends_into_expanded_child_without_layout() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        assert_eq!(engine.focused(), Some(b));
        assert!(!engine.is_layout_pending());
        // no layout pass, highlight precedes center
        assert_eq!(
            engine.renderer_mut().take_calls(),
            vec![RenderCall::SetHighlight(b), RenderCall::CenterNode(b)]
        );
    }

    #[test]
    fn right_unfolds_then_focuses_first_child() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::ToggleFocused).unwrap(); // fold b
        settle(&mut engine);
        assert!(engine.tree().is_folded(b));

        engine.renderer_mut().take_calls();
        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        // unfolded logically, but focus waits for the layout to settle
        assert!(!engine.tree().is_folded(b));
        assert_eq!(engine.focused(), Some(b));
        assert!(engine.is_layout_pending());

        settle(&mut engine);
        let d = engine.tree().children(b)[0];
        assert_eq!(engine.focused(), Some(d));
    }

    #[test]
    fn right_on_leaf_is_noop() {
        let (mut engine, _b, c, ..) = scenario();
        engine.apply(Op::Focus(c)).unwrap();
        engine.renderer_mut().take_calls();
        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        assert_eq!(engine.focused(), Some(c));
        assert!(engine.renderer().calls().is_empty());
    }

    #[test]
    fn left_goes_to_parent_and_never_folds() {
        let (mut engine, b, _c, d, ..) = scenario();
        engine.apply(Op::Focus(d)).unwrap();
        engine.apply(Op::Navigate(Direction::Left)).unwrap();
        assert_eq!(engine.focused(), Some(b));
        assert!(!engine.tree().is_folded(b));
        engine.apply(Op::Navigate(Direction::Left)).unwrap();
        assert_eq!(engine.focused(), Some(engine.tree().root()));
    }

    #[test]
    fn root_boundary_is_noop_for_up_down_left() {
        let (mut engine, ..) = scenario();
        let root = engine.tree().root();
        for direction in [Direction::Up, Direction::Down, Direction::Left] {
            engine.apply(Op::Navigate(direction)).unwrap();
            assert_eq!(engine.focused(), Some(root));
        }
    }

    #[test]
    fn down_moves_to_next_sibling_then_wraps_to_parent() {
        let (mut engine, b, c, ..) = scenario();
        let root = engine.tree().root();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::Navigate(Direction::Down)).unwrap();
        assert_eq!(engine.focused(), Some(c));
        // c is the last sibling: wrap to parent, not to b
        engine.apply(Op::Navigate(Direction::Down)).unwrap();
        assert_eq!(engine.focused(), Some(root));
    }

    #[test]
    fn up_moves_to_previous_sibling_then_parent() {
        let (mut engine, b, _c, d, e) = scenario();
        engine.apply(Op::Focus(e)).unwrap();
        engine.apply(Op::Navigate(Direction::Up)).unwrap();
        assert_eq!(engine.focused(), Some(d));
        // d is the first sibling: up goes to the parent
        engine.apply(Op::Navigate(Direction::Up)).unwrap();
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn left_then_right_round_trip_when_expanded() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::Navigate(Direction::Left)).unwrap();
        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn toggle_focused_keeps_anchor_and_refits() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.renderer_mut().take_calls();

        engine.apply(Op::ToggleFocused).unwrap();
        assert!(engine.tree().is_folded(b));
        settle(&mut engine);
        assert_eq!(engine.focused(), Some(b));
        let calls = engine.renderer_mut().take_calls();
        assert!(matches!(calls[0], RenderCall::ToggleNode { node, .. } if node == b));
        assert_eq!(
            &calls[1..],
            &[
                RenderCall::Fit,
                RenderCall::SetHighlight(b),
                RenderCall::CenterNode(b)
            ]
        );
    }

    #[test]
    fn toggle_twice_with_settles_restores_fold_state() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::ToggleFocused).unwrap();
        settle(&mut engine);
        engine.apply(Op::ToggleFocused).unwrap();
        settle(&mut engine);
        assert!(!engine.tree().is_folded(b));
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn toggle_on_leaf_is_noop() {
        let (mut engine, _b, c, ..) = scenario();
        engine.apply(Op::Focus(c)).unwrap();
        engine.renderer_mut().take_calls();
        engine.apply(Op::ToggleFocused).unwrap();
        assert!(!engine.is_layout_pending());
        assert!(engine.renderer().calls().is_empty());
    }

    #[test]
    fn collapse_all_refocuses_root() {
        let (mut engine, b, _c, d, ..) = scenario();
        let root = engine.tree().root();
        engine.apply(Op::Focus(d)).unwrap();
        engine.apply(Op::CollapseAll).unwrap();
        assert_eq!(engine.focused(), Some(root));
        settle(&mut engine);
        assert_eq!(engine.focused(), Some(root));
        assert!(engine.tree().is_folded(b));
        assert!(!engine.tree().is_folded(root));

        // right from the always-expanded root still descends directly
        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn expand_all_keeps_focus() {
        let (mut engine, b, _c, d, ..) = scenario();
        engine.apply(Op::Focus(d)).unwrap();
        engine.apply(Op::CollapseAll).unwrap();
        settle(&mut engine);
        engine.apply(Op::ExpandAll).unwrap();
        settle(&mut engine);
        assert!(!engine.tree().is_folded(b));
        assert_eq!(engine.focused(), Some(engine.tree().root()));
    }

    #[test]
    fn full_navigation_walkthrough() {
        // A -> [B -> [D, E], C], all expanded, focus = A
        let (mut engine, b, c, ..) = scenario();
        let a = engine.tree().root();

        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        assert_eq!(engine.focused(), Some(b));
        engine.apply(Op::Navigate(Direction::Down)).unwrap();
        assert_eq!(engine.focused(), Some(c));
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::Navigate(Direction::Left)).unwrap();
        assert_eq!(engine.focused(), Some(a));

        engine.apply(Op::CollapseAll).unwrap();
        settle(&mut engine);
        assert_eq!(engine.focused(), Some(a));
        assert!(engine.tree().is_folded(b));
        engine.apply(Op::Navigate(Direction::Right)).unwrap();
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn structural_ops_queue_behind_pending_layout() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::ToggleFocused).unwrap(); // pass 1 in flight
        assert!(engine.is_layout_pending());

        engine.apply(Op::ToggleFocused).unwrap(); // must wait
        assert_eq!(engine.queued_ops(), 1);
        // still folded only once: the second toggle has not run
        assert!(engine.tree().is_folded(b));

        settle(&mut engine); // pass 1 settles, queued toggle starts pass 2
        assert!(engine.is_layout_pending());
        assert_eq!(engine.queued_ops(), 0);
        assert!(!engine.tree().is_folded(b));

        settle(&mut engine);
        assert!(!engine.is_layout_pending());
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn pure_focus_moves_bypass_pending_layout() {
        let (mut engine, b, c, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::ToggleFocused).unwrap(); // in flight
        engine.apply(Op::Navigate(Direction::Down)).unwrap();
        // applied immediately, no queueing
        assert_eq!(engine.focused(), Some(c));
        assert_eq!(engine.queued_ops(), 0);
    }

    #[test]
    fn settle_with_wrong_ticket_errors_and_keeps_pending() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::ToggleFocused).unwrap();
        let err = engine.layout_settled(LayoutTicket::new(999)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownTicket { .. }));
        assert!(engine.is_layout_pending());
    }

    #[test]
    fn settle_with_nothing_pending_errors() {
        let (mut engine, ..) = scenario();
        let err = engine.layout_settled(LayoutTicket::new(1)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownTicket { pending: None, .. }
        ));
    }

    #[test]
    fn focus_with_foreign_id_errors() {
        let (mut engine, ..) = scenario();
        let mut other = OutlineTree::new("other");
        let foreign = other.add_child(other.root(), "x");
        let before = engine.focused();
        let err = engine.apply(Op::Focus(foreign)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownNode(id) if id == foreign));
        assert_eq!(engine.focused(), before);
    }

    #[test]
    fn layout_failure_drops_queue_and_rerender_recovers() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.apply(Op::ToggleFocused).unwrap();
        engine.apply(Op::ToggleFocused).unwrap(); // queued
        let ticket = engine.renderer().last_ticket().unwrap();

        engine.layout_failed(ticket).unwrap();
        assert!(!engine.is_layout_pending());
        assert_eq!(engine.queued_ops(), 0);
        // the fold flag kept its logical value; only the view is stale
        assert!(engine.tree().is_folded(b));

        engine.renderer_mut().take_calls();
        engine.rerender().unwrap();
        settle(&mut engine);
        let calls = engine.renderer_mut().take_calls();
        let root = engine.tree().root();
        assert!(matches!(calls[0], RenderCall::Render { scope, .. } if scope == root));
        assert_eq!(engine.focused(), Some(b));
    }

    #[test]
    fn renderer_failure_propagates() {
        let (mut engine, b, ..) = scenario();
        engine.apply(Op::Focus(b)).unwrap();
        engine.renderer_mut().fail_next_layout();
        let err = engine.apply(Op::ToggleFocused).unwrap_err();
        assert!(matches!(err, EngineError::Layout(_)));
        assert!(!engine.is_layout_pending());
    }
}

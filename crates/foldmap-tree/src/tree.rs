//! Arena-backed outline tree with per-node fold flags.
//!
//! Nodes are addressed by [`NodeId`], a dense index assigned at build time.
//! Ids are stable for the lifetime of one tree instance and are never
//! derived from content (content can repeat). A rebuilt tree always starts
//! from fresh ids with every node expanded; no fold state survives a
//! rebuild.

use std::fmt;

/// Stable per-node handle, valid for the lifetime of one tree instance.
///
/// Ids from a discarded tree must not be used against a new one; lookups
/// with a foreign id return `None` rather than aliasing an unrelated node
/// only by accident of arena size, so callers are expected to drop ids
/// together with the tree they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena slot for this id.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One outline item: display text, ordered children, and a fold flag.
///
/// `folded` defaults to `false` (expanded) and is only meaningful for
/// nodes with children.
#[derive(Debug, Clone)]
pub struct Node {
    content: String,
    children: Vec<NodeId>,
    folded: bool,
}

impl Node {
    fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            children: Vec::new(),
            folded: false,
        }
    }

    /// Display text of this item.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Children in sibling-navigation order, fixed at build time.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node's children are hidden from the rendered view.
    #[must_use]
    pub fn is_folded(&self) -> bool {
        self.folded
    }
}

/// Rooted outline hierarchy.
///
/// Exactly one root, no cycles (children are only ever appended to nodes
/// already in the arena, so a node can never reach an ancestor), and every
/// non-root node appears in exactly one `children` list.
#[derive(Debug, Clone)]
pub struct OutlineTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl OutlineTree {
    /// Create a tree containing only the root (the outline title).
    #[must_use]
    pub fn new(root_content: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_content)],
            root: NodeId(0),
        }
    }

    /// Append a child under `parent`, returning the new node's id.
    ///
    /// Sibling order is append order and never changes afterwards.
    pub fn add_child(&mut self, parent: NodeId, content: impl Into<String>) -> NodeId {
        debug_assert!(parent.index() < self.nodes.len(), "parent from another tree");
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(content));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// The root node's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node; `None` for ids from a discarded tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Display text; empty for unknown ids.
    #[must_use]
    pub fn content(&self, id: NodeId) -> &str {
        self.get(id).map_or("", Node::content)
    }

    /// Children of `id` in fixed order; empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], Node::children)
    }

    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Fold flag; unknown ids read as expanded.
    #[must_use]
    pub fn is_folded(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_folded)
    }

    /// Set the fold flag directly. No-op for unknown ids.
    pub fn set_folded(&mut self, id: NodeId, folded: bool) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.folded = folded;
        }
    }

    /// Flip the fold flag of a node with children.
    ///
    /// Returns `true` if the flag changed; childless and unknown nodes are
    /// silent no-ops returning `false`.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if !self.has_children(id) {
            return false;
        }
        let node = &mut self.nodes[id.index()];
        node.folded = !node.folded;
        true
    }

    /// Fold every node with children except the root; the root is
    /// explicitly unfolded so its first-level children stay visible.
    ///
    /// Descendants of folded nodes are folded too, so later expanding a
    /// single branch reveals one level at a time.
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            if !node.children.is_empty() {
                node.folded = true;
            }
        }
        self.nodes[self.root.index()].folded = false;
    }

    /// Unfold every node, root included.
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.folded = false;
        }
    }

    /// Total node count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in arena order (root first).
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Count nodes visible under current fold flags, root included.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        fn walk(tree: &OutlineTree, id: NodeId) -> usize {
            let mut count = 1;
            if !tree.is_folded(id) {
                for &child in tree.children(id) {
                    count += walk(tree, child);
                }
            }
            count
        }
        walk(self, self.root)
    }
}

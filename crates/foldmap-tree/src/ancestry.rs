//! Derived parent-lookup table for one tree instance.
//!
//! Built by a single depth-first traversal when a tree is loaded and never
//! incrementally updated: fold and focus changes don't alter topology, and
//! topology never changes after build. Replacing the tree means replacing
//! the index with it — an index outliving its tree would silently navigate
//! into discarded nodes.

use crate::tree::{NodeId, OutlineTree};

/// Mapping from node id to parent id; the root maps to `None`.
#[derive(Debug, Clone)]
pub struct AncestryIndex {
    parent: Vec<Option<NodeId>>,
}

impl AncestryIndex {
    /// Build the index with one O(n) depth-first walk, children visited in
    /// their fixed order.
    #[must_use]
    pub fn build(tree: &OutlineTree) -> Self {
        let mut parent = vec![None; tree.len()];
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            for &child in tree.children(id) {
                parent[child.index()] = Some(id);
                stack.push(child);
            }
        }
        Self { parent }
    }

    /// Immediate parent of `id`; `None` for the root and for ids that are
    /// not part of the indexed tree.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id.index()).copied().flatten()
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

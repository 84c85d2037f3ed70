#![forbid(unsafe_code)]

//! Outline tree data model for foldmap.
//!
//! An [`OutlineTree`] is the rooted hierarchy of content nodes derived from
//! a markdown mind-map outline. Topology is fixed at build time; the only
//! mutable state is the per-node fold flag. Parent lookups go through a
//! derived [`AncestryIndex`] rather than stored back-pointers, keeping the
//! tree a simple owned-by-value arena.

pub mod ancestry;
pub mod tree;

pub use ancestry::AncestryIndex;
pub use tree::{Node, NodeId, OutlineTree};

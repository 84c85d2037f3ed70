#![forbid(unsafe_code)]

//! Markdown outline to [`OutlineTree`] builder.
//!
//! Turns a markdown mind-map outline (headings for hierarchy, list items
//! for leaf detail) into the tree the engine navigates. `build` is a pure
//! function of its input: every call returns a freshly allocated tree with
//! all nodes expanded and fresh ids — reloading the same content
//! deliberately loses prior fold and focus state, so "regenerate" always
//! yields a clean view.

pub mod builder;

pub use builder::{build, extract_title};

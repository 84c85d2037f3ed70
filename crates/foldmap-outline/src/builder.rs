//! Event-walk outline parser.
//!
//! Headings nest by level (`##` under `#`, skipped levels allowed); list
//! items nest under the current heading and under each other by list
//! depth. Inline formatting is flattened to plain text — the tree carries
//! display text only.

use foldmap_tree::{NodeId, OutlineTree};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const UNTITLED: &str = "Untitled Mindmap";

/// Staging node collected during the event walk.
#[derive(Debug)]
struct RawItem {
    text: String,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
struct Forest {
    items: Vec<RawItem>,
    /// Indices of items with no parent (document top level).
    top: Vec<usize>,
}

impl Forest {
    fn push(&mut self, parent: Option<usize>) -> usize {
        let idx = self.items.len();
        self.items.push(RawItem {
            text: String::new(),
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.items[p].children.push(idx),
            None => self.top.push(idx),
        }
        idx
    }
}

/// Build a fresh outline tree from markdown text.
///
/// Exactly one top-level item becomes the root; zero or several top-level
/// items hang under a synthetic "Untitled Mindmap" root so the tree always
/// has exactly one root.
#[must_use]
pub fn build(markdown: &str) -> OutlineTree {
    let forest = parse(markdown);

    if let [single] = forest.top[..] {
        let mut tree = OutlineTree::new(forest.items[single].text.clone());
        let root = tree.root();
        attach_children(&mut tree, root, &forest, single);
        return tree;
    }

    let mut tree = OutlineTree::new(UNTITLED);
    let root = tree.root();
    for &idx in &forest.top {
        attach(&mut tree, root, &forest, idx);
    }
    tree
}

fn attach(tree: &mut OutlineTree, parent: NodeId, forest: &Forest, idx: usize) {
    let id = tree.add_child(parent, forest.items[idx].text.clone());
    attach_children(tree, id, forest, idx);
}

fn attach_children(tree: &mut OutlineTree, id: NodeId, forest: &Forest, idx: usize) {
    for &child in &forest.items[idx].children {
        attach(tree, id, forest, child);
    }
}

fn parse(markdown: &str) -> Forest {
    let mut forest = Forest::default();

    // (level, staging index) of open headings, outermost first
    let mut headings: Vec<(usize, usize)> = Vec::new();
    // staging indices of currently open list items
    let mut item_stack: Vec<usize> = Vec::new();
    // where inline text currently accumulates
    let mut collecting: Option<usize> = None;

    for event in Parser::new_ext(markdown, Options::empty()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let level = level as usize;
                // lists don't continue across headings
                item_stack.clear();
                while headings.last().is_some_and(|&(l, _)| l >= level) {
                    headings.pop();
                }
                let parent = headings.last().map(|&(_, idx)| idx);
                let idx = forest.push(parent);
                headings.push((level, idx));
                collecting = Some(idx);
            }
            Event::End(TagEnd::Heading(_)) => {
                collecting = None;
            }
            Event::Start(Tag::Item) => {
                let parent = item_stack
                    .last()
                    .copied()
                    .or_else(|| headings.last().map(|&(_, idx)| idx));
                let idx = forest.push(parent);
                item_stack.push(idx);
                collecting = Some(idx);
            }
            Event::End(TagEnd::Item) => {
                item_stack.pop();
                collecting = item_stack.last().copied();
            }
            Event::Start(Tag::List(_)) => {
                // a nested list closes its parent item's inline text
                collecting = None;
            }
            Event::End(TagEnd::List(_)) => {}
            Event::Text(text) | Event::Code(text) => {
                if let Some(idx) = collecting {
                    forest.items[idx].text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(idx) = collecting {
                    forest.items[idx].text.push(' ');
                }
            }
            _ => {}
        }
    }

    for item in &mut forest.items {
        let trimmed = item.text.trim();
        if trimmed.len() != item.text.len() {
            item.text = trimmed.to_string();
        }
    }
    forest
}

/// Title of the outline: text of the first `#` heading, else
/// "Untitled Mindmap".
#[must_use]
pub fn extract_title(markdown: &str) -> String {
    let mut in_h1 = false;
    let mut title = String::new();
    for event in Parser::new_ext(markdown, Options::empty()) {
        match event {
            Event::Start(Tag::Heading { level: HeadingLevel::H1, .. }) => in_h1 = true,
            Event::End(TagEnd::Heading(_)) if in_h1 => {
                let trimmed = title.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
                in_h1 = false;
                title.clear();
            }
            Event::Text(text) | Event::Code(text) if in_h1 => title.push_str(&text),
            Event::SoftBreak | Event::HardBreak if in_h1 => title.push(' '),
            _ => {}
        }
    }
    UNTITLED.to_string()
}

//! Path-based stable identities.
//!
//! Nodes are rebuilt every frame, so identity comes from where a node sits in the tree rather than
//! from the object. A node under parent path `P` with kind `K`, label `U` and sibling index `i`
//! (counted per `(P, K)`) is named `P/K#i(U)`. Identical trees therefore receive identical IDs,
//! and inserting a same-kind sibling before a node shifts that node's index.
//!
//! A label containing `/`, `#` or parentheses can in principle produce the same string as a
//! different path. Such a collision is logged and otherwise accepted.

use crate::node::{Node, StableId};
use std::collections::{HashMap, HashSet};

/// Assigns stable IDs and records which IDs were seen this frame
#[derive(Debug, Default)]
pub struct IdRegistrar {
    counters: HashMap<String, usize>,
    seen: HashSet<StableId>,
}

impl IdRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-frame counters and the seen set
    pub fn begin_frame(&mut self) {
        self.counters.clear();
        self.seen.clear();
    }

    /// Assign IDs to `root` and every descendant, depth-first in child order
    pub fn assign_ids(&mut self, root: &mut Node, root_seed: &str) {
        self.assign(root, root_seed);
    }

    fn assign(&mut self, node: &mut Node, parent_path: &str) {
        let kind = node.kind.name();
        let counter = self
            .counters
            .entry(format!("{parent_path}/{kind}"))
            .or_insert(0);
        let index = *counter;
        *counter += 1;

        let id = StableId::new(format!(
            "{parent_path}/{kind}#{index}({})",
            node.user_id.as_deref().unwrap_or("")
        ));
        if !self.seen.insert(id.clone()) {
            log::warn!("Stable ID {id} registered twice in one frame");
        }

        for child in &mut node.children {
            self.assign(child, id.as_str());
        }
        node.stable_id = Some(id);
    }

    /// IDs registered since the last `begin_frame`
    pub fn seen(&self) -> &HashSet<StableId> {
        &self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(node: &Node, out: &mut Vec<String>) {
        out.push(node.stable_id().map(|id| id.to_string()).unwrap_or_default());
        for child in node.children() {
            ids(child, out);
        }
    }

    fn build() -> Node {
        Node::container().with_id("app").with_children([
            Node::button("One"),
            Node::text("hello"),
            Node::button("Two").with_id("second"),
            Node::container().with_child(Node::image("cat.png")),
        ])
    }

    fn assign(root: &mut Node) -> Vec<String> {
        let mut registrar = IdRegistrar::new();
        registrar.begin_frame();
        registrar.assign_ids(root, "root");
        let mut out = Vec::new();
        ids(root, &mut out);
        out
    }

    #[test]
    fn test_id_format() {
        let mut root = build();
        let out = assign(&mut root);
        assert_eq!(
            out,
            vec![
                "root/Container#0(app)",
                "root/Container#0(app)/Button#0()",
                "root/Container#0(app)/Text#0()",
                "root/Container#0(app)/Button#1(second)",
                "root/Container#0(app)/Container#0()",
                "root/Container#0(app)/Container#0()/Image#0()",
            ]
        );
    }

    #[test]
    fn test_identical_trees_get_identical_ids() {
        let mut a = build();
        let mut b = build();
        assert_eq!(assign(&mut a), assign(&mut b));
    }

    #[test]
    fn test_inserting_same_kind_sibling_shifts_ids() {
        let mut before = Node::container().with_child(Node::button("B"));
        let mut after = Node::container()
            .with_child(Node::button("A"))
            .with_child(Node::button("B"));

        let before = assign(&mut before);
        let after = assign(&mut after);
        assert_eq!(before[1], "root/Container#0()/Button#0()");
        assert_eq!(after[2], "root/Container#0()/Button#1()");
    }

    #[test]
    fn test_other_kind_sibling_does_not_shift() {
        let mut before = Node::container().with_child(Node::button("B"));
        let mut after = Node::container()
            .with_child(Node::text("label"))
            .with_child(Node::button("B"));
        assert_eq!(assign(&mut before)[1], assign(&mut after)[2]);
    }

    #[test]
    fn test_duplicate_labels_accepted() {
        let mut root = Node::container()
            .with_child(Node::text("a").with_id("dup"))
            .with_child(Node::text("b").with_id("dup"));
        let out = assign(&mut root);
        assert_ne!(out[1], out[2]);
    }

    #[test]
    fn test_begin_frame_resets_counters() {
        let mut registrar = IdRegistrar::new();
        let mut first = Node::container();
        let mut second = Node::container();

        registrar.begin_frame();
        registrar.assign_ids(&mut first, "root");
        registrar.begin_frame();
        registrar.assign_ids(&mut second, "root");

        assert_eq!(first.stable_id(), second.stable_id());
        assert_eq!(registrar.seen().len(), 1);
    }
}

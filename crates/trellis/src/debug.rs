//! Human-readable dumps of a laid-out tree

use crate::node::{Node, PositionMode};
use std::fmt::Write;

/// Format the visible part of the tree, one node per line, indented by depth.
///
/// ```text
/// [app(Container) size 200.0x80.0 at 0.0,0.0 Relative z 0]
///   [(Button) size 50.0x34.0 at 0.0,0.0 Relative z 1]
/// ```
pub fn format_tree(root: &Node) -> String {
    let mut out = String::new();
    write_node(root, 0, &mut out);
    out
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    if !node.is_visible() {
        return;
    }
    let layout = node.computed_layout().copied().unwrap_or_default();
    let mode = match node.position().mode {
        PositionMode::Relative => "Relative",
        PositionMode::Absolute => "Absolute",
    };
    let _ = writeln!(
        out,
        "{:indent$}[{}({}) size {:.1}x{:.1} at {:.1},{:.1} {} z {}]",
        "",
        node.user_id().unwrap_or(""),
        node.kind().name(),
        layout.size.x,
        layout.size.y,
        layout.rect.min[0],
        layout.rect.min[1],
        mode,
        layout.z_index,
        indent = depth * 2,
    );
    for child in node.children() {
        write_node(child, depth + 1, out);
    }
}

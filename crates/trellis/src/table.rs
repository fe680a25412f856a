//! Table expansion.
//!
//! A table node is shorthand for a container of rows. Before identities are assigned, every table
//! in the tree is replaced by:
//!
//! ```text
//! Container (table's own id, size, position, border, z-index)
//! ├── Container "header"   (Block)
//! │   └── Container "cell#i" ── Text (wrapped)
//! └── Container "row#i"    (Block)
//!     └── Container "cell#i" ── Text (wrapped)
//! ```
//!
//! Every column is `column_width` wide except the last, which is `last_column_width` wide.

use crate::color::{css, Color};
use crate::node::{Display, Node, NodeKind, TableData, DEFAULT_FONT_SIZE};
use crate::primitives::Vec2;
use trellis_macros::WithBuilders;

/// Visual parameters used when a table is expanded
#[derive(Clone, Debug, PartialEq, WithBuilders)]
pub struct TableStyle {
    #[with_builders(non_negative)]
    pub column_width: f32,
    #[with_builders(non_negative)]
    pub last_column_width: f32,
    #[with_builders(non_negative)]
    pub column_gap: f32,
    #[with_builders(non_negative)]
    pub row_gap: f32,
    pub padding: Vec2,
    #[with_builders(non_negative)]
    pub border_radius: f32,
    pub background: Color,
    pub header_background: Color,
    pub row_background: Color,
    pub cell_background: Color,
    #[with_builders(non_negative)]
    pub font_size: f32,
    pub font_color: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            column_width: 100.0,
            last_column_width: 400.0,
            column_gap: 10.0,
            row_gap: 10.0,
            padding: Vec2::new(3.0, 4.0),
            border_radius: 10.0,
            background: css::GRAY,
            header_background: css::TRANSPARENT,
            row_background: css::TRANSPARENT,
            cell_background: css::TRANSPARENT,
            font_size: DEFAULT_FONT_SIZE,
            font_color: css::BLACK,
        }
    }
}

/// Replace every table in the tree with its container expansion.
///
/// Returns the number of tables expanded.
pub fn expand_tables(node: &mut Node) -> usize {
    let mut expanded = 0;
    if matches!(node.kind, NodeKind::Table(_)) {
        let table = std::mem::replace(node, Node::container());
        *node = expand(table);
        expanded += 1;
    }
    for child in &mut node.children {
        expanded += expand_tables(child);
    }
    expanded
}

fn expand(table: Node) -> Node {
    let NodeKind::Table(data) = table.kind else {
        unreachable!("expand called on a non-table node");
    };
    let TableData {
        header,
        rows,
        style,
    } = data;

    let mut container = Node::container()
        .with_display(table.display)
        .with_position(table.position)
        .with_size(table.size.x, table.size.y)
        .with_width_percent(table.width_percent)
        .with_height_percent(table.height_percent)
        .with_margin(table.margin)
        .with_border(table.border)
        .with_border_color(table.border_color)
        .with_z_index(table.z_index)
        .with_background_color(style.background)
        .with_border_radius(style.border_radius)
        .with_gap(Vec2::new(0.0, style.row_gap))
        .with_padding(style.padding);
    container.user_id = table.user_id;
    container.flex = table.flex;

    if !header.is_empty() {
        container = container.with_child(row("header", &header, style.header_background, &style));
    }
    for (i, cells) in rows.iter().enumerate() {
        container =
            container.with_child(row(&format!("row#{i}"), cells, style.row_background, &style));
    }
    container
}

fn row(id: &str, cells: &[String], background: Color, style: &TableStyle) -> Node {
    let last = cells.len().saturating_sub(1);
    Node::container()
        .with_id(id)
        .with_display(Display::Block)
        .with_gap(Vec2::new(style.column_gap, 0.0))
        .with_background_color(background)
        .with_children(cells.iter().enumerate().map(|(i, cell)| {
            let width = if i == last {
                style.last_column_width
            } else {
                style.column_width
            };
            Node::container()
                .with_id(format!("cell#{i}"))
                .with_width(width)
                .with_background_color(style.cell_background)
                .with_child(
                    Node::text(cell.as_str())
                        .with_wrapped(true)
                        .with_font_size(style.font_size)
                        .with_text_color(style.font_color),
                )
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Node {
        Node::table()
            .with_id("scores")
            .with_z_index(3)
            .with_header(["Name", "Score", "Notes"])
            .with_row(["ada", "10", "first"])
            .with_row(["bob", "7", "second"])
    }

    #[test]
    fn test_expand_shape() {
        let mut root = Node::container().with_child(sample_table());
        assert_eq!(expand_tables(&mut root), 1);

        let table = &root.children()[0];
        assert!(matches!(table.kind(), NodeKind::Container));
        assert_eq!(table.user_id(), Some("scores"));
        assert_eq!(table.z_index(), 3);
        assert_eq!(table.background_color(), css::GRAY);
        assert_eq!(table.border_radius(), 10.0);
        assert_eq!(table.padding(), Vec2::new(3.0, 4.0));
        assert_eq!(table.gap(), Vec2::new(0.0, 10.0));

        let ids: Vec<_> = table.children().iter().map(|c| c.user_id()).collect();
        assert_eq!(ids, vec![Some("header"), Some("row#0"), Some("row#1")]);

        let header = &table.children()[0];
        assert_eq!(header.display(), Display::Block);
        assert_eq!(header.gap(), Vec2::new(10.0, 0.0));
        let widths: Vec<_> = header.children().iter().map(|c| c.size().x).collect();
        assert_eq!(widths, vec![100.0, 100.0, 400.0]);

        let cell_text = &header.children()[1].children()[0];
        match cell_text.kind() {
            NodeKind::Text(text) => {
                assert_eq!(text.content, "Score");
                assert!(text.wrapped);
            }
            _ => panic!("cell should hold text"),
        }
    }

    #[test]
    fn test_custom_style() {
        let style = TableStyle::default()
            .with_column_width(50.0)
            .with_last_column_width(-10.0)
            .with_font_size(12.0);
        let mut root = Node::table()
            .with_row(["a", "b"])
            .with_table_style(style);
        expand_tables(&mut root);

        // No header row when the header is empty
        assert_eq!(root.children().len(), 1);
        let widths: Vec<_> = root.children()[0]
            .children()
            .iter()
            .map(|c| c.size().x)
            .collect();
        assert_eq!(widths, vec![50.0, 0.0]);
    }

    #[test]
    fn test_nested_tables_expand() {
        let mut root = Node::container()
            .with_child(Node::container().with_child(sample_table()))
            .with_child(sample_table());
        assert_eq!(expand_tables(&mut root), 2);
    }
}

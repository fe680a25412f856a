//! Two-pass box layout.
//!
//! 1. [`LayoutEngine::calculate_size`] walks the tree bottom-up and stores every visible node's
//!    border-box size.
//! 2. [`LayoutEngine::calculate_position`] walks top-down, flowing each container's children left
//!    to right and wrapping onto new lines, and stores relative offsets, absolute rectangles and
//!    effective z-indices.
//!
//! Both passes break lines with the same [`LineBreaker`] against the same limit, the child width
//! the size pass resolved, so a container's children wrap at the same places in both.

use crate::error::{Error, Result};
use crate::measure::TextMeasurer;
use crate::node::{ComputedLayout, Display, Node, NodeKind};
use crate::primitives::{Point, Rect, Vec2};

/// Space between a button's label and its edges
pub const DEFAULT_BUTTON_INSET: Vec2 = Vec2::new(15.0, 5.0);

/// A child as seen by its parent's flow: margin-inclusive size and whether it is a block
#[derive(Clone, Copy, Debug)]
struct FlowItem {
    size: Vec2,
    block: bool,
}

impl FlowItem {
    fn of(child: &Node, size: Vec2) -> Self {
        Self {
            size: size + child.margin * 2.0,
            block: child.display == Display::Block,
        }
    }
}

/// Greedy line breaking shared by the size and position passes.
///
/// A new line starts before an item when the current line is non-empty and the item is a block,
/// the previous item was a block, the limit is not positive, or the item would overflow the limit.
#[derive(Debug)]
struct LineBreaker {
    limit: f32,
    gap: Vec2,
    /// `x` within the current line, `y` of the current line's top
    cursor: Vec2,
    line_height: f32,
    line_items: usize,
    previous_block: bool,
    widest: f32,
}

impl LineBreaker {
    fn new(limit: f32, gap: Vec2) -> Self {
        Self {
            limit,
            gap,
            cursor: Vec2::ZERO,
            line_height: 0.0,
            line_items: 0,
            previous_block: false,
            widest: 0.0,
        }
    }

    /// Place an item and return the offset of its margin box from the content origin
    fn place(&mut self, item: FlowItem) -> Vec2 {
        if self.line_items > 0
            && (item.block
                || self.previous_block
                || self.limit <= 0.0
                || self.cursor.x + self.gap.x + item.size.x > self.limit)
        {
            self.finish_line();
        }
        if self.line_items > 0 {
            self.cursor.x += self.gap.x;
        }

        let offset = self.cursor;
        self.cursor.x += item.size.x;
        self.line_height = self.line_height.max(item.size.y);
        self.line_items += 1;
        self.previous_block = item.block;
        // An item wider than the limit still dictates the content width
        self.widest = self.widest.max(item.size.x);
        offset
    }

    fn finish_line(&mut self) {
        self.widest = self.widest.max(self.cursor.x);
        self.cursor.y += self.line_height;
        if self.line_items > 1 {
            self.cursor.y += self.gap.y;
        }
        self.cursor.x = 0.0;
        self.line_height = 0.0;
        self.line_items = 0;
    }

    /// Size of all placed items; the last line adds no gap
    fn content_size(&self) -> Vec2 {
        if self.line_items == 0 {
            return Vec2::new(self.widest, self.cursor.y);
        }
        Vec2::new(
            self.widest.max(self.cursor.x),
            self.cursor.y + self.line_height,
        )
    }
}

fn in_flow(child: &Node) -> bool {
    child.display != Display::None && !child.position.is_absolute()
}

/// Computes sizes and positions for a node tree
pub struct LayoutEngine<'a> {
    measurer: &'a mut dyn TextMeasurer,
    button_inset: Vec2,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(measurer: &'a mut dyn TextMeasurer) -> Self {
        Self {
            measurer,
            button_inset: DEFAULT_BUTTON_INSET,
        }
    }

    pub fn with_button_inset(mut self, inset: Vec2) -> Self {
        self.button_inset = inset.non_negative();
        self
    }

    /// Lay out `root` at `origin` within `available` space.
    ///
    /// A measurement failure aborts the layout; nodes already visited keep partial results.
    pub fn layout(&mut self, root: &mut Node, origin: Point, available: Vec2) -> Result<()> {
        self.calculate_size(root, available)?;
        self.calculate_position(root, origin, origin, None);

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Layout tree:\n{}", crate::debug::format_tree(root));
        }
        Ok(())
    }

    fn measure(&mut self, text: &str, font_size: f32) -> Result<f32> {
        self.measurer
            .measure_width(text, font_size)
            .map_err(|source| Error::Measure {
                text: text.to_string(),
                font_size,
                source,
            })
    }

    /// Pass 1: compute and store the border-box size of `node` and its descendants.
    ///
    /// # Panics
    /// If a table node has not been expanded.
    pub fn calculate_size(&mut self, node: &mut Node, available: Vec2) -> Result<Vec2> {
        if node.display == Display::None {
            node.computed = None;
            return Ok(Vec2::ZERO);
        }

        let pb = node.padding + node.border;
        let mut fixed = node.size;
        if node.width_percent > 0.0 {
            fixed.x = (available.x - 2.0 * pb.x) * node.width_percent / 100.0;
        }
        if node.height_percent > 0.0 {
            fixed.y = (available.y - 2.0 * pb.y) * node.height_percent / 100.0;
        }
        let fixed_width = fixed.x > 0.0;
        let fixed_height = fixed.y > 0.0;

        let content = match &mut node.kind {
            NodeKind::Container => {
                let mut child_available = available - pb * 2.0;
                if fixed_width {
                    child_available.x = fixed.x - 2.0 * pb.x;
                }
                if fixed_height {
                    child_available.y = fixed.y - 2.0 * pb.y;
                }
                let child_available = child_available.non_negative();
                node.flow_limit = child_available.x;

                let mut sizes = Vec::with_capacity(node.children.len());
                for child in &mut node.children {
                    sizes.push(self.calculate_size(child, child_available)?);
                }

                if fixed_width && fixed_height {
                    (fixed - pb * 2.0).non_negative()
                } else {
                    let mut lines = LineBreaker::new(child_available.x, node.gap);
                    for (child, size) in node.children.iter().zip(sizes) {
                        if in_flow(child) {
                            lines.place(FlowItem::of(child, size));
                        }
                    }
                    lines.content_size()
                }
            }
            NodeKind::Text(text) => {
                let font_size = text.font_size;
                if text.wrapped {
                    let limit = available.x - 2.0 * pb.x;
                    let (lines, widest) = self.wrap_words(&text.content, font_size, limit)?;
                    let height = lines.len() as f32 * font_size;
                    text.lines = lines;
                    Vec2::new(widest, height)
                } else {
                    let width = self.measure(&text.content, font_size)?;
                    text.lines = vec![text.content.clone()];
                    Vec2::new(width, font_size)
                }
            }
            NodeKind::Button(button) => {
                let width = self.measure(&button.label, button.font_size)?;
                button.label_width = width;
                Vec2::new(width, button.font_size) + self.button_inset * 2.0
            }
            NodeKind::Image(_) => node.size,
            NodeKind::Table(_) => {
                panic!("Table reached layout without being expanded; call expand_tables first")
            }
        };

        let mut size = content + pb * 2.0;
        if fixed_width {
            size.x = fixed.x;
        }
        if fixed_height {
            size.y = fixed.y;
        }
        let size = size.non_negative();

        node.computed = Some(ComputedLayout {
            size,
            ..ComputedLayout::default()
        });
        Ok(size)
    }

    /// Greedy word packing. A word wider than `limit` gets a line of its own.
    fn wrap_words(
        &mut self,
        content: &str,
        font_size: f32,
        limit: f32,
    ) -> Result<(Vec<String>, f32)> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0f32;
        let mut widest = 0.0f32;

        for word in content.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let width = self.measure(&candidate, font_size)?;

            if current.is_empty() || width <= limit {
                current = candidate;
                current_width = width;
            } else {
                widest = widest.max(current_width);
                lines.push(std::mem::take(&mut current));
                current_width = self.measure(word, font_size)?;
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            widest = widest.max(current_width);
            lines.push(current);
        }
        Ok((lines, widest))
    }

    /// Pass 2: place `node` and its descendants.
    ///
    /// `origin` is where the parent's flow put the node's border box; absolute nodes use their
    /// own coordinates instead. `parent_z` is `None` for the root.
    pub fn calculate_position(
        &self,
        node: &mut Node,
        origin: Point,
        parent_origin: Point,
        parent_z: Option<i32>,
    ) {
        if node.display == Display::None {
            return;
        }

        let absolute = node.position.is_absolute();
        let origin = if absolute {
            Point::new(node.position.x, node.position.y)
        } else {
            origin
        };
        let z_index = match parent_z {
            Some(parent) if !absolute => node.z_index + parent + 1,
            _ => node.z_index,
        };

        let Some(computed) = node.computed.as_mut() else {
            // Sized by a pass that failed part way
            return;
        };
        computed.relative = Vec2::new(origin.x - parent_origin.x, origin.y - parent_origin.y);
        computed.rect = Rect::from_min_size(origin, computed.size);
        computed.z_index = z_index;

        if !matches!(node.kind, NodeKind::Container) {
            return;
        }

        let pb = node.padding + node.border;
        let mut lines = LineBreaker::new(node.flow_limit, node.gap);
        for child in &mut node.children {
            if child.display == Display::None {
                continue;
            }
            if child.position.is_absolute() {
                self.calculate_position(child, origin, origin, Some(z_index));
                continue;
            }

            let size = child.computed.map(|c| c.size).unwrap_or_default();
            let offset = lines.place(FlowItem::of(child, size));
            let child_origin = origin.offset(pb + offset + child.margin);
            self.calculate_position(child, child_origin, origin, Some(z_index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::measure::MonospaceMeasurer;
    use crate::node::Position;

    /// 10px per character at any font size
    fn fixed_advance(text: &str, _font_size: f32) -> std::result::Result<f32, MeasureError> {
        Ok(text.chars().count() as f32 * 10.0)
    }

    fn run(root: &mut Node, available: Vec2) {
        let mut measurer = fixed_advance;
        LayoutEngine::new(&mut measurer)
            .layout(root, Point::zero(), available)
            .unwrap();
    }

    fn rect(node: &Node) -> Rect {
        node.computed_layout().unwrap().rect
    }

    #[test]
    fn test_wrapping_boundary() {
        let mut root = Node::container()
            .with_width(100.0)
            .with_child(Node::container().with_size(60.0, 20.0))
            .with_child(Node::container().with_size(60.0, 30.0));
        run(&mut root, Vec2::new(500.0, 500.0));

        assert_eq!(rect(&root.children()[0]).min, [0.0, 0.0]);
        assert_eq!(rect(&root.children()[1]).min, [0.0, 20.0]);
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_inline_children_share_line_with_gap() {
        let mut root = Node::container()
            .with_gap(Vec2::new(5.0, 7.0))
            .with_children([
                Node::container().with_size(40.0, 10.0),
                Node::container().with_size(40.0, 20.0),
                Node::container().with_size(40.0, 10.0),
            ]);
        run(&mut root, Vec2::new(100.0, 100.0));

        let mins: Vec<_> = root.children().iter().map(|c| rect(c).min).collect();
        assert_eq!(mins, vec![[0.0, 0.0], [45.0, 0.0], [0.0, 27.0]]);
        // Two lines: 20 + gap 7 (first line held two items) + 10
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(85.0, 37.0));
    }

    #[test]
    fn test_block_breaks_before_and_after() {
        let mut root = Node::container().with_children([
            Node::container().with_size(10.0, 10.0),
            Node::container()
                .with_size(10.0, 10.0)
                .with_display(Display::Block),
            Node::container().with_size(10.0, 10.0),
        ]);
        run(&mut root, Vec2::new(1000.0, 1000.0));

        let ys: Vec<_> = root.children().iter().map(|c| rect(c).min[1]).collect();
        assert_eq!(ys, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_zero_limit_wraps_every_child() {
        let mut root = Node::container().with_children([
            Node::container().with_size(10.0, 10.0),
            Node::container().with_size(10.0, 10.0),
        ]);
        run(&mut root, Vec2::ZERO);

        assert_eq!(rect(&root.children()[1]).min, [0.0, 10.0]);
    }

    #[test]
    fn test_oversized_child_sets_content_width() {
        let mut root = Node::container()
            .with_child(Node::container().with_size(300.0, 10.0));
        run(&mut root, Vec2::new(100.0, 100.0));
        assert_eq!(root.computed_layout().unwrap().size.x, 300.0);
    }

    #[test]
    fn test_percent_resolution() {
        let mut root = Node::container()
            .with_size(200.0, 100.0)
            .with_child(Node::container().with_width_percent(50.0).with_height(10.0));
        run(&mut root, Vec2::new(800.0, 600.0));

        assert_eq!(
            root.children()[0].computed_layout().unwrap().size,
            Vec2::new(100.0, 10.0)
        );
    }

    #[test]
    fn test_percent_subtracts_own_padding_and_border() {
        let mut root = Node::container().with_child(
            Node::container()
                .with_width_percent(50.0)
                .with_padding(Vec2::new(10.0, 0.0))
                .with_border(Vec2::new(5.0, 0.0)),
        );
        run(&mut root, Vec2::new(230.0, 100.0));
        // (230 - 2 * 15) * 0.5
        assert_eq!(root.children()[0].computed_layout().unwrap().size.x, 100.0);
    }

    #[test]
    fn test_padding_margin_and_border_offsets() {
        let mut root = Node::container()
            .with_padding(Vec2::new(4.0, 3.0))
            .with_border(Vec2::new(1.0, 2.0))
            .with_child(
                Node::container()
                    .with_size(10.0, 10.0)
                    .with_margin(Vec2::new(2.0, 1.0)),
            );
        run(&mut root, Vec2::new(100.0, 100.0));

        let child = root.children()[0].computed_layout().unwrap();
        assert_eq!(child.rect.min, [7.0, 6.0]);
        assert_eq!(child.relative, Vec2::new(7.0, 6.0));
        // content 14x12 plus 2 * (5, 5)
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(24.0, 22.0));
    }

    #[test]
    fn test_nested_origin_accumulates() {
        let mut root = Node::container().with_padding(Vec2::splat(10.0)).with_child(
            Node::container()
                .with_padding(Vec2::splat(5.0))
                .with_child(Node::container().with_size(1.0, 1.0)),
        );
        let mut measurer = fixed_advance;
        LayoutEngine::new(&mut measurer)
            .layout(&mut root, Point::new(100.0, 50.0), Vec2::new(400.0, 400.0))
            .unwrap();

        let inner = &root.children()[0].children()[0];
        assert_eq!(rect(inner).min, [115.0, 65.0]);
        assert_eq!(inner.computed_layout().unwrap().relative, Vec2::splat(5.0));
    }

    #[test]
    fn test_absolute_child_uses_own_coordinates() {
        let mut root = Node::container()
            .with_padding(Vec2::splat(20.0))
            .with_children([
                Node::container()
                    .with_size(50.0, 50.0)
                    .with_position(Position::absolute(300.0, 400.0)),
                Node::container().with_size(10.0, 10.0),
            ]);
        run(&mut root, Vec2::new(1000.0, 1000.0));

        assert_eq!(rect(&root.children()[0]).min, [300.0, 400.0]);
        // Out of flow: the sibling starts the first line and the parent ignores the absolute size
        assert_eq!(rect(&root.children()[1]).min, [20.0, 20.0]);
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_hidden_children_are_skipped() {
        let mut root = Node::container().with_children([
            Node::container()
                .with_size(50.0, 50.0)
                .with_display(Display::None)
                .with_child(Node::container().with_size(5.0, 5.0)),
            Node::container().with_size(10.0, 10.0),
        ]);
        run(&mut root, Vec2::new(1000.0, 1000.0));

        assert!(root.children()[0].computed_layout().is_none());
        assert!(root.children()[0].children()[0].computed_layout().is_none());
        assert_eq!(rect(&root.children()[1]).min, [0.0, 0.0]);
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_effective_z_index() {
        let mut root = Node::container().with_z_index(2).with_children([
            Node::container().with_z_index(3),
            Node::container()
                .with_z_index(7)
                .with_absolute_position(0.0, 0.0)
                .with_child(Node::container()),
        ]);
        run(&mut root, Vec2::new(100.0, 100.0));

        let z = |n: &Node| n.computed_layout().unwrap().z_index;
        assert_eq!(z(&root), 2);
        assert_eq!(z(&root.children()[0]), 6);
        assert_eq!(z(&root.children()[1]), 7);
        assert_eq!(z(&root.children()[1].children()[0]), 8);
    }

    #[test]
    fn test_text_sizes() {
        let mut root = Node::container().with_children([
            Node::text("hello").with_font_size(20.0),
            Node::text("alpha beta gamma")
                .with_wrapped(true)
                .with_display(Display::Block),
        ]);
        run(&mut root, Vec2::new(110.0, 500.0));

        let plain = &root.children()[0];
        assert_eq!(plain.computed_layout().unwrap().size, Vec2::new(50.0, 20.0));

        let wrapped = &root.children()[1];
        assert_eq!(
            wrapped.text_lines().unwrap(),
            &["alpha beta".to_string(), "gamma".to_string()]
        );
        assert_eq!(wrapped.computed_layout().unwrap().size, Vec2::new(100.0, 32.0));
    }

    #[test]
    fn test_overlong_word_gets_its_own_line() {
        let mut root = Node::text("a incomprehensibilities b").with_wrapped(true);
        run(&mut root, Vec2::new(50.0, 500.0));

        assert_eq!(
            root.text_lines().unwrap(),
            &[
                "a".to_string(),
                "incomprehensibilities".to_string(),
                "b".to_string()
            ]
        );
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(210.0, 48.0));
    }

    #[test]
    fn test_button_size_uses_inset() {
        let mut root = Node::button("OK");
        run(&mut root, Vec2::new(500.0, 500.0));
        // 20 + 2 * 15, 24 + 2 * 5
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(50.0, 34.0));

        let mut measurer = MonospaceMeasurer::new(0.5);
        let mut root = Node::button("OK");
        LayoutEngine::new(&mut measurer)
            .with_button_inset(Vec2::ZERO)
            .layout(&mut root, Point::zero(), Vec2::new(500.0, 500.0))
            .unwrap();
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(24.0, 24.0));
    }

    #[test]
    fn test_fixed_size_smaller_than_padding_clamps() {
        let mut root = Node::container()
            .with_size(4.0, 4.0)
            .with_padding(Vec2::splat(10.0))
            .with_child(Node::container().with_size(10.0, 10.0));
        run(&mut root, Vec2::new(100.0, 100.0));
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_oversized_child_keeps_later_lines_apart() {
        let mut root = Node::container().with_children([
            Node::container().with_size(30.0, 10.0),
            Node::container().with_size(150.0, 10.0),
            Node::container().with_size(60.0, 10.0),
            Node::container().with_size(60.0, 10.0),
        ]);
        run(&mut root, Vec2::new(100.0, 100.0));

        // Content grew to 150 but the children still wrap against 100
        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(150.0, 40.0));
        let mins: Vec<_> = root.children().iter().map(|c| rect(c).min).collect();
        assert_eq!(mins, vec![[0.0, 0.0], [0.0, 10.0], [0.0, 20.0], [0.0, 30.0]]);
    }

    #[test]
    fn test_zero_available_width_positions_one_per_line() {
        let mut root = Node::container().with_children([
            Node::container().with_height(10.0),
            Node::container().with_size(5.0, 10.0),
        ]);
        run(&mut root, Vec2::ZERO);

        assert_eq!(root.computed_layout().unwrap().size, Vec2::new(5.0, 20.0));
        assert_eq!(rect(&root.children()[0]).min, [0.0, 0.0]);
        assert_eq!(rect(&root.children()[1]).min, [0.0, 10.0]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        fn walk(node: &Node, out: &mut Vec<ComputedLayout>) {
            out.extend(node.computed_layout().copied());
            for child in node.children() {
                walk(child, out);
            }
        }
        let snapshot = |node: &Node| {
            let mut out = Vec::new();
            walk(node, &mut out);
            out
        };

        let mut root = Node::container().with_gap(Vec2::new(3.0, 4.0)).with_children([
            Node::text("some wrapped words here").with_wrapped(true),
            Node::button("Press"),
            Node::container()
                .with_width_percent(30.0)
                .with_child(Node::image("x.png").with_size(20.0, 20.0)),
            Node::container().with_size(400.0, 10.0),
        ]);
        run(&mut root, Vec2::new(240.0, 300.0));
        let first = snapshot(&root);

        // The second run starts from the layout the first one stored
        run(&mut root, Vec2::new(240.0, 300.0));
        assert_eq!(snapshot(&root), first);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_measure_error_propagates() {
        let mut failing =
            |_: &str, _: f32| -> std::result::Result<f32, MeasureError> { Err(MeasureError::NoFont) };
        let mut root = Node::container().with_child(Node::text("boom").with_font_size(12.0));
        let err = LayoutEngine::new(&mut failing)
            .layout(&mut root, Point::zero(), Vec2::new(100.0, 100.0))
            .unwrap_err();

        assert_eq!(
            err,
            Error::Measure {
                text: "boom".to_string(),
                font_size: 12.0,
                source: MeasureError::NoFont,
            }
        );
    }

    #[test]
    #[should_panic(expected = "without being expanded")]
    fn test_unexpanded_table_panics() {
        let mut root = Node::table().with_row(["a"]);
        run(&mut root, Vec2::new(100.0, 100.0));
    }
}

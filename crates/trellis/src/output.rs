//! Draw list generation.
//!
//! The laid-out tree is flattened into [`DrawCommand`]s, sorted by effective z-index. Nodes with
//! equal z-index keep tree order, so later siblings paint over earlier ones.

use crate::color::Color;
use crate::node::{Node, NodeKind, StableId};
use crate::primitives::{Point, Rect, Vec2};

/// Filled, optionally bordered, rounded rectangle
#[derive(Clone, Debug, PartialEq)]
pub struct RectPrimitive {
    pub fill: Color,
    pub border: Vec2,
    pub border_color: Color,
    pub radius: f32,
}

/// Lines of text stacked top to bottom, one `font_size` apart
#[derive(Clone, Debug, PartialEq)]
pub struct TextPrimitive {
    /// Area the first line starts in
    pub rect: Rect,
    pub lines: Vec<String>,
    pub font_size: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect(RectPrimitive),
    Text(TextPrimitive),
    Image { path: String },
}

/// One thing for the backend to draw
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub stable_id: Option<StableId>,
    /// Border box of the node that produced the command
    pub rect: Rect,
    pub z_index: i32,
    /// Position in tree traversal (for stable ordering)
    pub tree_index: usize,
    pub primitive: Primitive,
}

/// Everything a frame produced for the backend and the application
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    /// Ascending by z-index
    pub commands: Vec<DrawCommand>,
    /// Buttons clicked this frame
    pub clicks: Vec<StableId>,
}

impl FrameOutput {
    pub fn was_clicked(&self, id: &StableId) -> bool {
        self.clicks.contains(id)
    }
}

/// Flatten the visible, laid-out tree into draw commands sorted by z-index
pub fn generate_draw_commands(root: &Node) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let mut tree_index = 0;
    collect(root, &mut commands, &mut tree_index);

    // Stable: equal z-index keeps tree order
    commands.sort_by_key(|command| command.z_index);
    commands
}

fn collect(node: &Node, commands: &mut Vec<DrawCommand>, tree_index: &mut usize) {
    if !node.is_visible() {
        return;
    }
    let Some(layout) = node.computed_layout() else {
        return;
    };
    let index = *tree_index;
    *tree_index += 1;

    let mut push = |primitive: Primitive| {
        commands.push(DrawCommand {
            stable_id: node.stable_id().cloned(),
            rect: layout.rect,
            z_index: layout.z_index,
            tree_index: index,
            primitive,
        })
    };
    let background = |fill: Color| {
        Primitive::Rect(RectPrimitive {
            fill,
            border: node.border,
            border_color: node.border_color,
            radius: node.border_radius,
        })
    };

    match &node.kind {
        NodeKind::Container => push(background(node.background_color)),
        NodeKind::Text(text) => {
            let inset = node.padding + node.border;
            let rect = Rect::new(
                [layout.rect.min[0] + inset.x, layout.rect.min[1] + inset.y],
                [layout.rect.max[0] - inset.x, layout.rect.max[1] - inset.y],
            );
            push(Primitive::Text(TextPrimitive {
                rect,
                lines: text.lines.clone(),
                font_size: text.font_size,
                color: text.color,
            }));
        }
        NodeKind::Button(button) => {
            let fill = if button.is_pressed {
                button.pressed_color
            } else if button.is_hovered {
                button.hover_color
            } else {
                node.background_color
            };
            push(background(fill));

            let label = Vec2::new(button.label_width, button.font_size);
            let center = Point::new(
                (layout.rect.min[0] + layout.rect.max[0]) / 2.0,
                (layout.rect.min[1] + layout.rect.max[1]) / 2.0,
            );
            let min = Point::new(center.x - label.x / 2.0, center.y - label.y / 2.0);
            push(Primitive::Text(TextPrimitive {
                rect: Rect::from_min_size(min, label),
                lines: vec![button.label.clone()],
                font_size: button.font_size,
                color: button.text_color,
            }));
        }
        NodeKind::Image(image) => push(Primitive::Image {
            path: image.path.clone(),
        }),
        NodeKind::Table(_) => {
            panic!("Table reached draw generation without being expanded")
        }
    }

    for child in node.children() {
        collect(child, commands, tree_index);
    }
}

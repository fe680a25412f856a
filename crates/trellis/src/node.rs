use crate::color::{css, Color};
use crate::primitives::{Rect, Vec2};
use crate::table::TableStyle;

/// Default font size for text nodes
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Font size used for button labels
pub const BUTTON_FONT_SIZE: f32 = 24.0;

pub const BUTTON_BACKGROUND: Color = Color::rgb(0.2, 0.4, 0.8);
pub const BUTTON_HOVER: Color = Color::rgb(0.3, 0.5, 0.9);
pub const BUTTON_PRESSED: Color = Color::rgb(0.1, 0.3, 0.7);

/// Identifier assigned by [`crate::identity::IdRegistrar`].
///
/// Derived from the node's path in the tree, so the same conceptual widget gets the same ID in
/// every frame as long as the tree shape up to it is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableId(String);

impl StableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StableId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    /// Placed by the flow layout
    #[default]
    Relative,
    /// Placed at the caller-supplied coordinates, outside the flow
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub mode: PositionMode,
}

impl Position {
    pub const fn relative() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            mode: PositionMode::Relative,
        }
    }

    pub const fn absolute(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            mode: PositionMode::Absolute,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.mode == PositionMode::Absolute
    }
}

/// How a node participates in its parent's flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Occupies a line of its own
    Block,
    /// Flows left to right and wraps
    #[default]
    Inline,
    /// Reserved, laid out as `Inline`
    Flex,
    /// Reserved, laid out as `Inline`
    Grid,
    /// Not laid out, hit-tested or drawn
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    #[default]
    Auto,
    Start,
    Center,
    End,
    Stretch,
}

/// Flex item properties. Stored on every node; the flow layout does not read them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    pub grow: f32,
    pub shrink: f32,
    /// `None` means auto
    pub basis: Option<f32>,
    pub align_self: AlignSelf,
    pub order: i32,
}

impl Default for FlexItem {
    fn default() -> Self {
        Self {
            grow: 0.0,
            shrink: 1.0,
            basis: None,
            align_self: AlignSelf::Auto,
            order: 0,
        }
    }
}

/// Layout output for a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComputedLayout {
    /// Border-box size
    pub size: Vec2,
    /// Offset from the parent's origin
    pub relative: Vec2,
    /// Absolute border-box rectangle
    pub rect: Rect,
    /// Effective stacking order
    pub z_index: i32,
}

pub struct TextData {
    pub content: String,
    pub color: Color,
    pub font_size: f32,
    pub wrapped: bool,
    /// Lines produced by the last layout
    pub(crate) lines: Vec<String>,
}

pub type ClickCallback = Box<dyn FnMut()>;

pub struct ButtonData {
    pub label: String,
    pub(crate) on_click: Option<ClickCallback>,
    pub hover_color: Color,
    pub pressed_color: Color,
    pub text_color: Color,
    pub font_size: f32,
    pub is_hovered: bool,
    pub is_pressed: bool,
    /// Label width measured by the last layout
    pub(crate) label_width: f32,
}

pub struct ImageData {
    pub path: String,
}

pub struct TableData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

/// Kind-specific payload of a node
pub enum NodeKind {
    Container,
    Text(TextData),
    Button(ButtonData),
    Image(ImageData),
    /// Expanded into containers before any other pass
    Table(TableData),
}

impl NodeKind {
    /// Kind name used in stable IDs
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Container => "Container",
            NodeKind::Text(_) => "Text",
            NodeKind::Button(_) => "Button",
            NodeKind::Image(_) => "Image",
            NodeKind::Table(_) => "Table",
        }
    }
}

/// One widget in the frame's tree.
///
/// Built fresh every frame with the `with_*` methods and consumed by
/// [`crate::context::FrameContext::run_frame`]. Children are owned, so a node has exactly one
/// parent and the tree cannot contain cycles.
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) user_id: Option<String>,
    pub(crate) stable_id: Option<StableId>,
    pub(crate) position: Position,
    /// Declared size; zero on an axis means derive from content
    pub(crate) size: Vec2,
    pub(crate) width_percent: f32,
    pub(crate) height_percent: f32,
    pub(crate) margin: Vec2,
    pub(crate) padding: Vec2,
    pub(crate) border: Vec2,
    pub(crate) border_radius: f32,
    pub(crate) gap: Vec2,
    pub(crate) display: Display,
    pub(crate) z_index: i32,
    pub(crate) background_color: Color,
    pub(crate) border_color: Color,
    pub(crate) flex: FlexItem,
    pub(crate) children: Vec<Node>,
    pub(crate) computed: Option<ComputedLayout>,
    /// Line width the size pass wrapped this container's children against
    pub(crate) flow_limit: f32,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            user_id: None,
            stable_id: None,
            position: Position::relative(),
            size: Vec2::ZERO,
            width_percent: 0.0,
            height_percent: 0.0,
            margin: Vec2::ZERO,
            padding: Vec2::ZERO,
            border: Vec2::ZERO,
            border_radius: 0.0,
            gap: Vec2::ZERO,
            display: Display::Inline,
            z_index: 0,
            background_color: css::TRANSPARENT,
            border_color: css::BLACK,
            flex: FlexItem::default(),
            children: Vec::new(),
            computed: None,
            flow_limit: 0.0,
        }
    }

    pub fn container() -> Self {
        Self::with_kind(NodeKind::Container)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text(TextData {
            content: content.into(),
            color: css::BLACK,
            font_size: DEFAULT_FONT_SIZE,
            wrapped: false,
            lines: Vec::new(),
        }))
    }

    /// Buttons default to `Display::Block`
    pub fn button(label: impl Into<String>) -> Self {
        let mut node = Self::with_kind(NodeKind::Button(ButtonData {
            label: label.into(),
            on_click: None,
            hover_color: BUTTON_HOVER,
            pressed_color: BUTTON_PRESSED,
            text_color: css::WHITE,
            font_size: BUTTON_FONT_SIZE,
            is_hovered: false,
            is_pressed: false,
            label_width: 0.0,
        }));
        node.display = Display::Block;
        node.background_color = BUTTON_BACKGROUND;
        node
    }

    /// Image leaf; sized by its declared size only
    pub fn image(path: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Image(ImageData { path: path.into() }))
    }

    pub fn table() -> Self {
        Self::with_kind(NodeKind::Table(TableData {
            header: Vec::new(),
            rows: Vec::new(),
            style: TableStyle::default(),
        }))
    }

    // Shared setters

    /// Set the caller-supplied label. Need not be unique.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Take the node out of the flow and place it at `(x, y)`
    pub fn with_absolute_position(self, x: f32, y: f32) -> Self {
        self.with_position(Position::absolute(x, y))
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height).non_negative();
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.size.x = width.max(0.0);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.size.y = height.max(0.0);
        self
    }

    /// Request a percentage (0-100) of the parent's available width
    pub fn with_width_percent(mut self, percent: f32) -> Self {
        self.width_percent = percent.clamp(0.0, 100.0);
        self
    }

    /// Request a percentage (0-100) of the parent's available height
    pub fn with_height_percent(mut self, percent: f32) -> Self {
        self.height_percent = percent.clamp(0.0, 100.0);
        self
    }

    pub fn with_margin(mut self, margin: Vec2) -> Self {
        self.margin = margin.non_negative();
        self
    }

    pub fn with_padding(mut self, padding: Vec2) -> Self {
        self.padding = padding.non_negative();
        self
    }

    pub fn with_border(mut self, border: Vec2) -> Self {
        self.border = border.non_negative();
        self
    }

    pub fn with_border_radius(mut self, radius: f32) -> Self {
        self.border_radius = radius.max(0.0);
        self
    }

    /// Spacing between flow items (`x`) and between lines (`y`)
    pub fn with_gap(mut self, gap: Vec2) -> Self {
        self.gap = gap.non_negative();
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn with_flex_grow(mut self, grow: f32) -> Self {
        self.flex.grow = grow;
        self
    }

    pub fn with_flex_shrink(mut self, shrink: f32) -> Self {
        self.flex.shrink = shrink;
        self
    }

    pub fn with_flex_basis(mut self, basis: Option<f32>) -> Self {
        self.flex.basis = basis;
        self
    }

    pub fn with_align_self(mut self, align: AlignSelf) -> Self {
        self.flex.align_self = align;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.flex.order = order;
        self
    }

    /// Add a child node
    pub fn with_child(mut self, child: Node) -> Self {
        assert!(
            matches!(self.kind, NodeKind::Container),
            "Cannot add children to a {} node",
            self.kind.name()
        );
        self.children.push(child);
        self
    }

    /// Add multiple children
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        assert!(
            matches!(self.kind, NodeKind::Container),
            "Cannot add children to a {} node",
            self.kind.name()
        );
        self.children.extend(children);
        self
    }

    // Kind-specific setters. Calling one on the wrong kind is a bug in the caller.

    fn text_data_mut(&mut self, setter: &str) -> &mut TextData {
        match &mut self.kind {
            NodeKind::Text(text) => text,
            other => panic!("{setter} called on a {} node", other.name()),
        }
    }

    fn button_data_mut(&mut self, setter: &str) -> &mut ButtonData {
        match &mut self.kind {
            NodeKind::Button(button) => button,
            other => panic!("{setter} called on a {} node", other.name()),
        }
    }

    fn table_data_mut(&mut self, setter: &str) -> &mut TableData {
        match &mut self.kind {
            NodeKind::Table(table) => table,
            other => panic!("{setter} called on a {} node", other.name()),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.text_data_mut("with_content").content = content.into();
        self
    }

    /// Text color (Text and Button nodes)
    pub fn with_text_color(mut self, color: Color) -> Self {
        match &mut self.kind {
            NodeKind::Text(text) => text.color = color,
            NodeKind::Button(button) => button.text_color = color,
            other => panic!("with_text_color called on a {} node", other.name()),
        }
        self
    }

    /// Non-positive sizes fall back to the default
    pub fn with_font_size(mut self, size: f32) -> Self {
        let size = if size <= 0.0 { DEFAULT_FONT_SIZE } else { size };
        self.text_data_mut("with_font_size").font_size = size;
        self
    }

    pub fn with_wrapped(mut self, wrapped: bool) -> Self {
        self.text_data_mut("with_wrapped").wrapped = wrapped;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.button_data_mut("with_label").label = label.into();
        self
    }

    /// Callback fired once when the pointer is released over a pressed button
    pub fn on_click(mut self, callback: impl FnMut() + 'static) -> Self {
        self.button_data_mut("on_click").on_click = Some(Box::new(callback));
        self
    }

    pub fn with_hover_color(mut self, color: Color) -> Self {
        self.button_data_mut("with_hover_color").hover_color = color;
        self
    }

    pub fn with_pressed_color(mut self, color: Color) -> Self {
        self.button_data_mut("with_pressed_color").pressed_color = color;
        self
    }

    pub fn with_header<S: Into<String>>(mut self, header: impl IntoIterator<Item = S>) -> Self {
        self.table_data_mut("with_header").header = header.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_row<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.table_data_mut("with_row")
            .rows
            .push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_rows<R, S>(mut self, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = self.table_data_mut("with_rows");
        for row in rows {
            table.rows.push(row.into_iter().map(Into::into).collect());
        }
        self
    }

    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.table_data_mut("with_table_style").style = style;
        self
    }

    // Getters

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Assigned during the frame; `None` before ID assignment
    pub fn stable_id(&self) -> Option<&StableId> {
        self.stable_id.as_ref()
    }

    pub fn display(&self) -> Display {
        self.display
    }

    /// Overwrite the display mode, e.g. to hide a widget from a click handler's aftermath
    pub fn set_display(&mut self, display: Display) {
        self.display = display;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn margin(&self) -> Vec2 {
        self.margin
    }

    pub fn padding(&self) -> Vec2 {
        self.padding
    }

    pub fn border(&self) -> Vec2 {
        self.border
    }

    pub fn gap(&self) -> Vec2 {
        self.gap
    }

    pub fn border_radius(&self) -> f32 {
        self.border_radius
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn flex_item(&self) -> &FlexItem {
        &self.flex
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Layout output; `None` until laid out or when `Display::None`
    pub fn computed_layout(&self) -> Option<&ComputedLayout> {
        self.computed.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.display != Display::None
    }

    /// `(is_hovered, is_pressed)` for buttons
    pub fn button_state(&self) -> Option<(bool, bool)> {
        match &self.kind {
            NodeKind::Button(button) => Some((button.is_hovered, button.is_pressed)),
            _ => None,
        }
    }

    /// Lines of a laid-out text node
    pub fn text_lines(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::Text(text) => Some(&text.lines),
            _ => None,
        }
    }

    /// Find a node by stable ID (depth-first)
    pub fn find(&self, id: &StableId) -> Option<&Node> {
        if self.stable_id.as_ref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Find the first node carrying the given user label (depth-first)
    pub fn find_by_user_id(&self, user_id: &str) -> Option<&Node> {
        if self.user_id.as_deref() == Some(user_id) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_by_user_id(user_id))
    }

    /// Number of nodes in this subtree, including `self`
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

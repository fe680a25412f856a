//! Headless trellis demo.
//!
//! Rebuilds a tabbed UI every frame (a tab bar of buttons, a chessboard, nested containers, a
//! table and a box-model panel, plus an absolutely positioned badge), replays a scripted pointer
//! session through synthetic winit events and logs what each frame produced.
//!
//! `RUST_LOG=debug` adds per-frame summaries and the draw list; `RUST_LOG=trace` adds the
//! laid-out tree.

use std::cell::Cell;
use std::rc::Rc;

use trellis::{
    css, Color, Display, FrameConfig, FrameContext, FrameOutput, InputState, MonospaceMeasurer,
    MouseButton, Node, Point, Primitive, Result, TableStyle, Vec2,
};
use trellis_text::CosmicMeasurer;
use trellis_winit::WinitInputExt;
use winit::dpi::PhysicalPosition;
use winit::event::{DeviceId, ElementState, WindowEvent};

const WINDOW: Vec2 = Vec2::new(800.0, 800.0);

/// (button label id, label, panel id)
const TABS: [(&str, &str, &str); 4] = [
    ("tab_chess", "Chessboard", "panel_chess"),
    ("tab_nested", "Nested Containers", "panel_nested"),
    ("tab_table", "Table", "panel_table"),
    ("tab_box", "Margin Padding Border", "panel_box"),
];

fn chessboard() -> Node {
    let square = 40.0;
    Node::container()
        .with_id("chessboard")
        .with_size(square * 8.0, square * 8.0)
        .with_children((0..64).map(|i| {
            let (x, y) = (i % 8, i / 8);
            let color = match i {
                2 => css::RED,
                8 => css::ORANGE,
                63 => css::GREEN,
                _ if (x + y) % 2 == 0 => css::WHITE,
                _ => css::BLACK,
            };
            Node::container()
                .with_id(format!("square_{i}"))
                .with_size(square, square)
                .with_background_color(color)
        }))
}

fn nested_containers(depth: usize) -> Node {
    let shade = 0.2 + 0.15 * depth as f32;
    let node = Node::container()
        .with_padding(Vec2::splat(8.0))
        .with_border(Vec2::splat(1.0))
        .with_border_radius(4.0)
        .with_background_color(Color::rgb(shade, shade, 0.9))
        .with_child(Node::text(format!("level {depth}")).with_display(Display::Block));
    if depth == 0 {
        node
    } else {
        node.with_child(nested_containers(depth - 1))
    }
}

fn table() -> Node {
    Node::table()
        .with_id("scores")
        .with_border(Vec2::splat(1.0))
        .with_header(["Player", "Score", "Notes"])
        .with_rows([
            ["ada", "12", "won the first round without dropping a point"],
            ["grace", "9", "steady"],
            ["linus", "7", "late start"],
        ])
        .with_table_style(TableStyle::default().with_last_column_width(300.0))
}

fn box_model() -> Node {
    Node::container()
        .with_gap(Vec2::new(10.0, 10.0))
        .with_children((1..=3).map(|i| {
            let step = i as f32 * 4.0;
            Node::container()
                .with_margin(Vec2::splat(step))
                .with_padding(Vec2::splat(step))
                .with_border(Vec2::splat(i as f32))
                .with_border_color(css::PURPLE)
                .with_background_color(css::YELLOW)
                .with_child(Node::text(format!("m{step} p{step} b{i}")))
        }))
}

/// Build the whole tree for one frame
fn build_ui(selected: &Rc<Cell<usize>>) -> Node {
    let tab_bar = Node::container()
        .with_id("tab_bar")
        .with_width_percent(100.0)
        .with_z_index(999)
        .with_background_color(css::GRAY)
        .with_border_radius(5.0)
        .with_border(Vec2::splat(1.0))
        .with_padding(Vec2::splat(4.0))
        .with_gap(Vec2::splat(3.0))
        .with_margin(Vec2::splat(3.0))
        .with_display(Display::Block)
        .with_children(TABS.iter().enumerate().map(|(index, (id, label, _))| {
            let selected = Rc::clone(selected);
            Node::button(*label)
                .with_id(*id)
                .with_display(Display::Inline)
                .on_click(move || selected.set(index))
        }));

    let panels = [chessboard(), nested_containers(3), table(), box_model()];
    let panels = panels.into_iter().zip(TABS).enumerate().map(|(index, (panel, tab))| {
        // Only the first frame's display counts; later switches go through the state store
        let display = if index == selected.get() {
            Display::Block
        } else {
            Display::None
        };
        Node::container()
            .with_id(tab.2)
            .with_display(display)
            .with_padding(Vec2::splat(6.0))
            .with_child(panel)
    });

    let badge = Node::container()
        .with_id("badge")
        .with_absolute_position(WINDOW.x - 120.0, WINDOW.y - 40.0)
        .with_z_index(50)
        .with_padding(Vec2::new(8.0, 4.0))
        .with_border_radius(6.0)
        .with_background_color(css::MAGENTA)
        .with_child(Node::text("trellis").with_text_color(css::WHITE));

    Node::container()
        .with_id("tabs")
        .with_size(WINDOW.x, WINDOW.y)
        .with_background_color(Color::rgb(0.95, 0.95, 0.95))
        .with_border_radius(5.0)
        .with_padding(Vec2::splat(4.0))
        .with_child(tab_bar)
        .with_children(panels)
        .with_child(badge)
}

/// A scripted pointer action, applied before a frame
#[derive(Debug, Clone, Copy)]
enum Step {
    Idle,
    /// Move over the center of the node with this user id
    MoveTo(&'static str),
    MoveToPoint(f32, f32),
    Press,
    Release,
}

const SCRIPT: &[Step] = &[
    Step::Idle,
    Step::MoveTo("tab_table"),
    Step::Press,
    Step::Release,
    Step::Idle,
    Step::MoveTo("tab_nested"),
    Step::Press,
    // Dragging off cancels the click
    Step::MoveToPoint(780.0, 780.0),
    Step::Release,
    Step::MoveTo("tab_box"),
    Step::Press,
    Step::Release,
    Step::Idle,
];

struct Demo {
    ctx: FrameContext,
    input: InputState,
    selected: Rc<Cell<usize>>,
    shown: usize,
    last_tree: Option<Node>,
}

fn synthetic_device() -> DeviceId {
    // SAFETY: the id is only carried inside synthetic events and never handed to a platform API
    unsafe { DeviceId::dummy() }
}

impl Demo {
    fn new(ctx: FrameContext) -> Self {
        Self {
            ctx,
            input: InputState::new(),
            selected: Rc::new(Cell::new(0)),
            shown: 0,
            last_tree: None,
        }
    }

    fn apply(&mut self, step: Step) {
        let event = match step {
            Step::Idle => return,
            Step::MoveTo(id) => {
                let Some(center) = self.center_of(id) else {
                    log::warn!("No laid-out node labelled {id}");
                    return;
                };
                cursor_moved(center)
            }
            Step::MoveToPoint(x, y) => cursor_moved(Point::new(x, y)),
            Step::Press | Step::Release => WindowEvent::MouseInput {
                device_id: synthetic_device(),
                state: if matches!(step, Step::Press) {
                    ElementState::Pressed
                } else {
                    ElementState::Released
                },
                button: winit::event::MouseButton::Left,
            },
        };
        self.input.handle_winit_event(&event);
    }

    fn center_of(&self, id: &str) -> Option<Point> {
        let node = self.last_tree.as_ref()?.find_by_user_id(id)?;
        let rect = node.computed_layout()?.rect;
        Some(Point::new(
            (rect.min[0] + rect.max[0]) / 2.0,
            (rect.min[1] + rect.max[1]) / 2.0,
        ))
    }

    fn frame(&mut self) -> Result<FrameOutput> {
        let mut root = build_ui(&self.selected);
        let pointer = self.input.pointer(MouseButton::Left);
        let output = self.ctx.run_frame(&mut root, &pointer, Point::zero(), WINDOW)?;
        self.input.begin_frame();

        for id in &output.clicks {
            log::info!("Frame {}: clicked {id}", self.ctx.frame_count());
        }
        if self.selected.get() != self.shown {
            self.switch_tab(&root, self.selected.get());
        }
        self.last_tree = Some(root);
        Ok(output)
    }

    /// Persist panel visibility in the state store for the next frame
    fn switch_tab(&mut self, root: &Node, index: usize) {
        for (i, (_, label, panel)) in TABS.iter().enumerate() {
            let Some(id) = root.find_by_user_id(panel).and_then(Node::stable_id) else {
                continue;
            };
            let display = if i == index {
                log::info!("Showing {label}");
                Display::Block
            } else {
                Display::None
            };
            self.ctx.set_display(id, display);
        }
        self.shown = index;
    }
}

fn cursor_moved(position: Point) -> WindowEvent {
    WindowEvent::CursorMoved {
        device_id: synthetic_device(),
        position: PhysicalPosition::new(position.x as f64, position.y as f64),
    }
}

fn log_draw_list(output: &FrameOutput) {
    for command in &output.commands {
        let what = match &command.primitive {
            Primitive::Rect(rect) => format!(
                "rect fill ({:.2}, {:.2}, {:.2}, {:.2})",
                rect.fill.r, rect.fill.g, rect.fill.b, rect.fill.a
            ),
            Primitive::Text(text) => format!("text {:?}", text.lines),
            Primitive::Image { path } => format!("image {path}"),
        };
        log::debug!(
            "z {:>4} [{:>6.1}, {:>6.1} .. {:>6.1}, {:>6.1}] {} {}",
            command.z_index,
            command.rect.min[0],
            command.rect.min[1],
            command.rect.max[0],
            command.rect.max[1],
            command
                .stable_id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("-"),
            what
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = FrameConfig::default().with_root_seed("demo");
    let cosmic = CosmicMeasurer::new();
    let ctx = if cosmic.has_fonts() {
        FrameContext::new(cosmic).with_config(config)
    } else {
        log::warn!("No system fonts found; measuring with a fixed advance");
        FrameContext::new(MonospaceMeasurer::default()).with_config(config)
    };

    let mut demo = Demo::new(ctx);
    let mut last = FrameOutput::default();
    for step in SCRIPT {
        demo.apply(*step);
        last = demo.frame()?;
    }

    log::info!(
        "Ran {} frames; tracking {} widgets; last frame drew {} commands",
        demo.ctx.frame_count(),
        demo.ctx.state_store().len(),
        last.commands.len()
    );
    log_draw_list(&last);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_switches_tabs() {
        let mut demo = Demo::new(FrameContext::new(MonospaceMeasurer::default()));
        for step in SCRIPT {
            demo.apply(*step);
            demo.frame().unwrap();
        }

        // Table was clicked, the drag off "Nested Containers" was cancelled, then the box tab
        assert_eq!(demo.shown, 3);
        let root = demo.last_tree.as_ref().unwrap();
        assert_eq!(
            root.find_by_user_id("panel_box").unwrap().display(),
            Display::Block
        );
        assert_eq!(
            root.find_by_user_id("panel_chess").unwrap().display(),
            Display::None
        );
    }

    #[test]
    fn test_badge_draws_above_flow() {
        let mut demo = Demo::new(FrameContext::new(MonospaceMeasurer::default()));
        let output = demo.frame().unwrap();
        let last = output.commands.last().unwrap();
        // Tab bar buttons sit at z 999 + depth, above the badge
        assert!(last.z_index >= 999);
        assert!(output
            .commands
            .iter()
            .any(|c| c.stable_id.as_ref().is_some_and(|id| id.as_str().contains("badge"))));
    }
}

//! Frame context for the immediate-rebuild UI lifecycle.
//!
//! The application builds a fresh [`Node`] tree every frame and hands it to
//! [`FrameContext::run_frame`], which runs the passes in a fixed order:
//!
//! 1. begin frame (reset ID counters and the seen set)
//! 2. expand tables
//! 3. assign stable IDs
//! 4. copy stored interaction state into the tree
//! 5. layout
//! 6. hit-test the pointer, firing click callbacks
//! 7. copy interaction state back out of the tree
//! 8. generate draw commands
//! 9. end frame (prune state according to [`StatePruning`])
//!
//! # Example
//!
//! ```ignore
//! let mut ctx = FrameContext::new(MonospaceMeasurer::default());
//! loop {
//!     let mut root = Node::container().with_child(Node::button("Quit"));
//!     let output = ctx.run_frame(&mut root, &input.pointer(MouseButton::Left), Point::zero(), window)?;
//!     input.begin_frame();
//!     backend.draw(&output.commands);
//! }
//! ```

use crate::error::Result;
use crate::hit_test::handle_pointer_input;
use crate::identity::IdRegistrar;
use crate::input::PointerState;
use crate::layout::{LayoutEngine, DEFAULT_BUTTON_INSET};
use crate::measure::TextMeasurer;
use crate::node::{Display, Node, StableId};
use crate::output::{generate_draw_commands, FrameOutput};
use crate::primitives::{Point, Vec2};
use crate::state::{StatePruning, StateStore};
use crate::table::expand_tables;
use trellis_macros::WithBuilders;

/// Per-context settings
#[derive(Clone, Debug, PartialEq, WithBuilders)]
pub struct FrameConfig {
    /// Path seed for the root node's stable ID
    #[with_builders(into)]
    pub root_seed: String,
    /// Space between a button's label and its edges
    pub button_inset: Vec2,
    pub pruning: StatePruning,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            root_seed: "root".to_string(),
            button_inset: DEFAULT_BUTTON_INSET,
            pruning: StatePruning::Retain,
        }
    }
}

/// Owns everything that lives longer than one frame's tree
pub struct FrameContext {
    measurer: Box<dyn TextMeasurer>,
    registrar: IdRegistrar,
    store: StateStore,
    config: FrameConfig,
    frame: u64,
}

impl FrameContext {
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
            registrar: IdRegistrar::new(),
            store: StateStore::new(),
            config: FrameConfig::default(),
            frame: 0,
        }
    }

    pub fn with_config(mut self, config: FrameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Number of frames begun so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn state_store(&self) -> &StateStore {
        &self.store
    }

    pub fn registrar(&self) -> &IdRegistrar {
        &self.registrar
    }

    /// Show or hide a widget from the next frame on
    pub fn set_display(&mut self, id: &StableId, display: Display) {
        self.store.set_display(id, display);
    }

    /// Reset per-frame identity bookkeeping
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.registrar.begin_frame();
    }

    /// Prune the state store. Returns the number of records removed.
    pub fn end_frame(&mut self) -> usize {
        let pruned = self.store.prune(self.registrar.seen(), self.config.pruning);
        if pruned > 0 {
            log::debug!("Pruned {pruned} interaction states");
        }
        pruned
    }

    /// Run every pass over `root` for one frame.
    ///
    /// On a measurement error the frame is abandoned before hit-testing, so no callbacks fire and
    /// the store keeps the previous frame's state.
    pub fn run_frame(
        &mut self,
        root: &mut Node,
        pointer: &PointerState,
        origin: Point,
        available: Vec2,
    ) -> Result<FrameOutput> {
        self.begin_frame();

        let tables = expand_tables(root);
        self.registrar.assign_ids(root, &self.config.root_seed);
        self.store.copy_state_into_tree(root);

        LayoutEngine::new(self.measurer.as_mut())
            .with_button_inset(self.config.button_inset)
            .layout(root, origin, available)
            .inspect_err(|err| log::error!("Frame {} aborted: {err}", self.frame))?;

        let clicks = handle_pointer_input(root, pointer);
        self.store.copy_state_from_tree(root);
        let commands = generate_draw_commands(root);
        self.end_frame();

        log::debug!(
            "Frame {}: {} nodes, {} tables expanded, {} draw commands, {} clicks",
            self.frame,
            root.count(),
            tables,
            commands.len(),
            clicks.len()
        );
        Ok(FrameOutput { commands, clicks })
    }
}

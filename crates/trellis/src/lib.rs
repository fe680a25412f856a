//! # trellis
//!
//! Core of an immediate-rebuild UI toolkit. The application rebuilds its whole widget tree every
//! frame; trellis gives each node a stable identity, carries hover/pressed/visibility state across
//! rebuilds, lays the tree out, hit-tests the pointer and produces a z-ordered draw list.
//!
//! Rendering and text shaping live elsewhere: backends consume [`DrawCommand`]s and measurement
//! goes through the [`TextMeasurer`] trait (see `trellis-text`).
//!
//! ## Core Types
//!
//! - [`Node`] - One widget in the frame's tree, configured with `with_*` builders
//! - [`FrameContext`] - Runs every pass for a frame and owns cross-frame state
//! - [`FrameOutput`] - Draw commands and clicks produced by a frame
//!
//! ## Identity & State
//!
//! - [`IdRegistrar`] - Path-based stable IDs
//! - [`StateStore`] - Interaction state keyed by stable ID
//!
//! ## Layout & Input
//!
//! - [`LayoutEngine`] - Two-pass flow layout with wrapping
//! - [`InputState`] / [`PointerState`] - Pointer input tracking
//! - [`TextMeasurer`] - Trait for text measurement

mod color;
mod context;
mod debug;
mod error;
mod identity;
mod input;
mod layout;
mod measure;
mod node;
mod output;
mod primitives;
mod state;
mod table;

// Core types
pub use color::*;
pub use context::*;
pub use debug::*;
pub use error::{Error, MeasureError, Result};
pub use node::*;
pub use output::*;
pub use primitives::*;
pub use table::*;

// Identity & state
pub use identity::*;
pub use state::*;

// Layout, input & hit-testing
pub use hit_test::*;
pub use input::*;
pub use layout::*;
pub use measure::*;

pub use trellis_macros::WithBuilders;

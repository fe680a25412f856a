//! Backend-agnostic pointer input.
//!
//! [`InputState`] accumulates button transitions between frames (a windowing adapter such as
//! `trellis-winit` feeds it) and [`InputState::pointer`] condenses it into the [`PointerState`]
//! the hit-test pass consumes.

use crate::primitives::Point;
use std::collections::HashSet;

/// Backend-agnostic mouse button representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Additional mouse buttons (back, forward, etc.)
    Other(u16),
}

/// Pointer snapshot for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// `None` when the pointer is outside the window
    pub position: Option<Point>,
    /// Button held down
    pub down: bool,
    /// Button went up since the previous frame
    pub just_released: bool,
}

impl PointerState {
    /// Pointer at `(x, y)` with the button up
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Self::default()
        }
    }

    pub fn pressed(mut self) -> Self {
        self.down = true;
        self.just_released = false;
        self
    }

    pub fn released(mut self) -> Self {
        self.down = false;
        self.just_released = true;
        self
    }
}

/// Tracks pointer input across frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current cursor position in window coordinates, if known
    pub cursor_position: Option<Point>,

    /// Set of mouse buttons currently held down
    pub buttons_pressed: HashSet<MouseButton>,

    /// Set of mouse buttons that were pressed this frame
    pub buttons_just_pressed: HashSet<MouseButton>,

    /// Set of mouse buttons that were released this frame
    pub buttons_just_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the per-frame edge sets. Call after the frame consumed them.
    pub fn begin_frame(&mut self) {
        self.buttons_just_pressed.clear();
        self.buttons_just_released.clear();
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons_pressed.insert(button);
        self.buttons_just_pressed.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons_pressed.remove(&button);
        self.buttons_just_released.insert(button);
    }

    pub fn set_cursor_position(&mut self, position: Option<Point>) {
        self.cursor_position = position;
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_just_pressed.contains(&button)
    }

    pub fn is_button_just_released(&self, button: MouseButton) -> bool {
        self.buttons_just_released.contains(&button)
    }

    /// Pointer snapshot for `button`
    pub fn pointer(&self, button: MouseButton) -> PointerState {
        PointerState {
            position: self.cursor_position,
            down: self.is_button_down(button),
            just_released: self.is_button_just_released(button),
        }
    }
}

//! Winit input adapter for trellis
//!
//! Feeds winit window events into trellis's backend-agnostic [`InputState`].

use trellis::{InputState, MouseButton, Point};
use winit::event::{ElementState, WindowEvent};

/// Extension trait for InputState to handle winit events
pub trait WinitInputExt {
    /// Process a winit WindowEvent and update internal state.
    ///
    /// Call for each WindowEvent between frames; call `InputState::begin_frame` after each frame
    /// has consumed the pointer.
    fn handle_winit_event(&mut self, event: &WindowEvent);
}

impl WinitInputExt for InputState {
    fn handle_winit_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor_position(Some(Point::new(position.x as f32, position.y as f32)));
            }
            WindowEvent::CursorLeft { .. } => {
                self.set_cursor_position(None);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = convert_mouse_button(*button);
                match state {
                    ElementState::Pressed => self.press_button(button),
                    ElementState::Released => self.release_button(button),
                }
            }
            _ => {}
        }
    }
}

/// Convert winit MouseButton to trellis MouseButton
pub fn convert_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(n) => MouseButton::Other(n),
    }
}

//! Text measurement for layout.
//!
//! Layout never shapes text itself. It asks a [`TextMeasurer`] for the advance width of a run of
//! text at a given font size. Backends (such as `trellis-text`) implement the trait; closures
//! implement it too, which keeps tests short.

use crate::error::MeasureError;

/// Measures the width of single-line text.
pub trait TextMeasurer {
    /// Width in pixels of `text` laid out on one line at `font_size`.
    fn measure_width(&mut self, text: &str, font_size: f32) -> Result<f32, MeasureError>;
}

impl<F> TextMeasurer for F
where
    F: FnMut(&str, f32) -> Result<f32, MeasureError>,
{
    fn measure_width(&mut self, text: &str, font_size: f32) -> Result<f32, MeasureError> {
        self(text, font_size)
    }
}

/// Fixed-advance measurer: every character is `font_size * advance_ratio` wide.
///
/// Deterministic and font-free, so it is used for headless runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance_ratio: f32,
}

impl MonospaceMeasurer {
    pub const fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_width(&mut self, text: &str, font_size: f32) -> Result<f32, MeasureError> {
        Ok(text.chars().count() as f32 * font_size * self.advance_ratio)
    }
}

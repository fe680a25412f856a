//! Text measurement for trellis layouts, backed by cosmic-text.
//!
//! [`CosmicMeasurer`] shapes each string with cosmic-text and reports the widest laid-out line.
//! Results are cached per `(text, font size)`, since the wrapping pass measures the same
//! candidate lines repeatedly across frames.

use cosmic_text::{fontdb, Attrs, Buffer, FontSystem, Metrics, Shaping};
use std::collections::HashMap;
use trellis::{MeasureError, TextMeasurer};

/// Line height as a multiple of font size
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Measures text with cosmic-text
pub struct CosmicMeasurer {
    font_system: FontSystem,
    cache: HashMap<(String, u32), f32>,
}

impl CosmicMeasurer {
    /// Measurer over the system's installed fonts
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// Measurer over an explicit font database (e.g. bundled fonts only)
    pub fn with_database(db: fontdb::Database) -> Self {
        Self::from_font_system(FontSystem::new_with_locale_and_db("en-US".to_string(), db))
    }

    pub fn from_font_system(font_system: FontSystem) -> Self {
        let faces = font_system.db().faces().count();
        log::debug!("Text measurer ready with {faces} font faces");
        Self {
            font_system,
            cache: HashMap::new(),
        }
    }

    /// Add a font from raw TTF/OTF bytes
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.font_system.db_mut().load_font_data(data);
        self.cache.clear();
    }

    pub fn has_fonts(&self) -> bool {
        self.font_system.db().faces().next().is_some()
    }

    pub fn font_system_mut(&mut self) -> &mut FontSystem {
        &mut self.font_system
    }

    fn shape_width(&mut self, text: &str, font_size: f32) -> f32 {
        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            text,
            &Attrs::new(),
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0f32, f32::max)
    }
}

impl Default for CosmicMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for CosmicMeasurer {
    fn measure_width(&mut self, text: &str, font_size: f32) -> Result<f32, MeasureError> {
        if text.is_empty() {
            return Ok(0.0);
        }
        if !self.has_fonts() {
            return Err(MeasureError::NoFont);
        }
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(MeasureError::Backend(format!(
                "invalid font size {font_size}"
            )));
        }

        let key = (text.to_string(), font_size.to_bits());
        if let Some(width) = self.cache.get(&key) {
            return Ok(*width);
        }
        let width = self.shape_width(text, font_size);
        log::trace!("Measured {text:?} at {font_size}px: {width}");
        self.cache.insert(key, width);
        Ok(width)
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a [`crate::measure::TextMeasurer`]
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum MeasureError {
    /// The backend has no font that can shape text
    #[error("no font available")]
    NoFont,
    #[error("measurement backend: {0}")]
    Backend(String),
}

/// Errors surfaced by a frame.
///
/// Misuse of the tree (an unexpanded table reaching layout, a node without a stable ID during
/// state sync, a kind-specific setter on the wrong kind) panics instead.
#[derive(PartialEq, Error, Debug, Clone)]
pub enum Error {
    /// Text measurement failed; the frame was aborted
    #[error("measuring {text:?} at {font_size}px")]
    Measure {
        text: String,
        font_size: f32,
        #[source]
        source: MeasureError,
    },
}

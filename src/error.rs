use prepify_layout::{FontError, LayoutError};
use prepify_render_core::RenderError;
use thiserror::Error;

/// Everything that can abort rendering a paper.
///
/// Degraded input (a missing answer key, an `mcq` without options) is not an
/// error: those questions are rendered best-effort and logged instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Font unavailable: {0}")]
    Font(#[from] FontError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid engine configuration: {0}")]
    Config(String),
}

//! Core rendering abstractions for paper generation.
//!
//! This crate provides the drawing surface used by the paper renderer:
//! - `DocumentCanvas` trait that every output backend implements
//! - Draw option and command types, plus `RecordingCanvas` for inspection
//! - Error types for rendering operations
//! - Shared helpers for text placement and coordinate conversion

mod error;
mod pages;
mod recording;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use pages::PageSet;
pub use recording::RecordingCanvas;
pub use traits::DocumentCanvas;
pub use types::{DrawCommand, LineStyle, RecordedDocument, RectStyle, TextOptions};

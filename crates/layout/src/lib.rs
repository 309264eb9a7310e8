use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Block has a height of {0:.2} which exceeds the total page content height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error("Block placed at y={y:.2} with height {height:.2} crosses the bottom margin at {bottom:.2}.")]
    Overflow { y: f32, height: f32, bottom: f32 },
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod algorithms;
pub mod config;
pub mod fonts;
pub mod text;
pub mod watermark;

pub use self::config::LayoutConfig;
pub use self::fonts::{
    EmbeddedFamily, FontError, FontFace, FontFiles, FontLibrary, FontProgram, FontRun, FontSource,
    ShapedGlyph, StandardFont,
};
pub use self::text::TextMetrics;
pub use self::watermark::{FittedWatermark, WatermarkFit, WatermarkFitter};

// Re-export geometry types so downstream crates see one definition
pub use prepify_types::{Point, Rect, Size};

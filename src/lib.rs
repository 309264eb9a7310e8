//! Print-ready exam paper rendering.
//!
//! A [`PaginationDirector`] turns a [`Paper`], its ordered [`Question`]s and
//! the site [`Settings`] into a paginated document on any
//! [`DocumentCanvas`]: a titled header, every question with its answer key
//! highlighted, explanation callouts, a diagonal watermark and
//! "Page i of N" footers.
//!
//! ```no_run
//! use prepify::{PaginationDirector, PaperBundle};
//!
//! # fn main() -> Result<(), prepify::EngineError> {
//! let bundle: PaperBundle = serde_json::from_str(&std::fs::read_to_string("paper.json")?)?;
//! let rendered = PaginationDirector::default().render_pdf(&bundle)?;
//! std::fs::write(&rendered.file_name, &rendered.document)?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod cursor;
pub mod director;
pub mod error;
pub mod model;
pub mod question;
pub mod state;

pub use batch::render_many;
pub use config::EngineConfig;
pub use cursor::LayoutCursor;
pub use director::{PaginationDirector, RenderedPaper, file_name_for};
pub use error::EngineError;
pub use model::{CorrectAnswer, Paper, PaperBundle, Question, QuestionKind, Settings};
pub use question::QuestionBlockRenderer;
pub use state::{Phase, RenderState};

pub use prepify_layout::{FontFiles, FontLibrary, FontSource, LayoutError, TextMetrics, WatermarkFitter};
pub use prepify_render_core::{DocumentCanvas, RecordedDocument, RecordingCanvas, RenderError};
pub use prepify_render_lopdf::LopdfCanvas;

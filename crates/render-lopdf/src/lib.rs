//! PDF backend for [`DocumentCanvas`](prepify_render_core::DocumentCanvas).
//!
//! Pages are kept as lists of content-stream operations while the paper is
//! being laid out, so earlier pages can still be annotated (watermark,
//! footer) before the document object graph is assembled on `save`.

mod content;
mod embed;
mod renderer;

pub use renderer::LopdfCanvas;

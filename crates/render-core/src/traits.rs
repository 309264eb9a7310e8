use crate::error::RenderError;
use crate::types::{LineStyle, RectStyle, TextOptions};
use prepify_types::{Point, Rect, Size};

/// The drawing surface a paper is rendered onto.
///
/// Coordinates are page space: origin at the top-left corner, `y` growing
/// downwards, in points. Drawing always targets the current page, which is
/// the most recently added page unless [`set_page`](Self::set_page) selected
/// another one. Pages are append-only.
pub trait DocumentCanvas {
    /// What [`save`](Self::save) hands back: PDF bytes, a recording, ...
    type Output;

    fn page_size(&self) -> Size;

    /// Appends a blank page and makes it current.
    fn add_page(&mut self) -> Result<(), RenderError>;

    /// Makes the existing page `index` (0-based) current.
    fn set_page(&mut self, index: usize) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    fn draw_text(
        &mut self,
        lines: &[String],
        x: f32,
        y: f32,
        options: &TextOptions,
    ) -> Result<(), RenderError>;

    fn draw_rect(&mut self, rect: Rect, style: &RectStyle) -> Result<(), RenderError>;

    fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) -> Result<(), RenderError>;

    /// Finishes the document.
    fn save(self) -> Result<Self::Output, RenderError>
    where
        Self: Sized;
}

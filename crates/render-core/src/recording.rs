use crate::error::RenderError;
use crate::pages::PageSet;
use crate::traits::DocumentCanvas;
use crate::types::{DrawCommand, LineStyle, RecordedDocument, RectStyle, TextOptions};
use prepify_types::{Point, Rect, Size};

/// A canvas that keeps every draw command instead of producing a file.
///
/// Used to inspect layouts in tests, to compare renders for determinism and
/// by the CLI's `--record` mode.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    page_size: Size,
    pages: PageSet<Vec<DrawCommand>>,
}

impl RecordingCanvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: PageSet::new(),
        }
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), RenderError> {
        self.pages.current_mut()?.push(command);
        Ok(())
    }
}

impl DocumentCanvas for RecordingCanvas {
    type Output = RecordedDocument;

    fn page_size(&self) -> Size {
        self.page_size
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn set_page(&mut self, index: usize) -> Result<(), RenderError> {
        self.pages.select(index)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn draw_text(
        &mut self,
        lines: &[String],
        x: f32,
        y: f32,
        options: &TextOptions,
    ) -> Result<(), RenderError> {
        self.record(DrawCommand::Text {
            lines: lines.to_vec(),
            x,
            y,
            options: *options,
        })
    }

    fn draw_rect(&mut self, rect: Rect, style: &RectStyle) -> Result<(), RenderError> {
        self.record(DrawCommand::Rect {
            rect,
            style: *style,
        })
    }

    fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) -> Result<(), RenderError> {
        self.record(DrawCommand::Line {
            from,
            to,
            style: *style,
        })
    }

    fn save(self) -> Result<RecordedDocument, RenderError> {
        Ok(RecordedDocument {
            page_size: self.page_size,
            pages: self.pages.into_pages(),
        })
    }
}

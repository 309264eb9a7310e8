//! Per-call rendering state: the canvas being drawn on, the layout cursor
//! and the scoped text style.

use crate::cursor::LayoutCursor;
use crate::error::EngineError;
use prepify_layout::{LayoutError, TextMetrics};
use prepify_render_core::{DocumentCanvas, TextOptions};
use prepify_style::{TextAlign, TextStyle};

/// Render phases, strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Header,
    QuestionLoop,
    Decorate,
    Done,
}

/// Mutable state for exactly one render call. Never shared between calls.
pub struct RenderState<C: DocumentCanvas> {
    pub canvas: C,
    pub cursor: LayoutCursor,
    metrics: TextMetrics,
    styles: Vec<TextStyle>,
    phase: Phase,
}

impl<C: DocumentCanvas> RenderState<C> {
    pub fn new(canvas: C, cursor: LayoutCursor, metrics: TextMetrics, base: TextStyle) -> Self {
        Self {
            canvas,
            cursor,
            metrics,
            styles: vec![base],
            phase: Phase::Header,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn enter(&mut self, phase: Phase) -> Result<(), EngineError> {
        if phase <= self.phase {
            return Err(LayoutError::Generic(format!(
                "cannot move from {:?} back to {:?}",
                self.phase, phase
            ))
            .into());
        }
        log::debug!("Render phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        Ok(())
    }

    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// The style text is currently drawn with.
    pub fn style(&self) -> TextStyle {
        self.styles.last().copied().unwrap_or_default()
    }

    pub fn style_depth(&self) -> usize {
        self.styles.len()
    }

    /// Runs `draw` with `style` applied and restores the previous style
    /// afterwards, whether `draw` succeeded or not.
    pub fn with_style<R>(
        &mut self,
        style: TextStyle,
        draw: impl FnOnce(&mut Self) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        self.styles.push(style);
        let result = draw(self);
        self.styles.pop();
        result
    }

    pub fn line_height(&self) -> f32 {
        self.metrics.line_height(self.style().font_size)
    }

    /// Wraps `text` in the current style.
    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        self.metrics.wrap_styled(text, max_width, &self.style())
    }

    /// Draws `lines` with their top edge at `y`, in the current style.
    pub fn draw_lines(
        &mut self,
        lines: &[String],
        x: f32,
        y: f32,
        align: TextAlign,
    ) -> Result<(), EngineError> {
        let options = TextOptions::new(self.style(), self.line_height()).align(align);
        self.canvas.draw_text(lines, x, y, &options)?;
        Ok(())
    }

    /// How many lines of the current style fit on one empty page.
    pub fn lines_per_page(&self, reserved: f32) -> Result<usize, EngineError> {
        let line_height = self.line_height();
        let room = self.cursor.usable_height() - reserved;
        let count = ((room + 0.01) / line_height).floor();
        if count < 1.0 {
            return Err(LayoutError::ElementTooLarge(
                reserved + line_height,
                self.cursor.usable_height(),
            )
            .into());
        }
        Ok(count as usize)
    }

    /// Places wrapped lines as one block at the cursor.
    ///
    /// A block taller than a whole page is split into page-sized chunks,
    /// each placed atomically. `first_line` runs once with the top `y` of
    /// the first chunk, on that chunk's page, to draw a marker beside it.
    pub fn place_lines(
        &mut self,
        lines: &[String],
        x: f32,
        align: TextAlign,
        mut first_line: impl FnMut(&mut Self, f32) -> Result<(), EngineError>,
    ) -> Result<(), EngineError> {
        if lines.is_empty() {
            return Ok(());
        }
        let per_page = self.lines_per_page(0.0)?;
        let line_height = self.line_height();

        for (index, chunk) in lines.chunks(per_page).enumerate() {
            let height = chunk.len() as f32 * line_height;
            self.cursor.ensure_fits(height, &mut self.canvas)?;
            let y = self.cursor.y();
            if index == 0 {
                first_line(self, y)?;
            }
            self.draw_lines(chunk, x, y, align)?;
            self.cursor.advance(height)?;
        }
        Ok(())
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

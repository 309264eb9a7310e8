use crate::error::EngineError;
use prepify_layout::LayoutError;
use prepify_layout::algorithms::pagination::{check_child_fit, fits_empty_page};
use prepify_render_core::DocumentCanvas;
use prepify_style::Margins;
use prepify_types::{Rect, Size};

/// Tracks where the next block goes: the current page and the vertical write
/// position inside the page's content area.
///
/// Blocks are always measured first. [`ensure_fits`](Self::ensure_fits) then
/// decides whether the block starts on the current page or a fresh one, and
/// [`advance`](Self::advance) moves past it once drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    page: usize,
    y: f32,
    bounds: Rect,
}

impl LayoutCursor {
    pub fn new(page_size: Size, margins: &Margins) -> Self {
        let bounds = Rect::new(
            margins.left,
            margins.top,
            (page_size.width - margins.left - margins.right).max(0.0),
            (page_size.height - margins.top - margins.bottom).max(0.0),
        );
        Self {
            page: 0,
            y: bounds.y,
            bounds,
        }
    }

    /// Opens the first page and moves to its top margin.
    pub fn begin<C: DocumentCanvas>(&mut self, canvas: &mut C) -> Result<(), EngineError> {
        canvas.add_page()?;
        self.page = canvas.page_count().saturating_sub(1);
        self.y = self.bounds.y;
        Ok(())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// The content area inside the margins.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn top(&self) -> f32 {
        self.bounds.y
    }

    pub fn bottom(&self) -> f32 {
        self.bounds.bottom()
    }

    pub fn usable_height(&self) -> f32 {
        self.bounds.height
    }

    pub fn remaining(&self) -> f32 {
        check_child_fit(self.y, 0.0, self.bounds).remaining_height
    }

    pub fn would_fit(&self, height: f32) -> bool {
        !check_child_fit(self.y, height, self.bounds).should_break
    }

    /// Makes room for a block of `height`, starting a new page when the block
    /// would cross the bottom margin. Returns whether a page was added.
    ///
    /// A block that could not fit even on an empty page is an error; callers
    /// split such content before asking.
    pub fn ensure_fits<C: DocumentCanvas>(
        &mut self,
        height: f32,
        canvas: &mut C,
    ) -> Result<bool, EngineError> {
        if !fits_empty_page(height, self.bounds) {
            return Err(LayoutError::ElementTooLarge(height, self.bounds.height).into());
        }
        if self.would_fit(height) {
            return Ok(false);
        }

        canvas.add_page()?;
        self.page += 1;
        self.y = self.bounds.y;
        log::debug!(
            "Page break before a {:.1}pt block, now on page {}",
            height,
            self.page + 1
        );
        Ok(true)
    }

    /// Moves past a block that has just been drawn at the current position.
    pub fn advance(&mut self, height: f32) -> Result<(), LayoutError> {
        if check_child_fit(self.y, height, self.bounds).should_break {
            return Err(LayoutError::Overflow {
                y: self.y,
                height,
                bottom: self.bounds.bottom(),
            });
        }
        self.y += height;
        Ok(())
    }

    /// Inserts vertical whitespace. Spacing never forces a page break; it is
    /// clipped at the bottom margin and dropped at the top of the next page.
    /// The cursor never moves above the top margin.
    pub fn skip(&mut self, gap: f32) {
        self.y = (self.y + gap).clamp(self.bounds.y, self.bounds.bottom());
    }
}

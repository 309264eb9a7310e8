//! Size fitting for the diagonal page watermark.
//!
//! The watermark is a short, possibly multi-line stamp drawn rotated across
//! the middle of every page. Its font size is chosen from a descending
//! sequence (`initial`, `initial - step`, ...) so that the rotated block
//! spans at most a fraction of the page width, never going below `floor`.

use crate::text::TextMetrics;
use prepify_style::FontWeight;
use serde::{Deserialize, Serialize};

pub const SITE_NAME_PLACEHOLDER: &str = "{siteName}";

/// Tuning constants for [`WatermarkFitter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkFit {
    pub initial_size: f32,
    pub step: f32,
    pub floor: f32,
    /// Share of the page width the rotated block may occupy.
    pub fit_fraction: f32,
    /// Rotation in degrees, counter-clockwise in page space.
    pub angle: f32,
}

impl Default for WatermarkFit {
    fn default() -> Self {
        Self {
            initial_size: 120.0,
            step: 5.0,
            floor: 12.0,
            fit_fraction: 0.8,
            angle: -45.0,
        }
    }
}

/// The result of fitting: the chosen size and the lines to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedWatermark {
    pub font_size: f32,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WatermarkFitter {
    metrics: TextMetrics,
    fit: WatermarkFit,
}

impl WatermarkFitter {
    /// Watermarks are always set in the bold face.
    pub const WEIGHT: FontWeight = FontWeight::Bold;

    pub fn new(metrics: TextMetrics, fit: WatermarkFit) -> Self {
        Self { metrics, fit }
    }

    /// Substitutes the site name and splits the template into display lines.
    ///
    /// Both real newlines and literal `\n` escape sequences (as stored by
    /// single-line settings fields) are treated as line breaks. Blank lines
    /// are dropped.
    pub fn expand_template(template: &str, site_name: &str) -> Vec<String> {
        template
            .replace(SITE_NAME_PLACEHOLDER, site_name)
            .replace("\\n", "\n")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Horizontal extent of the rotated line block at `font_size`.
    pub fn rotated_extent(&self, lines: &[String], font_size: f32) -> f32 {
        let width = lines
            .iter()
            .map(|line| self.metrics.text_width(line, font_size, Self::WEIGHT))
            .fold(0.0f32, f32::max);
        let height = self.metrics.block_height(lines.len(), font_size);
        let theta = self.fit.angle.to_radians();
        (width * theta.cos()).abs() + (height * theta.sin()).abs()
    }

    /// Picks the largest candidate size whose rotated block fits the page.
    ///
    /// Returns `None` when the template expands to no visible text.
    pub fn fit(&self, template: &str, site_name: &str, page_width: f32) -> Option<FittedWatermark> {
        let lines = Self::expand_template(template, site_name);
        if lines.is_empty() {
            return None;
        }

        let floor = self.fit.floor.min(self.fit.initial_size);
        // A non-positive step would never terminate; fall straight to the floor.
        let step = if self.fit.step > 0.0 {
            self.fit.step
        } else {
            self.fit.initial_size - floor
        };
        let limit = page_width * self.fit.fit_fraction;

        let mut font_size = self.fit.initial_size;
        while font_size > floor && self.rotated_extent(&lines, font_size) > limit {
            font_size = (font_size - step).max(floor);
        }

        log::debug!(
            "Watermark fitted at {:.1}pt ({} line(s), limit {:.1})",
            font_size,
            lines.len(),
            limit
        );
        Some(FittedWatermark { font_size, lines })
    }
}

use crate::types::TextOptions;
use prepify_layout::TextMetrics;
use prepify_style::{TextAlign, VerticalAlign};

/// Baseline position inside the em box, as a share of the font size.
pub const ASCENT_RATIO: f32 = 0.8;

/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Where one line of a text block starts, relative to the block's anchor
/// in the unrotated frame (`y` down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOffset {
    pub dx: f32,
    pub baseline: f32,
}

/// Resolves alignment for every line of a block.
///
/// Each line box is `line_height` tall with the glyphs centred in it, so a
/// block of `n` lines occupies exactly `n * line_height`.
pub fn line_offsets(lines: &[String], options: &TextOptions, metrics: &TextMetrics) -> Vec<LineOffset> {
    let font_size = options.style.font_size;
    let line_height = options.line_height;
    let block_top = match options.valign {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Middle => -(lines.len() as f32 * line_height) / 2.0,
    };
    let baseline_in_box = (line_height - font_size) / 2.0 + font_size * ASCENT_RATIO;

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let width = metrics.styled_width(line, &options.style);
            let dx = match options.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => -width / 2.0,
                TextAlign::Right => -width,
            };
            LineOffset {
                dx,
                baseline: block_top + i as f32 * line_height + baseline_in_box,
            }
        })
        .collect()
}

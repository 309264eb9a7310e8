use super::wrapper::break_lines;
use crate::config::LayoutConfig;
use crate::fonts::FontLibrary;
use prepify_style::{FontStyle, FontWeight, TextStyle};

/// Stateless text measurement against the configured fonts.
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    config: LayoutConfig,
    fonts: FontLibrary,
}

impl TextMetrics {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            fonts: FontLibrary::standard(),
        }
    }

    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Width of `text` set upright on a single line.
    pub fn text_width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        self.fonts.width(text, font_size, weight, FontStyle::Normal)
    }

    /// Width of `text` on a single line in the face `style` selects.
    pub fn styled_width(&self, text: &str, style: &TextStyle) -> f32 {
        self.fonts
            .width(text, style.font_size, style.font_weight, style.font_style)
    }

    /// Wraps upright `text` into the fewest lines that fit `max_width`.
    pub fn wrap(
        &self,
        text: &str,
        max_width: f32,
        font_size: f32,
        weight: FontWeight,
    ) -> Vec<String> {
        break_lines(text, max_width, |fragment| {
            self.text_width(fragment, font_size, weight)
        })
    }

    /// Wraps `text` measured in the face `style` selects.
    pub fn wrap_styled(&self, text: &str, max_width: f32, style: &TextStyle) -> Vec<String> {
        break_lines(text, max_width, |fragment| self.styled_width(fragment, style))
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.config.line_height_factor
    }

    pub fn block_height(&self, line_count: usize, font_size: f32) -> f32 {
        line_count as f32 * self.line_height(font_size)
    }
}

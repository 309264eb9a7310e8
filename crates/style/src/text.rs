use crate::font::{FontStyle, FontWeight};
use prepify_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// Where the anchor `y` sits relative to a block of lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    /// `y` is the top of the first line.
    #[default]
    Top,
    /// `y` is the vertical centre of the whole block.
    Middle,
}

/// The font and paint settings applied to a run of text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            color: Color::BLACK,
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    pub fn italic(mut self) -> Self {
        self.font_style = FontStyle::Italic;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

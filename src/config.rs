//! Engine-wide rendering settings.
//!
//! Every field has a default, so an empty JSON object (or no config file at
//! all) yields the standard A4 layout.

use crate::error::EngineError;
use prepify_layout::{FontSource, LayoutConfig, WatermarkFit};
use prepify_style::PageLayout;
use prepify_types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub page: PageLayout,
    pub layout: LayoutConfig,
    pub fonts: FontSizes,
    pub spacing: Spacing,
    pub colors: Palette,
    pub watermark: WatermarkStyle,
    /// Where the text faces come from. Papers with scripts beyond Latin-1
    /// and Greek need an embedded family.
    pub typeface: FontSource,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSizes {
    pub title: f32,
    pub description: f32,
    pub prompt: f32,
    pub option: f32,
    pub panel: f32,
    pub footer: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 20.0,
            description: 11.0,
            prompt: 12.0,
            option: 11.0,
            panel: 10.0,
            footer: 8.0,
        }
    }
}

/// Vertical gaps and indents in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    /// Gap between the title, the description and the divider.
    pub header_gap: f32,
    /// Gap below the divider before the first question.
    pub after_divider: f32,
    pub after_prompt: f32,
    pub between_options: f32,
    /// Horizontal offset of option text from the content edge.
    pub option_indent: f32,
    /// Gap above an answer panel or explanation callout.
    pub before_panel: f32,
    /// Inner padding of answer panels and explanation callouts.
    pub panel_padding: f32,
    pub after_question: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            header_gap: 6.0,
            after_divider: 16.0,
            after_prompt: 4.0,
            between_options: 2.0,
            option_indent: 18.0,
            before_panel: 6.0,
            panel_padding: 6.0,
            after_question: 14.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub text: Color,
    /// Correct options and the answer panel border.
    pub accent: Color,
    /// Footer text and the description.
    pub muted: Color,
    pub divider: Color,
    pub answer_fill: Color,
    pub explanation_fill: Color,
    pub explanation_border: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Color::BLACK,
            accent: Color::rgb(0x1b, 0x7f, 0x3b),
            muted: Color::gray(0x80),
            divider: Color::gray(0xb4),
            answer_fill: Color::rgb(0xe8, 0xf5, 0xe9),
            explanation_fill: Color::gray(0xf2),
            explanation_border: Color::gray(0xc8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkStyle {
    #[serde(flatten)]
    pub fit: WatermarkFit,
    pub opacity: f32,
    pub color: Color,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            fit: WatermarkFit::default(),
            opacity: 0.15,
            color: Color::gray(0x96),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rejects settings that leave no room to lay anything out or would
    /// move the cursor backwards.
    pub fn validate(&self) -> Result<(), EngineError> {
        let margins = &self.page.margins;
        if self.page.content_width() <= 0.0 {
            return Err(EngineError::Config(format!(
                "margins leave no horizontal space on a {:.0}pt wide page",
                self.page.width()
            )));
        }
        if self.page.height() - margins.top - margins.bottom <= 0.0 {
            return Err(EngineError::Config(format!(
                "margins leave no vertical space on a {:.0}pt tall page",
                self.page.height()
            )));
        }
        if self.layout.line_height_factor <= 0.0 {
            return Err(EngineError::Config(
                "lineHeightFactor must be positive".to_string(),
            ));
        }
        let sizes = &self.fonts;
        let all_sizes = [
            sizes.title,
            sizes.description,
            sizes.prompt,
            sizes.option,
            sizes.panel,
            sizes.footer,
        ];
        if all_sizes.iter().any(|size| *size <= 0.0) {
            return Err(EngineError::Config("font sizes must be positive".to_string()));
        }
        self.spacing.validate()?;
        self.watermark.validate()
    }
}

impl Spacing {
    fn validate(&self) -> Result<(), EngineError> {
        let gaps = [
            ("headerGap", self.header_gap),
            ("afterDivider", self.after_divider),
            ("afterPrompt", self.after_prompt),
            ("betweenOptions", self.between_options),
            ("optionIndent", self.option_indent),
            ("beforePanel", self.before_panel),
            ("panelPadding", self.panel_padding),
            ("afterQuestion", self.after_question),
        ];
        for (name, value) in gaps {
            if !(value >= 0.0) {
                return Err(EngineError::Config(format!(
                    "spacing.{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl WatermarkStyle {
    fn validate(&self) -> Result<(), EngineError> {
        let fit = &self.fit;
        let positive = [
            ("initialSize", fit.initial_size),
            ("step", fit.step),
            ("floor", fit.floor),
            ("fitFraction", fit.fit_fraction),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(EngineError::Config(format!(
                    "watermark.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(EngineError::Config(format!(
                "watermark.opacity must be between 0 and 1, got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Height of one text line as a multiple of its font size.
    ///
    /// Every wrapped block (prompts, options, answer panels, explanations and
    /// the watermark) is measured with this single factor, so changing it
    /// scales the vertical rhythm of the whole paper uniformly.
    ///
    /// Defaults to `1.2`.
    pub line_height_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_height_factor: 1.2,
        }
    }
}

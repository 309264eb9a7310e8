//! Font selection for measuring and drawing text.
//!
//! `FontLibrary` decides which concrete font every piece of text is set in.
//! By default papers use the standard Helvetica family with Symbol filling
//! in Greek letters and mathematical signs. A configured TrueType/OpenType
//! family replaces both and is embedded into the output, which covers any
//! script the font does.
//!
//! Measurement and rendering both go through [`FontLibrary::runs`], so a
//! line is always drawn in exactly the fonts it was measured with.

mod embedded;
mod standard;

pub use embedded::{EmbeddedFamily, FaceMetrics, FontProgram, ShapedGlyph};
pub use standard::StandardFont;

use prepify_style::{FontStyle, FontWeight};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Font family '{0}' is not installed")]
    NotFound(String),
    #[error("Cannot read font file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Not a usable TrueType/OpenType font: {0}")]
    Parse(String),
    #[error("System font lookup is not available in this build")]
    SystemFontsDisabled,
}

/// Where the text faces come from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum FontSource {
    /// Helvetica and Symbol, referenced but never embedded.
    #[default]
    Standard,
    /// An installed family, looked up by name.
    System { family: String },
    /// Font files on disk. Only the regular face is required.
    Files(FontFiles),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFiles {
    pub regular: PathBuf,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
    pub bold_italic: Option<PathBuf>,
}

/// A concrete font a run of text is set in.
#[derive(Debug, Clone)]
pub enum FontFace {
    Standard(StandardFont),
    Embedded(Arc<FontProgram>),
}

impl FontFace {
    /// Width of `text` in points.
    pub fn width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            FontFace::Standard(font) => font.width(text, font_size),
            FontFace::Embedded(program) => program.width(text, font_size),
        }
    }
}

impl PartialEq for FontFace {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FontFace::Standard(a), FontFace::Standard(b)) => a == b,
            (FontFace::Embedded(a), FontFace::Embedded(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A stretch of one line set in a single font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRun<'t> {
    pub face: FontFace,
    pub text: &'t str,
}

#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    family: Option<Arc<EmbeddedFamily>>,
}

impl FontLibrary {
    /// The standard, non-embedded fonts.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn embedded(family: EmbeddedFamily) -> Self {
        Self {
            family: Some(Arc::new(family)),
        }
    }

    pub fn load(source: &FontSource) -> Result<Self, FontError> {
        match source {
            FontSource::Standard => Ok(Self::standard()),
            FontSource::System { family } => Self::load_system(family),
            FontSource::Files(files) => EmbeddedFamily::from_files(files).map(Self::embedded),
        }
    }

    #[cfg(feature = "system-fonts")]
    fn load_system(family: &str) -> Result<Self, FontError> {
        EmbeddedFamily::from_system(family).map(Self::embedded)
    }

    #[cfg(not(feature = "system-fonts"))]
    fn load_system(_family: &str) -> Result<Self, FontError> {
        Err(FontError::SystemFontsDisabled)
    }

    pub fn is_embedded(&self) -> bool {
        self.family.is_some()
    }

    /// Splits one line into runs of a single font each.
    ///
    /// With the standard fonts, characters Helvetica cannot show but Symbol
    /// can are moved into Symbol runs; whatever neither covers stays in
    /// Helvetica and is drawn as `?`. An embedded family sets the whole line
    /// in one face.
    pub fn runs<'t>(&self, text: &'t str, weight: FontWeight, style: FontStyle) -> Vec<FontRun<'t>> {
        if text.is_empty() {
            return Vec::new();
        }
        if let Some(family) = &self.family {
            let program = family.face(weight.is_bold(), style == FontStyle::Italic);
            return vec![FontRun {
                face: FontFace::Embedded(program.clone()),
                text,
            }];
        }

        let base = StandardFont::for_style(weight, style);
        let font_for = |ch: char| {
            if !base.covers(ch) && StandardFont::Symbol.covers(ch) {
                StandardFont::Symbol
            } else {
                base
            }
        };

        let mut runs = Vec::new();
        let mut start = 0;
        let mut current: Option<StandardFont> = None;
        for (index, ch) in text.char_indices() {
            let font = font_for(ch);
            match current {
                Some(previous) if previous != font => {
                    runs.push(FontRun {
                        face: FontFace::Standard(previous),
                        text: &text[start..index],
                    });
                    start = index;
                    current = Some(font);
                }
                Some(_) => {}
                None => current = Some(font),
            }
        }
        if let Some(font) = current {
            runs.push(FontRun {
                face: FontFace::Standard(font),
                text: &text[start..],
            });
        }
        runs
    }

    /// Width of `text` set on one line, in points.
    pub fn width(&self, text: &str, font_size: f32, weight: FontWeight, style: FontStyle) -> f32 {
        self.runs(text, weight, style)
            .iter()
            .map(|run| run.face.width(run.text, font_size))
            .sum()
    }
}

//! TrueType/OpenType faces embedded into the output for text the standard
//! fonts cannot show.
//!
//! Text is shaped with `rustybuzz`, so measured widths include kerning and
//! ligatures. Renderers replay the same shaped glyphs, which keeps what was
//! measured and what is drawn identical.

use super::{FontError, FontFiles};
use rustybuzz::UnicodeBuffer;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Font-wide metrics in 1/1000 em, as a PDF font descriptor wants them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub bbox: [f32; 4],
    pub italic_angle: f32,
    pub fixed_pitch: bool,
}

/// One shaped glyph. `advance` is in 1/1000 em.
///
/// `text` holds the characters the glyph stands for; it is empty for the
/// second and later glyphs of a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    pub advance: f32,
    pub text: String,
}

/// A parsed font file plus the metadata needed to embed it.
pub struct FontProgram {
    data: Arc<Vec<u8>>,
    index: u32,
    postscript_name: String,
    units_per_em: f32,
    metrics: FaceMetrics,
}

impl std::fmt::Debug for FontProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontProgram")
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontProgram {
    pub fn parse(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let (postscript_name, units_per_em, metrics) = {
            let face = ttf_parser::Face::parse(&data, index)
                .map_err(|e| FontError::Parse(e.to_string()))?;
            let units_per_em = face.units_per_em() as f32;
            let scale = 1000.0 / units_per_em;
            let bbox = face.global_bounding_box();
            let metrics = FaceMetrics {
                ascent: face.ascender() as f32 * scale,
                descent: face.descender() as f32 * scale,
                cap_height: face.capital_height().unwrap_or(face.ascender()) as f32 * scale,
                bbox: [
                    bbox.x_min as f32 * scale,
                    bbox.y_min as f32 * scale,
                    bbox.x_max as f32 * scale,
                    bbox.y_max as f32 * scale,
                ],
                italic_angle: face.italic_angle(),
                fixed_pitch: face.is_monospaced(),
            };
            (postscript_name(&face), units_per_em, metrics)
        };

        log::debug!("Parsed font '{}' ({} bytes)", postscript_name, data.len());
        Ok(Self {
            data: Arc::new(data),
            index,
            postscript_name,
            units_per_em,
            metrics,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(data, 0)
    }

    /// The raw font file, embedded as-is.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    /// Shapes one line of text.
    pub fn shape(&self, text: &str) -> Vec<ShapedGlyph> {
        let Some(face) = rustybuzz::Face::from_slice(&self.data, self.index) else {
            return Vec::new();
        };
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let shaped = rustybuzz::shape(&face, &[], buffer);

        let scale = 1000.0 / self.units_per_em;
        let infos = shaped.glyph_infos();
        let mut starts: Vec<usize> = infos.iter().map(|info| info.cluster as usize).collect();
        starts.sort_unstable();
        starts.dedup();

        let mut claimed = HashSet::new();
        infos
            .iter()
            .zip(shaped.glyph_positions())
            .map(|(info, position)| {
                let start = info.cluster as usize;
                let end = starts
                    .iter()
                    .copied()
                    .find(|candidate| *candidate > start)
                    .unwrap_or(text.len());
                let cluster_text = if claimed.insert(start) {
                    text.get(start..end).unwrap_or_default().to_string()
                } else {
                    String::new()
                };
                ShapedGlyph {
                    glyph_id: info.glyph_id as u16,
                    advance: position.x_advance as f32 * scale,
                    text: cluster_text,
                }
            })
            .collect()
    }

    /// Width of `text` in points.
    pub fn width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = self.shape(text).iter().map(|glyph| glyph.advance).sum();
        units * font_size / 1000.0
    }

    /// Unshaped advance of a glyph in 1/1000 em, as listed in the font's
    /// width table.
    pub fn glyph_width(&self, glyph_id: u16) -> f32 {
        ttf_parser::Face::parse(&self.data, self.index)
            .ok()
            .and_then(|face| face.glyph_hor_advance(ttf_parser::GlyphId(glyph_id)))
            .map(|advance| advance as f32 * 1000.0 / self.units_per_em)
            .unwrap_or(0.0)
    }
}

fn postscript_name(face: &ttf_parser::Face<'_>) -> String {
    let find = |id: u16| {
        face.names()
            .into_iter()
            .find(|name| name.name_id == id)
            .and_then(|name| name.to_string())
    };
    find(ttf_parser::name_id::POST_SCRIPT_NAME)
        .or_else(|| find(ttf_parser::name_id::FULL_NAME))
        .or_else(|| find(ttf_parser::name_id::FAMILY))
        .map(|name| name.chars().filter(|c| c.is_ascii_graphic()).collect::<String>())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "EmbeddedFont".to_string())
}

/// Up to four faces of one family. Missing faces fall back to the nearest
/// one available, ending at the regular face.
#[derive(Debug, Clone)]
pub struct EmbeddedFamily {
    regular: Arc<FontProgram>,
    bold: Option<Arc<FontProgram>>,
    italic: Option<Arc<FontProgram>>,
    bold_italic: Option<Arc<FontProgram>>,
}

impl EmbeddedFamily {
    pub fn new(regular: FontProgram) -> Self {
        Self {
            regular: Arc::new(regular),
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }

    pub fn with_bold(mut self, program: FontProgram) -> Self {
        self.bold = Some(Arc::new(program));
        self
    }

    pub fn with_italic(mut self, program: FontProgram) -> Self {
        self.italic = Some(Arc::new(program));
        self
    }

    pub fn with_bold_italic(mut self, program: FontProgram) -> Self {
        self.bold_italic = Some(Arc::new(program));
        self
    }

    pub fn face(&self, bold: bool, italic: bool) -> &Arc<FontProgram> {
        let exact = match (bold, italic) {
            (false, false) => None,
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (true, true) => self.bold_italic.as_ref().or(self.bold.as_ref()),
        };
        exact.unwrap_or(&self.regular)
    }

    pub fn from_files(files: &FontFiles) -> Result<Self, FontError> {
        let mut family = Self::new(FontProgram::from_file(&files.regular)?);
        if let Some(path) = &files.bold {
            family = family.with_bold(FontProgram::from_file(path)?);
        }
        if let Some(path) = &files.italic {
            family = family.with_italic(FontProgram::from_file(path)?);
        }
        if let Some(path) = &files.bold_italic {
            family = family.with_bold_italic(FontProgram::from_file(path)?);
        }
        Ok(family)
    }

    /// Looks the family up among the installed system fonts.
    #[cfg(feature = "system-fonts")]
    pub fn from_system(family: &str) -> Result<Self, FontError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Searching {} system font faces for '{}'", db.len(), family);

        let families = [fontdb::Family::Name(family)];
        let find = |weight: fontdb::Weight, style: fontdb::Style| {
            db.query(&fontdb::Query {
                families: &families,
                weight,
                stretch: fontdb::Stretch::Normal,
                style,
            })
        };
        let load = |id: fontdb::ID| -> Result<FontProgram, FontError> {
            db.with_face_data(id, |data, index| FontProgram::parse(data.to_vec(), index))
                .unwrap_or_else(|| Err(FontError::NotFound(family.to_string())))
        };

        let regular_id = find(fontdb::Weight::NORMAL, fontdb::Style::Normal)
            .ok_or_else(|| FontError::NotFound(family.to_string()))?;
        let mut loaded = Self::new(load(regular_id)?);
        let mut seen = vec![regular_id];

        // A family without a dedicated face answers with its closest match,
        // which has already been loaded.
        if let Some(id) = find(fontdb::Weight::BOLD, fontdb::Style::Normal)
            && !seen.contains(&id)
        {
            loaded = loaded.with_bold(load(id)?);
            seen.push(id);
        }
        if let Some(id) = find(fontdb::Weight::NORMAL, fontdb::Style::Italic)
            && !seen.contains(&id)
        {
            loaded = loaded.with_italic(load(id)?);
            seen.push(id);
        }
        if let Some(id) = find(fontdb::Weight::BOLD, fontdb::Style::Italic)
            && !seen.contains(&id)
        {
            loaded = loaded.with_bold_italic(load(id)?);
        }

        log::info!(
            "Using system font '{}' ({})",
            family,
            loaded.regular.postscript_name()
        );
        Ok(loaded)
    }
}

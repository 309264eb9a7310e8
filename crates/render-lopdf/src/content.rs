//! Content-stream emission for a single page.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use prepify_layout::{FontFace, FontProgram, FontRun, ShapedGlyph, StandardFont, TextMetrics};
use prepify_render_core::utils::{flip_y, line_offsets};
use prepify_render_core::{LineStyle, RectStyle, TextOptions};
use prepify_types::{Color, Point, Rect};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A glyph of an embedded font that some page shows.
#[derive(Debug, Clone)]
pub(crate) struct UsedGlyph {
    /// Width table entry in 1/1000 em.
    pub(crate) width: f32,
    /// Characters the glyph maps back to for text extraction.
    pub(crate) text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct EmbeddedFont {
    pub(crate) program: Arc<FontProgram>,
    pub(crate) glyphs: BTreeMap<u16, UsedGlyph>,
}

/// Resource names referenced by page content, collected across all pages.
#[derive(Debug, Default, Clone)]
pub(crate) struct ResourceRegistry {
    /// Opacity levels in thousandths; each becomes an `ExtGState` entry.
    opacities: BTreeSet<u16>,
    embedded: Vec<EmbeddedFont>,
}

impl ResourceRegistry {
    pub(crate) fn font_name(font: StandardFont) -> String {
        let index = StandardFont::ALL
            .iter()
            .position(|candidate| *candidate == font)
            .unwrap_or(0);
        format!("F{}", index + 1)
    }

    pub(crate) fn embedded_font_name(index: usize) -> String {
        format!("E{}", index + 1)
    }

    pub(crate) fn graphics_state_name(millis: u16) -> String {
        format!("GS{}", millis)
    }

    fn opacity_state(&mut self, opacity: f32) -> Option<String> {
        let millis = (opacity.clamp(0.0, 1.0) * 1000.0).round() as u16;
        if millis >= 1000 {
            return None;
        }
        self.opacities.insert(millis);
        Some(Self::graphics_state_name(millis))
    }

    /// Records the glyphs a run shows and returns the font's resource name.
    fn embedded_glyphs(&mut self, program: &Arc<FontProgram>, glyphs: &[ShapedGlyph]) -> String {
        let index = match self
            .embedded
            .iter()
            .position(|font| Arc::ptr_eq(&font.program, program))
        {
            Some(index) => index,
            None => {
                self.embedded.push(EmbeddedFont {
                    program: program.clone(),
                    glyphs: BTreeMap::new(),
                });
                self.embedded.len() - 1
            }
        };

        let font = &mut self.embedded[index];
        for glyph in glyphs {
            let used = font
                .glyphs
                .entry(glyph.glyph_id)
                .or_insert_with(|| UsedGlyph {
                    width: program.glyph_width(glyph.glyph_id),
                    text: String::new(),
                });
            if used.text.is_empty() && !glyph.text.is_empty() {
                used.text = glyph.text.clone();
            }
        }
        Self::embedded_font_name(index)
    }

    pub(crate) fn opacities(&self) -> impl Iterator<Item = u16> + '_ {
        self.opacities.iter().copied()
    }

    pub(crate) fn embedded_fonts(&self) -> &[EmbeddedFont] {
        &self.embedded
    }
}

/// `TJ` operands for shaped glyphs: two-byte glyph ids, with a position
/// adjustment wherever the shaped advance differs from the width table.
fn glyph_array(program: &FontProgram, glyphs: &[ShapedGlyph]) -> Vec<Object> {
    let mut array = Vec::new();
    let mut pending = Vec::new();
    for glyph in glyphs {
        pending.extend_from_slice(&glyph.glyph_id.to_be_bytes());
        let adjustment = program.glyph_width(glyph.glyph_id) - glyph.advance;
        if adjustment.abs() >= 0.5 {
            array.push(Object::String(
                std::mem::take(&mut pending),
                StringFormat::Hexadecimal,
            ));
            array.push(adjustment.into());
        }
    }
    if !pending.is_empty() {
        array.push(Object::String(pending, StringFormat::Hexadecimal));
    }
    array
}

pub(crate) struct PageContext<'a> {
    page_height: f32,
    operations: &'a mut Vec<Operation>,
    resources: &'a mut ResourceRegistry,
    metrics: &'a TextMetrics,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(
        page_height: f32,
        operations: &'a mut Vec<Operation>,
        resources: &'a mut ResourceRegistry,
        metrics: &'a TextMetrics,
    ) -> Self {
        Self {
            page_height,
            operations,
            resources,
            metrics,
        }
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: Color) {
        let [r, g, b] = color.unit_rgb();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn set_stroke_color(&mut self, color: Color) {
        let [r, g, b] = color.unit_rgb();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    /// Every primitive runs inside its own `q ... Q` pair so colour, width
    /// and opacity never carry over into the next one.
    fn isolated(&mut self, draw: impl FnOnce(&mut Self)) {
        self.push("q", vec![]);
        draw(self);
        self.push("Q", vec![]);
    }

    /// Shows one font run at the current text position, switching fonts
    /// only when the run needs a different one.
    fn show_run(&mut self, run: &FontRun<'_>, font_size: f32, current_font: &mut Option<String>) {
        let (name, operator, operand) = match &run.face {
            FontFace::Standard(font) => (
                ResourceRegistry::font_name(*font),
                "Tj",
                Object::String(font.encode(run.text), StringFormat::Literal),
            ),
            FontFace::Embedded(program) => {
                let glyphs = program.shape(run.text);
                let missing: String = glyphs
                    .iter()
                    .filter(|glyph| glyph.glyph_id == 0)
                    .flat_map(|glyph| glyph.text.chars())
                    .filter(|c| !c.is_whitespace())
                    .collect();
                if !missing.is_empty() {
                    log::warn!(
                        "{} has no glyph for \"{}\" in \"{}\"",
                        program.postscript_name(),
                        missing,
                        run.text
                    );
                }
                let name = self.resources.embedded_glyphs(program, &glyphs);
                (name, "TJ", Object::Array(glyph_array(program, &glyphs)))
            }
        };

        if current_font.as_deref() != Some(name.as_str()) {
            self.push(
                "Tf",
                vec![Object::Name(name.clone().into_bytes()), font_size.into()],
            );
            *current_font = Some(name);
        }
        self.push(operator, vec![operand]);
    }

    pub(crate) fn draw_text(&mut self, lines: &[String], x: f32, y: f32, options: &TextOptions) {
        if lines.iter().all(|line| line.trim().is_empty()) {
            return;
        }
        let metrics = self.metrics;
        let offsets = line_offsets(lines, options, metrics);
        let style = options.style;
        let (sin, cos) = options.rotation.to_radians().sin_cos();
        let origin_x = x;
        let origin_y = flip_y(y, self.page_height);

        self.isolated(|ctx| {
            if let Some(state) = ctx.resources.opacity_state(options.opacity) {
                ctx.push("gs", vec![Object::Name(state.into_bytes())]);
            }
            ctx.set_fill_color(style.color);
            ctx.push("BT", vec![]);
            let mut current_font = None;
            for (line, offset) in lines.iter().zip(offsets) {
                if line.is_empty() {
                    continue;
                }
                // Offset in PDF orientation (y up), then rotated about the anchor.
                let (dx, dy) = (offset.dx, -offset.baseline);
                let tx = origin_x + dx * cos - dy * sin;
                let ty = origin_y + dx * sin + dy * cos;
                ctx.push(
                    "Tm",
                    vec![
                        cos.into(),
                        sin.into(),
                        (-sin).into(),
                        cos.into(),
                        tx.into(),
                        ty.into(),
                    ],
                );
                for run in metrics
                    .fonts()
                    .runs(line, style.font_weight, style.font_style)
                {
                    ctx.show_run(&run, style.font_size, &mut current_font);
                }
            }
            ctx.push("ET", vec![]);
        });
    }

    pub(crate) fn draw_rect(&mut self, rect: Rect, style: &RectStyle) {
        let painter = match (style.fill, style.stroke) {
            (Some(_), Some(_)) => "B",
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (None, None) => return,
        };
        let pdf_y = flip_y(rect.bottom(), self.page_height);

        self.isolated(|ctx| {
            if let Some(fill) = style.fill {
                ctx.set_fill_color(fill);
            }
            if let Some(stroke) = style.stroke {
                ctx.set_stroke_color(stroke);
                ctx.push("w", vec![style.line_width.into()]);
            }
            ctx.push(
                "re",
                vec![
                    rect.x.into(),
                    pdf_y.into(),
                    rect.width.into(),
                    rect.height.into(),
                ],
            );
            ctx.push(painter, vec![]);
        });
    }

    pub(crate) fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) {
        let (from_y, to_y) = (
            flip_y(from.y, self.page_height),
            flip_y(to.y, self.page_height),
        );
        self.isolated(|ctx| {
            ctx.set_stroke_color(style.color);
            ctx.push("w", vec![style.width.into()]);
            ctx.push("m", vec![from.x.into(), from_y.into()]);
            ctx.push("l", vec![to.x.into(), to_y.into()]);
            ctx.push("S", vec![]);
        });
    }
}

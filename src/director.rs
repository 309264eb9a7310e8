use crate::config::EngineConfig;
use crate::cursor::LayoutCursor;
use crate::error::EngineError;
use crate::model::{Paper, PaperBundle, Question, Settings};
use crate::question::QuestionBlockRenderer;
use crate::state::{Phase, RenderState};
use prepify_layout::{FittedWatermark, FontLibrary, TextMetrics, WatermarkFitter};
use prepify_render_core::{
    DocumentCanvas, LineStyle, RecordedDocument, RecordingCanvas, TextOptions,
};
use prepify_render_lopdf::LopdfCanvas;
use prepify_style::{TextAlign, TextStyle, VerticalAlign};
use prepify_types::{Point, Size};

/// A finished document plus the file name it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPaper<D> {
    pub document: D,
    pub file_name: String,
}

/// `paper.slug`, else the title, else `paper`, slugified, with `.pdf`.
pub fn file_name_for(paper: &Paper) -> String {
    let stem = [paper.slug.as_str(), paper.title.as_str()]
        .into_iter()
        .map(slug::slugify)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| "paper".to_string());
    format!("{}.pdf", stem)
}

pub fn footer_text(page: usize, total: usize) -> String {
    format!("Page {} of {}", page, total)
}

/// Lays out a whole paper: the header, every question in the order given,
/// then the watermark and page footers on every page once the page count
/// is known.
#[derive(Debug, Clone)]
pub struct PaginationDirector {
    config: EngineConfig,
    metrics: TextMetrics,
}

impl Default for PaginationDirector {
    fn default() -> Self {
        Self::with_fonts(EngineConfig::default(), FontLibrary::standard())
    }
}

impl PaginationDirector {
    /// Loads the configured typeface and prepares the director.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let fonts = FontLibrary::load(&config.typeface)?;
        Ok(Self::with_fonts(config, fonts))
    }

    /// Uses `fonts` instead of loading `config.typeface`.
    pub fn with_fonts(config: EngineConfig, fonts: FontLibrary) -> Self {
        let metrics = TextMetrics::new(config.layout).with_fonts(fonts);
        Self { config, metrics }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.config.page.width(), self.config.page.height())
    }

    /// Renders to PDF bytes.
    pub fn render_pdf(&self, bundle: &PaperBundle) -> Result<RenderedPaper<Vec<u8>>, EngineError> {
        let canvas = LopdfCanvas::new(self.page_size(), self.metrics.clone()).with_title(&bundle.paper.title);
        self.render(&bundle.paper, &bundle.questions, &bundle.settings, canvas)
    }

    /// Renders into a [`RecordedDocument`] for inspection.
    pub fn record(&self, bundle: &PaperBundle) -> Result<RenderedPaper<RecordedDocument>, EngineError> {
        let canvas = RecordingCanvas::new(self.page_size());
        self.render(&bundle.paper, &bundle.questions, &bundle.settings, canvas)
    }

    pub fn render<C: DocumentCanvas>(
        &self,
        paper: &Paper,
        questions: &[Question],
        settings: &Settings,
        mut canvas: C,
    ) -> Result<RenderedPaper<C::Output>, EngineError> {
        let mut cursor = LayoutCursor::new(canvas.page_size(), &self.config.page.margins);
        if cursor.bounds().width <= 0.0 || cursor.usable_height() <= 0.0 {
            return Err(EngineError::Config(
                "page margins leave no content area".to_string(),
            ));
        }
        cursor.begin(&mut canvas)?;

        let base = TextStyle::new(self.config.fonts.option).with_color(self.config.colors.text);
        let mut state = RenderState::new(canvas, cursor, self.metrics.clone(), base);
        log::debug!(
            "Rendering '{}' with {} question(s), phase {:?}",
            paper.title,
            questions.len(),
            state.phase()
        );

        self.render_header(paper, &mut state)?;

        state.enter(Phase::QuestionLoop)?;
        let block_renderer = QuestionBlockRenderer::new(&self.config);
        for question in questions {
            block_renderer.render(question, &mut state)?;
        }

        state.enter(Phase::Decorate)?;
        self.decorate(settings, &mut state)?;

        state.enter(Phase::Done)?;
        let document = state.into_canvas().save()?;
        Ok(RenderedPaper {
            document,
            file_name: file_name_for(paper),
        })
    }

    fn render_header<C: DocumentCanvas>(
        &self,
        paper: &Paper,
        state: &mut RenderState<C>,
    ) -> Result<(), EngineError> {
        let fonts = self.config.fonts;
        let colors = self.config.colors;
        let spacing = self.config.spacing;
        let bounds = state.cursor.bounds();
        let center = bounds.x + bounds.width / 2.0;

        let title = TextStyle::new(fonts.title).bold().with_color(colors.text);
        state.with_style(title, |s| {
            let lines = s.wrap(&paper.title, bounds.width);
            s.place_lines(&lines, center, TextAlign::Center, |_, _| Ok(()))
        })?;

        let description = paper.description.trim();
        if !description.is_empty() {
            state.cursor.skip(spacing.header_gap);
            let style = TextStyle::new(fonts.description).with_color(colors.text);
            state.with_style(style, |s| {
                let lines = s.wrap(description, bounds.width);
                s.place_lines(&lines, center, TextAlign::Center, |_, _| Ok(()))
            })?;
        }

        state.cursor.skip(spacing.header_gap);
        let rule = LineStyle {
            color: colors.divider,
            width: 1.0,
        };
        state.cursor.ensure_fits(rule.width, &mut state.canvas)?;
        let y = state.cursor.y() + rule.width / 2.0;
        state.canvas.draw_line(
            Point::new(bounds.x, y),
            Point::new(bounds.right(), y),
            &rule,
        )?;
        state.cursor.advance(rule.width)?;
        state.cursor.skip(spacing.after_divider);
        Ok(())
    }

    fn fitted_watermark(&self, settings: &Settings, page_width: f32) -> Option<FittedWatermark> {
        if !settings.pdf_watermark_enabled {
            return None;
        }
        let fitter = WatermarkFitter::new(self.metrics.clone(), self.config.watermark.fit);
        let fitted = fitter.fit(&settings.pdf_watermark_text, &settings.site_name, page_width);
        if fitted.is_none() {
            log::warn!("Watermark is enabled but its text is empty; pages are left unmarked");
        }
        fitted
    }

    /// Second pass: stamps every page once the page count is final.
    fn decorate<C: DocumentCanvas>(
        &self,
        settings: &Settings,
        state: &mut RenderState<C>,
    ) -> Result<(), EngineError> {
        let size = state.canvas.page_size();
        let total = state.canvas.page_count();
        let watermark = self.fitted_watermark(settings, size.width);
        let style = self.config.watermark;
        let center = size.center();

        let footer_style = TextStyle::new(self.config.fonts.footer).with_color(self.config.colors.muted);
        let footer_y = size.height - self.config.page.margins.bottom / 2.0;

        for page in 0..total {
            state.canvas.set_page(page)?;

            if let Some(watermark) = &watermark {
                let text = TextStyle::new(watermark.font_size)
                    .bold()
                    .with_color(style.color);
                let options = TextOptions::new(text, self.metrics.line_height(watermark.font_size))
                    .align(TextAlign::Center)
                    .valign(VerticalAlign::Middle)
                    .rotated(style.fit.angle)
                    .with_opacity(style.opacity);
                state
                    .canvas
                    .draw_text(&watermark.lines, center.x, center.y, &options)?;
            }

            state.with_style(footer_style, |s| {
                let options = TextOptions::new(s.style(), s.line_height())
                    .align(TextAlign::Center)
                    .valign(VerticalAlign::Middle);
                s.canvas
                    .draw_text(&[footer_text(page + 1, total)], center.x, footer_y, &options)?;
                Ok(())
            })?;
        }
        log::debug!("Decorated {} page(s)", total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CorrectAnswer, QuestionKind};
    use prepify_render_core::DrawCommand;

    fn physics_bundle() -> PaperBundle {
        PaperBundle {
            paper: Paper {
                title: "Physics 101".to_string(),
                description: "Mechanics warm-up".to_string(),
                slug: "physics-101".to_string(),
            },
            questions: vec![Question {
                order: 1,
                kind: QuestionKind::Mcq,
                question_text: "What is 2 + 2?".to_string(),
                options: Some(vec!["1".into(), "2".into(), "3".into(), "4".into()]),
                correct_answer: Some(CorrectAnswer::Single("4".into())),
                explanation: None,
            }],
            settings: Settings::default(),
        }
    }

    fn arithmetic_bundle(count: u32) -> PaperBundle {
        let questions = (1..=count)
            .map(|n| Question {
                order: n,
                kind: if n % 2 == 0 {
                    QuestionKind::ShortAnswer
                } else {
                    QuestionKind::Mcq
                },
                question_text: format!("What is {} + {}?", n, n),
                options: (n % 2 == 1).then(|| {
                    vec![(2 * n).to_string(), (2 * n + 1).to_string(), (n).to_string()]
                }),
                correct_answer: Some(CorrectAnswer::Single((2 * n).to_string())),
                explanation: (n % 3 == 0).then(|| format!("Doubling {} gives {}.", n, 2 * n)),
            })
            .collect();
        PaperBundle {
            paper: Paper {
                title: "Arithmetic drill".to_string(),
                description: String::new(),
                slug: String::new(),
            },
            questions,
            settings: Settings {
                pdf_watermark_enabled: true,
                pdf_watermark_text: "Downloaded From {siteName}".to_string(),
                site_name: "TKS Prepify".to_string(),
            },
        }
    }

    fn watermarks(document: &RecordedDocument, page: usize) -> usize {
        document
            .text_commands(page)
            .filter(|command| matches!(command, DrawCommand::Text { options, .. } if options.rotation != 0.0))
            .count()
    }

    #[test]
    fn test_physics_101_single_page() {
        let rendered = PaginationDirector::default().record(&physics_bundle()).unwrap();
        let document = &rendered.document;

        assert_eq!(rendered.file_name, "physics-101.pdf");
        assert_eq!(document.page_count(), 1);
        assert_eq!(watermarks(document, 0), 0);

        let text = document.page_text(0);
        assert_eq!(text.first(), Some(&"Physics 101"));
        assert_eq!(text.last(), Some(&"Page 1 of 1"));
        assert!(text.contains(&"Question 1: What is 2 + 2?"));
    }

    #[test]
    fn test_every_question_rendered_once_in_order() {
        let bundle = arithmetic_bundle(60);
        let rendered = PaginationDirector::default().record(&bundle).unwrap();
        let document = &rendered.document;

        let prompts: Vec<String> = (0..document.page_count())
            .flat_map(|page| document.page_text(page))
            .filter(|line| line.starts_with("Question "))
            .map(str::to_string)
            .collect();
        let expected: Vec<String> = bundle.questions.iter().map(Question::prompt).collect();
        assert_eq!(prompts, expected);
        assert_eq!(rendered.file_name, "arithmetic-drill.pdf");
    }

    #[test]
    fn test_footers_and_watermarks_on_every_page() {
        let rendered = PaginationDirector::default().record(&arithmetic_bundle(60)).unwrap();
        let document = &rendered.document;
        let total = document.page_count();
        assert!(total > 1);

        for page in 0..total {
            let footers: Vec<&str> = document
                .page_text(page)
                .into_iter()
                .filter(|line| line.starts_with("Page "))
                .collect();
            let expected = footer_text(page + 1, total);
            assert_eq!(footers, vec![expected.as_str()]);
            assert_eq!(watermarks(document, page), 1);
        }
    }

    #[test]
    fn test_watermark_drawn_after_content() {
        let rendered = PaginationDirector::default().record(&arithmetic_bundle(3)).unwrap();
        let page = &rendered.document.pages[0];
        let last_two: Vec<_> = page.iter().rev().take(2).collect();

        match last_two[1] {
            DrawCommand::Text { lines, options, .. } => {
                assert_eq!(lines, &vec!["Downloaded From TKS Prepify".to_string()]);
                assert_eq!(options.rotation, -45.0);
                assert_eq!(options.opacity, 0.15);
                assert!(options.style.font_weight.is_bold());
            }
            other => panic!("expected watermark text, got {:?}", other),
        }
        assert_eq!(last_two[0].lines(), &["Page 1 of 1".to_string()]);
    }

    #[test]
    fn test_footer_keeps_its_own_style() {
        let director = PaginationDirector::default();
        let config = director.config();
        let rendered = director.record(&arithmetic_bundle(60)).unwrap();
        let document = &rendered.document;
        let total = document.page_count();

        for page in 0..total {
            let footer = document
                .text_commands(page)
                .find_map(|command| match command {
                    DrawCommand::Text { lines, options, .. } if lines[0].starts_with("Page ") => {
                        Some(options.style)
                    }
                    _ => None,
                })
                .unwrap();
            assert_eq!(footer.font_size, config.fonts.footer);
            assert_eq!(footer.color, config.colors.muted);
            assert!(!footer.font_weight.is_bold());
        }

        // Page 1 also carries bold accent options, drawn before its footer.
        let accented = document
            .text_commands(0)
            .filter_map(|command| match command {
                DrawCommand::Text { options, .. } if options.rotation == 0.0 => Some(options.style),
                _ => None,
            })
            .any(|style| style.font_weight.is_bold() && style.color == config.colors.accent);
        assert!(accented);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let mut config = EngineConfig::default();
        config.spacing.after_question = -400.0;
        assert!(matches!(
            PaginationDirector::new(config),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_negative_gaps_never_lift_text_above_top_margin() {
        let mut config = EngineConfig::default();
        config.spacing.after_question = -400.0;
        config.spacing.after_divider = -50.0;
        let director = PaginationDirector::with_fonts(config, FontLibrary::standard());
        let rendered = director.record(&arithmetic_bundle(10)).unwrap();
        let top = director.config().page.margins.top;

        for page in &rendered.document.pages {
            for command in page {
                if let DrawCommand::Text { lines, y, options, .. } = command
                    && options.rotation == 0.0
                    && !lines[0].starts_with("Page ")
                {
                    assert!(*y >= top - 0.01, "{:?} drawn at {}", lines, y);
                }
            }
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let director = PaginationDirector::default();
        let bundle = arithmetic_bundle(25);
        let first = director.record(&bundle).unwrap();
        let second = director.record(&bundle).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_breaks_never_cross_bottom_margin() {
        let director = PaginationDirector::default();
        let rendered = director.record(&arithmetic_bundle(60)).unwrap();
        let margins = &director.config().page.margins;
        let bottom = director.page_size().height - margins.bottom;

        for page in &rendered.document.pages {
            for command in page {
                match command {
                    DrawCommand::Text { lines, y, options, .. }
                        if options.rotation == 0.0 && !lines[0].starts_with("Page ") =>
                    {
                        let height = lines.len() as f32 * options.line_height;
                        assert!(y + height <= bottom + 0.01, "{:?} crosses the margin", lines);
                        assert!(*y >= margins.top - 0.01);
                    }
                    DrawCommand::Rect { rect, .. } => assert!(rect.bottom() <= bottom + 0.01),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_file_name_fallbacks() {
        let mut paper = Paper {
            title: "Grade 10: Algebra & Functions".to_string(),
            description: String::new(),
            slug: "  ".to_string(),
        };
        assert_eq!(file_name_for(&paper), "grade-10-algebra-functions.pdf");
        paper.slug = "Algebra II".to_string();
        assert_eq!(file_name_for(&paper), "algebra-ii.pdf");
        paper.slug.clear();
        paper.title = "!!!".to_string();
        assert_eq!(file_name_for(&paper), "paper.pdf");
    }

    #[test]
    fn test_empty_watermark_text_degrades() {
        let mut bundle = physics_bundle();
        bundle.settings.pdf_watermark_enabled = true;
        bundle.settings.pdf_watermark_text = " \\n ".to_string();
        let rendered = PaginationDirector::default().record(&bundle).unwrap();
        assert_eq!(watermarks(&rendered.document, 0), 0);
        assert_eq!(rendered.document.page_text(0).last(), Some(&"Page 1 of 1"));
    }
}

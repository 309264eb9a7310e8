use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{Question, QuestionKind};
use crate::state::RenderState;
use prepify_render_core::{DocumentCanvas, LineStyle, RectStyle};
use prepify_style::{FontStyle, TextAlign, TextStyle};
use prepify_types::{Color, Point, Rect};

pub const ANSWER_LABEL: &str = "Correct Answer:";
pub const EXPLANATION_LABEL: &str = "Explanation:";
pub const BULLET: &str = "\u{2022}";

/// A shaded box with a bold label row followed by wrapped body text.
struct Panel<'a> {
    label: &'a str,
    body: TextStyle,
    lines: Vec<String>,
    style: RectStyle,
}

/// Renders one question at the layout cursor: the prompt, then its options
/// or answer panel, then the explanation callout.
pub struct QuestionBlockRenderer<'a> {
    config: &'a EngineConfig,
}

impl<'a> QuestionBlockRenderer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    fn text_style(&self, font_size: f32) -> TextStyle {
        TextStyle::new(font_size).with_color(self.config.colors.text)
    }

    pub fn render<C: DocumentCanvas>(
        &self,
        question: &Question,
        state: &mut RenderState<C>,
    ) -> Result<(), EngineError> {
        let spacing = self.config.spacing;

        self.render_prompt(question, state)?;
        state.cursor.skip(spacing.after_prompt);

        match question.kind {
            QuestionKind::Mcq => self.render_options(question, state)?,
            QuestionKind::ShortAnswer => self.render_answer(question, state)?,
        }

        if let Some(explanation) = question.explanation_text() {
            let body = self.text_style(self.config.fonts.panel).italic();
            let lines = state
                .metrics()
                .wrap_styled(explanation, self.panel_text_width(state), &body);
            let colors = self.config.colors;
            state.cursor.skip(spacing.before_panel);
            self.render_panel(
                state,
                Panel {
                    label: EXPLANATION_LABEL,
                    body,
                    lines,
                    style: RectStyle::filled(colors.explanation_fill)
                        .with_stroke(colors.explanation_border, 0.5),
                },
            )?;
        }

        state.cursor.skip(spacing.after_question);
        Ok(())
    }

    fn render_prompt<C: DocumentCanvas>(
        &self,
        question: &Question,
        state: &mut RenderState<C>,
    ) -> Result<(), EngineError> {
        let style = self.text_style(self.config.fonts.prompt).bold();
        let left = state.cursor.bounds().x;
        let width = state.cursor.bounds().width;
        state.with_style(style, |s| {
            let lines = s.wrap(&question.prompt(), width);
            s.place_lines(&lines, left, TextAlign::Left, |_, _| Ok(()))
        })
    }

    fn render_options<C: DocumentCanvas>(
        &self,
        question: &Question,
        state: &mut RenderState<C>,
    ) -> Result<(), EngineError> {
        let options = match question.options.as_deref() {
            Some(options) if !options.is_empty() => options,
            _ => {
                log::warn!(
                    "Question {} is multiple choice but has no options; rendering the prompt only",
                    question.order
                );
                return Ok(());
            }
        };
        match &question.correct_answer {
            None => log::warn!(
                "Question {} has no correct answer; options are rendered without highlighting",
                question.order
            ),
            Some(_) if !options.iter().any(|option| question.is_correct(option)) => log::warn!(
                "Question {}: the correct answer matches none of its options",
                question.order
            ),
            Some(_) => {}
        }

        let bounds = state.cursor.bounds();
        let text_x = bounds.x + self.config.spacing.option_indent;
        let text_width = (bounds.width - self.config.spacing.option_indent).max(1.0);
        let accent = self.config.colors.accent;

        for (index, option) in options.iter().enumerate() {
            if index > 0 {
                state.cursor.skip(self.config.spacing.between_options);
            }
            let correct = question.is_correct(option);
            let style = if correct {
                self.text_style(self.config.fonts.option)
                    .bold()
                    .with_color(accent)
            } else {
                self.text_style(self.config.fonts.option)
            };

            state.with_style(style, |s| {
                let lines = s.wrap(option, text_width);
                s.place_lines(&lines, text_x, TextAlign::Left, |s, y| {
                    if correct {
                        Self::draw_check_mark(s, bounds.x, y, accent)
                    } else {
                        s.draw_lines(&[BULLET.to_string()], bounds.x + 4.0, y, TextAlign::Left)
                    }
                })
            })?;
        }
        Ok(())
    }

    /// A two-stroke tick sized to the first line of an option.
    fn draw_check_mark<C: DocumentCanvas>(
        state: &mut RenderState<C>,
        x: f32,
        y: f32,
        color: Color,
    ) -> Result<(), EngineError> {
        let size = state.style().font_size;
        let top = y + (state.line_height() - size) / 2.0;
        let pen = LineStyle {
            color,
            width: (size / 8.0).max(0.75),
        };
        let start = Point::new(x + 2.0, top + size * 0.55);
        let valley = Point::new(x + 2.0 + size * 0.35, top + size * 0.85);
        let tip = Point::new(x + 2.0 + size * 0.9, top + size * 0.15);
        state.canvas.draw_line(start, valley, &pen)?;
        state.canvas.draw_line(valley, tip, &pen)?;
        Ok(())
    }

    fn render_answer<C: DocumentCanvas>(
        &self,
        question: &Question,
        state: &mut RenderState<C>,
    ) -> Result<(), EngineError> {
        let Some(answer) = question.correct_answer.as_ref() else {
            log::warn!(
                "Question {} has no correct answer; the answer panel is left out",
                question.order
            );
            return Ok(());
        };

        let body = self.text_style(self.config.fonts.panel);
        let lines = state
            .metrics()
            .wrap_styled(&answer.display_text(), self.panel_text_width(state), &body);
        let colors = self.config.colors;
        state.cursor.skip(self.config.spacing.before_panel);
        self.render_panel(
            state,
            Panel {
                label: ANSWER_LABEL,
                body,
                lines,
                style: RectStyle::filled(colors.answer_fill).with_stroke(colors.accent, 0.75),
            },
        )
    }

    fn panel_text_width<C: DocumentCanvas>(&self, state: &RenderState<C>) -> f32 {
        (state.cursor.bounds().width - 2.0 * self.config.spacing.panel_padding).max(1.0)
    }

    /// Sizes a panel from its wrapped lines and places it atomically. Text
    /// too long for one page continues in further panels on later pages.
    fn render_panel<C: DocumentCanvas>(
        &self,
        state: &mut RenderState<C>,
        panel: Panel<'_>,
    ) -> Result<(), EngineError> {
        let padding = self.config.spacing.panel_padding;
        let bounds = state.cursor.bounds();
        let label_style = TextStyle {
            font_style: FontStyle::Normal,
            ..panel.body.bold()
        };

        state.with_style(panel.body, |s| {
            let line_height = s.line_height();
            let rows_per_panel = s.lines_per_page(2.0 * padding)?;
            let mut remaining: &[String] = &panel.lines;
            let mut first = true;

            loop {
                let label_rows = usize::from(first);
                let capacity = rows_per_panel.saturating_sub(label_rows).max(1);
                let (chunk, rest) = remaining.split_at(remaining.len().min(capacity));
                let rows = chunk.len() + label_rows;
                let height = rows as f32 * line_height + 2.0 * padding;

                s.cursor.ensure_fits(height, &mut s.canvas)?;
                let top = s.cursor.y();
                s.canvas.draw_rect(
                    Rect::new(bounds.x, top, bounds.width, height),
                    &panel.style,
                )?;

                let text_x = bounds.x + padding;
                let mut text_y = top + padding;
                if first {
                    s.with_style(label_style, |s| {
                        s.draw_lines(&[panel.label.to_string()], text_x, text_y, TextAlign::Left)
                    })?;
                    text_y += line_height;
                }
                if !chunk.is_empty() {
                    s.draw_lines(chunk, text_x, text_y, TextAlign::Left)?;
                }
                s.cursor.advance(height)?;

                remaining = rest;
                first = false;
                if remaining.is_empty() {
                    return Ok(());
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::LayoutCursor;
    use crate::model::CorrectAnswer;
    use prepify_layout::TextMetrics;
    use prepify_render_core::{DrawCommand, RecordedDocument, RecordingCanvas};
    use prepify_style::FontWeight;
    use prepify_types::Size;

    fn mcq(options: &[&str], answer: Option<CorrectAnswer>) -> Question {
        Question {
            order: 1,
            kind: QuestionKind::Mcq,
            question_text: "Pick one".to_string(),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            correct_answer: answer,
            explanation: None,
        }
    }

    fn render(question: &Question, config: &EngineConfig) -> RecordedDocument {
        let size = Size::new(config.page.width(), config.page.height());
        let mut cursor = LayoutCursor::new(size, &config.page.margins);
        let mut canvas = RecordingCanvas::new(size);
        cursor.begin(&mut canvas).unwrap();
        let mut state = RenderState::new(
            canvas,
            cursor,
            TextMetrics::new(config.layout),
            TextStyle::new(config.fonts.option),
        );
        QuestionBlockRenderer::new(config).render(question, &mut state).unwrap();
        assert_eq!(state.style_depth(), 1);
        state.into_canvas().save().unwrap()
    }

    fn option_style(document: &RecordedDocument, text: &str) -> TextStyle {
        document
            .pages
            .iter()
            .flatten()
            .find_map(|command| match command {
                DrawCommand::Text { lines, options, .. } if lines.first().map(String::as_str) == Some(text) => {
                    Some(options.style)
                }
                _ => None,
            })
            .unwrap()
    }

    fn tick_count(document: &RecordedDocument) -> usize {
        document
            .pages
            .iter()
            .flatten()
            .filter(|command| matches!(command, DrawCommand::Line { .. }))
            .count()
            / 2
    }

    #[test]
    fn test_single_answer_highlighting() {
        let config = EngineConfig::default();
        let document = render(&mcq(&["1", "2", "3", "4"], Some(CorrectAnswer::Single("4".into()))), &config);

        let correct = option_style(&document, "4");
        assert_eq!(correct.font_weight, FontWeight::Bold);
        assert_eq!(correct.color, config.colors.accent);
        for plain in ["1", "2", "3"] {
            let style = option_style(&document, plain);
            assert_eq!(style.font_weight, FontWeight::Regular);
            assert_eq!(style.color, config.colors.text);
        }
        assert_eq!(tick_count(&document), 1);
        assert_eq!(document.page_text(0).iter().filter(|t| **t == BULLET).count(), 3);
    }

    #[test]
    fn test_multiple_answers_highlighting() {
        let config = EngineConfig::default();
        let answer = CorrectAnswer::Multiple(vec!["2".into(), "7".into()]);
        let document = render(&mcq(&["2", "4", "7", "9"], Some(answer)), &config);

        for (option, bold) in [("2", true), ("4", false), ("7", true), ("9", false)] {
            assert_eq!(option_style(&document, option).font_weight.is_bold(), bold, "{option}");
        }
        assert_eq!(tick_count(&document), 2);
    }

    #[test]
    fn test_missing_answer_renders_all_plain() {
        let config = EngineConfig::default();
        let document = render(&mcq(&["a", "b"], None), &config);
        assert_eq!(tick_count(&document), 0);
        assert_eq!(option_style(&document, "a").font_weight, FontWeight::Regular);
    }

    #[test]
    fn test_mcq_without_options_renders_prompt_only() {
        let config = EngineConfig::default();
        let mut question = mcq(&[], Some(CorrectAnswer::Single("x".into())));
        question.explanation = Some(String::new());
        let document = render(&question, &config);
        assert_eq!(document.page_text(0), vec!["Question 1: Pick one"]);
    }

    #[test]
    fn test_short_answer_panel_and_explanation() {
        let config = EngineConfig::default();
        let question = Question {
            order: 2,
            kind: QuestionKind::ShortAnswer,
            question_text: "Name two noble gases".to_string(),
            options: None,
            correct_answer: Some(CorrectAnswer::Multiple(vec!["Neon".into(), "Argon".into()])),
            explanation: Some("Both sit in group 18.".to_string()),
        };
        let document = render(&question, &config);

        assert_eq!(
            document.page_text(0),
            vec![
                "Question 2: Name two noble gases",
                ANSWER_LABEL,
                "Neon, Argon",
                EXPLANATION_LABEL,
                "Both sit in group 18."
            ]
        );
        let rects: Vec<_> = document.pages[0]
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect { rect, style } => Some((*rect, *style)),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].1.fill, Some(config.colors.answer_fill));
        assert_eq!(rects[1].1.fill, Some(config.colors.explanation_fill));

        // Label row + one answer line + padding on both sides.
        let line_height = 10.0 * 1.2;
        assert!((rects[0].0.height - (2.0 * line_height + 12.0)).abs() < 1e-3);

        let explanation = option_style(&document, "Both sit in group 18.");
        assert_eq!(explanation.font_style, FontStyle::Italic);
        let label = option_style(&document, EXPLANATION_LABEL);
        assert_eq!(label.font_style, FontStyle::Normal);
        assert!(label.font_weight.is_bold());
    }

    #[test]
    fn test_long_option_moves_to_next_page_whole() {
        let mut config = EngineConfig::default();
        config.page.size = prepify_style::PageSize::Custom {
            width: 300.0,
            height: 200.0,
        };
        config.page.margins = prepify_style::Margins::all(20.0);
        // 160pt of content: the prompt plus twelve options overflow it.
        let options: Vec<String> = (0..12).map(|i| format!("Option number {}", i)).collect();
        let refs: Vec<&str> = options.iter().map(String::as_str).collect();
        let document = render(&mcq(&refs, Some(CorrectAnswer::Single("Option number 11".into()))), &config);

        assert_eq!(document.page_count(), 2);
        let (page, command) = document.find_text("Option number 11").unwrap();
        assert!(page > 0);
        if let DrawCommand::Text { y, .. } = command {
            assert!(*y >= 20.0);
        }
        // The tick is drawn on the same page as its option.
        assert!(document.pages[page].iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_oversized_answer_is_split_across_pages() {
        let mut config = EngineConfig::default();
        config.page.size = prepify_style::PageSize::Custom {
            width: 300.0,
            height: 200.0,
        };
        config.page.margins = prepify_style::Margins::all(20.0);
        let answer = vec!["word"; 400].join(" ");
        let question = Question {
            order: 1,
            kind: QuestionKind::ShortAnswer,
            question_text: "Essay".to_string(),
            options: None,
            correct_answer: Some(CorrectAnswer::Single(answer)),
            explanation: None,
        };
        let document = render(&question, &config);

        assert!(document.page_count() >= 3);
        // Only the first panel carries the label.
        let labels = document
            .pages
            .iter()
            .flatten()
            .filter(|c| c.lines().first().map(String::as_str) == Some(ANSWER_LABEL))
            .count();
        assert_eq!(labels, 1);
        for page in &document.pages {
            for command in page {
                if let DrawCommand::Rect { rect, .. } = command {
                    assert!(rect.bottom() <= 180.0 + 0.01);
                }
            }
        }
    }
}

use prepify_style::{TextAlign, TextStyle, VerticalAlign};
use prepify_types::{Color, Point, Rect, Size};

/// How a block of lines is placed and painted by [`DocumentCanvas::draw_text`].
///
/// [`DocumentCanvas::draw_text`]: crate::DocumentCanvas::draw_text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOptions {
    pub style: TextStyle,
    /// Distance between consecutive baselines.
    pub line_height: f32,
    /// Horizontal meaning of the anchor `x`: left edge, centre or right edge.
    pub align: TextAlign,
    pub valign: VerticalAlign,
    /// Degrees, counter-clockwise in page space, about the anchor point.
    pub rotation: f32,
    /// `0.0..=1.0`; values outside are clamped by backends.
    pub opacity: f32,
}

impl TextOptions {
    pub fn new(style: TextStyle, line_height: f32) -> Self {
        Self {
            style,
            line_height,
            align: TextAlign::Left,
            valign: VerticalAlign::Top,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f32,
}

impl RectStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            line_width: 0.0,
        }
    }

    pub fn with_stroke(mut self, color: Color, line_width: f32) -> Self {
        self.stroke = Some(color);
        self.line_width = line_width;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0.5,
        }
    }
}

/// One drawing operation as issued to a canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        lines: Vec<String>,
        x: f32,
        y: f32,
        options: TextOptions,
    },
    Rect {
        rect: Rect,
        style: RectStyle,
    },
    Line {
        from: Point,
        to: Point,
        style: LineStyle,
    },
}

impl DrawCommand {
    /// The text lines of a text command, empty for shapes.
    pub fn lines(&self) -> &[String] {
        match self {
            DrawCommand::Text { lines, .. } => lines,
            _ => &[],
        }
    }
}

/// Every command issued to a [`RecordingCanvas`], grouped by page.
///
/// [`RecordingCanvas`]: crate::RecordingCanvas
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDocument {
    pub page_size: Size,
    pub pages: Vec<Vec<DrawCommand>>,
}

impl RecordedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text commands on `page` in issue order.
    pub fn text_commands(&self, page: usize) -> impl Iterator<Item = &DrawCommand> {
        self.pages
            .get(page)
            .into_iter()
            .flatten()
            .filter(|command| matches!(command, DrawCommand::Text { .. }))
    }

    /// All text lines on `page`, flattened in issue order.
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.text_commands(page)
            .flat_map(|command| command.lines().iter().map(String::as_str))
            .collect()
    }

    /// Finds the first text command whose first line starts with `prefix`,
    /// returning its page index alongside it.
    pub fn find_text(&self, prefix: &str) -> Option<(usize, &DrawCommand)> {
        self.pages.iter().enumerate().find_map(|(page, commands)| {
            commands
                .iter()
                .find(|command| {
                    command
                        .lines()
                        .first()
                        .is_some_and(|line| line.starts_with(prefix))
                })
                .map(|command| (page, command))
        })
    }
}

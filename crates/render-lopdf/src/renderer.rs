use crate::content::{PageContext, ResourceRegistry};
use crate::embed::{embed_font, flate_stream, text_string};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, dictionary};
use prepify_layout::{StandardFont, TextMetrics};
use prepify_render_core::{
    DocumentCanvas, LineStyle, PageSet, RectStyle, RenderError, TextOptions,
};
use prepify_types::{Point, Rect, Size};

/// An in-memory PDF canvas built on `lopdf`.
///
/// Page content is collected as operation lists so earlier pages stay
/// editable until [`save`](DocumentCanvas::save) assembles the object graph.
pub struct LopdfCanvas {
    page_size: Size,
    metrics: TextMetrics,
    title: Option<String>,
    pages: PageSet<Vec<Operation>>,
    resources: ResourceRegistry,
}

impl LopdfCanvas {
    pub fn new(page_size: Size, metrics: TextMetrics) -> Self {
        Self {
            page_size,
            metrics,
            title: None,
            pages: PageSet::new(),
            resources: ResourceRegistry::default(),
        }
    }

    /// Sets the `/Title` entry of the document information dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn context(&mut self) -> Result<PageContext<'_>, RenderError> {
        let operations = self.pages.current_mut()?;
        Ok(PageContext::new(
            self.page_size.height,
            operations,
            &mut self.resources,
            &self.metrics,
        ))
    }

    fn font_resources(&self, document: &mut Document) -> Result<Dictionary, RenderError> {
        let mut fonts = Dictionary::new();
        for font in StandardFont::ALL {
            let mut dict = dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.postscript_name(),
            };
            // Symbol keeps its built-in encoding.
            if font.uses_win_ansi() {
                dict.set("Encoding", "WinAnsiEncoding");
            }
            fonts.set(ResourceRegistry::font_name(font), document.add_object(dict));
        }
        for (index, font) in self.resources.embedded_fonts().iter().enumerate() {
            let font_id = embed_font(document, font)?;
            fonts.set(ResourceRegistry::embedded_font_name(index), font_id);
        }
        Ok(fonts)
    }

    fn graphics_state_resources(&self, document: &mut Document) -> Dictionary {
        let mut states = Dictionary::new();
        for millis in self.resources.opacities() {
            let alpha = millis as f32 / 1000.0;
            let state_id = document.add_object(dictionary! {
                "Type" => "ExtGState",
                "ca" => alpha,
                "CA" => alpha,
            });
            states.set(ResourceRegistry::graphics_state_name(millis), state_id);
        }
        states
    }
}

impl DocumentCanvas for LopdfCanvas {
    type Output = Vec<u8>;

    fn page_size(&self) -> Size {
        self.page_size
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn set_page(&mut self, index: usize) -> Result<(), RenderError> {
        self.pages.select(index)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn draw_text(
        &mut self,
        lines: &[String],
        x: f32,
        y: f32,
        options: &TextOptions,
    ) -> Result<(), RenderError> {
        self.context()?.draw_text(lines, x, y, options);
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, style: &RectStyle) -> Result<(), RenderError> {
        self.context()?.draw_rect(rect, style);
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) -> Result<(), RenderError> {
        self.context()?.draw_line(from, to, style);
        Ok(())
    }

    fn save(self) -> Result<Vec<u8>, RenderError> {
        if self.pages.is_empty() {
            return Err(RenderError::NoPage);
        }

        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();

        let fonts = self.font_resources(&mut document)?;
        let states = self.graphics_state_resources(&mut document);
        let mut resources = dictionary! { "Font" => fonts };
        if !states.is_empty() {
            resources.set("ExtGState", states);
        }
        let resources_id = document.add_object(resources);

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            self.page_size.width.into(),
            self.page_size.height.into(),
        ];

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages.into_pages() {
            let content = Content { operations }
                .encode()
                .map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = document.add_object(flate_stream(Dictionary::new(), &content)?);
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        if let Some(title) = &self.title {
            let info_id = document.add_object(dictionary! {
                "Title" => text_string(title),
                "Producer" => Object::string_literal("prepify"),
            });
            document.trailer.set("Info", info_id);
        }

        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        log::debug!("Saved PDF with {} page(s), {} bytes", page_count, buffer.len());
        Ok(buffer)
    }
}

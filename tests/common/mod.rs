#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use prepify::{EngineConfig, EngineError, PaginationDirector, PaperBundle};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub file_name: String,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>, file_name: String) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self {
            bytes,
            doc,
            file_name,
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text shown on page `page_num` (1-based), one entry per shown string.
    pub fn page_text(&self, page_num: u32) -> Vec<String> {
        pdf_assertions::page_strings(&self.doc, page_num)
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Render a bundle with the default engine configuration
pub fn generate_pdf(bundle: &PaperBundle) -> Result<GeneratedPdf, EngineError> {
    generate_pdf_with_config(bundle, EngineConfig::default())
}

pub fn generate_pdf_with_config(
    bundle: &PaperBundle,
    config: EngineConfig,
) -> Result<GeneratedPdf, EngineError> {
    let rendered = PaginationDirector::new(config)?.render_pdf(bundle)?;
    GeneratedPdf::from_bytes(rendered.document, rendered.file_name)
        .map_err(|e| EngineError::Config(format!("generated PDF does not load: {}", e)))
}

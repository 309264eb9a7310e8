use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Page index {index} is out of range for a document with {count} page(s)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("Nothing can be drawn before the first page is added")]
    NoPage,
}

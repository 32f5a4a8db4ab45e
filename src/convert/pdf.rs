//! PDF document converter implementation.

use crate::error::Result;
use crate::model::{EditorDocument, Metadata, ParseResult};
use crate::parser::{parse_pdf_canvas, parse_pdf_tree, PdfParser};
use crate::render::render_pdf;

use super::{ConvertOptions, DocumentConverter};

/// PDF document converter.
///
/// Imports one paragraph per text line and exports through the flow composer.
#[derive(Debug, Clone, Default)]
pub struct PdfConverter {
    _private: (),
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn import_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<EditorDocument> {
        parse_pdf_tree(bytes, &options.parse)
    }

    fn parse_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ParseResult> {
        parse_pdf_canvas(bytes, &options.parse)
    }

    fn export(&self, doc: &EditorDocument, options: &ConvertOptions) -> Result<Vec<u8>> {
        render_pdf(doc, &options.render)
    }

    fn metadata(&self, bytes: &[u8]) -> Result<Metadata> {
        Ok(PdfParser::from_bytes(bytes)?.metadata())
    }
}

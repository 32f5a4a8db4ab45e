//! DOCX converter.

use crate::error::Result;
use crate::model::{EditorDocument, Metadata, ParseResult};
use crate::parser::{parse_docx_canvas, parse_docx_tree, DocxParser};
use crate::render::render_docx;

use super::{ConvertOptions, DocumentConverter};

/// MIME type of word-processor packages.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Word-processor package converter.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    _private: (),
}

impl DocxConverter {
    /// Create a new DOCX converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocxConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn mime_type(&self) -> &'static str {
        DOCX_MIME_TYPE
    }

    fn extension(&self) -> &'static str {
        "docx"
    }

    fn import_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<EditorDocument> {
        parse_docx_tree(bytes, &options.parse)
    }

    fn parse_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ParseResult> {
        parse_docx_canvas(bytes, &options.parse)
    }

    fn export(&self, doc: &EditorDocument, options: &ConvertOptions) -> Result<Vec<u8>> {
        render_docx(doc, &options.render)
    }

    fn metadata(&self, bytes: &[u8]) -> Result<Metadata> {
        DocxParser::from_bytes(bytes)?.metadata()
    }
}

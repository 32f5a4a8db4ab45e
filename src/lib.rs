//! # docflow
//!
//! Converts rich-text editor documents to and from DOCX packages and
//! paginated PDF.
//!
//! The editor document is a JSON tree of blocks (`doc`, `paragraph`,
//! `heading`, lists) holding text runs with bold, italic and underline
//! marks. Serializers write it out as DOCX or PDF; reconstructors read
//! DOCX or PDF back either into the tree or into a flat list of positioned
//! canvas elements.
//!
//! ## Quick Start
//!
//! ```no_run
//! use serde_json::json;
//!
//! fn main() -> docflow::Result<()> {
//!     let doc = json!({
//!         "type": "doc",
//!         "content": [
//!             {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Title"}]},
//!             {"type": "paragraph", "content": [{"type": "text", "text": "Hello", "marks": [{"type": "bold"}]}]}
//!         ]
//!     });
//!
//!     let docx = docflow::editor_json_to_package_bytes(Some(&doc))?;
//!     let back = docflow::package_bytes_to_editor_json(&docx)?;
//!     assert_eq!(docflow::editor_json_to_plain_text(Some(&back.to_value())), "Title\nHello");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Tree import**: DOCX and PDF back into the editor tree
//! - **Layout inference**: positioned text, table and image elements
//! - **Export**: DOCX packages, paginated PDF and `.docflow.json` records
//! - **Upload checks**: extension allow-list and size limit

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConverterRegistry, DocumentConverter, ExportArtifact, ExportFormat,
    UploadPolicy,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, DocumentFormat};
pub use error::{Error, Result, Stage};
pub use model::{
    CanvasElement, EditorDocument, Element, ElementBody, Mark, MarkSet, Metadata, Node, NodeKind,
    ParseResult, ProjectExport,
};
pub use parser::{LayoutConfig, PageSelection, ParseOptions};
pub use render::{JsonFormat, RenderOptions};

use serde_json::Value;
use std::path::Path;

/// Plain text of an editor document.
///
/// Marks never reach the output. A missing or malformed document yields
/// an empty string.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let doc = json!({"type": "doc", "content": [
///     {"type": "paragraph", "content": [{"type": "text", "text": "One"}]},
///     {"type": "paragraph", "content": [{"type": "text", "text": "Two"}]}
/// ]});
/// assert_eq!(docflow::editor_json_to_plain_text(Some(&doc)), "One\nTwo");
/// ```
pub fn editor_json_to_plain_text(doc: Option<&Value>) -> String {
    render::extract_plain_text(&EditorDocument::from_optional(doc))
}

/// Write an editor document as a DOCX package.
///
/// `None` and `{}` both produce a valid package with no blocks.
pub fn editor_json_to_package_bytes(doc: Option<&Value>) -> Result<Vec<u8>> {
    editor_json_to_package_bytes_with_options(doc, &RenderOptions::default())
}

/// Write an editor document as a DOCX package with custom options.
pub fn editor_json_to_package_bytes_with_options(
    doc: Option<&Value>,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    render::render_docx(&EditorDocument::from_optional(doc), options)
}

/// Write an editor document as a paginated PDF.
///
/// `None` and `{}` both produce a valid one-page PDF.
pub fn editor_json_to_flowdoc_bytes(doc: Option<&Value>) -> Result<Vec<u8>> {
    editor_json_to_flowdoc_bytes_with_options(doc, &RenderOptions::default())
}

/// Write an editor document as a paginated PDF with custom options.
pub fn editor_json_to_flowdoc_bytes_with_options(
    doc: Option<&Value>,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    render::render_pdf(&EditorDocument::from_optional(doc), options)
}

/// Read a DOCX package into an editor document.
///
/// Blank paragraphs are kept as empty paragraphs. Fails with a
/// source-unreadable error (see [`Error::is_source_unreadable`]) when the
/// bytes are not a package.
pub fn package_bytes_to_editor_json(data: &[u8]) -> Result<EditorDocument> {
    parser::parse_docx_tree(data, &ParseOptions::default())
}

/// Read a PDF into an editor document, one paragraph per text line.
pub fn flowdoc_bytes_to_editor_json(data: &[u8]) -> Result<EditorDocument> {
    parser::parse_pdf_tree(data, &ParseOptions::default())
}

/// Lay a DOCX package out as canvas elements, images included.
pub fn package_bytes_to_canvas_elements(data: &[u8]) -> Result<ParseResult> {
    parser::parse_docx_canvas(data, &ParseOptions::default())
}

/// Lay a PDF out as canvas elements, one text element per line.
pub fn flowdoc_bytes_to_canvas_elements(data: &[u8]) -> Result<ParseResult> {
    parser::parse_pdf_canvas(data, &ParseOptions::default())
}

/// Import a DOCX or PDF file on disk, detecting the format from its bytes.
///
/// # Example
///
/// ```no_run
/// let doc = docflow::import_file("report.docx").unwrap();
/// println!("{} blocks", doc.len());
/// ```
pub fn import_file<P: AsRef<Path>>(path: P) -> Result<EditorDocument> {
    import_file_with_options(path, &ParseOptions::default())
}

/// Import a DOCX or PDF file on disk with custom options.
pub fn import_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> Result<EditorDocument> {
    let data = std::fs::read(path)?;
    match detect_format_from_bytes(&data)? {
        DocumentFormat::Docx => parser::parse_docx_tree(&data, options),
        DocumentFormat::Pdf { .. } => parser::parse_pdf_tree(&data, options),
    }
}

/// Lay a DOCX or PDF file on disk out as canvas elements.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseResult> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Lay a DOCX or PDF file on disk out as canvas elements with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> Result<ParseResult> {
    let data = std::fs::read(path)?;
    match detect_format_from_bytes(&data)? {
        DocumentFormat::Docx => parser::parse_docx_canvas(&data, options),
        DocumentFormat::Pdf { .. } => parser::parse_pdf_canvas(&data, options),
    }
}

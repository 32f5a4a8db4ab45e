//! Reconstructors: PDF and DOCX bytes back into the editor model.
//!
//! Each format has a tree variant producing an [`EditorDocument`] and a
//! canvas variant producing positioned elements with plain text.
//!
//! [`EditorDocument`]: crate::model::EditorDocument

mod backend;
mod docx_parser;
mod layout;
mod options;
mod package;
mod pdf_parser;
mod styles;

pub use backend::{LopdfBackend, PdfBackend, PdfValue};
pub use docx_parser::{parse_docx_canvas, parse_docx_tree, DecodedImage, DocxParser};
pub use layout::{group_words_into_lines, PageWords, TextLine, Word, WordExtractor};
pub use options::{LayoutConfig, PageSelection, ParseOptions};
pub use package::{
    BodyItem, PackageReader, Relationship, SourceParagraph, SourceRun, SourceTable,
};
pub use pdf_parser::{parse_pdf_canvas, parse_pdf_tree, PdfParser};
pub use styles::{classify_style_name, StyleClass, StyleSheet};

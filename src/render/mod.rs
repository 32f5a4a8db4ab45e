//! Serializers from the editor tree to plain text, DOCX, PDF and JSON.

pub mod docx;
pub mod flow;
mod json;
pub mod markup;
pub mod metrics;
mod options;
pub mod pdf;
pub mod text;

pub use docx::{package_paragraphs, render_docx, PackageParagraph, PackageRun};
pub use flow::{build_flow, FlowBlock, FlowDocument, HeadingTier, ListKind, ParagraphStyle};
pub use json::{from_project_json, to_json, to_project_json, JsonFormat};
pub use options::{FlowStyles, Margins, PageSize, RenderOptions, Spacing, TextStyle};
pub use pdf::{render_flow, render_pdf};
pub use text::extract_plain_text;

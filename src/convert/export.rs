//! Export artifacts: bytes plus the content type and download filename.

use crate::error::Result;
use crate::model::ProjectExport;
use crate::render::{render_docx, render_pdf, to_project_json, RenderOptions};

use super::docx::DOCX_MIME_TYPE;

/// Filename stem used when the title has no usable characters.
pub const DEFAULT_FILENAME: &str = "document";

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Word-processor package
    Docx,
    /// Paginated PDF
    Pdf,
    /// `.docflow.json` project record
    Json,
}

impl ExportFormat {
    /// Parse a format name (`docx`, `pdf`, `json`), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "docx" => Some(ExportFormat::Docx),
            "pdf" => Some(ExportFormat::Pdf),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    /// Filename suffix including the leading dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            ExportFormat::Docx => ".docx",
            ExportFormat::Pdf => ".pdf",
            ExportFormat::Json => ".docflow.json",
        }
    }

    /// Content type of the exported bytes.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Docx => DOCX_MIME_TYPE,
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Keep alphanumerics, space, hyphen and underscore from a title, trimmed.
///
/// Falls back to [`DEFAULT_FILENAME`] when nothing is left.
pub fn sanitize_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let trimmed = kept.trim();

    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Exported bytes ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl ExportArtifact {
    /// Wrap already-rendered bytes.
    pub fn new(format: ExportFormat, title: &str, bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: format.content_type(),
            filename: format!("{}{}", sanitize_filename(title), format.suffix()),
        }
    }

    /// Render a project in the given format.
    pub fn render(
        project: &ProjectExport,
        format: ExportFormat,
        options: &RenderOptions,
    ) -> Result<Self> {
        let bytes = match format {
            ExportFormat::Docx => render_docx(&project.content_json, options)?,
            ExportFormat::Pdf => {
                let options = match options.title {
                    Some(_) => options.clone(),
                    None => options.clone().with_title(project.title.clone()),
                };
                render_pdf(&project.content_json, &options)?
            }
            ExportFormat::Json => to_project_json(project)?.into_bytes(),
        };
        log::debug!("exported {} bytes as {:?}", bytes.len(), format);
        Ok(Self::new(format, &project.title, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EditorDocument, Element, Node};

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Q3 report: final/v2"), "Q3 report finalv2");
        assert_eq!(sanitize_filename("  my_doc-1  "), "my_doc-1");
        assert_eq!(sanitize_filename("Отчёт"), "Отчёт");
        assert_eq!(sanitize_filename("../../"), "document");
        assert_eq!(sanitize_filename(""), "document");
    }

    #[test]
    fn test_format_suffixes() {
        assert_eq!(ExportFormat::from_name("PDF"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_name("odt"), None);
        assert_eq!(ExportFormat::Json.suffix(), ".docflow.json");
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
    }

    #[test]
    fn test_render_artifacts() {
        let mut doc = EditorDocument::new();
        doc.push(Element::paragraph(vec![Node::text("Body")]));
        let project = ProjectExport::new("Plan <2025>", doc);
        let options = RenderOptions::default();

        let docx = ExportArtifact::render(&project, ExportFormat::Docx, &options).unwrap();
        assert_eq!(docx.filename, "Plan 2025.docx");
        assert!(docx.bytes.starts_with(b"PK"));

        let pdf = ExportArtifact::render(&project, ExportFormat::Pdf, &options).unwrap();
        assert_eq!(pdf.filename, "Plan 2025.pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-"));

        let json = ExportArtifact::render(&project, ExportFormat::Json, &options).unwrap();
        assert_eq!(json.filename, "Plan 2025.docflow.json");
        let text = String::from_utf8(json.bytes).unwrap();
        assert!(text.contains("\"content_text\": \"Body\""));
    }
}

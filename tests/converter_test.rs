//! Integration tests for the converter module.

use std::sync::Arc;

use docflow::convert::{
    ConvertOptions, ConverterRegistry, DocumentConverter, DocxConverter, ExportArtifact,
    ExportFormat, PdfConverter, UploadPolicy,
};
use docflow::error::{Error, Result, Stage};
use docflow::model::{EditorDocument, Element, Metadata, Node, ParseResult, ProjectExport};
use docflow::render::{from_project_json, RenderOptions};

/// Mock converter for testing.
struct MockConverter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockConverter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl DocumentConverter for MockConverter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn import_bytes(&self, bytes: &[u8], _options: &ConvertOptions) -> Result<EditorDocument> {
        let mut doc = EditorDocument::new();
        doc.push(Element::paragraph(vec![Node::text(
            String::from_utf8_lossy(bytes).into_owned(),
        )]));
        Ok(doc)
    }

    fn parse_bytes(&self, _bytes: &[u8], _options: &ConvertOptions) -> Result<ParseResult> {
        Ok(ParseResult::default())
    }

    fn export(&self, doc: &EditorDocument, _options: &ConvertOptions) -> Result<Vec<u8>> {
        Ok(docflow::render::extract_plain_text(doc).into_bytes())
    }

    fn metadata(&self, _bytes: &[u8]) -> Result<Metadata> {
        Ok(Metadata::with_format("TXT"))
    }
}

fn sample_document() -> EditorDocument {
    let mut doc = EditorDocument::new();
    doc.push(Element::heading(1, vec![Node::text("Agenda")]));
    doc.push(Element::paragraph(vec![Node::text("Budget review")]));
    doc
}

// ==================== Registry ====================

#[test]
fn test_converter_registry_new() {
    let registry = ConverterRegistry::new();
    assert!(!registry.supports("pdf"));
    assert!(registry.supported_extensions().is_empty());
}

#[test]
fn test_converter_registry_register_custom() {
    let mut registry = ConverterRegistry::new();
    registry.register(Arc::new(MockConverter::new(vec!["txt", "text"], "plain")));

    assert!(registry.supports("txt"));
    assert!(registry.supports("TEXT"));
    assert!(registry.get_by_name("PLAIN").is_some());

    let options = ConvertOptions::default();
    let doc = registry.import_bytes(b"hello", "txt", &options).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(registry.export(&doc, "text", &options).unwrap(), b"hello");
}

#[test]
fn test_converter_registry_overwrite() {
    let mut registry = ConverterRegistry::with_defaults();
    registry.register(Arc::new(MockConverter::new(vec!["pdf"], "fake-pdf")));

    let converter = registry.get_by_extension("pdf").unwrap();
    assert_eq!(converter.name(), "fake-pdf");
}

#[test]
fn test_registry_unsupported_extension() {
    let registry = ConverterRegistry::with_defaults();
    let err = registry
        .import_bytes(b"data", "rtf", &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedExtension(_)));
}

#[test]
fn test_registry_import_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.docx");
    let registry = ConverterRegistry::with_defaults();
    let options = ConvertOptions::default();

    let bytes = registry.export(&sample_document(), "docx", &options).unwrap();
    std::fs::write(&path, bytes).unwrap();

    let doc = registry.import_file(&path, &options).unwrap();
    assert_eq!(docflow::render::extract_plain_text(&doc), "Agenda\nBudget review");

    let err = registry
        .import_file(&dir.path().join("noext"), &options)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedExtension(_)));
}

// ==================== Built-in Converters ====================

#[test]
fn test_docx_and_pdf_converters_agree_on_text() {
    let options = ConvertOptions::default();
    let doc = sample_document();

    let converters: [Arc<dyn DocumentConverter>; 2] =
        [Arc::new(DocxConverter::new()), Arc::new(PdfConverter::new())];
    for converter in converters {
        let bytes = converter.export(&doc, &options).unwrap();
        let back = converter.import_bytes(&bytes, &options).unwrap();
        assert_eq!(
            docflow::render::extract_plain_text(&back),
            "Agenda\nBudget review",
            "converter {}",
            converter.name()
        );
    }
}

#[test]
fn test_unreadable_sources_fail_in_parse_stage() {
    let options = ConvertOptions::default();
    for converter in [
        Arc::new(DocxConverter::new()) as Arc<dyn DocumentConverter>,
        Arc::new(PdfConverter::new()),
    ] {
        let err = converter.import_bytes(b"\x00\x01garbage", &options).unwrap_err();
        assert!(err.is_source_unreadable(), "converter {}", converter.name());
        assert_eq!(err.stage(), Stage::Parse);
    }
}

// ==================== Upload & Export ====================

#[test]
fn test_upload_policy_defaults() {
    let policy = UploadPolicy::default();
    assert_eq!(policy.max_bytes(), 20 * 1024 * 1024);
    assert!(policy.validate("contract.docx", 1024).is_ok());
    assert!(matches!(
        policy.validate("contract.doc", 1024),
        Err(Error::UnsupportedExtension(_))
    ));
    assert!(matches!(
        policy.validate("scan.pdf", 21 * 1024 * 1024),
        Err(Error::FileTooLarge { .. })
    ));
}

#[test]
fn test_export_artifact_json_reimports() {
    let project = ProjectExport::new("Team / Plan", sample_document());
    let artifact =
        ExportArtifact::render(&project, ExportFormat::Json, &RenderOptions::default()).unwrap();

    assert_eq!(artifact.filename, "Team  Plan.docflow.json");
    assert_eq!(artifact.content_type, "application/json");

    let back = from_project_json(&artifact.bytes).unwrap();
    assert_eq!(back, project);
}

#[test]
fn test_export_artifact_pdf_carries_title() {
    let project = ProjectExport::new("Quarterly", sample_document());
    let artifact =
        ExportArtifact::render(&project, ExportFormat::Pdf, &RenderOptions::default()).unwrap();

    let meta = PdfConverter::new().metadata(&artifact.bytes).unwrap();
    assert_eq!(meta.title.as_deref(), Some("Quarterly"));
    assert_eq!(artifact.filename, "Quarterly.pdf");
}

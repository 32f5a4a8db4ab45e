//! Per-format converters and the registry that dispatches to them.
//!
//! Every format implements [`DocumentConverter`]: import into the editor
//! tree, parse into canvas elements, and export the tree back into bytes.
//! The registry maps lowercase extensions to converters.
//!
//! # Example
//!
//! ```no_run
//! use docflow::convert::{ConvertOptions, ConverterRegistry};
//!
//! fn main() -> docflow::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let bytes = std::fs::read("report.docx")?;
//!
//!     let doc = registry.import_bytes(&bytes, "docx", &ConvertOptions::default())?;
//!     let pdf = registry.export(&doc, "pdf", &ConvertOptions::default())?;
//!     std::fs::write("report.pdf", pdf)?;
//!     Ok(())
//! }
//! ```

mod docx;
mod export;
mod pdf;
mod upload;

pub use docx::DocxConverter;
pub use export::{sanitize_filename, ExportArtifact, ExportFormat, DEFAULT_FILENAME};
pub use pdf::PdfConverter;
pub use upload::{UploadPolicy, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{EditorDocument, Metadata, ParseResult};
use crate::parser::ParseOptions;
use crate::render::RenderOptions;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Options for both conversion directions.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Options for reading source files
    pub parse: ParseOptions,

    /// Options for writing PDF and DOCX output
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Content type of exported bytes.
    fn mime_type(&self) -> &'static str;

    /// Extension of exported files, without the dot.
    fn extension(&self) -> &'static str;

    /// Read source bytes into an editor document.
    fn import_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<EditorDocument>;

    /// Read source bytes into positioned canvas elements.
    fn parse_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ParseResult>;

    /// Write an editor document in this converter's format.
    fn export(&self, doc: &EditorDocument, options: &ConvertOptions) -> Result<Vec<u8>>;

    /// Read source metadata.
    fn metadata(&self, bytes: &[u8]) -> Result<Metadata>;

    /// Read a file on disk into an editor document.
    fn import_file(&self, path: &Path, options: &ConvertOptions) -> Result<EditorDocument> {
        let bytes = std::fs::read(path)?;
        self.import_bytes(&bytes, options)
    }

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// The registry maps file extensions to converters and provides
/// convenient methods for converting documents.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the DOCX and PDF converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxConverter::new()));
        registry.register(Arc::new(PdfConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    fn require(&self, ext: &str) -> Result<Arc<dyn DocumentConverter>> {
        self.get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedExtension(ext.to_string()))
    }

    /// Converter for bytes whose format is sniffed from magic bytes.
    pub fn for_bytes(&self, bytes: &[u8]) -> Result<Arc<dyn DocumentConverter>> {
        let format = detect_format_from_bytes(bytes)?;
        self.require(format.extension())
    }

    /// Import bytes using the converter registered for `ext`.
    pub fn import_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<EditorDocument> {
        self.require(ext)?.import_bytes(bytes, options)
    }

    /// Parse bytes into canvas elements using the converter registered for `ext`.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<ParseResult> {
        self.require(ext)?.parse_bytes(bytes, options)
    }

    /// Export a document using the converter registered for `ext`.
    pub fn export(
        &self,
        doc: &EditorDocument,
        ext: &str,
        options: &ConvertOptions,
    ) -> Result<Vec<u8>> {
        self.require(ext)?.export(doc, options)
    }

    /// Import a file, choosing the converter by its extension.
    pub fn import_file(&self, path: &Path, options: &ConvertOptions) -> Result<EditorDocument> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedExtension(path.display().to_string()))?;

        self.require(ext)?.import_file(path, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Node};

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_parse_options(ParseOptions::new().text_only())
            .with_render_options(RenderOptions::new().with_title("Notes"));

        assert!(!options.parse.extract_images);
        assert_eq!(options.render.title.as_deref(), Some("Notes"));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("DOCX"));
        assert!(!registry.supports("odt"));
        assert_eq!(registry.supported_extensions(), vec!["docx", "pdf"]);
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ConverterRegistry::with_defaults();
        let converter = registry.get_by_name("docx").unwrap();
        assert_eq!(converter.extension(), "docx");
        assert!(registry.get_by_name("markdown").is_none());
    }

    #[test]
    fn test_unknown_extension() {
        let registry = ConverterRegistry::with_defaults();
        let err = registry
            .export(&EditorDocument::new(), "odt", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension(ext) if ext == "odt"));
    }

    #[test]
    fn test_for_bytes_sniffs_format() {
        let registry = ConverterRegistry::with_defaults();
        let mut doc = EditorDocument::new();
        doc.push(Element::paragraph(vec![Node::text("Hi")]));

        let docx = registry.export(&doc, "docx", &ConvertOptions::default()).unwrap();
        assert_eq!(registry.for_bytes(&docx).unwrap().name(), "docx");

        let pdf = registry.export(&doc, "pdf", &ConvertOptions::default()).unwrap();
        assert_eq!(registry.for_bytes(&pdf).unwrap().name(), "pdf");

        assert!(registry.for_bytes(b"plain text").is_err());
    }
}

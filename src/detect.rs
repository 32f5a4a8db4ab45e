//! Source format detection from magic bytes and file extensions.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// A document format the converters understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Word-processor package (zipped XML)
    Docx,
    /// Paginated PDF with its header version (e.g., "1.7")
    Pdf {
        /// PDF version from the header
        version: String,
    },
}

impl DocumentFormat {
    /// Lowercase file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf { .. } => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Docx => write!(f, "DOCX"),
            DocumentFormat::Pdf { version } => write!(f, "PDF {}", version),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Local file header signature of a zip container.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Main part every word-processor package carries.
const DOCX_MAIN_PART: &str = "word/document.xml";

/// Detect the format of a file on disk.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocumentFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect_format_from_bytes(&data)
}

/// Detect the format of an in-memory document.
///
/// Zip containers are only accepted when they carry `word/document.xml`.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocumentFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return if is_docx_bytes(data) {
            Ok(DocumentFormat::Docx)
        } else {
            Err(Error::UnknownFormat)
        };
    }

    let version = detect_pdf_version(data)?;
    Ok(DocumentFormat::Pdf { version })
}

/// Extract the version from a PDF header.
pub fn detect_pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(version)
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes carry a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_pdf_version(data).is_ok()
}

/// Check if bytes are a zip container holding a word-processor document.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    if !data.starts_with(ZIP_MAGIC) {
        return false;
    }
    match zip::ZipArchive::new(Cursor::new(data)) {
        Ok(archive) => archive.file_names().any(|name| name == DOCX_MAIN_PART),
        Err(_) => false,
    }
}

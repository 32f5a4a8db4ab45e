//! Error types for docflow.

use std::io;
use thiserror::Error;

/// Result type alias for docflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error originated from.
///
/// The surrounding API reports failures as "parse" or "generate" errors;
/// validation failures happen before any conversion is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Upload validation (extension, size)
    Validate,
    /// Reading a source file into the editor model
    Parse,
    /// Writing the editor model into a target format
    Generate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Validate => write!(f, "validate"),
            Stage::Parse => write!(f, "parse"),
            Stage::Generate => write!(f, "generate"),
        }
    }
}

/// Error types that can occur during document conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are neither a PDF nor a DOCX package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The DOCX container is corrupt or lacks a required part.
    #[error("DOCX package error: {0}")]
    Package(String),

    /// Malformed XML inside a DOCX part.
    #[error("XML error: {0}")]
    Xml(String),

    /// A single embedded image could not be decoded.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// Error while generating a DOCX or PDF file.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error reading or writing persisted JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// The uploaded file extension is not accepted.
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// The uploaded file exceeds the size limit.
    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Allowed size in bytes
        limit: u64,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),
}

impl Error {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Error::UnsupportedExtension(_) | Error::FileTooLarge { .. } => Stage::Validate,
            Error::Render(_) => Stage::Generate,
            _ => Stage::Parse,
        }
    }

    /// Whether the source bytes could not be read as a document at all.
    pub fn is_source_unreadable(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::Package(_)
                | Error::Xml(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::FileNotFound => {
                Error::Package("missing part in package".to_string())
            }
            _ => Error::Package(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

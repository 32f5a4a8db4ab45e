//! Upload validation run before a file reaches a reconstructor.

use crate::error::{Error, Result};

/// Largest accepted upload: 20 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Extensions accepted by default.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["docx", "pdf", "json"];

/// Extension allow-list and size limit for uploaded files.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extension allow-list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Set the size limit in bytes.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set the size limit in megabytes.
    pub fn with_max_megabytes(self, megabytes: u64) -> Self {
        self.with_max_bytes(megabytes.saturating_mul(1024 * 1024))
    }

    /// Size limit in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Accepted extensions, lowercase.
    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Validate an upload by name and size, returning its lowercase extension.
    ///
    /// The size is checked first. The extension is whatever follows the last
    /// dot, so a name without a dot is checked as a whole.
    pub fn validate(&self, filename: &str, size: u64) -> Result<String> {
        if size > self.max_bytes {
            return Err(Error::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let ext = filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if !self.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            log::debug!("rejected upload {:?}", filename);
            return Err(Error::UnsupportedExtension(ext));
        }

        Ok(ext)
    }

    /// Validate an in-memory upload.
    pub fn validate_bytes(&self, filename: &str, data: &[u8]) -> Result<String> {
        self.validate(filename, data.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_extensions() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.validate("Report.DOCX", 10).unwrap(), "docx");
        assert_eq!(policy.validate("scan.final.pdf", 10).unwrap(), "pdf");
        assert_eq!(policy.validate("backup.json", 10).unwrap(), "json");
    }

    #[test]
    fn test_rejects_unknown_extensions() {
        let policy = UploadPolicy::default();
        let err = policy.validate("notes.txt", 10).unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension(ref e) if e == "txt"));
        assert!(policy.validate("docx", 10).is_ok());
        assert!(policy.validate("README", 10).is_err());
    }

    #[test]
    fn test_size_limit() {
        let policy = UploadPolicy::default();
        assert!(policy.validate("a.pdf", DEFAULT_MAX_UPLOAD_BYTES).is_ok());

        let err = policy
            .validate("a.pdf", DEFAULT_MAX_UPLOAD_BYTES + 1)
            .unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { limit, .. } if limit == DEFAULT_MAX_UPLOAD_BYTES));
        assert_eq!(err.stage(), crate::error::Stage::Validate);
    }

    #[test]
    fn test_builder() {
        let policy = UploadPolicy::new()
            .with_extensions([".PDF"])
            .with_max_megabytes(1);
        assert_eq!(policy.allowed_extensions(), &["pdf".to_string()]);
        assert_eq!(policy.max_bytes(), 1024 * 1024);
        assert!(policy.validate("a.docx", 1).is_err());
        assert!(policy.validate_bytes("a.pdf", &[0u8; 16]).is_ok());
    }
}

//! The persisted project export record.

use serde::{Deserialize, Serialize};

use super::editor::EditorDocument;
use crate::render::text::extract_plain_text;

/// Schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Title used when an imported record carries none.
pub const DEFAULT_IMPORT_TITLE: &str = "Imported Document";

/// A project as exported to and imported from `.docflow.json` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExport {
    /// Record schema version
    pub schema_version: u32,
    /// User-supplied title
    pub title: String,
    /// The editor document
    pub content_json: EditorDocument,
    /// Plain text of the editor document
    pub content_text: String,
}

impl ProjectExport {
    /// Build a record, deriving `content_text` from the document.
    pub fn new(title: impl Into<String>, content_json: EditorDocument) -> Self {
        let content_text = extract_plain_text(&content_json);
        Self {
            schema_version: SCHEMA_VERSION,
            title: title.into(),
            content_json,
            content_text,
        }
    }

    /// Replace the document and recompute its plain text.
    pub fn set_content(&mut self, content_json: EditorDocument) {
        self.content_text = extract_plain_text(&content_json);
        self.content_json = content_json;
    }
}

//! JSON rendering and the `.docflow.json` project format.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{EditorDocument, ProjectExport, DEFAULT_IMPORT_TITLE, SCHEMA_VERSION};

use super::text::extract_plain_text;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any model value (editor document, canvas result, project) to JSON.
pub fn to_json<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Json(format!("serialization error: {}", e)))
}

/// Write a project export record. Non-ASCII text is kept as-is.
pub fn to_project_json(project: &ProjectExport) -> Result<String> {
    to_json(project, JsonFormat::Pretty)
}

/// Read a project export record, filling in defaults for missing fields.
///
/// `title` defaults to "Imported Document", `schema_version` to 1 and
/// `content_text` to the plain text of `content_json`.
pub fn from_project_json(data: &[u8]) -> Result<ProjectExport> {
    let value: Value = serde_json::from_slice(data)
        .map_err(|e| Error::Json(format!("Invalid JSON file: {}", e)))?;
    let Value::Object(map) = value else {
        return Err(Error::Json("Invalid JSON file: expected an object".to_string()));
    };

    let title = map
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_IMPORT_TITLE)
        .to_string();
    let schema_version = map
        .get("schema_version")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(SCHEMA_VERSION);
    let content_json = EditorDocument::from_optional(map.get("content_json"));
    let content_text = match map.get("content_text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => extract_plain_text(&content_json),
    };

    Ok(ProjectExport {
        schema_version,
        title,
        content_json,
        content_text,
    })
}

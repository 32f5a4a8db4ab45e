//! Paragraph style names and their block classification.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;

use super::package::attr;

/// Block class a paragraph style maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    /// Heading at a level 1..=9
    Heading(u8),
    /// Bullet list paragraph (imported as a plain paragraph)
    ListBullet,
    /// Numbered list paragraph (imported as a plain paragraph)
    ListNumber,
    /// Anything else
    Paragraph,
}

impl StyleClass {
    /// List classes have no editor counterpart on import.
    pub fn is_list(&self) -> bool {
        matches!(self, StyleClass::ListBullet | StyleClass::ListNumber)
    }
}

/// Known style-name fragments, matched in order against the lowercased name.
const STYLE_TABLE: &[(&str, StyleClass)] = &[
    ("heading", StyleClass::Heading(1)),
    ("list bullet", StyleClass::ListBullet),
    ("list number", StyleClass::ListNumber),
];

/// Classify a paragraph style by name.
///
/// A name containing "heading" is a heading whose level is the smallest
/// digit 1..=9 present in the name, or 1 if it has none.
pub fn classify_style_name(name: &str) -> StyleClass {
    let lower = name.to_lowercase();

    let class = STYLE_TABLE
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, class)| *class)
        .unwrap_or(StyleClass::Paragraph);

    match class {
        StyleClass::Heading(_) => StyleClass::Heading(heading_level(&lower)),
        other => other,
    }
}

fn heading_level(name: &str) -> u8 {
    (1..=9u8)
        .find(|digit| name.contains(char::from(b'0' + digit)))
        .unwrap_or(1)
}

/// Style id to display name, read from `word/styles.xml`.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Parse `word/styles.xml`.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);
        let mut sheet = StyleSheet::default();
        let mut current: Option<(String, bool)> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"style" => {
                    current = paragraph_style(&e);
                }
                Event::Empty(e) if e.local_name().as_ref() == b"name" => {
                    if let (Some((id, is_default)), Some(name)) = (&current, attr(&e, b"w:val")) {
                        if *is_default {
                            sheet.default_paragraph = Some(name.clone());
                        }
                        sheet.names.insert(id.clone(), name);
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"style" => current = None,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// Display name of a paragraph style.
    ///
    /// Without a style id the default paragraph style applies. An id the
    /// sheet does not define is used as its own name.
    pub fn name_of(&self, style_id: Option<&str>) -> String {
        match style_id {
            Some(id) => self.names.get(id).cloned().unwrap_or_else(|| id.to_string()),
            None => self.default_paragraph.clone().unwrap_or_default(),
        }
    }

    /// Classify a paragraph by its style id.
    pub fn classify(&self, style_id: Option<&str>) -> StyleClass {
        classify_style_name(&self.name_of(style_id))
    }

    /// Number of named styles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no styles are defined.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// `(styleId, is_default)` of a paragraph style element.
fn paragraph_style(e: &BytesStart<'_>) -> Option<(String, bool)> {
    if attr(e, b"w:type").as_deref().is_some_and(|t| t != "paragraph") {
        return None;
    }
    let id = attr(e, b"w:styleId")?;
    let is_default = matches!(attr(e, b"w:default").as_deref(), Some("1" | "true"));
    Some((id, is_default))
}

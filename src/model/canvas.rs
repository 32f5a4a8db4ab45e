//! Absolutely-positioned canvas elements produced by layout inference.

use serde::{Deserialize, Serialize};

/// Page width in canvas pixels (A4 at 96 dpi).
pub const CANVAS_PAGE_WIDTH: u32 = 794;

/// One positioned element on the reconstructed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    /// Identifier, unique within one element list
    pub id: String,
    /// Variant tag and its properties
    #[serde(flatten)]
    pub body: ElementBody,
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Stacking order, always 0 for imported elements
    pub z_index: i32,
}

impl CanvasElement {
    /// Create an element at a position.
    pub fn new(id: String, body: ElementBody, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            body,
            x,
            y,
            width,
            height,
            z_index: 0,
        }
    }

    /// Element type name as it appears in JSON.
    pub fn type_name(&self) -> &'static str {
        match self.body {
            ElementBody::Text(_) => "text",
            ElementBody::Table(_) => "table",
            ElementBody::Image(_) => "image",
        }
    }

    /// Text properties if this is a text element.
    pub fn as_text(&self) -> Option<&TextProperties> {
        match &self.body {
            ElementBody::Text(p) => Some(p),
            _ => None,
        }
    }

    /// Table properties if this is a table element.
    pub fn as_table(&self) -> Option<&TableProperties> {
        match &self.body {
            ElementBody::Table(p) => Some(p),
            _ => None,
        }
    }

    /// Image properties if this is an image element.
    pub fn as_image(&self) -> Option<&ImageProperties> {
        match &self.body {
            ElementBody::Image(p) => Some(p),
            _ => None,
        }
    }
}

/// Element variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "lowercase")]
pub enum ElementBody {
    /// A text box
    Text(TextProperties),
    /// A grid of cell strings
    Table(TableProperties),
    /// An embedded raster image
    Image(ImageProperties),
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left-aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
}

/// Properties of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    pub content: String,
    pub font_family: String,
    pub font_size: u32,
    /// `#RRGGBB`
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub align: Align,
}

/// Properties of a table element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProperties {
    pub rows: u32,
    pub cols: u32,
    pub border_width: u32,
    pub border_color: String,
    pub cell_bg: String,
    /// Row-major cell text
    pub data: Vec<Vec<String>>,
}

impl TableProperties {
    /// Plain-text form: cells joined by tab, rows joined by newline.
    pub fn plain_text(&self) -> String {
        self.data
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Properties of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageProperties {
    /// `data:image/<format>;base64,...`
    pub src: String,
    pub alt: String,
}

/// Hands out `auto_txt_N`, `auto_tbl_N` and `auto_img_N` ids for one parse call.
#[derive(Debug, Default)]
pub struct ElementIds {
    next: u32,
}

impl ElementIds {
    /// Start a fresh sequence.
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{}_{}", prefix, self.next)
    }

    /// Next text element id.
    pub fn text(&mut self) -> String {
        self.bump("auto_txt")
    }

    /// Next table element id.
    pub fn table(&mut self) -> String {
        self.bump("auto_tbl")
    }

    /// Next image element id.
    pub fn image(&mut self) -> String {
        self.bump("auto_img")
    }
}

/// Elements approximately fill one page per this many entries.
const ELEMENTS_PER_PAGE: usize = 30;

/// Output of a canvas reconstruction: elements in reading order plus plain text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub elements: Vec<CanvasElement>,
    pub text: String,
}

impl ParseResult {
    /// Rough page count derived from the element count, `None` below one page.
    pub fn page_count_hint(&self) -> Option<u32> {
        match self.elements.len() / ELEMENTS_PER_PAGE {
            0 => None,
            n => Some(n as u32),
        }
    }

    /// Check if nothing was reconstructed.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_props(content: &str) -> TextProperties {
        TextProperties {
            content: content.to_string(),
            font_family: "Inter".to_string(),
            font_size: 14,
            color: "#1a1a1a".to_string(),
            bold: false,
            italic: false,
            underline: false,
            align: Align::Left,
        }
    }

    #[test]
    fn test_text_element_json_shape() {
        let el = CanvasElement::new(
            "auto_txt_1".into(),
            ElementBody::Text(text_props("Hi")),
            40,
            40,
            714,
            20,
        );
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["zIndex"], 0);
        assert_eq!(value["properties"]["fontFamily"], "Inter");
        assert_eq!(value["properties"]["align"], "left");

        let back: CanvasElement = serde_json::from_value(value).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_table_properties_json() {
        let props = TableProperties {
            rows: 1,
            cols: 2,
            border_width: 1,
            border_color: "#1a1a1a".into(),
            cell_bg: "transparent".into(),
            data: vec![vec!["a".into(), "b".into()]],
        };
        let value = serde_json::to_value(&props).unwrap();
        assert_eq!(value, json!({
            "rows": 1, "cols": 2, "borderWidth": 1, "borderColor": "#1a1a1a",
            "cellBg": "transparent", "data": [["a", "b"]]
        }));
        assert_eq!(props.plain_text(), "a\tb");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = ElementIds::new();
        let a = ids.text();
        let b = ids.text();
        let c = ids.image();
        assert_eq!(a, "auto_txt_1");
        assert_ne!(a, b);
        assert_eq!(c, "auto_img_3");
    }

    #[test]
    fn test_page_count_hint() {
        let mut result = ParseResult::default();
        assert_eq!(result.page_count_hint(), None);
        for i in 0..61 {
            result.elements.push(CanvasElement::new(
                format!("auto_txt_{}", i),
                ElementBody::Text(text_props("x")),
                40,
                i,
                714,
                18,
            ));
        }
        assert_eq!(result.page_count_hint(), Some(2));
    }
}

//! The editor document tree.
//!
//! Persisted editor JSON is loosely shaped: nodes may be mappings, bare
//! strings or arrays, and unknown shapes must never fail a conversion.
//! [`Node::from_value`] classifies each JSON value exactly once into a
//! closed set of variants, so every later tree walk is a plain `match`.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::marks::{Mark, MarkSet};

/// Block or container type of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root node
    Doc,
    /// Body paragraph
    Paragraph,
    /// Heading with an `attrs.level`
    Heading,
    /// Unordered list of list items
    BulletList,
    /// Numbered list of list items
    OrderedList,
    /// A list entry holding blocks
    ListItem,
    /// Mapping without a `type` key
    Untyped,
    /// Any other named type
    Other(String),
}

impl NodeKind {
    /// Classify a `type` string.
    pub fn from_name(name: &str) -> Self {
        match name {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// The `type` string, or `None` for untyped mappings.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Doc => Some("doc"),
            NodeKind::Paragraph => Some("paragraph"),
            NodeKind::Heading => Some("heading"),
            NodeKind::BulletList => Some("bulletList"),
            NodeKind::OrderedList => Some("orderedList"),
            NodeKind::ListItem => Some("listItem"),
            NodeKind::Untyped => None,
            NodeKind::Other(name) => Some(name),
        }
    }

    /// Whether a top-level block of this kind is laid out as a paragraph.
    ///
    /// A block without a `type` counts as a paragraph.
    pub fn is_paragraph_like(&self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Untyped)
    }
}

/// A text leaf with its marks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextNode {
    /// Text content
    pub text: String,
    /// Formatting marks
    pub marks: MarkSet,
}

impl TextNode {
    /// Create an unmarked text node.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }

    /// Create a text node with marks.
    pub fn with_marks(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }
}

/// A mapping node with a type, attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Node type
    pub kind: NodeKind,
    /// Raw `attrs` mapping
    pub attrs: Map<String, Value>,
    /// Child nodes in order
    pub content: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(kind: NodeKind, content: Vec<Node>) -> Self {
        Self {
            kind,
            attrs: Map::new(),
            content,
        }
    }

    /// A paragraph.
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, content)
    }

    /// A heading at `level`.
    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        let mut element = Self::new(NodeKind::Heading, content);
        element
            .attrs
            .insert("level".to_string(), Value::from(level));
        element
    }

    /// A list item holding blocks.
    pub fn list_item(blocks: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem, blocks)
    }

    /// The raw heading level from `attrs.level`, defaulting to 1.
    ///
    /// Callers clamp the value to the range their target supports.
    pub fn heading_level(&self) -> i64 {
        match self.attrs.get("level") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(1),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(1),
            _ => 1,
        }
    }

    /// Check the element type.
    pub fn is(&self, kind: &NodeKind) -> bool {
        &self.kind == kind
    }
}

/// A node of the editor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `{"type": "text", ...}`
    Text(TextNode),
    /// Any other mapping
    Element(Element),
    /// A bare JSON string
    Bare(String),
    /// A JSON array of nodes
    Seq(Vec<Node>),
    /// Numbers, booleans and nulls; contribute nothing
    Opaque(Value),
}

impl Node {
    /// Classify a JSON value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Node::Bare(s.clone()),
            Value::Array(items) => Node::Seq(items.iter().map(Node::from_value).collect()),
            Value::Object(map) => match map.get("type") {
                Some(Value::String(t)) if t == "text" => Node::Text(text_from_map(map)),
                Some(Value::String(t)) => Node::Element(element_from_map(NodeKind::from_name(t), map)),
                None => Node::Element(element_from_map(NodeKind::Untyped, map)),
                Some(_) => Node::Element(element_from_map(NodeKind::Other(String::new()), map)),
            },
            other => Node::Opaque(other.clone()),
        }
    }

    /// Convert back into the canonical JSON shape.
    pub fn to_value(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(_) => Value::Null,
        }
    }

    /// An unmarked text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode::new(text))
    }

    /// A text node with marks.
    pub fn marked(text: impl Into<String>, marks: MarkSet) -> Self {
        Node::Text(TextNode::with_marks(text, marks))
    }

    /// The element behind this node, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// The element behind this node when it has the given kind.
    pub fn element_of(&self, kind: &NodeKind) -> Option<&Element> {
        self.as_element().filter(|e| e.is(kind))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

fn text_from_map(map: &Map<String, Value>) -> TextNode {
    let text = match map.get("text") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    let marks = match map.get("marks") {
        Some(Value::Array(items)) => items.iter().filter_map(mark_from_value).collect(),
        _ => MarkSet::new(),
    };
    TextNode { text, marks }
}

fn mark_from_value(value: &Value) -> Option<Mark> {
    match value {
        Value::Object(m) => m.get("type").and_then(Value::as_str).and_then(Mark::from_name),
        Value::String(s) => Mark::from_name(s),
        _ => None,
    }
}

fn element_from_map(kind: NodeKind, map: &Map<String, Value>) -> Element {
    let attrs = match map.get("attrs") {
        Some(Value::Object(a)) => a.clone(),
        _ => Map::new(),
    };
    let content = match map.get("content") {
        Some(Value::Array(items)) => items.iter().map(Node::from_value).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![Node::from_value(other)],
    };
    Element {
        kind,
        attrs,
        content,
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Text(t) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "text")?;
                map.serialize_entry("text", &t.text)?;
                if !t.marks.is_empty() {
                    let marks: Vec<Value> = t
                        .marks
                        .iter()
                        .map(|m| serde_json::json!({ "type": m.name() }))
                        .collect();
                    map.serialize_entry("marks", &marks)?;
                }
                map.end()
            }
            Node::Element(e) => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(name) = e.kind.name() {
                    map.serialize_entry("type", name)?;
                }
                if !e.attrs.is_empty() {
                    map.serialize_entry("attrs", &e.attrs)?;
                }
                map.serialize_entry("content", &e.content)?;
                map.end()
            }
            Node::Bare(s) => serializer.serialize_str(s),
            Node::Seq(items) => items.serialize(serializer),
            Node::Opaque(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Node::from_value(&value))
    }
}

/// A whole editor document: the ordered top-level blocks of a `doc` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorDocument {
    /// Top-level blocks
    pub content: Vec<Node>,
}

impl EditorDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a document from persisted JSON.
    ///
    /// Anything that is not a mapping (including `null`) reads as an empty
    /// document, as does a mapping without usable `content`.
    pub fn from_value(value: &Value) -> Self {
        let content = match value {
            Value::Object(map) => match map.get("content") {
                Some(Value::Array(items)) => items.iter().map(Node::from_value).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self { content }
    }

    /// Read a document from an optional JSON value.
    pub fn from_optional(value: Option<&Value>) -> Self {
        value.map(Self::from_value).unwrap_or_default()
    }

    /// Convert to the canonical JSON shape.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "type": "doc",
            "content": self.content.iter().map(Node::to_value).collect::<Vec<_>>(),
        })
    }

    /// Append a top-level block.
    pub fn push(&mut self, block: impl Into<Node>) {
        self.content.push(block.into());
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of top-level blocks.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Iterate top-level blocks that are elements.
    pub fn blocks(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(Node::as_element)
    }
}

impl Serialize for EditorDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "doc")?;
        map.serialize_entry("content", &self.content)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for EditorDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(EditorDocument::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_text_with_marks() {
        let node = Node::from_value(&json!({
            "type": "text",
            "text": "Hi",
            "marks": [{"type": "italic"}, {"type": "link"}, {"type": "bold"}]
        }));
        let Node::Text(t) = node else {
            panic!("expected text node");
        };
        assert_eq!(t.text, "Hi");
        assert_eq!(t.marks.iter().collect::<Vec<_>>(), vec![Mark::Bold, Mark::Italic]);
    }

    #[test]
    fn test_classify_shapes() {
        assert!(matches!(Node::from_value(&json!("raw")), Node::Bare(_)));
        assert!(matches!(Node::from_value(&json!([1, "a"])), Node::Seq(_)));
        assert!(matches!(Node::from_value(&json!(42)), Node::Opaque(_)));
        let untyped = Node::from_value(&json!({"content": []}));
        assert_eq!(untyped.as_element().map(|e| e.kind.clone()), Some(NodeKind::Untyped));
    }

    #[test]
    fn test_heading_level_defaults() {
        let h = Element::heading(2, vec![]);
        assert_eq!(h.heading_level(), 2);
        let missing = Element::new(NodeKind::Heading, vec![]);
        assert_eq!(missing.heading_level(), 1);
        let Node::Element(from_str) = Node::from_value(&json!({
            "type": "heading", "attrs": {"level": "3"}
        })) else {
            panic!("expected element");
        };
        assert_eq!(from_str.heading_level(), 3);
    }

    #[test]
    fn test_document_from_non_mapping_is_empty() {
        assert!(EditorDocument::from_value(&Value::Null).is_empty());
        assert!(EditorDocument::from_value(&json!({})).is_empty());
        assert!(EditorDocument::from_value(&json!([1, 2])).is_empty());
        assert!(EditorDocument::from_optional(None).is_empty());
    }

    #[test]
    fn test_serialize_canonical_shape() {
        let mut doc = EditorDocument::new();
        doc.push(Element::heading(
            1,
            vec![Node::marked("T", MarkSet::new().with(Mark::Bold))],
        ));
        doc.push(Element::paragraph(vec![]));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "doc",
                "content": [
                    {"type": "heading", "attrs": {"level": 1},
                     "content": [{"type": "text", "text": "T", "marks": [{"type": "bold"}]}]},
                    {"type": "paragraph", "content": []}
                ]
            })
        );
        assert_eq!(doc.to_value(), value);

        let back: EditorDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}

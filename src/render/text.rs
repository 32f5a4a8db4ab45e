//! Plain text extraction from the editor tree.

use crate::model::{EditorDocument, Node};

/// Convert an editor document to plain text.
///
/// Each top-level block contributes one line holding the concatenation of
/// every text leaf beneath it. Blocks without text contribute no line.
/// Marks never appear in the output.
pub fn extract_plain_text(doc: &EditorDocument) -> String {
    doc.content
        .iter()
        .map(node_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenated text of a single node and all of its descendants.
pub fn node_text(node: &Node) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&t.text),
        Node::Bare(s) => out.push_str(s),
        Node::Element(e) => {
            for child in &e.content {
                collect_text(child, out);
            }
        }
        Node::Seq(items) => {
            for child in items {
                collect_text(child, out);
            }
        }
        Node::Opaque(_) => {}
    }
}

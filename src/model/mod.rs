//! Document model types.
//!
//! Two representations live here: the tree-shaped editor document that is
//! persisted and edited, and the flat list of positioned canvas elements
//! that layout inference produces from imported files.

mod canvas;
mod editor;
mod marks;
mod metadata;
mod project;

pub use canvas::{
    Align, CanvasElement, ElementBody, ElementIds, ImageProperties, ParseResult, TableProperties,
    TextProperties, CANVAS_PAGE_WIDTH,
};
pub use editor::{EditorDocument, Element, Node, NodeKind, TextNode};
pub use marks::{Mark, MarkSet, RunFlags};
pub use metadata::Metadata;
pub use project::{ProjectExport, DEFAULT_IMPORT_TITLE, SCHEMA_VERSION};

//! Package reconstructor.
//!
//! Two variants share one reading pass: [`DocxParser::parse_tree`] rebuilds
//! the editor tree from body paragraphs, [`DocxParser::parse_canvas`] lays the
//! body out as positioned text, table and image elements.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageReader;

use crate::error::{Error, Result};
use crate::model::{
    CanvasElement, EditorDocument, Element, ElementBody, ElementIds, ImageProperties, Metadata,
    Node, NodeKind, ParseResult, TableProperties, TextProperties,
};

use super::options::{LayoutConfig, ParseOptions};
use super::package::{BodyItem, PackageReader, SourceParagraph, SourceTable};
use super::styles::{StyleClass, StyleSheet};

/// Alt text of imported images.
const IMPORTED_ALT: &str = "imported";

const TABLE_BORDER_WIDTH: u32 = 1;
const TABLE_BORDER_COLOR: &str = "#1a1a1a";
const TABLE_CELL_BG: &str = "transparent";

/// Read a package into an editor document.
pub fn parse_docx_tree(data: &[u8], options: &ParseOptions) -> Result<EditorDocument> {
    DocxParser::from_bytes_with_options(data, options.clone())?.parse_tree()
}

/// Read a package into positioned canvas elements plus plain text.
pub fn parse_docx_canvas(data: &[u8], options: &ParseOptions) -> Result<ParseResult> {
    DocxParser::from_bytes_with_options(data, options.clone())?.parse_canvas()
}

/// An embedded image with its decoded size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Lowercase format name, e.g. `png`, `jpeg`
    pub format: String,
    pub width: u32,
    pub height: u32,
    /// Original file bytes
    pub data: Vec<u8>,
}

impl DecodedImage {
    /// Sniff the format and read the dimensions without decoding pixels.
    pub fn decode(data: Vec<u8>) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data.as_slice()))
            .with_guessed_format()
            .map_err(|e| Error::ImageDecode(e.to_string()))?;
        let format = reader
            .format()
            .ok_or_else(|| Error::ImageDecode("unrecognized image format".to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| Error::ImageDecode(e.to_string()))?;
        if width == 0 {
            return Err(Error::ImageDecode("image has zero width".to_string()));
        }

        Ok(Self {
            format: format!("{:?}", format).to_lowercase(),
            width,
            height,
            data,
        })
    }

    /// Size scaled down proportionally so the width fits `max_width`.
    pub fn fitted(&self, max_width: u32) -> (u32, u32) {
        let width = self.width.min(max_width);
        let scale = f64::from(width) / f64::from(self.width);
        (width, (f64::from(self.height) * scale) as u32)
    }

    /// `data:image/<format>;base64,...`
    pub fn data_uri(&self) -> String {
        format!("data:image/{};base64,{}", self.format, STANDARD.encode(&self.data))
    }
}

/// Word-processor package parser.
pub struct DocxParser<'a> {
    reader: PackageReader<'a>,
    body: Vec<BodyItem>,
    styles: StyleSheet,
    options: ParseOptions,
}

impl<'a> DocxParser<'a> {
    /// Open a package from bytes.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Open a package from bytes with custom options.
    ///
    /// The body and style sheet are read eagerly, so a corrupt package fails here.
    pub fn from_bytes_with_options(data: &'a [u8], options: ParseOptions) -> Result<Self> {
        let mut reader = PackageReader::new(data)?;
        let body = reader.body()?;
        let styles = match reader.styles_xml()? {
            Some(xml) => StyleSheet::parse(&xml)?,
            None => StyleSheet::default(),
        };
        log::debug!(
            "docx: {} body item(s), {} style(s)",
            body.len(),
            styles.len()
        );

        Ok(Self {
            reader,
            body,
            styles,
            options,
        })
    }

    /// Body items in document order.
    pub fn body(&self) -> &[BodyItem] {
        &self.body
    }

    /// Document properties.
    pub fn metadata(&mut self) -> Result<Metadata> {
        self.reader.metadata()
    }

    /// Rebuild the editor tree from body paragraphs.
    ///
    /// Blank paragraphs become empty paragraphs. Tables are not part of the
    /// tree; list styles import as plain paragraphs.
    pub fn parse_tree(&self) -> Result<EditorDocument> {
        let mut doc = EditorDocument::new();
        let mut tables = 0;
        let mut list_paragraphs = 0;

        for item in &self.body {
            let paragraph = match item {
                BodyItem::Paragraph(p) => p,
                BodyItem::Table(_) => {
                    tables += 1;
                    continue;
                }
            };

            if paragraph.is_blank() {
                doc.push(Element::paragraph(Vec::new()));
                continue;
            }

            let class = self.styles.classify(paragraph.style_id.as_deref());
            if class.is_list() {
                list_paragraphs += 1;
            }

            let content = inline_nodes(paragraph);
            let block = match class {
                StyleClass::Heading(level) => Element::heading(level, content),
                _ => Element::paragraph(content),
            };

            if !block.content.is_empty() || block.is(&NodeKind::Paragraph) {
                doc.push(block);
            }
        }

        if tables > 0 {
            log::debug!("docx: {} table(s) left out of the editor tree", tables);
        }
        if list_paragraphs > 0 {
            log::warn!(
                "docx: list styles are not supported on import; {} list paragraph(s) kept as plain paragraphs",
                list_paragraphs
            );
        }
        Ok(doc)
    }

    /// Lay the body out top to bottom, then append embedded images.
    pub fn parse_canvas(&mut self) -> Result<ParseResult> {
        let layout = self.options.layout.clone();
        let mut ids = ElementIds::new();
        let mut elements = Vec::new();
        let mut chunks = Vec::new();
        let mut y = layout.origin_y;

        for item in &self.body {
            match item {
                BodyItem::Paragraph(paragraph) => {
                    if paragraph.is_blank() {
                        y += layout.blank_paragraph_advance;
                        continue;
                    }
                    let props = text_properties(paragraph, &layout);
                    let height = layout.text_height(props.font_size);
                    chunks.push(props.content.clone());
                    elements.push(CanvasElement::new(
                        ids.text(),
                        ElementBody::Text(props),
                        layout.origin_x,
                        y,
                        layout.content_width(),
                        height,
                    ));
                    y += height + layout.text_gap;
                }
                BodyItem::Table(table) => {
                    let props = table_properties(table);
                    let height = props.rows * layout.table_row_height;
                    chunks.push(props.plain_text());
                    elements.push(CanvasElement::new(
                        ids.table(),
                        ElementBody::Table(props),
                        layout.origin_x,
                        y,
                        layout.content_width(),
                        height,
                    ));
                    y += height + layout.table_gap;
                }
            }
        }

        if self.options.extract_images {
            for image in self.images()? {
                let (width, height) = image.fitted(layout.image_max_width);
                elements.push(CanvasElement::new(
                    ids.image(),
                    ElementBody::Image(ImageProperties {
                        src: image.data_uri(),
                        alt: IMPORTED_ALT.to_string(),
                    }),
                    layout.origin_x,
                    y,
                    width,
                    height,
                ));
                y += height + layout.image_gap;
            }
        }

        Ok(ParseResult {
            elements,
            text: chunks.join("\n"),
        })
    }

    /// Decode every image relationship in file order, skipping failures.
    pub fn images(&mut self) -> Result<Vec<DecodedImage>> {
        let mut images = Vec::new();

        for rel in self.reader.relationships()? {
            if !rel.is_image() {
                continue;
            }
            let part = rel.part_name();
            let decoded = match self.reader.part(&part) {
                Ok(Some(data)) => DecodedImage::decode(data),
                Ok(None) => Err(Error::ImageDecode(format!("missing part {}", part))),
                Err(e) => Err(Error::ImageDecode(e.to_string())),
            };
            match decoded {
                Ok(image) => images.push(image),
                Err(e) => log::warn!("docx: skipping image {} ({}): {}", rel.id, part, e),
            }
        }

        Ok(images)
    }
}

fn inline_nodes(paragraph: &SourceParagraph) -> Vec<Node> {
    paragraph
        .runs
        .iter()
        .filter(|run| !run.text.is_empty())
        .map(|run| Node::marked(run.text.clone(), run.flags.to_marks()))
        .collect()
}

/// Text element styled from the paragraph's first run.
fn text_properties(paragraph: &SourceParagraph, layout: &LayoutConfig) -> TextProperties {
    let mut props = layout.text_properties(paragraph.text());

    if let Some(run) = paragraph.runs.first() {
        props.bold = run.flags.bold.unwrap_or(false);
        props.italic = run.flags.italic.unwrap_or(false);
        props.underline = run.flags.underline.unwrap_or(false);
        if let Some(size) = run.size_points().filter(|&s| s > 0) {
            props.font_size = size;
        }
        if let Some(font) = &run.font {
            props.font_family = font.clone();
        }
        if let Some(color) = &run.color {
            props.color = format!("#{}", color);
        }
    }

    props
}

fn table_properties(table: &SourceTable) -> TableProperties {
    TableProperties {
        rows: table.rows.len() as u32,
        cols: table.cols() as u32,
        border_width: TABLE_BORDER_WIDTH,
        border_color: TABLE_BORDER_COLOR.to_string(),
        cell_bg: TABLE_CELL_BG.to_string(),
        data: table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const STYLES: &str = r#"<?xml version="1.0"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>
</w:styles>"#;

    fn package(body: &str, extra: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        zip.start_file("word/document.xml", opts).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        zip.start_file("word/styles.xml", opts).unwrap();
        zip.write_all(STYLES.as_bytes()).unwrap();
        for (name, data) in extra {
            zip.start_file(*name, opts).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn rels(targets: &[&str]) -> Vec<u8> {
        let entries: String = targets
            .iter()
            .enumerate()
            .map(|(i, t)| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
                    i + 1,
                    t
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            entries
        )
        .into_bytes()
    }

    #[test]
    fn test_tree_headings_marks_and_blanks() {
        let data = package(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
<w:p/><w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>
<w:p><w:r><w:rPr><w:b/><w:u w:val="single"/></w:rPr><w:t>Hello</w:t></w:r><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t> plain</w:t></w:r></w:p>"#,
            &[],
        );
        let doc = parse_docx_tree(&data, &ParseOptions::default()).unwrap();
        let blocks: Vec<&Element> = doc.blocks().collect();

        assert_eq!(blocks.len(), 4);
        assert!(blocks[0].is(&NodeKind::Heading));
        assert_eq!(blocks[0].heading_level(), 2);
        assert!(blocks[1].content.is_empty() && blocks[1].is(&NodeKind::Paragraph));
        assert!(blocks[2].content.is_empty() && blocks[2].is(&NodeKind::Paragraph));

        let Node::Text(hello) = &blocks[3].content[0] else {
            panic!("expected text");
        };
        assert!(hello.marks.contains(Mark::Bold));
        assert!(hello.marks.contains(Mark::Underline));
        assert!(!hello.marks.contains(Mark::Italic));
        let Node::Text(plain) = &blocks[3].content[1] else {
            panic!("expected text");
        };
        assert!(plain.marks.is_empty());
    }

    #[test]
    fn test_tree_skips_tables_and_flattens_lists() {
        let data = package(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p><w:pPr><w:pStyle w:val="ListBullet"/></w:pPr><w:r><w:t>item</w:t></w:r></w:p>"#,
            &[],
        );
        let doc = parse_docx_tree(&data, &ParseOptions::default()).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.blocks().all(|b| b.is(&NodeKind::Paragraph)));
        assert_eq!(crate::render::extract_plain_text(&doc), "item");
    }

    #[test]
    fn test_canvas_layout() {
        let data = package(
            r#"<w:p><w:r><w:rPr><w:b/><w:sz w:val="48"/><w:rFonts w:ascii="Georgia"/><w:color w:val="336699"/></w:rPr><w:t>Big</w:t></w:r></w:p>
<w:p/>
<w:tbl><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>
<w:tr><w:tc><w:p><w:r><w:t> a </w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>d</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p><w:r><w:t>Body</w:t></w:r></w:p>"#,
            &[],
        );
        let result = parse_docx_canvas(&data, &ParseOptions::default()).unwrap();
        assert_eq!(result.elements.len(), 3);

        let big = &result.elements[0];
        assert_eq!(big.id, "auto_txt_1");
        assert_eq!((big.x, big.y, big.width, big.height), (40, 40, 714, 33));
        let props = big.as_text().unwrap();
        assert_eq!(props.font_size, 24);
        assert_eq!(props.font_family, "Georgia");
        assert_eq!(props.color, "#336699");
        assert!(props.bold && !props.italic && !props.underline);

        // 40 + 33 + 6, then 12 for the blank paragraph
        let table = &result.elements[1];
        assert_eq!(table.id, "auto_tbl_2");
        assert_eq!((table.y, table.height), (91, 56));
        let grid = table.as_table().unwrap();
        assert_eq!((grid.rows, grid.cols), (2, 2));
        assert_eq!(grid.data[0], vec!["a", "b"]);

        let body = &result.elements[2];
        assert_eq!(body.y, 91 + 56 + 12);
        let props = body.as_text().unwrap();
        assert_eq!((props.font_size, props.font_family.as_str()), (14, "Inter"));
        assert_eq!(props.color, "#1a1a1a");

        assert_eq!(result.text, "Big\na\tb\nc\td\nBody");
    }

    #[test]
    fn test_canvas_images_scaled_and_failures_skipped() {
        let data = package(
            r#"<w:p><w:r><w:t>Text</w:t></w:r></w:p>"#,
            &[
                (
                    "word/_rels/document.xml.rels",
                    rels(&["media/image1.png", "media/image2.png", "media/image3.png"]),
                ),
                ("word/media/image1.png", png(500, 200)),
                ("word/media/image2.png", b"not an image".to_vec()),
                ("word/media/image3.png", png(100, 40)),
            ],
        );
        let result = parse_docx_canvas(&data, &ParseOptions::default()).unwrap();
        assert_eq!(result.elements.len(), 3);

        let first = &result.elements[1];
        assert_eq!(first.id, "auto_img_2");
        assert_eq!((first.width, first.height), (250, 100));
        assert_eq!(first.y, 40 + 20 + 6);
        let props = first.as_image().unwrap();
        assert!(props.src.starts_with("data:image/png;base64,"));
        assert_eq!(props.alt, "imported");

        let second = &result.elements[2];
        assert_eq!((second.width, second.height), (100, 40));
        assert_eq!(second.y, 66 + 100 + 12);
        assert_eq!(result.text, "Text");

        let text_only = parse_docx_canvas(&data, &ParseOptions::new().text_only()).unwrap();
        assert_eq!(text_only.elements.len(), 1);
    }

    #[test]
    fn test_corrupt_package_is_unreadable() {
        let err = parse_docx_tree(b"PK\x03\x04broken", &ParseOptions::default()).unwrap_err();
        assert!(err.is_source_unreadable());
    }
}

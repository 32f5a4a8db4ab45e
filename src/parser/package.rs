//! Word-processor package reader.
//!
//! Reads the parts of a `.docx` zip container and turns `word/document.xml`
//! into a flat sequence of [`BodyItem`]s in document order.

use std::io::{Cursor, Read};

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::model::{Metadata, RunFlags};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CORE_PART: &str = "docProps/core.xml";

/// Upper bound on the buffer reserved up front for one part.
const MAX_PART_RESERVE: u64 = 20 * 1024 * 1024;

/// A run as stored in the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRun {
    /// Run text; tabs and breaks appear as `\t` and `\n`
    pub text: String,
    /// Explicit bold/italic/underline flags
    pub flags: RunFlags,
    /// Font size in half-points (`w:sz`)
    pub size_half_points: Option<u32>,
    /// Font name (`w:rFonts w:ascii`)
    pub font: Option<String>,
    /// Explicit RGB color, `RRGGBB`
    pub color: Option<String>,
}

impl SourceRun {
    /// Font size in whole points.
    pub fn size_points(&self) -> Option<u32> {
        self.size_half_points.map(|half| half / 2)
    }
}

/// A body paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceParagraph {
    /// Paragraph style id (`w:pStyle`)
    pub style_id: Option<String>,
    pub runs: Vec<SourceRun>,
}

impl SourceParagraph {
    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// A top-level table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    /// Number of `w:gridCol` entries
    pub grid_cols: usize,
    /// Cell texts, row-major; each cell holds its paragraphs joined by `\n`
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Number of columns: the grid width, else the widest row.
    pub fn cols(&self) -> usize {
        if self.grid_cols > 0 {
            self.grid_cols
        } else {
            self.rows.iter().map(Vec::len).max().unwrap_or(0)
        }
    }
}

/// Body content in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    Paragraph(SourceParagraph),
    Table(SourceTable),
}

/// A package relationship (`word/_rels/document.xml.rels`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship points at embedded image media, judged by
    /// its type or by a target path mentioning "image".
    pub fn is_image(&self) -> bool {
        !self.external && (self.rel_type.ends_with("/image") || self.target.contains("image"))
    }

    /// Zip entry name of the target, resolved against `word/`.
    pub fn part_name(&self) -> String {
        match self.target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => {
                let mut parts: Vec<&str> = vec!["word"];
                for segment in self.target.split('/') {
                    match segment {
                        "" | "." => {}
                        ".." => {
                            parts.pop();
                        }
                        s => parts.push(s),
                    }
                }
                parts.join("/")
            }
        }
    }
}

/// Random access to the parts of a package.
pub struct PackageReader<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> PackageReader<'a> {
    /// Open a package. Fails unless the container holds `word/document.xml`.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        if !archive.file_names().any(|name| name == DOCUMENT_PART) {
            return Err(Error::Package(format!("missing {}", DOCUMENT_PART)));
        }
        Ok(Self { archive })
    }

    /// Raw bytes of a part, `None` if absent.
    pub fn part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut data = Vec::with_capacity(file.size().min(MAX_PART_RESERVE) as usize);
        file.read_to_end(&mut data)
            .map_err(|e| Error::Package(format!("{}: {}", name, e)))?;
        Ok(Some(data))
    }

    /// Body paragraphs and tables in document order.
    pub fn body(&mut self) -> Result<Vec<BodyItem>> {
        let xml = self
            .part(DOCUMENT_PART)?
            .ok_or_else(|| Error::Package(format!("missing {}", DOCUMENT_PART)))?;
        parse_body(&xml)
    }

    /// Contents of `word/styles.xml`, if present.
    pub fn styles_xml(&mut self) -> Result<Option<Vec<u8>>> {
        self.part(STYLES_PART)
    }

    /// Document relationships in file order.
    pub fn relationships(&mut self) -> Result<Vec<Relationship>> {
        match self.part(DOCUMENT_RELS_PART)? {
            Some(xml) => parse_relationships(&xml),
            None => Ok(Vec::new()),
        }
    }

    /// Title, author, subject and dates from `docProps/core.xml`.
    pub fn metadata(&mut self) -> Result<Metadata> {
        let mut metadata = Metadata::with_format("DOCX");
        if let Some(xml) = self.part(CORE_PART)? {
            read_core_properties(&xml, &mut metadata)?;
        }
        Ok(metadata)
    }
}

/// Attribute value by qualified name.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// `w:val` is explicitly off (`0`, `false`, `off`, or `none` for underline).
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(
        attr(e, b"w:val").as_deref(),
        Some("0" | "false" | "off" | "none")
    )
}

#[derive(Default)]
struct TableBuilder {
    grid_cols: usize,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
    span: usize,
    continues_merge: bool,
    /// Text of the cell that opened the vertical merge in each grid column
    column_text: Vec<String>,
}

impl TableBuilder {
    fn finish_cell(&mut self) {
        let col = self.row.len();
        let text = if self.continues_merge {
            self.column_text.get(col).cloned().unwrap_or_default()
        } else {
            self.cell.join("\n")
        };
        if self.column_text.len() < col + self.span {
            self.column_text.resize(col + self.span, String::new());
        }
        for slot in &mut self.column_text[col..col + self.span] {
            slot.clone_from(&text);
        }
        for _ in 0..self.span {
            self.row.push(text.clone());
        }
        self.cell.clear();
    }
}

/// Parser state while walking `word/document.xml`.
#[derive(Default)]
struct BodyWalker {
    items: Vec<BodyItem>,
    paragraph: Option<SourceParagraph>,
    run: Option<SourceRun>,
    in_run_props: bool,
    in_text: bool,
    table: Option<TableBuilder>,
    table_depth: usize,
    /// Depth inside drawings, textbox content or `mc:Fallback`, none of which is body text
    skipped_depth: usize,
}

impl BodyWalker {
    fn start(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"drawing" | b"pict" | b"txbxContent" | b"Fallback" => self.skipped_depth += 1,
            _ if self.skipped_depth > 0 => {}
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(TableBuilder::default());
                }
            }
            _ if self.table_depth > 1 => {}
            b"gridCol" => {
                if let Some(table) = self.table.as_mut() {
                    table.grid_cols += 1;
                }
            }
            b"tr" => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            b"tc" => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                    table.span = 1;
                    table.continues_merge = false;
                }
            }
            b"vMerge" => {
                if let Some(table) = self.table.as_mut() {
                    table.continues_merge = attr(e, b"w:val").as_deref() != Some("restart");
                }
            }
            b"gridSpan" => {
                if let Some(table) = self.table.as_mut() {
                    table.span = attr(e, b"w:val")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(1)
                        .max(1);
                }
            }
            b"p" => self.paragraph = Some(SourceParagraph::default()),
            b"pStyle" if self.run.is_none() => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = attr(e, b"w:val");
                }
            }
            b"r" if self.paragraph.is_some() => self.run = Some(SourceRun::default()),
            b"rPr" if self.run.is_some() => self.in_run_props = true,
            b"t" if self.run.is_some() => self.in_text = true,
            b"tab" if self.run.is_some() && !self.in_run_props => self.push_text("\t"),
            b"br" | b"cr" if self.run.is_some() => self.push_text("\n"),
            name if self.in_run_props => {
                if let Some(run) = self.run.as_mut() {
                    apply_run_property(run, name, e);
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"drawing" | b"pict" | b"txbxContent" | b"Fallback" => {
                self.skipped_depth = self.skipped_depth.saturating_sub(1)
            }
            _ if self.skipped_depth > 0 => {}
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    if let Some(table) = self.table.take() {
                        self.items.push(BodyItem::Table(SourceTable {
                            grid_cols: table.grid_cols,
                            rows: table.rows,
                        }));
                    }
                }
            }
            _ if self.table_depth > 1 => {}
            b"tr" => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            b"tc" => {
                if let Some(table) = self.table.as_mut() {
                    table.finish_cell();
                }
            }
            b"p" => {
                if let Some(paragraph) = self.paragraph.take() {
                    match self.table.as_mut() {
                        Some(table) => table.cell.push(paragraph.text()),
                        None => self.items.push(BodyItem::Paragraph(paragraph)),
                    }
                }
            }
            b"r" => {
                self.in_text = false;
                self.in_run_props = false;
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
            }
            b"rPr" => self.in_run_props = false,
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.table_depth <= 1 && self.skipped_depth == 0 {
            self.push_text(text);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }
}

fn apply_run_property(run: &mut SourceRun, name: &[u8], e: &BytesStart<'_>) {
    match name {
        b"b" => run.flags.bold = Some(toggle(e)),
        b"i" => run.flags.italic = Some(toggle(e)),
        b"u" => run.flags.underline = Some(toggle(e)),
        b"sz" => run.size_half_points = attr(e, b"w:val").and_then(|v| v.parse().ok()),
        b"rFonts" => run.font = attr(e, b"w:ascii").or_else(|| attr(e, b"w:hAnsi")),
        b"color" => {
            run.color = attr(e, b"w:val").filter(|v| {
                v.len() == 6 && v.chars().all(|c| c.is_ascii_hexdigit())
            })
        }
        _ => {}
    }
}

/// Walk `word/document.xml` into body items.
pub fn parse_body(xml: &[u8]) -> Result<Vec<BodyItem>> {
    let mut reader = Reader::from_reader(xml);
    let mut walker = BodyWalker::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => walker.start(&e),
            Event::Empty(e) => {
                walker.start(&e);
                walker.end(e.local_name().as_ref());
            }
            Event::End(e) => walker.end(e.local_name().as_ref()),
            Event::Text(t) => {
                let text = t.unescape()?;
                walker.text(&text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                walker.text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.items)
}

/// Parse a relationships part.
pub fn parse_relationships(xml: &[u8]) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    rels.push(Relationship {
                        id,
                        target,
                        rel_type: attr(&e, b"Type").unwrap_or_default(),
                        external: attr(&e, b"TargetMode").as_deref() == Some("External"),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

fn read_core_properties(xml: &[u8], metadata: &mut Metadata) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut current: Option<Vec<u8>> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => current = Some(e.local_name().as_ref().to_vec()),
            Event::End(_) => current = None,
            Event::Text(t) => {
                let value = t.unescape()?.trim().to_string();
                if value.is_empty() {
                    buf.clear();
                    continue;
                }
                match current.as_deref() {
                    Some(b"title") => metadata.title = Some(value),
                    Some(b"creator") => metadata.author = Some(value),
                    Some(b"subject") => metadata.subject = Some(value),
                    Some(b"created") => metadata.created = parse_w3c_date(&value),
                    Some(b"modified") => metadata.modified = parse_w3c_date(&value),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_w3c_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            inner
        )
    }

    fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraph_runs_and_flags() {
        let xml = body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/><w:rPr><w:b/></w:rPr></w:pPr>
<w:r><w:rPr><w:b/><w:u w:val="single"/><w:sz w:val="29"/><w:rFonts w:ascii="Arial"/><w:color w:val="FF0000"/></w:rPr><w:t xml:space="preserve">Hello </w:t></w:r>
<w:r><w:rPr><w:i w:val="0"/></w:rPr><w:t>world</w:t><w:tab/><w:t>&amp; more</w:t></w:r></w:p>"#,
        );
        let items = parse_body(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);

        let BodyItem::Paragraph(para) = &items[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.style_id.as_deref(), Some("Heading2"));
        assert_eq!(para.text(), "Hello world\t& more");
        assert_eq!(para.runs.len(), 2);

        let first = &para.runs[0];
        assert_eq!(first.flags.bold, Some(true));
        assert_eq!(first.flags.italic, None);
        assert_eq!(first.flags.underline, Some(true));
        assert_eq!(first.size_points(), Some(14));
        assert_eq!(first.font.as_deref(), Some("Arial"));
        assert_eq!(first.color.as_deref(), Some("FF0000"));

        assert_eq!(para.runs[1].flags.italic, Some(false));
        assert_eq!(para.runs[1].flags.bold, None);
    }

    #[test]
    fn test_tables_interleave_with_paragraphs() {
        let xml = body(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p>
<w:tbl><w:tblGrid><w:gridCol/><w:gridCol/><w:gridCol/></w:tblGrid>
<w:tr><w:tc><w:p><w:r><w:t> a </w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p><w:p><w:r><w:t>d</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr>
</w:tbl>
<w:p/>"#,
        );
        let items = parse_body(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], BodyItem::Paragraph(p) if p.text() == "Before"));
        assert!(matches!(&items[2], BodyItem::Paragraph(p) if p.runs.is_empty()));

        let BodyItem::Table(table) = &items[1] else {
            panic!("expected table");
        };
        assert_eq!(table.cols(), 3);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec![" a ", "b", "b"]);
        assert_eq!(table.rows[1], vec!["c\nd", "", ""]);
    }

    #[test]
    fn test_textbox_content_stays_out_of_the_body() {
        let xml = body(
            r#"<w:p><w:r><w:t xml:space="preserve">Before box. </w:t></w:r>
<w:r><mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><mc:Choice Requires="wps"><w:drawing><wps:wsp xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"><wps:txbx><w:txbxContent><w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Inside box</w:t></w:r></w:p></w:txbxContent></wps:txbx></wps:wsp></w:drawing></mc:Choice>
<mc:Fallback><w:pict><v:textbox xmlns:v="urn:schemas-microsoft-com:vml"><w:txbxContent><w:p><w:r><w:t>Inside box</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback></mc:AlternateContent></w:r>
<w:r><w:t>After box.</w:t></w:r></w:p>
<w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        );
        let items = parse_body(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        let BodyItem::Paragraph(first) = &items[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(first.text(), "Before box. After box.");
        assert_eq!(first.style_id, None);
        assert!(matches!(&items[1], BodyItem::Paragraph(p) if p.text() == "Next"));
    }

    #[test]
    fn test_vertical_merge_repeats_origin_text() {
        let xml = body(
            r#"<w:tbl><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>
<w:tr><w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc><w:tc><w:p><w:r><w:t>C</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>D</w:t></w:r></w:p></w:tc><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr>
</w:tbl>"#,
        );
        let items = parse_body(xml.as_bytes()).unwrap();
        let BodyItem::Table(table) = &items[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0], vec!["A", "B"]);
        assert_eq!(table.rows[1], vec!["A", "C"]);
        assert_eq!(table.rows[2], vec!["D", "C"]);
    }

    #[test]
    fn test_relationships_in_file_order() {
        let xml = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId2" Type="http://x/image" Target="media/image2.png"/>
<Relationship Id="rId1" Type="http://x/styles" Target="styles.xml"/>
<Relationship Id="rId3" Type="http://x/hyperlink" Target="https://example.com/image" TargetMode="External"/>
</Relationships>"#;
        let rels = parse_relationships(xml.as_bytes()).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels[0].id, "rId2");
        assert!(rels[0].is_image());
        assert!(!rels[1].is_image());
        assert!(!rels[2].is_image());
        assert_eq!(rels[0].part_name(), "word/media/image2.png");
    }

    #[test]
    fn test_part_name_resolution() {
        let rel = |target: &str| Relationship {
            id: "rId1".into(),
            rel_type: String::new(),
            target: target.into(),
            external: false,
        };
        assert_eq!(rel("/word/media/a.png").part_name(), "word/media/a.png");
        assert_eq!(rel("../media/a.png").part_name(), "media/a.png");
        assert_eq!(rel("./media/a.png").part_name(), "word/media/a.png");
    }

    #[test]
    fn test_reader_requires_document_part() {
        let data = zip_parts(&[("word/other.xml", "<x/>")]);
        assert!(matches!(PackageReader::new(&data), Err(Error::Package(_))));
        assert!(PackageReader::new(b"not a zip")
            .err()
            .is_some_and(|e| e.is_source_unreadable()));
    }

    #[test]
    fn test_core_metadata() {
        let core = r#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/">
<dc:title>Quarterly</dc:title><dc:creator>Ada</dc:creator>
<dcterms:created>2024-03-05T10:00:00Z</dcterms:created></cp:coreProperties>"#;
        let data = zip_parts(&[("word/document.xml", body("").as_str()), ("docProps/core.xml", core)]);
        let mut reader = PackageReader::new(&data).unwrap();

        let meta = reader.metadata().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Quarterly"));
        assert_eq!(meta.author.as_deref(), Some("Ada"));
        assert_eq!(meta.created.unwrap().month(), 3);
        assert_eq!(meta.format, "DOCX");
        assert!(reader.body().unwrap().is_empty());
        assert!(reader.relationships().unwrap().is_empty());
    }
}

//! Word-processor package writer.
//!
//! The editor tree is first flattened into native paragraphs (a style id
//! and styled runs), which are then written as WordprocessingML into a
//! zip container together with fixed style and numbering parts.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{Error, Result};
use crate::model::{EditorDocument, Element, Node, NodeKind, RunFlags};

use super::options::RenderOptions;

/// Style id of bullet list paragraphs.
pub const LIST_BULLET_STYLE: &str = "ListBullet";
/// Style id of numbered list paragraphs.
pub const LIST_NUMBER_STYLE: &str = "ListNumber";

/// Deepest native heading level.
pub const MAX_HEADING_LEVEL: i64 = 9;

/// A native run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRun {
    pub text: String,
    pub flags: RunFlags,
}

/// A native paragraph: an optional style id and its runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageParagraph {
    pub style_id: Option<String>,
    pub runs: Vec<PackageRun>,
}

/// Style id of a heading paragraph at an editor level.
pub fn heading_style_id(level: i64) -> String {
    format!("Heading{}", level.clamp(1, MAX_HEADING_LEVEL))
}

/// Flatten the editor tree into native paragraphs.
///
/// Only direct text children of a block become runs. Lists are flattened
/// one level: the paragraphs of each list item become list-style paragraphs.
pub fn package_paragraphs(doc: &EditorDocument) -> Vec<PackageParagraph> {
    let mut out = Vec::new();

    for block in doc.blocks() {
        match &block.kind {
            NodeKind::Heading => out.push(PackageParagraph {
                style_id: Some(heading_style_id(block.heading_level())),
                runs: runs_of(block),
            }),
            kind if kind.is_paragraph_like() => out.push(PackageParagraph {
                style_id: None,
                runs: runs_of(block),
            }),
            NodeKind::BulletList | NodeKind::OrderedList => {
                let style = if block.kind == NodeKind::BulletList {
                    LIST_BULLET_STYLE
                } else {
                    LIST_NUMBER_STYLE
                };
                let paragraphs = block
                    .content
                    .iter()
                    .filter_map(|n| n.element_of(&NodeKind::ListItem))
                    .flat_map(|item| item.content.iter())
                    .filter_map(|n| n.element_of(&NodeKind::Paragraph));
                for para in paragraphs {
                    out.push(PackageParagraph {
                        style_id: Some(style.to_string()),
                        runs: runs_of(para),
                    });
                }
            }
            other => log::debug!("docx: skipping block of type {:?}", other.name()),
        }
    }

    out
}

fn runs_of(element: &Element) -> Vec<PackageRun> {
    element
        .content
        .iter()
        .filter_map(|node| match node {
            Node::Text(t) => Some(PackageRun {
                text: t.text.clone(),
                flags: RunFlags::from_marks(&t.marks),
            }),
            _ => None,
        })
        .collect()
}

/// Render an editor document into a `.docx` package.
///
/// An empty document still yields a complete package with an empty body.
pub fn render_docx(doc: &EditorDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    let paragraphs = package_paragraphs(doc);
    log::debug!("docx: writing {} paragraph(s)", paragraphs.len());

    let document_xml = document_xml(&paragraphs, options)?;
    let core_xml = core_xml(options.title.as_deref())?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("docProps/core.xml", core_xml.as_slice()),
        ("word/document.xml", document_xml.as_slice()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/numbering.xml", NUMBERING_XML.as_bytes()),
    ];
    for (name, data) in parts {
        zip.start_file(name, opt).map_err(render_err)?;
        zip.write_all(data).map_err(render_err)?;
    }

    let cursor = zip.finish().map_err(render_err)?;
    Ok(cursor.into_inner())
}

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(render_err)
}

fn empty(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    write(writer, Event::Empty(start))
}

fn open(writer: &mut XmlWriter, name: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    write(writer, Event::End(BytesEnd::new(name)))
}

fn twips(points: f32) -> String {
    ((points * 20.0).round() as i64).to_string()
}

fn document_xml(paragraphs: &[PackageParagraph], options: &RenderOptions) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", W_NS));
    root.push_attribute(("xmlns:r", R_NS));
    write(&mut writer, Event::Start(root))?;
    open(&mut writer, "w:body")?;

    for para in paragraphs {
        open(&mut writer, "w:p")?;
        if let Some(style) = para.style_id.as_deref() {
            open(&mut writer, "w:pPr")?;
            empty(&mut writer, "w:pStyle", &[("w:val", style)])?;
            close(&mut writer, "w:pPr")?;
        }
        for run in &para.runs {
            write_run(&mut writer, run)?;
        }
        close(&mut writer, "w:p")?;
    }

    let page = options.page_size;
    let margins = options.margins;
    let (width, height) = (twips(page.width), twips(page.height));
    let (top, right) = (twips(margins.top), twips(margins.right));
    let (bottom, left) = (twips(margins.bottom), twips(margins.left));
    open(&mut writer, "w:sectPr")?;
    empty(
        &mut writer,
        "w:pgSz",
        &[("w:w", width.as_str()), ("w:h", height.as_str())],
    )?;
    empty(
        &mut writer,
        "w:pgMar",
        &[
            ("w:top", top.as_str()),
            ("w:right", right.as_str()),
            ("w:bottom", bottom.as_str()),
            ("w:left", left.as_str()),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    close(&mut writer, "w:sectPr")?;

    close(&mut writer, "w:body")?;
    close(&mut writer, "w:document")?;
    Ok(writer.into_inner().into_inner())
}

fn write_run(writer: &mut XmlWriter, run: &PackageRun) -> Result<()> {
    open(writer, "w:r")?;
    if !run.flags.is_unset() {
        open(writer, "w:rPr")?;
        if run.flags.bold == Some(true) {
            empty(writer, "w:b", &[])?;
        }
        if run.flags.italic == Some(true) {
            empty(writer, "w:i", &[])?;
        }
        if run.flags.underline == Some(true) {
            empty(writer, "w:u", &[("w:val", "single")])?;
        }
        close(writer, "w:rPr")?;
    }

    let mut chunk = String::new();
    for c in run.text.chars() {
        match c {
            '\n' | '\t' => {
                write_text(writer, &std::mem::take(&mut chunk))?;
                let tag = if c == '\n' { "w:br" } else { "w:tab" };
                empty(writer, tag, &[])?;
            }
            _ => chunk.push(c),
        }
    }
    write_text(writer, &chunk)?;
    close(writer, "w:r")
}

fn write_text(writer: &mut XmlWriter, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let mut start = BytesStart::new("w:t");
    start.push_attribute(("xml:space", "preserve"));
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    close(writer, "w:t")
}

fn core_xml(title: Option<&str>) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
    )?;
    let mut root = BytesStart::new("cp:coreProperties");
    root.push_attribute(("xmlns:cp", CP_NS));
    root.push_attribute(("xmlns:dc", DC_NS));
    write(&mut writer, Event::Start(root))?;
    if let Some(title) = title {
        open(&mut writer, "dc:title")?;
        write(&mut writer, Event::Text(BytesText::new(title)))?;
        close(&mut writer, "dc:title")?;
    }
    open(&mut writer, "dc:creator")?;
    write(&mut writer, Event::Text(BytesText::new("docflow")))?;
    close(&mut writer, "dc:creator")?;
    close(&mut writer, "cp:coreProperties")?;
    Ok(writer.into_inner().into_inner())
}

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="jpeg" ContentType="image/jpeg"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:rPr><w:sz w:val="22"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="3"/></w:pPr><w:rPr><w:b/><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading5"><w:name w:val="heading 5"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="4"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading6"><w:name w:val="heading 6"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="5"/></w:pPr><w:rPr><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading7"><w:name w:val="heading 7"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="6"/></w:pPr><w:rPr><w:i/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading8"><w:name w:val="heading 8"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="7"/></w:pPr><w:rPr><w:sz w:val="20"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading9"><w:name w:val="heading 9"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="8"/></w:pPr><w:rPr><w:i/><w:sz w:val="20"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="2"/></w:numPr></w:pPr></w:style>
</w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="&#8226;"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
  <w:abstractNum w:abstractNumId="1"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paragraphs(value: serde_json::Value) -> Vec<PackageParagraph> {
        package_paragraphs(&EditorDocument::from_value(&value))
    }

    #[test]
    fn test_heading_and_bold_run() {
        let paras = paragraphs(json!({"type": "doc", "content": [
            {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Title"}]},
            {"type": "paragraph", "content": [{"type": "text", "text": "Hello", "marks": [{"type": "bold"}]}]}
        ]}));
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].style_id.as_deref(), Some("Heading2"));
        assert_eq!(paras[0].runs[0].text, "Title");
        assert!(paras[0].runs[0].flags.is_unset());
        assert_eq!(paras[1].style_id, None);
        assert_eq!(paras[1].runs[0].flags.bold, Some(true));
        assert_eq!(paras[1].runs[0].flags.italic, None);
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(heading_style_id(12), "Heading9");
        assert_eq!(heading_style_id(0), "Heading1");
    }

    #[test]
    fn test_lists_flatten_to_styled_paragraphs() {
        let paras = paragraphs(json!({"content": [
            {"type": "bulletList", "content": [
                {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "a"}]}]},
                {"type": "listItem", "content": [{"type": "paragraph", "content": []}]}
            ]},
            {"type": "orderedList", "content": [
                {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "b"}]}]}
            ]}
        ]}));
        let styles: Vec<_> = paras.iter().map(|p| p.style_id.clone().unwrap_or_default()).collect();
        assert_eq!(styles, vec!["ListBullet", "ListBullet", "ListNumber"]);
    }

    #[test]
    fn test_empty_paragraph_is_kept() {
        let paras = paragraphs(json!({"content": [{"type": "paragraph", "content": []}]}));
        assert_eq!(paras, vec![PackageParagraph::default()]);
    }

    #[test]
    fn test_document_xml_escapes_and_breaks() {
        let paras = vec![PackageParagraph {
            style_id: None,
            runs: vec![PackageRun {
                text: "a<b\nc".into(),
                flags: RunFlags {
                    underline: Some(true),
                    ..Default::default()
                },
            }],
        }];
        let xml = String::from_utf8(document_xml(&paras, &RenderOptions::default()).unwrap()).unwrap();
        assert!(xml.contains("a&lt;b"));
        assert!(xml.contains("<w:br/>"));
        assert!(xml.contains(r#"<w:u w:val="single"/>"#));
        assert!(xml.contains(r#"w:w="11906""#));
    }

    #[test]
    fn test_empty_document_package() {
        let bytes = render_docx(&EditorDocument::new(), &RenderOptions::default()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert!(names.contains(&"word/document.xml"));
        assert!(names.contains(&"word/styles.xml"));
    }
}

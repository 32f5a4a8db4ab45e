//! PDF reconstructor.
//!
//! Words are grouped into lines per page (see [`super::layout`]); each line
//! becomes one paragraph in the tree variant and one text element in the
//! canvas variant. Pages without words contribute nothing.

use chrono::{DateTime, NaiveDate, Utc};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{
    CanvasElement, EditorDocument, Element, ElementBody, ElementIds, Metadata, Node, ParseResult,
};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::{PageWords, WordExtractor};
use super::options::{PageSelection, ParseOptions};

/// Read a PDF into an editor document, one paragraph per text line.
pub fn parse_pdf_tree(data: &[u8], options: &ParseOptions) -> Result<EditorDocument> {
    PdfParser::from_bytes_with_options(data, options.clone())?.parse_tree()
}

/// Read a PDF into positioned canvas elements plus plain text.
pub fn parse_pdf_canvas(data: &[u8], options: &ParseOptions) -> Result<ParseResult> {
    PdfParser::from_bytes_with_options(data, options.clone())?.parse_canvas()
}

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        if backend.is_encrypted() {
            log::debug!("PDF is encrypted; text may not be recoverable");
        }
        Ok(Self { backend, options })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Document information and page count.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_format(format!("PDF {}", self.backend.version()));
        metadata.title = self.backend.info_string(b"Title");
        metadata.author = self.backend.info_string(b"Author");
        metadata.subject = self.backend.info_string(b"Subject");
        metadata.created = self
            .backend
            .info_string(b"CreationDate")
            .and_then(|s| parse_pdf_date(&s));
        metadata.modified = self
            .backend
            .info_string(b"ModDate")
            .and_then(|s| parse_pdf_date(&s));
        metadata.page_count = self.page_count();
        metadata.encrypted = self.backend.is_encrypted();
        metadata
    }

    /// Words of every selected page, in page order.
    pub fn pages(&self) -> Result<Vec<PageWords>> {
        let pages = self.backend.pages();
        let total = pages.len() as u32;

        if let PageSelection::Pages(requested) = &self.options.pages {
            if let Some(&missing) = requested.iter().find(|&&p| p == 0 || p > total) {
                return Err(Error::PageOutOfRange(missing, total));
            }
        }

        let extractor = WordExtractor::new(&self.backend);
        let mut result = Vec::new();
        for (&number, &page_id) in &pages {
            if !self.options.pages.includes(number) {
                continue;
            }
            result.push(extractor.extract_page(number, page_id)?);
        }

        log::debug!("read {} of {} pages", result.len(), total);
        Ok(result)
    }

    /// Line texts of each page that has words.
    fn page_lines(&self) -> Result<Vec<Vec<String>>> {
        Ok(self
            .pages()?
            .into_iter()
            .filter(|page| !page.is_empty())
            .map(|page| {
                page.lines()
                    .iter()
                    .map(|line| self.normalize(line.text()))
                    .collect()
            })
            .collect())
    }

    fn normalize(&self, text: String) -> String {
        if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text
        }
    }

    /// One paragraph per line of text.
    pub fn parse_tree(&self) -> Result<EditorDocument> {
        let mut doc = EditorDocument::new();
        for line in self.page_lines()?.into_iter().flatten() {
            let text = line.trim();
            if text.is_empty() {
                doc.push(Element::paragraph(Vec::new()));
            } else {
                doc.push(Element::paragraph(vec![Node::text(text)]));
            }
        }
        Ok(doc)
    }

    /// One full-width text element per line, stacked top to bottom.
    pub fn parse_canvas(&self) -> Result<ParseResult> {
        let layout = &self.options.layout;
        let mut ids = ElementIds::new();
        let mut elements = Vec::new();
        let mut plain = Vec::new();
        let mut y = layout.origin_y;

        for lines in self.page_lines()? {
            for text in lines {
                elements.push(CanvasElement::new(
                    ids.text(),
                    ElementBody::Text(layout.text_properties(text.clone())),
                    layout.origin_x,
                    y,
                    layout.content_width(),
                    layout.pdf_line_height,
                ));
                plain.push(text);
                y += layout.pdf_line_height + layout.pdf_line_gap;
            }
            y += layout.pdf_page_gap;
        }

        Ok(ParseResult {
            elements,
            text: plain.join("\n"),
        })
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS`). Timezone suffixes are ignored.
pub(crate) fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    if s.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(default)
    };

    let year: i32 = s.get(0..4)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use crate::render::{render_flow, FlowBlock, FlowDocument, ParagraphStyle, RenderOptions};
    use chrono::{Datelike, Timelike};

    fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
        let story = FlowDocument {
            blocks: lines
                .iter()
                .map(|l| FlowBlock::Paragraph {
                    markup: l.to_string(),
                    style: ParagraphStyle::Body,
                })
                .collect(),
        };
        render_flow(&story, &RenderOptions::default().with_title("Lines")).unwrap()
    }

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045+02'00'").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
        assert_eq!(date.hour(), 10);
        assert_eq!(date.second(), 45);
    }

    #[test]
    fn test_parse_pdf_date_minimal() {
        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 1));
        assert!(parse_pdf_date("D:20").is_none());
    }

    #[test]
    fn test_tree_one_paragraph_per_line() {
        let data = pdf_with_lines(&["First line", "Second line"]);
        let doc = parse_pdf_tree(&data, &ParseOptions::default()).unwrap();

        assert_eq!(doc.len(), 2);
        assert!(doc.blocks().all(|b| b.is(&NodeKind::Paragraph)));
        assert_eq!(crate::render::extract_plain_text(&doc), "First line\nSecond line");
    }

    #[test]
    fn test_canvas_geometry() {
        let data = pdf_with_lines(&["Alpha", "Beta"]);
        let result = parse_pdf_canvas(&data, &ParseOptions::default()).unwrap();

        assert_eq!(result.elements.len(), 2);
        assert_eq!(result.text, "Alpha\nBeta");

        let first = &result.elements[0];
        assert_eq!(first.id, "auto_txt_1");
        assert_eq!((first.x, first.y, first.width, first.height), (40, 40, 714, 18));
        assert_eq!(result.elements[1].y, 62);
        assert_eq!(result.elements[1].as_text().unwrap().content, "Beta");
    }

    #[test]
    fn test_empty_pdf_yields_nothing() {
        let data = render_flow(&FlowDocument::default(), &RenderOptions::default()).unwrap();
        let result = parse_pdf_canvas(&data, &ParseOptions::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.text, "");

        let doc = parse_pdf_tree(&data, &ParseOptions::default()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_metadata() {
        let data = pdf_with_lines(&["x"]);
        let meta = PdfParser::from_bytes(&data).unwrap().metadata();
        assert_eq!(meta.title.as_deref(), Some("Lines"));
        assert_eq!(meta.page_count, 1);
        assert_eq!(meta.format, "PDF 1.5");
    }

    #[test]
    fn test_page_out_of_range() {
        let data = pdf_with_lines(&["x"]);
        let options = ParseOptions::new().with_pages(PageSelection::Pages(vec![3]));
        let err = parse_pdf_tree(&data, &options).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange(3, 1)));
    }

    #[test]
    fn test_garbage_is_source_unreadable() {
        let err = parse_pdf_tree(b"%PDF-1.4\n%garbage", &ParseOptions::default()).unwrap_err();
        assert!(err.is_source_unreadable());
    }
}

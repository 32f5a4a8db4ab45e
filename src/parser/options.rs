//! Parsing options and configuration.

use std::ops::RangeInclusive;

use crate::model::{Align, TextProperties, CANVAS_PAGE_WIDTH};

/// Options for reading DOCX and PDF files.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Page selection (PDF only)
    pub pages: PageSelection,

    /// Whether to decode embedded images into canvas elements
    pub extract_images: bool,

    /// NFC-normalize text extracted from PDF
    pub normalize_unicode: bool,

    /// Canvas geometry
    pub layout: LayoutConfig,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Skip embedded images.
    pub fn text_only(mut self) -> Self {
        self.extract_images = false;
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set canvas geometry.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            extract_images: true,
            normalize_unicode: true,
            layout: LayoutConfig::default(),
        }
    }
}

/// Geometry of reconstructed canvas elements, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Left edge of every element
    pub origin_x: u32,
    /// Vertical cursor start
    pub origin_y: u32,
    /// Canvas page width
    pub page_width: u32,

    /// Height of a text line reconstructed from PDF
    pub pdf_line_height: u32,
    /// Gap after each PDF line
    pub pdf_line_gap: u32,
    /// Extra gap after each PDF page with text
    pub pdf_page_gap: u32,

    /// Cursor advance for a blank DOCX paragraph
    pub blank_paragraph_advance: u32,
    /// Minimum height of a DOCX text element
    pub min_text_height: u32,
    /// Text height per point of font size, in tenths
    pub text_height_tenths: u32,
    /// Gap after a DOCX text element
    pub text_gap: u32,
    /// Height of one table row
    pub table_row_height: u32,
    /// Gap after a table
    pub table_gap: u32,
    /// Images wider than this are scaled down
    pub image_max_width: u32,
    /// Gap after an image
    pub image_gap: u32,

    /// Text element defaults when the source sets nothing
    pub default_font_family: String,
    pub default_font_size: u32,
    pub default_color: String,
}

impl LayoutConfig {
    /// Width of full-width elements.
    pub fn content_width(&self) -> u32 {
        self.page_width.saturating_sub(2 * self.origin_x)
    }

    /// Height of a text element for a font size: `max(min, floor(size * factor))`.
    pub fn text_height(&self, font_size: u32) -> u32 {
        let scaled = font_size.saturating_mul(self.text_height_tenths) / 10;
        scaled.max(self.min_text_height)
    }

    /// Text element properties with every style field at its default.
    pub fn text_properties(&self, content: impl Into<String>) -> TextProperties {
        TextProperties {
            content: content.into(),
            font_family: self.default_font_family.clone(),
            font_size: self.default_font_size,
            color: self.default_color.clone(),
            bold: false,
            italic: false,
            underline: false,
            align: Align::Left,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 40,
            origin_y: 40,
            page_width: CANVAS_PAGE_WIDTH,
            pdf_line_height: 18,
            pdf_line_gap: 4,
            pdf_page_gap: 20,
            blank_paragraph_advance: 12,
            min_text_height: 20,
            text_height_tenths: 14,
            text_gap: 6,
            table_row_height: 28,
            table_gap: 12,
            image_max_width: 250,
            image_gap: 12,
            default_font_family: "Inter".to_string(),
            default_font_size: 14,
            default_color: "#1a1a1a".to_string(),
        }
    }
}

/// Page selection for parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                pages.extend(start..=end);
            } else {
                pages.push(part.parse().map_err(|_| "Invalid page number")?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

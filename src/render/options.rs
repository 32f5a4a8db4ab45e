//! Rendering options and configuration.

/// Page size in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// US Letter portrait.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(72.0)
    }
}

/// Typography of one paragraph style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points
    pub font_size: f32,
    /// Baseline-to-baseline distance in points
    pub leading: f32,
    /// Space above the paragraph, dropped at the top of a page
    pub space_before: f32,
    /// Space below the paragraph
    pub space_after: f32,
    /// Whether the paragraph uses the bold face by default
    pub bold: bool,
}

impl TextStyle {
    /// A style with no extra spacing.
    pub const fn new(font_size: f32, leading: f32) -> Self {
        Self {
            font_size,
            leading,
            space_before: 0.0,
            space_after: 0.0,
            bold: false,
        }
    }

    /// Set space before.
    pub const fn before(mut self, space: f32) -> Self {
        self.space_before = space;
        self
    }

    /// Set space after.
    pub const fn after(mut self, space: f32) -> Self {
        self.space_after = space;
        self
    }

    /// Render in the bold face.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Paragraph styles of the flow document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowStyles {
    /// Body text
    pub body: TextStyle,
    /// Heading tiers 1, 2 and 3
    pub headings: [TextStyle; 3],
}

impl FlowStyles {
    /// Style for a heading tier (1-based, clamped to 1..=3).
    pub fn heading(&self, tier: u8) -> &TextStyle {
        let idx = tier.clamp(1, 3) as usize - 1;
        &self.headings[idx]
    }
}

impl Default for FlowStyles {
    fn default() -> Self {
        Self {
            body: TextStyle::new(12.0, 16.0),
            headings: [
                TextStyle::new(24.0, 28.0).after(12.0).bold(),
                TextStyle::new(20.0, 24.0).before(12.0).after(10.0).bold(),
                TextStyle::new(16.0, 20.0).before(12.0).after(8.0).bold(),
            ],
        }
    }
}

/// Heights of the vertical spacers inserted between flow blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// After a heading
    pub after_heading: f32,
    /// After a non-empty paragraph
    pub after_paragraph: f32,
    /// In place of an empty paragraph
    pub empty_paragraph: f32,
    /// After a list
    pub after_list: f32,
    /// The only block of an otherwise empty story
    pub placeholder: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            after_heading: 6.0,
            after_paragraph: 4.0,
            empty_paragraph: 12.0,
            after_list: 8.0,
            placeholder: 1.0,
        }
    }
}

/// Options for rendering an editor document into a paginated PDF.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page size
    pub page_size: PageSize,

    /// Page margins
    pub margins: Margins,

    /// Paragraph styles
    pub styles: FlowStyles,

    /// Spacer heights
    pub spacing: Spacing,

    /// Left indent of list item text in points
    pub list_indent: f32,

    /// Document title written to the PDF Info dictionary
    pub title: Option<String>,

    /// Compress page content streams
    pub compress: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set paragraph styles.
    pub fn with_styles(mut self, styles: FlowStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Set spacer heights.
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the list indent.
    pub fn with_list_indent(mut self, indent: f32) -> Self {
        self.list_indent = indent.max(0.0);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Width available for text between the margins.
    pub fn frame_width(&self) -> f32 {
        (self.page_size.width - self.margins.left - self.margins.right).max(1.0)
    }

    /// Height available for text between the margins.
    pub fn frame_height(&self) -> f32 {
        (self.page_size.height - self.margins.top - self.margins.bottom).max(1.0)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::default(),
            styles: FlowStyles::default(),
            spacing: Spacing::default(),
            list_indent: 18.0,
            title: None,
            compress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_page_size(PageSize::LETTER)
            .with_margins(Margins::uniform(36.0))
            .with_list_indent(-4.0)
            .with_compression(false);

        assert_eq!(options.page_size, PageSize::LETTER);
        assert_eq!(options.margins.left, 36.0);
        assert_eq!(options.list_indent, 0.0);
        assert!(!options.compress);
        assert_eq!(options.frame_width(), 612.0 - 72.0);
    }

    #[test]
    fn test_default_frame() {
        let options = RenderOptions::default();
        assert_eq!(options.page_size, PageSize::A4);
        assert!((options.frame_width() - 451.28).abs() < 0.01);
    }

    #[test]
    fn test_heading_tiers_clamp() {
        let styles = FlowStyles::default();
        assert_eq!(styles.heading(1).font_size, 24.0);
        assert_eq!(styles.heading(2).space_after, 10.0);
        assert_eq!(styles.heading(3).leading, 20.0);
        assert_eq!(styles.heading(7), styles.heading(3));
        assert_eq!(styles.heading(0), styles.heading(1));
    }
}

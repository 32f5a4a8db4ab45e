//! Paginated PDF composition.
//!
//! Lays a [`FlowDocument`] out on fixed-size pages using the standard
//! Helvetica faces, wrapping words greedily inside the margin frame and
//! breaking pages when the frame is full.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::model::{EditorDocument, Mark};

use super::flow::{build_flow, FlowBlock, FlowDocument, ListKind, ParagraphStyle};
use super::markup::parse_markup;
use super::metrics::{encode_win_ansi, text_width, Face};
use super::options::{RenderOptions, TextStyle};

/// Gap between a list marker and the item text.
const MARKER_GAP: f32 = 4.0;

/// Render an editor document to PDF bytes.
pub fn render_pdf(doc: &EditorDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    let story = build_flow(doc, &options.spacing);
    render_flow(&story, options)
}

/// Lay out a flow story and serialize it as PDF.
pub fn render_flow(story: &FlowDocument, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut composer = Composer::new(options);

    for block in &story.blocks {
        match block {
            FlowBlock::Paragraph { markup, style } => {
                let text_style = match style {
                    ParagraphStyle::Body => options.styles.body,
                    ParagraphStyle::Heading(tier) => *options.styles.heading(tier.number()),
                };
                composer.paragraph(markup, &text_style, 0.0, None);
            }
            FlowBlock::Spacer { height } => composer.space(*height),
            FlowBlock::List { kind, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = match kind {
                        ListKind::Bullet => "\u{2022}".to_string(),
                        ListKind::Ordered => format!("{}.", i + 1),
                    };
                    composer.paragraph(
                        item,
                        &options.styles.body,
                        options.list_indent,
                        Some(&marker),
                    );
                }
            }
        }
    }

    let pages = composer.finish();
    log::debug!("pdf: composed {} page(s)", pages.len());
    assemble(pages, options)
}

/// A piece of a word in a single face.
#[derive(Debug, Clone)]
struct Fragment {
    text: String,
    face: Face,
    underline: bool,
}

#[derive(Debug, Clone, Default)]
struct Word {
    fragments: Vec<Fragment>,
}

impl Word {
    fn width(&self, size: f32) -> f32 {
        self.fragments
            .iter()
            .map(|f| text_width(&f.text, f.face, size))
            .sum()
    }

    fn push(&mut self, c: char, face: Face, underline: bool) {
        match self.fragments.last_mut() {
            Some(last) if last.face == face && last.underline == underline => last.text.push(c),
            _ => self.fragments.push(Fragment {
                text: c.to_string(),
                face,
                underline,
            }),
        }
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[derive(Debug)]
enum Token {
    Word(Word),
    Break,
}

/// Split paragraph markup into words; `\n` forces a line break.
fn tokenize(markup: &str, base_bold: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = Word::default();

    for span in parse_markup(markup) {
        let face = Face::select(
            base_bold || span.marks.contains(Mark::Bold),
            span.marks.contains(Mark::Italic),
        );
        let underline = span.marks.contains(Mark::Underline);
        for c in span.text.chars() {
            if c == '\n' {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                tokens.push(Token::Break);
            } else if c.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
            } else {
                word.push(c, face, underline);
            }
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Split a word that is wider than the line into pieces that fit.
fn split_word(word: Word, size: f32, width: f32) -> Vec<Word> {
    let mut pieces = Vec::new();
    let mut current = Word::default();
    let mut used = 0.0;
    for fragment in word.fragments {
        for c in fragment.text.chars() {
            let w = text_width(c.encode_utf8(&mut [0; 4]), fragment.face, size);
            if used + w > width && !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                used = 0.0;
            }
            current.push(c, fragment.face, fragment.underline);
            used += w;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy line filling.
fn wrap(tokens: Vec<Token>, size: f32, width: f32) -> Vec<Vec<Word>> {
    let space = text_width(" ", Face::Regular, size);
    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut used = 0.0;

    for token in tokens {
        let word = match token {
            Token::Break => {
                lines.push(std::mem::take(&mut line));
                used = 0.0;
                continue;
            }
            Token::Word(w) => w,
        };

        let pieces = if word.width(size) > width {
            split_word(word, size, width)
        } else {
            vec![word]
        };

        for piece in pieces {
            let w = piece.width(size);
            let needed = if line.is_empty() { w } else { used + space + w };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                used = w;
            } else {
                used = needed;
            }
            line.push(piece);
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

struct Composer<'a> {
    options: &'a RenderOptions,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Distance consumed from the top of the frame on the current page
    cursor: f32,
}

impl<'a> Composer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: 0.0,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.cursor = 0.0;
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= 0.0
    }

    fn space(&mut self, height: f32) {
        if self.cursor + height > self.options.frame_height() {
            self.new_page();
        } else {
            self.cursor += height;
        }
    }

    fn paragraph(&mut self, markup: &str, style: &TextStyle, indent: f32, marker: Option<&str>) {
        let size = style.font_size;
        let width = (self.options.frame_width() - indent).max(size);
        let lines = wrap(tokenize(markup, style.bold), size, width);

        if !self.at_page_top() && style.space_before > 0.0 {
            self.space(style.space_before);
        }

        let left = self.options.margins.left + indent;
        let frame_top = self.options.page_size.height - self.options.margins.top;
        let space = text_width(" ", Face::Regular, size);

        for (i, line) in lines.iter().enumerate() {
            if self.cursor + style.leading > self.options.frame_height() && !self.at_page_top() {
                self.new_page();
            }
            let baseline = frame_top - self.cursor - size;

            if i == 0 {
                if let Some(marker) = marker {
                    let face = Face::select(style.bold, false);
                    let marker_x = (left - MARKER_GAP - text_width(marker, face, size))
                        .max(self.options.margins.left);
                    self.draw(marker, face, size, marker_x, baseline, false);
                }
            }

            let mut x = left;
            let mut run: Option<(Fragment, f32)> = None;
            for (w, word) in line.iter().enumerate() {
                for (f, fragment) in word.fragments.iter().enumerate() {
                    let joins_space = w > 0 && f == 0;
                    if let Some((current, _)) = run.as_mut() {
                        if current.face == fragment.face && current.underline == fragment.underline
                        {
                            if joins_space {
                                current.text.push(' ');
                            }
                            current.text.push_str(&fragment.text);
                            continue;
                        }
                    }
                    if let Some((done, start)) = run.take() {
                        x = start + text_width(&done.text, done.face, size);
                        self.draw(&done.text, done.face, size, start, baseline, done.underline);
                    }
                    if joins_space {
                        x += space;
                    }
                    run = Some((fragment.clone(), x));
                }
            }
            if let Some((done, start)) = run.take() {
                self.draw(&done.text, done.face, size, start, baseline, done.underline);
            }

            self.cursor += style.leading;
        }

        self.cursor += style.space_after;
    }

    fn draw(&mut self, text: &str, face: Face, size: f32, x: f32, y: f32, underline: bool) {
        let name = face.resource_name().as_bytes().to_vec();
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(name), Object::Real(size)],
        ));
        self.ops.push(Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::Real(x),
                Object::Real(y),
            ],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));

        if underline {
            let width = text_width(text, face, size);
            let uy = y - size * 0.1;
            self.ops.push(Operation::new("q", vec![]));
            self.ops
                .push(Operation::new("w", vec![Object::Real(size * 0.05)]));
            self.ops.push(Operation::new(
                "m",
                vec![Object::Real(x), Object::Real(uy)],
            ));
            self.ops.push(Operation::new(
                "l",
                vec![Object::Real(x + width), Object::Real(uy)],
            ));
            self.ops.push(Operation::new("S", vec![]));
            self.ops.push(Operation::new("Q", vec![]));
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(std::mem::take(&mut self.ops));
        self.pages
    }
}

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// PDF text string: PDFDocEncoding-compatible ASCII, else UTF-16BE with BOM.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn content_stream(data: Vec<u8>, compress: bool) -> Result<Stream> {
    if !compress {
        return Ok(Stream::new(Dictionary::new(), data));
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data).map_err(render_err)?;
    let compressed = encoder.finish().map_err(render_err)?;
    let mut dict = Dictionary::new();
    dict.set("Filter", name("FlateDecode"));
    Ok(Stream::new(dict, compressed))
}

fn assemble(pages: Vec<Vec<Operation>>, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut pdf = LopdfDocument::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut fonts = Dictionary::new();
    for face in Face::ALL {
        let mut font = Dictionary::new();
        font.set("Type", name("Font"));
        font.set("Subtype", name("Type1"));
        font.set("BaseFont", name(face.base_font()));
        font.set("Encoding", name("WinAnsiEncoding"));
        let font_id = pdf.add_object(font);
        fonts.set(face.resource_name(), Object::Reference(font_id));
    }
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    let resources_id = pdf.add_object(resources);

    let media_box = Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(options.page_size.width),
        Object::Real(options.page_size.height),
    ]);

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let data = Content { operations }.encode().map_err(render_err)?;
        let content_id = pdf.add_object(content_stream(data, options.compress)?);

        let mut page = Dictionary::new();
        page.set("Type", name("Page"));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Reference(resources_id));
        page.set("MediaBox", media_box.clone());
        kids.push(Object::Reference(pdf.add_object(page)));
    }

    let mut page_tree = Dictionary::new();
    page_tree.set("Type", name("Pages"));
    page_tree.set("Count", Object::Integer(kids.len() as i64));
    page_tree.set("Kids", Object::Array(kids));
    page_tree.set("MediaBox", media_box);
    pdf.objects.insert(pages_id, Object::Dictionary(page_tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = pdf.add_object(catalog);
    pdf.trailer.set("Root", Object::Reference(catalog_id));

    let mut info = Dictionary::new();
    info.set("Producer", text_string("docflow"));
    if let Some(title) = options.title.as_deref() {
        info.set("Title", text_string(title));
    }
    let info_id = pdf.add_object(info);
    pdf.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer).map_err(render_err)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::options::Spacing;

    fn words(tokens: &[Token]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| match t {
                Token::Word(w) => w.fragments.iter().map(|f| f.text.as_str()).collect(),
                Token::Break => "\n".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_tokenize_keeps_mixed_words_together() {
        let tokens = tokenize("He<b>llo</b> world\nnext", false);
        assert_eq!(words(&tokens), vec!["Hello", "world", "\n", "next"]);
        let Token::Word(first) = &tokens[0] else {
            panic!("expected word");
        };
        assert_eq!(first.fragments.len(), 2);
        assert_eq!(first.fragments[1].face, Face::Bold);
    }

    #[test]
    fn test_wrap_breaks_at_width() {
        let tokens = tokenize("aaaa bbbb cccc", false);
        let size = 10.0;
        let one_word = text_width("aaaa", Face::Regular, size);
        let space = text_width(" ", Face::Regular, size);
        let lines = wrap(tokens, size, one_word * 2.0 + space + 0.1);
        assert_eq!(lines.len(), 2);

        let line_text = |line: &Vec<Word>| {
            line.iter()
                .map(|w| w.fragments.iter().map(|f| f.text.as_str()).collect::<String>())
                .collect::<Vec<_>>()
                .join(" ")
        };
        assert_eq!(line_text(&lines[0]), "aaaa bbbb");
        assert_eq!(line_text(&lines[1]), "cccc");
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let tokens = tokenize("abcdefghij", false);
        let size = 10.0;
        let lines = wrap(tokens, size, text_width("abc", Face::Regular, size) + 0.1);
        assert!(lines.len() >= 3);
    }

    #[test]
    fn test_render_empty_story_is_valid_pdf() {
        let story = build_flow(&EditorDocument::new(), &Spacing::default());
        let bytes = render_flow(&story, &RenderOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let parsed = LopdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn test_long_story_breaks_pages() {
        let story = FlowDocument {
            blocks: (0..80)
                .map(|i| FlowBlock::Paragraph {
                    markup: format!("Line {}", i),
                    style: ParagraphStyle::Body,
                })
                .collect(),
        };
        let bytes = render_flow(&story, &RenderOptions::default()).unwrap();
        let parsed = LopdfDocument::load_mem(&bytes).unwrap();
        assert!(parsed.get_pages().len() >= 2);
    }

    #[test]
    fn test_text_string_encoding() {
        assert!(matches!(text_string("abc"), Object::String(ref b, _) if b == b"abc"));
        let Object::String(bytes, _) = text_string("é") else {
            panic!("expected string");
        };
        assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0xE9]);
    }
}

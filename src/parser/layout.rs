//! Positioned word extraction and line grouping.
//!
//! Pages are read through [`PdfBackend`] into [`Word`] tokens carrying
//! horizontal extents and a `top` coordinate measured downward from the top
//! edge of the page. [`group_words_into_lines`] then buckets words by the
//! integer floor of `top`, so grouping is deterministic for a given file.

use std::collections::{BTreeMap, HashMap};

use crate::error::Result;
use crate::render::metrics::{char_width, Face};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Glyphs closer than this (in points) join into one word.
const X_TOLERANCE: f32 = 3.0;

/// Upper bound on the join distance relative to the font size, kept below
/// the width of a space (0.278 em in Helvetica).
const X_TOLERANCE_EM: f32 = 0.2;

/// Glyphs whose tops differ by more than this start a new word.
const Y_TOLERANCE: f32 = 1.0;

/// A `TJ` kerning adjustment above this (1/1000 em) separates words.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Approximate ascender height relative to the font size.
const ASCENT: f32 = 0.8;

/// Leading assumed until a `TL` or `TD` operator sets one.
const DEFAULT_LEADING: f32 = 12.0;

/// A word token with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The word text, never containing whitespace
    pub text: String,
    /// Left edge in points
    pub x0: f32,
    /// Right edge in points
    pub x1: f32,
    /// Distance from the top of the page to the top of the glyphs
    pub top: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl Word {
    /// Create a word with a zero-width extent at the given position.
    pub fn new(text: impl Into<String>, x0: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            x1: x0,
            top,
            font_size: 12.0,
            font_name: String::new(),
        }
    }

    /// Line bucket of this word.
    pub fn bucket(&self) -> i64 {
        self.top.floor() as i64
    }
}

/// Words sharing one vertical bucket, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// `floor(top)` shared by every word of the line
    pub bucket: i64,
    pub words: Vec<Word>,
}

impl TextLine {
    /// Words joined by a single space.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// All words found on one page.
#[derive(Debug, Clone)]
pub struct PageWords {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Words in content-stream order
    pub words: Vec<Word>,
}

impl PageWords {
    /// Check if the page has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Group the page's words into lines, top to bottom.
    pub fn lines(&self) -> Vec<TextLine> {
        group_words_into_lines(self.words.clone())
    }
}

/// Group words into lines by `floor(top)`.
///
/// Lines come back in ascending bucket order (top of page first), and the
/// words of each line in ascending `x0`. Words with equal `x0` keep their
/// input order.
pub fn group_words_into_lines(words: Vec<Word>) -> Vec<TextLine> {
    let mut buckets: BTreeMap<i64, Vec<Word>> = BTreeMap::new();
    for word in words {
        buckets.entry(word.bucket()).or_default().push(word);
    }

    buckets
        .into_iter()
        .map(|(bucket, mut words)| {
            words.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            TextLine { bucket, words }
        })
        .collect()
}

/// Reads positioned words out of page content streams.
pub struct WordExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> WordExtractor<'a, B> {
    /// Create an extractor over a loaded document.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract the words of one page.
    pub fn extract_page(&self, number: u32, page: PageId) -> Result<PageWords> {
        let (width, height) = self.backend.page_size(page);

        let fonts: HashMap<Vec<u8>, String> = match self.backend.page_fonts(page) {
            Ok(fonts) => fonts.into_iter().map(|f| (f.name, f.base_font)).collect(),
            Err(e) => {
                log::debug!("page {}: no font resources ({})", number, e);
                HashMap::new()
            }
        };

        let content = self.backend.page_content(page)?;
        let ops = self.backend.decode_content(&content)?;

        let mut state = TextState::new(height);
        let mut sink = WordSink::default();
        for op in &ops {
            self.apply(op, page, &fonts, &mut state, &mut sink);
        }

        let words = sink.finish();
        log::debug!("page {}: {} words", number, words.len());
        Ok(PageWords {
            number,
            width,
            height,
            words,
        })
    }

    fn apply(
        &self,
        op: &ContentOp,
        page: PageId,
        fonts: &HashMap<Vec<u8>, String>,
        state: &mut TextState,
        sink: &mut WordSink,
    ) {
        let num = |i: usize| op.operands.get(i).and_then(PdfValue::as_number);

        match op.operator.as_str() {
            "q" => state.ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.ctm_stack.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    state.ctm = m.multiply(&state.ctm);
                }
            }
            "BT" => {
                state.tm = Matrix::IDENTITY;
                state.tlm = Matrix::IDENTITY;
            }
            "ET" => sink.flush(),
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    state.font_base = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).into_owned());
                    state.face = Face::from_base_font(&state.font_base);
                    state.font_resource = name.clone();
                }
                if let Some(size) = num(1) {
                    state.font_size = size;
                }
            }
            "Tc" => state.char_spacing = num(0).unwrap_or(0.0),
            "Tw" => state.word_spacing = num(0).unwrap_or(0.0),
            "Tz" => state.horizontal_scale = num(0).unwrap_or(100.0) / 100.0,
            "TL" => state.leading = num(0).unwrap_or(0.0),
            "Td" => state.next_line(num(0).unwrap_or(0.0), num(1).unwrap_or(0.0)),
            "TD" => {
                let ty = num(1).unwrap_or(0.0);
                state.leading = -ty;
                state.next_line(num(0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    state.tm = m;
                    state.tlm = m;
                }
            }
            "T*" => state.next_line(0.0, -state.leading),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(bytes, page, state, sink);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            PdfValue::Str(bytes) => self.show(bytes, page, state, sink),
                            other => {
                                if let Some(adjust) = other.as_number() {
                                    if -adjust > TJ_SPACE_THRESHOLD {
                                        sink.gap();
                                    }
                                    state.advance(-adjust / 1000.0 * state.font_size);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                state.next_line(0.0, -state.leading);
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    self.show(bytes, page, state, sink);
                }
            }
            "\"" => {
                state.word_spacing = num(0).unwrap_or(state.word_spacing);
                state.char_spacing = num(1).unwrap_or(state.char_spacing);
                state.next_line(0.0, -state.leading);
                if let Some(PdfValue::Str(bytes)) = op.operands.get(2) {
                    self.show(bytes, page, state, sink);
                }
            }
            _ => {}
        }
    }

    fn show(&self, bytes: &[u8], page: PageId, state: &mut TextState, sink: &mut WordSink) {
        let text = self
            .backend
            .decode_text(page, &state.font_resource, bytes);

        for c in text.chars() {
            let glyph = char_width(c, state.face) as f32 / 1000.0 * state.font_size;
            let render = state.tm.multiply(&state.ctm);
            let size = state.font_size * render.vertical_scale();
            let x0 = render.e;
            let x1 = x0 + glyph * state.horizontal_scale * render.horizontal_scale();
            let top = state.page_height - (render.f + ASCENT * size);

            if c.is_whitespace() {
                sink.flush();
            } else {
                sink.push(c, x0, x1, top, size, &state.font_base);
            }

            let mut advance = glyph + state.char_spacing;
            if c == ' ' {
                advance += state.word_spacing;
            }
            state.advance(advance);
        }
    }
}

/// Graphics and text state relevant to glyph placement.
struct TextState {
    page_height: f32,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    font_resource: Vec<u8>,
    font_base: String,
    face: Face,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
}

impl TextState {
    fn new(page_height: f32) -> Self {
        Self {
            page_height,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            font_resource: Vec::new(),
            font_base: String::new(),
            face: Face::Regular,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: DEFAULT_LEADING,
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.tlm = self.tlm.translated(tx, ty);
        self.tm = self.tlm;
    }

    /// Move the text position along the baseline by an unscaled text-space distance.
    fn advance(&mut self, tx: f32) {
        self.tm = self.tm.translated(tx * self.horizontal_scale, 0.0);
    }
}

/// A PDF affine matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6]
            .iter()
            .map(|v| v.as_number().unwrap_or(0.0))
            .collect();
        Some(Matrix {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// `translate(tx, ty) × self`
    fn translated(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..*self
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Accumulates glyphs into words.
#[derive(Default)]
struct WordSink {
    pending: Option<Word>,
    words: Vec<Word>,
}

impl WordSink {
    fn push(&mut self, c: char, x0: f32, x1: f32, top: f32, size: f32, font: &str) {
        if let Some(word) = self.pending.as_mut() {
            let tolerance = X_TOLERANCE.min(size * X_TOLERANCE_EM);
            let joins = (x0 - word.x1).abs() <= tolerance && (top - word.top).abs() <= Y_TOLERANCE;
            if joins {
                word.text.push(c);
                word.x1 = word.x1.max(x1);
                return;
            }
        }

        self.flush();
        self.pending = Some(Word {
            text: c.to_string(),
            x0,
            x1,
            top,
            font_size: size,
            font_name: font.to_string(),
        });
    }

    /// A positioning gap large enough to count as a space.
    fn gap(&mut self) {
        let spaceless = self
            .pending
            .as_ref()
            .and_then(|w| w.text.chars().last())
            .map(is_spaceless_script_char)
            .unwrap_or(false);
        if !spaceless {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if let Some(word) = self.pending.take() {
            self.words.push(word);
        }
    }

    fn finish(mut self) -> Vec<Word> {
        self.flush();
        self.words
    }
}

/// Scripts written without spaces between words (Chinese, Japanese kana).
/// Hangul is excluded: Korean separates words with spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

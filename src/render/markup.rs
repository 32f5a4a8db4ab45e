//! Inline emphasis markup used by flow paragraphs.
//!
//! Flow paragraphs carry their text as a small tag language: `<b>`, `<i>`
//! and `<u>` around entity-escaped text. Marks are always nested as bold,
//! then italic, then underline, so a given mark set yields one markup string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Mark, MarkSet};

/// A run of text sharing one mark set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub marks: MarkSet,
}

fn tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "b",
        Mark::Italic => "i",
        Mark::Underline => "u",
    }
}

/// Escape text so it can be embedded in markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`].
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Wrap text in the tags of its marks.
pub fn to_markup(text: &str, marks: &MarkSet) -> String {
    let mut out = String::new();
    for mark in marks.iter() {
        out.push('<');
        out.push_str(tag(mark));
        out.push('>');
    }
    out.push_str(&escape(text));
    let closing: Vec<Mark> = marks.iter().collect();
    for mark in closing.into_iter().rev() {
        out.push_str("</");
        out.push_str(tag(mark));
        out.push('>');
    }
    out
}

/// A tag, a run of text, or a stray `<`.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([biu])>|[^<]+|<").expect("valid token pattern"));

/// Split markup back into styled spans.
///
/// Adjacent text with the same marks is merged. Unbalanced closing tags
/// are ignored.
pub fn parse_markup(markup: &str) -> Vec<Span> {
    let mut depth = [0u32; 3];
    let mut spans: Vec<Span> = Vec::new();

    for caps in TOKEN_REGEX.captures_iter(markup) {
        if let Some(name) = caps.get(2) {
            let idx = match name.as_str() {
                "b" => 0,
                "i" => 1,
                _ => 2,
            };
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            if closing {
                depth[idx] = depth[idx].saturating_sub(1);
            } else {
                depth[idx] += 1;
            }
            continue;
        }

        let raw = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let text = unescape(raw);
        let marks: MarkSet = Mark::ALL
            .into_iter()
            .zip(depth)
            .filter(|(_, d)| *d > 0)
            .map(|(m, _)| m)
            .collect();

        match spans.last_mut() {
            Some(last) if last.marks == marks => last.text.push_str(&text),
            _ => spans.push(Span { text, marks }),
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_markup() {
        let marks = MarkSet::new().with(Mark::Bold);
        assert_eq!(to_markup("Hello", &marks), "<b>Hello</b>");
    }

    #[test]
    fn test_nesting_order_is_fixed() {
        let a = MarkSet::new().with(Mark::Underline).with(Mark::Bold).with(Mark::Italic);
        assert_eq!(to_markup("x", &a), "<b><i><u>x</u></i></b>");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(to_markup("a<b>&c", &MarkSet::new()), "a&lt;b&gt;&amp;c");
        assert_eq!(unescape(&escape("1 < 2 && 3 > 2")), "1 < 2 && 3 > 2");
    }

    #[test]
    fn test_parse_markup_spans() {
        let markup = format!(
            "{}{}",
            to_markup("plain ", &MarkSet::new()),
            to_markup("<strong>", &MarkSet::new().with(Mark::Bold).with(Mark::Underline))
        );
        let spans = parse_markup(&markup);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "plain ");
        assert!(spans[0].marks.is_empty());
        assert_eq!(spans[1].text, "<strong>");
        assert!(spans[1].marks.contains(Mark::Bold));
        assert!(spans[1].marks.contains(Mark::Underline));
    }

    #[test]
    fn test_parse_merges_and_tolerates_stray_close() {
        let spans = parse_markup("<i>a</i><i>b</i></b>c");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "ab");
        assert_eq!(spans[1].text, "c");
    }
}

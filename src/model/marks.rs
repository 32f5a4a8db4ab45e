//! Inline formatting marks and their native run-flag form.

use serde::{Deserialize, Serialize};

/// An inline formatting attribute recognized by every converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Bold weight
    Bold,
    /// Italic slant
    Italic,
    /// Single underline
    Underline,
}

impl Mark {
    /// All marks in application order (outermost first).
    pub const ALL: [Mark; 3] = [Mark::Bold, Mark::Italic, Mark::Underline];

    /// Look up a mark by its editor name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(Mark::Bold),
            "italic" => Some(Mark::Italic),
            "underline" => Some(Mark::Underline),
            _ => None,
        }
    }

    /// Editor name of the mark.
    pub fn name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
        }
    }
}

/// A deduplicated set of marks.
///
/// Iteration always yields bold, then italic, then underline regardless of
/// the order in which marks were inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MarkSet {
    bold: bool,
    italic: bool,
    underline: bool,
}

impl MarkSet {
    /// Create an empty mark set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mark. Adding a mark twice has no effect.
    pub fn insert(&mut self, mark: Mark) {
        match mark {
            Mark::Bold => self.bold = true,
            Mark::Italic => self.italic = true,
            Mark::Underline => self.underline = true,
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, mark: Mark) -> Self {
        self.insert(mark);
        self
    }

    /// Check whether a mark is present.
    pub fn contains(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    /// Check if no mark is present.
    pub fn is_empty(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }

    /// Number of marks present.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterate marks in application order.
    pub fn iter(&self) -> impl Iterator<Item = Mark> + '_ {
        Mark::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut set = MarkSet::new();
        for mark in iter {
            set.insert(mark);
        }
        set
    }
}

/// Native run formatting of a word-processor run.
///
/// Each flag is tri-state: `None` means the run does not set the property
/// and inherits it, which is never the same as an explicit `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// `w:b`
    pub bold: Option<bool>,
    /// `w:i`
    pub italic: Option<bool>,
    /// `w:u`
    pub underline: Option<bool>,
}

impl RunFlags {
    /// Flags that explicitly enable every mark in the set and leave the rest unset.
    pub fn from_marks(marks: &MarkSet) -> Self {
        let on = |m| marks.contains(m).then_some(true);
        Self {
            bold: on(Mark::Bold),
            italic: on(Mark::Italic),
            underline: on(Mark::Underline),
        }
    }

    /// Marks for the flags that are explicitly true.
    pub fn to_marks(&self) -> MarkSet {
        let mut marks = MarkSet::new();
        if self.bold == Some(true) {
            marks.insert(Mark::Bold);
        }
        if self.italic == Some(true) {
            marks.insert(Mark::Italic);
        }
        if self.underline == Some(true) {
            marks.insert(Mark::Underline);
        }
        marks
    }

    /// Check if no flag is set at all.
    pub fn is_unset(&self) -> bool {
        self.bold.is_none() && self.italic.is_none() && self.underline.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_names() {
        for mark in Mark::ALL {
            assert_eq!(Mark::from_name(mark.name()), Some(mark));
        }
        assert_eq!(Mark::from_name("strike"), None);
    }

    #[test]
    fn test_markset_order_and_dedup() {
        let set: MarkSet = [Mark::Underline, Mark::Bold, Mark::Underline]
            .into_iter()
            .collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Mark::Bold, Mark::Underline]);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(Mark::Italic));
    }

    #[test]
    fn test_unset_flags_are_not_marks() {
        let flags = RunFlags {
            bold: None,
            italic: Some(false),
            underline: Some(true),
        };
        let marks = flags.to_marks();
        assert!(!marks.contains(Mark::Bold));
        assert!(!marks.contains(Mark::Italic));
        assert!(marks.contains(Mark::Underline));
    }

    #[test]
    fn test_flags_from_marks() {
        let marks = MarkSet::new().with(Mark::Bold).with(Mark::Underline);
        let flags = RunFlags::from_marks(&marks);
        assert_eq!(flags.bold, Some(true));
        assert_eq!(flags.italic, None);
        assert_eq!(flags.underline, Some(true));
        assert_eq!(flags.to_marks(), marks);
        assert!(RunFlags::default().is_unset());
    }
}

//! Normalized lines and their classification.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, HeadingLevel};

/// One visual text line, assembled from fragments sharing a row and font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Trimmed, joined text
    pub text: String,
    /// Representative font size (largest among the fragments)
    pub font_size: f32,
    /// Whether most of the line's characters are bold
    pub bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Union of the fragment boxes
    pub bbox: BoundingBox,
}

impl Line {
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool, page: u32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            page,
            bbox,
        }
    }

    /// Left edge, the indentation signal.
    pub fn left(&self) -> f32 {
        self.bbox.x0
    }

    /// Top edge; larger values are higher on the page.
    pub fn top(&self) -> f32 {
        self.bbox.y1
    }

    /// Number of non-whitespace characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Length of the trimmed text in characters, interior spaces included.
    /// Both heading length limits count this way.
    pub fn text_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Why a line was forced out of consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscardReason {
    /// Bare page number or page label
    PageNumber,
    /// Same text at the same position on most pages
    RunningHeader,
    /// Longer than any plausible heading
    TooLong,
    /// Too short to be a heading
    TooShort,
    /// URL, copyright line, bare date, punctuation
    Boilerplate,
}

/// The role assigned to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Title,
    Heading(HeadingLevel),
    Body,
    Discard(DiscardReason),
}

impl Role {
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Role::Heading(level) => Some(*level),
            _ => None,
        }
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Role::Discard(_))
    }
}

/// A line together with the role the assigner gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub line: Line,
    pub role: Role,
}

impl ClassifiedLine {
    pub fn new(line: Line, role: Role) -> Self {
        Self { line, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_ignores_whitespace() {
        let l = Line::new("1 Intro  duction", 12.0, false, 1, BoundingBox::default());
        assert_eq!(l.char_count(), 14);
        assert_eq!(l.text_len(), 16);
    }

    #[test]
    fn test_role_helpers() {
        assert_eq!(
            Role::Heading(HeadingLevel::H2).heading_level(),
            Some(HeadingLevel::H2)
        );
        assert_eq!(Role::Title.heading_level(), None);
        assert!(Role::Discard(DiscardReason::PageNumber).is_discard());
        assert!(!Role::Body.is_discard());
    }
}

//! Positioned text fragments as delivered by the page decoder.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in PDF page coordinates (origin bottom-left, y up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a box, normalizing swapped corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical center, used to decide whether two fragments share a row.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A contiguous run of text with uniform font attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,
    /// Font size in points (after text-matrix scaling)
    pub font_size: f32,
    /// Base font name (e.g., "Helvetica-Bold"); empty when unknown
    #[serde(default)]
    pub font_name: String,
    /// Whether the font appears to be bold
    #[serde(default)]
    pub bold: bool,
    /// Whether the font appears to be italic
    #[serde(default)]
    pub italic: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Position on the page
    pub bbox: BoundingBox,
}

impl TextFragment {
    /// Create a regular-weight fragment.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_name: String::new(),
            bold: false,
            italic: false,
            page,
            bbox,
        }
    }

    /// Set the font name, deriving bold/italic from it.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        let (bold, italic) = style_from_font_name(&self.font_name);
        self.bold = bold;
        self.italic = italic;
        self
    }

    /// Force the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Force the italic flag.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

/// Infer (bold, italic) from a PostScript font name.
///
/// Subset prefixes such as `ABCDEF+` are ignored by the substring test.
pub fn style_from_font_name(font_name: &str) -> (bool, bool) {
    let lower = font_name.to_lowercase();
    let bold = ["bold", "black", "heavy", "demi", "semibold"]
        .iter()
        .any(|k| lower.contains(k));
    let italic = lower.contains("italic") || lower.contains("oblique");
    (bold, italic)
}

/// All fragments of one page, in decoder order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFragments {
    /// Page number (1-indexed)
    pub number: u32,
    /// Fragments in the order the decoder produced them
    pub fragments: Vec<TextFragment>,
}

impl PageFragments {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: Vec::new(),
        }
    }

    pub fn with_fragments(number: u32, fragments: Vec<TextFragment>) -> Self {
        Self { number, fragments }
    }

    pub fn push(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// The decoder's view of a whole document: pages in ascending order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentDocument {
    pub pages: Vec<PageFragments>,
}

impl FragmentDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: PageFragments) {
        self.pages.push(page);
    }

    /// Number of pages, including pages without any text.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }

    /// True when no page carries any fragment.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.is_empty())
    }
}

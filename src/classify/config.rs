//! Classifier thresholds and policies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How to order simultaneous Title candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePolicy {
    /// Topmost candidate wins; bold breaks ties at the same height
    #[default]
    TopmostFirst,
    /// Bold candidates win; position breaks ties among them
    BoldFirst,
}

/// What the title becomes when no line qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleFallback {
    /// Empty string
    #[default]
    Empty,
    /// Derived from the input file name
    FileName,
}

/// Thresholds used by the normalizer, profiler and assigner.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Font sizes are snapped to multiples of this many points
    pub size_precision: f32,

    /// Heading sizes closer than this are ordered by weight and indent
    pub size_epsilon: f32,

    /// Vertical tolerance for sharing a row, as a fraction of font size
    pub line_tolerance: f32,

    /// Horizontal gap that splits a row, as a fraction of font size
    pub word_gap: f32,

    /// Repetition on more than this fraction of pages marks a running header
    pub repeat_fraction: f32,

    /// Minimum number of pages a running header must appear on
    pub min_repeat_pages: u32,

    /// Vertical bucket size in points for repeated-line positions
    pub position_tolerance: f32,

    /// Lines with more characters are never headings. Counts every
    /// character of the trimmed text, spaces included.
    pub max_heading_chars: usize,

    /// Lines with fewer characters are never headings, counted the same
    /// way as `max_heading_chars`
    pub min_heading_chars: usize,

    /// Discard URLs, copyright lines, dates and similar page furniture
    pub reject_boilerplate: bool,

    /// Tie-break order for Title candidates
    pub title_policy: TitlePolicy,

    /// Title size must not appear outside the first page
    pub exclusive_title_size: bool,

    /// Title used when none is detected
    pub title_fallback: TitleFallback,

    /// Drop an entry identical to the one right before it
    pub collapse_adjacent_duplicates: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            size_precision: 0.5,
            size_epsilon: 0.5,
            line_tolerance: 0.3,
            word_gap: 3.0,
            repeat_fraction: 0.5,
            min_repeat_pages: 2,
            position_tolerance: 3.0,
            max_heading_chars: 120,
            min_heading_chars: 2,
            reject_boilerplate: true,
            title_policy: TitlePolicy::TopmostFirst,
            exclusive_title_size: true,
            title_fallback: TitleFallback::Empty,
            collapse_adjacent_duplicates: false,
        }
    }
}

impl ClassifierConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the size quantization step.
    pub fn with_size_precision(mut self, points: f32) -> Self {
        self.size_precision = points;
        self
    }

    /// Set the closeness threshold for weight/indent tie-breaks.
    pub fn with_size_epsilon(mut self, points: f32) -> Self {
        self.size_epsilon = points;
        self
    }

    /// Set the running-header repetition fraction.
    pub fn with_repeat_fraction(mut self, fraction: f32) -> Self {
        self.repeat_fraction = fraction;
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the minimum heading length.
    pub fn with_min_heading_chars(mut self, chars: usize) -> Self {
        self.min_heading_chars = chars;
        self
    }

    /// Enable or disable boilerplate rejection.
    pub fn with_boilerplate_rejection(mut self, reject: bool) -> Self {
        self.reject_boilerplate = reject;
        self
    }

    /// Set the Title tie-break policy.
    pub fn with_title_policy(mut self, policy: TitlePolicy) -> Self {
        self.title_policy = policy;
        self
    }

    /// Require the Title size to be unique to the first page.
    pub fn with_exclusive_title_size(mut self, exclusive: bool) -> Self {
        self.exclusive_title_size = exclusive;
        self
    }

    /// Set the Title fallback.
    pub fn with_title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.title_fallback = fallback;
        self
    }

    /// Collapse adjacent duplicate outline entries.
    pub fn with_collapse_duplicates(mut self, collapse: bool) -> Self {
        self.collapse_adjacent_duplicates = collapse;
        self
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("size_precision", self.size_precision),
            ("line_tolerance", self.line_tolerance),
            ("word_gap", self.word_gap),
            ("position_tolerance", self.position_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.size_epsilon.is_finite() && self.size_epsilon >= 0.0) {
            return Err(Error::Config(format!(
                "size_epsilon must be non-negative, got {}",
                self.size_epsilon
            )));
        }
        if !(self.repeat_fraction > 0.0 && self.repeat_fraction < 1.0) {
            return Err(Error::Config(format!(
                "repeat_fraction must be in (0, 1), got {}",
                self.repeat_fraction
            )));
        }
        if self.min_heading_chars > self.max_heading_chars {
            return Err(Error::Config(format!(
                "min_heading_chars ({}) exceeds max_heading_chars ({})",
                self.min_heading_chars, self.max_heading_chars
            )));
        }
        Ok(())
    }

    /// Snap a font size to the quantization grid.
    pub fn size_key(&self, size: f32) -> i32 {
        (size / self.size_precision).round() as i32
    }

    /// The font size a grid key stands for.
    pub fn key_size(&self, key: i32) -> f32 {
        key as f32 * self.size_precision
    }
}

//! Noise rejection: page numbers, running headers, implausible lengths
//! and page furniture.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

use crate::model::{DiscardReason, Line};

use super::ClassifierConfig;

/// Document-wide noise detector.
///
/// Built once from all lines of a document so that running headers and
/// footers can be recognized by their repetition across pages.
pub struct NoiseFilter<'a> {
    config: &'a ClassifierConfig,
    total_pages: usize,
    positions: HashMap<(String, i64), BTreeSet<u32>>,
    page_number: Regex,
    page_label: Regex,
    roman_numeral: Regex,
    url: Regex,
    copyright: Regex,
    date: Regex,
    continued: Regex,
    punctuation: Regex,
}

impl<'a> NoiseFilter<'a> {
    /// Index `lines` by text and vertical bucket.
    ///
    /// `total_pages` counts every page of the document, including pages
    /// without text.
    pub fn new(lines: &[Line], total_pages: usize, config: &'a ClassifierConfig) -> Self {
        let mut positions: HashMap<(String, i64), BTreeSet<u32>> = HashMap::new();
        for line in lines {
            positions
                .entry((line.text.clone(), bucket(line, config)))
                .or_default()
                .insert(line.page);
        }

        Self {
            config,
            total_pages,
            positions,
            page_number: Regex::new(r"^[-–—]?\s*\d+(\.\d+)*\s*[-–—]?$").expect("static pattern"),
            page_label: Regex::new(r"(?i)^(page|pg\.?)\s*\d+(\s*(of|/)\s*\d+)?$").expect("static pattern"),
            roman_numeral: Regex::new(r"(?i)^m{0,4}(cm|cd|d?c{0,3})(xc|xl|l?x{0,3})(ix|iv|v?i{0,3})\.?$").expect("static pattern"),
            url: Regex::new(r"(?i)(https?://|www\.)").expect("static pattern"),
            copyright: Regex::new(r"(?i)(copyright|©)").expect("static pattern"),
            date: Regex::new(r"^(\d{1,2}\s+[A-Za-z]{3,}\.?\s+\d{4}|[A-Za-z]{3,}\.?\s+\d{1,2},?\s+\d{4})$")
                .expect("static pattern"),
            continued: Regex::new(r"(?i)^\(continued\)$").expect("static pattern"),
            punctuation: Regex::new(r"^[\W_]+$").expect("static pattern"),
        }
    }

    /// Why `line` must be discarded, if it must.
    pub fn check(&self, line: &Line) -> Option<DiscardReason> {
        let text = line.text.trim();

        if self.page_number.is_match(text) || self.page_label.is_match(text) {
            return Some(DiscardReason::PageNumber);
        }
        if self.is_running(line) {
            return Some(DiscardReason::RunningHeader);
        }
        let len = line.text_len();
        if len > self.config.max_heading_chars {
            return Some(DiscardReason::TooLong);
        }
        if len < self.config.min_heading_chars {
            return Some(DiscardReason::TooShort);
        }
        if self.config.reject_boilerplate {
            if self.roman_numeral.is_match(text) {
                return Some(DiscardReason::PageNumber);
            }
            if self.url.is_match(text)
                || self.copyright.is_match(text)
                || self.date.is_match(text)
                || self.continued.is_match(text)
                || self.punctuation.is_match(text)
            {
                return Some(DiscardReason::Boilerplate);
            }
        }
        None
    }

    /// Number of distinct pages showing this text at about this height.
    pub fn repeat_count(&self, line: &Line) -> usize {
        let b = bucket(line, self.config);
        let mut pages = BTreeSet::new();
        for neighbour in [b - 1, b, b + 1] {
            if let Some(found) = self.positions.get(&(line.text.clone(), neighbour)) {
                pages.extend(found.iter().copied());
            }
        }
        pages.len()
    }

    fn is_running(&self, line: &Line) -> bool {
        let count = self.repeat_count(line);
        count >= self.config.min_repeat_pages as usize
            && count as f32 > self.config.repeat_fraction * self.total_pages as f32
    }
}

fn bucket(line: &Line, config: &ClassifierConfig) -> i64 {
    (line.bbox.center_y() / config.position_tolerance).floor() as i64
}

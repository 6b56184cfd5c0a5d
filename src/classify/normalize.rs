//! Fragment normalization: decoder fragments to logical lines.
//!
//! Fragments are grouped into rows by vertical position, each row is split
//! wherever the font size changes or a wide horizontal gap opens, and each
//! resulting run becomes one [`Line`]. Empty and whitespace-only fragments
//! are dropped before grouping.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use crate::model::{FragmentDocument, Line, TextFragment};

use super::ClassifierConfig;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Normalize every page of a document, pages in ascending order.
pub fn normalize_document(doc: &FragmentDocument, config: &ClassifierConfig) -> Vec<Line> {
    let mut pages: Vec<_> = doc.pages.iter().collect();
    pages.sort_by_key(|p| p.number);

    let mut lines = Vec::new();
    for page in pages {
        let page_lines = normalize_page(&page.fragments, config);
        log::trace!(
            "page {}: {} fragments -> {} lines",
            page.number,
            page.fragments.len(),
            page_lines.len()
        );
        lines.extend(page_lines);
    }
    lines
}

/// Normalize the fragments of a single page into lines in reading order.
///
/// An empty page yields no lines.
pub fn normalize_page(fragments: &[TextFragment], config: &ClassifierConfig) -> Vec<Line> {
    let mut frags: Vec<TextFragment> = fragments
        .iter()
        .filter(|f| f.font_size.is_finite() && f.font_size > 0.0)
        .filter_map(|f| {
            let text = clean_text(&f.text);
            if text.trim().is_empty() {
                None
            } else {
                Some(TextFragment { text, ..f.clone() })
            }
        })
        .collect();

    if frags.is_empty() {
        return vec![];
    }

    // Top to bottom (PDF y grows upward), then left to right
    frags.sort_by(|a, b| {
        b.bbox
            .center_y()
            .partial_cmp(&a.bbox.center_y())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
    });

    let mut lines = Vec::new();
    for row in group_rows(frags, config) {
        for run in split_row(row, config) {
            if let Some(line) = build_line(run) {
                lines.push(line);
            }
        }
    }
    lines
}

/// Group vertically sorted fragments into rows.
fn group_rows(frags: Vec<TextFragment>, config: &ClassifierConfig) -> Vec<Vec<TextFragment>> {
    let mut rows: Vec<Vec<TextFragment>> = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut anchor: Option<(f32, f32)> = None; // (center y, font size)

    for frag in frags {
        let center = frag.bbox.center_y();
        match anchor {
            Some((y, size)) => {
                let tolerance = size.max(frag.font_size) * config.line_tolerance;
                if (center - y).abs() <= tolerance {
                    current.push(frag);
                } else {
                    rows.push(std::mem::take(&mut current));
                    anchor = Some((center, frag.font_size));
                    current.push(frag);
                }
            }
            None => {
                anchor = Some((center, frag.font_size));
                current.push(frag);
            }
        }
    }

    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

/// Split a row into runs of equal font size with no wide gaps.
fn split_row(mut row: Vec<TextFragment>, config: &ClassifierConfig) -> Vec<Vec<TextFragment>> {
    row.sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal));

    let mut runs: Vec<Vec<TextFragment>> = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();

    for frag in row {
        if let Some(prev) = current.last() {
            let same_size = config.size_key(prev.font_size) == config.size_key(frag.font_size);
            let gap = frag.bbox.x0 - prev.bbox.x1;
            let max_gap = prev.font_size.max(frag.font_size) * config.word_gap;
            if !same_size || gap > max_gap {
                runs.push(std::mem::take(&mut current));
            }
        }
        current.push(frag);
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn build_line(run: Vec<TextFragment>) -> Option<Line> {
    let first = run.first()?;
    let text = join_fragments(&run);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let font_size = run.iter().map(|f| f.font_size).fold(0.0_f32, f32::max);
    let bbox = run
        .iter()
        .skip(1)
        .fold(first.bbox, |acc, f| acc.union(&f.bbox));

    let total_chars: usize = run.iter().map(|f| f.text.chars().count()).sum();
    let bold_chars: usize = run
        .iter()
        .filter(|f| f.bold)
        .map(|f| f.text.chars().count())
        .sum();
    let bold = total_chars > 0 && bold_chars * 2 > total_chars;

    Some(Line::new(text, font_size, bold, first.page, bbox))
}

/// Concatenate fragment texts left to right, inserting a space where the
/// horizontal gap is wider than a fifth of a glyph.
fn join_fragments(run: &[TextFragment]) -> String {
    let mut result = String::new();

    for (i, frag) in run.iter().enumerate() {
        if i == 0 {
            result.push_str(&frag.text);
            continue;
        }

        let prev = &run[i - 1];
        let gap = frag.bbox.x0 - prev.bbox.x1;

        let char_count = frag.text.chars().count();
        let avg_char_width = if char_count > 0 && frag.bbox.width() > 0.0 {
            frag.bbox.width() / char_count as f32
        } else {
            frag.font_size * 0.5
        };

        let prev_cjk = prev
            .text
            .chars()
            .last()
            .map(is_spaceless_script_char)
            .unwrap_or(false);
        let curr_cjk = frag
            .text
            .chars()
            .next()
            .map(is_spaceless_script_char)
            .unwrap_or(false);

        let needs_space = gap > avg_char_width * 0.2
            && !(prev_cjk && curr_cjk)
            && !result.ends_with(char::is_whitespace)
            && !frag.text.starts_with(char::is_whitespace);

        if needs_space {
            result.push(' ');
        }
        result.push_str(&frag.text);
    }

    result
}

/// NFC-normalize, expand ligatures and collapse internal whitespace runs.
fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for c in text.nfc() {
        if let Some((_, expansion)) = LIGATURES.iter().find(|(lig, _)| *lig == c) {
            out.push_str(expansion);
            last_space = false;
        } else if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

/// Scripts that do not separate words with spaces (Chinese, Japanese).
/// Hangul is excluded: Korean uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, PageFragments};

    fn frag(text: &str, size: f32, x: f32, y: f32) -> TextFragment {
        let width = text.chars().count() as f32 * size * 0.5;
        TextFragment::new(text, size, 1, BoundingBox::new(x, y, x + width, y + size))
    }

    #[test]
    fn test_empty_page_yields_no_lines() {
        let config = ClassifierConfig::default();
        assert!(normalize_page(&[], &config).is_empty());
        let blanks = vec![frag("   ", 12.0, 72.0, 700.0), frag("", 12.0, 90.0, 700.0)];
        assert!(normalize_page(&blanks, &config).is_empty());
    }

    #[test]
    fn test_split_heading_is_merged() {
        let config = ClassifierConfig::default();
        // "Intro" + "duction" kerned apart by less than a glyph
        let a = frag("Intro", 18.0, 72.0, 700.0);
        let b = frag("duction", 18.0, a.bbox.x1 + 0.5, 700.5);
        let lines = normalize_page(&[b, a], &config);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Introduction");
        assert_eq!(lines[0].font_size, 18.0);
    }

    #[test]
    fn test_word_gap_inserts_space() {
        let config = ClassifierConfig::default();
        let a = frag("Annual", 24.0, 72.0, 700.0);
        let b = frag("Report", 24.0, a.bbox.x1 + 8.0, 700.0);
        let lines = normalize_page(&[a, b], &config);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Annual Report");
    }

    #[test]
    fn test_size_change_splits_row() {
        let config = ClassifierConfig::default();
        let a = frag("1", 18.0, 72.0, 700.0);
        let b = frag("body text", 12.0, a.bbox.x1 + 2.0, 702.0);
        let lines = normalize_page(&[a, b], &config);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "1");
        assert_eq!(lines[1].text, "body text");
    }

    #[test]
    fn test_wide_gap_splits_row() {
        let config = ClassifierConfig::default();
        let header = frag("Company Report", 10.0, 72.0, 760.0);
        let number = frag("7", 10.0, 520.0, 760.0);
        let lines = normalize_page(&[header, number], &config);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Company Report", "7"]);
    }

    #[test]
    fn test_rows_are_top_to_bottom() {
        let config = ClassifierConfig::default();
        let low = frag("second", 12.0, 72.0, 600.0);
        let high = frag("first", 12.0, 72.0, 700.0);
        let lines = normalize_page(&[low, high], &config);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn test_majority_bold() {
        let config = ClassifierConfig::default();
        let a = frag("Chapter", 14.0, 72.0, 700.0).with_bold(true);
        let b = frag("1", 14.0, a.bbox.x1 + 4.0, 700.0);
        let lines = normalize_page(&[a, b], &config);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].bold);
    }

    #[test]
    fn test_trim_and_ligatures() {
        let config = ClassifierConfig::default();
        let lines = normalize_page(&[frag("  \u{FB01}nal   report  ", 12.0, 72.0, 700.0)], &config);
        assert_eq!(lines[0].text, "final report");
    }

    #[test]
    fn test_cjk_no_space() {
        let config = ClassifierConfig::default();
        let a = frag("概要", 16.0, 72.0, 700.0);
        let b = frag("説明", 16.0, a.bbox.x1 + 4.0, 700.0);
        let lines = normalize_page(&[a, b], &config);
        assert_eq!(lines[0].text, "概要説明");
    }

    #[test]
    fn test_document_pages_in_order() {
        let config = ClassifierConfig::default();
        let mut doc = FragmentDocument::new();
        let mut p2 = PageFragments::new(2);
        p2.push(TextFragment { page: 2, ..frag("two", 12.0, 72.0, 700.0) });
        let mut p1 = PageFragments::new(1);
        p1.push(frag("one", 12.0, 72.0, 700.0));
        doc.add_page(p2);
        doc.add_page(p1);

        let lines = normalize_document(&doc, &config);
        let pages: Vec<_> = lines.iter().map(|l| l.page).collect();
        assert_eq!(pages, vec![1, 2]);
    }
}

//! Projection of classified lines onto the outline record.

use std::path::Path;

use crate::model::{ClassifiedLine, OutlineEntry, OutlineResult, Role};

use super::{ClassifierConfig, TitleFallback};

/// Assemble the title and ordered outline.
///
/// Heading lines are emitted in their original order; levels are never
/// re-sorted or renumbered here.
pub fn build_outline(
    lines: &[ClassifiedLine],
    config: &ClassifierConfig,
    source: Option<&Path>,
) -> OutlineResult {
    let title = lines
        .iter()
        .find(|c| c.role == Role::Title)
        .map(|c| c.line.text.clone())
        .unwrap_or_else(|| fallback_title(config.title_fallback, source));

    let mut outline: Vec<OutlineEntry> = Vec::new();
    for classified in lines {
        let Some(level) = classified.role.heading_level() else {
            continue;
        };
        let entry = OutlineEntry::new(level, classified.line.text.clone(), classified.line.page);
        if config.collapse_adjacent_duplicates && outline.last() == Some(&entry) {
            continue;
        }
        outline.push(entry);
    }

    OutlineResult::new(title, outline)
}

fn fallback_title(fallback: TitleFallback, source: Option<&Path>) -> String {
    match (fallback, source) {
        (TitleFallback::FileName, Some(path)) => title_from_file_name(path),
        _ => String::new(),
    }
}

/// `annual_report-2024.pdf` becomes `Annual Report-2024`.
pub fn title_from_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    title_case(&stem.replace('_', " "))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out.trim().to_string()
}

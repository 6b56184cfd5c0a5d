//! Heading classification.
//!
//! The pipeline runs strictly in one direction:
//!
//! 1. [`normalize`]: fragments to lines, page by page
//! 2. [`profile`]: body size and heading-size ranking
//! 3. [`noise`] and [`assign`]: one role per line
//! 4. [`builder`]: title plus ordered outline
//!
//! Every stage is a pure function of its input, so a [`Classifier`] can be
//! shared freely across threads.

pub mod assign;
pub mod builder;
mod config;
pub mod noise;
pub mod normalize;
pub mod profile;

use std::path::Path;

pub use assign::{select_title, AssignContext, HeadingAssigner};
pub use builder::{build_outline, title_from_file_name};
pub use config::{ClassifierConfig, TitleFallback, TitlePolicy};
pub use noise::NoiseFilter;
pub use normalize::{normalize_document, normalize_page};
pub use profile::{FontProfile, SizeStats};

use crate::model::{ClassifiedLine, DiscardReason, FragmentDocument, Line, OutlineResult, Role};

/// Intermediate results of one classification run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Statistics over all lines, Title size still ranked
    pub profile: FontProfile,
    /// Font size of the Title line, if one was chosen
    pub title_size: Option<f32>,
    /// Every line with its role, in reading order
    pub lines: Vec<ClassifiedLine>,
}

impl Analysis {
    /// Count of discarded lines per reason.
    pub fn discard_counts(&self) -> Vec<(DiscardReason, usize)> {
        let mut counts: Vec<(DiscardReason, usize)> = Vec::new();
        for line in &self.lines {
            if let Role::Discard(reason) = line.role {
                match counts.iter_mut().find(|(r, _)| *r == reason) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((reason, 1)),
                }
            }
        }
        counts
    }
}

/// The classification pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a document and build its outline.
    pub fn classify(&self, doc: &FragmentDocument) -> OutlineResult {
        self.classify_named(doc, None)
    }

    /// Like [`classify`](Self::classify), with the source path available for
    /// the file-name title fallback.
    pub fn classify_named(&self, doc: &FragmentDocument, source: Option<&Path>) -> OutlineResult {
        let analysis = self.analyze(doc);
        build_outline(&analysis.lines, &self.config, source)
    }

    /// Run every stage and keep the intermediate results.
    pub fn analyze(&self, doc: &FragmentDocument) -> Analysis {
        let lines = normalize_document(doc, &self.config);
        let total_pages = total_pages(doc, &lines);
        self.analyze_lines(lines, total_pages)
    }

    /// Classify already-normalized lines in reading order.
    pub fn analyze_lines(&self, lines: Vec<Line>, total_pages: usize) -> Analysis {
        let config = &self.config;
        if lines.is_empty() {
            log::debug!("no usable lines");
        }

        let noise = NoiseFilter::new(&lines, total_pages, config);
        let discards: Vec<Option<DiscardReason>> = lines.iter().map(|l| noise.check(l)).collect();

        let profile = FontProfile::build_filtered(&lines, config, |i| discards[i].is_none());
        let title = select_title(&lines, &discards, &profile, config);
        let title_key = title.map(|i| config.size_key(lines[i].font_size));

        let ranking = match title_key {
            Some(key) => profile.without_heading(key),
            None => profile.clone(),
        };
        log::debug!(
            "{} lines over {} pages, title={:?}, levels={:?}",
            lines.len(),
            total_pages,
            title.map(|i| lines[i].text.as_str()),
            ranking.heading_sizes()
        );

        let assigner = HeadingAssigner::new(config, ranking, discards, title);
        let classified = assigner.classify_all(lines);

        Analysis {
            profile,
            title_size: title_key.map(|k| config.key_size(k)),
            lines: classified,
        }
    }
}

/// Classify a fragment document with the given thresholds.
pub fn classify_document(doc: &FragmentDocument, config: &ClassifierConfig) -> OutlineResult {
    Classifier::new(config.clone()).classify(doc)
}

fn total_pages(doc: &FragmentDocument, lines: &[Line]) -> usize {
    let mut pages: Vec<u32> = doc.pages.iter().map(|p| p.number).collect();
    pages.extend(lines.iter().map(|l| l.page));
    pages.sort_unstable();
    pages.dedup();
    pages.len()
}

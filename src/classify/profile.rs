//! Font statistics: body size and the heading-size ranking.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::Line;

use super::ClassifierConfig;

/// Per-size accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeStats {
    /// Non-whitespace characters set in this size
    pub chars: usize,
    /// Of which bold
    pub bold_chars: usize,
    /// Number of lines
    pub lines: usize,
    left_sum: f32,
}

impl SizeStats {
    fn add(&mut self, line: &Line) {
        let chars = line.char_count();
        self.chars += chars;
        if line.bold {
            self.bold_chars += chars;
        }
        self.lines += 1;
        self.left_sum += line.left();
    }

    /// Fraction of characters that are bold.
    pub fn bold_ratio(&self) -> f32 {
        if self.chars == 0 {
            0.0
        } else {
            self.bold_chars as f32 / self.chars as f32
        }
    }

    /// Mean left edge of the lines set in this size.
    pub fn mean_left(&self) -> f32 {
        if self.lines == 0 {
            0.0
        } else {
            self.left_sum / self.lines as f32
        }
    }
}

/// Document-wide font statistics.
///
/// Sizes are held as quantized keys (see [`ClassifierConfig::size_key`]).
#[derive(Debug, Clone)]
pub struct FontProfile {
    precision: f32,
    stats: BTreeMap<i32, SizeStats>,
    body_key: Option<i32>,
    /// Heading keys, rank 0 first
    ranking: Vec<i32>,
}

impl FontProfile {
    /// Profile every line; all sizes above the body size are heading sizes.
    pub fn build(lines: &[Line], config: &ClassifierConfig) -> Self {
        Self::build_filtered(lines, config, |_| true)
    }

    /// Profile every line, but rank only sizes used by at least one line
    /// for which `is_candidate(index)` holds.
    pub fn build_filtered<F>(lines: &[Line], config: &ClassifierConfig, is_candidate: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let mut stats: BTreeMap<i32, SizeStats> = BTreeMap::new();
        let mut candidate_keys = BTreeSet::new();

        for (i, line) in lines.iter().enumerate() {
            let key = config.size_key(line.font_size);
            stats.entry(key).or_default().add(line);
            if is_candidate(i) {
                candidate_keys.insert(key);
            }
        }

        // Most characters wins; ties go to the larger size
        let body_key = stats
            .iter()
            .max_by(|(ka, a), (kb, b)| a.chars.cmp(&b.chars).then(ka.cmp(kb)))
            .map(|(k, _)| *k);

        let ranking = match body_key {
            Some(body) => {
                let keys: Vec<i32> = candidate_keys.into_iter().rev().filter(|k| *k > body).collect();
                rank_heading_keys(&keys, &stats, config)
            }
            None => Vec::new(),
        };

        let profile = Self {
            precision: config.size_precision,
            stats,
            body_key,
            ranking,
        };
        log::debug!(
            "font profile: body={:?} headings={:?}",
            profile.body_size(),
            profile.heading_sizes()
        );
        profile
    }

    /// The presumed paragraph size; `None` for a document without lines.
    pub fn body_size(&self) -> Option<f32> {
        self.body_key.map(|k| self.size_of(k))
    }

    pub fn body_key(&self) -> Option<i32> {
        self.body_key
    }

    /// Heading sizes in rank order (rank 0 first).
    pub fn heading_sizes(&self) -> Vec<f32> {
        self.ranking.iter().map(|k| self.size_of(*k)).collect()
    }

    pub fn heading_keys(&self) -> &[i32] {
        &self.ranking
    }

    /// Rank of a quantized size among the heading sizes.
    pub fn rank_of_key(&self, key: i32) -> Option<usize> {
        self.ranking.iter().position(|k| *k == key)
    }

    /// Largest size observed anywhere.
    pub fn max_key(&self) -> Option<i32> {
        self.stats.keys().next_back().copied()
    }

    /// Statistics for a quantized size.
    pub fn stats(&self, key: i32) -> Option<&SizeStats> {
        self.stats.get(&key)
    }

    /// `(size, weighted character count)`, largest size first.
    pub fn size_histogram(&self) -> Vec<(f32, usize)> {
        self.stats
            .iter()
            .rev()
            .map(|(k, s)| (self.size_of(*k), s.chars))
            .collect()
    }

    /// Number of distinct sizes.
    pub fn distinct_sizes(&self) -> usize {
        self.stats.len()
    }

    /// The same profile with one size taken out of the heading ranking.
    pub fn without_heading(&self, key: i32) -> Self {
        let mut profile = self.clone();
        profile.ranking.retain(|k| *k != key);
        profile
    }

    fn size_of(&self, key: i32) -> f32 {
        key as f32 * self.precision
    }
}

/// Order heading keys by size, letting weight then indentation decide
/// within clusters spanning at most `size_epsilon` from their largest size.
fn rank_heading_keys(
    keys_desc: &[i32],
    stats: &BTreeMap<i32, SizeStats>,
    config: &ClassifierConfig,
) -> Vec<i32> {
    let mut clusters: Vec<Vec<i32>> = Vec::new();
    for &key in keys_desc {
        match clusters.last_mut() {
            Some(cluster)
                if cluster
                    .first()
                    .map(|top| config.key_size(*top) - config.key_size(key) <= config.size_epsilon)
                    .unwrap_or(false) =>
            {
                cluster.push(key);
            }
            _ => clusters.push(vec![key]),
        }
    }

    let empty = SizeStats::default();
    let mut ranking = Vec::with_capacity(keys_desc.len());
    for mut cluster in clusters {
        cluster.sort_by(|a, b| {
            let sa = stats.get(a).unwrap_or(&empty);
            let sb = stats.get(b).unwrap_or(&empty);
            sb.bold_ratio()
                .partial_cmp(&sa.bold_ratio())
                .unwrap_or(Ordering::Equal)
                .then_with(|| sa.mean_left().partial_cmp(&sb.mean_left()).unwrap_or(Ordering::Equal))
                .then_with(|| b.cmp(a))
        });
        ranking.extend(cluster);
    }
    ranking
}

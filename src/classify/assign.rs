//! Role assignment: Title, H1–H3, Body or Discard.

use std::cmp::Ordering;

use crate::model::{ClassifiedLine, DiscardReason, HeadingLevel, Line, Role};

use super::{ClassifierConfig, FontProfile, TitlePolicy};

/// Per-line context supplied while walking a document in reading order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignContext {
    /// Position of the line in the document's line sequence
    pub index: usize,
    /// Whether the line is on the document's first page with text
    pub is_first_page: bool,
    /// Whether an earlier line already took the Title role
    pub title_assigned: bool,
}

/// Pick the Title line, if any.
///
/// Candidates are non-discarded lines on the first page whose size is the
/// largest size carried by any non-discarded line, and that size must be
/// larger than the body size. With `exclusive_title_size`, the size must
/// not appear outside the first page either.
pub fn select_title(
    lines: &[Line],
    discards: &[Option<DiscardReason>],
    profile: &FontProfile,
    config: &ClassifierConfig,
) -> Option<usize> {
    let first_page = lines.first()?.page;
    let body_key = profile.body_key()?;

    let eligible = |i: &usize| discards.get(*i).map(Option::is_none).unwrap_or(true);
    let max_key = (0..lines.len())
        .filter(eligible)
        .map(|i| config.size_key(lines[i].font_size))
        .max()?;

    if max_key <= body_key {
        return None;
    }

    if config.exclusive_title_size
        && (0..lines.len())
            .filter(eligible)
            .any(|i| lines[i].page != first_page && config.size_key(lines[i].font_size) == max_key)
    {
        log::debug!("title size {} also used after page {}", config.key_size(max_key), first_page);
        return None;
    }

    let candidates: Vec<usize> = (0..lines.len())
        .filter(eligible)
        .filter(|i| lines[*i].page == first_page && config.size_key(lines[*i].font_size) == max_key)
        .collect();

    candidates.into_iter().min_by(|a, b| {
        let (la, lb) = (&lines[*a], &lines[*b]);
        let higher = lb.top().partial_cmp(&la.top()).unwrap_or(Ordering::Equal);
        let bolder = lb.bold.cmp(&la.bold);
        match config.title_policy {
            TitlePolicy::TopmostFirst => higher.then(bolder),
            TitlePolicy::BoldFirst => bolder.then(higher),
        }
        .then(a.cmp(b))
    })
}

/// Assigns a role to each line of one document.
pub struct HeadingAssigner<'a> {
    config: &'a ClassifierConfig,
    profile: FontProfile,
    discards: Vec<Option<DiscardReason>>,
    title: Option<usize>,
}

impl<'a> HeadingAssigner<'a> {
    /// `profile` must already exclude the Title size from its ranking.
    pub fn new(
        config: &'a ClassifierConfig,
        profile: FontProfile,
        discards: Vec<Option<DiscardReason>>,
        title: Option<usize>,
    ) -> Self {
        Self {
            config,
            profile,
            discards,
            title,
        }
    }

    /// Resolve the role of one line. Never fails; anything unresolved is Body.
    pub fn assign(&self, line: &Line, ctx: AssignContext) -> Role {
        if let Some(Some(reason)) = self.discards.get(ctx.index) {
            return Role::Discard(*reason);
        }

        if ctx.is_first_page && !ctx.title_assigned && self.title == Some(ctx.index) {
            return Role::Title;
        }

        match self.profile.rank_of_key(self.config.size_key(line.font_size)) {
            Some(rank) => Role::Heading(HeadingLevel::from_rank(rank)),
            None => Role::Body,
        }
    }

    /// Walk `lines` in order, threading the context through.
    pub fn classify_all(&self, lines: Vec<Line>) -> Vec<ClassifiedLine> {
        let first_page = lines.first().map(|l| l.page);
        let mut title_assigned = false;

        lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let ctx = AssignContext {
                    index,
                    is_first_page: Some(line.page) == first_page,
                    title_assigned,
                };
                let role = self.assign(&line, ctx);
                if role == Role::Title {
                    title_assigned = true;
                }
                ClassifiedLine::new(line, role)
            })
            .collect()
    }
}

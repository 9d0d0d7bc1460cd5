// src/fetch/curate.rs
use std::collections::HashSet;

use crate::fetch::normalize::{NO_LINK, REMOVED_CONTENT};
use crate::fetch::types::Article;

/// Per-provider presentation budget in headlines mode.
pub const HEADLINES_CAP: usize = 4;

/// Curation policy knobs. Headlines mode requires a link and caps each
/// provider's list; search mode only filters withdrawn entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurateOpts {
    pub require_link: bool,
    pub cap: Option<usize>,
}

impl CurateOpts {
    pub fn headlines() -> Self {
        Self {
            require_link: true,
            cap: Some(HEADLINES_CAP),
        }
    }

    pub fn search() -> Self {
        Self::default()
    }
}

/// After normalization a missing link is the sentinel, so "has a link"
/// excludes both empty strings and the sentinel.
fn has_link(article: &Article) -> bool {
    !article.link.is_empty() && article.link != NO_LINK
}

/// Filter invalid articles, apply the cap, then drop duplicate links.
/// First occurrence wins; order is otherwise stable.
pub fn curate(articles: Vec<Article>, opts: &CurateOpts) -> Vec<Article> {
    let filtered = articles
        .into_iter()
        .filter(|a| a.content != REMOVED_CONTENT)
        .filter(|a| !opts.require_link || has_link(a));
    let capped: Vec<Article> = match opts.cap {
        Some(n) => filtered.take(n).collect(),
        None => filtered.collect(),
    };

    let mut seen: HashSet<String> = HashSet::with_capacity(capped.len());
    let mut kept = Vec::with_capacity(capped.len());
    for article in capped {
        if seen.insert(article.link.clone()) {
            kept.push(article);
        }
    }
    kept
}

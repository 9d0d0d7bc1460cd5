// src/fetch/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw article as returned by an upstream provider. Field layouts differ
/// per provider; only the normalizer understands them.
pub type RawArticle = serde_json::Value;

/// The unified article representation, independent of provider origin.
/// `link` is the deduplication identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub author: String,
    pub link: String,
    pub image: Option<String>,
    pub date: String,
    pub source: String,
}

/// Query context handed to an adapter. `keyword: None` selects the
/// provider's top-headlines feed.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub keyword: Option<String>,
}

impl QueryContext {
    pub fn headlines() -> Self {
        Self { keyword: None }
    }

    pub fn search(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
        }
    }
}

/// Registry of supported providers. Iteration order, provenance labels,
/// request selectors and response keys all derive from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    Nyt,
    NewsApi,
    Gnews,
}

impl ProviderId {
    /// Registry order: also the merge order in keyword-search mode.
    pub const ALL: [ProviderId; 3] = [ProviderId::Nyt, ProviderId::NewsApi, ProviderId::Gnews];

    /// Provenance label attached to normalized articles.
    pub fn label(self) -> &'static str {
        match self {
            ProviderId::Nyt => "NYT",
            ProviderId::NewsApi => "NewsAPI",
            ProviderId::Gnews => "GNews",
        }
    }

    /// Name accepted in the `sources` query parameter.
    pub fn selector(self) -> &'static str {
        match self {
            ProviderId::Nyt => "New York Times",
            ProviderId::NewsApi => "News Api",
            ProviderId::Gnews => "Gnews",
        }
    }

    pub fn from_selector(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.selector() == s)
    }
}

/// Which providers a request fans out to. Defaults to all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSelection(BTreeSet<ProviderId>);

impl ProviderSelection {
    pub fn all() -> Self {
        Self(ProviderId::ALL.into_iter().collect())
    }

    /// Parse a comma-separated list of selector names. Unknown names are
    /// ignored; an empty or all-unknown list selects nothing.
    pub fn parse(s: &str) -> Self {
        let mut set = BTreeSet::new();
        for tok in s.split(',') {
            let tok = tok.trim();
            if tok.is_empty() {
                continue;
            }
            match ProviderId::from_selector(tok) {
                Some(id) => {
                    set.insert(id);
                }
                None => tracing::debug!(source = tok, "ignoring unknown source selector"),
            }
        }
        Self(set)
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// A provider adapter: builds its own query encoding, issues the request,
/// and returns the raw article list from its response envelope.
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Transport errors and non-2xx statuses surface as errors whose
    /// outermost message names the provider.
    async fn fetch(&self, query: &QueryContext) -> Result<Vec<RawArticle>>;

    fn id(&self) -> ProviderId;

    fn label(&self) -> &'static str {
        self.id().label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_known_selectors_and_ignores_junk() {
        let sel = ProviderSelection::parse("New York Times, Gnews, Bloomberg");
        assert!(sel.contains(ProviderId::Nyt));
        assert!(sel.contains(ProviderId::Gnews));
        assert!(!sel.contains(ProviderId::NewsApi));
    }

    #[test]
    fn empty_selection_selects_nothing() {
        let sel = ProviderSelection::parse("");
        assert!(sel.is_empty());
        for id in ProviderId::ALL {
            assert!(!sel.contains(id));
        }
    }

    #[test]
    fn default_selection_is_all_three() {
        let sel = ProviderSelection::default();
        for id in ProviderId::ALL {
            assert!(sel.contains(id));
        }
    }
}

// src/fetch/mod.rs
pub mod curate;
pub mod normalize;
pub mod providers;
pub mod types;

use anyhow::Result;
use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::fetch::curate::{curate, CurateOpts};
use crate::fetch::normalize::normalize;
use crate::fetch::providers::{gnews::GnewsProvider, newsapi::NewsApiProvider, nyt::NytProvider};
use crate::fetch::types::{
    Article, NewsProvider, ProviderId, ProviderSelection, QueryContext, RawArticle,
};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_requests_total", "Aggregation pipeline runs.");
        describe_counter!(
            "fetch_articles_total",
            "Raw articles returned by providers."
        );
        describe_counter!("fetch_kept_total", "Articles kept after curation.");
        describe_counter!(
            "fetch_dropped_total",
            "Articles dropped by curation filters or link dedup."
        );
        describe_counter!("fetch_provider_errors_total", "Provider fetch errors.");
        describe_histogram!(
            "fetch_provider_ms",
            "Provider round-trip time in milliseconds."
        );
        describe_gauge!(
            "fetch_last_run_ts",
            "Unix ts when the aggregation pipeline last ran."
        );
    });
}

/// Per-source payload for the public headlines feed.
#[derive(Debug, Default, Serialize)]
pub struct HeadlinesPayload {
    pub nyt: Vec<Article>,
    pub gnews: Vec<Article>,
    pub newsapi: Vec<Article>,
}

/// Merged, deduplicated payload for keyword search.
#[derive(Debug, Serialize)]
pub struct SearchPayload {
    pub articles: Vec<Article>,
}

/// Fan-out/fan-in orchestration over the provider registry.
pub struct Aggregator {
    providers: Vec<Arc<dyn NewsProvider>>,
}

impl Aggregator {
    /// Providers are expected in registry order; tests inject mocks here.
    pub fn new(providers: Vec<Arc<dyn NewsProvider>>) -> Self {
        Self { providers }
    }

    /// Registry wiring for the three real providers, sharing one HTTP client.
    pub fn from_config(cfg: &AppConfig, client: reqwest::Client) -> Self {
        Self::new(vec![
            Arc::new(NytProvider::new(client.clone(), cfg.nyt.clone())),
            Arc::new(NewsApiProvider::new(client.clone(), cfg.newsapi.clone())),
            Arc::new(GnewsProvider::new(client, cfg.gnews.clone())),
        ])
    }

    /// Fan out to every provider at once and join on all of them settling.
    /// Providers outside `selection` contribute an immediate empty result
    /// instead of an adapter call.
    async fn dispatch(
        &self,
        query: &QueryContext,
        selection: &ProviderSelection,
    ) -> Vec<(ProviderId, Result<Vec<RawArticle>>)> {
        let calls = self.providers.iter().map(|provider| async move {
            if !selection.contains(provider.id()) {
                return (provider.id(), Ok(Vec::new()));
            }
            (provider.id(), provider.fetch(query).await)
        });
        join_all(calls).await
    }

    /// Top-headlines mode: a fixed three-source view for the public feed.
    /// One failed leg fails the whole request with an error naming that
    /// provider; each surviving list is curated independently.
    pub async fn top_headlines(&self) -> Result<HeadlinesPayload> {
        ensure_metrics_described();
        counter!("fetch_requests_total").increment(1);

        let settled = self
            .dispatch(&QueryContext::headlines(), &ProviderSelection::all())
            .await;

        let mut payload = HeadlinesPayload::default();
        for (id, result) in settled {
            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = ?e, provider = id.label(), "provider error");
                    counter!("fetch_provider_errors_total").increment(1);
                    return Err(e);
                }
            };
            counter!("fetch_articles_total").increment(raw.len() as u64);

            let normalized: Vec<Article> =
                raw.iter().map(|a| normalize(a, id.label())).collect();
            let before = normalized.len();
            let kept = curate(normalized, &CurateOpts::headlines());
            counter!("fetch_kept_total").increment(kept.len() as u64);
            counter!("fetch_dropped_total").increment((before - kept.len()) as u64);

            match id {
                ProviderId::Nyt => payload.nyt = kept,
                ProviderId::NewsApi => payload.newsapi = kept,
                ProviderId::Gnews => payload.gnews = kept,
            }
        }

        gauge!("fetch_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
        Ok(payload)
    }

    /// Keyword-search mode: best-effort. A failed leg degrades to an empty
    /// list for that provider; the merged set is deduplicated once, in
    /// registry order.
    pub async fn search(&self, keyword: &str, selection: &ProviderSelection) -> SearchPayload {
        ensure_metrics_described();
        counter!("fetch_requests_total").increment(1);

        let settled = self.dispatch(&QueryContext::search(keyword), selection).await;

        let mut merged: Vec<Article> = Vec::new();
        for (id, result) in settled {
            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = ?e, provider = id.label(), "provider error");
                    counter!("fetch_provider_errors_total").increment(1);
                    Vec::new()
                }
            };
            counter!("fetch_articles_total").increment(raw.len() as u64);
            merged.extend(raw.iter().map(|a| normalize(a, id.label())));
        }

        let before = merged.len();
        let articles = curate(merged, &CurateOpts::search());
        counter!("fetch_kept_total").increment(articles.len() as u64);
        counter!("fetch_dropped_total").increment((before - articles.len()) as u64);
        gauge!("fetch_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        SearchPayload { articles }
    }
}

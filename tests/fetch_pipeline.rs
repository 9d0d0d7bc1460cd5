// tests/fetch_pipeline.rs
//
// Pipeline-level behavior with mock providers: fan-out over the registry,
// per-mode failure policy, selection skipping, and merged dedup.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::json;

use newswire::fetch::types::{
    NewsProvider, ProviderId, ProviderSelection, QueryContext, RawArticle,
};
use newswire::fetch::Aggregator;

struct MockProvider {
    id: ProviderId,
    articles: Vec<RawArticle>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl NewsProvider for MockProvider {
    async fn fetch(&self, _query: &QueryContext) -> Result<Vec<RawArticle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("{} API call failed", self.label());
        }
        Ok(self.articles.clone())
    }

    fn id(&self) -> ProviderId {
        self.id
    }
}

fn provider(
    id: ProviderId,
    articles: Vec<RawArticle>,
    fail: bool,
) -> (Arc<dyn NewsProvider>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mock = Arc::new(MockProvider {
        id,
        articles,
        fail,
        calls: calls.clone(),
    });
    (mock, calls)
}

fn article_json(title: &str, link: &str) -> RawArticle {
    json!({ "title": title, "content": "body text", "url": link })
}

#[tokio::test]
async fn search_tolerates_a_failing_provider() {
    let (nyt, _) = provider(ProviderId::Nyt, vec![], true);
    let (newsapi, _) = provider(
        ProviderId::NewsApi,
        vec![article_json("N1", "https://n.example/1")],
        false,
    );
    let (gnews, _) = provider(
        ProviderId::Gnews,
        vec![article_json("G1", "https://g.example/1")],
        false,
    );
    let agg = Aggregator::new(vec![nyt, newsapi, gnews]);

    let out = agg.search("storm", &ProviderSelection::all()).await;

    assert_eq!(out.articles.len(), 2);
    assert!(out.articles.iter().all(|a| a.source != "NYT"));
    assert!(out.articles.iter().any(|a| a.source == "NewsAPI"));
    assert!(out.articles.iter().any(|a| a.source == "GNews"));
}

#[tokio::test]
async fn headlines_failure_names_the_failing_provider() {
    let (nyt, _) = provider(
        ProviderId::Nyt,
        vec![article_json("N1", "https://n.example/1")],
        false,
    );
    let (newsapi, _) = provider(ProviderId::NewsApi, vec![], false);
    let (gnews, _) = provider(ProviderId::Gnews, vec![], true);
    let agg = Aggregator::new(vec![nyt, newsapi, gnews]);

    let err = agg.top_headlines().await.unwrap_err();
    assert!(
        err.to_string().contains("GNews API call failed"),
        "got: {err}"
    );
}

#[tokio::test]
async fn unselected_providers_are_never_dispatched() {
    let (nyt, nyt_calls) = provider(ProviderId::Nyt, vec![], false);
    let (newsapi, newsapi_calls) = provider(ProviderId::NewsApi, vec![], false);
    let (gnews, gnews_calls) = provider(
        ProviderId::Gnews,
        vec![article_json("G1", "https://g.example/1")],
        false,
    );
    let agg = Aggregator::new(vec![nyt, newsapi, gnews]);

    let out = agg
        .search("storm", &ProviderSelection::parse("Gnews"))
        .await;

    assert_eq!(nyt_calls.load(Ordering::SeqCst), 0);
    assert_eq!(newsapi_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gnews_calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.articles.len(), 1);
    assert_eq!(out.articles[0].source, "GNews");
}

#[tokio::test]
async fn merged_results_dedup_by_link_first_wins() {
    let shared = "https://syndicated.example/story";
    let (nyt, _) = provider(ProviderId::Nyt, vec![article_json("Original", shared)], false);
    let (newsapi, _) = provider(
        ProviderId::NewsApi,
        vec![
            article_json("Syndicated copy", shared),
            article_json("Unique", "https://n.example/2"),
        ],
        false,
    );
    let (gnews, _) = provider(ProviderId::Gnews, vec![], false);
    let agg = Aggregator::new(vec![nyt, newsapi, gnews]);

    let out = agg.search("story", &ProviderSelection::all()).await;

    assert_eq!(out.articles.len(), 2);
    assert_eq!(out.articles[0].link, shared);
    assert_eq!(out.articles[0].source, "NYT");
    assert_eq!(out.articles[1].link, "https://n.example/2");
}

#[tokio::test]
async fn headlines_are_grouped_curated_and_capped() {
    let many: Vec<RawArticle> = (0..6)
        .map(|i| article_json(&format!("N{i}"), &format!("https://n.example/{i}")))
        .collect();
    let with_removed = vec![
        json!({ "title": "[Removed]", "content": "[Removed]", "url": "https://removed.com" }),
        article_json("Kept", "https://a.example/kept"),
    ];
    let (nyt, _) = provider(ProviderId::Nyt, many, false);
    let (newsapi, _) = provider(ProviderId::NewsApi, with_removed, false);
    let (gnews, _) = provider(
        ProviderId::Gnews,
        vec![article_json("G1", "https://g.example/1")],
        false,
    );
    let agg = Aggregator::new(vec![nyt, newsapi, gnews]);

    let payload = agg.top_headlines().await.unwrap();

    assert_eq!(payload.nyt.len(), 4);
    assert_eq!(payload.nyt[0].link, "https://n.example/0");
    assert_eq!(payload.newsapi.len(), 1);
    assert_eq!(payload.newsapi[0].title, "Kept");
    assert_eq!(payload.gnews.len(), 1);
    assert!(payload.gnews[0].source == "GNews");
}

#[tokio::test]
async fn headlines_drop_articles_without_a_link() {
    let (nyt, _) = provider(
        ProviderId::Nyt,
        vec![
            json!({ "title": "No link here", "content": "body" }),
            article_json("Linked", "https://n.example/1"),
        ],
        false,
    );
    let (newsapi, _) = provider(ProviderId::NewsApi, vec![], false);
    let (gnews, _) = provider(ProviderId::Gnews, vec![], false);
    let agg = Aggregator::new(vec![nyt, newsapi, gnews]);

    let payload = agg.top_headlines().await.unwrap();
    assert_eq!(payload.nyt.len(), 1);
    assert_eq!(payload.nyt[0].title, "Linked");
}

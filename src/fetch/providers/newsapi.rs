// src/fetch/providers/newsapi.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::config::KeyedProviderConfig;
use crate::fetch::providers::{articles_at, get_json};
use crate::fetch::types::{NewsProvider, ProviderId, QueryContext, RawArticle};

/// NewsAPI aggregator. The top feed is region-scoped; search takes the
/// keyword alone. Articles arrive under a top-level `articles` array.
pub struct NewsApiProvider {
    client: reqwest::Client,
    cfg: KeyedProviderConfig,
}

impl NewsApiProvider {
    pub fn new(client: reqwest::Client, cfg: KeyedProviderConfig) -> Self {
        Self { client, cfg }
    }

    pub fn top_params(&self) -> Vec<(String, String)> {
        vec![
            ("country".to_string(), "us".to_string()),
            ("apiKey".to_string(), self.cfg.api_key.clone()),
        ]
    }

    pub fn search_params(&self, keyword: &str) -> Vec<(String, String)> {
        vec![
            ("q".to_string(), keyword.to_string()),
            ("apiKey".to_string(), self.cfg.api_key.clone()),
        ]
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn fetch(&self, query: &QueryContext) -> Result<Vec<RawArticle>> {
        let body = match query.keyword.as_deref() {
            Some(keyword) => {
                get_json(
                    &self.client,
                    self.label(),
                    &self.cfg.search_url,
                    &self.search_params(keyword),
                )
                .await?
            }
            None => {
                get_json(
                    &self.client,
                    self.label(),
                    &self.cfg.top_url,
                    &self.top_params(),
                )
                .await?
            }
        };
        Ok(articles_at(&body, &["articles"]))
    }

    fn id(&self) -> ProviderId {
        ProviderId::NewsApi
    }
}

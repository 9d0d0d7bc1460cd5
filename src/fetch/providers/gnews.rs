// src/fetch/providers/gnews.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::config::KeyedProviderConfig;
use crate::fetch::providers::{articles_at, get_json};
use crate::fetch::types::{NewsProvider, ProviderId, QueryContext, RawArticle};

/// GNews aggregator. Both feeds pin language and region and cap results
/// at ten; articles arrive under a top-level `articles` array.
pub struct GnewsProvider {
    client: reqwest::Client,
    cfg: KeyedProviderConfig,
}

impl GnewsProvider {
    pub fn new(client: reqwest::Client, cfg: KeyedProviderConfig) -> Self {
        Self { client, cfg }
    }

    pub fn top_params(&self) -> Vec<(String, String)> {
        vec![
            ("category".to_string(), "general".to_string()),
            ("lang".to_string(), "en".to_string()),
            ("country".to_string(), "us".to_string()),
            ("max".to_string(), "10".to_string()),
            ("apikey".to_string(), self.cfg.api_key.clone()),
        ]
    }

    pub fn search_params(&self, keyword: &str) -> Vec<(String, String)> {
        vec![
            ("q".to_string(), keyword.to_string()),
            ("lang".to_string(), "en".to_string()),
            ("country".to_string(), "us".to_string()),
            ("max".to_string(), "10".to_string()),
            ("apikey".to_string(), self.cfg.api_key.clone()),
        ]
    }
}

#[async_trait]
impl NewsProvider for GnewsProvider {
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
        ProviderId::Gnews
    }
}

// src/fetch/providers/nyt.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::config::NytConfig;
use crate::fetch::providers::{articles_at, get_json};
use crate::fetch::types::{NewsProvider, ProviderId, QueryContext, RawArticle};

/// Archive provider. Top stories arrive under `results`; keyword search
/// nests documents under `response.docs`.
pub struct NytProvider {
    client: reqwest::Client,
    cfg: NytConfig,
}

impl NytProvider {
    pub fn new(client: reqwest::Client, cfg: NytConfig) -> Self {
        Self { client, cfg }
    }

    /// The top feed authenticates through a single key/value pair whose
    /// parameter name is itself configuration.
    pub fn top_params(&self) -> Vec<(String, String)> {
        vec![(self.cfg.key_param.clone(), self.cfg.api_key.clone())]
    }

    pub fn search_params(&self, keyword: &str) -> Vec<(String, String)> {
        vec![
            ("q".to_string(), keyword.to_string()),
            ("api-key".to_string(), self.cfg.api_key.clone()),
        ]
    }
}

#[async_trait]
impl NewsProvider for NytProvider {
    async fn fetch(&self, query: &QueryContext) -> Result<Vec<RawArticle>> {
        match query.keyword.as_deref() {
            Some(keyword) => {
                let body = get_json(
                    &self.client,
                    self.label(),
                    &self.cfg.search_url,
                    &self.search_params(keyword),
                )
                .await?;
                Ok(articles_at(&body, &["response", "docs"]))
            }
            None => {
                let body = get_json(
                    &self.client,
                    self.label(),
                    &self.cfg.top_url,
                    &self.top_params(),
                )
                .await?;
                Ok(articles_at(&body, &["results"]))
            }
        }
    }

    fn id(&self) -> ProviderId {
        ProviderId::Nyt
    }
}

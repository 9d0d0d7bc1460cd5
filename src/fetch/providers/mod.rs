// src/fetch/providers/mod.rs
pub mod gnews;
pub mod newsapi;
pub mod nyt;

use anyhow::{anyhow, Context, Result};
use metrics::histogram;
use serde_json::Value;

use crate::fetch::types::RawArticle;

/// GET `url` with `params`, expecting a JSON body. Transport errors and
/// non-2xx statuses surface as errors whose outermost message names the
/// provider.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    label: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<Value> {
    let t0 = std::time::Instant::now();
    let resp = client
        .get(url)
        .query(params)
        .send()
        .await
        .with_context(|| format!("{label} API call failed"))?;
    if !resp.status().is_success() {
        tracing::warn!(
            status = %resp.status(),
            provider = label,
            "provider returned non-success status"
        );
        return Err(anyhow!("{label} API call failed"));
    }
    let body = resp
        .json::<Value>()
        .await
        .with_context(|| format!("decoding {label} response body"))?;
    histogram!("fetch_provider_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    Ok(body)
}

/// Walk `path` into the response envelope and return the article array.
/// An envelope missing the field (or carrying a non-array there) yields an
/// empty list, not a parse failure.
pub(crate) fn articles_at(body: &Value, path: &[&str]) -> Vec<RawArticle> {
    let mut cur = body;
    for key in path {
        match cur.get(key) {
            Some(v) => cur = v,
            None => return Vec::new(),
        }
    }
    cur.as_array().cloned().unwrap_or_default()
}

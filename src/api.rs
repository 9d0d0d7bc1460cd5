use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, Request, State},
    http::{header::ORIGIN, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::fetch::types::ProviderSelection;
use crate::fetch::Aggregator;
use crate::rate_limit::{client_key, FixedWindowLimiter};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub allowed_origins: Arc<Vec<String>>,
    pub cache: Arc<ResponseCache>,
    pub limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(cfg: &AppConfig, aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            allowed_origins: Arc::new(cfg.allowed_origins.clone()),
            cache: Arc::new(ResponseCache::new(Duration::from_secs(cfg.cache_ttl_secs))),
            limiter: Arc::new(FixedWindowLimiter::new(
                cfg.rate_limit_max,
                Duration::from_secs(cfg.rate_limit_window_secs),
            )),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api", get(top_headlines))
        .route("/keyword", get(keyword_search))
        .fallback_service(ServeDir::new("public"))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_mw))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn rate_limit_mw(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    if !state.limiter.check(&key) {
        counter!("rate_limited_total").increment(1);
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please try again later.",
        );
    }
    next.run(req).await
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// The origin gate runs before any cache lookup or provider dispatch.
fn check_origin(headers: &HeaderMap, allowed: &[String]) -> Result<(), Response> {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    match origin {
        Some(o) if allowed.iter().any(|a| a == o) => Ok(()),
        other => {
            let shown = other.unwrap_or("unknown");
            Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("Unsupported origin: {shown}"),
            ))
        }
    }
}

fn json_bytes_response(bytes: Vec<u8>, cache_state: &'static str) -> Response {
    (
        [("content-type", "application/json"), ("x-cache", cache_state)],
        bytes,
    )
        .into_response()
}

/// `GET /api` — the public three-source headlines feed. Responses are
/// cached by path+query for the configured TTL; only 200s are stored.
async fn top_headlines(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    if let Err(resp) = check_origin(&headers, &state.allowed_origins) {
        return resp;
    }

    let route = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    if let Some(bytes) = state.cache.get(&route) {
        return json_bytes_response(bytes, "HIT");
    }

    match state.aggregator.top_headlines().await {
        Ok(payload) => match serde_json::to_vec(&payload) {
            Ok(bytes) => {
                state.cache.put(&route, bytes.clone());
                json_bytes_response(bytes, "MISS")
            }
            Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        },
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

#[derive(Debug, serde::Deserialize)]
struct SearchParams {
    keyword: Option<String>,
    sources: Option<String>,
}

/// `GET /keyword` — best-effort merged search across the selected sources.
async fn keyword_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    if let Err(resp) = check_origin(&headers, &state.allowed_origins) {
        return resp;
    }

    let Some(keyword) = params.keyword.filter(|k| !k.trim().is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "keyword query parameter is required",
        );
    };

    let selection = params
        .sources
        .as_deref()
        .map(ProviderSelection::parse)
        .unwrap_or_default();

    let payload = state.aggregator.search(&keyword, &selection).await;
    Json(payload).into_response()
}

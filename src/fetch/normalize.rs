// src/fetch/normalize.rs
//
// Maps one raw provider article onto the canonical schema. Pure, no I/O,
// total: any missing or malformed field resolves to its sentinel.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::fetch::types::{Article, RawArticle};

pub const NO_TITLE: &str = "No Title Available";
pub const NO_CONTENT: &str = "No Content Available";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_LINK: &str = "There is no link";
pub const INVALID_DATE: &str = "Invalid Date";

/// Upstream marker for withdrawn articles; the curator drops these.
pub const REMOVED_CONTENT: &str = "[Removed]";

/// Host the archive provider serves embedded media from. Its multimedia
/// entries carry host-relative paths that need this prefix.
pub const NYT_STATIC_HOST: &str = "https://static01.nyt.com/";

/// One step in a field fallback chain.
#[derive(Debug, Clone, Copy)]
enum Accessor {
    /// Top-level string field.
    Field(&'static str),
    /// One-level nested string field, e.g. `headline.main`.
    Nested(&'static str, &'static str),
}

use Accessor::{Field, Nested};

const TITLE_CHAIN: &[Accessor] = &[Nested("headline", "main"), Field("title")];
const CONTENT_CHAIN: &[Accessor] = &[Field("abstract"), Field("content"), Field("description")];
const AUTHOR_CHAIN: &[Accessor] = &[
    Nested("byline", "original"),
    Field("author"),
    Field("author_name"),
];
const LINK_CHAIN: &[Accessor] = &[Field("url"), Field("web_url"), Field("link")];
const DATE_CHAIN: &[Accessor] = &[
    Field("published_date"),
    Field("publishedAt"),
    Field("pub_date"),
    Field("date"),
];

fn lookup(raw: &Value, acc: Accessor) -> Option<&str> {
    let v = match acc {
        Field(key) => raw.get(key)?,
        Nested(outer, inner) => raw.get(outer)?.get(inner)?,
    };
    v.as_str()
}

/// First non-empty string along the chain.
fn resolve(raw: &Value, chain: &[Accessor]) -> Option<String> {
    chain.iter().find_map(|acc| {
        lookup(raw, *acc)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    })
}

/// Normalize one raw provider article. The `label` argument always wins as
/// the article's provenance tag; source fields embedded in the raw payload
/// are not trusted.
pub fn normalize(raw: &RawArticle, label: &str) -> Article {
    Article {
        title: resolve(raw, TITLE_CHAIN).unwrap_or_else(|| NO_TITLE.to_string()),
        content: resolve(raw, CONTENT_CHAIN).unwrap_or_else(|| NO_CONTENT.to_string()),
        author: resolve(raw, AUTHOR_CHAIN).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        link: resolve(raw, LINK_CHAIN).unwrap_or_else(|| NO_LINK.to_string()),
        image: resolve_image(raw),
        date: match resolve(raw, DATE_CHAIN) {
            Some(ts) => format_long_date(&ts),
            None => INVALID_DATE.to_string(),
        },
        source: label.to_string(),
    }
}

/// Image priority: direct `urlToImage`, then `image`, then the first
/// `multimedia` entry. Multimedia URLs are host-relative unless they
/// already carry the static host. `None` means "no image" — distinct from
/// fields that are present but empty.
fn resolve_image(raw: &Value) -> Option<String> {
    if let Some(url) = lookup(raw, Field("urlToImage")).filter(|s| !s.is_empty()) {
        return Some(url.to_string());
    }
    if let Some(url) = lookup(raw, Field("image")).filter(|s| !s.is_empty()) {
        return Some(url.to_string());
    }
    let media_url = raw
        .get("multimedia")?
        .as_array()?
        .first()?
        .get("url")?
        .as_str()?;
    if media_url.is_empty() {
        return None;
    }
    if media_url.starts_with(NYT_STATIC_HOST) {
        Some(media_url.to_string())
    } else {
        Some(format!("{NYT_STATIC_HOST}{media_url}"))
    }
}

/// `Month D, YYYY` with English month names, or the invalid-date sentinel.
pub fn format_long_date(input: &str) -> String {
    match parse_timestamp(input) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Providers disagree on timestamp formats: RFC 3339 (GNews, NewsAPI),
/// RFC 3339 with a compact offset or RFC 2822 (archive feeds), and bare
/// `YYYY-MM-DD` (archive search).
fn parse_timestamp(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = OffsetDateTime::parse(input, &Rfc2822) {
        let d = dt.date();
        return NaiveDate::from_ymd_opt(d.year(), u8::from(d.month()) as u32, d.day() as u32);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

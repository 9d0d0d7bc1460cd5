// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_ORIGINS: &str = "SUPPORTED_ORIGINS";

/// Archive provider credentials. The credential parameter name is itself
/// deployment configuration, not a constant.
#[derive(Debug, Clone)]
pub struct NytConfig {
    pub top_url: String,
    pub search_url: String,
    pub key_param: String,
    pub api_key: String,
}

/// The two aggregator providers share a shape: two endpoints plus one key.
#[derive(Debug, Clone)]
pub struct KeyedProviderConfig {
    pub top_url: String,
    pub search_url: String,
    pub api_key: String,
}

/// Full process configuration, read once at startup and injected into the
/// pipeline and adapters. No ambient globals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub nyt: NytConfig,
    pub newsapi: KeyedProviderConfig,
    pub gnews: KeyedProviderConfig,
    pub allowed_origins: Vec<String>,
    pub cache_ttl_secs: u64,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("missing required environment variable {name}"))
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .map_err(|_| anyhow!("invalid value for {name}: {v}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Read the full configuration from the process environment. Loading
    /// `.env` first is the caller's job (see `main`).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: parsed_or("PORT", 3000)?,
            nyt: NytConfig {
                top_url: required("NYT_API_URL")?,
                search_url: required("NYT_API_SEARCH_URL")?,
                key_param: required("NYT_API_NAME")?,
                api_key: required("NYT_API_KEY")?,
            },
            newsapi: KeyedProviderConfig {
                top_url: required("NEWSAPI_URL")?,
                search_url: required("NEWSAPI_SEARCH_URL")?,
                api_key: required("NEWSAPI_KEY")?,
            },
            gnews: KeyedProviderConfig {
                top_url: required("GNEWS_API_URL")?,
                search_url: required("GNEWS_API_SEARCH_URL")?,
                api_key: required("GNEWS_API_KEY")?,
            },
            allowed_origins: load_allowed_origins()?,
            cache_ttl_secs: parsed_or("CACHE_TTL_SECS", 600)?,
            rate_limit_max: parsed_or("RATE_LIMIT_MAX", 100)?,
            rate_limit_window_secs: parsed_or("RATE_LIMIT_WINDOW_SECS", 600)?,
        })
    }
}

/// Load the origin allow-list:
/// 1) $SUPPORTED_ORIGINS (comma-separated values)
/// 2) config/allowed_origins.toml
/// 3) config/allowed_origins.json
/// An empty list is valid and rejects every caller.
pub fn load_allowed_origins() -> Result<Vec<String>> {
    if let Ok(raw) = std::env::var(ENV_ORIGINS) {
        return Ok(clean_list(raw.split(',').map(str::to_string).collect()));
    }
    let toml_p = PathBuf::from("config/allowed_origins.toml");
    if toml_p.exists() {
        return load_origins_from(&toml_p);
    }
    let json_p = PathBuf::from("config/allowed_origins.json");
    if json_p.exists() {
        return load_origins_from(&json_p);
    }
    Ok(Vec::new())
}

/// Load the allow-list from an explicit path. Supports TOML or JSON.
pub fn load_origins_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading origins from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if ext == "toml" {
        return parse_toml(&content);
    }
    parse_json(&content)
        .or_else(|_| parse_toml(&content))
        .map_err(|_| anyhow!("unsupported origins format in {}", path.display()))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlOrigins {
        origins: Vec<String>,
    }
    let v: TomlOrigins = toml::from_str(s)?;
    Ok(clean_list(v.origins))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim();
        if !t.is_empty() {
            set.insert(t.to_string());
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn clean_list_trims_dedups_and_sorts() {
        let out = clean_list(vec![
            " https://b.example ".into(),
            "".into(),
            "https://a.example".into(),
            "https://a.example".into(),
        ]);
        assert_eq!(
            out,
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ]
        );
    }

    #[test]
    fn origins_files_parse_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_p = dir.path().join("allowed_origins.toml");
        fs::write(&toml_p, r#"origins = ["https://ui.example", " https://ui.example "]"#).unwrap();
        assert_eq!(
            load_origins_from(&toml_p).unwrap(),
            vec!["https://ui.example".to_string()]
        );

        let json_p = dir.path().join("allowed_origins.json");
        fs::write(&json_p, r#"["https://ui.example", "https://admin.example"]"#).unwrap();
        assert_eq!(
            load_origins_from(&json_p).unwrap(),
            vec![
                "https://admin.example".to_string(),
                "https://ui.example".to_string()
            ]
        );
    }

    #[serial_test::serial]
    #[test]
    fn env_origins_take_precedence() {
        env::set_var(ENV_ORIGINS, "https://one.example, https://two.example");
        let v = load_allowed_origins().unwrap();
        assert_eq!(
            v,
            vec![
                "https://one.example".to_string(),
                "https://two.example".to_string()
            ]
        );
        env::remove_var(ENV_ORIGINS);
    }

    #[serial_test::serial]
    #[test]
    fn from_env_names_the_missing_variable() {
        let vars = [
            ("NYT_API_URL", "https://archive.test/top"),
            ("NYT_API_SEARCH_URL", "https://archive.test/search"),
            ("NYT_API_NAME", "api-key"),
            ("NYT_API_KEY", "k1"),
            ("NEWSAPI_URL", "https://newsapi.test/top"),
            ("NEWSAPI_SEARCH_URL", "https://newsapi.test/search"),
            ("NEWSAPI_KEY", "k2"),
            ("GNEWS_API_URL", "https://gnews.test/top"),
            ("GNEWS_API_SEARCH_URL", "https://gnews.test/search"),
            ("GNEWS_API_KEY", "k3"),
        ];
        for (k, v) in vars {
            env::set_var(k, v);
        }
        env::set_var(ENV_ORIGINS, "https://ui.example");
        env::remove_var("GNEWS_API_KEY");

        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("GNEWS_API_KEY"), "got: {err}");

        env::set_var("GNEWS_API_KEY", "k3");
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.nyt.key_param, "api-key");
        assert_eq!(cfg.allowed_origins, vec!["https://ui.example".to_string()]);
        assert_eq!(cfg.cache_ttl_secs, 600);
        assert_eq!(cfg.rate_limit_max, 100);

        for (k, _) in vars {
            env::remove_var(k);
        }
        env::remove_var(ENV_ORIGINS);
    }
}

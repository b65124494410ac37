use anyhow::{Context, Result};

/// Default route prefix for the point-of-sale API.
pub const DEFAULT_API_NAMESPACE: &str = "/pos/v1";

/// Metadata key under which a store's language override is kept.
pub const DEFAULT_STORE_LANGUAGE_META_KEY: &str = "_pos_store_language";

/// Minimum supported version of the commerce-translation companion plugin.
/// Older releases predate language-aware REST listing queries.
pub const DEFAULT_MIN_COMMERCE_VERSION: &str = "4.11.0";

#[derive(Debug, Clone)]
pub struct Config {
    // Routing
    pub api_namespace: String,

    // Store metadata
    pub store_language_meta_key: String,

    // Version gates (empty string = no constraint)
    pub min_core_version: String,
    pub min_commerce_version: String,

    // Demo server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Routing
            api_namespace: std::env::var("POS_API_NAMESPACE")
                .map(|v| normalize_namespace(&v))
                .unwrap_or_else(|_| DEFAULT_API_NAMESPACE.to_string()),

            // Store metadata
            store_language_meta_key: std::env::var("POS_STORE_LANGUAGE_META_KEY")
                .unwrap_or_else(|_| DEFAULT_STORE_LANGUAGE_META_KEY.to_string()),

            // Version gates
            min_core_version: std::env::var("MULTILINGUAL_MIN_CORE_VERSION")
                .unwrap_or_default(),
            min_commerce_version: std::env::var("MULTILINGUAL_MIN_COMMERCE_VERSION")
                .unwrap_or_else(|_| DEFAULT_MIN_COMMERCE_VERSION.to_string()),

            // Demo server
            port: std::env::var("PORT")
                .ok()
                .map(|v| v.parse().context("PORT is not a valid port number"))
                .transpose()?
                .unwrap_or(8080),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_namespace: DEFAULT_API_NAMESPACE.to_string(),
            store_language_meta_key: DEFAULT_STORE_LANGUAGE_META_KEY.to_string(),
            min_core_version: String::new(),
            min_commerce_version: DEFAULT_MIN_COMMERCE_VERSION.to_string(),
            port: 8080,
        }
    }
}

/// Namespaces are matched as route prefixes; a trailing slash would make
/// every prefix check fail, so it is stripped here once.
fn normalize_namespace(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

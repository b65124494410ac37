//! Host collaborator seams.
//!
//! The bridge never talks to the content platform directly; everything it
//! needs from the host arrives through these traits. Production code binds
//! them to the real platform services, tests and the demo server bind them
//! to [`crate::memory::MemoryHost`].

use std::collections::HashMap;

use thiserror::Error;

use crate::query::{ContentType, ListingQuery};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("unknown store {0}")]
    UnknownStore(i64),

    #[error("host backend unavailable: {0}")]
    Unavailable(String),
}

/// One active language as the multilingual plugin reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub code: String,
    pub native_name: String,
    pub translated_name: String,
}

impl LanguageInfo {
    pub fn new(code: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            native_name: native_name.into(),
            translated_name: String::new(),
        }
    }

    /// Display label for a language option: native name, then translated
    /// name, then the bare code.
    pub fn label(&self) -> &str {
        if !self.native_name.is_empty() {
            &self.native_name
        } else if !self.translated_name.is_empty() {
            &self.translated_name
        } else {
            &self.code
        }
    }
}

/// The host's content query engine and metadata store.
///
/// Implementations that cache query results must honor
/// [`ListingQuery::skip_caches`].
pub trait ContentStore: Send + Sync {
    /// Run a listing query and return matching identifiers in query order.
    fn list_ids(&self, query: &ListingQuery) -> Result<Vec<i64>, HostError>;

    /// Batch-fetch GMT modification timestamps for the given identifiers,
    /// regardless of content type. Unknown identifiers are simply absent
    /// from the map.
    fn modified_times(&self, ids: &[i64]) -> Result<HashMap<i64, String>, HostError>;

    /// Read one metadata value attached to a store entity.
    fn store_meta(&self, store_id: i64, key: &str) -> Result<Option<String>, HostError>;
}

/// Store-access authorization for the current caller.
pub trait StoreAuthorizer: Send + Sync {
    fn is_authorized(&self, store_id: i64) -> bool;
}

/// Point-of-sale settings owned by the host.
pub trait PosSettings: Send + Sync {
    /// Whether the "point-of-sale-only items" mode is enabled.
    fn pos_only_mode(&self) -> bool;

    /// Identifiers flagged as online-only for the given content type.
    fn online_only_ids(&self, content_type: ContentType) -> Vec<i64>;
}

/// The multilingual plugin's capability surface.
pub trait MultilingualApi: Send + Sync {
    /// Platform-wide default language, when the plugin provides one.
    fn default_language(&self) -> Option<String>;

    /// All active languages.
    fn active_languages(&self) -> Vec<LanguageInfo>;

    /// Detected version of the core multilingual plugin.
    fn core_version(&self) -> Option<String>;

    /// Detected version of the commerce-translation companion.
    fn commerce_version(&self) -> Option<String>;
}

//! The language bridge service.
//!
//! One constructed object owns the whole integration surface: resolving an
//! effective language per request, injecting it into listing queries,
//! intercepting fast-sync listing requests, and enriching store API
//! responses. Host collaborators are injected at construction so tests can
//! substitute them.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::fastsync::{self, FastSyncContext, FastSyncRecord};
use crate::hooks::Hooks;
use crate::host::{ContentStore, HostError, MultilingualApi, PosSettings, StoreAuthorizer};
use crate::query::ListingQuery;
use crate::request::ApiRequest;
use crate::strings::{ENGLISH_STRINGS, SITE_DEFAULT_LABEL};
use crate::version;

/// Field name the store API maps to the language metadata key.
const STORE_LANGUAGE_FIELD: &str = "language";

/// An intercepted fast-sync result: the records plus the pagination totals
/// the caller surfaces as response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastSyncResponse {
    pub records: Vec<FastSyncRecord>,
    pub total: usize,
    pub total_pages: u32,
}

/// One selectable language on the store-edit screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub value: String,
    pub label: String,
}

/// Resolved UI strings for the store-edit screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditScreenText {
    pub section_label: String,
    pub title: String,
    pub description: String,
    pub help: String,
    pub default_option: String,
    pub no_languages: String,
}

/// Client-side configuration for the admin store-editing screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEditPayload {
    pub default_language: String,
    pub languages: Vec<LanguageOption>,
    pub strings: EditScreenText,
}

pub struct LanguageBridge {
    config: Config,
    hooks: Hooks,
    content: Arc<dyn ContentStore>,
    authorizer: Arc<dyn StoreAuthorizer>,
    settings: Arc<dyn PosSettings>,
    multilingual: Arc<dyn MultilingualApi>,
}

impl LanguageBridge {
    pub fn new(
        config: Config,
        hooks: Hooks,
        content: Arc<dyn ContentStore>,
        authorizer: Arc<dyn StoreAuthorizer>,
        settings: Arc<dyn PosSettings>,
        multilingual: Arc<dyn MultilingualApi>,
    ) -> Self {
        Self {
            config,
            hooks,
            content,
            authorizer,
            settings,
            multilingual,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Support gate ====================

    /// Whether the multilingual plugin is active and version-compatible.
    ///
    /// Baseline activity is a non-empty default language or a non-empty
    /// active language list; either version gate can veto, and the
    /// `supported` hook has the final word.
    pub fn is_supported(&self) -> bool {
        let default_language = self.default_language();
        let languages = self.multilingual.active_languages();
        let mut supported = !default_language.is_empty() || !languages.is_empty();

        if supported {
            let min_core = self
                .hooks
                .apply_min_core_version(self.config.min_core_version.clone());
            let detected_core = self
                .hooks
                .apply_detected_core_version(self.multilingual.core_version().unwrap_or_default());
            if version::below_minimum(&detected_core, &min_core) {
                supported = false;
            }

            let min_commerce = self
                .hooks
                .apply_min_commerce_version(self.config.min_commerce_version.clone());
            let detected_commerce = self.hooks.apply_detected_commerce_version(
                self.multilingual.commerce_version().unwrap_or_default(),
            );
            if version::below_minimum(&detected_commerce, &min_commerce) {
                supported = false;
            }
        }

        self.hooks.apply_supported(supported)
    }

    // ==================== Language resolution ====================

    /// Platform default language; empty string when the plugin provides none.
    pub fn default_language(&self) -> String {
        let language = self.multilingual.default_language().unwrap_or_default();
        self.hooks.apply_default_language(language)
    }

    /// Effective language for a request: authorized store override first,
    /// then the platform default. Always a string, possibly empty.
    pub fn resolve_request_language(&self, request: &ApiRequest) -> String {
        let store_id = request.param_i64("store_id").unwrap_or(0);

        if store_id > 0 && self.authorizer.is_authorized(store_id) {
            let store_language = self.store_language_override(store_id);
            if !store_language.is_empty() {
                return self.hooks.apply_resolved_language(store_language, request);
            }
        }

        self.hooks
            .apply_resolved_language(self.default_language(), request)
    }

    /// Store language with fallback to the platform default.
    pub fn resolve_store_language(&self, store_id: i64) -> String {
        let store_language = self.store_language_override(store_id);
        if !store_language.is_empty() {
            store_language
        } else {
            self.default_language()
        }
    }

    fn store_language_override(&self, store_id: i64) -> String {
        match self
            .content
            .store_meta(store_id, &self.config.store_language_meta_key)
        {
            Ok(meta) => meta.unwrap_or_default(),
            Err(error) => {
                warn!(store_id, %error, "store language lookup failed, using default");
                String::new()
            }
        }
    }

    // ==================== Query augmentation ====================

    /// Apply language filtering to a product listing query.
    pub fn filter_product_query(&self, query: &mut ListingQuery, request: &ApiRequest) {
        self.filter_listing_query(query, request);
    }

    /// Apply language filtering to a product variation listing query.
    pub fn filter_variation_query(&self, query: &mut ListingQuery, request: &ApiRequest) {
        self.filter_listing_query(query, request);
    }

    fn filter_listing_query(&self, query: &mut ListingQuery, request: &ApiRequest) {
        if !self.is_supported() {
            return;
        }

        if !request.in_namespace(&self.config.api_namespace) {
            return;
        }

        let language = self.resolve_request_language(request);
        query.apply_language(&language);
    }

    // ==================== Fast sync ====================

    /// Intercept a fast-sync listing request, or pass through with `None`.
    pub fn intercept_fast_sync(&self, request: &ApiRequest) -> Option<FastSyncResponse> {
        if !self.is_supported() {
            return None;
        }

        let context = fastsync::classify(request, &self.config.api_namespace)?;

        let language = self.resolve_request_language(request);
        if language.is_empty() {
            debug!(route = request.route(), "fast sync skipped, no resolved language");
            return None;
        }

        let records = match self.run_fast_sync(&context, request, &language) {
            Ok(records) => records,
            Err(error) => {
                warn!(route = request.route(), %error, "fast sync query failed, passing through");
                return None;
            }
        };

        debug!(
            route = request.route(),
            language = %language,
            count = records.len(),
            "fast sync intercepted"
        );

        let total = records.len();
        Some(FastSyncResponse {
            records,
            total,
            total_pages: 1,
        })
    }

    fn run_fast_sync(
        &self,
        context: &FastSyncContext,
        request: &ApiRequest,
        language: &str,
    ) -> Result<Vec<FastSyncRecord>, HostError> {
        let mut query = ListingQuery::ids(context.content_type);
        query.parent = context.parent_id;

        if let Some(raw) = request.param_str("modified_after") {
            query.modified_after = fastsync::parse_modified_after(raw);
        }

        let include = request.id_list("pos_include");
        if !include.is_empty() {
            query.include = include;
        }

        let exclude = request.id_list("pos_exclude");
        if !exclude.is_empty() {
            query.exclude = exclude;
        }

        if self.settings.pos_only_mode() {
            merge_excludes(
                &mut query.exclude,
                self.settings.online_only_ids(context.content_type),
            );
        }

        query.apply_language(language);

        let ids = self.content.list_ids(&query)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        if !context.with_modified_gmt {
            return Ok(ids
                .into_iter()
                .map(|id| FastSyncRecord {
                    id,
                    date_modified_gmt: None,
                })
                .collect());
        }

        let times = self.content.modified_times(&ids)?;
        Ok(ids
            .into_iter()
            .map(|id| {
                let raw = times.get(&id).map(String::as_str).unwrap_or("");
                FastSyncRecord {
                    id,
                    date_modified_gmt: Some(fastsync::format_modified_gmt(raw)),
                }
            })
            .collect())
    }

    // ==================== Store API surface ====================

    /// Add the `language` entry to the store API's field-to-metadata mapping.
    pub fn store_meta_fields(&self, fields: &mut BTreeMap<String, String>) {
        if !self.is_supported() {
            return;
        }

        fields.insert(
            STORE_LANGUAGE_FIELD.to_string(),
            self.config.store_language_meta_key.clone(),
        );
    }

    /// Inject the resolved store language into a store API response body.
    ///
    /// Applies to single records and plain lists of records under the stores
    /// route; records without an `id` and other body shapes are untouched.
    pub fn enrich_store_response(&self, request: &ApiRequest, body: &mut Value) {
        if !self.is_supported() {
            return;
        }

        if !self.is_stores_route(request) {
            return;
        }

        match body {
            Value::Array(items) => {
                for item in items {
                    self.enrich_store_record(item);
                }
            }
            Value::Object(_) => self.enrich_store_record(body),
            _ => {}
        }
    }

    fn enrich_store_record(&self, record: &mut Value) {
        let Some(id) = record.get("id").and_then(Value::as_i64) else {
            return;
        };

        let language = self.resolve_store_language(id);
        if let Value::Object(map) = record {
            map.insert(
                STORE_LANGUAGE_FIELD.to_string(),
                Value::String(language),
            );
        }
    }

    fn is_stores_route(&self, request: &ApiRequest) -> bool {
        let Some(suffix) = request
            .route()
            .strip_prefix(self.config.api_namespace.as_str())
        else {
            return false;
        };

        match suffix.strip_prefix("/stores") {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    // ==================== Store edit screen ====================

    /// Client-side configuration for the admin store-editing screen, or
    /// `None` when the integration is unsupported or no languages exist.
    pub fn store_edit_payload(&self) -> Option<StoreEditPayload> {
        if !self.is_supported() {
            return None;
        }

        let languages: Vec<LanguageOption> = self
            .multilingual
            .active_languages()
            .into_iter()
            .filter(|info| !info.code.is_empty())
            .map(|info| LanguageOption {
                label: info.label().to_string(),
                value: info.code,
            })
            .collect();

        if languages.is_empty() {
            return None;
        }

        let default_language = self.default_language();
        let default_label = if default_language.is_empty() {
            SITE_DEFAULT_LABEL
        } else {
            default_language.as_str()
        };

        let strings = EditScreenText {
            section_label: ENGLISH_STRINGS.section_label.to_string(),
            title: ENGLISH_STRINGS.title.to_string(),
            description: ENGLISH_STRINGS.description.to_string(),
            help: ENGLISH_STRINGS.help.to_string(),
            default_option: ENGLISH_STRINGS
                .default_option
                .replace("{language}", default_label),
            no_languages: ENGLISH_STRINGS.no_languages.to_string(),
        };

        Some(StoreEditPayload {
            default_language,
            languages,
            strings,
        })
    }
}

/// Union the online-only ids into the exclude set: duplicates removed, first
/// appearance order kept.
fn merge_excludes(exclude: &mut Vec<i64>, online_only: Vec<i64>) {
    let mut seen: HashSet<i64> = HashSet::new();
    exclude.retain(|id| seen.insert(*id));
    for id in online_only {
        if seen.insert(id) {
            exclude.push(id);
        }
    }
}

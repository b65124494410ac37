//! In-memory host implementation.
//!
//! `MemoryHost` stands in for the content platform behind every collaborator
//! trait: a content table, store entities with metadata, point-of-sale
//! settings and the multilingual plugin's capability surface. It backs the
//! test suite and the demo server; it is not a persistence layer.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::host::{
    ContentStore, HostError, LanguageInfo, MultilingualApi, PosSettings, StoreAuthorizer,
};
use crate::query::{ContentType, ListingQuery, SortOrder};

/// Storage format for GMT timestamps, as the host keeps them.
const GMT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub id: i64,
    pub content_type: ContentType,
    pub name: String,
    pub published: bool,
    pub parent: Option<i64>,
    pub language: String,
    pub created_gmt: DateTime<Utc>,
    pub modified_gmt: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StoreRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Default)]
struct Inner {
    content: Vec<ContentRecord>,
    stores: Vec<StoreRecord>,
    store_meta: HashMap<(i64, String), String>,
    authorized_stores: HashSet<i64>,
    pos_only_mode: bool,
    online_only: HashMap<ContentType, Vec<i64>>,
    default_language: Option<String>,
    active_languages: Vec<LanguageInfo>,
    core_version: Option<String>,
    commerce_version: Option<String>,
    backend_down: bool,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryHost {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Content seeding ====================

    /// Insert a published product. Creation timestamps advance one minute
    /// per insert so listing order is deterministic.
    pub fn add_product(&self, name: &str, language: &str) -> i64 {
        self.insert_content(ContentType::Product, name, language, None)
    }

    /// Insert a published variation under a parent product.
    pub fn add_variation(&self, parent: i64, name: &str, language: &str) -> i64 {
        self.insert_content(ContentType::ProductVariation, name, language, Some(parent))
    }

    fn insert_content(
        &self,
        content_type: ContentType,
        name: &str,
        language: &str,
        parent: Option<i64>,
    ) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner);
        let stamp = seed_time() + Duration::minutes(id);
        inner.content.push(ContentRecord {
            id,
            content_type,
            name: name.to_string(),
            published: true,
            parent,
            language: language.to_string(),
            created_gmt: stamp,
            modified_gmt: stamp,
        });
        id
    }

    /// Overwrite a record's GMT modification timestamp.
    ///
    /// # Panics
    /// Panics when `gmt` is not a `YYYY-MM-DD HH:MM:SS` timestamp; this is a
    /// seeding helper, not an ingestion path.
    pub fn set_modified(&self, id: i64, gmt: &str) {
        let modified = NaiveDateTime::parse_from_str(gmt, GMT_FORMAT)
            .expect("seed timestamp must be YYYY-MM-DD HH:MM:SS")
            .and_utc();
        let mut inner = self.inner.lock().unwrap();
        if let Some(record) = inner.content.iter_mut().find(|r| r.id == id) {
            record.modified_gmt = modified;
        }
    }

    pub fn set_published(&self, id: i64, published: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(record) = inner.content.iter_mut().find(|r| r.id == id) {
            record.published = published;
        }
    }

    // ==================== Store seeding ====================

    pub fn add_store(&self, name: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = next_id(&mut inner);
        inner.stores.push(StoreRecord {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn set_store_meta(&self, store_id: i64, key: &str, value: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .store_meta
            .insert((store_id, key.to_string()), value.to_string());
    }

    /// Grant the current caller access to a store.
    pub fn authorize_store(&self, store_id: i64) {
        self.inner.lock().unwrap().authorized_stores.insert(store_id);
    }

    pub fn stores(&self) -> Vec<StoreRecord> {
        self.inner.lock().unwrap().stores.clone()
    }

    pub fn store(&self, store_id: i64) -> Option<StoreRecord> {
        self.inner
            .lock()
            .unwrap()
            .stores
            .iter()
            .find(|s| s.id == store_id)
            .cloned()
    }

    // ==================== Settings seeding ====================

    pub fn set_pos_only_mode(&self, enabled: bool) {
        self.inner.lock().unwrap().pos_only_mode = enabled;
    }

    pub fn set_online_only(&self, content_type: ContentType, ids: Vec<i64>) {
        self.inner.lock().unwrap().online_only.insert(content_type, ids);
    }

    // ==================== Multilingual plugin seeding ====================

    pub fn set_default_language(&self, code: &str) {
        self.inner.lock().unwrap().default_language = Some(code.to_string());
    }

    pub fn add_active_language(&self, info: LanguageInfo) {
        self.inner.lock().unwrap().active_languages.push(info);
    }

    pub fn set_core_version(&self, version: &str) {
        self.inner.lock().unwrap().core_version = Some(version.to_string());
    }

    pub fn set_commerce_version(&self, version: &str) {
        self.inner.lock().unwrap().commerce_version = Some(version.to_string());
    }

    pub fn clear_commerce_version(&self) {
        self.inner.lock().unwrap().commerce_version = None;
    }

    // ==================== Failure injection ====================

    /// Make every `ContentStore` call fail, to exercise degradation paths.
    pub fn fail_backend(&self, down: bool) {
        self.inner.lock().unwrap().backend_down = down;
    }

    // ==================== Queries ====================

    /// Full records for a listing query, in query order. The host's "normal
    /// controller" path; the trait surface only exposes identifiers.
    pub fn list_records(&self, query: &ListingQuery) -> Vec<ContentRecord> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<ContentRecord> = inner
            .content
            .iter()
            .filter(|record| matches(record, query))
            .cloned()
            .collect();

        match query.order {
            SortOrder::CreatedDesc => {
                records.sort_by(|a, b| (b.created_gmt, b.id).cmp(&(a.created_gmt, a.id)))
            }
            SortOrder::CreatedAsc => {
                records.sort_by(|a, b| (a.created_gmt, a.id).cmp(&(b.created_gmt, b.id)))
            }
        }

        if query.per_page >= 0 {
            records.truncate(query.per_page as usize);
        }

        records
    }
}

fn next_id(inner: &mut Inner) -> i64 {
    inner.next_id += 1;
    inner.next_id
}

fn seed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn matches(record: &ContentRecord, query: &ListingQuery) -> bool {
    record.content_type == query.content_type
        && (!query.published_only || record.published)
        && query.parent.map_or(true, |p| record.parent == Some(p))
        && query
            .modified_after
            .map_or(true, |bound| record.modified_gmt >= bound)
        && (query.include.is_empty() || query.include.contains(&record.id))
        && !query.exclude.contains(&record.id)
        && query
            .lang
            .as_ref()
            .map_or(true, |lang| &record.language == lang)
}

impl ContentStore for MemoryHost {
    fn list_ids(&self, query: &ListingQuery) -> Result<Vec<i64>, HostError> {
        self.check_backend()?;
        Ok(self.list_records(query).into_iter().map(|r| r.id).collect())
    }

    fn modified_times(&self, ids: &[i64]) -> Result<HashMap<i64, String>, HostError> {
        self.check_backend()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .content
            .iter()
            .filter(|record| ids.contains(&record.id))
            .map(|record| (record.id, record.modified_gmt.format(GMT_FORMAT).to_string()))
            .collect())
    }

    fn store_meta(&self, store_id: i64, key: &str) -> Result<Option<String>, HostError> {
        self.check_backend()?;
        let inner = self.inner.lock().unwrap();
        if !inner.stores.iter().any(|s| s.id == store_id) {
            return Err(HostError::UnknownStore(store_id));
        }
        Ok(inner
            .store_meta
            .get(&(store_id, key.to_string()))
            .cloned())
    }
}

impl MemoryHost {
    fn check_backend(&self) -> Result<(), HostError> {
        if self.inner.lock().unwrap().backend_down {
            Err(HostError::Unavailable("backend offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl StoreAuthorizer for MemoryHost {
    fn is_authorized(&self, store_id: i64) -> bool {
        self.inner
            .lock()
            .unwrap()
            .authorized_stores
            .contains(&store_id)
    }
}

impl PosSettings for MemoryHost {
    fn pos_only_mode(&self) -> bool {
        self.inner.lock().unwrap().pos_only_mode
    }

    fn online_only_ids(&self, content_type: ContentType) -> Vec<i64> {
        self.inner
            .lock()
            .unwrap()
            .online_only
            .get(&content_type)
            .cloned()
            .unwrap_or_default()
    }
}

impl MultilingualApi for MemoryHost {
    fn default_language(&self) -> Option<String> {
        self.inner.lock().unwrap().default_language.clone()
    }

    fn active_languages(&self) -> Vec<LanguageInfo> {
        self.inner.lock().unwrap().active_languages.clone()
    }

    fn core_version(&self) -> Option<String> {
        self.inner.lock().unwrap().core_version.clone()
    }

    fn commerce_version(&self) -> Option<String> {
        self.inner.lock().unwrap().commerce_version.clone()
    }
}

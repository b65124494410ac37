use chrono::{DateTime, Utc};

/// Content types the point-of-sale listing endpoints serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Product,
    ProductVariation,
}

/// Listing order, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    CreatedDesc,
    CreatedAsc,
}

/// A typed listing query: the boundary-normalized form of the host's query
/// argument map. `lang: None` means no language constraint is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub content_type: ContentType,
    pub published_only: bool,
    /// Page size; `-1` is the unbounded sentinel.
    pub per_page: i64,
    pub order: SortOrder,
    pub parent: Option<i64>,
    /// Inclusive GMT lower bound on modification time.
    pub modified_after: Option<DateTime<Utc>>,
    /// Non-empty: restrict results to these identifiers.
    pub include: Vec<i64>,
    /// Remove these identifiers from the results.
    pub exclude: Vec<i64>,
    pub lang: Option<String>,
    /// Result caching must be skipped for this query.
    pub skip_caches: bool,
}

impl ListingQuery {
    /// A plain listing query for the given content type: published items,
    /// unbounded, newest first.
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            published_only: true,
            per_page: -1,
            order: SortOrder::CreatedDesc,
            parent: None,
            modified_after: None,
            include: Vec::new(),
            exclude: Vec::new(),
            lang: None,
            skip_caches: false,
        }
    }

    /// The fast-sync listing shape: identifiers only, caches bypassed.
    pub fn ids(content_type: ContentType) -> Self {
        Self {
            skip_caches: true,
            ..Self::new(content_type)
        }
    }

    /// Set the language constraint. An empty code leaves the query untouched;
    /// language resolution uses the empty string for "no constraint".
    pub fn apply_language(&mut self, code: &str) {
        if !code.is_empty() {
            self.lang = Some(code.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query_defaults() {
        let query = ListingQuery::new(ContentType::Product);

        assert!(query.published_only);
        assert_eq!(query.per_page, -1);
        assert_eq!(query.order, SortOrder::CreatedDesc);
        assert!(query.parent.is_none());
        assert!(query.lang.is_none());
        assert!(!query.skip_caches);
    }

    #[test]
    fn test_ids_query_bypasses_caches() {
        let query = ListingQuery::ids(ContentType::ProductVariation);

        assert!(query.skip_caches);
        assert_eq!(query.content_type, ContentType::ProductVariation);
    }

    #[test]
    fn test_apply_language_sets_lang() {
        let mut query = ListingQuery::new(ContentType::Product);
        query.apply_language("fr");
        assert_eq!(query.lang.as_deref(), Some("fr"));
    }

    #[test]
    fn test_apply_empty_language_is_a_no_op() {
        let mut query = ListingQuery::new(ContentType::Product);
        let before = query.clone();
        query.apply_language("");
        assert_eq!(query, before);
    }
}

//! Fast-sync classification and record shaping.
//!
//! Fast sync is a minimal listing mode: identifiers only, optionally with
//! modification timestamps, bypassing the full resource representation. A
//! request qualifies only when the route, the unbounded page sentinel and
//! the normalized `fields` set all match; everything else passes through to
//! normal dispatch.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::query::ContentType;
use crate::request::ApiRequest;

/// Field name for the identifier column.
const FIELD_ID: &str = "id";

/// Field name for the GMT modification timestamp.
const FIELD_DATE_MODIFIED_GMT: &str = "date_modified_gmt";

/// Request-scoped classification result: what to list and how to shape it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastSyncContext {
    pub content_type: ContentType,
    pub parent_id: Option<i64>,
    pub with_modified_gmt: bool,
}

/// One fast-sync output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FastSyncRecord {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified_gmt: Option<String>,
}

fn parent_variations_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^/products/(\d+)/variations$").expect("parent variations route pattern")
    })
}

fn gmt_datetime_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4}-\d{2}-\d{2}) (\d{2}:\d{2}:\d{2})").expect("gmt datetime pattern")
    })
}

/// Decide whether a request matches one of the recognized fast-sync shapes.
///
/// Matches iff the route is under `namespace`, `per_page` is the unbounded
/// sentinel `-1`, and the `fields` parameter normalizes to exactly `{id}` or
/// `{id, date_modified_gmt}`. Order is irrelevant but the size must match
/// exactly, so `{id, name}` or `{id, id}` never qualifies.
pub fn classify(request: &ApiRequest, namespace: &str) -> Option<FastSyncContext> {
    if !request.in_namespace(namespace) {
        return None;
    }

    if request.param_i64("per_page") != Some(-1) {
        return None;
    }

    let fields = request.fields()?;
    let has_id = fields.iter().any(|f| f == FIELD_ID);
    let has_date = fields.iter().any(|f| f == FIELD_DATE_MODIFIED_GMT);
    let id_only = has_id && fields.len() == 1;
    let id_plus_date = has_id && has_date && fields.len() == 2;

    if !id_only && !id_plus_date {
        return None;
    }

    let suffix = request.route().strip_prefix(namespace)?;

    let (content_type, parent_id) = if suffix == "/products" {
        (ContentType::Product, None)
    } else if suffix == "/products/variations" {
        (ContentType::ProductVariation, None)
    } else if let Some(captures) = parent_variations_re().captures(suffix) {
        let parent_id = captures[1].parse().ok()?;
        (ContentType::ProductVariation, Some(parent_id))
    } else {
        return None;
    };

    Some(FastSyncContext {
        content_type,
        parent_id,
        with_modified_gmt: id_plus_date,
    })
}

/// Format a host modification timestamp for fast-sync output.
///
/// `YYYY-MM-DD HH:MM:SS` gets its separator replaced with `T`; other
/// non-empty values go through a lenient chrono reparse; anything else
/// collapses to the empty string.
pub fn format_modified_gmt(value: &str) -> String {
    if gmt_datetime_re().is_match(value) {
        return gmt_datetime_re()
            .replace_all(value, "${1}T${2}")
            .into_owned();
    }

    if !value.is_empty() {
        if let Some(parsed) = parse_gmt(value) {
            return parsed.format("%Y-%m-%dT%H:%M:%S").to_string();
        }
    }

    String::new()
}

/// Lenient GMT timestamp parsing for the `modified_after` filter. Returns
/// `None` for anything unparseable; the caller omits the filter in that case.
pub fn parse_modified_after(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_gmt(raw)
}

fn parse_gmt(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast_sync_request(route: &str) -> ApiRequest {
        ApiRequest::new(route)
            .param("per_page", "-1")
            .list_param("fields", [FIELD_ID])
    }

    // ==================== Route Classification Tests ====================

    #[test]
    fn test_classify_products_route() {
        let context =
            classify(&fast_sync_request("/pos/v1/products"), "/pos/v1").expect("should match");

        assert_eq!(context.content_type, ContentType::Product);
        assert_eq!(context.parent_id, None);
        assert!(!context.with_modified_gmt);
    }

    #[test]
    fn test_classify_variations_route() {
        let context = classify(&fast_sync_request("/pos/v1/products/variations"), "/pos/v1")
            .expect("should match");

        assert_eq!(context.content_type, ContentType::ProductVariation);
        assert_eq!(context.parent_id, None);
    }

    #[test]
    fn test_classify_child_variations_route() {
        let context = classify(
            &fast_sync_request("/pos/v1/products/42/variations"),
            "/pos/v1",
        )
        .expect("should match");

        assert_eq!(context.content_type, ContentType::ProductVariation);
        assert_eq!(context.parent_id, Some(42));
    }

    #[test]
    fn test_classify_rejects_unknown_route() {
        assert!(classify(&fast_sync_request("/pos/v1/orders"), "/pos/v1").is_none());
    }

    #[test]
    fn test_classify_rejects_foreign_namespace() {
        assert!(classify(&fast_sync_request("/commerce/v3/products"), "/pos/v1").is_none());
    }

    #[test]
    fn test_classify_rejects_non_numeric_parent() {
        assert!(classify(
            &fast_sync_request("/pos/v1/products/abc/variations"),
            "/pos/v1"
        )
        .is_none());
    }

    // ==================== Page Sentinel Tests ====================

    #[test]
    fn test_classify_requires_unbounded_sentinel() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "100")
            .list_param("fields", [FIELD_ID]);
        assert!(classify(&request, "/pos/v1").is_none());
    }

    #[test]
    fn test_classify_missing_per_page_does_not_match() {
        let request = ApiRequest::new("/pos/v1/products").list_param("fields", [FIELD_ID]);
        assert!(classify(&request, "/pos/v1").is_none());
    }

    #[test]
    fn test_classify_non_numeric_per_page_does_not_match() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "all")
            .list_param("fields", [FIELD_ID]);
        assert!(classify(&request, "/pos/v1").is_none());
    }

    // ==================== Fields Tests ====================

    #[test]
    fn test_classify_id_plus_date_fields() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "-1")
            .list_param("fields", [FIELD_ID, FIELD_DATE_MODIFIED_GMT]);

        let context = classify(&request, "/pos/v1").expect("should match");
        assert!(context.with_modified_gmt);
    }

    #[test]
    fn test_classify_field_order_is_irrelevant() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "-1")
            .param("fields", "date_modified_gmt,id");

        let context = classify(&request, "/pos/v1").expect("should match");
        assert!(context.with_modified_gmt);
    }

    #[test]
    fn test_classify_comma_separated_fields_string() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "-1")
            .param("fields", " id ");

        assert!(classify(&request, "/pos/v1").is_some());
    }

    #[test]
    fn test_classify_rejects_extra_fields() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "-1")
            .param("fields", "id,name");
        assert!(classify(&request, "/pos/v1").is_none());
    }

    #[test]
    fn test_classify_rejects_duplicate_id_field() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "-1")
            .param("fields", "id,id");
        assert!(classify(&request, "/pos/v1").is_none());
    }

    #[test]
    fn test_classify_rejects_missing_fields_param() {
        let request = ApiRequest::new("/pos/v1/products").param("per_page", "-1");
        assert!(classify(&request, "/pos/v1").is_none());
    }

    // ==================== Timestamp Formatting Tests ====================

    #[test]
    fn test_format_replaces_space_with_t() {
        assert_eq!(
            format_modified_gmt("2024-03-01 12:30:45"),
            "2024-03-01T12:30:45"
        );
    }

    #[test]
    fn test_format_reparses_other_timestamps() {
        assert_eq!(
            format_modified_gmt("2024-03-01T12:30:45+02:00"),
            "2024-03-01T10:30:45"
        );
    }

    #[test]
    fn test_format_empty_value() {
        assert_eq!(format_modified_gmt(""), "");
    }

    #[test]
    fn test_format_garbage_value() {
        assert_eq!(format_modified_gmt("last tuesday"), "");
    }

    // ==================== modified_after Parsing Tests ====================

    #[test]
    fn test_parse_modified_after_rfc3339() {
        let parsed = parse_modified_after("2024-03-01T12:00:00Z").expect("should parse");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 12:00:00");
    }

    #[test]
    fn test_parse_modified_after_space_separated() {
        assert!(parse_modified_after("2024-03-01 12:00:00").is_some());
    }

    #[test]
    fn test_parse_modified_after_bare_date_is_midnight() {
        let parsed = parse_modified_after("2024-03-01").expect("should parse");
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn test_parse_modified_after_garbage() {
        assert!(parse_modified_after("soon").is_none());
        assert!(parse_modified_after("").is_none());
    }

    // ==================== Record Serialization Tests ====================

    #[test]
    fn test_record_without_date_serializes_id_only() {
        let record = FastSyncRecord {
            id: 7,
            date_modified_gmt: None,
        };
        assert_eq!(
            serde_json::to_string(&record).expect("serialize"),
            r#"{"id":7}"#
        );
    }

    #[test]
    fn test_record_with_date_serializes_both_fields() {
        let record = FastSyncRecord {
            id: 7,
            date_modified_gmt: Some("2024-03-01T12:30:45".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&record).expect("serialize"),
            r#"{"id":7,"date_modified_gmt":"2024-03-01T12:30:45"}"#
        );
    }

    // ==================== Property Tests ====================

    proptest! {
        /// Classification must be total: arbitrary routes and parameter
        /// shapes never panic.
        #[test]
        fn prop_classify_never_panics(
            route in ".{0,60}",
            per_page in ".{0,8}",
            fields in ".{0,30}"
        ) {
            let request = ApiRequest::new(route)
                .param("per_page", per_page)
                .param("fields", fields);
            let _ = classify(&request, "/pos/v1");
        }

        /// Formatting must be total over arbitrary input.
        #[test]
        fn prop_format_never_panics(value in ".{0,40}") {
            let _ = format_modified_gmt(&value);
        }

        /// Every well-formed storage timestamp converts to the same string
        /// with a `T` separator.
        #[test]
        fn prop_format_converts_storage_timestamps(
            year in 1970u32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
        ) {
            let stored = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            let expected = stored.replace(' ', "T");
            prop_assert_eq!(format_modified_gmt(&stored), expected);
        }
    }
}

use std::collections::HashMap;

/// A query parameter value as the host's REST layer hands it over: either a
/// single string or a list of strings (repeated keys, array-style params).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

/// A read-only view of an inbound REST request: route plus query parameters.
///
/// All accessors are defensive: a parameter of the wrong shape behaves as if
/// it were absent rather than producing an error.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    route: String,
    params: HashMap<String, ParamValue>,
}

impl ApiRequest {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            params: HashMap::new(),
        }
    }

    /// Build a request from decoded query pairs. A key that appears more than
    /// once becomes a list parameter, in order of appearance.
    pub fn from_query_pairs<I>(route: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::new(route);
        for (key, value) in pairs {
            match request.params.remove(&key) {
                None => {
                    request.params.insert(key, ParamValue::Single(value));
                }
                Some(ParamValue::Single(first)) => {
                    request
                        .params
                        .insert(key, ParamValue::List(vec![first, value]));
                }
                Some(ParamValue::List(mut values)) => {
                    values.push(value);
                    request.params.insert(key, ParamValue::List(values));
                }
            }
        }
        request
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .insert(name.into(), ParamValue::Single(value.into()));
        self
    }

    pub fn list_param<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.insert(
            name.into(),
            ParamValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// True when the route lives under the given point-of-sale namespace.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.route
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn param_str(&self, name: &str) -> Option<&str> {
        match self.params.get(name)? {
            ParamValue::Single(value) => Some(value.as_str()),
            ParamValue::List(_) => None,
        }
    }

    pub fn param_i64(&self, name: &str) -> Option<i64> {
        self.param_str(name)?.trim().parse().ok()
    }

    /// An identifier-list parameter: either a list value or a comma-separated
    /// single value. Entries that do not parse as integers are dropped.
    pub fn id_list(&self, name: &str) -> Vec<i64> {
        let raw: Vec<&str> = match self.params.get(name) {
            Some(ParamValue::List(values)) => values.iter().map(String::as_str).collect(),
            Some(ParamValue::Single(value)) => value.split(',').collect(),
            None => return Vec::new(),
        };

        raw.iter()
            .filter_map(|entry| entry.trim().parse().ok())
            .collect()
    }

    /// The `fields` parameter normalized into an ordered list: a
    /// comma-separated string or a list of strings, entries trimmed.
    /// Returns `None` when the parameter is absent.
    pub fn fields(&self) -> Option<Vec<String>> {
        let fields = match self.params.get("fields")? {
            ParamValue::Single(value) => value.split(',').map(str::trim).map(String::from).collect(),
            ParamValue::List(values) => values.iter().map(|v| v.trim().to_string()).collect(),
        };
        Some(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Namespace Tests ====================

    #[test]
    fn test_in_namespace_matches_routes_under_prefix() {
        let request = ApiRequest::new("/pos/v1/products");
        assert!(request.in_namespace("/pos/v1"));
    }

    #[test]
    fn test_in_namespace_rejects_other_namespaces() {
        let request = ApiRequest::new("/commerce/v3/products");
        assert!(!request.in_namespace("/pos/v1"));
    }

    #[test]
    fn test_in_namespace_rejects_bare_namespace_route() {
        let request = ApiRequest::new("/pos/v1");
        assert!(!request.in_namespace("/pos/v1"));
    }

    #[test]
    fn test_in_namespace_rejects_prefix_of_longer_segment() {
        // "/pos/v10/products" must not count as being under "/pos/v1".
        let request = ApiRequest::new("/pos/v10/products");
        assert!(!request.in_namespace("/pos/v1"));
    }

    // ==================== Param Accessor Tests ====================

    #[test]
    fn test_param_str_returns_single_values_only() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("modified_after", "2024-01-01")
            .list_param("fields", ["id"]);

        assert_eq!(request.param_str("modified_after"), Some("2024-01-01"));
        assert_eq!(request.param_str("fields"), None);
        assert_eq!(request.param_str("missing"), None);
    }

    #[test]
    fn test_param_i64_parses_integers() {
        let request = ApiRequest::new("/pos/v1/products")
            .param("per_page", "-1")
            .param("store_id", " 42 ")
            .param("bogus", "abc");

        assert_eq!(request.param_i64("per_page"), Some(-1));
        assert_eq!(request.param_i64("store_id"), Some(42));
        assert_eq!(request.param_i64("bogus"), None);
        assert_eq!(request.param_i64("missing"), None);
    }

    #[test]
    fn test_id_list_from_list_param() {
        let request =
            ApiRequest::new("/pos/v1/products").list_param("pos_include", ["1", "2", "3"]);
        assert_eq!(request.id_list("pos_include"), vec![1, 2, 3]);
    }

    #[test]
    fn test_id_list_from_comma_separated_string() {
        let request = ApiRequest::new("/pos/v1/products").param("pos_exclude", "4, 5 ,6");
        assert_eq!(request.id_list("pos_exclude"), vec![4, 5, 6]);
    }

    #[test]
    fn test_id_list_drops_non_numeric_entries() {
        let request = ApiRequest::new("/pos/v1/products").param("pos_include", "1,abc,3");
        assert_eq!(request.id_list("pos_include"), vec![1, 3]);
    }

    #[test]
    fn test_id_list_missing_param_is_empty() {
        let request = ApiRequest::new("/pos/v1/products");
        assert!(request.id_list("pos_include").is_empty());
    }

    // ==================== Fields Normalization Tests ====================

    #[test]
    fn test_fields_from_comma_separated_string() {
        let request = ApiRequest::new("/pos/v1/products").param("fields", "id, date_modified_gmt");
        assert_eq!(
            request.fields(),
            Some(vec!["id".to_string(), "date_modified_gmt".to_string()])
        );
    }

    #[test]
    fn test_fields_from_list() {
        let request =
            ApiRequest::new("/pos/v1/products").list_param("fields", ["id", " name "]);
        assert_eq!(
            request.fields(),
            Some(vec!["id".to_string(), "name".to_string()])
        );
    }

    #[test]
    fn test_fields_absent() {
        let request = ApiRequest::new("/pos/v1/products");
        assert_eq!(request.fields(), None);
    }

    // ==================== Query Pair Tests ====================

    #[test]
    fn test_from_query_pairs_single_values() {
        let request = ApiRequest::from_query_pairs(
            "/pos/v1/products",
            vec![
                ("per_page".to_string(), "-1".to_string()),
                ("fields".to_string(), "id".to_string()),
            ],
        );

        assert_eq!(request.param_i64("per_page"), Some(-1));
        assert_eq!(request.fields(), Some(vec!["id".to_string()]));
    }

    #[test]
    fn test_from_query_pairs_repeated_key_becomes_list() {
        let request = ApiRequest::from_query_pairs(
            "/pos/v1/products",
            vec![
                ("fields".to_string(), "id".to_string()),
                ("fields".to_string(), "date_modified_gmt".to_string()),
            ],
        );

        assert_eq!(
            request.fields(),
            Some(vec!["id".to_string(), "date_modified_gmt".to_string()])
        );
    }

    // ==================== Property Tests ====================

    proptest! {
        /// Comma-separated strings and list parameters must normalize to the
        /// same field list.
        #[test]
        fn prop_fields_string_and_list_agree(
            entries in proptest::collection::vec("[a-z_]{1,20}", 1..5)
        ) {
            let joined = entries.join(",");
            let from_string = ApiRequest::new("/pos/v1/products")
                .param("fields", joined)
                .fields();
            let from_list = ApiRequest::new("/pos/v1/products")
                .list_param("fields", entries.clone())
                .fields();
            prop_assert_eq!(from_string, from_list);
        }

        /// Id-list parsing never panics and only ever yields parseable entries.
        #[test]
        fn prop_id_list_total(raw in ".*") {
            let request = ApiRequest::new("/pos/v1/products").param("pos_include", raw);
            for id in request.id_list("pos_include") {
                prop_assert_eq!(id.to_string().parse::<i64>(), Ok(id));
            }
        }
    }
}

//! Request adapter for mapping HTTP requests to raw validator inputs.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Error;
use crate::field::FieldKind;
use crate::raw::RawInputs;
use crate::schema::Schema;

use super::{ExtractRawInputs, ParamSource};

/// Adapter for converting framework-specific HTTP requests into raw inputs.
///
/// `RequestAdapter` is the primary integration point between web frameworks
/// and the validator. It holds plain owned data so it never couples to a
/// specific framework's request type; framework code should implement
/// `From<FrameworkRequest>` for `RequestAdapter`.
///
/// Lookup rules:
/// - query keys may repeat; collection fields receive every value, scalar
///   fields the last one
/// - header names are case-insensitive, and a field named `x_token` matches
///   the `X-Token` header
/// - body fields are read from a JSON object body
///
/// # Examples
///
/// ```
/// use param_core::web::{ExtractRawInputs, ParamSource, RequestAdapter};
/// use param_core::{FieldSpec, Schema};
/// use serde_json::json;
///
/// let mut adapter = RequestAdapter::new("req-12345".to_string());
/// adapter.add_query_string("skip=1&limit=5&tag=a&tag=b");
/// adapter.add_header("X-Token".to_string(), "secret".to_string());
///
/// let query = Schema::new()
///     .field(FieldSpec::integer("skip"))
///     .field(FieldSpec::list("tag", FieldSpec::string("tag")));
/// let raw = adapter.raw_inputs(ParamSource::Query, &query);
/// assert_eq!(raw.get("skip"), Some(&json!("1")));
/// assert_eq!(raw.get("tag"), Some(&json!(["a", "b"])));
///
/// let headers = Schema::new().field(FieldSpec::string("x_token"));
/// let raw = adapter.raw_inputs(ParamSource::Header, &headers);
/// assert_eq!(raw.get("x_token"), Some(&json!("secret")));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    /// Unique request identifier (required)
    request_id: String,
    /// Path parameters from routing
    path_params: HashMap<String, String>,
    /// Query parameters in arrival order; keys may repeat
    query_params: Vec<(String, String)>,
    /// Request headers, keyed by lowercase name
    headers: HashMap<String, String>,
    /// Parsed JSON body, if any
    body: Option<Value>,
}

impl RequestAdapter {
    /// Creates a new request adapter with the given request ID.
    ///
    /// All other fields start empty. Use the `add_*` / `set_*` methods to
    /// populate them.
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            path_params: HashMap::new(),
            query_params: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Adds a path parameter captured by the router.
    pub fn add_path_param(&mut self, key: String, value: String) {
        self.path_params.insert(key, value);
    }

    /// Adds one query parameter. Repeated keys accumulate.
    pub fn add_query_param(&mut self, key: String, value: String) {
        self.query_params.push((key, value));
    }

    /// Adds every pair of a URL-encoded query string (leading `?` optional).
    pub fn add_query_string(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            self.query_params.push((key.into_owned(), value.into_owned()));
        }
    }

    /// Adds a header. Names are case-insensitive; a repeated header keeps the
    /// last value.
    pub fn add_header(&mut self, key: String, value: String) {
        self.headers.insert(key.to_ascii_lowercase(), value);
    }

    /// Sets an already-parsed JSON body.
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// Parses and sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBody`] if `text` is not valid JSON; the
    /// adapter is left unchanged.
    pub fn set_body_json(&mut self, text: &str) -> Result<(), Error> {
        let body = serde_json::from_str(text).map_err(Error::MalformedBody)?;
        self.body = Some(body);
        Ok(())
    }

    fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.query_params
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

fn header_key(field_key: &str) -> String {
    field_key.replace('_', "-").to_ascii_lowercase()
}

impl ExtractRawInputs for RequestAdapter {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn raw_inputs(&self, source: ParamSource, schema: &Schema) -> RawInputs {
        let mut raw = RawInputs::new();
        for field in schema.fields() {
            let key = field.lookup_key();
            match source {
                ParamSource::Path => {
                    if let Some(value) = self.path_params.get(key) {
                        raw.insert_str(key, value.clone());
                    }
                }
                ParamSource::Query => {
                    if matches!(field.kind(), FieldKind::List { .. }) {
                        for value in self.query_values(key) {
                            raw.append_str(key, value.clone());
                        }
                    } else if let Some(value) = self.query_values(key).last() {
                        raw.insert_str(key, value.clone());
                    }
                }
                ParamSource::Header => {
                    let value = self
                        .headers
                        .get(&header_key(key))
                        .or_else(|| self.headers.get(&key.to_ascii_lowercase()));
                    if let Some(value) = value {
                        raw.insert_str(key, value.clone());
                    }
                }
                ParamSource::Body => {
                    if let Some(value) = self.body.as_ref().and_then(|b| b.get(key)) {
                        raw.insert_json(key, value.clone());
                    }
                }
            }
        }
        raw
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;
    use serde_json::json;

    #[test]
    fn request_adapter_new() {
        let adapter = RequestAdapter::new("req-test".to_string());
        assert_eq!(adapter.request_id(), "req-test");
        assert!(adapter.body().is_none());
    }

    #[test]
    fn path_params_are_looked_up_by_field() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_path_param("item_id".to_string(), "42".to_string());
        adapter.add_path_param("unrelated".to_string(), "x".to_string());

        let schema = Schema::new().field(FieldSpec::integer("item_id"));
        let raw = adapter.raw_inputs(ParamSource::Path, &schema);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("item_id"), Some(&json!("42")));
    }

    #[test]
    fn scalar_query_takes_last_value() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_query_param("q".to_string(), "first".to_string());
        adapter.add_query_param("q".to_string(), "second".to_string());

        let schema = Schema::new().field(FieldSpec::string("q"));
        let raw = adapter.raw_inputs(ParamSource::Query, &schema);
        assert_eq!(raw.get("q"), Some(&json!("second")));
    }

    #[test]
    fn query_string_is_percent_decoded() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_query_string("?q=some%20query&model=Light+GBM");

        let schema = Schema::new()
            .field(FieldSpec::string("q"))
            .field(FieldSpec::string("model"));
        let raw = adapter.raw_inputs(ParamSource::Query, &schema);
        assert_eq!(raw.get("q"), Some(&json!("some query")));
        assert_eq!(raw.get("model"), Some(&json!("Light GBM")));
    }

    #[test]
    fn headers_are_case_insensitive_and_underscore_tolerant() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_header("X-Key".to_string(), "k".to_string());
        adapter.add_header("user_agent".to_string(), "ua".to_string());

        let schema = Schema::new()
            .field(FieldSpec::string("x_key"))
            .field(FieldSpec::string("user_agent"));
        let raw = adapter.raw_inputs(ParamSource::Header, &schema);
        assert_eq!(raw.get("x_key"), Some(&json!("k")));
        assert_eq!(raw.get("user_agent"), Some(&json!("ua")));
    }

    #[test]
    fn body_fields_come_from_json_object() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter
            .set_body_json(r#"{"name": "Foo", "price": 1.5, "extra": true}"#)
            .expect("valid json");

        let schema = Schema::new()
            .field(FieldSpec::string("name"))
            .field(FieldSpec::float("price"));
        let raw = adapter.raw_inputs(ParamSource::Body, &schema);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get("price"), Some(&json!(1.5)));
    }

    #[test]
    fn malformed_body_leaves_adapter_unchanged() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        let result = adapter.set_body_json("{oops");
        assert!(matches!(result, Err(Error::MalformedBody(_))));
        assert!(adapter.body().is_none());
    }

    #[test]
    fn aliases_drive_lookup() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_query_param("item-query".to_string(), "x".to_string());

        let schema = Schema::new().field(FieldSpec::string("item_query").alias("item-query"));
        let raw = adapter.raw_inputs(ParamSource::Query, &schema);
        assert_eq!(raw.get("item-query"), Some(&json!("x")));
    }
}

//! Extraction boundary trait for web integration.
//!
//! This module defines the core abstraction for pulling raw validator inputs
//! out of framework-specific request types.

use serde_json::Value;

use crate::raw::RawInputs;
use crate::schema::Schema;

use super::ParamSource;

/// Extracts raw inputs from a framework-specific request.
///
/// This trait is the seam between web framework types and the validator.
/// [`RequestAdapter`](super::RequestAdapter) implements it for plain owned
/// request data; frameworks may implement it directly on their own request
/// types to avoid the copy.
///
/// # Design Notes
///
/// Implementations only *locate* values. They must not coerce, default or
/// reject anything: a missing value is simply left out of the returned
/// [`RawInputs`], and the validator decides what that means.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use param_core::web::{ExtractRawInputs, ParamSource};
/// use param_core::{FieldSpec, RawInputs, Schema};
/// use serde_json::Value;
///
/// struct MyFrameworkRequest {
///     id: String,
///     query: HashMap<String, String>,
/// }
///
/// impl ExtractRawInputs for MyFrameworkRequest {
///     fn request_id(&self) -> &str {
///         &self.id
///     }
///
///     fn raw_inputs(&self, source: ParamSource, schema: &Schema) -> RawInputs {
///         let mut raw = RawInputs::new();
///         if source == ParamSource::Query {
///             for field in schema.fields() {
///                 if let Some(v) = self.query.get(field.lookup_key()) {
///                     raw.insert_str(field.lookup_key(), v.clone());
///                 }
///             }
///         }
///         raw
///     }
///
///     fn body(&self) -> Option<&Value> {
///         None
///     }
/// }
/// ```
pub trait ExtractRawInputs {
    /// Identifier used to correlate log events for this request.
    fn request_id(&self) -> &str;

    /// Collects the raw values `schema` looks for in `source`.
    ///
    /// Keys in the result are the fields' lookup keys.
    fn raw_inputs(&self, source: ParamSource, schema: &Schema) -> RawInputs;

    /// The parsed JSON body, if the request carried one.
    fn body(&self) -> Option<&Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;
    use crate::web::{validate_request, Endpoint};
    use serde_json::json;

    // Minimal framework request carrying only a body.
    struct BodyOnly {
        body: Value,
    }

    impl ExtractRawInputs for BodyOnly {
        fn request_id(&self) -> &str {
            "body-only"
        }

        fn raw_inputs(&self, source: ParamSource, schema: &Schema) -> RawInputs {
            let mut raw = RawInputs::new();
            if source == ParamSource::Body {
                for field in schema.fields() {
                    if let Some(v) = self.body.get(field.lookup_key()) {
                        raw.insert_json(field.lookup_key(), v.clone());
                    }
                }
            }
            raw
        }

        fn body(&self) -> Option<&Value> {
            Some(&self.body)
        }
    }

    #[test]
    fn custom_extractor_feeds_validate_request() {
        let endpoint =
            Endpoint::new().body(Schema::new().field(FieldSpec::string("name").required()));

        let ok = BodyOnly {
            body: json!({ "name": "Foo" }),
        };
        let validated = validate_request(&endpoint, &ok).expect("valid body");
        assert_eq!(validated.request_id, "body-only");

        let bad = BodyOnly { body: json!({}) };
        assert!(validate_request(&endpoint, &bad).is_err());
    }
}

//! Per-route validation of every parameter source in a request.
//!
//! This module provides the boundary layer between HTTP frameworks and the
//! validator. It handles:
//! - Declaring, per route, what each source must carry ([`Endpoint`])
//! - Validating all sources in one pass ([`validate_request`])
//! - NOT running handler logic (that's the application's job)
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Framework-specific code builds RequestAdapter
//!   ↓
//! Call validate_request(&ENDPOINT, &adapter)
//!   ↓
//! Ok(ValidatedRequest)  → handler reads typed Params
//! Err(Rejection)        → framework renders status + JSON report
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::coerce;
use crate::error::{Error, FieldPath, PathSegment, SchemaError, ValidationErrors, Violation};
use crate::field::FieldSpec;
use crate::params::Params;
use crate::schema::Schema;
use crate::validate::validate;

use super::{ExtractRawInputs, ParamSource, Rejection};

/// Parameter declarations for one route.
///
/// Built once at route registration and shared by every request.
///
/// # Examples
///
/// ```
/// use param_core::web::Endpoint;
/// use param_core::{FieldSpec, Schema};
///
/// let item = Schema::new()
///     .field(FieldSpec::string("name").required())
///     .field(FieldSpec::float("price").required().gt(0.0));
///
/// let update_item = Endpoint::new()
///     .path(FieldSpec::integer("item_id").required().ge(0.0).le(1000.0))
///     .query(FieldSpec::string("q").default_null())
///     .optional_body(item);
///
/// assert!(update_item.check().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Endpoint {
    path: Schema,
    query: Schema,
    headers: Schema,
    body: Option<Schema>,
    body_required: bool,
}

impl Endpoint {
    /// Creates an endpoint that accepts no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a path parameter.
    pub fn path(mut self, spec: FieldSpec) -> Self {
        self.path = self.path.field(spec);
        self
    }

    /// Declares a query parameter.
    pub fn query(mut self, spec: FieldSpec) -> Self {
        self.query = self.query.field(spec);
        self
    }

    /// Declares a header parameter.
    pub fn header(mut self, spec: FieldSpec) -> Self {
        self.headers = self.headers.field(spec);
        self
    }

    /// Declares a JSON body the request must carry.
    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self.body_required = true;
        self
    }

    /// Declares a JSON body the request may omit.
    pub fn optional_body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self.body_required = false;
        self
    }

    /// The schema declared for `source`, if any.
    pub fn schema(&self, source: ParamSource) -> Option<&Schema> {
        match source {
            ParamSource::Path => Some(&self.path),
            ParamSource::Query => Some(&self.query),
            ParamSource::Header => Some(&self.headers),
            ParamSource::Body => self.body.as_ref(),
        }
    }

    /// Whether a missing body is a violation.
    pub fn body_required(&self) -> bool {
        self.body.is_some() && self.body_required
    }

    /// Checks every declared schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in path, query, header, body
    /// order.
    pub fn check(&self) -> Result<(), SchemaError> {
        self.path.check()?;
        self.query.check()?;
        self.headers.check()?;
        if let Some(body) = &self.body {
            body.check()?;
        }
        Ok(())
    }
}

/// A request whose every declared parameter passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    /// The request identifier, for correlation
    pub request_id: String,
    /// Validated path parameters
    pub path: Params,
    /// Validated query parameters
    pub query: Params,
    /// Validated header parameters
    pub headers: Params,
    /// Validated body, when the endpoint declares one and it was sent
    pub body: Option<Params>,
}

impl ValidatedRequest {
    /// Deserializes the validated body into `T`.
    ///
    /// An absent body deserializes from `null`, so `Option<Model>` is the
    /// natural target for an optional body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deserialize`] if the body does not fit `T`.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match &self.body {
            Some(params) => params.deserialize(),
            None => serde_json::from_value(Value::Null).map_err(Error::Deserialize),
        }
    }

    /// Consumes the request and returns the body as JSON (`null` when absent).
    pub fn into_body_value(self) -> Value {
        self.body.map(Params::into_value).unwrap_or(Value::Null)
    }
}

/// Validates every parameter source of `request` against `endpoint`.
///
/// Sources are validated in path, query, header, body order and violations
/// from all of them are accumulated. Each violation's location is prefixed
/// with its source, so `q` in the query string is reported at
/// `["query", "q"]`. A field declared with an alias is located by the alias
/// the client sends. A missing required body is reported at `["body"]`.
///
/// # Errors
///
/// Returns a 422 [`Rejection`] carrying every violation when any source
/// fails.
///
/// # Examples
///
/// ```
/// use param_core::web::{validate_request, Endpoint, RequestAdapter};
/// use param_core::FieldSpec;
///
/// let endpoint = Endpoint::new()
///     .query(FieldSpec::integer("skip").default(0))
///     .query(FieldSpec::integer("limit").default(10));
///
/// let mut adapter = RequestAdapter::new("req-7".to_string());
/// adapter.add_query_string("limit=2");
///
/// let validated = validate_request(&endpoint, &adapter).unwrap();
/// assert_eq!(validated.query.get_i64("skip"), Some(0));
/// assert_eq!(validated.query.get_i64("limit"), Some(2));
/// ```
pub fn validate_request<R>(endpoint: &Endpoint, request: &R) -> Result<ValidatedRequest, Rejection>
where
    R: ExtractRawInputs + ?Sized,
{
    let mut errors = ValidationErrors::new();

    let path = validate_source(request, ParamSource::Path, &endpoint.path, &mut errors);
    let query = validate_source(request, ParamSource::Query, &endpoint.query, &mut errors);
    let headers = validate_source(request, ParamSource::Header, &endpoint.headers, &mut errors);

    let body = match &endpoint.body {
        None => None,
        Some(schema) => match request.body() {
            None | Some(Value::Null) => {
                if endpoint.body_required {
                    errors.push(Violation::missing(FieldPath::field(ParamSource::Body.as_str())));
                }
                None
            }
            Some(Value::Object(_)) => {
                validate_source(request, ParamSource::Body, schema, &mut errors)
            }
            Some(other) => {
                errors.push(Violation::mismatch(
                    FieldPath::field(ParamSource::Body.as_str()),
                    "object",
                    other,
                ));
                tracing::debug!(
                    request_id = %request.request_id(),
                    found = coerce::type_name(other),
                    "body is not an object"
                );
                None
            }
        },
    };

    match (path, query, headers) {
        (Some(path), Some(query), Some(headers)) if errors.is_empty() => {
            tracing::trace!(request_id = %request.request_id(), "request parameters accepted");
            Ok(ValidatedRequest {
                request_id: request.request_id().to_string(),
                path,
                query,
                headers,
                body,
            })
        }
        _ => {
            tracing::info!(
                request_id = %request.request_id(),
                violations = errors.len(),
                "request rejected"
            );
            Err(Rejection::from_violations(&errors))
        }
    }
}

fn validate_source<R>(
    request: &R,
    source: ParamSource,
    schema: &Schema,
    errors: &mut ValidationErrors,
) -> Option<Params>
where
    R: ExtractRawInputs + ?Sized,
{
    match validate(schema, &request.raw_inputs(source, schema)) {
        Ok(params) => Some(params),
        Err(violations) => {
            let located: ValidationErrors = violations
                .into_iter()
                .map(|mut violation| {
                    let field = violation.path.first_key().and_then(|name| schema.get(name));
                    if let Some(alias) = field.and_then(FieldSpec::alias_name) {
                        violation.path = violation.path.with_first_key(alias);
                    }
                    violation
                })
                .collect();
            errors.append(located.prefixed(PathSegment::Key(source.as_str().to_string())));
            None
        }
    }
}

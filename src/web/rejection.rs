//! Client-facing rejection of a request.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ConstraintKind, Error, PathSegment, ValidationErrors, Violation, ViolationKind};

/// One entry of an [`ErrorReport`].
///
/// Serializes as `{"loc": [...], "msg": ..., "type": ..., "input": ..., "ctx": ...}`;
/// `input` and `ctx` are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    /// Location of the offending value: the source, then the field path
    pub loc: Vec<Value>,
    /// Human-readable message
    pub msg: String,
    /// Stable machine-readable code, e.g. `value_error.number.not_ge`
    #[serde(rename = "type")]
    pub kind: String,
    /// The offending raw value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// Constraint parameters, e.g. `{"limit_value": 10}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Value>,
}

impl ErrorDetail {
    /// Creates a detail with no input or context.
    pub fn new(loc: Vec<Value>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
            input: None,
            ctx: None,
        }
    }
}

fn limit_value(limit: f64) -> Value {
    if limit.fract() == 0.0 && limit.abs() < 1e15 {
        json!(limit as i64)
    } else {
        json!(limit)
    }
}

fn constraint_ctx(kind: &ConstraintKind) -> Value {
    match kind {
        ConstraintKind::Minimum { limit, .. } | ConstraintKind::Maximum { limit, .. } => {
            json!({ "limit_value": limit_value(*limit) })
        }
        ConstraintKind::MinLength { min } => json!({ "limit_value": min }),
        ConstraintKind::MaxLength { max } => json!({ "limit_value": max }),
        ConstraintKind::EnumMembership { allowed } => json!({ "enum_values": allowed }),
    }
}

impl From<&Violation> for ErrorDetail {
    fn from(violation: &Violation) -> Self {
        let loc = violation
            .path
            .segments()
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => Value::String(key.clone()),
                PathSegment::Index(idx) => json!(idx),
            })
            .collect();
        let ctx = match &violation.kind {
            ViolationKind::Constraint(kind) => Some(constraint_ctx(kind)),
            _ => None,
        };
        Self {
            loc,
            msg: violation.kind.to_string(),
            kind: violation.kind.code(),
            input: violation.input.clone(),
            ctx,
        }
    }
}

/// The JSON body of a rejection: `{"detail": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// One entry per problem
    pub detail: Vec<ErrorDetail>,
}

impl ErrorReport {
    /// Serializes the report to a JSON value.
    pub fn to_json(&self) -> Value {
        json!({ "detail": self.detail })
    }
}

/// A request that will not reach its handler.
///
/// Carries an HTTP status and a serializable [`ErrorReport`]. Frameworks map
/// it onto their own response type.
///
/// # Examples
///
/// ```
/// use param_core::web::Rejection;
///
/// let rejection = Rejection::bad_request(&["header", "x_token"], "X-Token header invalid");
/// assert_eq!(rejection.status(), 400);
/// assert_eq!(rejection.report().detail[0].msg, "X-Token header invalid");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    status: u16,
    report: ErrorReport,
}

impl Rejection {
    /// Status for requests whose parameters failed validation.
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
    /// Status for requests a handler refused after validation.
    pub const BAD_REQUEST: u16 = 400;
    /// Status for failures on the server side of the boundary.
    pub const INTERNAL_SERVER_ERROR: u16 = 500;

    /// Creates a rejection with an explicit status and details.
    pub fn new(status: u16, detail: Vec<ErrorDetail>) -> Self {
        Self {
            status,
            report: ErrorReport { detail },
        }
    }

    /// A 422 rejection listing every violation.
    pub fn from_violations(errors: &ValidationErrors) -> Self {
        Self::new(
            Self::UNPROCESSABLE_ENTITY,
            errors.iter().map(ErrorDetail::from).collect(),
        )
    }

    /// A 400 rejection with a single message at `loc`.
    pub fn bad_request(loc: &[&str], msg: impl Into<String>) -> Self {
        let loc = loc.iter().map(|s| Value::String((*s).to_string())).collect();
        Self::new(
            Self::BAD_REQUEST,
            vec![ErrorDetail::new(loc, msg, "value_error.invalid")],
        )
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The report to serialize as the response body.
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }
}

impl From<ValidationErrors> for Rejection {
    fn from(errors: ValidationErrors) -> Self {
        Self::from_violations(&errors)
    }
}

impl From<Error> for Rejection {
    fn from(error: Error) -> Self {
        tracing::error!(error = %error, "request failed after validation");
        Self::new(
            Self::INTERNAL_SERVER_ERROR,
            vec![ErrorDetail::new(Vec::new(), error.to_string(), "server_error")],
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request rejected with status {}", self.status)?;
        for detail in &self.report.detail {
            write!(f, "; {}", detail.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for Rejection {}

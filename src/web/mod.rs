//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and the validator. It
//! handles:
//! - Collecting raw inputs per source (path, query, header, body)
//! - Validating every source of a request in one pass
//! - Translating accumulated violations into a client-facing [`Rejection`]
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: nothing here knows about a concrete
//!    HTTP stack. Frameworks fill a [`RequestAdapter`] (or implement
//!    [`ExtractRawInputs`] themselves) and map a [`Rejection`] onto their
//!    response type.
//!
//! 2. **Declared Once**: an [`Endpoint`] is built at route registration and
//!    shared by every request to that route.
//!
//! 3. **Report Everything**: violations from all sources are accumulated, so
//!    a client sees every problem with its request at once.
//!
//! # Example Flow
//!
//! ```
//! use param_core::web::{validate_request, Endpoint, RequestAdapter};
//! use param_core::FieldSpec;
//!
//! let endpoint = Endpoint::new()
//!     .path(FieldSpec::integer("cat_id").required().ge(10.0))
//!     .query(FieldSpec::string("q").default_null());
//!
//! let mut request = RequestAdapter::new("req-1".to_string());
//! request.add_path_param("cat_id".to_string(), "9".to_string());
//!
//! let rejection = validate_request(&endpoint, &request).unwrap_err();
//! assert_eq!(rejection.status(), 422);
//! assert_eq!(rejection.report().detail[0].loc, ["path", "cat_id"]);
//! ```

use std::fmt;

mod adapter;
pub mod example_handler;
mod extract;
mod middleware;
mod rejection;

pub use adapter::RequestAdapter;
pub use extract::ExtractRawInputs;
pub use middleware::{validate_request, Endpoint, ValidatedRequest};
pub use rejection::{ErrorDetail, ErrorReport, Rejection};

/// Where in a request a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// A templated path segment (`/cats/{cat_id}`)
    Path,
    /// A query-string key
    Query,
    /// A request header
    Header,
    /// A field of the JSON body
    Body,
}

impl ParamSource {
    /// Location prefix used in violation reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamSource::Path => "path",
            ParamSource::Query => "query",
            ParamSource::Header => "header",
            ParamSource::Body => "body",
        }
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

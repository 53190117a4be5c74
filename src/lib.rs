//! Declarative request-parameter validation and coercion.
//!
//! This crate turns raw, untrusted request inputs into typed parameters
//! through:
//! - **Schemas**: ordered, immutable field declarations built in code or read
//!   from JSON
//! - **Coercion**: textual inputs converted to their declared kinds
//! - **Full reporting**: every violation of every field, never just the first
//!
//! # Core Types
//!
//! - [`FieldSpec`]: Static description of one expected input field
//! - [`Schema`]: Ordered field set with `pick` / `omit` / `extend` composition
//! - [`RawInputs`]: Untrusted name → value map, as received
//! - [`Params`]: Coerced values that only the validator can produce
//! - [`ValidationErrors`]: Every [`Violation`] found, in declaration order
//! - [`Validator`]: A checked schema ready to validate concurrently
//!
//! # Examples
//!
//! ```
//! use param_core::{validate, FieldSpec, RawInputs, Schema, ViolationKind};
//!
//! let schema = Schema::new()
//!     .field(FieldSpec::integer("cat_id").required().ge(10.0))
//!     .field(FieldSpec::string("q").default_null().min_length(3).max_length(50));
//!
//! let raw: RawInputs = [("cat_id", "12")].into_iter().collect();
//! let params = validate(&schema, &raw).expect("valid input");
//! assert_eq!(params.get_i64("cat_id"), Some(12));
//! assert!(params.get("q").is_some_and(|q| q.is_null()));
//!
//! let raw: RawInputs = [("cat_id", "9"), ("q", "ab")].into_iter().collect();
//! let errors = validate(&schema, &raw).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert!(matches!(errors.as_slice()[0].kind, ViolationKind::Constraint(_)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coerce;
mod error;
mod field;
mod params;
mod raw;
mod response;
mod schema;
mod validate;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use error::{
    ConstraintKind, Error, FieldPath, PathSegment, SchemaError, ValidationErrors, Violation,
    ViolationKind,
};
pub use field::{Bound, Constraints, FieldKind, FieldSpec, StringFormat};
pub use params::Params;
pub use raw::RawInputs;
pub use response::project;
pub use schema::Schema;
pub use validate::{validate, ValidationResult, Validator};

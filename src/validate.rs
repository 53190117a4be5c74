//! The validation algorithm.
//!
//! Every field is looked up, defaulted, coerced and constrained
//! independently; violations are accumulated rather than returned early, so
//! a single pass reports every problem in the input. Reporting order follows
//! schema declaration order, depth-first into nested objects and collections.

use serde_json::{Map, Value};

use crate::coerce;
use crate::error::{ConstraintKind, FieldPath, SchemaError, ValidationErrors, Violation};
use crate::field::{FieldKind, FieldSpec};
use crate::params::Params;
use crate::raw::RawInputs;
use crate::schema::Schema;

/// Outcome of validating one input: typed values or every violation.
pub type ValidationResult = Result<Params, ValidationErrors>;

/// Validates raw input against a schema.
///
/// Pure and synchronous; safe to call from any number of threads at once.
///
/// # Errors
///
/// Returns the complete, ordered [`ValidationErrors`] when any field fails.
///
/// # Examples
///
/// ```
/// use param_core::{validate, ConstraintKind, FieldSpec, RawInputs, Schema, ViolationKind};
/// use serde_json::json;
///
/// let schema = Schema::new().field(FieldSpec::integer("cat_id").required().ge(10.0));
///
/// let raw: RawInputs = [("cat_id", "9")].into_iter().collect();
/// let errors = validate(&schema, &raw).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// assert!(matches!(
///     errors.as_slice()[0].kind,
///     ViolationKind::Constraint(ConstraintKind::Minimum { .. })
/// ));
/// assert_eq!(errors.as_slice()[0].input, Some(json!("9")));
/// ```
pub fn validate(schema: &Schema, raw: &RawInputs) -> ValidationResult {
    let mut errors = ValidationErrors::new();
    let values = validate_object(schema, raw.as_map(), &FieldPath::root(), &mut errors);

    if errors.is_empty() {
        tracing::trace!(fields = schema.len(), "input accepted");
        Ok(Params::new_unchecked(values))
    } else {
        tracing::debug!(
            fields = schema.len(),
            violations = errors.len(),
            "input rejected"
        );
        Err(errors)
    }
}

/// A schema that passed [`Schema::check`], ready to validate requests.
///
/// Build one per route at registration time and share it; `Validator` is
/// `Send + Sync` and cheap to clone.
///
/// # Examples
///
/// ```
/// use param_core::{FieldSpec, RawInputs, Schema, Validator};
///
/// let validator = Validator::new(
///     Schema::new().field(FieldSpec::string("q").min_length(3).max_length(50).default_null()),
/// )
/// .expect("sound schema");
///
/// let params = validator.validate(&RawInputs::new()).expect("q is optional");
/// assert!(params.get("q").is_some_and(|q| q.is_null()));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
}

impl Validator {
    /// Checks `schema` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the first declaration defect found by [`Schema::check`].
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        schema.check()?;
        Ok(Self { schema })
    }

    /// The checked schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates raw input. See [`validate`].
    ///
    /// # Errors
    ///
    /// Returns every violation found in `raw`.
    pub fn validate(&self, raw: &RawInputs) -> ValidationResult {
        validate(&self.schema, raw)
    }
}

fn validate_object(
    schema: &Schema,
    input: &Map<String, Value>,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in schema.fields() {
        let field_path = path.key(field.name());
        if let Some(value) = validate_field(field, input.get(field.lookup_key()), &field_path, errors) {
            out.insert(field.name().to_string(), value);
        }
    }
    out
}

fn validate_field(
    field: &FieldSpec,
    raw: Option<&Value>,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<Value> {
    match raw {
        Some(raw) => check_value(field, raw, path, errors),
        None => match field.default_value() {
            // Defaults are checked at registration; coercing them here keeps
            // output in the declared kind, e.g. `1` on a float field is `1.0`.
            Some(default) => {
                let mut unchecked = ValidationErrors::new();
                check_value(field, default, path, &mut unchecked).or_else(|| Some(default.clone()))
            }
            None if field.is_required() => {
                errors.push(Violation::missing(path.clone()));
                None
            }
            None => None,
        },
    }
}

/// Coerces and constrains a present value, recording violations.
///
/// Returns the coerced value when coercion succeeded, even if a constraint
/// failed; callers decide by `errors`.
pub(crate) fn check_value(
    field: &FieldSpec,
    raw: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<Value> {
    if raw.is_null() {
        if field.is_required() {
            errors.push(Violation::mismatch(path.clone(), field.kind().name(), raw));
            return None;
        }
        return Some(Value::Null);
    }

    match field.kind() {
        FieldKind::Object { schema } => {
            let Some(input) = coerce::object(raw) else {
                errors.push(Violation::mismatch(path.clone(), "object", raw));
                return None;
            };
            Some(Value::Object(validate_object(schema, &input, path, errors)))
        }
        FieldKind::List { items, unique } => {
            let mut values = Vec::new();
            for (idx, element) in coerce::elements(raw).iter().enumerate() {
                if let Some(value) = check_value(items, element, &path.index(idx), errors) {
                    if !(*unique && values.contains(&value)) {
                        values.push(value);
                    }
                }
            }
            check_length(field, values.len(), raw, path, errors);
            Some(Value::Array(values))
        }
        kind => {
            let Some(value) = coerce::scalar(kind, raw) else {
                errors.push(Violation::mismatch(path.clone(), kind.name(), raw));
                return None;
            };
            check_constraints(field, &value, raw, path, errors);
            Some(value)
        }
    }
}

// Order: lower bound, upper bound, min length, max length, membership.
fn check_constraints(
    field: &FieldSpec,
    value: &Value,
    raw: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    let constraints = field.constraints();

    if field.kind().is_numeric() {
        if let Some(n) = value.as_f64() {
            if let Some(min) = constraints.minimum {
                if !min.admits_from_below(n) {
                    errors.push(Violation::constraint(
                        path.clone(),
                        ConstraintKind::Minimum {
                            limit: min.limit,
                            exclusive: min.exclusive,
                        },
                        raw,
                    ));
                }
            }
            if let Some(max) = constraints.maximum {
                if !max.admits_from_above(n) {
                    errors.push(Violation::constraint(
                        path.clone(),
                        ConstraintKind::Maximum {
                            limit: max.limit,
                            exclusive: max.exclusive,
                        },
                        raw,
                    ));
                }
            }
        }
    }

    if let Some(text) = value.as_str() {
        if field.kind().has_length() {
            check_length(field, text.chars().count(), raw, path, errors);
        }
        if let FieldKind::Enum { values } = field.kind() {
            if !values.iter().any(|member| member == text) {
                errors.push(Violation::constraint(
                    path.clone(),
                    ConstraintKind::EnumMembership {
                        allowed: values.clone(),
                    },
                    raw,
                ));
            }
        }
    }
}

fn check_length(
    field: &FieldSpec,
    len: usize,
    raw: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    let constraints = field.constraints();
    if let Some(min) = constraints.min_length {
        if len < min {
            errors.push(Violation::constraint(
                path.clone(),
                ConstraintKind::MinLength { min },
                raw,
            ));
        }
    }
    if let Some(max) = constraints.max_length {
        if len > max {
            errors.push(Violation::constraint(
                path.clone(),
                ConstraintKind::MaxLength { max },
                raw,
            ));
        }
    }
}

//! Response-model projection.
//!
//! Handlers may return more than their declared output shape (an input model
//! echoed back, say). Projection keeps only what the output schema declares,
//! so fields like passwords never reach the serializer.

use serde_json::{Map, Value};

use crate::field::FieldKind;
use crate::schema::Schema;

/// Filters `value` through an output schema.
///
/// Objects keep only declared keys, in schema order; nested objects and
/// collections of objects are filtered recursively. Anything else passes
/// through untouched. Projection does not validate.
///
/// # Examples
///
/// ```
/// use param_core::{project, FieldSpec, Schema};
/// use serde_json::json;
///
/// let user_out = Schema::new()
///     .field(FieldSpec::string("username"))
///     .field(FieldSpec::string("email"));
///
/// let user = json!({ "username": "juan", "password": "hunter2", "email": "j@x.io" });
/// assert_eq!(project(&user_out, &user), json!({ "username": "juan", "email": "j@x.io" }));
/// ```
pub fn project(schema: &Schema, value: &Value) -> Value {
    let Value::Object(input) = value else {
        return value.clone();
    };

    let mut out = Map::new();
    for field in schema.fields() {
        if let Some(child) = input.get(field.name()) {
            out.insert(field.name().to_string(), project_kind(field.kind(), child));
        }
    }
    Value::Object(out)
}

fn project_kind(kind: &FieldKind, value: &Value) -> Value {
    match (kind, value) {
        (FieldKind::Object { schema }, _) => project(schema, value),
        (FieldKind::List { items, .. }, Value::Array(elements)) => Value::Array(
            elements
                .iter()
                .map(|element| project_kind(items.kind(), element))
                .collect(),
        ),
        _ => value.clone(),
    }
}

//! Ordered, immutable field sets.
//!
//! Model reuse is done by composition: a restricted output schema is derived
//! from an input schema with [`Schema::omit`] or [`Schema::pick`], and a richer
//! one with [`Schema::extend`]. Fields are shared through `Arc`, so derived
//! schemas reference the base declarations rather than copying them.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FieldPath, SchemaError, ValidationErrors};
use crate::field::{FieldKind, FieldSpec};
use crate::validate::check_value;

/// An ordered sequence of [`FieldSpec`]s.
///
/// Declaration order is significant: it is the order violations are reported
/// in and the order validated values are emitted in.
///
/// # Examples
///
/// ```
/// use param_core::{FieldSpec, Schema, StringFormat};
///
/// let user_in = Schema::new()
///     .field(FieldSpec::string("username").required())
///     .field(FieldSpec::string("password").required())
///     .field(FieldSpec::string("email").format(StringFormat::Email).required())
///     .field(FieldSpec::string("full_name").default_null());
///
/// let user_out = user_in.omit(&["password"]);
/// assert_eq!(user_out.names().collect::<Vec<_>>(), ["username", "email", "full_name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Arc<FieldSpec>>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(Arc::new(spec));
        self
    }

    /// Parses a JSON schema document (an array of field objects) and checks it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Document`] for unreadable documents and any
    /// declaration defect reported by [`Schema::check`].
    pub fn from_json_str(document: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(document)?;
        schema.check()?;
        Ok(schema)
    }

    /// Iterates the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|f| f.as_ref())
    }

    /// Iterates the field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields().map(FieldSpec::name)
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name() == name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A schema holding only the named fields, in this schema's order.
    pub fn pick(&self, names: &[&str]) -> Schema {
        Schema {
            fields: self
                .fields
                .iter()
                .filter(|f| names.contains(&f.name()))
                .cloned()
                .collect(),
        }
    }

    /// A schema holding every field except the named ones.
    pub fn omit(&self, names: &[&str]) -> Schema {
        Schema {
            fields: self
                .fields
                .iter()
                .filter(|f| !names.contains(&f.name()))
                .cloned()
                .collect(),
        }
    }

    /// A schema with `other`'s fields layered over this one.
    ///
    /// A field of `other` replaces the same-named field in place; new fields
    /// are appended in `other`'s order.
    pub fn extend(&self, other: &Schema) -> Schema {
        let mut fields = self.fields.clone();
        for field in &other.fields {
            match fields.iter_mut().find(|f| f.name() == field.name()) {
                Some(slot) => *slot = Arc::clone(field),
                None => fields.push(Arc::clone(field)),
            }
        }
        Schema { fields }
    }

    /// Checks the declaration for defects, recursing into nested schemas.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in declaration order.
    pub fn check(&self) -> Result<(), SchemaError> {
        check_fields(self, "")
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn check_fields(schema: &Schema, prefix: &str) -> Result<(), SchemaError> {
    let mut names = HashSet::new();
    let mut keys = HashSet::new();

    for field in schema.fields() {
        if !names.insert(field.name()) || !keys.insert(field.lookup_key()) {
            return Err(SchemaError::DuplicateField {
                name: qualify(prefix, field.name()),
            });
        }
        check_field(field, &qualify(prefix, field.name()))?;
    }
    Ok(())
}

fn check_field(field: &FieldSpec, qualified: &str) -> Result<(), SchemaError> {
    let kind = field.kind();
    let constraints = field.constraints();

    let unsupported = |constraint: &'static str| SchemaError::UnsupportedConstraint {
        field: qualified.to_string(),
        constraint,
        kind: kind.name(),
    };

    if !kind.is_numeric() {
        if constraints.minimum.is_some() {
            return Err(unsupported("minimum"));
        }
        if constraints.maximum.is_some() {
            return Err(unsupported("maximum"));
        }
    }
    if !kind.has_length() {
        if constraints.min_length.is_some() {
            return Err(unsupported("min_length"));
        }
        if constraints.max_length.is_some() {
            return Err(unsupported("max_length"));
        }
    }

    let bounds = [constraints.minimum, constraints.maximum];
    if bounds.iter().flatten().any(|b| !b.limit.is_finite()) {
        return Err(SchemaError::NonFiniteBound {
            field: qualified.to_string(),
        });
    }
    if let (Some(lo), Some(hi)) = (constraints.minimum, constraints.maximum) {
        let empty = lo.limit > hi.limit || (lo.limit == hi.limit && (lo.exclusive || hi.exclusive));
        if empty {
            return Err(SchemaError::InvertedBounds {
                field: qualified.to_string(),
            });
        }
    }
    if let (Some(min), Some(max)) = (constraints.min_length, constraints.max_length) {
        if min > max {
            return Err(SchemaError::InvertedLength {
                field: qualified.to_string(),
            });
        }
    }

    match kind {
        FieldKind::Enum { values } if values.is_empty() => {
            return Err(SchemaError::EmptyEnum {
                field: qualified.to_string(),
            });
        }
        FieldKind::Object { schema } => check_fields(schema, qualified)?,
        FieldKind::List { items, .. } => check_field(items, &format!("{}[]", qualified))?,
        _ => {}
    }

    if let Some(default) = field.default_value() {
        if default.is_null() && !field.is_required() {
            return Ok(());
        }
        let mut errors = ValidationErrors::new();
        check_value(field, default, &FieldPath::field(field.name()), &mut errors);
        if !errors.is_empty() {
            return Err(SchemaError::InvalidDefault {
                field: qualified.to_string(),
                errors,
            });
        }
    }
    Ok(())
}

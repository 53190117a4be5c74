//! Field declarations.
//!
//! A [`FieldSpec`] describes one expected input: its kind, whether it is
//! required, its default and its constraints. Specs are built once, at route
//! registration, and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::schema::Schema;

/// Additional shape a string value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    /// An e-mail address (`local@domain`)
    Email,
    /// An absolute URL with a host
    Url,
}

impl StringFormat {
    /// Name reported in type mismatches.
    pub fn name(self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::Url => "url",
        }
    }
}

/// The declared kind of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Signed 64-bit integer
    Integer,
    /// Finite 64-bit float
    Float,
    /// Text, optionally restricted to a format
    String {
        /// Required shape of the text
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<StringFormat>,
    },
    /// `true` / `false`
    Boolean,
    /// One of a fixed set of string members
    Enum {
        /// The declared members
        values: Vec<String>,
    },
    /// A nested object validated against its own schema
    Object {
        /// Schema of the nested object
        schema: Schema,
    },
    /// A homogeneous collection
    List {
        /// Spec applied to every element; its name is ignored
        items: Box<FieldSpec>,
        /// Set semantics: duplicates are dropped, first occurrence kept
        #[serde(default)]
        unique: bool,
    },
}

impl FieldKind {
    /// Human-readable kind name, as used in type mismatches.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::String { format: Some(fmt) } => fmt.name(),
            FieldKind::String { format: None } => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Object { .. } => "object",
            FieldKind::List { .. } => "list",
        }
    }

    /// Whether numeric bounds apply to this kind.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }

    /// Whether length bounds apply to this kind.
    pub fn has_length(&self) -> bool {
        matches!(self, FieldKind::String { .. } | FieldKind::List { .. })
    }
}

/// A numeric bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// The limit value
    pub limit: f64,
    /// Whether the limit itself is rejected (`gt`/`lt` rather than `ge`/`le`)
    #[serde(default)]
    pub exclusive: bool,
}

impl Bound {
    /// An inclusive bound.
    pub fn inclusive(limit: f64) -> Self {
        Self {
            limit,
            exclusive: false,
        }
    }

    /// An exclusive bound.
    pub fn exclusive(limit: f64) -> Self {
        Self {
            limit,
            exclusive: true,
        }
    }

    /// Whether `value` satisfies this bound taken as a lower bound.
    pub fn admits_from_below(&self, value: f64) -> bool {
        if self.exclusive {
            value > self.limit
        } else {
            value >= self.limit
        }
    }

    /// Whether `value` satisfies this bound taken as an upper bound.
    pub fn admits_from_above(&self, value: f64) -> bool {
        if self.exclusive {
            value < self.limit
        } else {
            value <= self.limit
        }
    }
}

/// Constraints evaluated after a value has been coerced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Numeric lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    /// Numeric upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
    /// Minimum string length (characters) or collection size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length (characters) or collection size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Constraints {
    /// Whether no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
    }
}

/// Static description of one expected input field.
///
/// # Examples
///
/// ```
/// use param_core::FieldSpec;
///
/// let cat_id = FieldSpec::integer("cat_id")
///     .required()
///     .ge(10.0)
///     .title("The ID of the cat, that must be greater than 10");
///
/// assert!(cat_id.is_required());
/// assert_eq!(cat_id.constraints().minimum.map(|b| b.limit), Some(10.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    name: String,
    #[serde(flatten)]
    kind: FieldKind,
    #[serde(default)]
    required: bool,
    // `"default": null` must survive as `Some(Null)`, not collapse to `None`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    default: Option<Value>,
    #[serde(default, skip_serializing_if = "Constraints::is_empty")]
    constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FieldSpec {
    /// Creates an optional field of the given kind, without default or constraints.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            constraints: Constraints::default(),
            alias: None,
            title: None,
            description: None,
        }
    }

    /// An integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// A float field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    /// A free-form string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String { format: None })
    }

    /// A boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// An enumerated field accepting exactly the given members.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// A nested object field.
    pub fn object(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Object { schema })
    }

    /// A collection field whose elements are validated against `items`.
    pub fn list(name: impl Into<String>, items: FieldSpec) -> Self {
        Self::new(
            name,
            FieldKind::List {
                items: Box::new(items),
                unique: false,
            },
        )
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value substituted when the field is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Substitutes `null` when the field is absent.
    pub fn default_null(self) -> Self {
        self.default(Value::Null)
    }

    /// Inclusive lower bound.
    pub fn ge(mut self, limit: f64) -> Self {
        self.constraints.minimum = Some(Bound::inclusive(limit));
        self
    }

    /// Exclusive lower bound.
    pub fn gt(mut self, limit: f64) -> Self {
        self.constraints.minimum = Some(Bound::exclusive(limit));
        self
    }

    /// Inclusive upper bound.
    pub fn le(mut self, limit: f64) -> Self {
        self.constraints.maximum = Some(Bound::inclusive(limit));
        self
    }

    /// Exclusive upper bound.
    pub fn lt(mut self, limit: f64) -> Self {
        self.constraints.maximum = Some(Bound::exclusive(limit));
        self
    }

    /// Minimum string length or collection size.
    pub fn min_length(mut self, min: usize) -> Self {
        self.constraints.min_length = Some(min);
        self
    }

    /// Maximum string length or collection size.
    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.max_length = Some(max);
        self
    }

    /// Restricts a string field to a format. No effect on other kinds.
    pub fn format(mut self, format: StringFormat) -> Self {
        if let FieldKind::String { format: slot } = &mut self.kind {
            *slot = Some(format);
        }
        self
    }

    /// Gives a collection field set semantics. No effect on other kinds.
    pub fn unique(mut self) -> Self {
        if let FieldKind::List { unique, .. } = &mut self.kind {
            *unique = true;
        }
        self
    }

    /// Looks the field up under `alias` in raw input.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Documentation title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Documentation description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The field name used in validated output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key looked up in raw input: the alias when set, else the name.
    pub fn lookup_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// The declared kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether absence without default is a violation.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The value substituted on absence.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The declared constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The lookup alias, if any.
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Documentation title, if any.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Documentation description, if any.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_sets_bounds() {
        let spec = FieldSpec::integer("item_id").required().ge(0.0).le(1000.0);
        assert_eq!(spec.constraints().minimum, Some(Bound::inclusive(0.0)));
        assert_eq!(spec.constraints().maximum, Some(Bound::inclusive(1000.0)));
        assert!(spec.is_required());
    }

    #[test]
    fn bounds_respect_exclusivity() {
        assert!(Bound::inclusive(0.0).admits_from_below(0.0));
        assert!(!Bound::exclusive(0.0).admits_from_below(0.0));
        assert!(Bound::inclusive(5.0).admits_from_above(5.0));
        assert!(!Bound::exclusive(5.0).admits_from_above(5.0));
    }

    #[test]
    fn format_only_applies_to_strings() {
        let email = FieldSpec::string("email").format(StringFormat::Email);
        assert_eq!(email.kind().name(), "email");

        let count = FieldSpec::integer("count").format(StringFormat::Email);
        assert_eq!(count.kind(), &FieldKind::Integer);
    }

    #[test]
    fn alias_changes_lookup_key_only() {
        let spec = FieldSpec::string("item_query").alias("item-query");
        assert_eq!(spec.name(), "item_query");
        assert_eq!(spec.lookup_key(), "item-query");
    }

    #[test]
    fn deserializes_from_document() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "name": "q",
            "type": "string",
            "default": null,
            "constraints": { "min_length": 3, "max_length": 50 },
            "title": "Query string"
        }))
        .expect("valid field document");

        assert_eq!(spec.name(), "q");
        assert_eq!(spec.default_value(), Some(&Value::Null));
        assert_eq!(spec.constraints().min_length, Some(3));
        assert_eq!(spec.title_text(), Some("Query string"));
        assert!(!spec.is_required());
    }

    #[test]
    fn absent_default_stays_none() {
        let spec: FieldSpec =
            serde_json::from_value(json!({ "name": "n", "type": "integer", "required": true }))
                .expect("valid field document");
        assert_eq!(spec.default_value(), None);
    }

    #[test]
    fn list_document_round_trips_unique_flag() {
        let spec = FieldSpec::list("tags", FieldSpec::string("tag")).unique();
        let doc = serde_json::to_value(&spec).expect("serializable");
        assert_eq!(doc["type"], "list");
        assert_eq!(doc["unique"], true);

        let back: FieldSpec = serde_json::from_value(doc).expect("deserializable");
        assert_eq!(back, spec);
    }
}

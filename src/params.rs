use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::field::{FieldKind, FieldSpec};
use crate::raw::RawInputs;
use crate::schema::Schema;

/// Validated, coerced values, in schema declaration order.
///
/// `Params` is the `Ok` side of a [`ValidationResult`](crate::ValidationResult).
/// Every value in it has the kind its field declares and satisfies every
/// declared constraint.
///
/// # Construction Invariants
///
/// There is no public constructor: only the validator builds `Params`, so
/// holding one is proof that validation ran.
///
/// ```compile_fail
/// use param_core::Params;
///
/// let forged = Params::new_unchecked(Default::default());
/// ```
///
/// # Examples
///
/// ```
/// use param_core::{validate, FieldSpec, RawInputs, Schema};
///
/// let schema = Schema::new().field(FieldSpec::integer("cat_id").required().ge(10.0));
/// let raw: RawInputs = [("cat_id", "15")].into_iter().collect();
///
/// let params = validate(&schema, &raw).expect("15 is at least 10");
/// assert_eq!(params.get_i64("cat_id"), Some(15));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    pub(crate) fn new_unchecked(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// The value of a field, if present in the output.
    ///
    /// Optional fields without default are absent when not supplied; fields
    /// with a `null` default are present as `Value::Null`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// An integer field.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// A float field (integers widen).
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// A string or enum field.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// A boolean field.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Whether the output holds the field (including as `null`).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of fields in the output.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the output holds no field.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Feeds the coerced values back as raw input for `schema`.
    ///
    /// Output is keyed by field name while input is looked up by alias, so
    /// every value is written under its field's lookup key, nested objects and
    /// collection elements included. Re-validating the result against the
    /// schema that produced these params yields these same params.
    ///
    /// # Examples
    ///
    /// ```
    /// use param_core::{validate, FieldSpec, RawInputs, Schema};
    ///
    /// let schema = Schema::new().field(FieldSpec::string("item_query").alias("item-query"));
    /// let raw: RawInputs = [("item-query", "x")].into_iter().collect();
    ///
    /// let params = validate(&schema, &raw).unwrap();
    /// assert_eq!(params.to_raw(&schema), raw);
    /// assert_eq!(validate(&schema, &params.to_raw(&schema)), Ok(params));
    /// ```
    pub fn to_raw(&self, schema: &Schema) -> RawInputs {
        let mut raw = RawInputs::new();
        for (key, value) in raw_object(schema, &self.values) {
            raw.insert_json(key, value);
        }
        raw
    }

    /// Deserializes the values into a caller-defined type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Deserialize`] when the target type does not match
    /// the validated shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use param_core::{validate, FieldSpec, RawInputs, Schema};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Paging {
    ///     skip: i64,
    ///     limit: i64,
    /// }
    ///
    /// let schema = Schema::new()
    ///     .field(FieldSpec::integer("skip").default(0))
    ///     .field(FieldSpec::integer("limit").default(10));
    /// let raw: RawInputs = [("skip", "1")].into_iter().collect();
    ///
    /// let paging: Paging = validate(&schema, &raw).unwrap().deserialize().unwrap();
    /// assert_eq!((paging.skip, paging.limit), (1, 10));
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(Error::Deserialize)
    }

    /// Consumes the params into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

fn raw_object(schema: &Schema, values: &Map<String, Value>) -> Map<String, Value> {
    schema
        .fields()
        .filter_map(|field| {
            let value = values.get(field.name())?;
            Some((field.lookup_key().to_string(), raw_value(field, value)))
        })
        .collect()
}

fn raw_value(field: &FieldSpec, value: &Value) -> Value {
    match (field.kind(), value) {
        (FieldKind::Object { schema }, Value::Object(values)) => {
            Value::Object(raw_object(schema, values))
        }
        (FieldKind::List { items, .. }, Value::Array(elements)) => Value::Array(
            elements
                .iter()
                .map(|element| raw_value(items, element))
                .collect(),
        ),
        _ => value.clone(),
    }
}

impl AsRef<Map<String, Value>> for Params {
    fn as_ref(&self) -> &Map<String, Value> {
        &self.values
    }
}

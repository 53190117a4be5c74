//! Untrusted input as handed over by the boundary, before validation.

use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::coerce::type_name;
use crate::error::Error;

/// Untrusted, uncoerced input: a mapping of names to strings or JSON values.
///
/// `RawInputs` is what the boundary hands to the validator. Nothing in it has
/// been checked; the only way to obtain typed values from it is
/// [`validate`](crate::validate()).
///
/// # Examples
///
/// ```
/// use param_core::RawInputs;
/// use serde_json::json;
///
/// let mut raw = RawInputs::new();
/// raw.insert_str("cat_id", "15");
/// raw.append_str("tag", "a");
/// raw.append_str("tag", "b");
///
/// assert_eq!(raw.get("cat_id"), Some(&json!("15")));
/// assert_eq!(raw.get("tag"), Some(&json!(["a", "b"])));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputs {
    values: Map<String, Value>,
}

impl RawInputs {
    /// Creates an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON document, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnObject`] for any other JSON value.
    pub fn from_json(document: Value) -> Result<Self, Error> {
        match document {
            Value::Object(values) => Ok(Self { values }),
            other => Err(Error::NotAnObject {
                found: type_name(&other),
            }),
        }
    }

    /// Parses a JSON text, which must hold an object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBody`] for invalid JSON and
    /// [`Error::NotAnObject`] for non-object documents.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let document = serde_json::from_str(text).map_err(Error::MalformedBody)?;
        Self::from_json(document)
    }

    /// Sets a string input, replacing any earlier value.
    pub fn insert_str(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), Value::String(value.into()));
    }

    /// Adds a string input, turning repeated names into a collection.
    pub fn append_str(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = Value::String(value.into());
        match self.values.entry(name.into()) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    /// Sets a structured input, replacing any earlier value.
    pub fn insert_json(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Looks an input up by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether an input with this name was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of supplied inputs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates inputs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// Collects string pairs; a repeated name keeps the last value.
impl<K, V> FromIterator<(K, V)> for RawInputs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawInputs::new();
        for (name, value) in iter {
            raw.insert_str(name, value);
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_str_replaces() {
        let mut raw = RawInputs::new();
        raw.insert_str("q", "first");
        raw.insert_str("q", "second");
        assert_eq!(raw.get("q"), Some(&json!("second")));
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn append_str_accumulates() {
        let mut raw = RawInputs::new();
        raw.append_str("tag", "a");
        assert_eq!(raw.get("tag"), Some(&json!("a")));
        raw.append_str("tag", "b");
        raw.append_str("tag", "c");
        assert_eq!(raw.get("tag"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn from_json_requires_object() {
        assert!(RawInputs::from_json(json!({"a": 1})).is_ok());
        assert!(matches!(
            RawInputs::from_json(json!([1, 2])),
            Err(Error::NotAnObject { found: "array" })
        ));
    }

    #[test]
    fn from_json_str_reports_malformed_text() {
        assert!(matches!(
            RawInputs::from_json_str("{\"a\": "),
            Err(Error::MalformedBody(_))
        ));
        let raw = RawInputs::from_json_str(r#"{"name": "Foo", "price": 3.5}"#).expect("valid");
        assert_eq!(raw.get("price"), Some(&json!(3.5)));
    }

    #[test]
    fn collects_pairs_in_order() {
        let raw: RawInputs = [("skip", "1"), ("limit", "5")].into_iter().collect();
        let names: Vec<_> = raw.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["skip", "limit"]);
        assert!(raw.contains("limit"));
        assert!(!raw.contains("q"));
    }
}

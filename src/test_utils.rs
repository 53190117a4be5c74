//! Shared proptest strategies for unit tests.

use proptest::prelude::*;
use serde_json::Value;

/// Field names as they appear in schemas: lowercase snake case.
pub fn arb_field_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

/// Printable ASCII text of up to `max_len` characters.
pub fn arb_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0x20u8..0x7f, 0..=max_len)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

/// Any JSON scalar, including null.
pub fn arb_scalar_json() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        arb_text(20).prop_map(Value::String),
    ]
}

/// An inclusive integer range `(lo, hi)` with `lo <= hi`.
pub fn arb_int_range() -> impl Strategy<Value = (i64, i64)> {
    (-10_000i64..10_000, 0i64..10_000).prop_map(|(lo, width)| (lo, lo + width))
}

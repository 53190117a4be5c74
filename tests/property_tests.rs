//! Integration property tests for param-core.
//!
//! These tests validate cross-module invariants and end-to-end flows
//! using property-based testing.

use param_core::web::{validate_request, Endpoint, RequestAdapter};
use param_core::{project, validate, FieldSpec, RawInputs, Schema, ViolationKind};
use proptest::prelude::*;
use serde_json::{json, Value};

// Strategy: Generate a set of distinct field names
fn arb_field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(prop::string::string_regex("[a-z]{1,8}").unwrap(), 1..8)
        .prop_map(|names| names.into_iter().collect())
}

// Strategy: Generate alias spellings distinct from the field names below
fn arb_alias() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z-]{0,8}").unwrap()
}

#[test]
fn aliased_output_revalidates_to_itself() {
    let schema = Schema::new()
        .field(FieldSpec::string("item_query").alias("item-query").required());
    let input: RawInputs = [("item-query", "x")].into_iter().collect();

    let first = validate(&schema, &input).expect("alias supplied");
    assert_eq!(first.get_str("item_query"), Some("x"));
    assert_eq!(validate(&schema, &first.to_raw(&schema)), Ok(first));

    let nested = Schema::new().field(FieldSpec::object(
        "o",
        Schema::new().field(FieldSpec::integer("n").alias("N").required()),
    ));
    let input = RawInputs::from_json(json!({ "o": { "N": "3" } })).expect("object body");

    let first = validate(&nested, &input).expect("nested alias supplied");
    assert_eq!(first.get("o"), Some(&json!({ "n": 3 })));
    assert_eq!(validate(&nested, &first.to_raw(&nested)), Ok(first));
}

// Strategy: Generate query text that is never a valid integer
fn arb_non_integer() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z ]{0,10}").unwrap()
}

proptest! {
    /// Property: every missing required field is reported, once each, in order
    ///
    /// Validation never stops at the first failure; a schema of N required
    /// fields validated against empty input yields exactly N violations.
    #[test]
    fn proptest_every_missing_field_is_reported(names in arb_field_names()) {
        let schema = names
            .iter()
            .fold(Schema::new(), |schema, name| schema.field(FieldSpec::integer(name.clone()).required()));

        let errors = validate(&schema, &RawInputs::new()).unwrap_err();

        prop_assert_eq!(errors.len(), names.len());
        for (violation, name) in errors.iter().zip(&names) {
            prop_assert_eq!(violation.path.to_string(), name.clone());
            prop_assert_eq!(&violation.kind, &ViolationKind::MissingRequiredField);
        }
    }

    /// Property: absent optional fields always take their declared default
    #[test]
    fn proptest_defaults_are_substituted(default in any::<i64>(), skip_present in any::<bool>(), skip in 0i64..100) {
        let schema = Schema::new()
            .field(FieldSpec::integer("skip").default(0))
            .field(FieldSpec::integer("limit").default(default));

        let mut raw = RawInputs::new();
        if skip_present {
            raw.insert_str("skip", skip.to_string());
        }

        let params = validate(&schema, &raw).expect("defaults are valid");
        prop_assert_eq!(params.get_i64("limit"), Some(default));
        prop_assert_eq!(params.get_i64("skip"), Some(if skip_present { skip } else { 0 }));
    }

    /// Property: string lengths inside the window are accepted, outside rejected
    #[test]
    fn proptest_length_window(len in 0usize..80) {
        let schema = Schema::new()
            .field(FieldSpec::string("q").default_null().min_length(3).max_length(50));
        let raw: RawInputs = [("q", "q".repeat(len))].into_iter().collect();

        let result = validate(&schema, &raw);
        prop_assert_eq!(result.is_ok(), (3..=50).contains(&len));
    }

    /// Property: non-numeric text is always a type mismatch carrying the input
    #[test]
    fn proptest_non_integer_text_is_mismatch(text in arb_non_integer()) {
        let schema = Schema::new().field(FieldSpec::integer("item_id").required());
        let raw: RawInputs = [("item_id", text.clone())].into_iter().collect();

        let errors = validate(&schema, &raw).unwrap_err();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(&errors.as_slice()[0].input, &Some(Value::String(text)));
    }

    /// Property: re-validating accepted output is stable whatever the aliases
    #[test]
    fn proptest_revalidation_through_aliases(alias in arb_alias(), n in any::<i64>(), tags in prop::collection::vec("[a-d]", 1..5)) {
        let schema = Schema::new()
            .field(FieldSpec::integer("n").alias(alias.clone()).required())
            .field(FieldSpec::object(
                "meta",
                Schema::new().field(
                    FieldSpec::list("tags", FieldSpec::string("tag"))
                        .alias(format!("{alias}-tags"))
                        .unique()
                        .max_length(3),
                ),
            ).default_null());

        let mut raw = RawInputs::new();
        raw.insert_str(alias.clone(), n.to_string());
        raw.insert_json("meta", json!({ (format!("{alias}-tags")): tags }));

        if let Ok(first) = validate(&schema, &raw) {
            prop_assert_eq!(first.get_i64("n"), Some(n));
            let again = validate(&schema, &first.to_raw(&schema)).expect("output revalidates");
            prop_assert_eq!(again, first);
        }
    }

    /// Property: projection never leaks a field the output schema omits
    #[test]
    fn proptest_projection_never_leaks_omitted(names in arb_field_names(), secret in "[a-z0-9]{1,16}") {
        let full = names
            .iter()
            .fold(Schema::new(), |schema, name| schema.field(FieldSpec::string(name.clone())));
        let hidden = names[0].as_str();
        let out = full.omit(&[hidden]);

        let value: Value = names.iter().map(|n| (n.clone(), json!(secret))).collect::<serde_json::Map<_, _>>().into();
        let projected = project(&out, &value);

        prop_assert!(projected.get(hidden).is_none());
        prop_assert_eq!(projected.as_object().map(|m| m.len()), Some(names.len() - 1));
    }

    /// Property: every rejected request source is named in its report
    #[test]
    fn proptest_rejections_locate_their_source(bad_path in any::<bool>(), bad_query in any::<bool>()) {
        let endpoint = Endpoint::new()
            .path(FieldSpec::integer("item_id").required())
            .query(FieldSpec::integer("limit").default(10));

        let mut adapter = RequestAdapter::new("req-prop".to_string());
        adapter.add_path_param("item_id".to_string(), if bad_path { "x" } else { "1" }.to_string());
        adapter.add_query_param("limit".to_string(), if bad_query { "y" } else { "2" }.to_string());

        match validate_request(&endpoint, &adapter) {
            Ok(_) => prop_assert!(!bad_path && !bad_query),
            Err(rejection) => {
                let sources: Vec<_> = rejection
                    .report()
                    .detail
                    .iter()
                    .map(|d| d.loc[0].clone())
                    .collect();
                let mut expected = Vec::new();
                if bad_path {
                    expected.push(json!("path"));
                }
                if bad_query {
                    expected.push(json!("query"));
                }
                prop_assert_eq!(sources, expected);
            }
        }
    }
}

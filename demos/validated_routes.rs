//! Validated routes demonstration.
//!
//! This example shows how a web framework integrates param-core:
//! 1. Parse the URL query and route captures into a RequestAdapter
//! 2. Hand the adapter to a handler, which validates every source
//! 3. Render either the handler's JSON or the 422/400 rejection report
//!
//! Run with: `RUST_LOG=param_core=debug cargo run --example validated_routes`

use param_core::web::example_handler::{
    create_item, create_product, create_user, get_model, list_names, read_cat,
    read_protected_items, read_validated_items, EXPECTED_KEY,
};
use param_core::web::{Rejection, RequestAdapter};
use serde_json::{json, Value};

/// Simulates request ID generation
mod request_id {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(1);

    pub fn next() -> String {
        format!("req-{:08x}", COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

/// Simulates what a framework does before calling a handler
fn request(
    path: &[(&str, &str)],
    query: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> RequestAdapter {
    let mut adapter = RequestAdapter::new(request_id::next());
    for (key, value) in path {
        adapter.add_path_param((*key).to_string(), (*value).to_string());
    }
    adapter.add_query_string(query);
    for (key, value) in headers {
        adapter.add_header((*key).to_string(), (*value).to_string());
    }
    if let Some(body) = body {
        adapter.set_body(body);
    }
    adapter
}

/// Simulates the framework rendering a handler outcome
fn respond(route: &str, outcome: Result<Value, Rejection>) {
    println!("\n=== {} ===", route);
    match outcome {
        Ok(value) => {
            println!("200 OK");
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        }
        Err(rejection) => {
            println!("{}", rejection.status());
            println!(
                "{}",
                serde_json::to_string_pretty(rejection.report()).unwrap_or_default()
            );
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    respond("GET /cats/15?q=tabby", read_cat(&request(&[("cat_id", "15")], "q=tabby", &[], None)));
    respond("GET /cats/5", read_cat(&request(&[("cat_id", "5")], "", &[], None)));

    respond(
        "GET /model/Light%20GBM",
        get_model(&request(&[("model_name", "Light GBM")], "", &[], None)),
    );
    respond(
        "GET /model/ResNet",
        get_model(&request(&[("model_name", "ResNet")], "", &[], None)),
    );

    respond("GET /names/?skip=1", list_names(&request(&[], "skip=1", &[], None)));
    respond("GET /validated-items/?q=ab", read_validated_items(&request(&[], "q=ab", &[], None)));

    respond(
        "POST /items/",
        create_item(&request(&[], "", &[], Some(json!({ "name": "Foo", "price": 10, "tax": 1.5 })))),
    );
    respond(
        "POST /items/ (everything wrong)",
        create_item(&request(&[], "", &[], Some(json!({ "description": 3, "price": "free" })))),
    );

    respond(
        "POST /products/7",
        create_product(&request(
            &[("product_id", "7")],
            "",
            &[],
            Some(json!({
                "name": "Foo",
                "price": 42,
                "tags": ["rock", "metal", "rock"],
                "image": { "url": "http://example.com/baz.jpg", "name": "The Foo live" }
            })),
        )),
    );

    respond(
        "POST /user/",
        create_user(&request(
            &[],
            "",
            &[],
            Some(json!({
                "username": "juan",
                "password": "hunter2",
                "email": "juan@example.com"
            })),
        )),
    );

    respond(
        "GET /items/ (bad token)",
        read_protected_items(&request(
            &[],
            "",
            &[("X-Token", "guess"), ("X-Key", EXPECTED_KEY)],
            None,
        )),
    );
}

//! Example handlers demonstrating declarative parameter validation.
//!
//! This module shows realistic request handler flows: every route declares
//! its parameters once as a static [`Endpoint`], calls [`validate_request`],
//! and only then runs its own logic against typed [`Params`].
//!
//! **These examples are for documentation and testing only.**
//! They demonstrate proper usage patterns without requiring actual HTTP infrastructure.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::field::{FieldSpec, StringFormat};
use crate::params::Params;
use crate::response::project;
use crate::schema::Schema;

use super::{validate_request, Endpoint, ExtractRawInputs, Rejection};

/// Header value `read_protected_items` expects in `X-Token`.
pub const EXPECTED_TOKEN: &str = "fake-super-secret-token";
/// Header value `read_protected_items` expects in `X-Key`.
pub const EXPECTED_KEY: &str = "fake-super-secret-key";

const FAKE_NAMES: [&str; 2] = ["Juan", "Cristobal"];

/// The models `get_model` knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelName {
    /// Deep-learning model
    #[serde(rename = "AlexNet")]
    AlexNet,
    /// Gradient-boosting model
    #[serde(rename = "Light GBM")]
    LightGbm,
}

impl ModelName {
    /// Every member, in declaration order.
    pub const ALL: [ModelName; 2] = [ModelName::AlexNet, ModelName::LightGbm];

    /// The wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelName::AlexNet => "AlexNet",
            ModelName::LightGbm => "Light GBM",
        }
    }
}

/// Request body for `create_item` and `update_item`.
pub static ITEM: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldSpec::string("name").required())
        .field(FieldSpec::string("description").default_null())
        .field(
            FieldSpec::float("price")
                .required()
                .gt(0.0)
                .title("My Price")
                .description("Some desc"),
        )
        .field(FieldSpec::float("tax").default_null())
});

/// Nested image model of a product.
pub static IMAGE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldSpec::string("url").required().format(StringFormat::Url))
        .field(FieldSpec::string("name").required())
});

/// Request body for `create_product`: an item without the price bound, plus
/// tags and an optional image.
pub static PRODUCT: LazyLock<Schema> = LazyLock::new(|| {
    ITEM.extend(
        &Schema::new()
            .field(FieldSpec::float("price").required())
            .field(
                FieldSpec::list("tags", FieldSpec::string("tag"))
                    .unique()
                    .default(json!([])),
            )
            .field(FieldSpec::object("image", IMAGE.clone()).default_null()),
    )
});

/// Request body for `create_user`.
pub static USER_IN: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field(FieldSpec::string("username").required())
        .field(FieldSpec::string("password").required())
        .field(FieldSpec::string("email").required().format(StringFormat::Email))
        .field(FieldSpec::string("full_name").default_null())
});

/// Response model of `create_user`: the input without its password.
pub static USER_OUT: LazyLock<Schema> = LazyLock::new(|| USER_IN.omit(&["password"]));

static READ_ITEM: LazyLock<Endpoint> =
    LazyLock::new(|| Endpoint::new().path(FieldSpec::integer("item_id").required()));

static GET_MODEL: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new().path(
        FieldSpec::enumeration("model_name", ModelName::ALL.map(ModelName::as_str)).required(),
    )
});

static READ_FILE: LazyLock<Endpoint> =
    LazyLock::new(|| Endpoint::new().path(FieldSpec::string("file_path").required()));

static LIST_NAMES: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new()
        .query(FieldSpec::integer("skip").default(0).ge(0.0))
        .query(FieldSpec::integer("limit").default(10).ge(0.0))
});

static COMMON_PARAMETERS: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new()
        .query(FieldSpec::string("q").default_null())
        .query(FieldSpec::integer("skip").default(0))
        .query(FieldSpec::integer("limit").default(100))
});

static CREATE_ITEM: LazyLock<Endpoint> = LazyLock::new(|| Endpoint::new().body(ITEM.clone()));

static READ_VALIDATED_ITEMS: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new().query(
        FieldSpec::string("q")
            .default_null()
            .min_length(3)
            .max_length(50)
            .title("Query string")
            .description("Some description to show in the docs"),
    )
});

static READ_CAT: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new()
        .path(
            FieldSpec::integer("cat_id")
                .required()
                .ge(10.0)
                .title("The ID of the cat, that must be greater than 10"),
        )
        .query(FieldSpec::string("q").default_null())
});

static UPDATE_ITEM: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new()
        .path(
            FieldSpec::integer("item_id")
                .required()
                .ge(0.0)
                .le(1000.0)
                .title("The ID of the item to get"),
        )
        .query(FieldSpec::string("q").default_null())
        .optional_body(ITEM.clone())
});

static CREATE_PRODUCT: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new()
        .path(FieldSpec::integer("product_id").required())
        .body(PRODUCT.clone())
});

static CREATE_USER: LazyLock<Endpoint> = LazyLock::new(|| Endpoint::new().body(USER_IN.clone()));

static READ_PROTECTED_ITEMS: LazyLock<Endpoint> = LazyLock::new(|| {
    Endpoint::new()
        .header(FieldSpec::string("x_token").required())
        .header(FieldSpec::string("x_key").required())
});

/// Every route of this module with its endpoint, for registration-time checks.
pub fn endpoints() -> [(&'static str, &'static Endpoint); 12] {
    [
        ("read_item", &*READ_ITEM),
        ("get_model", &*GET_MODEL),
        ("read_file", &*READ_FILE),
        ("list_names", &*LIST_NAMES),
        ("read_common", &*COMMON_PARAMETERS),
        ("create_item", &*CREATE_ITEM),
        ("read_validated_items", &*READ_VALIDATED_ITEMS),
        ("read_cat", &*READ_CAT),
        ("update_item", &*UPDATE_ITEM),
        ("create_product", &*CREATE_PRODUCT),
        ("create_user", &*CREATE_USER),
        ("read_protected_items", &*READ_PROTECTED_ITEMS),
    ]
}

fn with_optional_q(mut results: Map<String, Value>, query: &Params) -> Value {
    if let Some(q) = query.get_str("q").filter(|q| !q.is_empty()) {
        results.insert("q".to_string(), json!(q));
    }
    Value::Object(results)
}

/// `GET /items/{item_id}`
///
/// # Examples
///
/// ```
/// use param_core::web::{example_handler::read_item, RequestAdapter};
/// use serde_json::json;
///
/// let mut adapter = RequestAdapter::new("req-item".to_string());
/// adapter.add_path_param("item_id".to_string(), "42".to_string());
///
/// assert_eq!(read_item(&adapter).unwrap(), json!({ "item_id": 42 }));
/// ```
pub fn read_item<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let validated = validate_request(&READ_ITEM, request)?;
    Ok(json!({ "item_id": validated.path.get("item_id") }))
}

/// `GET /model/{model_name}`
///
/// The match is exhaustive: anything outside [`ModelName`] was already
/// rejected by validation.
pub fn get_model<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    #[derive(Deserialize)]
    struct ModelPath {
        model_name: ModelName,
    }

    let validated = validate_request(&GET_MODEL, request)?;
    let ModelPath { model_name } = validated.path.deserialize()?;
    let msg = match model_name {
        ModelName::AlexNet => "DL",
        ModelName::LightGbm => "LGBM",
    };
    Ok(json!({ "model name": model_name.as_str(), "msg": msg }))
}

/// `GET /files/{file_path:path}`
pub fn read_file<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let validated = validate_request(&READ_FILE, request)?;
    Ok(json!({ "file_path": validated.path.get("file_path") }))
}

/// `GET /names/?skip=..&limit=..`
pub fn list_names<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    #[derive(Deserialize)]
    struct Paging {
        skip: usize,
        limit: usize,
    }

    let validated = validate_request(&LIST_NAMES, request)?;
    let Paging { skip, limit } = validated.query.deserialize()?;
    let names = FAKE_NAMES
        .iter()
        .skip(skip)
        .take(limit)
        .map(|name| json!({ "name": name }))
        .collect();
    Ok(Value::Array(names))
}

/// `GET /items/` and `GET /users/` sharing one set of common query parameters.
pub fn read_common<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let validated = validate_request(&COMMON_PARAMETERS, request)?;
    Ok(validated.query.into_value())
}

/// `POST /items/`
///
/// Echoes the item, adding `price_w_tax` when a non-zero tax was sent.
pub fn create_item<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let mut item = validate_request(&CREATE_ITEM, request)?.into_body_value();
    let price = item.get("price").and_then(Value::as_f64);
    let tax = item.get("tax").and_then(Value::as_f64).filter(|tax| *tax != 0.0);
    if let (Some(price), Some(tax), Some(fields)) = (price, tax, item.as_object_mut()) {
        fields.insert("price_w_tax".to_string(), json!(price + tax));
    }
    Ok(item)
}

/// `GET /validated-items/?q=..`
pub fn read_validated_items<R: ExtractRawInputs + ?Sized>(
    request: &R,
) -> Result<Value, Rejection> {
    let validated = validate_request(&READ_VALIDATED_ITEMS, request)?;
    let mut results = Map::new();
    results.insert(
        "items".to_string(),
        json!([{ "item_id": "Foo" }, { "item_id": "Bar" }]),
    );
    Ok(with_optional_q(results, &validated.query))
}

/// `GET /cats/{cat_id}`
///
/// # Examples
///
/// ```
/// use param_core::web::{example_handler::read_cat, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-cat".to_string());
/// adapter.add_path_param("cat_id".to_string(), "5".to_string());
///
/// let rejection = read_cat(&adapter).unwrap_err();
/// assert_eq!(rejection.status(), 422);
/// ```
pub fn read_cat<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let validated = validate_request(&READ_CAT, request)?;
    let mut results = Map::new();
    results.insert("cat_id".to_string(), json!(validated.path.get("cat_id")));
    Ok(with_optional_q(results, &validated.query))
}

/// `PUT /items/{item_id}` with an optional item body.
pub fn update_item<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let validated = validate_request(&UPDATE_ITEM, request)?;
    let mut results = Map::new();
    results.insert("item_id".to_string(), json!(validated.path.get("item_id")));
    if let Some(q) = validated.query.get_str("q").filter(|q| !q.is_empty()) {
        results.insert("q".to_string(), json!(q));
    }
    if let Some(item) = validated.body {
        results.insert("item".to_string(), item.into_value());
    }
    Ok(Value::Object(results))
}

/// `POST /products/{product_id}`
pub fn create_product<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let validated = validate_request(&CREATE_PRODUCT, request)?;
    let product_id = validated.path.get("product_id").cloned();
    Ok(json!({ "product_id": product_id, "product": validated.into_body_value() }))
}

/// `POST /user/`, answered through the [`USER_OUT`] response model.
///
/// # Examples
///
/// ```
/// use param_core::web::{example_handler::create_user, RequestAdapter};
/// use serde_json::json;
///
/// let mut adapter = RequestAdapter::new("req-user".to_string());
/// adapter.set_body(json!({
///     "username": "juan",
///     "password": "hunter2",
///     "email": "juan@example.com"
/// }));
///
/// let user = create_user(&adapter).unwrap();
/// assert!(user.get("password").is_none());
/// assert_eq!(user["full_name"], json!(null));
/// ```
pub fn create_user<R: ExtractRawInputs + ?Sized>(request: &R) -> Result<Value, Rejection> {
    let user = validate_request(&CREATE_USER, request)?.into_body_value();
    Ok(project(&USER_OUT, &user))
}

/// `GET /items/` guarded by `X-Token` and `X-Key` headers.
///
/// Missing headers are a 422 like any other missing parameter; present but
/// wrong values are refused with 400.
pub fn read_protected_items<R: ExtractRawInputs + ?Sized>(
    request: &R,
) -> Result<Value, Rejection> {
    let validated = validate_request(&READ_PROTECTED_ITEMS, request)?;
    if validated.headers.get_str("x_token") != Some(EXPECTED_TOKEN) {
        tracing::info!(request_id = %validated.request_id, "invalid X-Token header");
        return Err(Rejection::bad_request(&["header", "x_token"], "X-Token header invalid"));
    }
    if validated.headers.get_str("x_key") != Some(EXPECTED_KEY) {
        tracing::info!(request_id = %validated.request_id, "invalid X-Key header");
        return Err(Rejection::bad_request(&["header", "x_key"], "X-Key header invalid"));
    }
    Ok(json!([{ "item": "Foo" }, { "item": "Bar" }]))
}

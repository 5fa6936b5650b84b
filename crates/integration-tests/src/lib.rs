//! Integration tests for 4AMotos.
//!
//! Each test starts two servers on ephemeral ports: a [`FakeStore`] speaking
//! the subset of the record store's REST API the storefront uses, and the
//! storefront itself pointed at it. Tests then drive the storefront over
//! HTTP with a cookie-keeping client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p amotos-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use amotos_storefront::config::StorefrontConfig;
use amotos_storefront::{AppState, app};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use url::Url;

const ITEMS: &str = "repuestos";
const CATEGORIES: &str = "categorias";

/// Records and switches behind the fake store.
#[derive(Debug, Default)]
struct StoreData {
    collections: HashMap<String, Vec<Value>>,
    filters: Vec<String>,
    next_id: u64,
    down: bool,
}

/// In-memory stand-in for the record store.
#[derive(Debug, Clone, Default)]
pub struct FakeStore {
    data: Arc<Mutex<StoreData>>,
}

impl FakeStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a category record.
    #[must_use]
    pub fn with_category(self, id: &str, nombre: &str) -> Self {
        self.insert(CATEGORIES, json!({ "id": id, "nombre": nombre }));
        self
    }

    /// Add an item record.
    #[must_use]
    pub fn with_item(self, id: &str, nombre: &str, precio: u64, categoria: &str, marca: &str) -> Self {
        self.insert(
            ITEMS,
            json!({
                "id": id,
                "nombre": nombre,
                "precio": precio,
                "categoria": categoria,
                "marca": marca,
                "stock": 5,
                "disponible": true,
                "codigo_producto": format!("MOTO-{id}"),
            }),
        );
        self
    }

    /// Add an item record exactly as given, bypassing the usual field shape.
    #[must_use]
    pub fn with_raw_item(self, record: Value) -> Self {
        self.insert(ITEMS, record);
        self
    }

    fn insert(&self, collection: &str, record: Value) {
        self.lock()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Make every endpoint answer 503.
    pub fn set_down(&self, down: bool) {
        self.lock().down = down;
    }

    /// Filter expressions received on item searches, in order.
    #[must_use]
    pub fn filters(&self) -> Vec<String> {
        self.lock().filters.clone()
    }

    /// Current item records.
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.lock()
            .collections
            .get(ITEMS)
            .cloned()
            .unwrap_or_default()
    }

    fn router(self) -> Router {
        Router::new()
            .route("/api/health", get(health))
            .route(
                "/api/collections/{collection}/records",
                get(list_records).post(create_record),
            )
            .route(
                "/api/collections/{collection}/records/{id}",
                get(view_record).patch(update_record).delete(delete_record),
            )
            .with_state(self)
    }

    /// Serve the store on an ephemeral port and return its base URL.
    pub async fn spawn(&self) -> Url {
        let addr = serve(self.clone().router()).await;
        Url::parse(&format!("http://{addr}")).expect("valid store URL")
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "code": status.as_u16(), "message": message, "data": {} });
    (status, Json(body)).into_response()
}

fn unavailable() -> Response {
    error(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable.")
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "The requested resource wasn't found.")
}

fn expand_category(record: &mut Value, categories: &[Value]) {
    let Some(category_id) = record.get("categoria").and_then(Value::as_str) else {
        return;
    };
    if let Some(category) = categories
        .iter()
        .find(|c| c.get("id").and_then(Value::as_str) == Some(category_id))
    {
        record["expand"] = json!({ "categoria": category });
    }
}

fn price(record: &Value) -> u64 {
    record.get("precio").and_then(Value::as_u64).unwrap_or(0)
}

async fn health(State(store): State<FakeStore>) -> Response {
    if store.lock().down {
        return unavailable();
    }
    Json(json!({ "code": 200, "message": "API is healthy.", "data": {} })).into_response()
}

async fn list_records(
    State(store): State<FakeStore>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut data = store.lock();
    if data.down {
        return unavailable();
    }

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let per_page: usize = params
        .get("perPage")
        .and_then(|p| p.parse().ok())
        .unwrap_or(30)
        .max(1);
    if collection == ITEMS {
        data.filters
            .push(params.get("filter").cloned().unwrap_or_default());
    }

    let categories = data.collections.get(CATEGORIES).cloned().unwrap_or_default();
    let mut records = data.collections.get(&collection).cloned().unwrap_or_default();
    match params.get("sort").map(String::as_str) {
        Some("precio" | "+precio") => records.sort_by_key(price),
        Some("-precio") => records.sort_by_key(|r| std::cmp::Reverse(price(r))),
        _ => {}
    }

    let total_items = records.len();
    let mut items: Vec<Value> = records
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    if params.get("expand").is_some_and(|e| e.contains("categoria")) {
        for item in &mut items {
            expand_category(item, &categories);
        }
    }

    Json(json!({
        "page": page,
        "perPage": per_page,
        "totalItems": total_items,
        "totalPages": total_items.div_ceil(per_page),
        "items": items,
    }))
    .into_response()
}

async fn view_record(
    State(store): State<FakeStore>,
    Path((collection, id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let data = store.lock();
    if data.down {
        return unavailable();
    }

    let record = data
        .collections
        .get(&collection)
        .and_then(|records| {
            records
                .iter()
                .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
        })
        .cloned();
    let Some(mut record) = record else {
        return not_found();
    };
    if params.get("expand").is_some_and(|e| e.contains("categoria")) {
        let categories = data.collections.get(CATEGORIES).cloned().unwrap_or_default();
        expand_category(&mut record, &categories);
    }
    Json(record).into_response()
}

async fn create_record(
    State(store): State<FakeStore>,
    Path(collection): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut data = store.lock();
    if data.down {
        return unavailable();
    }
    if body.get("nombre").and_then(Value::as_str).is_none_or(str::is_empty) {
        return error(StatusCode::BAD_REQUEST, "Failed to create record.");
    }

    data.next_id += 1;
    body["id"] = json!(format!("new{}", data.next_id));
    data.collections
        .entry(collection)
        .or_default()
        .push(body.clone());
    Json(body).into_response()
}

async fn update_record(
    State(store): State<FakeStore>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = store.lock();
    if data.down {
        return unavailable();
    }

    let record = data
        .collections
        .get_mut(&collection)
        .and_then(|records| {
            records
                .iter_mut()
                .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
        });
    let Some(record) = record else {
        return not_found();
    };
    if let (Some(target), Some(changes)) = (record.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(record.clone()).into_response()
}

async fn delete_record(
    State(store): State<FakeStore>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let mut data = store.lock();
    if data.down {
        return unavailable();
    }

    let Some(records) = data.collections.get_mut(&collection) else {
        return not_found();
    };
    let before = records.len();
    records.retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
    if records.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

/// A running storefront backed by a [`FakeStore`].
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub store: FakeStore,
    pub state: AppState,
}

impl TestContext {
    /// Start the store and a storefront pointed at it.
    pub async fn new(store: FakeStore) -> Self {
        let store_url = store.spawn().await;
        let state = AppState::new(StorefrontConfig::for_store(store_url))
            .expect("Failed to initialize application state");
        let addr = serve(app(state.clone())).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            store,
            state,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("storefront request");
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// POST a form and decode the JSON body.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("storefront request");
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

/// Three brakes and engine parts, used by most tests.
#[must_use]
pub fn sample_store() -> FakeStore {
    FakeStore::new()
        .with_category("c1", "Frenos")
        .with_category("c2", "Motor")
        .with_item("r1", "Pastillas de freno", 18_000, "c1", "Honda")
        .with_item("r2", "Disco de freno", 45_000, "c1", "Yamaha")
        .with_item("r3", "Pistón", 120_000, "c2", "Honda")
}

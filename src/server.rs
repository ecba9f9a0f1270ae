//! HTTP server.
//!
//! Exposes the contact book as a JSON API. Each route maps to exactly one
//! [`ContactBook`] operation.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/contacts` | Contacts matching the query filters |
//! | `POST`   | `/contacts` | Create a contact from the JSON body |
//! | `PUT`    | `/contacts?id=…` | Update contact `id` from the JSON body |
//! | `DELETE` | `/contacts` | Remove contacts matching the query filters |
//! | `GET`    | `/generate/{name}/{count}` | A random sample collection (not stored) |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! Filters are the query parameters `id` (or `uuid`), `name`, `lastName`,
//! `email`, `address` and `phone`. Omitted parameters match anything.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing request body" } }
//! ```
//!
//! Updating an unknown id is not an error: the response is `200` with a
//! `null` body.
//!
//! # Response headers
//!
//! Mutating requests carry `x-contact-book-persisted` (`saved`,
//! `unchanged` or `failed`) and, when supplied values were dropped by
//! validation, `x-contact-book-rejected` with the field names.

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use contact_book_core::collection::ContactCollection;
use contact_book_core::generate::{check_count, sample_collection};
use contact_book_core::models::{ContactDraft, ContactFilter, ContactRecord};

use crate::book::{ContactBook, Saved};
use crate::config::Config;
use crate::storage::XmlFileStore;

const PERSISTED_HEADER: HeaderName = HeaderName::from_static("x-contact-book-persisted");
const REJECTED_HEADER: HeaderName = HeaderName::from_static("x-contact-book-rejected");

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    book: Arc<ContactBook>,
}

/// Starts the HTTP server on `[server].bind`, backed by the XML file at
/// `[storage].path`. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(XmlFileStore::from_config(config));
    let book = Arc::new(ContactBook::open(store, &config.book.name).await);
    run_server_with_book(config, book).await
}

/// Starts the HTTP server over an already opened book.
pub async fn run_server_with_book(config: &Config, book: Arc<ContactBook>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(book);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("contact book listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// The route table.
pub fn router(book: Arc<ContactBook>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/contacts",
            get(handle_find)
                .post(handle_create)
                .put(handle_update)
                .delete(handle_remove),
        )
        .route("/generate/{name}/{count}", get(handle_generate))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { book })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    let message = message.into();
    debug!("rejecting request: {}", message);
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message,
    }
}

/// Parses a contact payload. An empty body or a JSON `null` is rejected.
fn parse_draft(body: &Bytes) -> Result<ContactDraft, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(bad_request("missing request body"));
    }
    let draft: Option<ContactDraft> = serde_json::from_slice(body)
        .map_err(|e| bad_request(format!("invalid contact payload: {}", e)))?;
    draft.ok_or_else(|| bad_request("missing request body"))
}

/// JSON body plus the persistence headers of a mutation.
fn saved_response<T: Serialize>(saved: Saved<T>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        PERSISTED_HEADER,
        HeaderValue::from_static(saved.persistence.as_str()),
    );
    if !saved.rejected.is_empty() {
        let names: Vec<&str> = saved.rejected.iter().map(|f| f.as_str()).collect();
        if let Ok(value) = HeaderValue::from_str(&names.join(",")) {
            headers.insert(REJECTED_HEADER, value);
        }
    }
    (headers, Json(saved.value)).into_response()
}

// ============ /contacts ============

/// Handler for `GET /contacts`.
async fn handle_find(
    State(state): State<AppState>,
    Query(filter): Query<ContactFilter>,
) -> Json<Vec<ContactRecord>> {
    debug!("GET /contacts {:?}", filter);
    Json(state.book.find(&filter).await)
}

/// Handler for `POST /contacts`.
async fn handle_create(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let draft = parse_draft(&body)?;
    debug!("POST /contacts {:?}", draft);
    Ok(saved_response(state.book.create(draft).await))
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    #[serde(default, alias = "uuid")]
    id: Option<String>,
}

/// Handler for `PUT /contacts?id=…`.
///
/// Both the `id` parameter and a body are required. An unknown id yields
/// `200` with a `null` body.
async fn handle_update(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
    body: Bytes,
) -> Result<Response, AppError> {
    // An empty `id=` is treated as missing.
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| bad_request("missing id parameter"))?;
    let draft = parse_draft(&body)?;
    debug!("PUT /contacts id={} {:?}", id, draft);
    Ok(saved_response(state.book.update(&id, draft).await))
}

/// Handler for `DELETE /contacts`.
async fn handle_remove(
    State(state): State<AppState>,
    Query(filter): Query<ContactFilter>,
) -> Response {
    debug!("DELETE /contacts {:?}", filter);
    saved_response(state.book.remove(&filter).await)
}

// ============ GET /generate/{name}/{count} ============

/// Handler for `GET /generate/{name}/{count}`.
///
/// Returns a random collection for testing clients. The book is not touched.
async fn handle_generate(
    Path((name, count)): Path<(String, usize)>,
) -> Result<Json<ContactCollection>, AppError> {
    check_count(count).map_err(bad_request)?;
    let mut rng = rand::thread_rng();
    Ok(Json(sample_collection(&name, count, &mut rng)))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

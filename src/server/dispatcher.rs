//! # Request Dispatcher
//!
//! Maps inbound requests to handlers and encodes every programmatic response
//! as `{"success": bool, "message": string}`.
//!
//! ## Routing
//!
//! | Method   | Path      | Action                                        |
//! |----------|-----------|-----------------------------------------------|
//! | POST     | `/submit` | validate, append to the store, 200/400/413/500|
//! | OPTIONS  | any       | CORS preflight, 200, empty body               |
//! | POST     | other     | 404 JSON error                                |
//! | GET/HEAD | any       | static files from the asset directory         |
//!
//! ## Layers (outermost first)
//!
//! ```text
//! log_request -> cors -> catch_panic -> routes
//! ```
//!
//! Every response, including preflights and panics turned into 500s, carries
//! `Access-Control-Allow-Origin: *`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{post, MethodRouter},
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;

use crate::server::metrics::SubmissionMetrics;
use crate::store::{RecordStore, StoreError, SubmissionRecord};
use crate::submission::{self, ValidationError};

pub const SUBMIT_PATH: &str = "/submit";
pub const SUCCESS_MESSAGE: &str = "Submission saved successfully";
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";
pub const SERVER_ERROR_MESSAGE: &str = "Server error: unable to save submission";
pub const TOO_LARGE_MESSAGE: &str = "Submission too large";

/// Largest `/submit` body accepted; anything bigger gets a JSON 413.
pub const MAX_SUBMISSION_BYTES: usize = 16 * 1024 * 1024;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

// ============================================================================
// RESPONSE ENCODING
// ============================================================================

/// Body of every programmatic response. `success` is the machine-readable
/// outcome; `message` is for humans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Every way a programmatic request can fail, mapped to a status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no handler for POST {0}")]
    NotFound(String),

    #[error("request body exceeds {MAX_SUBMISSION_BYTES} bytes")]
    PayloadTooLarge,

    /// A handler panicked; the payload was logged where it was caught.
    #[error("handler panicked")]
    Panic,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(_) | ApiError::Panic => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Server-side faults never echo internals.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            ApiError::PayloadTooLarge => TOO_LARGE_MESSAGE.to_string(),
            ApiError::Store(_) | ApiError::Panic => SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Body-buffering failures: over the limit is a 413, anything else
/// (e.g., a truncated upload) is treated as a malformed payload.
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::Validation(ValidationError::MalformedPayload)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::error(self.client_message()))).into_response()
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The single record store of this process
    pub store: Arc<RecordStore>,
    /// Submission outcome counters
    pub metrics: SubmissionMetrics,
    /// Root directory for GET/HEAD requests
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            metrics: SubmissionMetrics::new(),
            static_dir: static_dir.into(),
        }
    }
}

/// Build the complete application router.
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    // POST to anything but /submit is a 404; every other method reaching the
    // fallback is a static file request
    let unknown_endpoint: MethodRouter =
        post(endpoint_not_found).fallback_service(assets.clone());

    Router::new()
        .route(SUBMIT_PATH, post(submit_handler).fallback_service(assets))
        .fallback_service(unknown_endpoint)
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

// ============================================================================
// HANDLERS
// ============================================================================

/// `POST /submit`: validate the body and append one row to the store.
async fn submit_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    state.metrics.increment_received();

    let outcome = match body {
        Ok(body) => save_submission(&state.store, &body).await,
        Err(rejection) => Err(ApiError::from(rejection)),
    };

    match outcome {
        Ok(record) => {
            state.metrics.increment_saved();
            info!("✅ Saved: {}, {}", record.name(), record.email());
            Ok(Json(ApiResponse::ok(SUCCESS_MESSAGE)))
        }
        Err(e) if e.status().is_client_error() => {
            state.metrics.increment_rejected();
            warn!("⚠️ Rejected submission: {}", e);
            Err(e)
        }
        Err(e) => {
            state.metrics.increment_failed();
            error!("❌ Failed to save submission: {}", e);
            Err(e)
        }
    }
}

async fn save_submission(
    store: &Arc<RecordStore>,
    body: &[u8],
) -> Result<SubmissionRecord, ApiError> {
    let submission = submission::parse_and_validate(body)?;
    let record = SubmissionRecord::stamped_now(submission);
    store.append_blocking(record.clone()).await?;
    Ok(record)
}

async fn endpoint_not_found(request: Request) -> ApiError {
    ApiError::NotFound(request.uri().path().to_string())
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!("💥 Request handler panicked: {}", detail);
    ApiError::Panic.into_response()
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Answer preflights directly and stamp the allow-origin header on everything else.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight_response();
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

fn preflight_response() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
    )
        .into_response()
}

/// One log line per request: method, path, status, latency.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

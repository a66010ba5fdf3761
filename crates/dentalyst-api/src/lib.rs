//! # dentalyst-api — Axum HTTP API for Dentalyst
//!
//! The HTTP layer of the Dentalyst expense tracker. Handlers are thin:
//! they validate input, call the record store through the trait seam,
//! and shape responses. The aggregation and summary arithmetic lives in
//! `dentalyst-report`; persistence and connection management live in
//! `dentalyst-store`.
//!
//! ## API Surface
//!
//! | Route                        | Module                  | Purpose                |
//! |------------------------------|-------------------------|------------------------|
//! | `GET /health`                | [`routes::health`]      | Service + db status    |
//! | `POST/GET/DELETE /api/expenses` | [`routes::expenses`] | CRUD + bulk delete     |
//! | `POST /api/expenses/bulk`    | [`routes::expenses`]    | Bulk entry             |
//! | `GET /api/expenses/monthly`  | [`routes::expenses`]    | Category aggregation   |
//! | `GET /api/expenses/summary`  | [`routes::expenses`]    | Profit summary         |
//! | `GET /api/categories`        | [`routes::expenses`]    | Category enumeration   |
//! | `/api/consultants/*`         | [`routes::consultants`] | Consultant management  |
//! | `GET /openapi.json`          | [`openapi`]             | OpenAPI spec           |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → CorsLayer → Handler
//! ```
//!
//! CORS is restricted to the configured origin allow-list with
//! credentials enabled; requests from unlisted origins are refused by
//! the layer before any handler runs.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::expenses::router())
        .merge(routes::consultants::router())
        .merge(openapi::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from the configured allow-list.
///
/// Origins that fail header-value parsing are dropped with a warning
/// rather than aborting startup. Credentials stay enabled, which is why
/// the origin list is explicit — a wildcard cannot be combined with
/// credentials.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

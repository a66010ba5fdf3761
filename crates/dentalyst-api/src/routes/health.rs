//! # Health Probe
//!
//! Reports process liveness plus the database connection status from the
//! injected [`DatabaseHandle`](crate::state::DatabaseHandle). The probe
//! always answers 200 — clients read the `status` field — so a flapping
//! database never makes the probe itself unreachable.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health probe response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the database is connected, else `unhealthy`.
    pub status: String,
    /// Server time of the probe.
    pub timestamp: DateTime<Utc>,
    pub database: DatabaseHealth,
}

/// Database connection portion of the health payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
    /// `connected`, `connecting`, or `disconnected`.
    pub status: String,
    pub host: String,
    pub name: String,
}

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health — Service and database status.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse),
    ),
    tag = "health"
)]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.database.status();
    let overall = if status.state.is_available() {
        "healthy"
    } else {
        "unhealthy"
    };
    Json(HealthResponse {
        status: overall.to_string(),
        timestamp: Utc::now(),
        database: DatabaseHealth {
            status: status.state.as_str().to_string(),
            host: status.host,
            name: status.database,
        },
    })
}

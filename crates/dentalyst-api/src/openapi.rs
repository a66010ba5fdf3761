//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dentalyst API",
        version = "0.3.2",
        description = "REST backend for the Dentalyst dental-clinic expense tracker.\n\nProvides:\n- **Expense records** — single and bulk entry, listing, single and bulk deletion\n- **Monthly reports** — per-category totals and dated entries over a date range\n- **Profit summary** — gross income, total expenses, profit, and margin\n- **Consultants** — managed list with rename-safe uniqueness and soft delete\n\nAll endpoints are unauthenticated; deploy behind the clinic's network boundary. CORS is restricted to the configured origin allow-list.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:5001", description = "Local development server"),
    ),
    paths(
        crate::routes::health::health,
        crate::routes::expenses::create_expense,
        crate::routes::expenses::create_expenses_bulk,
        crate::routes::expenses::list_expenses,
        crate::routes::expenses::delete_expense,
        crate::routes::expenses::delete_expenses_bulk,
        crate::routes::expenses::monthly_expenses,
        crate::routes::expenses::expense_summary,
        crate::routes::expenses::list_categories,
        crate::routes::consultants::list_consultants,
        crate::routes::consultants::create_consultant,
        crate::routes::consultants::update_consultant,
        crate::routes::consultants::delete_consultant,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::health::HealthResponse,
        crate::routes::health::DatabaseHealth,
        crate::routes::expenses::CreateExpenseRequest,
        crate::routes::expenses::BulkCreateRequest,
        crate::routes::expenses::BulkDeleteRequest,
        crate::routes::expenses::BulkDeleteResponse,
        crate::routes::consultants::CreateConsultantRequest,
        crate::routes::consultants::UpdateConsultantRequest,
        crate::routes::consultants::DeleteConsultantResponse,
    )),
    tags(
        (name = "health", description = "Service and database status"),
        (name = "expenses", description = "Expense record operations"),
        (name = "reports", description = "Aggregation and profit summary"),
        (name = "consultants", description = "Consultant management"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_spec))
}

/// GET /openapi.json — The assembled specification.
async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

//! # Expense Routes
//!
//! Expense CRUD, bulk operations, and the reporting endpoints. Handlers
//! validate, call the store, and shape responses — the aggregation and
//! summary arithmetic lives in `dentalyst-report`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use dentalyst_core::{temporal, Category, Expense, ExpenseId, NewExpense};
use dentalyst_report::{aggregate_by_category, summarize, CategoryGroup, ProfitSummary};

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request body for a single expense.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    /// Event date; RFC 3339, naive datetime, or bare date.
    pub date: String,
    /// Category display name, e.g. "Gross Income".
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Required when `category` is "Consultants".
    #[serde(default)]
    pub consultant_name: Option<String>,
}

impl CreateExpenseRequest {
    /// Parse and validate into a store-ready draft.
    fn into_draft(self) -> Result<NewExpense, AppError> {
        let date = temporal::parse_event_date(&self.date)?;
        let category: Category = self.category.parse()?;
        let draft = NewExpense::new(
            date,
            category,
            self.amount,
            self.description,
            self.consultant_name,
        )?;
        Ok(draft)
    }
}

/// Request body for bulk creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkCreateRequest {
    pub expenses: Vec<CreateExpenseRequest>,
}

/// Request body for bulk deletion.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

/// Bulk deletion outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
}

/// Date range query parameters for the reporting endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeParams {
    /// Both bounds are required; either missing or unparsable is a
    /// validation failure.
    fn parse(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
        let (Some(start), Some(end)) = (&self.start_date, &self.end_date) else {
            return Err(AppError::Validation(
                "startDate and endDate are required".to_string(),
            ));
        };
        let start = temporal::parse_event_date(start)?;
        let end = temporal::parse_event_date(end)?;
        Ok((start, end))
    }
}

/// Build the expenses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/expenses",
            get(list_expenses)
                .post(create_expense)
                .delete(delete_expenses_bulk),
        )
        .route("/api/expenses/bulk", post(create_expenses_bulk))
        .route("/api/expenses/monthly", get(monthly_expenses))
        .route("/api/expenses/summary", get(expense_summary))
        .route("/api/expenses/:id", delete(delete_expense))
        .route("/api/categories", get(list_categories))
}

/// POST /api/expenses — Record one expense.
#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created"),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "expenses"
)]
async fn create_expense(
    State(state): State<AppState>,
    body: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let draft = extract_json(body)?.into_draft()?;
    let record = state.expenses.insert(draft).await?;
    tracing::info!(id = %record.id, category = %record.category, "expense recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/expenses/bulk — Record a batch of expenses.
///
/// Every element is validated before anything is written; the store
/// commits the batch atomically, so a bad row never leaves a partial
/// batch behind.
#[utoipa::path(
    post,
    path = "/api/expenses/bulk",
    request_body = BulkCreateRequest,
    responses(
        (status = 201, description = "Expenses created"),
        (status = 400, description = "Malformed body or invalid element", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "expenses"
)]
async fn create_expenses_bulk(
    State(state): State<AppState>,
    body: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Expense>>), AppError> {
    let req = extract_json(body)?;
    if req.expenses.is_empty() {
        return Err(AppError::Validation(
            "expenses must be a non-empty array".to_string(),
        ));
    }

    let drafts: Vec<NewExpense> = req
        .expenses
        .into_iter()
        .map(CreateExpenseRequest::into_draft)
        .collect::<Result<_, _>>()?;

    let count = drafts.len();
    let records = state.expenses.insert_many(drafts).await?;
    tracing::info!(count, "bulk expenses recorded");
    Ok((StatusCode::CREATED, Json(records)))
}

/// GET /api/expenses — All expenses, newest first.
#[utoipa::path(
    get,
    path = "/api/expenses",
    responses(
        (status = 200, description = "All expense records, date descending"),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "expenses"
)]
async fn list_expenses(State(state): State<AppState>) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(state.expenses.list().await?))
}

/// DELETE /api/expenses/:id — Delete one expense.
///
/// A malformed identifier is 400; a well-formed but unknown one is 404.
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    params(("id" = String, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Deleted; returns the removed record"),
        (status = 400, description = "Malformed ID", body = ErrorBody),
        (status = 404, description = "No such expense", body = ErrorBody),
    ),
    tag = "expenses"
)]
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Expense>, AppError> {
    let id = ExpenseId::parse(&id)?;
    let record = state
        .expenses
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("expense {id} not found")))?;
    tracing::info!(id = %record.id, "expense deleted");
    Ok(Json(record))
}

/// DELETE /api/expenses — Delete a batch of expenses by id.
#[utoipa::path(
    delete,
    path = "/api/expenses",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Deletion count", body = BulkDeleteResponse),
        (status = 400, description = "Empty list or malformed ID", body = ErrorBody),
        (status = 404, description = "Nothing matched", body = ErrorBody),
    ),
    tag = "expenses"
)]
async fn delete_expenses_bulk(
    State(state): State<AppState>,
    body: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    let req = extract_json(body)?;
    if req.ids.is_empty() {
        return Err(AppError::Validation(
            "ids must be a non-empty array".to_string(),
        ));
    }

    let ids: Vec<ExpenseId> = req
        .ids
        .iter()
        .map(|raw| ExpenseId::parse(raw))
        .collect::<Result<_, _>>()
        .map_err(AppError::from)?;

    let deleted_count = state.expenses.delete_many(&ids).await?;
    if deleted_count == 0 {
        return Err(AppError::NotFound(
            "no matching expense records".to_string(),
        ));
    }
    tracing::info!(deleted_count, "bulk expenses deleted");
    Ok(Json(BulkDeleteResponse { deleted_count }))
}

/// GET /api/expenses/monthly — Category aggregation over a date range.
///
/// Returns `[{_id: {category}, total, entries}]` — groups alphabetical
/// by category, entries newest first.
#[utoipa::path(
    get,
    path = "/api/expenses/monthly",
    params(RangeParams),
    responses(
        (status = 200, description = "Aggregated category groups"),
        (status = 400, description = "Missing or unparsable range", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "reports"
)]
async fn monthly_expenses(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<CategoryGroup>>, AppError> {
    let (start, end) = params.parse()?;
    let records = state.expenses.find_in_range(start, end).await?;
    Ok(Json(aggregate_by_category(&records)))
}

/// GET /api/expenses/summary — Profit summary over a date range.
#[utoipa::path(
    get,
    path = "/api/expenses/summary",
    params(RangeParams),
    responses(
        (status = 200, description = "Gross income, expenses, profit, margin"),
        (status = 400, description = "Missing or unparsable range", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "reports"
)]
async fn expense_summary(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<ProfitSummary>, AppError> {
    let (start, end) = params.parse()?;
    let records = state.expenses.find_in_range(start, end).await?;
    let groups = aggregate_by_category(&records);
    Ok(Json(summarize(&groups)))
}

/// GET /api/categories — The category enumeration, in entry-form order.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All category names"),
    ),
    tag = "expenses"
)]
async fn list_categories() -> Json<Vec<&'static str>> {
    Json(Category::all().iter().map(Category::as_str).collect())
}

//! # Consultant Routes
//!
//! Consultant management: list, add, rename, and the soft-delete rule —
//! a consultant referenced by any Consultants-category expense is marked
//! inactive instead of being removed, so historical reports keep
//! resolving the name.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use dentalyst_core::{consultant, Consultant, ConsultantId, ConsultantUpdate, NewConsultant};

use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request body for adding a consultant.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConsultantRequest {
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl Validate for CreateConsultantRequest {
    fn validate(&self) -> Result<(), String> {
        consultant::normalize_name(&self.name)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Request body for updating a consultant. Absent fields are unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateConsultantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl Validate for UpdateConsultantRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            consultant::normalize_name(name)
                .map(|_| ())
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// Deletion outcome: either the record was removed or marked inactive.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteConsultantResponse {
    pub message: String,
    /// The record as it stood after the operation.
    #[schema(value_type = Object)]
    pub consultant: Consultant,
}

/// Build the consultants router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/consultants", get(list_consultants).post(create_consultant))
        .route(
            "/api/consultants/:id",
            put(update_consultant).delete(delete_consultant),
        )
}

/// GET /api/consultants — All consultants, name ascending.
#[utoipa::path(
    get,
    path = "/api/consultants",
    responses(
        (status = 200, description = "All consultants, sorted by name"),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "consultants"
)]
async fn list_consultants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Consultant>>, AppError> {
    Ok(Json(state.consultants.list().await?))
}

/// POST /api/consultants — Add a consultant.
#[utoipa::path(
    post,
    path = "/api/consultants",
    request_body = CreateConsultantRequest,
    responses(
        (status = 201, description = "Consultant created"),
        (status = 400, description = "Missing, short, or duplicate name", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody),
    ),
    tag = "consultants"
)]
async fn create_consultant(
    State(state): State<AppState>,
    body: Result<Json<CreateConsultantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Consultant>), AppError> {
    let req = extract_validated_json(body)?;
    let draft = NewConsultant::new(&req.name, req.specialization)?;

    // Friendly pre-check; the store's uniqueness guarantee is the
    // backstop for racing inserts.
    if state.consultants.find_by_name(&draft.name).await?.is_some() {
        return Err(AppError::Validation(format!(
            "a consultant named {:?} already exists",
            draft.name
        )));
    }

    let record = state.consultants.insert(draft).await?;
    tracing::info!(id = %record.id, name = %record.name, "consultant added");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/consultants/:id — Update a consultant.
///
/// A rename re-checks name uniqueness excluding the record itself.
#[utoipa::path(
    put,
    path = "/api/consultants/{id}",
    params(("id" = String, Path, description = "Consultant ID")),
    request_body = UpdateConsultantRequest,
    responses(
        (status = 200, description = "Updated consultant"),
        (status = 400, description = "Malformed ID or duplicate name", body = ErrorBody),
        (status = 404, description = "No such consultant", body = ErrorBody),
    ),
    tag = "consultants"
)]
async fn update_consultant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateConsultantRequest>, JsonRejection>,
) -> Result<Json<Consultant>, AppError> {
    let id = ConsultantId::parse(&id)?;
    let req = extract_validated_json(body)?;
    let update = ConsultantUpdate::new(req.name, req.specialization, req.active)?;
    let record = state
        .consultants
        .update(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("consultant {id} not found")))?;
    tracing::info!(id = %record.id, name = %record.name, "consultant updated");
    Ok(Json(record))
}

/// DELETE /api/consultants/:id — Delete or deactivate a consultant.
///
/// When any Consultants-category expense references the name, the record
/// is kept and flipped to inactive; otherwise it is physically removed.
#[utoipa::path(
    delete,
    path = "/api/consultants/{id}",
    params(("id" = String, Path, description = "Consultant ID")),
    responses(
        (status = 200, description = "Deleted or deactivated", body = DeleteConsultantResponse),
        (status = 400, description = "Malformed ID", body = ErrorBody),
        (status = 404, description = "No such consultant", body = ErrorBody),
    ),
    tag = "consultants"
)]
async fn delete_consultant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConsultantResponse>, AppError> {
    let id = ConsultantId::parse(&id)?;
    let existing = state
        .consultants
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("consultant {id} not found")))?;

    let referenced = state
        .expenses
        .references_consultant(&existing.name)
        .await?;

    let (message, record) = if referenced {
        let record = state
            .consultants
            .deactivate(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("consultant {id} not found")))?;
        tracing::info!(id = %id, name = %record.name, "consultant marked inactive");
        (
            "consultant has expense records and was marked inactive".to_string(),
            record,
        )
    } else {
        let record = state
            .consultants
            .remove(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("consultant {id} not found")))?;
        tracing::info!(id = %id, name = %record.name, "consultant deleted");
        ("consultant deleted".to_string(), record)
    };

    Ok(Json(DeleteConsultantResponse {
        message,
        consultant: record,
    }))
}

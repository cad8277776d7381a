//! Budgeting period routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use sakiewka_db::{
    repositories::period::{CreatePeriodInput, PeriodError, UpdatePeriodInput},
    PeriodRepository,
};

/// Creates the period routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}/periods", get(list_periods))
        .route("/wallets/{wallet_id}/periods", post(create_period))
        .route("/wallets/{wallet_id}/periods/{period_id}", get(get_period))
        .route("/wallets/{wallet_id}/periods/{period_id}", put(update_period))
        .route(
            "/wallets/{wallet_id}/periods/{period_id}",
            delete(delete_period),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a period.
#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    /// Period name.
    pub name: String,
    /// First covered day.
    pub date_start: NaiveDate,
    /// Last covered day (inclusive).
    pub date_end: NaiveDate,
    /// Whether the period starts active.
    #[serde(default)]
    pub is_active: bool,
}

/// Request body for updating a period.
#[derive(Debug, Deserialize)]
pub struct UpdatePeriodRequest {
    /// Period name.
    pub name: Option<String>,
    /// First covered day.
    pub date_start: Option<NaiveDate>,
    /// Last covered day (inclusive).
    pub date_end: Option<NaiveDate>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Response for a period.
#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    /// Period ID.
    pub id: Uuid,
    /// Wallet ID.
    pub wallet_id: Uuid,
    /// Period name.
    pub name: String,
    /// First covered day.
    pub date_start: NaiveDate,
    /// Last covered day (inclusive).
    pub date_end: NaiveDate,
    /// Active flag.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sakiewka_db::entities::periods::Model> for PeriodResponse {
    fn from(p: sakiewka_db::entities::periods::Model) -> Self {
        Self {
            id: p.id,
            wallet_id: p.wallet_id,
            name: p.name,
            date_start: p.date_start,
            date_end: p.date_end,
            is_active: p.is_active,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /wallets/{wallet_id}/periods - List periods.
async fn list_periods(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let period_repo = PeriodRepository::new((*state.db).clone());

    match period_repo.list(wallet_id).await {
        Ok(periods) => {
            let response: Vec<PeriodResponse> =
                periods.into_iter().map(PeriodResponse::from).collect();
            (StatusCode::OK, Json(json!({ "periods": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list periods");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/periods - Create a period.
async fn create_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<CreatePeriodRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let period_repo = PeriodRepository::new((*state.db).clone());

    let input = CreatePeriodInput {
        name: payload.name,
        date_start: payload.date_start,
        date_end: payload.date_end,
        is_active: payload.is_active,
    };

    match period_repo.create(wallet_id, input).await {
        Ok(period) => {
            info!(wallet_id = %wallet_id, period_id = %period.id, "Period created");
            (StatusCode::CREATED, Json(PeriodResponse::from(period))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create period");
            map_period_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/periods/{period_id} - Get a period.
async fn get_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, period_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let period_repo = PeriodRepository::new((*state.db).clone());

    match period_repo.find(wallet_id, period_id).await {
        Ok(Some(period)) => (StatusCode::OK, Json(PeriodResponse::from(period))).into_response(),
        Ok(None) => crate::routes::not_found("Period not found"),
        Err(e) => {
            error!(error = %e, "Failed to load period");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id}/periods/{period_id} - Update a period.
async fn update_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, period_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePeriodRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let period_repo = PeriodRepository::new((*state.db).clone());

    let input = UpdatePeriodInput {
        name: payload.name,
        date_start: payload.date_start,
        date_end: payload.date_end,
        is_active: payload.is_active,
    };

    match period_repo.update(wallet_id, period_id, input).await {
        Ok(period) => {
            info!(wallet_id = %wallet_id, period_id = %period_id, "Period updated");
            (StatusCode::OK, Json(PeriodResponse::from(period))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update period");
            map_period_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/periods/{period_id} - Delete a period.
async fn delete_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, period_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let period_repo = PeriodRepository::new((*state.db).clone());

    match period_repo.delete(wallet_id, period_id).await {
        Ok(()) => {
            info!(wallet_id = %wallet_id, period_id = %period_id, "Period deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete period");
            map_period_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps period errors to HTTP responses.
fn map_period_error(e: &PeriodError) -> axum::response::Response {
    match e {
        PeriodError::NotFound(_) => crate::routes::not_found("Period not found"),
        PeriodError::DuplicateName => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": "Period name already exists in this wallet"
            })),
        )
            .into_response(),
        PeriodError::InvalidDateRange => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_date_range",
                "message": "Start date must be earlier than end date"
            })),
        )
            .into_response(),
        PeriodError::Overlap(other) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "period_overlap",
                "message": format!("Period date range collides with period {other}")
            })),
        )
            .into_response(),
        PeriodError::ActivePeriodExists => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "active_period_exists",
                "message": "An active period already exists in this wallet"
            })),
        )
            .into_response(),
        PeriodError::HasTransfers => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "period_in_use",
                "message": "Period is referenced by transfers and cannot be deleted"
            })),
        )
            .into_response(),
        PeriodError::Database(_) => crate::routes::internal_error(),
    }
}

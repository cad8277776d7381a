//! Expense prediction routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use sakiewka_db::{
    repositories::prediction::{CreatePredictionInput, PredictionError, UpdatePredictionInput},
    PredictionRepository,
};

/// Creates the prediction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}/predictions", get(list_predictions))
        .route("/wallets/{wallet_id}/predictions", post(create_prediction))
        .route(
            "/wallets/{wallet_id}/predictions/{prediction_id}",
            get(get_prediction),
        )
        .route(
            "/wallets/{wallet_id}/predictions/{prediction_id}",
            put(update_prediction),
        )
        .route(
            "/wallets/{wallet_id}/predictions/{prediction_id}",
            delete(delete_prediction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for prediction listing.
#[derive(Debug, Deserialize)]
pub struct ListPredictionsQuery {
    /// Filter by period.
    pub period_id: Option<Uuid>,
}

/// Request body for creating a prediction.
#[derive(Debug, Deserialize)]
pub struct CreatePredictionRequest {
    /// Target period.
    pub period_id: Uuid,
    /// Target expense category.
    pub category_id: Uuid,
    /// Planned spend.
    pub value: Decimal,
    /// Description.
    pub description: Option<String>,
}

/// Request body for updating a prediction.
#[derive(Debug, Deserialize)]
pub struct UpdatePredictionRequest {
    /// Planned spend.
    pub value: Option<Decimal>,
    /// Description.
    pub description: Option<String>,
}

/// Response for a prediction.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// Prediction ID.
    pub id: Uuid,
    /// Target period.
    pub period_id: Uuid,
    /// Target expense category.
    pub category_id: Uuid,
    /// Planned spend.
    pub value: Decimal,
    /// Description.
    pub description: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sakiewka_db::entities::predictions::Model> for PredictionResponse {
    fn from(p: sakiewka_db::entities::predictions::Model) -> Self {
        Self {
            id: p.id,
            period_id: p.period_id,
            category_id: p.category_id,
            value: p.value,
            description: p.description,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /wallets/{wallet_id}/predictions - List predictions.
async fn list_predictions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<ListPredictionsQuery>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let prediction_repo = PredictionRepository::new((*state.db).clone());

    match prediction_repo.list(wallet_id, query.period_id).await {
        Ok(predictions) => {
            let response: Vec<PredictionResponse> = predictions
                .into_iter()
                .map(PredictionResponse::from)
                .collect();
            (StatusCode::OK, Json(json!({ "predictions": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list predictions");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/predictions - Create a prediction.
async fn create_prediction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<CreatePredictionRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let prediction_repo = PredictionRepository::new((*state.db).clone());

    let input = CreatePredictionInput {
        period_id: payload.period_id,
        category_id: payload.category_id,
        value: payload.value,
        description: payload.description,
    };

    match prediction_repo.create(wallet_id, input).await {
        Ok(prediction) => {
            info!(
                wallet_id = %wallet_id,
                prediction_id = %prediction.id,
                "Prediction created"
            );
            (
                StatusCode::CREATED,
                Json(PredictionResponse::from(prediction)),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create prediction");
            map_prediction_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/predictions/{prediction_id} - Get a prediction.
async fn get_prediction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, prediction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let prediction_repo = PredictionRepository::new((*state.db).clone());

    match prediction_repo.find(wallet_id, prediction_id).await {
        Ok(Some(prediction)) => {
            (StatusCode::OK, Json(PredictionResponse::from(prediction))).into_response()
        }
        Ok(None) => crate::routes::not_found("Prediction not found"),
        Err(e) => {
            error!(error = %e, "Failed to load prediction");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id}/predictions/{prediction_id} - Update a prediction.
async fn update_prediction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, prediction_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePredictionRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let prediction_repo = PredictionRepository::new((*state.db).clone());

    let input = UpdatePredictionInput {
        value: payload.value,
        description: payload.description.map(Some),
    };

    match prediction_repo.update(wallet_id, prediction_id, input).await {
        Ok(prediction) => {
            info!(
                wallet_id = %wallet_id,
                prediction_id = %prediction_id,
                "Prediction updated"
            );
            (StatusCode::OK, Json(PredictionResponse::from(prediction))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update prediction");
            map_prediction_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/predictions/{prediction_id} - Delete a prediction.
async fn delete_prediction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, prediction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let prediction_repo = PredictionRepository::new((*state.db).clone());

    match prediction_repo.delete(wallet_id, prediction_id).await {
        Ok(()) => {
            info!(
                wallet_id = %wallet_id,
                prediction_id = %prediction_id,
                "Prediction deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete prediction");
            map_prediction_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps prediction errors to HTTP responses.
fn map_prediction_error(e: &PredictionError) -> axum::response::Response {
    match e {
        PredictionError::NotFound(_) => crate::routes::not_found("Prediction not found"),
        PredictionError::Duplicate => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_prediction",
                "message": "Prediction already exists for this period and category"
            })),
        )
            .into_response(),
        PredictionError::PeriodNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "period_not_found",
                "message": format!("Period not found: {id}")
            })),
        )
            .into_response(),
        PredictionError::CategoryNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        PredictionError::NotExpenseCategory => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "not_expense_category",
                "message": "Predictions can only target expense categories"
            })),
        )
            .into_response(),
        PredictionError::ValueNotPositive => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "value_not_positive",
                "message": "Prediction value must be positive"
            })),
        )
            .into_response(),
        PredictionError::Database(_) => crate::routes::internal_error(),
    }
}

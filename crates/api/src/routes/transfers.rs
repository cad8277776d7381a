//! Income and expense transfer routes.
//!
//! Incomes and expenses share the transfer machinery; the endpoints differ
//! only in the category kind they operate on. Every write recomputes the
//! affected deposit balances inside the repository transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use sakiewka_db::{
    entities::sea_orm_active_enums::CategoryType,
    repositories::transfer::{
        CreateTransferInput, TransferError, TransferFilter, UpdateTransferInput,
    },
    TransferRepository,
};
use sakiewka_shared::types::{PageRequest, PageResponse};

/// Creates the transfer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}/incomes", get(list_incomes))
        .route("/wallets/{wallet_id}/incomes", post(create_income))
        .route("/wallets/{wallet_id}/incomes/{transfer_id}", get(get_income))
        .route(
            "/wallets/{wallet_id}/incomes/{transfer_id}",
            put(update_income),
        )
        .route(
            "/wallets/{wallet_id}/incomes/{transfer_id}",
            delete(delete_income),
        )
        .route("/wallets/{wallet_id}/expenses", get(list_expenses))
        .route("/wallets/{wallet_id}/expenses", post(create_expense))
        .route(
            "/wallets/{wallet_id}/expenses/{transfer_id}",
            get(get_expense),
        )
        .route(
            "/wallets/{wallet_id}/expenses/{transfer_id}",
            put(update_expense),
        )
        .route(
            "/wallets/{wallet_id}/expenses/{transfer_id}",
            delete(delete_expense),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for transfer listing.
#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    /// Filter by period.
    pub period_id: Option<Uuid>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by deposit.
    pub deposit_id: Option<Uuid>,
    /// Filter by counterparty.
    pub entity_id: Option<Uuid>,
    /// Only transfers on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Only transfers on or before this date.
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for creating a transfer.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// Budgeting period.
    pub period_id: Uuid,
    /// Target deposit.
    pub deposit_id: Uuid,
    /// Category of the matching kind.
    pub category_id: Uuid,
    /// Optional counterparty.
    pub entity_id: Option<Uuid>,
    /// Transfer name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Positive value.
    pub value: Decimal,
    /// Booking date.
    pub date: NaiveDate,
}

/// Request body for updating a transfer.
#[derive(Debug, Deserialize)]
pub struct UpdateTransferRequest {
    /// New period.
    pub period_id: Option<Uuid>,
    /// New deposit.
    pub deposit_id: Option<Uuid>,
    /// New category (same kind).
    pub category_id: Option<Uuid>,
    /// New counterparty; explicit null clears it, omitting keeps the current one.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub entity_id: Option<Option<Uuid>>,
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New value.
    pub value: Option<Decimal>,
    /// New booking date.
    pub date: Option<NaiveDate>,
}

/// Response for a transfer.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Transfer ID.
    pub id: Uuid,
    /// Budgeting period.
    pub period_id: Uuid,
    /// Target deposit.
    pub deposit_id: Uuid,
    /// Category.
    pub category_id: Uuid,
    /// Counterparty, if any.
    pub entity_id: Option<Uuid>,
    /// Transfer name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Positive value.
    pub value: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Distinguishes an absent field (no change) from an explicit null (clear).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<sakiewka_db::entities::transfers::Model> for TransferResponse {
    fn from(t: sakiewka_db::entities::transfers::Model) -> Self {
        Self {
            id: t.id,
            period_id: t.period_id,
            deposit_id: t.deposit_id,
            category_id: t.category_id,
            entity_id: t.entity_id,
            name: t.name,
            description: t.description,
            value: t.value,
            date: t.date,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Kind-specific wrappers
// ============================================================================

async fn list_incomes(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<Uuid>,
    query: Query<ListTransfersQuery>,
) -> axum::response::Response {
    list_transfers(state, auth, path, query, CategoryType::Income).await
}

async fn list_expenses(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<Uuid>,
    query: Query<ListTransfersQuery>,
) -> axum::response::Response {
    list_transfers(state, auth, path, query, CategoryType::Expense).await
}

async fn create_income(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<Uuid>,
    payload: Json<CreateTransferRequest>,
) -> axum::response::Response {
    create_transfer(state, auth, path, payload, CategoryType::Income).await
}

async fn create_expense(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<Uuid>,
    payload: Json<CreateTransferRequest>,
) -> axum::response::Response {
    create_transfer(state, auth, path, payload, CategoryType::Expense).await
}

async fn get_income(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
) -> axum::response::Response {
    get_transfer(state, auth, path, CategoryType::Income).await
}

async fn get_expense(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
) -> axum::response::Response {
    get_transfer(state, auth, path, CategoryType::Expense).await
}

async fn update_income(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
    payload: Json<UpdateTransferRequest>,
) -> axum::response::Response {
    update_transfer(state, auth, path, payload, CategoryType::Income).await
}

async fn update_expense(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
    payload: Json<UpdateTransferRequest>,
) -> axum::response::Response {
    update_transfer(state, auth, path, payload, CategoryType::Expense).await
}

async fn delete_income(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
) -> axum::response::Response {
    delete_transfer(state, auth, path, CategoryType::Income).await
}

async fn delete_expense(
    state: State<AppState>,
    auth: AuthUser,
    path: Path<(Uuid, Uuid)>,
) -> axum::response::Response {
    delete_transfer(state, auth, path, CategoryType::Expense).await
}

// ============================================================================
// Shared handlers
// ============================================================================

/// GET /wallets/{wallet_id}/incomes|expenses - List transfers of one kind.
async fn list_transfers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<ListTransfersQuery>,
    kind: CategoryType,
) -> axum::response::Response {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(20).clamp(1, 100),
    };
    let filter = TransferFilter {
        period_id: query.period_id,
        category_id: query.category_id,
        deposit_id: query.deposit_id,
        entity_id: query.entity_id,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let transfer_repo = TransferRepository::new((*state.db).clone());

    match transfer_repo.list(wallet_id, kind, &filter, &page).await {
        Ok((transfers, total)) => {
            let data: Vec<TransferResponse> =
                transfers.into_iter().map(TransferResponse::from).collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list transfers");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/incomes|expenses - Create a transfer.
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<CreateTransferRequest>,
    kind: CategoryType,
) -> axum::response::Response {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let transfer_repo = TransferRepository::new((*state.db).clone());

    let input = CreateTransferInput {
        period_id: payload.period_id,
        deposit_id: payload.deposit_id,
        category_id: payload.category_id,
        entity_id: payload.entity_id,
        name: payload.name,
        description: payload.description,
        value: payload.value,
        date: payload.date,
    };

    match transfer_repo.create(wallet_id, kind, input).await {
        Ok(transfer) => {
            info!(
                wallet_id = %wallet_id,
                transfer_id = %transfer.id,
                deposit_id = %transfer.deposit_id,
                "Transfer created"
            );
            (StatusCode::CREATED, Json(TransferResponse::from(transfer))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create transfer");
            map_transfer_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/incomes|expenses/{transfer_id} - Get a transfer.
async fn get_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, transfer_id)): Path<(Uuid, Uuid)>,
    kind: CategoryType,
) -> axum::response::Response {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let transfer_repo = TransferRepository::new((*state.db).clone());

    match transfer_repo.find(wallet_id, kind, transfer_id).await {
        Ok(Some(transfer)) => {
            (StatusCode::OK, Json(TransferResponse::from(transfer))).into_response()
        }
        Ok(None) => crate::routes::not_found("Transfer not found"),
        Err(e) => {
            error!(error = %e, "Failed to load transfer");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id}/incomes|expenses/{transfer_id} - Update a transfer.
async fn update_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, transfer_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTransferRequest>,
    kind: CategoryType,
) -> axum::response::Response {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let transfer_repo = TransferRepository::new((*state.db).clone());

    let input = UpdateTransferInput {
        period_id: payload.period_id,
        deposit_id: payload.deposit_id,
        category_id: payload.category_id,
        entity_id: payload.entity_id,
        name: payload.name,
        description: payload.description.map(Some),
        value: payload.value,
        date: payload.date,
    };

    match transfer_repo
        .update(wallet_id, kind, transfer_id, input)
        .await
    {
        Ok(transfer) => {
            info!(
                wallet_id = %wallet_id,
                transfer_id = %transfer_id,
                "Transfer updated"
            );
            (StatusCode::OK, Json(TransferResponse::from(transfer))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update transfer");
            map_transfer_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/incomes|expenses/{transfer_id} - Delete a transfer.
async fn delete_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, transfer_id)): Path<(Uuid, Uuid)>,
    kind: CategoryType,
) -> axum::response::Response {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let transfer_repo = TransferRepository::new((*state.db).clone());

    match transfer_repo.delete(wallet_id, kind, transfer_id).await {
        Ok(()) => {
            info!(
                wallet_id = %wallet_id,
                transfer_id = %transfer_id,
                "Transfer deleted"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete transfer");
            map_transfer_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps transfer errors to HTTP responses.
fn map_transfer_error(e: &TransferError) -> axum::response::Response {
    match e {
        TransferError::NotFound(_) => crate::routes::not_found("Transfer not found"),
        TransferError::PeriodNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "period_not_found",
                "message": format!("Period not found: {id}")
            })),
        )
            .into_response(),
        TransferError::DepositNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "deposit_not_found",
                "message": format!("Deposit not found: {id}")
            })),
        )
            .into_response(),
        TransferError::CategoryNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        TransferError::EntityNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "entity_not_found",
                "message": format!("Entity not found: {id}")
            })),
        )
            .into_response(),
        TransferError::CategoryKindMismatch { expected } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "category_kind_mismatch",
                "message": format!(
                    "Category kind does not match this endpoint (expected {})",
                    match expected {
                        CategoryType::Income => "income",
                        CategoryType::Expense => "expense",
                    }
                )
            })),
        )
            .into_response(),
        TransferError::ValueNotPositive => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "value_not_positive",
                "message": "Transfer value must be positive"
            })),
        )
            .into_response(),
        TransferError::Database(_) => crate::routes::internal_error(),
    }
}

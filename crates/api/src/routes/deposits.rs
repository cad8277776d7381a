//! Deposit routes.

use axum::{
    extract::{Path, State},
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
    entities::sea_orm_active_enums::DepositType,
    repositories::deposit::{CreateDepositInput, DepositError, UpdateDepositInput},
    DepositRepository,
};

/// Creates the deposit routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}/deposits", get(list_deposits))
        .route("/wallets/{wallet_id}/deposits", post(create_deposit))
        .route(
            "/wallets/{wallet_id}/deposits/{deposit_id}",
            get(get_deposit),
        )
        .route(
            "/wallets/{wallet_id}/deposits/{deposit_id}",
            put(update_deposit),
        )
        .route(
            "/wallets/{wallet_id}/deposits/{deposit_id}",
            delete(delete_deposit),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a deposit.
#[derive(Debug, Deserialize)]
pub struct CreateDepositRequest {
    /// Deposit name.
    pub name: String,
    /// Deposit description.
    pub description: Option<String>,
    /// Deposit kind: personal, common, reserves, investments, savings.
    pub deposit_type: String,
}

/// Request body for updating a deposit.
#[derive(Debug, Deserialize)]
pub struct UpdateDepositRequest {
    /// Deposit name.
    pub name: Option<String>,
    /// Deposit description.
    pub description: Option<String>,
    /// Deposit kind.
    pub deposit_type: Option<String>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Response for a deposit.
#[derive(Debug, Serialize)]
pub struct DepositResponse {
    /// Deposit ID.
    pub id: Uuid,
    /// Wallet ID.
    pub wallet_id: Uuid,
    /// Deposit name.
    pub name: String,
    /// Deposit description.
    pub description: Option<String>,
    /// Deposit kind.
    pub deposit_type: String,
    /// Active flag.
    pub is_active: bool,
    /// Current balance (signed sum of linked transfers).
    pub balance: Decimal,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sakiewka_db::entities::deposits::Model> for DepositResponse {
    fn from(d: sakiewka_db::entities::deposits::Model) -> Self {
        Self {
            id: d.id,
            wallet_id: d.wallet_id,
            name: d.name,
            description: d.description,
            deposit_type: deposit_type_to_string(d.deposit_type),
            is_active: d.is_active,
            balance: d.balance,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a deposit type string to the enum value.
fn parse_deposit_type(s: &str) -> Option<DepositType> {
    match s.to_lowercase().as_str() {
        "personal" => Some(DepositType::Personal),
        "common" => Some(DepositType::Common),
        "reserves" => Some(DepositType::Reserves),
        "investments" => Some(DepositType::Investments),
        "savings" => Some(DepositType::Savings),
        _ => None,
    }
}

/// Converts a deposit type enum to its string form.
fn deposit_type_to_string(dt: DepositType) -> String {
    match dt {
        DepositType::Personal => "personal",
        DepositType::Common => "common",
        DepositType::Reserves => "reserves",
        DepositType::Investments => "investments",
        DepositType::Savings => "savings",
    }
    .to_string()
}

fn invalid_deposit_type() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_deposit_type",
            "message":
                "Invalid deposit type. Must be one of: personal, common, reserves, investments, savings"
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /wallets/{wallet_id}/deposits - List deposits with balances.
async fn list_deposits(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let deposit_repo = DepositRepository::new((*state.db).clone());

    match deposit_repo.list(wallet_id).await {
        Ok(deposits) => {
            let response: Vec<DepositResponse> =
                deposits.into_iter().map(DepositResponse::from).collect();
            (StatusCode::OK, Json(json!({ "deposits": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list deposits");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/deposits - Create a deposit.
async fn create_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<CreateDepositRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let Some(deposit_type) = parse_deposit_type(&payload.deposit_type) else {
        return invalid_deposit_type();
    };

    let deposit_repo = DepositRepository::new((*state.db).clone());

    let input = CreateDepositInput {
        name: payload.name,
        description: payload.description,
        deposit_type,
    };

    match deposit_repo.create(wallet_id, input).await {
        Ok(deposit) => {
            info!(wallet_id = %wallet_id, deposit_id = %deposit.id, "Deposit created");
            (StatusCode::CREATED, Json(DepositResponse::from(deposit))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create deposit");
            map_deposit_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/deposits/{deposit_id} - Get a deposit.
async fn get_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, deposit_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let deposit_repo = DepositRepository::new((*state.db).clone());

    match deposit_repo.find(wallet_id, deposit_id).await {
        Ok(Some(deposit)) => (StatusCode::OK, Json(DepositResponse::from(deposit))).into_response(),
        Ok(None) => crate::routes::not_found("Deposit not found"),
        Err(e) => {
            error!(error = %e, "Failed to load deposit");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id}/deposits/{deposit_id} - Update a deposit.
async fn update_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, deposit_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateDepositRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let deposit_type = match payload.deposit_type.as_deref() {
        Some(s) => match parse_deposit_type(s) {
            Some(dt) => Some(dt),
            None => return invalid_deposit_type(),
        },
        None => None,
    };

    let deposit_repo = DepositRepository::new((*state.db).clone());

    let input = UpdateDepositInput {
        name: payload.name,
        description: payload.description.map(Some),
        deposit_type,
        is_active: payload.is_active,
    };

    match deposit_repo.update(wallet_id, deposit_id, input).await {
        Ok(deposit) => {
            info!(wallet_id = %wallet_id, deposit_id = %deposit_id, "Deposit updated");
            (StatusCode::OK, Json(DepositResponse::from(deposit))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update deposit");
            map_deposit_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/deposits/{deposit_id} - Delete a deposit.
async fn delete_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, deposit_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let deposit_repo = DepositRepository::new((*state.db).clone());

    match deposit_repo.delete(wallet_id, deposit_id).await {
        Ok(()) => {
            info!(wallet_id = %wallet_id, deposit_id = %deposit_id, "Deposit deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete deposit");
            map_deposit_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps deposit errors to HTTP responses.
fn map_deposit_error(e: &DepositError) -> axum::response::Response {
    match e {
        DepositError::NotFound(_) => crate::routes::not_found("Deposit not found"),
        DepositError::DuplicateName => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": "Deposit name already exists in this wallet"
            })),
        )
            .into_response(),
        DepositError::HasTransfers => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "deposit_in_use",
                "message": "Deposit is referenced by transfers and cannot be deleted"
            })),
        )
            .into_response(),
        DepositError::Database(_) => crate::routes::internal_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("personal", Some(DepositType::Personal))]
    #[case("COMMON", Some(DepositType::Common))]
    #[case("reserves", Some(DepositType::Reserves))]
    #[case("investments", Some(DepositType::Investments))]
    #[case("savings", Some(DepositType::Savings))]
    #[case("checking", None)]
    fn test_parse_deposit_type(#[case] input: &str, #[case] expected: Option<DepositType>) {
        assert_eq!(parse_deposit_type(input), expected);
    }

    #[test]
    fn test_deposit_type_roundtrip() {
        for dt in [
            DepositType::Personal,
            DepositType::Common,
            DepositType::Reserves,
            DepositType::Investments,
            DepositType::Savings,
        ] {
            assert_eq!(parse_deposit_type(&deposit_type_to_string(dt)), Some(dt));
        }
    }
}

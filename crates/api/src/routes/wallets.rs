//! Wallet management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use sakiewka_db::{
    repositories::wallet::{CreateWalletInput, UpdateWalletInput, WalletError},
    WalletRepository,
};
use sakiewka_shared::types::Currency;

/// Creates the wallet routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets", get(list_wallets))
        .route("/wallets", post(create_wallet))
        .route("/wallets/{wallet_id}", get(get_wallet))
        .route("/wallets/{wallet_id}", put(update_wallet))
        .route("/wallets/{wallet_id}", delete(delete_wallet))
        .route("/wallets/{wallet_id}/members", get(list_members))
        .route("/wallets/{wallet_id}/members", post(add_member))
        .route(
            "/wallets/{wallet_id}/members/{user_id}",
            delete(remove_member),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a wallet.
#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    /// Wallet name.
    pub name: String,
    /// Wallet description.
    pub description: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Request body for updating a wallet.
#[derive(Debug, Deserialize)]
pub struct UpdateWalletRequest {
    /// Wallet name.
    pub name: Option<String>,
    /// Wallet description.
    pub description: Option<String>,
}

/// Request body for adding a wallet member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// Email of the user to add.
    pub email: String,
}

/// Response for a wallet.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    /// Wallet ID.
    pub id: Uuid,
    /// Owning user ID.
    pub owner_id: Uuid,
    /// Wallet name.
    pub name: String,
    /// Wallet description.
    pub description: Option<String>,
    /// Currency code.
    pub currency: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sakiewka_db::entities::wallets::Model> for WalletResponse {
    fn from(w: sakiewka_db::entities::wallets::Model) -> Self {
        Self {
            id: w.id,
            owner_id: w.owner_id,
            name: w.name,
            description: w.description,
            currency: w.currency,
            created_at: w.created_at.to_rfc3339(),
            updated_at: w.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /wallets - List wallets the user belongs to.
async fn list_wallets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let wallet_repo = WalletRepository::new((*state.db).clone());

    match wallet_repo.list_for_user(auth.user_id()).await {
        Ok(wallets) => {
            let response: Vec<WalletResponse> =
                wallets.into_iter().map(WalletResponse::from).collect();
            (StatusCode::OK, Json(json!({ "wallets": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list wallets");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets - Create a wallet owned by the caller.
async fn create_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateWalletRequest>,
) -> impl IntoResponse {
    let Ok(currency) = Currency::from_str(&payload.currency) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_currency",
                "message": "Unsupported currency code"
            })),
        )
            .into_response();
    };

    let wallet_repo = WalletRepository::new((*state.db).clone());

    let input = CreateWalletInput {
        owner_id: auth.user_id(),
        name: payload.name,
        description: payload.description,
        currency: currency.code().to_string(),
    };

    match wallet_repo.create_with_owner(input).await {
        Ok(wallet) => {
            info!(wallet_id = %wallet.id, owner_id = %wallet.owner_id, "Wallet created");
            (StatusCode::CREATED, Json(WalletResponse::from(wallet))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create wallet");
            map_wallet_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id} - Get a wallet.
async fn get_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let wallet_repo = WalletRepository::new((*state.db).clone());

    match wallet_repo.find_by_id(wallet_id).await {
        Ok(Some(wallet)) => (StatusCode::OK, Json(WalletResponse::from(wallet))).into_response(),
        Ok(None) => crate::routes::not_found("Wallet not found"),
        Err(e) => {
            error!(error = %e, "Failed to load wallet");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id} - Update a wallet (owner only).
async fn update_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<UpdateWalletRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_owner(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let wallet_repo = WalletRepository::new((*state.db).clone());

    let input = UpdateWalletInput {
        name: payload.name,
        description: payload.description.map(Some),
    };

    match wallet_repo.update(wallet_id, input).await {
        Ok(wallet) => {
            info!(wallet_id = %wallet_id, "Wallet updated");
            (StatusCode::OK, Json(WalletResponse::from(wallet))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update wallet");
            map_wallet_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id} - Delete a wallet and everything in it (owner only).
async fn delete_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_owner(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let wallet_repo = WalletRepository::new((*state.db).clone());

    match wallet_repo.delete_cascade(wallet_id).await {
        Ok(()) => {
            info!(wallet_id = %wallet_id, "Wallet deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete wallet");
            map_wallet_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/members - List wallet members.
async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let wallet_repo = WalletRepository::new((*state.db).clone());

    match wallet_repo.members(wallet_id).await {
        Ok(members) => {
            let response: Vec<serde_json::Value> = members
                .into_iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "email": u.email,
                        "full_name": u.full_name
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "members": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list members");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/members - Add a member by email (owner only).
async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_owner(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let wallet_repo = WalletRepository::new((*state.db).clone());

    match wallet_repo.add_member(wallet_id, &payload.email).await {
        Ok(user) => {
            info!(wallet_id = %wallet_id, user_id = %user.id, "Member added");
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": user.id,
                    "email": user.email,
                    "full_name": user.full_name
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to add member");
            map_wallet_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/members/{user_id} - Remove a member (owner only).
async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, user_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_owner(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let wallet_repo = WalletRepository::new((*state.db).clone());

    match wallet_repo.remove_member(wallet_id, user_id).await {
        Ok(()) => {
            info!(wallet_id = %wallet_id, user_id = %user_id, "Member removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to remove member");
            map_wallet_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps wallet errors to HTTP responses.
fn map_wallet_error(e: &WalletError) -> axum::response::Response {
    match e {
        WalletError::NotFound(_) => crate::routes::not_found("Wallet not found"),
        WalletError::DuplicateName => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": "Wallet name already exists for this owner"
            })),
        )
            .into_response(),
        WalletError::UserNotFound(email) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "user_not_found",
                "message": format!("No user registered as {email}")
            })),
        )
            .into_response(),
        WalletError::AlreadyMember => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_member",
                "message": "User is already a member of this wallet"
            })),
        )
            .into_response(),
        WalletError::NotMember => crate::routes::not_found("Membership not found"),
        WalletError::CannotRemoveOwner => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "cannot_remove_owner",
                "message": "The wallet owner cannot be removed"
            })),
        )
            .into_response(),
        WalletError::Database(_) => crate::routes::internal_error(),
    }
}

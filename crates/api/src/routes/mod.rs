//! API route definitions.

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{middleware::auth::auth_middleware, AppState};
use sakiewka_db::WalletRepository;

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod deposits;
pub mod entities;
pub mod health;
pub mod periods;
pub mod predictions;
pub mod transfers;
pub mod wallets;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(wallets::routes())
        .merge(periods::routes())
        .merge(deposits::routes())
        .merge(entities::routes())
        .merge(categories::routes())
        .merge(predictions::routes())
        .merge(transfers::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Standard 500 response with a generic body.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// Standard 404 response.
pub(crate) fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": message
        })),
    )
        .into_response()
}

/// Checks that the user is a member of the wallet.
///
/// Non-members get the same 404 as a missing wallet so wallet IDs are not
/// probeable.
pub(crate) async fn require_member(
    state: &AppState,
    wallet_id: Uuid,
    user_id: Uuid,
) -> Result<(), Response> {
    let wallet_repo = WalletRepository::new((*state.db).clone());
    match wallet_repo.is_member(wallet_id, user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(not_found("Wallet not found")),
        Err(e) => {
            error!(error = %e, "Failed to check wallet membership");
            Err(internal_error())
        }
    }
}

/// Checks that the user owns the wallet.
pub(crate) async fn require_owner(
    state: &AppState,
    wallet_id: Uuid,
    user_id: Uuid,
) -> Result<(), Response> {
    let wallet_repo = WalletRepository::new((*state.db).clone());
    match wallet_repo.is_member(wallet_id, user_id).await {
        Ok(true) => {}
        Ok(false) => return Err(not_found("Wallet not found")),
        Err(e) => {
            error!(error = %e, "Failed to check wallet membership");
            return Err(internal_error());
        }
    }

    match wallet_repo.is_owner(wallet_id, user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Wallet owner role required"
            })),
        )
            .into_response()),
        Err(e) => {
            error!(error = %e, "Failed to check wallet ownership");
            Err(internal_error())
        }
    }
}

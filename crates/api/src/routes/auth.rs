//! Authentication routes for register, login, token refresh, and logout.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, info};

use crate::{middleware::AuthUser, AppState};
use sakiewka_core::auth::{hash_password, validate_password_strength, verify_password};
use sakiewka_db::{SessionRepository, UserRepository};
use sakiewka_shared::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RegisterRequest, TokenPair,
    UserInfo,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Creates the auth routes that require an access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if validate_password_strength(&payload.password).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters long"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return crate::routes::internal_error();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return crate::routes::internal_error();
        }
    };

    let user = match user_repo
        .create(&payload.email, &password_hash, &payload.full_name)
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return crate::routes::internal_error();
        }
    };

    info!(user_id = %user.id, "User registered");

    (
        StatusCode::CREATED,
        Json(UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }),
    )
        .into_response()
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return crate::routes::internal_error();
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return crate::routes::internal_error();
        }
    }

    let tokens = match issue_tokens(&state, user.id, &user.email).await {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(user_id = %user.id, "User logged in");

    (
        StatusCode::OK,
        Json(LoginResponse {
            user: UserInfo {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
            },
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }),
    )
        .into_response()
}

/// POST /auth/refresh - Rotate a refresh token into a new token pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // The refresh token must be a valid, unexpired JWT...
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(_) => return invalid_refresh_token(),
    };

    // ...and belong to a live session.
    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo.find_by_token(&payload.refresh_token).await {
        Ok(Some(s)) => s,
        Ok(None) => return invalid_refresh_token(),
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return crate::routes::internal_error();
        }
    };

    if session.expires_at.with_timezone(&chrono::Utc) < chrono::Utc::now() {
        return invalid_refresh_token();
    }

    // Rotation: the old session dies with the old token.
    if let Err(e) = session_repo.revoke(session.id).await {
        error!(error = %e, "Failed to revoke session");
        return crate::routes::internal_error();
    }

    let tokens = match issue_tokens(&state, claims.user_id(), &claims.email).await {
        Ok(t) => t,
        Err(response) => return response,
    };

    (StatusCode::OK, Json(tokens)).into_response()
}

/// POST /auth/logout - Revoke the session behind a refresh token.
async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<LogoutRequest>,
) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    match session_repo.revoke_by_token(&payload.refresh_token).await {
        Ok(revoked) => {
            info!(user_id = %auth.user_id(), revoked, "User logged out");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to revoke session");
            crate::routes::internal_error()
        }
    }
}

/// GET /auth/me - Return the authenticated user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(UserInfo {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
            }),
        )
            .into_response(),
        Ok(None) => crate::routes::not_found("User not found"),
        Err(e) => {
            error!(error = %e, "Failed to load user");
            crate::routes::internal_error()
        }
    }
}

/// Generates an access/refresh pair and records the refresh session.
async fn issue_tokens(
    state: &AppState,
    user_id: uuid::Uuid,
    email: &str,
) -> Result<TokenPair, axum::response::Response> {
    let access_token = state
        .jwt_service
        .generate_access_token(user_id, email)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            crate::routes::internal_error()
        })?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user_id, email)
        .map_err(|e| {
            error!(error = %e, "Failed to generate refresh token");
            crate::routes::internal_error()
        })?;

    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(state.jwt_service.refresh_token_expires_days());

    let session_repo = SessionRepository::new((*state.db).clone());
    session_repo
        .create(user_id, &refresh_token, expires_at, None, None)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create session");
            crate::routes::internal_error()
        })?;

    Ok(TokenPair::new(
        access_token,
        refresh_token,
        state.jwt_service.access_token_expires_in(),
    ))
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn invalid_refresh_token() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_refresh_token",
            "message": "Refresh token is invalid, expired, or revoked"
        })),
    )
        .into_response()
}

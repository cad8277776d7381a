//! Transfer counterparty (entity) routes.
//!
//! Entities exist in two scopes: global (visible to every wallet) and
//! wallet-scoped. Wallet reads return both; wallet writes touch only the
//! wallet's own rows.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{middleware::AuthUser, AppState};
use sakiewka_db::{
    repositories::entity::{CreateEntityInput, EntityError, UpdateEntityInput},
    EntityRepository,
};

/// Creates the entity routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entities", get(list_global_entities))
        .route("/entities", post(create_global_entity))
        .route("/entities/{entity_id}", delete(delete_global_entity))
        .route("/wallets/{wallet_id}/entities", get(list_entities))
        .route("/wallets/{wallet_id}/entities", post(create_entity))
        .route("/wallets/{wallet_id}/entities/{entity_id}", get(get_entity))
        .route(
            "/wallets/{wallet_id}/entities/{entity_id}",
            put(update_entity),
        )
        .route(
            "/wallets/{wallet_id}/entities/{entity_id}",
            delete(delete_entity),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an entity.
#[derive(Debug, Deserialize)]
pub struct CreateEntityRequest {
    /// Entity name.
    pub name: String,
    /// Entity description.
    pub description: Option<String>,
}

/// Request body for updating an entity.
#[derive(Debug, Deserialize)]
pub struct UpdateEntityRequest {
    /// Entity name.
    pub name: Option<String>,
    /// Entity description.
    pub description: Option<String>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Response for an entity.
#[derive(Debug, Serialize)]
pub struct EntityResponse {
    /// Entity ID.
    pub id: Uuid,
    /// Owning wallet, or null for a global entity.
    pub wallet_id: Option<Uuid>,
    /// Entity name.
    pub name: String,
    /// Entity description.
    pub description: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sakiewka_db::entities::entities::Model> for EntityResponse {
    fn from(e: sakiewka_db::entities::entities::Model) -> Self {
        Self {
            id: e.id,
            wallet_id: e.wallet_id,
            name: e.name,
            description: e.description,
            is_active: e.is_active,
            created_at: e.created_at.to_rfc3339(),
            updated_at: e.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers - global scope
// ============================================================================

/// GET /entities - List global entities.
async fn list_global_entities(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let entity_repo = EntityRepository::new((*state.db).clone());

    match entity_repo.list_global().await {
        Ok(entities) => {
            let response: Vec<EntityResponse> =
                entities.into_iter().map(EntityResponse::from).collect();
            (StatusCode::OK, Json(json!({ "entities": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list global entities");
            crate::routes::internal_error()
        }
    }
}

/// POST /entities - Create a global entity.
async fn create_global_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateEntityRequest>,
) -> impl IntoResponse {
    let entity_repo = EntityRepository::new((*state.db).clone());

    let input = CreateEntityInput {
        name: payload.name,
        description: payload.description,
    };

    match entity_repo.create(None, input).await {
        Ok(entity) => {
            info!(entity_id = %entity.id, user_id = %auth.user_id(), "Global entity created");
            (StatusCode::CREATED, Json(EntityResponse::from(entity))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create global entity");
            map_entity_error(&e)
        }
    }
}

/// DELETE /entities/{entity_id} - Delete a global entity.
async fn delete_global_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entity_id): Path<Uuid>,
) -> impl IntoResponse {
    let entity_repo = EntityRepository::new((*state.db).clone());

    match entity_repo.delete(None, entity_id).await {
        Ok(()) => {
            info!(entity_id = %entity_id, user_id = %auth.user_id(), "Global entity deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete global entity");
            map_entity_error(&e)
        }
    }
}

// ============================================================================
// Route Handlers - wallet scope
// ============================================================================

/// GET /wallets/{wallet_id}/entities - List entities visible to the wallet.
async fn list_entities(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let entity_repo = EntityRepository::new((*state.db).clone());

    match entity_repo.list_for_wallet(wallet_id).await {
        Ok(entities) => {
            let response: Vec<EntityResponse> =
                entities.into_iter().map(EntityResponse::from).collect();
            (StatusCode::OK, Json(json!({ "entities": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list entities");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/entities - Create a wallet-scoped entity.
async fn create_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<CreateEntityRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let entity_repo = EntityRepository::new((*state.db).clone());

    let input = CreateEntityInput {
        name: payload.name,
        description: payload.description,
    };

    match entity_repo.create(Some(wallet_id), input).await {
        Ok(entity) => {
            info!(wallet_id = %wallet_id, entity_id = %entity.id, "Entity created");
            (StatusCode::CREATED, Json(EntityResponse::from(entity))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create entity");
            map_entity_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/entities/{entity_id} - Get an entity visible to the wallet.
async fn get_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, entity_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let entity_repo = EntityRepository::new((*state.db).clone());

    match entity_repo.find_visible(wallet_id, entity_id).await {
        Ok(Some(entity)) => (StatusCode::OK, Json(EntityResponse::from(entity))).into_response(),
        Ok(None) => crate::routes::not_found("Entity not found"),
        Err(e) => {
            error!(error = %e, "Failed to load entity");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id}/entities/{entity_id} - Update a wallet-scoped entity.
async fn update_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, entity_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateEntityRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let entity_repo = EntityRepository::new((*state.db).clone());

    let input = UpdateEntityInput {
        name: payload.name,
        description: payload.description.map(Some),
        is_active: payload.is_active,
    };

    match entity_repo.update(wallet_id, entity_id, input).await {
        Ok(entity) => {
            info!(wallet_id = %wallet_id, entity_id = %entity_id, "Entity updated");
            (StatusCode::OK, Json(EntityResponse::from(entity))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update entity");
            map_entity_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/entities/{entity_id} - Delete a wallet-scoped entity.
async fn delete_entity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, entity_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let entity_repo = EntityRepository::new((*state.db).clone());

    match entity_repo.delete(Some(wallet_id), entity_id).await {
        Ok(()) => {
            info!(wallet_id = %wallet_id, entity_id = %entity_id, "Entity deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete entity");
            map_entity_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps entity errors to HTTP responses.
fn map_entity_error(e: &EntityError) -> axum::response::Response {
    match e {
        EntityError::NotFound(_) => crate::routes::not_found("Entity not found"),
        EntityError::DuplicateName => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": "Entity name already exists in this scope"
            })),
        )
            .into_response(),
        EntityError::HasTransfers => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "entity_in_use",
                "message": "Entity is referenced by transfers and cannot be deleted"
            })),
        )
            .into_response(),
        EntityError::Database(_) => crate::routes::internal_error(),
    }
}

//! Transfer category routes.

use axum::{
    extract::{Path, Query, State},
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
use sakiewka_core::category::{CategoryKind, CategoryPriority as CorePriority};
use sakiewka_db::{
    repositories::category::{CategoryError, CreateCategoryInput, UpdateCategoryInput},
    CategoryRepository,
};

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}/categories", get(list_categories))
        .route("/wallets/{wallet_id}/categories", post(create_category))
        .route(
            "/wallets/{wallet_id}/categories/{category_id}",
            get(get_category),
        )
        .route(
            "/wallets/{wallet_id}/categories/{category_id}",
            put(update_category),
        )
        .route(
            "/wallets/{wallet_id}/categories/{category_id}",
            delete(delete_category),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for category listing.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Filter by kind: income or expense.
    pub category_type: Option<String>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    pub name: String,
    /// Category description.
    pub description: Option<String>,
    /// Kind: income or expense.
    pub category_type: String,
    /// Priority bucket: incomes, most_important, debts, savings, others.
    pub priority: String,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// Category name.
    pub name: Option<String>,
    /// Category description.
    pub description: Option<String>,
    /// Priority bucket.
    pub priority: Option<String>,
    /// Active flag.
    pub is_active: Option<bool>,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Wallet ID.
    pub wallet_id: Uuid,
    /// Category name.
    pub name: String,
    /// Category description.
    pub description: Option<String>,
    /// Kind: income or expense.
    pub category_type: String,
    /// Priority bucket.
    pub priority: String,
    /// Active flag.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sakiewka_db::entities::categories::Model> for CategoryResponse {
    fn from(c: sakiewka_db::entities::categories::Model) -> Self {
        let kind: CategoryKind = c.category_type.into();
        let priority: CorePriority = c.priority.into();
        Self {
            id: c.id,
            wallet_id: c.wallet_id,
            name: c.name,
            description: c.description,
            category_type: kind.to_string(),
            priority: priority.to_string(),
            is_active: c.is_active,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

fn invalid_category_type() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_category_type",
            "message": "Invalid category type. Must be one of: income, expense"
        })),
    )
        .into_response()
}

fn invalid_priority() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_priority",
            "message":
                "Invalid priority. Must be one of: incomes, most_important, debts, savings, others"
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /wallets/{wallet_id}/categories - List categories, optionally by kind.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let kind = match query.category_type.as_deref() {
        Some(s) => match CategoryKind::from_str(s) {
            Ok(kind) => Some(kind.into()),
            Err(_) => return invalid_category_type(),
        },
        None => None,
    };

    let category_repo = CategoryRepository::new((*state.db).clone());

    match category_repo.list(wallet_id, kind).await {
        Ok(categories) => {
            let response: Vec<CategoryResponse> =
                categories.into_iter().map(CategoryResponse::from).collect();
            (StatusCode::OK, Json(json!({ "categories": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            crate::routes::internal_error()
        }
    }
}

/// POST /wallets/{wallet_id}/categories - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let Ok(kind) = CategoryKind::from_str(&payload.category_type) else {
        return invalid_category_type();
    };
    let Ok(priority) = CorePriority::from_str(&payload.priority) else {
        return invalid_priority();
    };

    let category_repo = CategoryRepository::new((*state.db).clone());

    let input = CreateCategoryInput {
        name: payload.name,
        description: payload.description,
        category_type: kind.into(),
        priority: priority.into(),
    };

    match category_repo.create(wallet_id, input).await {
        Ok(category) => {
            info!(wallet_id = %wallet_id, category_id = %category.id, "Category created");
            (StatusCode::CREATED, Json(CategoryResponse::from(category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create category");
            map_category_error(&e)
        }
    }
}

/// GET /wallets/{wallet_id}/categories/{category_id} - Get a category.
async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, category_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let category_repo = CategoryRepository::new((*state.db).clone());

    match category_repo.find(wallet_id, category_id).await {
        Ok(Some(category)) => {
            (StatusCode::OK, Json(CategoryResponse::from(category))).into_response()
        }
        Ok(None) => crate::routes::not_found("Category not found"),
        Err(e) => {
            error!(error = %e, "Failed to load category");
            crate::routes::internal_error()
        }
    }
}

/// PUT /wallets/{wallet_id}/categories/{category_id} - Update a category.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, category_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let priority = match payload.priority.as_deref() {
        Some(s) => match CorePriority::from_str(s) {
            Ok(p) => Some(p.into()),
            Err(_) => return invalid_priority(),
        },
        None => None,
    };

    let category_repo = CategoryRepository::new((*state.db).clone());

    let input = UpdateCategoryInput {
        name: payload.name,
        description: payload.description.map(Some),
        priority,
        is_active: payload.is_active,
    };

    match category_repo.update(wallet_id, category_id, input).await {
        Ok(category) => {
            info!(wallet_id = %wallet_id, category_id = %category_id, "Category updated");
            (StatusCode::OK, Json(CategoryResponse::from(category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update category");
            map_category_error(&e)
        }
    }
}

/// DELETE /wallets/{wallet_id}/categories/{category_id} - Delete a category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((wallet_id, category_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = crate::routes::require_member(&state, wallet_id, auth.user_id()).await {
        return response;
    }

    let category_repo = CategoryRepository::new((*state.db).clone());

    match category_repo.delete(wallet_id, category_id).await {
        Ok(()) => {
            info!(wallet_id = %wallet_id, category_id = %category_id, "Category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete category");
            map_category_error(&e)
        }
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps category errors to HTTP responses.
fn map_category_error(e: &CategoryError) -> axum::response::Response {
    match e {
        CategoryError::NotFound(_) => crate::routes::not_found("Category not found"),
        CategoryError::DuplicateName => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": "Category name already exists in this wallet"
            })),
        )
            .into_response(),
        CategoryError::PriorityMismatch => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "priority_mismatch",
                "message": "Priority bucket is not valid for this category kind"
            })),
        )
            .into_response(),
        CategoryError::HasTransfers => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "category_in_use",
                "message": "Category is referenced by transfers and cannot be deleted"
            })),
        )
            .into_response(),
        CategoryError::Database(_) => crate::routes::internal_error(),
    }
}

//! Category repository for income/expense classification operations.
//!
//! Category kind and priority must agree: the `incomes` bucket is reserved
//! for income categories. The rule lives in `sakiewka-core` and is enforced
//! here before any insert or update; the schema repeats it as a CHECK
//! constraint.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use sakiewka_core::category::validate_priority;

use crate::entities::{
    categories,
    sea_orm_active_enums::{CategoryPriority, CategoryType},
    transfers,
};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Category name already exists for this wallet and kind.
    #[error("Category name already exists in this wallet")]
    DuplicateName,

    /// Priority bucket does not match the category kind.
    #[error("Priority is not valid for this category kind")]
    PriorityMismatch,

    /// Transfers still reference the category.
    #[error("Category is referenced by transfers and cannot be deleted")]
    HasTransfers,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Income or expense.
    pub category_type: CategoryType,
    /// Priority bucket.
    pub priority: CategoryPriority,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New priority bucket.
    pub priority: Option<CategoryPriority>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists categories in a wallet, optionally filtered by kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        wallet_id: Uuid,
        kind: Option<CategoryType>,
    ) -> Result<Vec<categories::Model>, DbErr> {
        let mut query =
            categories::Entity::find().filter(categories::Column::WalletId.eq(wallet_id));
        if let Some(kind) = kind {
            query = query.filter(categories::Column::CategoryType.eq(kind));
        }

        query
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a category scoped to a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        wallet_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await
    }

    /// Creates a category after validating the kind/priority pairing.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::PriorityMismatch` for an illegal pairing and
    /// `CategoryError::DuplicateName` on a name collision within the wallet
    /// and kind.
    pub async fn create(
        &self,
        wallet_id: Uuid,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        validate_priority(input.category_type.into(), input.priority.into())
            .map_err(|_| CategoryError::PriorityMismatch)?;

        self.check_name_free(wallet_id, input.category_type, &input.name, None)
            .await?;

        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet_id),
            name: Set(input.name),
            description: Set(input.description),
            category_type: Set(input.category_type),
            priority: Set(input.priority),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Updates a category, re-validating the kind/priority pairing.
    ///
    /// The category kind itself is immutable; recategorizing transfers
    /// between incomes and expenses would silently flip deposit balances.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist in
    /// the wallet, otherwise the same validation errors as `create`.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self
            .find(wallet_id, category_id)
            .await?
            .ok_or(CategoryError::NotFound(category_id))?;

        let priority = input.priority.unwrap_or(category.priority);
        validate_priority(category.category_type.into(), priority.into())
            .map_err(|_| CategoryError::PriorityMismatch)?;

        if let Some(name) = &input.name {
            self.check_name_free(wallet_id, category.category_type, name, Some(category_id))
                .await?;
        }

        let mut active: categories::ActiveModel = category.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.priority = Set(priority);
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category unless transfers reference it.
    ///
    /// Predictions pointing at the category are removed by the schema
    /// cascade.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::HasTransfers` while transfers reference the
    /// category.
    pub async fn delete(&self, wallet_id: Uuid, category_id: Uuid) -> Result<(), CategoryError> {
        let category = self
            .find(wallet_id, category_id)
            .await?
            .ok_or(CategoryError::NotFound(category_id))?;

        let referencing = transfers::Entity::find()
            .filter(transfers::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(CategoryError::HasTransfers);
        }

        let active: categories::ActiveModel = category.into();
        active.delete(&self.db).await?;

        Ok(())
    }

    async fn check_name_free(
        &self,
        wallet_id: Uuid,
        kind: CategoryType,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), CategoryError> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::WalletId.eq(wallet_id))
            .filter(categories::Column::CategoryType.eq(kind))
            .filter(categories::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(categories::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(CategoryError::DuplicateName);
        }
        Ok(())
    }
}

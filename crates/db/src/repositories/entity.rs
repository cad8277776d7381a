//! Entity repository for transfer counterparty operations.
//!
//! Entities with `wallet_id = NULL` are global counterparties shared across
//! wallets; wallet-scoped rows belong to a single wallet. Reads from a
//! wallet see both; writes touch only rows in the requested scope.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{entities, transfers};

/// Error types for entity operations.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// Entity not found.
    #[error("Entity not found: {0}")]
    NotFound(Uuid),

    /// Entity name already taken in this scope.
    #[error("Entity name already exists in this scope")]
    DuplicateName,

    /// Transfers still reference the entity.
    #[error("Entity is referenced by transfers and cannot be deleted")]
    HasTransfers,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an entity.
#[derive(Debug, Clone)]
pub struct CreateEntityInput {
    /// Entity name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Input for updating an entity.
#[derive(Debug, Clone, Default)]
pub struct UpdateEntityInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Entity repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EntityRepository {
    db: DatabaseConnection,
}

impl EntityRepository {
    /// Creates a new entity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists entities visible to a wallet: its own plus globals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_wallet(&self, wallet_id: Uuid) -> Result<Vec<entities::Model>, DbErr> {
        entities::Entity::find()
            .filter(
                Condition::any()
                    .add(entities::Column::WalletId.eq(wallet_id))
                    .add(entities::Column::WalletId.is_null()),
            )
            .order_by_asc(entities::Column::Name)
            .all(&self.db)
            .await
    }

    /// Lists global entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_global(&self) -> Result<Vec<entities::Model>, DbErr> {
        entities::Entity::find()
            .filter(entities::Column::WalletId.is_null())
            .order_by_asc(entities::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds an entity visible to a wallet (wallet-scoped or global).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_visible(
        &self,
        wallet_id: Uuid,
        entity_id: Uuid,
    ) -> Result<Option<entities::Model>, DbErr> {
        entities::Entity::find_by_id(entity_id)
            .filter(
                Condition::any()
                    .add(entities::Column::WalletId.eq(wallet_id))
                    .add(entities::Column::WalletId.is_null()),
            )
            .one(&self.db)
            .await
    }

    /// Creates an entity in the given scope (`None` for a global entity).
    ///
    /// # Errors
    ///
    /// Returns `EntityError::DuplicateName` if the name is taken in the
    /// scope (case-insensitive).
    pub async fn create(
        &self,
        wallet_id: Option<Uuid>,
        input: CreateEntityInput,
    ) -> Result<entities::Model, EntityError> {
        self.check_name_free(wallet_id, &input.name, None).await?;

        let now = chrono::Utc::now().into();
        let entity = entities::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet_id),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(entity.insert(&self.db).await?)
    }

    /// Updates an entity owned by the wallet.
    ///
    /// Global entities are not editable through a wallet scope.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` if the wallet does not own the entity
    /// and `EntityError::DuplicateName` on a name collision.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        entity_id: Uuid,
        input: UpdateEntityInput,
    ) -> Result<entities::Model, EntityError> {
        let entity = entities::Entity::find_by_id(entity_id)
            .filter(entities::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await?
            .ok_or(EntityError::NotFound(entity_id))?;

        if let Some(name) = &input.name {
            self.check_name_free(Some(wallet_id), name, Some(entity_id))
                .await?;
        }

        let mut active: entities::ActiveModel = entity.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an entity in the given scope unless transfers reference it.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::HasTransfers` while transfers reference the
    /// entity.
    pub async fn delete(
        &self,
        wallet_id: Option<Uuid>,
        entity_id: Uuid,
    ) -> Result<(), EntityError> {
        let mut query = entities::Entity::find_by_id(entity_id);
        query = match wallet_id {
            Some(id) => query.filter(entities::Column::WalletId.eq(id)),
            None => query.filter(entities::Column::WalletId.is_null()),
        };

        let entity = query
            .one(&self.db)
            .await?
            .ok_or(EntityError::NotFound(entity_id))?;

        let referencing = transfers::Entity::find()
            .filter(transfers::Column::EntityId.eq(entity_id))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(EntityError::HasTransfers);
        }

        let active: entities::ActiveModel = entity.into();
        active.delete(&self.db).await?;

        Ok(())
    }

    async fn check_name_free(
        &self,
        wallet_id: Option<Uuid>,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), EntityError> {
        let scope = match wallet_id {
            Some(id) => Condition::all().add(entities::Column::WalletId.eq(id)),
            None => Condition::all().add(entities::Column::WalletId.is_null()),
        };

        let mut query = entities::Entity::find()
            .filter(scope)
            .filter(entities::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(entities::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(EntityError::DuplicateName);
        }
        Ok(())
    }
}

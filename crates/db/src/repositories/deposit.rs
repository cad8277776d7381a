//! Deposit repository for money container operations.
//!
//! The balance column is owned by the transfer repository, which recomputes
//! it inside the same transaction as every transfer write; this repository
//! only creates, renames, and deletes deposits.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use rust_decimal::Decimal;

use crate::entities::{deposits, sea_orm_active_enums::DepositType, transfers};

/// Error types for deposit operations.
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// Deposit not found.
    #[error("Deposit not found: {0}")]
    NotFound(Uuid),

    /// Deposit name already exists in this wallet.
    #[error("Deposit name already exists in this wallet")]
    DuplicateName,

    /// Transfers still reference the deposit.
    #[error("Deposit is referenced by transfers and cannot be deleted")]
    HasTransfers,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a deposit.
#[derive(Debug, Clone)]
pub struct CreateDepositInput {
    /// Deposit name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Kind of money container.
    pub deposit_type: DepositType,
}

/// Input for updating a deposit.
#[derive(Debug, Clone, Default)]
pub struct UpdateDepositInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New deposit kind.
    pub deposit_type: Option<DepositType>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Deposit repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DepositRepository {
    db: DatabaseConnection,
}

impl DepositRepository {
    /// Creates a new deposit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists deposits in a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, wallet_id: Uuid) -> Result<Vec<deposits::Model>, DbErr> {
        deposits::Entity::find()
            .filter(deposits::Column::WalletId.eq(wallet_id))
            .order_by_asc(deposits::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a deposit scoped to a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        wallet_id: Uuid,
        deposit_id: Uuid,
    ) -> Result<Option<deposits::Model>, DbErr> {
        deposits::Entity::find_by_id(deposit_id)
            .filter(deposits::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await
    }

    /// Creates a deposit with a zero starting balance.
    ///
    /// # Errors
    ///
    /// Returns `DepositError::DuplicateName` if the wallet already has a
    /// deposit with this name.
    pub async fn create(
        &self,
        wallet_id: Uuid,
        input: CreateDepositInput,
    ) -> Result<deposits::Model, DepositError> {
        self.check_name_free(wallet_id, &input.name, None).await?;

        let now = chrono::Utc::now().into();
        let deposit = deposits::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet_id),
            name: Set(input.name),
            description: Set(input.description),
            deposit_type: Set(input.deposit_type),
            is_active: Set(true),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(deposit.insert(&self.db).await?)
    }

    /// Updates a deposit's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns `DepositError::NotFound` if the deposit does not exist in the
    /// wallet and `DepositError::DuplicateName` on a name collision.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        deposit_id: Uuid,
        input: UpdateDepositInput,
    ) -> Result<deposits::Model, DepositError> {
        let deposit = self
            .find(wallet_id, deposit_id)
            .await?
            .ok_or(DepositError::NotFound(deposit_id))?;

        if let Some(name) = &input.name {
            self.check_name_free(wallet_id, name, Some(deposit_id))
                .await?;
        }

        let mut active: deposits::ActiveModel = deposit.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(deposit_type) = input.deposit_type {
            active.deposit_type = Set(deposit_type);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a deposit unless transfers reference it.
    ///
    /// # Errors
    ///
    /// Returns `DepositError::HasTransfers` while transfers reference the
    /// deposit.
    pub async fn delete(&self, wallet_id: Uuid, deposit_id: Uuid) -> Result<(), DepositError> {
        let deposit = self
            .find(wallet_id, deposit_id)
            .await?
            .ok_or(DepositError::NotFound(deposit_id))?;

        let referencing = transfers::Entity::find()
            .filter(transfers::Column::DepositId.eq(deposit_id))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(DepositError::HasTransfers);
        }

        let active: deposits::ActiveModel = deposit.into();
        active.delete(&self.db).await?;

        Ok(())
    }

    async fn check_name_free(
        &self,
        wallet_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), DepositError> {
        let mut query = deposits::Entity::find()
            .filter(deposits::Column::WalletId.eq(wallet_id))
            .filter(deposits::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(deposits::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(DepositError::DuplicateName);
        }
        Ok(())
    }
}

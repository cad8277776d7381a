//! Wallet repository for database operations.
//!
//! Wallet creation inserts the owner membership in the same transaction, and
//! wallet deletion removes every dependent row (transfers, predictions,
//! periods, deposits, entities, categories, memberships) in one transaction,
//! in dependency order.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    categories, deposits, entities, periods, predictions, transfers, users, wallet_users, wallets,
};

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Wallet not found.
    #[error("Wallet not found: {0}")]
    NotFound(Uuid),

    /// Wallet name already used by this owner.
    #[error("Wallet name already exists for this owner")]
    DuplicateName,

    /// No user registered under the given email.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// User is already a member of the wallet.
    #[error("User is already a member of this wallet")]
    AlreadyMember,

    /// User is not a member of the wallet.
    #[error("User is not a member of this wallet")]
    NotMember,

    /// The wallet owner cannot be removed from the member list.
    #[error("The wallet owner cannot be removed")]
    CannotRemoveOwner,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a wallet.
#[derive(Debug, Clone)]
pub struct CreateWalletInput {
    /// Owning user.
    pub owner_id: Uuid,
    /// Wallet name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Input for updating a wallet.
#[derive(Debug, Clone, Default)]
pub struct UpdateWalletInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
}

/// Wallet repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a wallet with the creator as owner and first member.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::DuplicateName` if the owner already has a wallet
    /// with this name.
    pub async fn create_with_owner(
        &self,
        input: CreateWalletInput,
    ) -> Result<wallets::Model, WalletError> {
        let existing = wallets::Entity::find()
            .filter(wallets::Column::OwnerId.eq(input.owner_id))
            .filter(wallets::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(WalletError::DuplicateName);
        }

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let wallet_id = Uuid::new_v4();

        let wallet = wallets::ActiveModel {
            id: Set(wallet_id),
            owner_id: Set(input.owner_id),
            name: Set(input.name),
            description: Set(input.description),
            currency: Set(input.currency),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let wallet = wallet.insert(&txn).await?;

        // The owner is always a member.
        let membership = wallet_users::ActiveModel {
            wallet_id: Set(wallet_id),
            user_id: Set(input.owner_id),
            created_at: Set(now),
        };
        membership.insert(&txn).await?;

        txn.commit().await?;

        Ok(wallet)
    }

    /// Finds a wallet by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<wallets::Model>, DbErr> {
        wallets::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists all wallets the user is a member of.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<wallets::Model>, DbErr> {
        wallet_users::Entity::find()
            .filter(wallet_users::Column::UserId.eq(user_id))
            .find_also_related(wallets::Entity)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().filter_map(|(_, w)| w).collect())
    }

    /// Updates a wallet's name and description.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::NotFound` if the wallet does not exist and
    /// `WalletError::DuplicateName` on a name collision for the owner.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        input: UpdateWalletInput,
    ) -> Result<wallets::Model, WalletError> {
        let wallet = wallets::Entity::find_by_id(wallet_id)
            .one(&self.db)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        if let Some(name) = &input.name {
            let collision = wallets::Entity::find()
                .filter(wallets::Column::OwnerId.eq(wallet.owner_id))
                .filter(wallets::Column::Name.eq(name))
                .filter(wallets::Column::Id.ne(wallet_id))
                .one(&self.db)
                .await?;
            if collision.is_some() {
                return Err(WalletError::DuplicateName);
            }
        }

        let mut active: wallets::ActiveModel = wallet.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Checks if a user is a member of the wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, wallet_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = wallet_users::Entity::find()
            .filter(wallet_users::Column::WalletId.eq(wallet_id))
            .filter(wallet_users::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if a user owns the wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_owner(&self, wallet_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = wallets::Entity::find()
            .filter(wallets::Column::Id.eq(wallet_id))
            .filter(wallets::Column::OwnerId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Lists the members of a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn members(&self, wallet_id: Uuid) -> Result<Vec<users::Model>, DbErr> {
        wallet_users::Entity::find()
            .filter(wallet_users::Column::WalletId.eq(wallet_id))
            .find_also_related(users::Entity)
            .order_by_asc(wallet_users::Column::CreatedAt)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().filter_map(|(_, u)| u).collect())
    }

    /// Adds a user (looked up by email) to the wallet members.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::UserNotFound` for unknown emails and
    /// `WalletError::AlreadyMember` when the membership already exists.
    pub async fn add_member(
        &self,
        wallet_id: Uuid,
        email: &str,
    ) -> Result<users::Model, WalletError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or_else(|| WalletError::UserNotFound(email.to_string()))?;

        if self.is_member(wallet_id, user.id).await? {
            return Err(WalletError::AlreadyMember);
        }

        let membership = wallet_users::ActiveModel {
            wallet_id: Set(wallet_id),
            user_id: Set(user.id),
            created_at: Set(chrono::Utc::now().into()),
        };
        membership.insert(&self.db).await?;

        Ok(user)
    }

    /// Removes a member from the wallet.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::CannotRemoveOwner` for the wallet owner and
    /// `WalletError::NotMember` if the membership does not exist.
    pub async fn remove_member(&self, wallet_id: Uuid, user_id: Uuid) -> Result<(), WalletError> {
        let wallet = wallets::Entity::find_by_id(wallet_id)
            .one(&self.db)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        if wallet.owner_id == user_id {
            return Err(WalletError::CannotRemoveOwner);
        }

        let result = wallet_users::Entity::delete_many()
            .filter(wallet_users::Column::WalletId.eq(wallet_id))
            .filter(wallet_users::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(WalletError::NotMember);
        }

        Ok(())
    }

    /// Deletes a wallet and every dependent row in one transaction.
    ///
    /// Transfers reference periods, deposits, and categories with RESTRICT
    /// foreign keys, so rows are removed in dependency order.
    ///
    /// # Errors
    ///
    /// Returns `WalletError::NotFound` if the wallet does not exist.
    pub async fn delete_cascade(&self, wallet_id: Uuid) -> Result<(), WalletError> {
        let wallet = wallets::Entity::find_by_id(wallet_id)
            .one(&self.db)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        let txn = self.db.begin().await?;

        let period_ids: Vec<Uuid> = periods::Entity::find()
            .filter(periods::Column::WalletId.eq(wallet_id))
            .select_only()
            .column(periods::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;

        if !period_ids.is_empty() {
            transfers::Entity::delete_many()
                .filter(transfers::Column::PeriodId.is_in(period_ids.clone()))
                .exec(&txn)
                .await?;
            predictions::Entity::delete_many()
                .filter(predictions::Column::PeriodId.is_in(period_ids))
                .exec(&txn)
                .await?;
        }

        periods::Entity::delete_many()
            .filter(periods::Column::WalletId.eq(wallet_id))
            .exec(&txn)
            .await?;
        deposits::Entity::delete_many()
            .filter(deposits::Column::WalletId.eq(wallet_id))
            .exec(&txn)
            .await?;
        entities::Entity::delete_many()
            .filter(entities::Column::WalletId.eq(wallet_id))
            .exec(&txn)
            .await?;
        categories::Entity::delete_many()
            .filter(categories::Column::WalletId.eq(wallet_id))
            .exec(&txn)
            .await?;
        wallet_users::Entity::delete_many()
            .filter(wallet_users::Column::WalletId.eq(wallet_id))
            .exec(&txn)
            .await?;

        let active: wallets::ActiveModel = wallet.into();
        active.delete(&txn).await?;

        txn.commit().await?;

        tracing::debug!(wallet_id = %wallet_id, "Wallet and dependent rows deleted");

        Ok(())
    }
}

//! Transfer repository for income and expense records.
//!
//! Every write (create, update, delete) runs in a single transaction that
//! also recomputes the balance of each touched deposit, so a committed
//! transfer can never be observed alongside a stale balance. A transfer's
//! kind (income vs expense) is the kind of its category; the value column
//! is always positive and the sign is applied during balance computation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use sakiewka_core::balance::FlowTotals;
use sakiewka_shared::types::PageRequest;

use crate::entities::{
    categories, deposits, entities, periods, sea_orm_active_enums::CategoryType, transfers,
};

/// Error types for transfer operations.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Transfer not found.
    #[error("Transfer not found: {0}")]
    NotFound(Uuid),

    /// Period not found in the wallet.
    #[error("Period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Deposit not found in the wallet.
    #[error("Deposit not found: {0}")]
    DepositNotFound(Uuid),

    /// Category not found in the wallet.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Entity not visible to the wallet.
    #[error("Entity not found: {0}")]
    EntityNotFound(Uuid),

    /// Category kind does not match the requested transfer kind.
    #[error("Category kind does not match: expected {expected:?}")]
    CategoryKindMismatch {
        /// The kind the endpoint operates on.
        expected: CategoryType,
    },

    /// Value must be positive.
    #[error("Transfer value must be positive")]
    ValueNotPositive,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Budgeting period the transfer is booked into.
    pub period_id: Uuid,
    /// Deposit the money flows into or out of.
    pub deposit_id: Uuid,
    /// Category; its kind decides the balance sign.
    pub category_id: Uuid,
    /// Optional counterparty.
    pub entity_id: Option<Uuid>,
    /// Transfer name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Positive transfer value.
    pub value: Decimal,
    /// Booking date.
    pub date: NaiveDate,
}

/// Input for updating a transfer.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransferInput {
    /// New period.
    pub period_id: Option<Uuid>,
    /// New deposit.
    pub deposit_id: Option<Uuid>,
    /// New category (must keep the transfer's kind).
    pub category_id: Option<Uuid>,
    /// New counterparty (`Some(None)` clears it).
    pub entity_id: Option<Option<Uuid>>,
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New value.
    pub value: Option<Decimal>,
    /// New booking date.
    pub date: Option<NaiveDate>,
}

/// Filters for transfer list queries.
#[derive(Debug, Clone, Default)]
pub struct TransferFilter {
    /// Only transfers in this period.
    pub period_id: Option<Uuid>,
    /// Only transfers in this category.
    pub category_id: Option<Uuid>,
    /// Only transfers on this deposit.
    pub deposit_id: Option<Uuid>,
    /// Only transfers with this counterparty.
    pub entity_id: Option<Uuid>,
    /// Only transfers on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Only transfers on or before this date.
    pub date_to: Option<NaiveDate>,
}

/// Transfer repository for CRUD operations with balance maintenance.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists transfers of one kind in a wallet, newest booking date first.
    ///
    /// Returns the page of transfers and the total number of matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        wallet_id: Uuid,
        kind: CategoryType,
        filter: &TransferFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transfers::Model>, u64), DbErr> {
        let mut query = transfers::Entity::find()
            .inner_join(categories::Entity)
            .filter(categories::Column::WalletId.eq(wallet_id))
            .filter(categories::Column::CategoryType.eq(kind));

        if let Some(period_id) = filter.period_id {
            query = query.filter(transfers::Column::PeriodId.eq(period_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transfers::Column::CategoryId.eq(category_id));
        }
        if let Some(deposit_id) = filter.deposit_id {
            query = query.filter(transfers::Column::DepositId.eq(deposit_id));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(transfers::Column::EntityId.eq(entity_id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(transfers::Column::Date.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transfers::Column::Date.lte(date_to));
        }

        let paginator = query
            .order_by_desc(transfers::Column::Date)
            .order_by_desc(transfers::Column::CreatedAt)
            .paginate(&self.db, page.limit().max(1));

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        Ok((items, total))
    }

    /// Finds a transfer of one kind scoped to a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        wallet_id: Uuid,
        kind: CategoryType,
        transfer_id: Uuid,
    ) -> Result<Option<transfers::Model>, DbErr> {
        transfers::Entity::find_by_id(transfer_id)
            .inner_join(categories::Entity)
            .filter(categories::Column::WalletId.eq(wallet_id))
            .filter(categories::Column::CategoryType.eq(kind))
            .one(&self.db)
            .await
    }

    /// Creates a transfer and recomputes the target deposit balance in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns reference errors when the period, deposit, category, or
    /// entity is missing from the wallet, `TransferError::CategoryKindMismatch`
    /// when the category kind differs from `kind`, and
    /// `TransferError::ValueNotPositive` for non-positive values.
    pub async fn create(
        &self,
        wallet_id: Uuid,
        kind: CategoryType,
        input: CreateTransferInput,
    ) -> Result<transfers::Model, TransferError> {
        if input.value <= Decimal::ZERO {
            return Err(TransferError::ValueNotPositive);
        }

        let txn = self.db.begin().await?;

        Self::check_references(
            &txn,
            wallet_id,
            kind,
            input.period_id,
            input.deposit_id,
            input.category_id,
            input.entity_id,
        )
        .await?;

        let now = chrono::Utc::now().into();
        let transfer = transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            period_id: Set(input.period_id),
            deposit_id: Set(input.deposit_id),
            category_id: Set(input.category_id),
            entity_id: Set(input.entity_id),
            name: Set(input.name),
            description: Set(input.description),
            value: Set(input.value),
            date: Set(input.date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let transfer = transfer.insert(&txn).await?;

        Self::recompute_deposit_balance(&txn, input.deposit_id).await?;

        txn.commit().await?;

        Ok(transfer)
    }

    /// Updates a transfer, recomputing every touched deposit balance in the
    /// same transaction.
    ///
    /// When the transfer moves to another deposit, both the old and the new
    /// deposit are recomputed.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if the transfer does not exist in
    /// the wallet with the requested kind, otherwise the same validation
    /// errors as `create`.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        kind: CategoryType,
        transfer_id: Uuid,
        input: UpdateTransferInput,
    ) -> Result<transfers::Model, TransferError> {
        let existing = self
            .find(wallet_id, kind, transfer_id)
            .await?
            .ok_or(TransferError::NotFound(transfer_id))?;

        let value = input.value.unwrap_or(existing.value);
        if value <= Decimal::ZERO {
            return Err(TransferError::ValueNotPositive);
        }

        let period_id = input.period_id.unwrap_or(existing.period_id);
        let deposit_id = input.deposit_id.unwrap_or(existing.deposit_id);
        let category_id = input.category_id.unwrap_or(existing.category_id);
        let entity_id = input.entity_id.unwrap_or(existing.entity_id);
        let previous_deposit_id = existing.deposit_id;

        let txn = self.db.begin().await?;

        Self::check_references(
            &txn, wallet_id, kind, period_id, deposit_id, category_id, entity_id,
        )
        .await?;

        let mut active: transfers::ActiveModel = existing.into();
        active.period_id = Set(period_id);
        active.deposit_id = Set(deposit_id);
        active.category_id = Set(category_id);
        active.entity_id = Set(entity_id);
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.value = Set(value);
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let transfer = active.update(&txn).await?;

        Self::recompute_deposit_balance(&txn, deposit_id).await?;
        if previous_deposit_id != deposit_id {
            Self::recompute_deposit_balance(&txn, previous_deposit_id).await?;
        }

        txn.commit().await?;

        Ok(transfer)
    }

    /// Deletes a transfer and recomputes its deposit balance in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if the transfer does not exist in
    /// the wallet with the requested kind.
    pub async fn delete(
        &self,
        wallet_id: Uuid,
        kind: CategoryType,
        transfer_id: Uuid,
    ) -> Result<(), TransferError> {
        let existing = self
            .find(wallet_id, kind, transfer_id)
            .await?
            .ok_or(TransferError::NotFound(transfer_id))?;

        let deposit_id = existing.deposit_id;

        let txn = self.db.begin().await?;

        let active: transfers::ActiveModel = existing.into();
        active.delete(&txn).await?;

        Self::recompute_deposit_balance(&txn, deposit_id).await?;

        txn.commit().await?;

        Ok(())
    }

    /// Recomputes a deposit balance as the signed sum of its transfers.
    ///
    /// Exposed for consistency repair jobs; normal writes go through
    /// `create`/`update`/`delete`, which call this inside their transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails.
    pub async fn recompute_deposit_balance<C: ConnectionTrait>(
        conn: &C,
        deposit_id: Uuid,
    ) -> Result<Decimal, DbErr> {
        let totals = FlowTotals {
            incomes: Self::sum_for_kind(conn, deposit_id, CategoryType::Income).await?,
            expenses: Self::sum_for_kind(conn, deposit_id, CategoryType::Expense).await?,
        };
        let balance = totals.net();

        let deposit = deposits::Entity::find_by_id(deposit_id)
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("deposit {deposit_id}")))?;

        let mut active: deposits::ActiveModel = deposit.into();
        active.balance = Set(balance);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await?;

        debug!(deposit_id = %deposit_id, balance = %balance, "Deposit balance recomputed");

        Ok(balance)
    }

    async fn sum_for_kind<C: ConnectionTrait>(
        conn: &C,
        deposit_id: Uuid,
        kind: CategoryType,
    ) -> Result<Decimal, DbErr> {
        let sum: Option<Option<Decimal>> = transfers::Entity::find()
            .inner_join(categories::Entity)
            .filter(transfers::Column::DepositId.eq(deposit_id))
            .filter(categories::Column::CategoryType.eq(kind))
            .select_only()
            .column_as(transfers::Column::Value.sum(), "total")
            .into_tuple()
            .one(conn)
            .await?;

        Ok(sum.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn check_references<C: ConnectionTrait>(
        conn: &C,
        wallet_id: Uuid,
        kind: CategoryType,
        period_id: Uuid,
        deposit_id: Uuid,
        category_id: Uuid,
        entity_id: Option<Uuid>,
    ) -> Result<(), TransferError> {
        let period_count = periods::Entity::find_by_id(period_id)
            .filter(periods::Column::WalletId.eq(wallet_id))
            .count(conn)
            .await?;
        if period_count == 0 {
            return Err(TransferError::PeriodNotFound(period_id));
        }

        let deposit_count = deposits::Entity::find_by_id(deposit_id)
            .filter(deposits::Column::WalletId.eq(wallet_id))
            .count(conn)
            .await?;
        if deposit_count == 0 {
            return Err(TransferError::DepositNotFound(deposit_id));
        }

        let category = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::WalletId.eq(wallet_id))
            .one(conn)
            .await?
            .ok_or(TransferError::CategoryNotFound(category_id))?;
        if category.category_type != kind {
            return Err(TransferError::CategoryKindMismatch { expected: kind });
        }

        if let Some(entity_id) = entity_id {
            let entity_count = entities::Entity::find_by_id(entity_id)
                .filter(
                    sea_orm::Condition::any()
                        .add(entities::Column::WalletId.eq(wallet_id))
                        .add(entities::Column::WalletId.is_null()),
                )
                .count(conn)
                .await?;
            if entity_count == 0 {
                return Err(TransferError::EntityNotFound(entity_id));
            }
        }

        Ok(())
    }
}

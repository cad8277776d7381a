//! Period repository for budgeting period operations.
//!
//! Enforces the period consistency rules: ordered date ranges, no
//! overlapping ranges within a wallet, at most one active period, and no
//! deletion while transfers reference the period. The range checks run in
//! the repository; the schema carries matching EXCLUDE and CHECK constraints
//! as a second line of defense.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use sakiewka_core::period::{find_collision, DateSpan};
use sakiewka_shared::types::PeriodId;

use crate::entities::{periods, transfers};

/// Error types for period operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Period not found.
    #[error("Period not found: {0}")]
    NotFound(Uuid),

    /// Period name already exists in this wallet.
    #[error("Period name already exists in this wallet")]
    DuplicateName,

    /// Start date is not strictly before end date.
    #[error("Start date must be earlier than end date")]
    InvalidDateRange,

    /// Date range collides with another period in the wallet.
    #[error("Period date range collides with period {0}")]
    Overlap(Uuid),

    /// Another period is already active in this wallet.
    #[error("An active period already exists in this wallet")]
    ActivePeriodExists,

    /// Transfers still reference the period.
    #[error("Period is referenced by transfers and cannot be deleted")]
    HasTransfers,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Period name.
    pub name: String,
    /// First day covered.
    pub date_start: NaiveDate,
    /// Last day covered (inclusive).
    pub date_end: NaiveDate,
    /// Whether the period starts active.
    pub is_active: bool,
}

/// Input for updating a period.
#[derive(Debug, Clone, Default)]
pub struct UpdatePeriodInput {
    /// New name.
    pub name: Option<String>,
    /// New start date.
    pub date_start: Option<NaiveDate>,
    /// New end date.
    pub date_end: Option<NaiveDate>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Period repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists periods in a wallet, newest range first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, wallet_id: Uuid) -> Result<Vec<periods::Model>, DbErr> {
        periods::Entity::find()
            .filter(periods::Column::WalletId.eq(wallet_id))
            .order_by_desc(periods::Column::DateStart)
            .all(&self.db)
            .await
    }

    /// Finds a period scoped to a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        wallet_id: Uuid,
        period_id: Uuid,
    ) -> Result<Option<periods::Model>, DbErr> {
        periods::Entity::find_by_id(period_id)
            .filter(periods::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await
    }

    /// Creates a period after validating dates, overlap, and active flag.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidDateRange`, `PeriodError::Overlap`,
    /// `PeriodError::ActivePeriodExists`, or `PeriodError::DuplicateName`
    /// when the respective rule is violated.
    pub async fn create(
        &self,
        wallet_id: Uuid,
        input: CreatePeriodInput,
    ) -> Result<periods::Model, PeriodError> {
        let span = DateSpan::new(input.date_start, input.date_end)
            .map_err(|_| PeriodError::InvalidDateRange)?;

        self.check_name_free(wallet_id, &input.name, None).await?;
        self.check_no_collision(wallet_id, span, None).await?;
        if input.is_active {
            self.check_no_other_active(wallet_id, None).await?;
        }

        let now = chrono::Utc::now().into();
        let period = periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet_id),
            name: Set(input.name),
            date_start: Set(input.date_start),
            date_end: Set(input.date_end),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(period.insert(&self.db).await?)
    }

    /// Updates a period, re-validating the merged state.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::NotFound` if the period does not exist in the
    /// wallet, otherwise the same validation errors as `create`.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        period_id: Uuid,
        input: UpdatePeriodInput,
    ) -> Result<periods::Model, PeriodError> {
        let period = self
            .find(wallet_id, period_id)
            .await?
            .ok_or(PeriodError::NotFound(period_id))?;

        let date_start = input.date_start.unwrap_or(period.date_start);
        let date_end = input.date_end.unwrap_or(period.date_end);
        let is_active = input.is_active.unwrap_or(period.is_active);

        let span =
            DateSpan::new(date_start, date_end).map_err(|_| PeriodError::InvalidDateRange)?;

        if let Some(name) = &input.name {
            self.check_name_free(wallet_id, name, Some(period_id))
                .await?;
        }
        self.check_no_collision(wallet_id, span, Some(period_id))
            .await?;
        if is_active {
            self.check_no_other_active(wallet_id, Some(period_id))
                .await?;
        }

        let mut active: periods::ActiveModel = period.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        active.date_start = Set(date_start);
        active.date_end = Set(date_end);
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a period unless transfers reference it.
    ///
    /// Predictions attached to the period are removed by the schema cascade.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::HasTransfers` while transfers reference the
    /// period.
    pub async fn delete(&self, wallet_id: Uuid, period_id: Uuid) -> Result<(), PeriodError> {
        let period = self
            .find(wallet_id, period_id)
            .await?
            .ok_or(PeriodError::NotFound(period_id))?;

        let referencing = transfers::Entity::find()
            .filter(transfers::Column::PeriodId.eq(period_id))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(PeriodError::HasTransfers);
        }

        let active: periods::ActiveModel = period.into();
        active.delete(&self.db).await?;

        Ok(())
    }

    async fn check_name_free(
        &self,
        wallet_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), PeriodError> {
        let mut query = periods::Entity::find()
            .filter(periods::Column::WalletId.eq(wallet_id))
            .filter(periods::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(periods::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(PeriodError::DuplicateName);
        }
        Ok(())
    }

    async fn check_no_collision(
        &self,
        wallet_id: Uuid,
        span: DateSpan,
        exclude: Option<Uuid>,
    ) -> Result<(), PeriodError> {
        let mut query = periods::Entity::find().filter(periods::Column::WalletId.eq(wallet_id));
        if let Some(id) = exclude {
            query = query.filter(periods::Column::Id.ne(id));
        }
        let others = query.all(&self.db).await?;

        let spans = others.iter().filter_map(|p| {
            DateSpan::new(p.date_start, p.date_end)
                .ok()
                .map(|s| (PeriodId::from_uuid(p.id), s))
        });

        if let Some(hit) = find_collision(span, spans) {
            return Err(PeriodError::Overlap(hit.into_inner()));
        }
        Ok(())
    }

    async fn check_no_other_active(
        &self,
        wallet_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<(), PeriodError> {
        let mut query = periods::Entity::find()
            .filter(periods::Column::WalletId.eq(wallet_id))
            .filter(periods::Column::IsActive.eq(true));
        if let Some(id) = exclude {
            query = query.filter(periods::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(PeriodError::ActivePeriodExists);
        }
        Ok(())
    }
}

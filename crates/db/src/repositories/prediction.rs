//! Prediction repository for planned spend per period and category.
//!
//! A prediction is unique per (period, category); the category must be
//! expense-typed and live in the same wallet as the period.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{categories, periods, predictions, sea_orm_active_enums::CategoryType};

/// Error types for prediction operations.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// Prediction not found.
    #[error("Prediction not found: {0}")]
    NotFound(Uuid),

    /// Prediction already exists for this period and category.
    #[error("Prediction already exists for this period and category")]
    Duplicate,

    /// Period not found in the wallet.
    #[error("Period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Category not found in the wallet.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Predictions can only target expense categories.
    #[error("Predictions can only target expense categories")]
    NotExpenseCategory,

    /// Value must be positive.
    #[error("Prediction value must be positive")]
    ValueNotPositive,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a prediction.
#[derive(Debug, Clone)]
pub struct CreatePredictionInput {
    /// Target period.
    pub period_id: Uuid,
    /// Target expense category.
    pub category_id: Uuid,
    /// Planned spend.
    pub value: Decimal,
    /// Optional description.
    pub description: Option<String>,
}

/// Input for updating a prediction.
#[derive(Debug, Clone, Default)]
pub struct UpdatePredictionInput {
    /// New planned spend.
    pub value: Option<Decimal>,
    /// New description.
    pub description: Option<Option<String>>,
}

/// Prediction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PredictionRepository {
    db: DatabaseConnection,
}

impl PredictionRepository {
    /// Creates a new prediction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists predictions in a wallet, optionally narrowed to one period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        wallet_id: Uuid,
        period_id: Option<Uuid>,
    ) -> Result<Vec<predictions::Model>, DbErr> {
        let mut query = predictions::Entity::find()
            .inner_join(periods::Entity)
            .filter(periods::Column::WalletId.eq(wallet_id));
        if let Some(period_id) = period_id {
            query = query.filter(predictions::Column::PeriodId.eq(period_id));
        }

        query
            .order_by_asc(predictions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds a prediction scoped to a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        wallet_id: Uuid,
        prediction_id: Uuid,
    ) -> Result<Option<predictions::Model>, DbErr> {
        predictions::Entity::find_by_id(prediction_id)
            .inner_join(periods::Entity)
            .filter(periods::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await
    }

    /// Creates a prediction after validating its references.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError::Duplicate` when the (period, category) pair
    /// already has a prediction, and reference errors when the period or
    /// category is missing from the wallet or the category is not
    /// expense-typed.
    pub async fn create(
        &self,
        wallet_id: Uuid,
        input: CreatePredictionInput,
    ) -> Result<predictions::Model, PredictionError> {
        if input.value <= Decimal::ZERO {
            return Err(PredictionError::ValueNotPositive);
        }

        let _period = periods::Entity::find_by_id(input.period_id)
            .filter(periods::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await?
            .ok_or(PredictionError::PeriodNotFound(input.period_id))?;

        let category = categories::Entity::find_by_id(input.category_id)
            .filter(categories::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await?
            .ok_or(PredictionError::CategoryNotFound(input.category_id))?;

        if category.category_type != CategoryType::Expense {
            return Err(PredictionError::NotExpenseCategory);
        }

        let existing = predictions::Entity::find()
            .filter(predictions::Column::PeriodId.eq(input.period_id))
            .filter(predictions::Column::CategoryId.eq(input.category_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(PredictionError::Duplicate);
        }

        let now = chrono::Utc::now().into();
        let prediction = predictions::ActiveModel {
            id: Set(Uuid::new_v4()),
            period_id: Set(input.period_id),
            category_id: Set(input.category_id),
            value: Set(input.value),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(prediction.insert(&self.db).await?)
    }

    /// Updates a prediction's value and description.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError::NotFound` if the prediction does not exist
    /// in the wallet and `PredictionError::ValueNotPositive` for
    /// non-positive values.
    pub async fn update(
        &self,
        wallet_id: Uuid,
        prediction_id: Uuid,
        input: UpdatePredictionInput,
    ) -> Result<predictions::Model, PredictionError> {
        let prediction = self
            .find(wallet_id, prediction_id)
            .await?
            .ok_or(PredictionError::NotFound(prediction_id))?;

        if let Some(value) = input.value {
            if value <= Decimal::ZERO {
                return Err(PredictionError::ValueNotPositive);
            }
        }

        let mut active: predictions::ActiveModel = prediction.into();
        if let Some(value) = input.value {
            active.value = Set(value);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a prediction.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError::NotFound` if the prediction does not exist
    /// in the wallet.
    pub async fn delete(&self, wallet_id: Uuid, prediction_id: Uuid) -> Result<(), PredictionError> {
        let prediction = self
            .find(wallet_id, prediction_id)
            .await?
            .ok_or(PredictionError::NotFound(prediction_id))?;

        let active: predictions::ActiveModel = prediction.into();
        active.delete(&self.db).await?;

        Ok(())
    }
}

//! Dashboard repository for aggregation queries.
//!
//! Produces the read-only inputs for the dashboard views: per-category
//! transfer sums within a period, per-period sums across a wallet, and the
//! prediction-vs-actual pairs. The arithmetic on top of these rows lives in
//! `sakiewka_core::dashboard`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use sakiewka_core::dashboard::{CategoryFlow, PeriodFlows, PeriodTotals, PredictionInput};
use sakiewka_shared::types::{CategoryId, PeriodId};

use crate::entities::{
    categories, periods, predictions, sea_orm_active_enums::CategoryType, transfers,
};

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Period not found in the wallet.
    #[error("Period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Dashboard repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sums transfers per category within one period.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::PeriodNotFound` if the period is missing
    /// from the wallet.
    pub async fn category_flows(
        &self,
        wallet_id: Uuid,
        period_id: Uuid,
    ) -> Result<Vec<CategoryFlow>, DashboardError> {
        self.require_period(wallet_id, period_id).await?;

        let rows: Vec<(Uuid, String, CategoryType, Option<Decimal>)> = transfers::Entity::find()
            .inner_join(categories::Entity)
            .filter(transfers::Column::PeriodId.eq(period_id))
            .select_only()
            .column(categories::Column::Id)
            .column(categories::Column::Name)
            .column(categories::Column::CategoryType)
            .column_as(transfers::Column::Value.sum(), "total")
            .group_by(categories::Column::Id)
            .group_by(categories::Column::Name)
            .group_by(categories::Column::CategoryType)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, kind, total)| CategoryFlow {
                category_id: CategoryId::from_uuid(id),
                category_name: name,
                kind: kind.into(),
                total: total.unwrap_or(Decimal::ZERO),
            })
            .collect())
    }

    /// Sums incomes and expenses per period across a whole wallet.
    ///
    /// Periods without any transfers are included with zero totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn wallet_period_flows(
        &self,
        wallet_id: Uuid,
    ) -> Result<Vec<PeriodFlows>, DashboardError> {
        let wallet_periods = periods::Entity::find()
            .filter(periods::Column::WalletId.eq(wallet_id))
            .order_by_asc(periods::Column::DateStart)
            .all(&self.db)
            .await?;

        let rows: Vec<(Uuid, CategoryType, Option<Decimal>)> = transfers::Entity::find()
            .join(JoinType::InnerJoin, transfers::Relation::Categories.def())
            .join(JoinType::InnerJoin, transfers::Relation::Periods.def())
            .filter(periods::Column::WalletId.eq(wallet_id))
            .select_only()
            .column(transfers::Column::PeriodId)
            .column(categories::Column::CategoryType)
            .column_as(transfers::Column::Value.sum(), "total")
            .group_by(transfers::Column::PeriodId)
            .group_by(categories::Column::CategoryType)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut sums: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for (period_id, kind, total) in rows {
            let entry = sums.entry(period_id).or_default();
            match kind {
                CategoryType::Income => entry.0 += total.unwrap_or(Decimal::ZERO),
                CategoryType::Expense => entry.1 += total.unwrap_or(Decimal::ZERO),
            }
        }

        Ok(wallet_periods
            .into_iter()
            .map(|p| {
                let (incomes_total, expenses_total) =
                    sums.get(&p.id).copied().unwrap_or_default();
                PeriodFlows {
                    period_id: PeriodId::from_uuid(p.id),
                    period_name: p.name,
                    totals: PeriodTotals {
                        incomes_total,
                        expenses_total,
                        balance: incomes_total - expenses_total,
                    },
                }
            })
            .collect())
    }

    /// Pairs each prediction in a period with the actual spend of its
    /// category.
    ///
    /// Categories with spend but no prediction are not reported; the
    /// comparison is driven by what was planned.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::PeriodNotFound` if the period is missing
    /// from the wallet.
    pub async fn prediction_inputs(
        &self,
        wallet_id: Uuid,
        period_id: Uuid,
    ) -> Result<Vec<PredictionInput>, DashboardError> {
        self.require_period(wallet_id, period_id).await?;

        let planned: Vec<(Uuid, String, Decimal)> = predictions::Entity::find()
            .inner_join(categories::Entity)
            .filter(predictions::Column::PeriodId.eq(period_id))
            .select_only()
            .column(predictions::Column::CategoryId)
            .column(categories::Column::Name)
            .column(predictions::Column::Value)
            .order_by_asc(categories::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        let actual_rows: Vec<(Uuid, Option<Decimal>)> = transfers::Entity::find()
            .inner_join(categories::Entity)
            .filter(transfers::Column::PeriodId.eq(period_id))
            .filter(categories::Column::CategoryType.eq(CategoryType::Expense))
            .select_only()
            .column(transfers::Column::CategoryId)
            .column_as(transfers::Column::Value.sum(), "total")
            .group_by(transfers::Column::CategoryId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let actuals: HashMap<Uuid, Decimal> = actual_rows
            .into_iter()
            .map(|(id, total)| (id, total.unwrap_or(Decimal::ZERO)))
            .collect();

        Ok(planned
            .into_iter()
            .map(|(category_id, category_name, predicted)| PredictionInput {
                category_id: CategoryId::from_uuid(category_id),
                category_name,
                predicted,
                actual: actuals.get(&category_id).copied().unwrap_or(Decimal::ZERO),
            })
            .collect())
    }

    async fn require_period(&self, wallet_id: Uuid, period_id: Uuid) -> Result<(), DashboardError> {
        let found = periods::Entity::find_by_id(period_id)
            .filter(periods::Column::WalletId.eq(wallet_id))
            .one(&self.db)
            .await?;

        if found.is_none() {
            return Err(DashboardError::PeriodNotFound(period_id));
        }
        Ok(())
    }
}

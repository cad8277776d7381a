//! Dashboard data types.

use rust_decimal::Decimal;
use sakiewka_shared::types::{CategoryId, PeriodId};
use serde::{Deserialize, Serialize};

use crate::category::CategoryKind;

/// Per-category transfer total within a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFlow {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub category_name: String,
    /// Whether the category groups incomes or expenses.
    pub kind: CategoryKind,
    /// Sum of transfer values in this category.
    pub total: Decimal,
}

/// Income and expense totals for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Sum of all income transfers.
    pub incomes_total: Decimal,
    /// Sum of all expense transfers.
    pub expenses_total: Decimal,
    /// Net result: incomes minus expenses.
    pub balance: Decimal,
}

/// Totals for one period in a wallet-wide dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodFlows {
    /// Period ID.
    pub period_id: PeriodId,
    /// Period name.
    pub period_name: String,
    /// Aggregated totals for the period.
    pub totals: PeriodTotals,
}

/// Input pair for a prediction-vs-actual comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Expense category ID.
    pub category_id: CategoryId,
    /// Expense category name.
    pub category_name: String,
    /// Planned spend for the category in the period.
    pub predicted: Decimal,
    /// Actual spend for the category in the period.
    pub actual: Decimal,
}

/// Prediction-vs-actual outcome for one expense category in a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Expense category ID.
    pub category_id: CategoryId,
    /// Expense category name.
    pub category_name: String,
    /// Planned spend.
    pub predicted: Decimal,
    /// Actual spend.
    pub actual: Decimal,
    /// Variance (predicted - actual); positive means under plan.
    pub variance: Decimal,
    /// Utilization percentage (actual / predicted * 100).
    pub utilization_percent: Decimal,
    /// Variance classification.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Under plan: actual spend below the prediction.
    Favorable,
    /// Over plan: actual spend above the prediction.
    Unfavorable,
    /// Spend exactly on plan.
    OnBudget,
}

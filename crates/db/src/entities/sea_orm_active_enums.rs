//! Active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use sakiewka_core::category::{CategoryKind, CategoryPriority as CoreCategoryPriority};

/// Whether a category groups incomes or expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_type")]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Income category.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expense category.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<CategoryType> for CategoryKind {
    fn from(value: CategoryType) -> Self {
        match value {
            CategoryType::Income => Self::Income,
            CategoryType::Expense => Self::Expense,
        }
    }
}

impl From<CategoryKind> for CategoryType {
    fn from(value: CategoryKind) -> Self {
        match value {
            CategoryKind::Income => Self::Income,
            CategoryKind::Expense => Self::Expense,
        }
    }
}

/// Priority bucket for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_priority")]
#[serde(rename_all = "snake_case")]
pub enum CategoryPriority {
    /// Bucket for all income categories.
    #[sea_orm(string_value = "incomes")]
    Incomes,
    /// Essential expenses.
    #[sea_orm(string_value = "most_important")]
    MostImportant,
    /// Debt repayments.
    #[sea_orm(string_value = "debts")]
    Debts,
    /// Savings contributions.
    #[sea_orm(string_value = "savings")]
    Savings,
    /// Everything else.
    #[sea_orm(string_value = "others")]
    Others,
}

impl From<CategoryPriority> for CoreCategoryPriority {
    fn from(value: CategoryPriority) -> Self {
        match value {
            CategoryPriority::Incomes => Self::Incomes,
            CategoryPriority::MostImportant => Self::MostImportant,
            CategoryPriority::Debts => Self::Debts,
            CategoryPriority::Savings => Self::Savings,
            CategoryPriority::Others => Self::Others,
        }
    }
}

impl From<CoreCategoryPriority> for CategoryPriority {
    fn from(value: CoreCategoryPriority) -> Self {
        match value {
            CoreCategoryPriority::Incomes => Self::Incomes,
            CoreCategoryPriority::MostImportant => Self::MostImportant,
            CoreCategoryPriority::Debts => Self::Debts,
            CoreCategoryPriority::Savings => Self::Savings,
            CoreCategoryPriority::Others => Self::Others,
        }
    }
}

/// Kind of money container a deposit represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deposit_type")]
#[serde(rename_all = "lowercase")]
pub enum DepositType {
    /// Personal account of a single member.
    #[sea_orm(string_value = "personal")]
    Personal,
    /// Shared household account.
    #[sea_orm(string_value = "common")]
    Common,
    /// Emergency reserves.
    #[sea_orm(string_value = "reserves")]
    Reserves,
    /// Investment account.
    #[sea_orm(string_value = "investments")]
    Investments,
    /// Savings account.
    #[sea_orm(string_value = "savings")]
    Savings,
}

//! Transfer category kinds and priorities.
//!
//! Categories classify transfers as incomes or expenses. Every category also
//! carries a priority bucket; the `incomes` bucket is reserved for income
//! categories and the remaining buckets for expense categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by category validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// The priority bucket does not match the category kind.
    #[error("priority {priority} is not valid for {kind} categories")]
    PriorityMismatch {
        /// The category kind being validated.
        kind: CategoryKind,
        /// The offending priority.
        priority: CategoryPriority,
    },
}

/// Whether a category groups incomes or expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Category for money flowing into a deposit.
    Income,
    /// Category for money flowing out of a deposit.
    Expense,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown category kind: {s}")),
        }
    }
}

/// Priority bucket for a category.
///
/// `Incomes` is dedicated to income categories; all other buckets are
/// expense buckets, ordered from most to least important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPriority {
    /// Bucket for all income categories.
    Incomes,
    /// Essential expenses.
    MostImportant,
    /// Debt repayments.
    Debts,
    /// Savings contributions.
    Savings,
    /// Everything else.
    Others,
}

impl std::fmt::Display for CategoryPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Incomes => "incomes",
            Self::MostImportant => "most_important",
            Self::Debts => "debts",
            Self::Savings => "savings",
            Self::Others => "others",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CategoryPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incomes" => Ok(Self::Incomes),
            "most_important" => Ok(Self::MostImportant),
            "debts" => Ok(Self::Debts),
            "savings" => Ok(Self::Savings),
            "others" => Ok(Self::Others),
            _ => Err(format!("Unknown category priority: {s}")),
        }
    }
}

/// Validates that a priority bucket is legal for a category kind.
///
/// # Errors
///
/// Returns `CategoryError::PriorityMismatch` when an income category uses an
/// expense bucket or an expense category uses the `incomes` bucket.
pub fn validate_priority(
    kind: CategoryKind,
    priority: CategoryPriority,
) -> Result<(), CategoryError> {
    let valid = match kind {
        CategoryKind::Income => priority == CategoryPriority::Incomes,
        CategoryKind::Expense => priority != CategoryPriority::Incomes,
    };

    if valid {
        Ok(())
    } else {
        Err(CategoryError::PriorityMismatch { kind, priority })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(CategoryKind::Income, CategoryPriority::Incomes, true)]
    #[case(CategoryKind::Income, CategoryPriority::MostImportant, false)]
    #[case(CategoryKind::Income, CategoryPriority::Others, false)]
    #[case(CategoryKind::Expense, CategoryPriority::Incomes, false)]
    #[case(CategoryKind::Expense, CategoryPriority::MostImportant, true)]
    #[case(CategoryKind::Expense, CategoryPriority::Debts, true)]
    #[case(CategoryKind::Expense, CategoryPriority::Savings, true)]
    #[case(CategoryKind::Expense, CategoryPriority::Others, true)]
    fn test_priority_validation(
        #[case] kind: CategoryKind,
        #[case] priority: CategoryPriority,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_priority(kind, priority).is_ok(), ok);
    }

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(
            CategoryKind::from_str(&CategoryKind::Income.to_string()).unwrap(),
            CategoryKind::Income
        );
        assert_eq!(
            CategoryKind::from_str("EXPENSE").unwrap(),
            CategoryKind::Expense
        );
        assert!(CategoryKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_priority_roundtrip() {
        for priority in [
            CategoryPriority::Incomes,
            CategoryPriority::MostImportant,
            CategoryPriority::Debts,
            CategoryPriority::Savings,
            CategoryPriority::Others,
        ] {
            assert_eq!(
                CategoryPriority::from_str(&priority.to_string()).unwrap(),
                priority
            );
        }
        assert!(CategoryPriority::from_str("urgent").is_err());
    }
}

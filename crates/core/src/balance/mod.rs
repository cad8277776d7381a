//! Signed transfer arithmetic and deposit balances.
//!
//! A deposit's balance is defined as the sum of signed values of every
//! transfer referencing it: incomes add, expenses subtract. The database
//! layer recomputes this sum inside the same transaction as the triggering
//! write; this module holds the arithmetic itself so it can be tested
//! without a database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::CategoryKind;

/// Returns the signed contribution of a transfer to its deposit balance.
///
/// Transfer values are always positive; the sign comes from the category
/// kind of the transfer.
#[must_use]
pub fn signed_value(kind: CategoryKind, value: Decimal) -> Decimal {
    match kind {
        CategoryKind::Income => value,
        CategoryKind::Expense => -value,
    }
}

/// Computes a deposit balance from the transfers referencing it.
#[must_use]
pub fn deposit_balance<I>(transfers: I) -> Decimal
where
    I: IntoIterator<Item = (CategoryKind, Decimal)>,
{
    transfers
        .into_iter()
        .map(|(kind, value)| signed_value(kind, value))
        .sum()
}

/// Income and expense totals split out of a set of transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTotals {
    /// Sum of income transfer values.
    pub incomes: Decimal,
    /// Sum of expense transfer values.
    pub expenses: Decimal,
}

impl FlowTotals {
    /// Splits transfers into income and expense totals.
    #[must_use]
    pub fn from_transfers<I>(transfers: I) -> Self
    where
        I: IntoIterator<Item = (CategoryKind, Decimal)>,
    {
        let mut totals = Self {
            incomes: Decimal::ZERO,
            expenses: Decimal::ZERO,
        };
        for (kind, value) in transfers {
            match kind {
                CategoryKind::Income => totals.incomes += value,
                CategoryKind::Expense => totals.expenses += value,
            }
        }
        totals
    }

    /// Net result: incomes minus expenses.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.incomes - self.expenses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_value() {
        assert_eq!(signed_value(CategoryKind::Income, dec!(100)), dec!(100));
        assert_eq!(signed_value(CategoryKind::Expense, dec!(40)), dec!(-40));
    }

    #[test]
    fn test_income_then_expense_scenario() {
        // Income of 100 on an empty deposit, then an expense of 40.
        let after_income = deposit_balance([(CategoryKind::Income, dec!(100))]);
        assert_eq!(after_income, dec!(100));

        let after_expense = deposit_balance([
            (CategoryKind::Income, dec!(100)),
            (CategoryKind::Expense, dec!(40)),
        ]);
        assert_eq!(after_expense, dec!(60));
    }

    #[test]
    fn test_empty_deposit_balance_is_zero() {
        assert_eq!(deposit_balance(std::iter::empty()), Decimal::ZERO);
    }

    #[test]
    fn test_flow_totals() {
        let totals = FlowTotals::from_transfers([
            (CategoryKind::Income, dec!(1500)),
            (CategoryKind::Expense, dec!(200.50)),
            (CategoryKind::Expense, dec!(99.50)),
            (CategoryKind::Income, dec!(20)),
        ]);
        assert_eq!(totals.incomes, dec!(1520));
        assert_eq!(totals.expenses, dec!(300));
        assert_eq!(totals.net(), dec!(1220));
    }

    fn transfer_strategy() -> impl Strategy<Value = (CategoryKind, Decimal)> {
        (any::<bool>(), 1i64..10_000_000).prop_map(|(income, cents)| {
            let kind = if income {
                CategoryKind::Income
            } else {
                CategoryKind::Expense
            };
            (kind, Decimal::new(cents, 2))
        })
    }

    fn transfers_strategy(max_len: usize) -> impl Strategy<Value = Vec<(CategoryKind, Decimal)>> {
        prop::collection::vec(transfer_strategy(), 0..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The balance equals incomes minus expenses however it is computed.
        #[test]
        fn prop_balance_equals_net_totals(transfers in transfers_strategy(30)) {
            let balance = deposit_balance(transfers.clone());
            let totals = FlowTotals::from_transfers(transfers);
            prop_assert_eq!(balance, totals.net());
        }

        /// Transfer order never changes the balance.
        #[test]
        fn prop_balance_is_order_independent(transfers in transfers_strategy(30)) {
            let forward = deposit_balance(transfers.clone());
            let mut reversed = transfers;
            reversed.reverse();
            prop_assert_eq!(forward, deposit_balance(reversed));
        }

        /// Adding an income raises the balance by exactly its value.
        #[test]
        fn prop_income_raises_balance(
            transfers in transfers_strategy(30),
            value in 1i64..10_000_000,
        ) {
            let value = Decimal::new(value, 2);
            let before = deposit_balance(transfers.clone());
            let mut with_income = transfers;
            with_income.push((CategoryKind::Income, value));
            prop_assert_eq!(deposit_balance(with_income), before + value);
        }

        /// Adding an expense lowers the balance by exactly its value.
        #[test]
        fn prop_expense_lowers_balance(
            transfers in transfers_strategy(30),
            value in 1i64..10_000_000,
        ) {
            let value = Decimal::new(value, 2);
            let before = deposit_balance(transfers.clone());
            let mut with_expense = transfers;
            with_expense.push((CategoryKind::Expense, value));
            prop_assert_eq!(deposit_balance(with_expense), before - value);
        }
    }
}

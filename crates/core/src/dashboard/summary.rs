//! Dashboard aggregation calculations.

use rust_decimal::Decimal;

use crate::category::CategoryKind;

use super::types::{CategoryFlow, PeriodTotals, PredictionInput, PredictionOutcome, VarianceStatus};

/// Folds per-category flows into period totals.
#[must_use]
pub fn period_totals(flows: &[CategoryFlow]) -> PeriodTotals {
    let mut incomes_total = Decimal::ZERO;
    let mut expenses_total = Decimal::ZERO;

    for flow in flows {
        match flow.kind {
            CategoryKind::Income => incomes_total += flow.total,
            CategoryKind::Expense => expenses_total += flow.total,
        }
    }

    PeriodTotals {
        incomes_total,
        expenses_total,
        balance: incomes_total - expenses_total,
    }
}

/// Compares a planned spend against the actual spend.
///
/// For expenses, staying under plan is favorable and exceeding it is
/// unfavorable. Utilization against a zero prediction is reported as zero
/// rather than dividing by zero.
#[must_use]
pub fn prediction_outcome(input: PredictionInput) -> PredictionOutcome {
    let variance = input.predicted - input.actual;
    let utilization_percent = if input.predicted.is_zero() {
        Decimal::ZERO
    } else {
        (input.actual / input.predicted) * Decimal::ONE_HUNDRED
    };

    let status = if variance.is_zero() {
        VarianceStatus::OnBudget
    } else if variance.is_sign_positive() {
        VarianceStatus::Favorable
    } else {
        VarianceStatus::Unfavorable
    };

    PredictionOutcome {
        category_id: input.category_id,
        category_name: input.category_name,
        predicted: input.predicted,
        actual: input.actual,
        variance,
        utilization_percent,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sakiewka_shared::types::CategoryId;

    fn flow(name: &str, kind: CategoryKind, total: Decimal) -> CategoryFlow {
        CategoryFlow {
            category_id: CategoryId::new(),
            category_name: name.to_string(),
            kind,
            total,
        }
    }

    #[test]
    fn test_period_totals_empty() {
        let totals = period_totals(&[]);
        assert_eq!(totals.incomes_total, Decimal::ZERO);
        assert_eq!(totals.expenses_total, Decimal::ZERO);
        assert_eq!(totals.balance, Decimal::ZERO);
    }

    #[test]
    fn test_period_totals_splits_kinds() {
        let flows = vec![
            flow("Salary", CategoryKind::Income, dec!(5000)),
            flow("Freelance", CategoryKind::Income, dec!(1200.50)),
            flow("Groceries", CategoryKind::Expense, dec!(850.25)),
            flow("Rent", CategoryKind::Expense, dec!(2400)),
        ];

        let totals = period_totals(&flows);
        assert_eq!(totals.incomes_total, dec!(6200.50));
        assert_eq!(totals.expenses_total, dec!(3250.25));
        assert_eq!(totals.balance, dec!(2950.25));
    }

    #[test]
    fn test_period_totals_can_be_negative() {
        let flows = vec![
            flow("Salary", CategoryKind::Income, dec!(1000)),
            flow("Repairs", CategoryKind::Expense, dec!(1500)),
        ];
        assert_eq!(period_totals(&flows).balance, dec!(-500));
    }

    fn input(predicted: Decimal, actual: Decimal) -> PredictionInput {
        PredictionInput {
            category_id: CategoryId::new(),
            category_name: "Groceries".to_string(),
            predicted,
            actual,
        }
    }

    #[rstest]
    #[case(dec!(1000), dec!(800), dec!(200), dec!(80), VarianceStatus::Favorable)]
    #[case(dec!(1000), dec!(1250), dec!(-250), dec!(125), VarianceStatus::Unfavorable)]
    #[case(dec!(1000), dec!(1000), dec!(0), dec!(100), VarianceStatus::OnBudget)]
    fn test_prediction_outcome(
        #[case] predicted: Decimal,
        #[case] actual: Decimal,
        #[case] variance: Decimal,
        #[case] utilization: Decimal,
        #[case] status: VarianceStatus,
    ) {
        let outcome = prediction_outcome(input(predicted, actual));
        assert_eq!(outcome.variance, variance);
        assert_eq!(outcome.utilization_percent, utilization);
        assert_eq!(outcome.status, status);
    }

    #[test]
    fn test_zero_prediction_does_not_divide() {
        let outcome = prediction_outcome(input(dec!(0), dec!(50)));
        assert_eq!(outcome.utilization_percent, Decimal::ZERO);
        assert_eq!(outcome.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_untouched_prediction_is_favorable() {
        let outcome = prediction_outcome(input(dec!(300), dec!(0)));
        assert_eq!(outcome.variance, dec!(300));
        assert_eq!(outcome.status, VarianceStatus::Favorable);
    }
}

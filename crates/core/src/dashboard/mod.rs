//! Period aggregation and prediction-vs-actual variance.

pub mod summary;
pub mod types;

pub use summary::{period_totals, prediction_outcome};
pub use types::{
    CategoryFlow, PeriodFlows, PeriodTotals, PredictionInput, PredictionOutcome, VarianceStatus,
};

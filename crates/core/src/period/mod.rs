//! Budgeting period date ranges and collision detection.

pub mod span;

pub use span::{find_collision, DateSpan, PeriodError};

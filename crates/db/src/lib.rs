//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every write that touches more than one row (transfer writes with their
//! deposit balance recomputation, wallet creation with owner membership,
//! wallet cascade deletion) runs inside a single database transaction.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CategoryRepository, DashboardRepository, DepositRepository, EntityRepository,
    PeriodRepository, PredictionRepository, SessionRepository, TransferRepository, UserRepository,
    WalletRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

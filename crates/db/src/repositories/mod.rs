//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod category;
pub mod dashboard;
pub mod deposit;
pub mod entity;
pub mod period;
pub mod prediction;
pub mod session;
pub mod transfer;
pub mod user;
pub mod wallet;

pub use category::{CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput};
pub use dashboard::{DashboardError, DashboardRepository};
pub use deposit::{CreateDepositInput, DepositError, DepositRepository, UpdateDepositInput};
pub use entity::{CreateEntityInput, EntityError, EntityRepository, UpdateEntityInput};
pub use period::{CreatePeriodInput, PeriodError, PeriodRepository, UpdatePeriodInput};
pub use prediction::{
    CreatePredictionInput, PredictionError, PredictionRepository, UpdatePredictionInput,
};
pub use session::SessionRepository;
pub use transfer::{
    CreateTransferInput, TransferError, TransferFilter, TransferRepository, UpdateTransferInput,
};
pub use user::UserRepository;
pub use wallet::{CreateWalletInput, UpdateWalletInput, WalletError, WalletRepository};

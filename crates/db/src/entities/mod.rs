//! `SeaORM` entity definitions for the Sakiewka schema.

pub mod categories;
pub mod deposits;
pub mod entities;
pub mod periods;
pub mod predictions;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod transfers;
pub mod users;
pub mod wallet_users;
pub mod wallets;

//! Integration tests for transfer writes and deposit balance maintenance.
//!
//! These tests need a running PostgreSQL instance; point `DATABASE_URL` at a
//! scratch database and run with `cargo test -- --ignored`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use sakiewka_db::entities::sea_orm_active_enums::{CategoryPriority, CategoryType, DepositType};
use sakiewka_db::migration::Migrator;
use sakiewka_db::repositories::{
    category::CreateCategoryInput, deposit::CreateDepositInput, period::CreatePeriodInput,
    transfer::CreateTransferInput, transfer::UpdateTransferInput, wallet::CreateWalletInput,
    CategoryRepository, DepositRepository, PeriodRepository, TransferRepository, UserRepository,
    WalletRepository,
};

struct Fixture {
    db: DatabaseConnection,
    wallet_id: uuid::Uuid,
    period_id: uuid::Uuid,
    deposit_id: uuid::Uuid,
    income_category_id: uuid::Uuid,
    expense_category_id: uuid::Uuid,
}

async fn setup(tag: &str) -> Fixture {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = sakiewka_db::connect(&url).await.expect("connect");
    Migrator::fresh(&db).await.expect("migrate");

    let users = UserRepository::new(db.clone());
    let user = users
        .create(&format!("{tag}@example.com"), "$argon2id$stub", "Test User")
        .await
        .expect("create user");

    let wallets = WalletRepository::new(db.clone());
    let wallet = wallets
        .create_with_owner(CreateWalletInput {
            owner_id: user.id,
            name: "Household".to_string(),
            description: None,
            currency: "PLN".to_string(),
        })
        .await
        .expect("create wallet");

    let periods = PeriodRepository::new(db.clone());
    let period = periods
        .create(
            wallet.id,
            CreatePeriodInput {
                name: "2026-01".to_string(),
                date_start: date(2026, 1, 1),
                date_end: date(2026, 1, 31),
                is_active: true,
            },
        )
        .await
        .expect("create period");

    let deposits = DepositRepository::new(db.clone());
    let deposit = deposits
        .create(
            wallet.id,
            CreateDepositInput {
                name: "Checking".to_string(),
                description: None,
                deposit_type: DepositType::Personal,
            },
        )
        .await
        .expect("create deposit");

    let categories = CategoryRepository::new(db.clone());
    let income_category = categories
        .create(
            wallet.id,
            CreateCategoryInput {
                name: "Salary".to_string(),
                description: None,
                category_type: CategoryType::Income,
                priority: CategoryPriority::Incomes,
            },
        )
        .await
        .expect("create income category");
    let expense_category = categories
        .create(
            wallet.id,
            CreateCategoryInput {
                name: "Groceries".to_string(),
                description: None,
                category_type: CategoryType::Expense,
                priority: CategoryPriority::MostImportant,
            },
        )
        .await
        .expect("create expense category");

    Fixture {
        db,
        wallet_id: wallet.id,
        period_id: period.id,
        deposit_id: deposit.id,
        income_category_id: income_category.id,
        expense_category_id: expense_category.id,
    }
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn transfer_input(f: &Fixture, category_id: uuid::Uuid, value: Decimal) -> CreateTransferInput {
    CreateTransferInput {
        period_id: f.period_id,
        deposit_id: f.deposit_id,
        category_id,
        entity_id: None,
        name: "transfer".to_string(),
        description: None,
        value,
        date: date(2026, 1, 10),
    }
}

async fn balance(f: &Fixture) -> Decimal {
    let deposits = DepositRepository::new(f.db.clone());
    deposits
        .find(f.wallet_id, f.deposit_id)
        .await
        .expect("find deposit")
        .expect("deposit exists")
        .balance
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn income_then_expense_updates_balance() {
    let f = setup("balance1").await;
    let transfers = TransferRepository::new(f.db.clone());

    transfers
        .create(
            f.wallet_id,
            CategoryType::Income,
            transfer_input(&f, f.income_category_id, dec!(100)),
        )
        .await
        .expect("create income");
    assert_eq!(balance(&f).await, dec!(100));

    transfers
        .create(
            f.wallet_id,
            CategoryType::Expense,
            transfer_input(&f, f.expense_category_id, dec!(40)),
        )
        .await
        .expect("create expense");
    assert_eq!(balance(&f).await, dec!(60));
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn update_and_delete_keep_balance_consistent() {
    let f = setup("balance2").await;
    let transfers = TransferRepository::new(f.db.clone());

    let income = transfers
        .create(
            f.wallet_id,
            CategoryType::Income,
            transfer_input(&f, f.income_category_id, dec!(250)),
        )
        .await
        .expect("create income");
    assert_eq!(balance(&f).await, dec!(250));

    transfers
        .update(
            f.wallet_id,
            CategoryType::Income,
            income.id,
            UpdateTransferInput {
                value: Some(dec!(300)),
                ..UpdateTransferInput::default()
            },
        )
        .await
        .expect("update income");
    assert_eq!(balance(&f).await, dec!(300));

    transfers
        .delete(f.wallet_id, CategoryType::Income, income.id)
        .await
        .expect("delete income");
    assert_eq!(balance(&f).await, Decimal::ZERO);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn kind_mismatch_is_rejected() {
    let f = setup("balance3").await;
    let transfers = TransferRepository::new(f.db.clone());

    let result = transfers
        .create(
            f.wallet_id,
            CategoryType::Income,
            transfer_input(&f, f.expense_category_id, dec!(10)),
        )
        .await;

    assert!(matches!(
        result,
        Err(sakiewka_db::repositories::TransferError::CategoryKindMismatch { .. })
    ));
    assert_eq!(balance(&f).await, Decimal::ZERO);
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn referenced_category_and_deposit_cannot_be_deleted() {
    let f = setup("balance4").await;
    let transfers = TransferRepository::new(f.db.clone());

    transfers
        .create(
            f.wallet_id,
            CategoryType::Expense,
            transfer_input(&f, f.expense_category_id, dec!(15)),
        )
        .await
        .expect("create expense");

    let categories = CategoryRepository::new(f.db.clone());
    assert!(matches!(
        categories.delete(f.wallet_id, f.expense_category_id).await,
        Err(sakiewka_db::repositories::CategoryError::HasTransfers)
    ));

    let deposits = DepositRepository::new(f.db.clone());
    assert!(matches!(
        deposits.delete(f.wallet_id, f.deposit_id).await,
        Err(sakiewka_db::repositories::DepositError::HasTransfers)
    ));
}

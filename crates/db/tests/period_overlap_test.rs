//! Integration tests for period consistency rules.
//!
//! These tests need a running PostgreSQL instance; point `DATABASE_URL` at a
//! scratch database and run with `cargo test -- --ignored`.

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use sakiewka_db::migration::Migrator;
use sakiewka_db::repositories::{
    period::{CreatePeriodInput, PeriodError, UpdatePeriodInput},
    wallet::CreateWalletInput,
    PeriodRepository, UserRepository, WalletRepository,
};

async fn setup(tag: &str) -> (DatabaseConnection, uuid::Uuid) {
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

    (db, wallet.id)
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn period(name: &str, start: chrono::NaiveDate, end: chrono::NaiveDate) -> CreatePeriodInput {
    CreatePeriodInput {
        name: name.to_string(),
        date_start: start,
        date_end: end,
        is_active: false,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn overlapping_periods_are_rejected() {
    let (db, wallet_id) = setup("overlap1").await;
    let periods = PeriodRepository::new(db);

    periods
        .create(
            wallet_id,
            period("January", date(2026, 1, 1), date(2026, 1, 31)),
        )
        .await
        .expect("create first period");

    // Intersects January on the 20th..31st.
    let result = periods
        .create(
            wallet_id,
            period("Late January", date(2026, 1, 20), date(2026, 2, 10)),
        )
        .await;
    assert!(matches!(result, Err(PeriodError::Overlap(_))));

    // Disjoint range is accepted.
    periods
        .create(
            wallet_id,
            period("February", date(2026, 2, 1), date(2026, 2, 28)),
        )
        .await
        .expect("create disjoint period");
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn update_cannot_introduce_overlap() {
    let (db, wallet_id) = setup("overlap2").await;
    let periods = PeriodRepository::new(db);

    periods
        .create(
            wallet_id,
            period("January", date(2026, 1, 1), date(2026, 1, 31)),
        )
        .await
        .expect("create january");
    let february = periods
        .create(
            wallet_id,
            period("February", date(2026, 2, 1), date(2026, 2, 28)),
        )
        .await
        .expect("create february");

    let result = periods
        .update(
            wallet_id,
            february.id,
            UpdatePeriodInput {
                date_start: Some(date(2026, 1, 15)),
                ..UpdatePeriodInput::default()
            },
        )
        .await;
    assert!(matches!(result, Err(PeriodError::Overlap(_))));

    // Shrinking its own range is fine, including keeping the same bounds.
    periods
        .update(
            wallet_id,
            february.id,
            UpdatePeriodInput {
                date_end: Some(date(2026, 2, 20)),
                ..UpdatePeriodInput::default()
            },
        )
        .await
        .expect("shrink february");
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn ordered_dates_and_single_active_are_enforced() {
    let (db, wallet_id) = setup("overlap3").await;
    let periods = PeriodRepository::new(db);

    let result = periods
        .create(
            wallet_id,
            period("Backwards", date(2026, 3, 31), date(2026, 3, 1)),
        )
        .await;
    assert!(matches!(result, Err(PeriodError::InvalidDateRange)));

    periods
        .create(
            wallet_id,
            CreatePeriodInput {
                is_active: true,
                ..period("March", date(2026, 3, 1), date(2026, 3, 31))
            },
        )
        .await
        .expect("create active period");

    let result = periods
        .create(
            wallet_id,
            CreatePeriodInput {
                is_active: true,
                ..period("April", date(2026, 4, 1), date(2026, 4, 30))
            },
        )
        .await;
    assert!(matches!(result, Err(PeriodError::ActivePeriodExists)));
}

//! Development data seeder for Sakiewka.
//!
//! Seeds a demo user with one wallet, a budgeting period, deposits,
//! categories, predictions, and a handful of transfers so the dashboard has
//! something to show. Safe to re-run: if the demo user exists, nothing is
//! touched.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use sakiewka_core::auth::hash_password;
use sakiewka_db::entities::sea_orm_active_enums::{CategoryPriority, CategoryType, DepositType};
use sakiewka_db::repositories::{
    category::CreateCategoryInput, deposit::CreateDepositInput, entity::CreateEntityInput,
    period::CreatePeriodInput, prediction::CreatePredictionInput, transfer::CreateTransferInput,
    wallet::CreateWalletInput, CategoryRepository, DepositRepository, EntityRepository,
    PeriodRepository, PredictionRepository, TransferRepository, UserRepository, WalletRepository,
};

const DEMO_EMAIL: &str = "demo@sakiewka.dev";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = sakiewka_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let users = UserRepository::new(db.clone());
    if users
        .find_by_email(DEMO_EMAIL)
        .await
        .expect("Failed to query users")
        .is_some()
    {
        println!("Demo user already exists, skipping seed.");
        return;
    }

    println!("Seeding demo user...");
    let password_hash = hash_password(DEMO_PASSWORD).expect("Failed to hash password");
    let user = users
        .create(DEMO_EMAIL, &password_hash, "Demo User")
        .await
        .expect("Failed to create demo user");

    println!("Seeding wallet...");
    let wallets = WalletRepository::new(db.clone());
    let wallet = wallets
        .create_with_owner(CreateWalletInput {
            owner_id: user.id,
            name: "Household".to_string(),
            description: Some("Shared household budget".to_string()),
            currency: "PLN".to_string(),
        })
        .await
        .expect("Failed to create wallet");

    println!("Seeding period...");
    let periods = PeriodRepository::new(db.clone());
    let period = periods
        .create(
            wallet.id,
            CreatePeriodInput {
                name: "2026-08".to_string(),
                date_start: date(2026, 8, 1),
                date_end: date(2026, 8, 31),
                is_active: true,
            },
        )
        .await
        .expect("Failed to create period");

    println!("Seeding deposits...");
    let deposits = DepositRepository::new(db.clone());
    let checking = deposits
        .create(
            wallet.id,
            CreateDepositInput {
                name: "Checking account".to_string(),
                description: None,
                deposit_type: DepositType::Personal,
            },
        )
        .await
        .expect("Failed to create deposit");
    deposits
        .create(
            wallet.id,
            CreateDepositInput {
                name: "Rainy day fund".to_string(),
                description: None,
                deposit_type: DepositType::Reserves,
            },
        )
        .await
        .expect("Failed to create deposit");

    println!("Seeding categories...");
    let categories = CategoryRepository::new(db.clone());
    let salary = categories
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
        .expect("Failed to create category");
    let groceries = categories
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
        .expect("Failed to create category");
    let eating_out = categories
        .create(
            wallet.id,
            CreateCategoryInput {
                name: "Eating out".to_string(),
                description: None,
                category_type: CategoryType::Expense,
                priority: CategoryPriority::Others,
            },
        )
        .await
        .expect("Failed to create category");

    println!("Seeding entities...");
    let entities = EntityRepository::new(db.clone());
    let employer = entities
        .create(
            Some(wallet.id),
            CreateEntityInput {
                name: "Acme Corp".to_string(),
                description: Some("Employer".to_string()),
            },
        )
        .await
        .expect("Failed to create entity");
    let supermarket = entities
        .create(
            Some(wallet.id),
            CreateEntityInput {
                name: "Local supermarket".to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create entity");

    println!("Seeding predictions...");
    let predictions = PredictionRepository::new(db.clone());
    predictions
        .create(
            wallet.id,
            CreatePredictionInput {
                period_id: period.id,
                category_id: groceries.id,
                value: dec!(1200),
                description: None,
            },
        )
        .await
        .expect("Failed to create prediction");
    predictions
        .create(
            wallet.id,
            CreatePredictionInput {
                period_id: period.id,
                category_id: eating_out.id,
                value: dec!(400),
                description: None,
            },
        )
        .await
        .expect("Failed to create prediction");

    println!("Seeding transfers...");
    let transfers = TransferRepository::new(db.clone());
    transfers
        .create(
            wallet.id,
            CategoryType::Income,
            CreateTransferInput {
                period_id: period.id,
                deposit_id: checking.id,
                category_id: salary.id,
                entity_id: Some(employer.id),
                name: "August salary".to_string(),
                description: None,
                value: dec!(7500),
                date: date(2026, 8, 1),
            },
        )
        .await
        .expect("Failed to create transfer");
    transfers
        .create(
            wallet.id,
            CategoryType::Expense,
            CreateTransferInput {
                period_id: period.id,
                deposit_id: checking.id,
                category_id: groceries.id,
                entity_id: Some(supermarket.id),
                name: "Weekly groceries".to_string(),
                description: None,
                value: dec!(342.80),
                date: date(2026, 8, 3),
            },
        )
        .await
        .expect("Failed to create transfer");
    transfers
        .create(
            wallet.id,
            CategoryType::Expense,
            CreateTransferInput {
                period_id: period.id,
                deposit_id: checking.id,
                category_id: eating_out.id,
                entity_id: None,
                name: "Pizza night".to_string(),
                description: None,
                value: dec!(86.50),
                date: date(2026, 8, 5),
            },
        )
        .await
        .expect("Failed to create transfer");

    println!("Seeding complete! Log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

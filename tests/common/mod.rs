//! Common test utilities
//!
//! Database-backed tests run against the database named by
//! `DATABASE_URL`. Migrations are applied on first contact; each test
//! creates its own users and accounts, so tests can run in parallel
//! against one database.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use minibank::domain::{AccountId, User, UserId};
use minibank::repository::UsersRepository;
use minibank::{FixedRateProvider, Service};

pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to the test database");

    apply_migrations(&pool).await;

    pool
}

async fn apply_migrations(pool: &PgPool) {
    let migrated: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'ledger'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .expect("failed to probe schema");

    if migrated {
        return;
    }

    for file in [
        "migrations/000001_init_tables.up.sql",
        "migrations/000002_cashbook.up.sql",
    ] {
        let sql = std::fs::read_to_string(file).expect("failed to read migration file");
        sqlx::raw_sql(&sql)
            .execute(pool)
            .await
            .expect("failed to apply migration");
    }
}

/// Service wired with the fixed test rate: 1 USD = 0.92 EUR.
pub fn test_service(pool: &PgPool) -> Service {
    Service::new(
        pool.clone(),
        Arc::new(FixedRateProvider::new(Decimal::new(92, 2))),
    )
}

pub struct TestUser {
    pub user_id: UserId,
    pub usd_account: AccountId,
    pub eur_account: AccountId,
}

/// Create a user row and open its funded accounts: 1000 USD, 500 EUR.
pub async fn register_test_user(service: &Service, pool: &PgPool) -> TestUser {
    let user_id = UserId::new();
    let now = Utc::now();
    let user = User::new(
        user_id,
        format!("{}@test.example", Uuid::new_v4()),
        "irrelevant-hash".to_string(),
        now,
        now,
    );

    UsersRepository
        .save(pool, &user)
        .await
        .expect("failed to save test user");

    let (usd, eur) = service
        .open_user_accounts(user_id, now)
        .await
        .expect("failed to open test accounts");

    TestUser {
        user_id,
        usd_account: usd.id(),
        eur_account: eur.id(),
    }
}

pub async fn account_balance(pool: &PgPool, account_id: AccountId) -> Decimal {
    sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("failed to read account balance")
}

pub async fn ledger_record_count(pool: &PgPool, account_id: AccountId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM ledger WHERE account = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("failed to count ledger records")
}

/// The two standing invariants: per-currency ledger totals are zero and
/// every account balance matches its ledger sum.
pub async fn assert_ledger_balanced(service: &Service) {
    service
        .check_ledger_balance_by_currency()
        .await
        .expect("ledger should be balanced for each currency");
    service
        .check_all_account_balances()
        .await
        .expect("all account balances should match ledger sums");
}

//! Database module
//!
//! Pool construction and schema/seed verification. Migrations are raw
//! SQL files in `migrations/`; this module only verifies that they have
//! been applied and that the reserved cashbook rows exist.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::domain::{CASHBOOK_EUR, CASHBOOK_USD, CASHBOOK_USER_ID};

/// Connect a pool sized from configuration.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Check if required tables and seed rows exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = [
        "users",
        "accounts",
        "transactions",
        "transfer_details",
        "exchange_details",
        "ledger",
    ];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    if !check_cashbook_rows(pool).await? {
        return Ok(false);
    }

    Ok(true)
}

/// Verify the seeded cashbook user and the two cashbook accounts.
async fn check_cashbook_rows(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let user_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(CASHBOOK_USER_ID)
        .fetch_one(pool)
        .await?;

    if !user_exists {
        tracing::error!(
            "reserved cashbook user {} does not exist, run the seed migration",
            CASHBOOK_USER_ID
        );
        return Ok(false);
    }

    for (account_id, name) in [(CASHBOOK_USD, "USD cashbook"), (CASHBOOK_EUR, "EUR cashbook")] {
        let account_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)")
                .bind(account_id)
                .fetch_one(pool)
                .await?;

        if !account_exists {
            tracing::error!(
                "reserved {} account {} does not exist, run the seed migration",
                name,
                account_id
            );
            return Ok(false);
        }
    }

    tracing::info!("cashbook rows verified");
    Ok(true)
}

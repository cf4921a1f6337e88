//! Accounts repository

use rust_decimal::Decimal;
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use crate::domain::{Account, AccountId, Currency, DomainError, Money, UserId};
use crate::error::AppResult;

type AccountRow = (Uuid, Uuid, Decimal, Currency);

fn account_from_row((id, user_id, balance, currency): AccountRow) -> Account {
    Account::new(
        AccountId::from_uuid(id),
        UserId::from_uuid(user_id),
        Money::new(balance, currency),
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountsRepository;

impl AccountsRepository {
    /// Plain read, no lock.
    pub async fn get<'e>(&self, db: impl PgExecutor<'e>, id: AccountId) -> AppResult<Account> {
        const QUERY: &str = r#"
            SELECT id, user_id, balance, currency
            FROM accounts
            WHERE id = $1
        "#;

        let row: Option<AccountRow> = sqlx::query_as(QUERY).bind(id).fetch_optional(db).await?;

        row.map(account_from_row)
            .ok_or_else(|| DomainError::AccountNotFound(id).into())
    }

    /// Read under a row-level exclusive lock. Must run inside a unit of
    /// work for the lock to outlive the call.
    pub async fn get_for_update<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: AccountId,
    ) -> AppResult<Account> {
        const QUERY: &str = r#"
            SELECT id, user_id, balance, currency
            FROM accounts
            WHERE id = $1
            FOR UPDATE
        "#;

        let row: Option<AccountRow> = sqlx::query_as(QUERY).bind(id).fetch_optional(db).await?;

        row.map(account_from_row)
            .ok_or_else(|| DomainError::AccountNotFound(id).into())
    }

    pub async fn get_by_user_id<'e>(
        &self,
        db: impl PgExecutor<'e>,
        user_id: UserId,
    ) -> AppResult<Vec<Account>> {
        const QUERY: &str = r#"
            SELECT id, user_id, balance, currency
            FROM accounts
            WHERE user_id = $1
        "#;

        let rows: Vec<AccountRow> = sqlx::query_as(QUERY).bind(user_id).fetch_all(db).await?;

        Ok(rows.into_iter().map(account_from_row).collect())
    }

    /// Upsert by id. The currency column never changes in practice; the
    /// balance is whatever the aggregate holds now.
    pub async fn save<'e>(&self, db: impl PgExecutor<'e>, account: &Account) -> AppResult<()> {
        const QUERY: &str = r#"
            INSERT INTO accounts (id, user_id, balance, currency)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET
                balance = EXCLUDED.balance,
                currency = EXCLUDED.currency
        "#;

        sqlx::query(QUERY)
            .bind(account.id())
            .bind(account.user_id())
            .bind(account.balance().amount())
            .bind(account.balance().currency())
            .execute(db)
            .await?;

        Ok(())
    }

    pub async fn count<'e>(&self, db: impl PgExecutor<'e>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}

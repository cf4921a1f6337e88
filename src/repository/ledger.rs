//! Ledger repository
//!
//! Read-only aggregates over the append-only ledger. These queries back
//! both the inline invariant checks and the reconciliation report.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use crate::domain::{AccountId, Currency, Money};
use crate::error::AppResult;

/// One account whose stored balance disagrees with its ledger sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalanceMismatch {
    pub account_id: AccountId,
    pub account_balance: Decimal,
    pub ledger_balance: Decimal,
    pub currency: Currency,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerRepository;

impl LedgerRepository {
    /// Per-currency totals over the whole ledger. A balanced book sums
    /// to zero in every currency.
    pub async fn get_total_balance_by_currency<'e>(
        &self,
        db: impl PgExecutor<'e>,
    ) -> AppResult<HashMap<Currency, Money>> {
        const QUERY: &str =
            "SELECT currency, COALESCE(SUM(amount), 0) FROM ledger GROUP BY currency";

        let rows: Vec<(Currency, Decimal)> = sqlx::query_as(QUERY).fetch_all(db).await?;

        Ok(rows
            .into_iter()
            .map(|(currency, amount)| (currency, Money::new(amount, currency)))
            .collect())
    }

    /// Sum of one account's ledger records, tagged with the account's
    /// currency.
    pub async fn get_account_balance<'e>(
        &self,
        db: impl PgExecutor<'e>,
        account_id: AccountId,
        currency: Currency,
    ) -> AppResult<Money> {
        const QUERY: &str = "SELECT COALESCE(SUM(amount), 0) FROM ledger WHERE account = $1";

        let amount: Decimal = sqlx::query_scalar(QUERY)
            .bind(account_id)
            .fetch_one(db)
            .await?;

        Ok(Money::new(amount, currency))
    }

    /// All accounts whose stored balance differs from their ledger sum.
    pub async fn get_account_balance_mismatches<'e>(
        &self,
        db: impl PgExecutor<'e>,
    ) -> AppResult<Vec<AccountBalanceMismatch>> {
        const QUERY: &str = r#"
            SELECT
                a.id,
                a.balance,
                COALESCE(l.ledger_sum, 0) AS ledger_sum,
                a.currency
            FROM accounts a
            LEFT JOIN (
                SELECT account, SUM(amount) AS ledger_sum
                FROM ledger
                GROUP BY account
            ) l ON a.id = l.account
            WHERE a.balance != COALESCE(l.ledger_sum, 0)
        "#;

        let rows: Vec<(Uuid, Decimal, Decimal, Currency)> =
            sqlx::query_as(QUERY).fetch_all(db).await?;

        Ok(rows
            .into_iter()
            .map(
                |(account_id, account_balance, ledger_balance, currency)| AccountBalanceMismatch {
                    account_id: AccountId::from_uuid(account_id),
                    account_balance,
                    ledger_balance,
                    currency,
                },
            )
            .collect())
    }
}

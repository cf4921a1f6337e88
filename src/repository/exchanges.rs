//! Exchanges repository
//!
//! Persists one exchange as a unit: the anchor transaction row, the
//! details row, and the four ledger records of the two balanced
//! currency-leg entries.

use crate::domain::ExchangeDetails;
use crate::error::AppResult;
use crate::uow::UnitOfWork;

use super::transfers::insert_ledger_record;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangesRepository;

impl ExchangesRepository {
    pub async fn insert(&self, uow: &mut UnitOfWork, exchange: &ExchangeDetails) -> AppResult<()> {
        self.insert_transaction(uow, exchange).await?;
        self.insert_details(uow, exchange).await?;

        let entries = exchange.ledger_entries()?;
        for record in entries.records() {
            insert_ledger_record(uow, record).await?;
        }

        Ok(())
    }

    async fn insert_transaction(
        &self,
        uow: &mut UnitOfWork,
        exchange: &ExchangeDetails,
    ) -> AppResult<()> {
        const QUERY: &str = r#"
            INSERT INTO transactions (id, type, account_id, timestamp)
            VALUES ($1, $2, $3, $4)
        "#;

        sqlx::query(QUERY)
            .bind(exchange.transaction_id())
            .bind(exchange.transaction().transaction_type())
            .bind(exchange.source_account())
            .bind(exchange.timestamp())
            .execute(uow.conn())
            .await?;

        Ok(())
    }

    async fn insert_details(
        &self,
        uow: &mut UnitOfWork,
        exchange: &ExchangeDetails,
    ) -> AppResult<()> {
        const QUERY: &str = r#"
            INSERT INTO exchange_details (
                id,
                transaction_id,
                source_account_id,
                target_account_id,
                source_amount,
                source_currency,
                target_amount,
                target_currency,
                exchange_rate
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(QUERY)
            .bind(exchange.id())
            .bind(exchange.transaction_id())
            .bind(exchange.source_account())
            .bind(exchange.target_account())
            .bind(exchange.source_amount().amount())
            .bind(exchange.source_amount().currency())
            .bind(exchange.target_amount().amount())
            .bind(exchange.target_amount().currency())
            .bind(exchange.exchange_rate())
            .execute(uow.conn())
            .await?;

        Ok(())
    }
}

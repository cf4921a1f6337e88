//! Transfers repository
//!
//! Persists one transfer as a unit: the anchor transaction row, the
//! details row, and the balanced two-record ledger entry. Taking the
//! unit of work itself makes "must run inside a transaction" a
//! signature-level fact rather than a runtime check.

use crate::domain::{LedgerRecord, TransferDetails};
use crate::error::AppResult;
use crate::uow::UnitOfWork;

#[derive(Debug, Clone, Copy, Default)]
pub struct TransfersRepository;

impl TransfersRepository {
    pub async fn insert(&self, uow: &mut UnitOfWork, transfer: &TransferDetails) -> AppResult<()> {
        self.insert_transaction(uow, transfer).await?;
        self.insert_details(uow, transfer).await?;

        let entry = transfer.ledger_entry()?;
        for record in entry.records() {
            insert_ledger_record(uow, record).await?;
        }

        Ok(())
    }

    async fn insert_transaction(
        &self,
        uow: &mut UnitOfWork,
        transfer: &TransferDetails,
    ) -> AppResult<()> {
        const QUERY: &str = r#"
            INSERT INTO transactions (id, type, account_id, timestamp)
            VALUES ($1, $2, $3, $4)
        "#;

        sqlx::query(QUERY)
            .bind(transfer.transaction_id())
            .bind(transfer.transaction().transaction_type())
            .bind(transfer.sender())
            .bind(transfer.timestamp())
            .execute(uow.conn())
            .await?;

        Ok(())
    }

    async fn insert_details(
        &self,
        uow: &mut UnitOfWork,
        transfer: &TransferDetails,
    ) -> AppResult<()> {
        const QUERY: &str = r#"
            INSERT INTO transfer_details (id, transaction_id, recipient_account_id, amount, currency)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(QUERY)
            .bind(transfer.id())
            .bind(transfer.transaction_id())
            .bind(transfer.recipient())
            .bind(transfer.money().amount())
            .bind(transfer.money().currency())
            .execute(uow.conn())
            .await?;

        Ok(())
    }
}

/// Shared by the transfers and exchanges writers; the `transaction` and
/// `account` column names are load-bearing for schema compatibility.
pub(super) async fn insert_ledger_record(
    uow: &mut UnitOfWork,
    record: &LedgerRecord,
) -> AppResult<()> {
    const QUERY: &str = r#"
        INSERT INTO ledger (id, transaction, account, amount, currency, timestamp)
        VALUES ($1, $2, $3, $4, $5, $6)
    "#;

    sqlx::query(QUERY)
        .bind(record.id())
        .bind(record.transaction_id())
        .bind(record.account_id())
        .bind(record.money().amount())
        .bind(record.money().currency())
        .bind(record.timestamp())
        .execute(uow.conn())
        .await?;

    Ok(())
}

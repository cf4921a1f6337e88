//! Transactions read model
//!
//! Paginated, user-scoped history joining transfer and exchange
//! details. A user sees a transaction when they own the initiating
//! account, are the transfer recipient, or are the exchange target.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use crate::domain::{
    AccountId, Currency, ExchangeDetailsView, Money, Transaction, TransactionId, TransactionType,
    TransactionWithDetails, TransferDetailsView, UserId,
};
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct TransactionsFilter {
    pub user_id: UserId,
    pub transaction_type: Option<TransactionType>,
    pub limit: i64,
    pub offset: i64,
}

type TransactionRow = (
    // transactions
    Uuid,
    TransactionType,
    Uuid,
    DateTime<Utc>,
    // transfer_details (absent unless type = 'transfer')
    Option<Uuid>,
    Option<Uuid>,
    Option<Decimal>,
    Option<Currency>,
    // exchange_details (absent unless type = 'exchange')
    Option<Uuid>,
    Option<Uuid>,
    Option<Uuid>,
    Option<Decimal>,
    Option<Currency>,
    Option<Decimal>,
    Option<Currency>,
    Option<Decimal>,
);

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionsRepository;

impl TransactionsRepository {
    pub async fn get_list<'e>(
        &self,
        db: impl PgExecutor<'e>,
        filter: &TransactionsFilter,
    ) -> AppResult<Vec<TransactionWithDetails>> {
        const QUERY: &str = r#"
            SELECT
                t.id, t.type, t.account_id, t.timestamp,
                td.id, td.recipient_account_id, td.amount, td.currency,
                ed.id, ed.source_account_id, ed.target_account_id,
                ed.source_amount, ed.source_currency,
                ed.target_amount, ed.target_currency, ed.exchange_rate
            FROM transactions t
            JOIN accounts a ON t.account_id = a.id
            LEFT JOIN transfer_details td ON t.id = td.transaction_id AND t.type = 'transfer'
            LEFT JOIN accounts a_recipient ON td.recipient_account_id = a_recipient.id
            LEFT JOIN exchange_details ed ON t.id = ed.transaction_id AND t.type = 'exchange'
            LEFT JOIN accounts a_target ON ed.target_account_id = a_target.id
            WHERE ($1::transaction_type IS NULL OR t.type = $1)
              AND (a.user_id = $2 OR a_recipient.user_id = $2 OR a_target.user_id = $2)
            ORDER BY t.timestamp DESC
            LIMIT $3 OFFSET $4
        "#;

        let rows: Vec<TransactionRow> = sqlx::query_as(QUERY)
            .bind(filter.transaction_type)
            .bind(filter.user_id)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(db)
            .await?;

        Ok(rows.into_iter().map(row_into_transaction).collect())
    }

    pub async fn count<'e>(
        &self,
        db: impl PgExecutor<'e>,
        filter: &TransactionsFilter,
    ) -> AppResult<i64> {
        const QUERY: &str = r#"
            SELECT COUNT(*)
            FROM transactions t
            JOIN accounts a ON t.account_id = a.id
            LEFT JOIN transfer_details td ON t.id = td.transaction_id AND t.type = 'transfer'
            LEFT JOIN accounts a_recipient ON td.recipient_account_id = a_recipient.id
            LEFT JOIN exchange_details ed ON t.id = ed.transaction_id AND t.type = 'exchange'
            LEFT JOIN accounts a_target ON ed.target_account_id = a_target.id
            WHERE ($1::transaction_type IS NULL OR t.type = $1)
              AND (a.user_id = $2 OR a_recipient.user_id = $2 OR a_target.user_id = $2)
        "#;

        let count: i64 = sqlx::query_scalar(QUERY)
            .bind(filter.transaction_type)
            .bind(filter.user_id)
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}

fn row_into_transaction(row: TransactionRow) -> TransactionWithDetails {
    let (
        tx_id,
        tx_type,
        tx_account_id,
        tx_timestamp,
        td_id,
        td_recipient_id,
        td_amount,
        td_currency,
        ed_id,
        ed_source_account_id,
        ed_target_account_id,
        ed_source_amount,
        ed_source_currency,
        ed_target_amount,
        ed_target_currency,
        ed_exchange_rate,
    ) = row;

    let transaction = Transaction::new(
        TransactionId::from_uuid(tx_id),
        tx_type,
        AccountId::from_uuid(tx_account_id),
        tx_timestamp,
    );

    let transfer_details = match (td_id, td_recipient_id, td_amount, td_currency) {
        (Some(id), Some(recipient), Some(amount), Some(currency)) => Some(TransferDetailsView {
            id,
            recipient_account_id: AccountId::from_uuid(recipient),
            amount: Money::new(amount, currency),
        }),
        _ => None,
    };

    let exchange_details = match (
        ed_id,
        ed_source_account_id,
        ed_target_account_id,
        ed_source_amount,
        ed_source_currency,
        ed_target_amount,
        ed_target_currency,
        ed_exchange_rate,
    ) {
        (
            Some(id),
            Some(source_account),
            Some(target_account),
            Some(source_amount),
            Some(source_currency),
            Some(target_amount),
            Some(target_currency),
            Some(exchange_rate),
        ) => Some(ExchangeDetailsView {
            id,
            source_account_id: AccountId::from_uuid(source_account),
            target_account_id: AccountId::from_uuid(target_account),
            source_amount: Money::new(source_amount, source_currency),
            target_amount: Money::new(target_amount, target_currency),
            exchange_rate,
        }),
        _ => None,
    };

    TransactionWithDetails {
        transaction,
        transfer_details,
        exchange_details,
    }
}

//! Transaction history use case

use serde::Serialize;

use crate::domain::{TransactionType, TransactionWithDetails, UserId};
use crate::error::AppResult;
use crate::repository::TransactionsFilter;

use super::Service;

#[derive(Debug, Clone)]
pub struct GetTransactionsCommand {
    pub user_id: UserId,
    pub transaction_type: Option<TransactionType>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionsResult {
    pub transactions: Vec<TransactionWithDetails>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Service {
    /// Paginated history for one user, newest first. Reads committed
    /// state through the pool; no unit of work.
    pub async fn get_transactions(
        &self,
        cmd: &GetTransactionsCommand,
    ) -> AppResult<TransactionsResult> {
        let filter = TransactionsFilter {
            user_id: cmd.user_id,
            transaction_type: cmd.transaction_type,
            limit: cmd.limit,
            offset: cmd.offset,
        };

        let transactions = self.transactions.get_list(&self.pool, &filter).await?;
        let total = self.transactions.count(&self.pool, &filter).await?;

        Ok(TransactionsResult {
            transactions,
            total,
            limit: cmd.limit,
            offset: cmd.offset,
        })
    }
}

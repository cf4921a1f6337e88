//! Application service
//!
//! One method per use case, each wrapped in exactly one unit of work:
//! lock the accounts in deterministic order, run the domain service,
//! persist, verify the ledger invariants, then commit. Any error rolls
//! the whole operation back.

mod accounts;
mod exchange;
mod reconcile;
mod transactions;
mod transfer;

use std::sync::Arc;

use sqlx::PgPool;

pub use accounts::{INITIAL_EUR_FUNDING, INITIAL_USD_FUNDING};
pub use exchange::{ExchangeCalculation, ExchangeCommand};
pub use reconcile::{AccountMismatch, LedgerCurrencyStatus, ReconciliationReport};
pub use transactions::{GetTransactionsCommand, TransactionsResult};
pub use transfer::TransferCommand;

use crate::domain::{Account, AccountId, ExchangeService, RateProvider, TransferService};
use crate::error::AppResult;
use crate::repository::{
    AccountsRepository, ExchangesRepository, LedgerRepository, TransactionsRepository,
    TransfersRepository,
};
use crate::uow::UnitOfWork;

#[derive(Clone)]
pub struct Service {
    pool: PgPool,
    transfer: TransferService,
    exchange: ExchangeService,
    accounts: AccountsRepository,
    transfers: TransfersRepository,
    exchanges: ExchangesRepository,
    transactions: TransactionsRepository,
    ledger: LedgerRepository,
    rates: Arc<dyn RateProvider + Send + Sync>,
}

impl Service {
    pub fn new(pool: PgPool, rates: Arc<dyn RateProvider + Send + Sync>) -> Self {
        Self {
            pool,
            transfer: TransferService,
            exchange: ExchangeService,
            accounts: AccountsRepository,
            transfers: TransfersRepository,
            exchanges: ExchangesRepository,
            transactions: TransactionsRepository,
            ledger: LedgerRepository,
            rates,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lock two accounts in ascending id order, returning them in the
    /// order they were asked for. Every operation acquires rows in this
    /// fixed global order, so no two operations can deadlock on each
    /// other.
    async fn lock_pair(
        &self,
        uow: &mut UnitOfWork,
        first: AccountId,
        second: AccountId,
    ) -> AppResult<(Account, Account)> {
        if first <= second {
            let a = self.accounts.get_for_update(uow.conn(), first).await?;
            let b = self.accounts.get_for_update(uow.conn(), second).await?;
            Ok((a, b))
        } else {
            let b = self.accounts.get_for_update(uow.conn(), second).await?;
            let a = self.accounts.get_for_update(uow.conn(), first).await?;
            Ok((a, b))
        }
    }
}

//! Transfer use case

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{AccountId, DomainError, Money};
use crate::error::AppResult;
use crate::uow::UnitOfWork;

use super::Service;

#[derive(Debug, Clone, Deserialize)]
pub struct TransferCommand {
    pub from: AccountId,
    pub to: AccountId,
    pub money: Money,
    pub time: DateTime<Utc>,
}

impl TransferCommand {
    /// Build a command from boundary-level raw values.
    pub fn parse(
        from: Uuid,
        to: Uuid,
        amount: &str,
        currency: &str,
        time: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            from: AccountId::from_uuid(from),
            to: AccountId::from_uuid(to),
            money: Money::parse(amount, currency)?,
            time,
        })
    }
}

impl Service {
    /// Move funds between two same-currency accounts.
    ///
    /// A self-transfer deliberately reaches the post-write consistency
    /// check: the two in-memory copies of the account diverge and the
    /// last save wins, so the check fails with
    /// [`DomainError::AccountBalanceMismatch`] and the operation rolls
    /// back. That is the rejection path for self-transfer.
    pub async fn transfer(&self, cmd: &TransferCommand) -> AppResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        match self.transfer_in(&mut uow, cmd).await {
            Ok(()) => {
                uow.commit().await?;
                tracing::debug!(from = %cmd.from, to = %cmd.to, amount = %cmd.money, "transfer committed");
                Ok(())
            }
            Err(err) => {
                uow.rollback().await?;
                Err(err)
            }
        }
    }

    async fn transfer_in(&self, uow: &mut UnitOfWork, cmd: &TransferCommand) -> AppResult<()> {
        let (mut from, mut to) = self.lock_pair(uow, cmd.from, cmd.to).await?;

        let details = self.transfer.execute(&mut from, &mut to, cmd.money, cmd.time)?;

        self.transfers.insert(uow, &details).await?;

        self.accounts.save(uow.conn(), &from).await?;
        self.accounts.save(uow.conn(), &to).await?;

        self.check_ledger_balance_on(uow.conn()).await?;
        self.check_account_ledger_consistency(uow, &from).await?;
        self.check_account_ledger_consistency(uow, &to).await?;

        Ok(())
    }
}

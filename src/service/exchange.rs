//! Exchange use case

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AccountId, Currency, DomainError, ExchangeRate, Money, CASHBOOK_EUR, CASHBOOK_USD,
};
use crate::error::AppResult;
use crate::uow::UnitOfWork;

use super::Service;

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeCommand {
    pub source_account: AccountId,
    pub target_account: AccountId,
    pub source_amount: Money,
    pub time: DateTime<Utc>,
}

impl ExchangeCommand {
    /// Build a command from boundary-level raw values.
    pub fn parse(
        source_account: Uuid,
        target_account: Uuid,
        amount: &str,
        source_currency: &str,
        time: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            source_account: AccountId::from_uuid(source_account),
            target_account: AccountId::from_uuid(target_account),
            source_amount: Money::parse(amount, source_currency)?,
            time,
        })
    }
}

/// Side-effect-free preview of an exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeCalculation {
    pub source_amount: Money,
    pub target_amount: Money,
    pub exchange_rate: ExchangeRate,
}

impl Service {
    /// Convert funds between two differently-denominated accounts of
    /// one user, settling each currency leg against its cashbook.
    pub async fn exchange(&self, cmd: &ExchangeCommand) -> AppResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        match self.exchange_in(&mut uow, cmd).await {
            Ok(()) => {
                uow.commit().await?;
                tracing::debug!(
                    source = %cmd.source_account,
                    target = %cmd.target_account,
                    amount = %cmd.source_amount,
                    "exchange committed"
                );
                Ok(())
            }
            Err(err) => {
                uow.rollback().await?;
                Err(err)
            }
        }
    }

    async fn exchange_in(&self, uow: &mut UnitOfWork, cmd: &ExchangeCommand) -> AppResult<()> {
        // User accounts first in ascending id order, then the
        // cashbooks, USD before EUR.
        let (mut source, mut target) = self
            .lock_pair(uow, cmd.source_account, cmd.target_account)
            .await?;
        let mut cashbook_usd = self.accounts.get_for_update(uow.conn(), CASHBOOK_USD).await?;
        let mut cashbook_eur = self.accounts.get_for_update(uow.conn(), CASHBOOK_EUR).await?;

        let rate = self
            .rates
            .rate(cmd.source_amount.currency(), target.balance().currency())?;

        let details = self.exchange.execute(
            &mut source,
            &mut target,
            &mut cashbook_usd,
            &mut cashbook_eur,
            cmd.source_amount,
            rate,
            cmd.time,
        )?;

        self.exchanges.insert(uow, &details).await?;

        self.accounts.save(uow.conn(), &source).await?;
        self.accounts.save(uow.conn(), &target).await?;
        self.accounts.save(uow.conn(), &cashbook_usd).await?;
        self.accounts.save(uow.conn(), &cashbook_eur).await?;

        self.check_ledger_balance_on(uow.conn()).await?;
        self.check_account_ledger_consistency(uow, &source).await?;
        self.check_account_ledger_consistency(uow, &target).await?;
        self.check_account_ledger_consistency(uow, &cashbook_usd)
            .await?;
        self.check_account_ledger_consistency(uow, &cashbook_eur)
            .await?;

        Ok(())
    }

    /// Preview what an exchange would yield. Opens no unit of work and
    /// writes nothing.
    pub fn calculate_exchange_amount(
        &self,
        source_amount: Money,
        target_currency: Currency,
    ) -> Result<ExchangeCalculation, DomainError> {
        let rate = self.rates.rate(source_amount.currency(), target_currency)?;
        let target_amount = rate.convert(source_amount)?;

        Ok(ExchangeCalculation {
            source_amount,
            target_amount,
            exchange_rate: rate,
        })
    }
}

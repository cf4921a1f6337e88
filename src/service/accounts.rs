//! Account queries and account opening

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, Currency, Money, UserId, CASHBOOK_EUR, CASHBOOK_USD,
};
use crate::error::AppResult;
use crate::uow::UnitOfWork;

use super::Service;

/// Opening balances funded from the cashbooks when a user's accounts
/// are created.
pub const INITIAL_USD_FUNDING: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
pub const INITIAL_EUR_FUNDING: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

impl Service {
    pub async fn get_user_accounts(&self, user_id: UserId) -> AppResult<Vec<Account>> {
        self.accounts.get_by_user_id(&self.pool, user_id).await
    }

    pub async fn get_account_balance(&self, account_id: AccountId) -> AppResult<Money> {
        let account = self.accounts.get(&self.pool, account_id).await?;
        Ok(account.balance())
    }

    /// Create and fund a new user's USD and EUR accounts.
    ///
    /// Called by the external sign-up flow once the user row exists.
    /// Each account opens at zero and receives its opening balance via
    /// a real transfer from the matching cashbook, so the funding is on
    /// the books like any other movement.
    pub async fn open_user_accounts(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<(Account, Account)> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        match self.open_user_accounts_in(&mut uow, user_id, now).await {
            Ok(accounts) => {
                uow.commit().await?;
                tracing::info!(user = %user_id, "opened and funded user accounts");
                Ok(accounts)
            }
            Err(err) => {
                uow.rollback().await?;
                Err(err)
            }
        }
    }

    async fn open_user_accounts_in(
        &self,
        uow: &mut UnitOfWork,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<(Account, Account)> {
        let mut usd_account =
            Account::new(AccountId::new(), user_id, Money::zero(Currency::USD));
        self.accounts.save(uow.conn(), &usd_account).await?;

        let mut eur_account =
            Account::new(AccountId::new(), user_id, Money::zero(Currency::EUR));
        self.accounts.save(uow.conn(), &eur_account).await?;

        // Cashbooks in the fixed global order: USD before EUR.
        let mut usd_cashbook = self.accounts.get_for_update(uow.conn(), CASHBOOK_USD).await?;
        let funding = Money::new(INITIAL_USD_FUNDING, Currency::USD);
        let details = self
            .transfer
            .execute(&mut usd_cashbook, &mut usd_account, funding, now)?;
        self.transfers.insert(uow, &details).await?;
        self.accounts.save(uow.conn(), &usd_cashbook).await?;
        self.accounts.save(uow.conn(), &usd_account).await?;

        let mut eur_cashbook = self.accounts.get_for_update(uow.conn(), CASHBOOK_EUR).await?;
        let funding = Money::new(INITIAL_EUR_FUNDING, Currency::EUR);
        let details = self
            .transfer
            .execute(&mut eur_cashbook, &mut eur_account, funding, now)?;
        self.transfers.insert(uow, &details).await?;
        self.accounts.save(uow.conn(), &eur_cashbook).await?;
        self.accounts.save(uow.conn(), &eur_account).await?;

        self.check_ledger_balance_on(uow.conn()).await?;
        self.check_account_ledger_consistency(uow, &usd_account)
            .await?;
        self.check_account_ledger_consistency(uow, &eur_account)
            .await?;

        Ok((usd_account, eur_account))
    }
}

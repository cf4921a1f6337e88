//! Invariant checks and reconciliation
//!
//! Two inline checks guard every write unit of work: the per-currency
//! ledger total must be zero, and each touched account's in-memory
//! balance must equal its ledger sum. Both short-circuit on the first
//! violation. The full report walks the same invariants across the
//! whole system for monitoring.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgExecutor;

use crate::domain::{Account, AccountId, Currency, DomainError};
use crate::error::AppResult;
use crate::uow::UnitOfWork;

use super::Service;

#[derive(Debug, Clone, Serialize)]
pub struct LedgerCurrencyStatus {
    pub currency: Currency,
    pub total_sum: Decimal,
    pub is_balanced: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountMismatch {
    pub account_id: AccountId,
    pub currency: Currency,
    pub account_balance: Decimal,
    pub ledger_balance: Decimal,
    pub difference: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub timestamp: DateTime<Utc>,
    pub is_consistent: bool,
    pub ledger_balances: Vec<LedgerCurrencyStatus>,
    pub account_mismatches: Vec<AccountMismatch>,
    pub total_accounts_checked: i64,
}

impl Service {
    /// Verify the per-currency ledger totals are all zero, reading
    /// through the pool (committed state only).
    pub async fn check_ledger_balance_by_currency(&self) -> AppResult<()> {
        self.check_ledger_balance_on(&self.pool).await
    }

    /// Same check against an explicit executor, used inside units of
    /// work where it must observe the uncommitted writes.
    pub(super) async fn check_ledger_balance_on<'e>(
        &self,
        db: impl PgExecutor<'e>,
    ) -> AppResult<()> {
        let totals = self.ledger.get_total_balance_by_currency(db).await?;

        for (currency, total) in totals {
            if !total.is_zero() {
                return Err(DomainError::LedgerImbalance {
                    currency,
                    sum: total.amount(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Verify one account's in-memory balance equals its ledger sum.
    pub(super) async fn check_account_ledger_consistency(
        &self,
        uow: &mut UnitOfWork,
        account: &Account,
    ) -> AppResult<()> {
        let ledger_balance = self
            .ledger
            .get_account_balance(uow.conn(), account.id(), account.balance().currency())
            .await?;

        if ledger_balance.amount() != account.balance().amount() {
            return Err(DomainError::AccountBalanceMismatch {
                account_id: account.id(),
                account_balance: account.balance().amount(),
                ledger_balance: ledger_balance.amount(),
            }
            .into());
        }

        Ok(())
    }

    /// Verify every stored account balance equals its ledger sum,
    /// failing on the first mismatch found.
    pub async fn check_all_account_balances(&self) -> AppResult<()> {
        let mismatches = self
            .ledger
            .get_account_balance_mismatches(&self.pool)
            .await?;

        if let Some(m) = mismatches.into_iter().next() {
            return Err(DomainError::AccountBalanceMismatch {
                account_id: m.account_id,
                account_balance: m.account_balance,
                ledger_balance: m.ledger_balance,
            }
            .into());
        }

        Ok(())
    }

    /// Produce the full reconciliation report. Read-only; races with
    /// concurrent writes only ever observe committed snapshots.
    pub async fn reconcile(&self) -> AppResult<ReconciliationReport> {
        let mut report = ReconciliationReport {
            timestamp: Utc::now(),
            is_consistent: true,
            ledger_balances: Vec::new(),
            account_mismatches: Vec::new(),
            total_accounts_checked: 0,
        };

        let totals = self
            .ledger
            .get_total_balance_by_currency(&self.pool)
            .await?;

        for (currency, total) in totals {
            let status = LedgerCurrencyStatus {
                currency,
                total_sum: total.amount(),
                is_balanced: total.is_zero(),
            };
            if !status.is_balanced {
                report.is_consistent = false;
            }
            report.ledger_balances.push(status);
        }

        let mismatches = self
            .ledger
            .get_account_balance_mismatches(&self.pool)
            .await?;

        for m in mismatches {
            report.account_mismatches.push(AccountMismatch {
                account_id: m.account_id,
                currency: m.currency,
                account_balance: m.account_balance,
                ledger_balance: m.ledger_balance,
                difference: m.account_balance - m.ledger_balance,
            });
            report.is_consistent = false;
        }

        report.total_accounts_checked = self.accounts.count(&self.pool).await?;

        if !report.is_consistent {
            tracing::error!(
                mismatches = report.account_mismatches.len(),
                "reconciliation found inconsistencies"
            );
        }

        Ok(report)
    }
}

//! Exchange domain service
//!
//! Cross-currency conversion between two accounts of one user,
//! intermediated by the cashbooks: the source currency flows from the
//! user to the source-currency cashbook, the target currency flows from
//! the target-currency cashbook to the user. Each leg is its own
//! balanced ledger entry, so both currencies stay at zero sum.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountId};
use super::cashbook::cashbook_account;
use super::currency::Currency;
use super::exchange_rate::ExchangeRate;
use super::ledger::{ExchangeLedgerEntries, LedgerEntry, LedgerRecord};
use super::money::Money;
use super::transaction::{Transaction, TransactionId, TransactionType};
use super::DomainError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct ExchangeDetailsId(Uuid);

impl ExchangeDetailsId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ExchangeDetailsId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeDetailsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeService;

impl ExchangeService {
    /// Execute an exchange against four locked accounts.
    ///
    /// Cashbook debits may drive the cashbook negative; that is the
    /// system side of the trade. On error the aggregates may be
    /// partially mutated; the caller's unit of work discards them.
    #[allow(clippy::too_many_arguments)]
    pub fn execute(
        &self,
        source: &mut Account,
        target: &mut Account,
        cashbook_usd: &mut Account,
        cashbook_eur: &mut Account,
        source_amount: Money,
        rate: ExchangeRate,
        now: DateTime<Utc>,
    ) -> Result<ExchangeDetails, DomainError> {
        if source_amount.is_negative() {
            return Err(DomainError::NegativeExchange(source_amount.amount()));
        }

        if source_amount.is_zero() {
            return Err(DomainError::ZeroExchange);
        }

        if source.balance().currency() == target.balance().currency() {
            return Err(DomainError::SameCurrencyExchange(
                source.balance().currency(),
            ));
        }

        if rate.from() != source_amount.currency() {
            return Err(DomainError::CurrencyMismatch {
                first: rate.from(),
                second: source_amount.currency(),
            });
        }
        if rate.to() != target.balance().currency() {
            return Err(DomainError::CurrencyMismatch {
                first: rate.to(),
                second: target.balance().currency(),
            });
        }

        let target_amount = rate.convert(source_amount)?;

        source.debit(source_amount)?;
        target.credit(target_amount)?;

        let source_cashbook =
            cashbook_for_currency(cashbook_usd, cashbook_eur, source_amount.currency());
        source_cashbook.credit(source_amount)?;

        let target_cashbook =
            cashbook_for_currency(cashbook_usd, cashbook_eur, target_amount.currency());
        target_cashbook.debit(target_amount)?;

        ExchangeDetails::new(source.id(), target.id(), source_amount, target_amount, now)
    }
}

fn cashbook_for_currency<'a>(
    cashbook_usd: &'a mut Account,
    cashbook_eur: &'a mut Account,
    currency: Currency,
) -> &'a mut Account {
    match currency {
        Currency::USD => cashbook_usd,
        Currency::EUR => cashbook_eur,
    }
}

/// Descriptor of one executed exchange, ready to persist.
#[derive(Debug, Clone)]
pub struct ExchangeDetails {
    id: ExchangeDetailsId,
    transaction: Transaction,
    source_account: AccountId,
    target_account: AccountId,
    source_amount: Money,
    target_amount: Money,
    timestamp: DateTime<Utc>,
}

impl ExchangeDetails {
    pub fn new(
        source_account: AccountId,
        target_account: AccountId,
        source_amount: Money,
        target_amount: Money,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if source_amount.currency() == target_amount.currency() {
            return Err(DomainError::SameCurrencyExchange(source_amount.currency()));
        }

        Ok(Self {
            id: ExchangeDetailsId::new(),
            transaction: Transaction::new(
                TransactionId::new(),
                TransactionType::Exchange,
                source_account,
                timestamp,
            ),
            source_account,
            target_account,
            source_amount,
            target_amount,
            timestamp,
        })
    }

    pub fn id(&self) -> ExchangeDetailsId {
        self.id
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction.id()
    }

    pub fn source_account(&self) -> AccountId {
        self.source_account
    }

    pub fn target_account(&self) -> AccountId {
        self.target_account
    }

    pub fn source_amount(&self) -> Money {
        self.source_amount
    }

    pub fn target_amount(&self) -> Money {
        self.target_amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Effective rate, stored on the details row for reporting.
    pub fn exchange_rate(&self) -> Decimal {
        self.target_amount.amount() / self.source_amount.amount()
    }

    /// The two balanced entries mirroring this exchange, one per
    /// currency leg.
    pub fn ledger_entries(&self) -> Result<ExchangeLedgerEntries, DomainError> {
        let source_cashbook = cashbook_account(self.source_amount.currency());
        let target_cashbook = cashbook_account(self.target_amount.currency());

        let source_currency_entry = LedgerEntry::balanced(
            LedgerRecord::new(
                self.transaction_id(),
                self.source_account,
                self.source_amount.negate(),
                self.timestamp,
            ),
            LedgerRecord::new(
                self.transaction_id(),
                source_cashbook,
                self.source_amount,
                self.timestamp,
            ),
        )?;

        let target_currency_entry = LedgerEntry::balanced(
            LedgerRecord::new(
                self.transaction_id(),
                target_cashbook,
                self.target_amount.negate(),
                self.timestamp,
            ),
            LedgerRecord::new(
                self.transaction_id(),
                self.target_account,
                self.target_amount,
                self.timestamp,
            ),
        )?;

        Ok(ExchangeLedgerEntries {
            source_currency_entry,
            target_currency_entry,
        })
    }
}

//! Ledger records and balanced entries
//!
//! Every balance change is mirrored by signed, append-only ledger records.
//! Records are only ever emitted in *balanced entries*: pairs whose
//! amounts sum to zero within their currency. The constructor refuses an
//! unbalanced pair, so a ledger entry that would break the books cannot
//! be represented.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use super::money::Money;
use super::transaction::TransactionId;
use super::DomainError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct LedgerRecordId(Uuid);

impl LedgerRecordId {
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

impl Default for LedgerRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LedgerRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One signed delta against one account, tied to the transaction that
/// caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    id: LedgerRecordId,
    transaction_id: TransactionId,
    account_id: AccountId,
    money: Money,
    timestamp: DateTime<Utc>,
}

impl LedgerRecord {
    pub fn new(
        transaction_id: TransactionId,
        account_id: AccountId,
        money: Money,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LedgerRecordId::new(),
            transaction_id,
            account_id,
            money,
            timestamp,
        }
    }

    pub fn id(&self) -> LedgerRecordId {
        self.id
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn money(&self) -> Money {
        self.money
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A pair of ledger records that sums to zero within one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry([LedgerRecord; 2]);

impl LedgerEntry {
    /// Build an entry, verifying the zero-sum invariant.
    pub fn balanced(first: LedgerRecord, second: LedgerRecord) -> Result<Self, DomainError> {
        let sum = first.money().add(second.money())?;
        if !sum.is_zero() {
            return Err(DomainError::UnbalancedLedgerEntry {
                currency: sum.currency(),
                sum: sum.amount(),
            });
        }

        Ok(Self([first, second]))
    }

    pub fn records(&self) -> &[LedgerRecord; 2] {
        &self.0
    }
}

/// The two balanced entries an exchange emits: one in the source
/// currency, one in the target currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeLedgerEntries {
    pub source_currency_entry: LedgerEntry,
    pub target_currency_entry: LedgerEntry,
}

impl ExchangeLedgerEntries {
    pub fn records(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.source_currency_entry
            .records()
            .iter()
            .chain(self.target_currency_entry.records().iter())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::super::currency::Currency;
    use super::*;

    fn record(amount: i64) -> LedgerRecord {
        LedgerRecord::new(
            TransactionId::new(),
            AccountId::new(),
            Money::new(Decimal::new(amount, 0), Currency::USD),
            Utc::now(),
        )
    }

    #[test]
    fn balanced_pair_accepted() {
        let entry = LedgerEntry::balanced(record(-100), record(100)).unwrap();
        let sum: Decimal = entry.records().iter().map(|r| r.money().amount()).sum();
        assert_eq!(sum, Decimal::ZERO);
    }

    #[test]
    fn unbalanced_pair_rejected() {
        let err = LedgerEntry::balanced(record(-100), record(99)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnbalancedLedgerEntry {
                currency: Currency::USD,
                sum,
            } if sum == Decimal::new(-1, 0)
        ));
    }

    #[test]
    fn mixed_currency_pair_rejected() {
        let eur = LedgerRecord::new(
            TransactionId::new(),
            AccountId::new(),
            Money::new(Decimal::new(100, 0), Currency::EUR),
            Utc::now(),
        );
        let err = LedgerEntry::balanced(record(-100), eur).unwrap_err();
        assert!(matches!(err, DomainError::CurrencyMismatch { .. }));
    }
}

//! Transfer domain service
//!
//! Same-currency movement between two accounts. The service mutates the
//! in-memory aggregates and returns a descriptor carrying the anchor
//! transaction; nothing touches storage here. A zero amount deliberately
//! passes: the `amount > 0` CHECK on `transfer_details` is the single
//! source of positivity truth at the storage boundary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, AccountId};
use super::ledger::{LedgerEntry, LedgerRecord};
use super::money::Money;
use super::transaction::{Transaction, TransactionId, TransactionType};
use super::DomainError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct TransferDetailsId(Uuid);

impl TransferDetailsId {
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

impl Default for TransferDetailsId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferDetailsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransferService;

impl TransferService {
    /// Execute a transfer against two locked accounts.
    ///
    /// On error the aggregates may be partially mutated; the caller's
    /// unit of work discards them without saving.
    pub fn execute(
        &self,
        from: &mut Account,
        to: &mut Account,
        money: Money,
        now: DateTime<Utc>,
    ) -> Result<TransferDetails, DomainError> {
        if money.is_negative() {
            return Err(DomainError::NegativeTransfer(money.amount()));
        }

        from.debit(money)?;
        to.credit(money)?;

        Ok(TransferDetails::new(from.id(), to.id(), money, now))
    }
}

/// Descriptor of one executed transfer, ready to persist.
#[derive(Debug, Clone)]
pub struct TransferDetails {
    id: TransferDetailsId,
    transaction: Transaction,
    recipient: AccountId,
    money: Money,
    timestamp: DateTime<Utc>,
}

impl TransferDetails {
    pub fn new(from: AccountId, to: AccountId, money: Money, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: TransferDetailsId::new(),
            transaction: Transaction::new(
                TransactionId::new(),
                TransactionType::Transfer,
                from,
                timestamp,
            ),
            recipient: to,
            money,
            timestamp,
        }
    }

    pub fn id(&self) -> TransferDetailsId {
        self.id
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction.id()
    }

    pub fn sender(&self) -> AccountId {
        self.transaction.account_id()
    }

    pub fn recipient(&self) -> AccountId {
        self.recipient
    }

    pub fn money(&self) -> Money {
        self.money
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The balanced two-record entry mirroring this transfer: sender
    /// debited, recipient credited.
    pub fn ledger_entry(&self) -> Result<LedgerEntry, DomainError> {
        let debit = LedgerRecord::new(
            self.transaction_id(),
            self.sender(),
            self.money.negate(),
            self.timestamp,
        );
        let credit = LedgerRecord::new(
            self.transaction_id(),
            self.recipient,
            self.money,
            self.timestamp,
        );

        LedgerEntry::balanced(debit, credit)
    }
}

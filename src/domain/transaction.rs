//! Transactions and the history read model
//!
//! A transaction row anchors every operation; detail rows and ledger
//! records hang off it. The `*View` types are what the paginated history
//! query returns, one row per transaction with whichever details apply.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use super::money::Money;

/// Maps onto the `transaction_type` enum type in PostgreSQL.
///
/// `Deposit` and `Withdrawal` are reserved values; no core operation
/// produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Transfer,
    Exchange,
    Deposit,
    Withdrawal,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Transfer => "transfer",
            TransactionType::Exchange => "exchange",
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        };
        f.write_str(s)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
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

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Anchor row for one operation. `account_id` is the initiating account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: TransactionId,
    transaction_type: TransactionType,
    account_id: AccountId,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        transaction_type: TransactionType,
        account_id: AccountId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            transaction_type,
            account_id,
            timestamp,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Transfer details as the history query sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferDetailsView {
    pub id: Uuid,
    pub recipient_account_id: AccountId,
    pub amount: Money,
}

/// Exchange details as the history query sees them. The rate is the
/// stored reporting value, not the runtime-precision one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeDetailsView {
    pub id: Uuid,
    pub source_account_id: AccountId,
    pub target_account_id: AccountId,
    pub source_amount: Money,
    pub target_amount: Money,
    pub exchange_rate: Decimal,
}

/// One history row: the anchor transaction joined with whichever detail
/// row its type carries.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithDetails {
    pub transaction: Transaction,
    pub transfer_details: Option<TransferDetailsView>,
    pub exchange_details: Option<ExchangeDetailsView>,
}

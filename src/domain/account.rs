//! Account aggregate
//!
//! An account owns one balance in one fixed currency. All mutation goes
//! through [`Account::credit`] and [`Account::debit`]; the debit path is
//! where the non-negative-balance rule for user accounts lives. Cashbook
//! accounts are exempt so they can absorb the system side of a
//! cross-currency move.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cashbook::CASHBOOK_USER_ID;
use super::money::Money;
use super::DomainError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(Uuid);

impl UserId {
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
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

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An account loaded under a row lock, exclusively owned by one unit of
/// work for its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    user_id: UserId,
    balance: Money,
}

impl Account {
    pub fn new(id: AccountId, user_id: UserId, balance: Money) -> Self {
        Self {
            id,
            user_id,
            balance,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Cashbook accounts belong to the reserved system user and may go
    /// negative.
    pub fn is_cashbook(&self) -> bool {
        self.user_id == CASHBOOK_USER_ID
    }

    pub fn credit(&mut self, amount: Money) -> Result<(), DomainError> {
        self.balance = self.balance.add(amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: Money) -> Result<(), DomainError> {
        if !self.is_cashbook() && self.balance.amount() < amount.amount() {
            return Err(DomainError::InsufficientFunds {
                account_id: self.id,
                requested: amount.amount(),
                available: self.balance.amount(),
            });
        }

        self.balance = self.balance.sub(amount)?;
        Ok(())
    }
}

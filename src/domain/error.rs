//! Domain error types
//!
//! Business rule violations and invariant failures, independent of the
//! storage layer. Callers pattern-match these to decide how an operation
//! failed; invariant violations additionally mean the enclosing unit of
//! work must not commit.

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::AccountId;
use super::currency::Currency;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("unsupported currency {0}")]
    UnsupportedCurrency(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{first} and {second} are not equal currencies")]
    CurrencyMismatch { first: Currency, second: Currency },

    #[error("cannot transfer a negative amount: {0}")]
    NegativeTransfer(Decimal),

    #[error("cannot exchange a negative amount: {0}")]
    NegativeExchange(Decimal),

    #[error("exchange amount cannot be zero")]
    ZeroExchange,

    #[error("cannot exchange within the same currency: {0}")]
    SameCurrencyExchange(Currency),

    #[error("exchange rate cannot have the same source and target currency: {0}")]
    SameCurrencyExchangeRate(Currency),

    #[error("exchange rate must be positive, got: {0}")]
    InvalidExchangeRate(Decimal),

    #[error("exchange rate not found for {from} to {to}")]
    ExchangeRateNotFound { from: Currency, to: Currency },

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("user with email {0} already exists")]
    UserAlreadyExists(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("insufficient funds in account {account_id}: requested {requested}, available {available}")]
    InsufficientFunds {
        account_id: AccountId,
        requested: Decimal,
        available: Decimal,
    },

    /// A single operation emitted a ledger entry that does not sum to zero.
    #[error("ledger entry does not balance for {currency}: sum is {sum}")]
    UnbalancedLedgerEntry { currency: Currency, sum: Decimal },

    /// The per-currency ledger total is non-zero.
    #[error("ledger is not balanced for {currency}: sum is {sum}, expected 0")]
    LedgerImbalance { currency: Currency, sum: Decimal },

    /// An account balance diverged from the sum of its ledger records.
    #[error("account {account_id} balance mismatch: account has {account_balance}, ledger has {ledger_balance}")]
    AccountBalanceMismatch {
        account_id: AccountId,
        account_balance: Decimal,
        ledger_balance: Decimal,
    },
}

impl DomainError {
    /// True for errors a well-formed caller can provoke and should see.
    pub fn is_client_error(&self) -> bool {
        !self.is_invariant_violation()
    }

    /// Invariant violations are fatal to the unit of work: the state they
    /// describe should be impossible, so the operation rolls back and the
    /// error is escalated rather than retried.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedLedgerEntry { .. }
                | Self::LedgerImbalance { .. }
                | Self::AccountBalanceMismatch { .. }
        )
    }
}

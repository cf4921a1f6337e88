//! Money value object
//!
//! An exact decimal amount tagged with a currency. Arithmetic is only
//! defined between values of the same currency and never rounds; the one
//! rounding point in the core is [`ExchangeRate::convert`].
//!
//! [`ExchangeRate::convert`]: super::exchange_rate::ExchangeRate::convert

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// An amount may be negative: ledger records carry signed money.
    /// Positivity of user-facing amounts is enforced in the domain
    /// services and the storage CHECK constraints.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parse an amount/currency pair coming in from the boundary.
    pub fn parse(amount: &str, currency: &str) -> Result<Self, DomainError> {
        let amount: Decimal = amount
            .parse()
            .map_err(|_| DomainError::InvalidAmount(amount.to_string()))?;
        let currency: Currency = currency.parse()?;
        Ok(Self::new(amount, currency))
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn check_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                first: self.currency,
                second: other.currency,
            });
        }
        Ok(())
    }

    pub fn add(&self, other: Money) -> Result<Money, DomainError> {
        self.check_same_currency(&other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    pub fn sub(&self, other: Money) -> Result<Money, DomainError> {
        self.check_same_currency(&other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    pub fn negate(&self) -> Money {
        Money::new(-self.amount, self.currency)
    }

    pub fn less_than(&self, other: Money) -> Result<bool, DomainError> {
        self.check_same_currency(&other)?;
        Ok(self.amount < other.amount)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

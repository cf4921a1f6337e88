//! Exchange rate value object
//!
//! A validated, typed conversion between two distinct currencies. The
//! conversion is the single rounding point in the core: results are
//! rounded half-up to 2 decimal places, the precision balances are stored
//! at.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::money::Money;
use super::DomainError;

/// Monetary amounts round half-up to storage precision.
pub const MONEY_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    from: Currency,
    to: Currency,
    rate: Decimal,
}

impl ExchangeRate {
    pub fn new(from: Currency, to: Currency, rate: Decimal) -> Result<Self, DomainError> {
        if from == to {
            return Err(DomainError::SameCurrencyExchangeRate(from));
        }

        if rate.is_sign_negative() || rate.is_zero() {
            return Err(DomainError::InvalidExchangeRate(rate));
        }

        Ok(Self { from, to, rate })
    }

    pub fn from(&self) -> Currency {
        self.from
    }

    pub fn to(&self) -> Currency {
        self.to
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Convert an amount in the `from` currency to the `to` currency,
    /// rounding half-up to 2 decimal places.
    pub fn convert(&self, amount: Money) -> Result<Money, DomainError> {
        if amount.currency() != self.from {
            return Err(DomainError::CurrencyMismatch {
                first: self.from,
                second: amount.currency(),
            });
        }

        let converted = (amount.amount() * self.rate)
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);

        Ok(Money::new(converted, self.to))
    }
}

/// Source of exchange rates for the exchange use case.
///
/// The core injects a fixed-rate implementation; anything able to answer
/// "what is the rate from X to Y right now" can stand in.
pub trait RateProvider {
    fn rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(value: &str) -> ExchangeRate {
        ExchangeRate::new(Currency::USD, Currency::EUR, value.parse().unwrap()).unwrap()
    }

    #[test]
    fn same_currency_rejected() {
        let err = ExchangeRate::new(Currency::USD, Currency::USD, Decimal::ONE).unwrap_err();
        assert!(matches!(
            err,
            DomainError::SameCurrencyExchangeRate(Currency::USD)
        ));
    }

    #[test]
    fn non_positive_rate_rejected() {
        assert!(matches!(
            ExchangeRate::new(Currency::USD, Currency::EUR, Decimal::ZERO).unwrap_err(),
            DomainError::InvalidExchangeRate(_)
        ));
        assert!(matches!(
            ExchangeRate::new(Currency::USD, Currency::EUR, Decimal::new(-92, 2)).unwrap_err(),
            DomainError::InvalidExchangeRate(_)
        ));
    }

    #[test]
    fn convert_requires_source_currency() {
        let err = rate("0.92")
            .convert(Money::new(Decimal::new(100, 0), Currency::EUR))
            .unwrap_err();
        assert!(matches!(err, DomainError::CurrencyMismatch { .. }));
    }

    #[test]
    fn convert_rounds_half_up_to_two_places() {
        // 123.45 * 0.92 = 113.574 -> 113.57
        let result = rate("0.92")
            .convert(Money::new(Decimal::new(12345, 2), Currency::USD))
            .unwrap();
        assert_eq!(result.amount(), Decimal::new(11357, 2));
        assert_eq!(result.currency(), Currency::EUR);

        // 12.50 * 0.5 = 6.25 exactly at the midpoint scale boundary:
        // 12.55 * 0.5 = 6.275 -> 6.28 (half-up, not banker's)
        let half = ExchangeRate::new(Currency::USD, Currency::EUR, Decimal::new(5, 1)).unwrap();
        let result = half
            .convert(Money::new(Decimal::new(1255, 2), Currency::USD))
            .unwrap();
        assert_eq!(result.amount(), Decimal::new(628, 2));
    }

    #[test]
    fn convert_whole_amount() {
        let result = rate("0.92")
            .convert(Money::new(Decimal::new(100, 0), Currency::USD))
            .unwrap();
        assert_eq!(result.amount(), Decimal::new(9200, 2));
    }

    #[test]
    fn inverse_round_trip_is_not_exact() {
        // 92 EUR -> USD at round6(1/0.92) -> 100.00, and back -> 92.00
        // happens to close here, but the policy never promises it.
        let inverse = ExchangeRate::new(
            Currency::EUR,
            Currency::USD,
            (Decimal::ONE / Decimal::new(92, 2))
                .round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero),
        )
        .unwrap();
        let usd = inverse
            .convert(Money::new(Decimal::new(92, 0), Currency::EUR))
            .unwrap();
        assert_eq!(usd.amount(), Decimal::new(10000, 2));
    }
}

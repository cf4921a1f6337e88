//! Fixed exchange rate provider
//!
//! Holds one USD→EUR rate constant. The inverse direction is derived as
//! `1 / rate` rounded half-up to 6 decimal places, kept wider than the
//! 2-place money scale so round-trips do not compound asymmetrically.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{Currency, DomainError, ExchangeRate, RateProvider};

/// Decimal places retained on the derived inverse rate.
const INVERSE_RATE_SCALE: u32 = 6;

#[derive(Debug, Clone)]
pub struct FixedRateProvider {
    usd_to_eur: Decimal,
}

impl FixedRateProvider {
    pub fn new(usd_to_eur: Decimal) -> Self {
        Self { usd_to_eur }
    }
}

impl RateProvider for FixedRateProvider {
    fn rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate, DomainError> {
        if from == to {
            return Err(DomainError::SameCurrencyExchangeRate(from));
        }

        match (from, to) {
            (Currency::USD, Currency::EUR) => ExchangeRate::new(from, to, self.usd_to_eur),
            (Currency::EUR, Currency::USD) => {
                let inverse = (Decimal::ONE / self.usd_to_eur).round_dp_with_strategy(
                    INVERSE_RATE_SCALE,
                    RoundingStrategy::MidpointAwayFromZero,
                );
                ExchangeRate::new(from, to, inverse)
            }
            _ => Err(DomainError::ExchangeRateNotFound { from, to }),
        }
    }
}

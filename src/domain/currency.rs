//! Currency tag
//!
//! The set of currencies the core can hold. Accounts, ledger records, and
//! details rows are all tagged with one of these; mixing them is a domain
//! error, never silent coercion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Supported currencies.
///
/// Maps onto the `currency` enum type in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "currency")]
pub enum Currency {
    USD,
    EUR,
}

impl Currency {
    /// All currencies the core recognises.
    pub const ALL: [Currency; 2] = [Currency::USD, Currency::EUR];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            other => Err(DomainError::UnsupportedCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_currencies() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::EUR);
    }

    #[test]
    fn parse_unknown_currency_rejected() {
        let err = "GBP".parse::<Currency>().unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedCurrency(c) if c == "GBP"));
    }

    #[test]
    fn display_round_trips() {
        for currency in Currency::ALL {
            assert_eq!(currency.to_string().parse::<Currency>().unwrap(), currency);
        }
    }
}

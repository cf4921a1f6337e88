//! Reserved cashbook identities
//!
//! The cashbooks are seeded by migration and act as the system-side
//! counterparty for every operation that cannot settle inside a single
//! user's accounts. One account per currency, both owned by the reserved
//! system user.

use uuid::Uuid;

use super::account::{AccountId, UserId};
use super::currency::Currency;

pub const CASHBOOK_USER_ID: UserId = UserId::from_uuid(Uuid::from_u128(0x01));
pub const CASHBOOK_USD: AccountId = AccountId::from_uuid(Uuid::from_u128(0x10));
pub const CASHBOOK_EUR: AccountId = AccountId::from_uuid(Uuid::from_u128(0x11));

/// The cashbook account holding the given currency.
pub fn cashbook_account(currency: Currency) -> AccountId {
    match currency {
        Currency::USD => CASHBOOK_USD,
        Currency::EUR => CASHBOOK_EUR,
    }
}

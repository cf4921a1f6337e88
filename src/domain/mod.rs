//! Domain module
//!
//! Value objects, aggregates, and the two domain services. Everything
//! here is pure: storage never leaks in, and the services mutate only
//! the in-memory aggregates their unit of work owns.

pub mod account;
pub mod cashbook;
pub mod currency;
pub mod error;
pub mod exchange;
pub mod exchange_rate;
pub mod ledger;
pub mod money;
pub mod transaction;
pub mod transfer;
pub mod user;

pub use account::{Account, AccountId, UserId};
pub use cashbook::{cashbook_account, CASHBOOK_EUR, CASHBOOK_USD, CASHBOOK_USER_ID};
pub use currency::Currency;
pub use error::DomainError;
pub use exchange::{ExchangeDetails, ExchangeDetailsId, ExchangeService};
pub use exchange_rate::{ExchangeRate, RateProvider, MONEY_SCALE};
pub use ledger::{ExchangeLedgerEntries, LedgerEntry, LedgerRecord, LedgerRecordId};
pub use money::Money;
pub use transaction::{
    ExchangeDetailsView, Transaction, TransactionId, TransactionType, TransactionWithDetails,
    TransferDetailsView,
};
pub use transfer::{TransferDetails, TransferDetailsId, TransferService};
pub use user::User;

//! Storage repositories
//!
//! Raw-SQL adapters over the schema in `migrations/`. Read paths are
//! generic over the executor so they run against the pool or inside a
//! unit of work; writers that emit several related rows take the unit
//! of work itself and cannot be called outside one.

mod accounts;
mod exchanges;
mod ledger;
mod transactions;
mod transfers;
mod users;

pub use accounts::AccountsRepository;
pub use exchanges::ExchangesRepository;
pub use ledger::{AccountBalanceMismatch, LedgerRepository};
pub use transactions::{TransactionsFilter, TransactionsRepository};
pub use transfers::TransfersRepository;
pub use users::UsersRepository;

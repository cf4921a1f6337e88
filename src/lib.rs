//! minibank
//!
//! Double-entry bookkeeping core of a small banking back-end. The crate
//! executes same-currency transfers and cross-currency exchanges,
//! mirrors every balance change in an append-only ledger, and refuses
//! to commit any state that breaks the books.
//!
//! The HTTP surface, authentication, and sign-up flow are external
//! collaborators; they drive this crate through [`service::Service`]
//! and the command types it accepts.

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod rates;
pub mod repository;
pub mod service;
pub mod uow;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use rates::FixedRateProvider;
pub use service::Service;
pub use uow::UnitOfWork;

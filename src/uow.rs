//! Unit of work
//!
//! One storage transaction per operation. The unit of work owns the
//! transaction; repositories receive its connection handle as an
//! explicit capability instead of fishing it out of ambient state, so a
//! write that must run transactionally cannot be called without one.
//!
//! Dropping an uncommitted unit of work rolls the transaction back,
//! which is how caller cancellation propagates: the future is dropped,
//! the transaction unwinds, nothing commits.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    /// Check one connection out of the pool and begin a transaction on
    /// it. Row locks taken through [`Self::conn`] live until commit or
    /// rollback.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// The capability handle repositories execute against.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

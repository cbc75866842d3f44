//! Connection source shared by the PostgreSQL repositories

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use likeable_core::RepoResult;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use super::error::{map_db_error, transaction_finished};

/// Transaction shared by the repositories of one unit of work.
///
/// `None` once the transaction has been committed or rolled back.
pub(crate) type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// Where a repository sends its statements
#[derive(Clone)]
pub(crate) enum PgConn {
    Pool(PgPool),
    Transaction(SharedTransaction),
}

/// A connection checked out for the duration of one repository call
pub(crate) enum PgConnGuard<'a> {
    Pooled(PoolConnection<Postgres>),
    Transaction(MappedMutexGuard<'a, Transaction<'static, Postgres>>),
}

impl PgConn {
    pub(crate) async fn acquire(&self) -> RepoResult<PgConnGuard<'_>> {
        match self {
            Self::Pool(pool) => pool
                .acquire()
                .await
                .map(PgConnGuard::Pooled)
                .map_err(map_db_error),
            Self::Transaction(tx) => MutexGuard::try_map(tx.lock().await, Option::as_mut)
                .map(PgConnGuard::Transaction)
                .map_err(|_| transaction_finished()),
        }
    }
}

impl Deref for PgConnGuard<'_> {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match self {
            Self::Pooled(conn) => &**conn,
            Self::Transaction(tx) => &***tx,
        }
    }
}

impl DerefMut for PgConnGuard<'_> {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match self {
            Self::Pooled(conn) => &mut **conn,
            Self::Transaction(tx) => &mut ***tx,
        }
    }
}

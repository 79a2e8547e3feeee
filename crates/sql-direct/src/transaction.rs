//! Transaction implementation for sql-direct.

use async_trait::async_trait;
use mac2hostname_libsql::Database;
use mac2hostname_sql::{Rows, SqlParam, SqlTransaction};
use tokio::sync::OwnedMutexGuard;

use crate::Error;

/// A transaction handle for sql-direct.
///
/// Owns the connection lock until committed, rolled back or dropped.
pub struct Transaction {
    inner: mac2hostname_libsql::Transaction,
    _database: OwnedMutexGuard<Database>,
}

impl Transaction {
    pub(crate) const fn new(
        tx: mac2hostname_libsql::Transaction,
        database: OwnedMutexGuard<Database>,
    ) -> Self {
        Self {
            inner: tx,
            _database: database,
        }
    }
}

#[async_trait]
impl SqlTransaction for Transaction {
    type Error = Error;

    async fn execute<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<u64, Self::Error> {
        let query: String = query.into();
        Ok(self.inner.execute(&query, params).await?)
    }

    async fn query<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<Rows, Self::Error> {
        let query: String = query.into();
        Ok(self.inner.query(&query, params).await?)
    }

    async fn commit(self) -> Result<(), Self::Error> {
        Ok(self.inner.commit().await?)
    }

    async fn rollback(self) -> Result<(), Self::Error> {
        Ok(self.inner.rollback().await?)
    }
}

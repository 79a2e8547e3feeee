//! Transaction wrapper for libsql.

use libsql::Transaction as LibsqlTransaction;
use mac2hostname_sql::{Rows, SqlParam};

use crate::conversion::{convert_libsql_rows, to_libsql_params};
use crate::{Error, RESERVED_TABLE_PREFIX};

/// A write transaction begun with `BEGIN IMMEDIATE`.
///
/// Dropping it without calling [`Transaction::commit`] leaves the rollback to libsql
/// or, failing that, to the next [`crate::Database::reset`].
pub struct Transaction {
    inner: LibsqlTransaction,
}

impl Transaction {
    pub(crate) const fn new(tx: LibsqlTransaction) -> Self {
        Self { inner: tx }
    }

    /// Execute a SQL statement within the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an error if the query touches reserved tables
    /// or the SQL execution fails.
    pub async fn execute(&self, query: &str, params: Vec<SqlParam>) -> Result<u64, Error> {
        if query.contains(RESERVED_TABLE_PREFIX) {
            return Err(Error::UsedReservedTablePrefix);
        }

        Ok(self.inner.execute(query, to_libsql_params(params)).await?)
    }

    /// Execute a SQL query within the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an error if the query touches reserved tables
    /// or the SQL query fails.
    pub async fn query(&self, query: &str, params: Vec<SqlParam>) -> Result<Rows, Error> {
        if query.contains(RESERVED_TABLE_PREFIX) {
            return Err(Error::UsedReservedTablePrefix);
        }

        let libsql_rows = self.inner.query(query, to_libsql_params(params)).await?;

        convert_libsql_rows(libsql_rows).await
    }

    /// Commit the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an error if the commit operation fails.
    pub async fn commit(self) -> Result<(), Error> {
        Ok(self.inner.commit().await?)
    }

    /// Rollback the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an error if the rollback operation fails.
    pub async fn rollback(self) -> Result<(), Error> {
        Ok(self.inner.rollback().await?)
    }
}

//! Wrapper around [libsql](https://github.com/tursodatabase/libsql) which
//! provides additional functionality like migration
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod conversion;
mod error;
mod sql_type;
mod transaction;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

pub use error::{Error, LibSqlError};
pub use sql_type::SqlType;
pub use transaction::Transaction;

use conversion::{convert_libsql_rows, to_libsql_params};
use libsql::{Builder, Connection, TransactionBehavior, Value};
use mac2hostname_sql::{Rows, SqlParam};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

static RESERVED_TABLE_PREFIX: &str = "__mac2hostname_";
static CREATE_MIGRATIONS_TABLE_SQL: &str = include_str!("../sql/create_migrations_table.sql");
static INSERT_MIGRATION_SQL: &str = include_str!("../sql/insert_migration.sql");

/// How long a statement waits on another connection's lock before failing with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A libsql database wrapper.
#[derive(Clone)]
pub struct Database {
    // Kept alive alongside the connection it produced.
    _database: Arc<libsql::Database>,
    connection: Connection,
}

impl Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

impl Database {
    /// Connects to the database at the given path, creating the file if needed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the connection to the database fails.
    pub async fn connect(path: impl AsRef<std::path::Path> + Send) -> Result<Self, Error> {
        let database = Builder::new_local(path).build().await?;
        let connection = database.connect()?;

        connection.busy_timeout(BUSY_TIMEOUT)?;
        connection
            .execute(CREATE_MIGRATIONS_TABLE_SQL, to_libsql_params(vec![]))
            .await?;

        Ok(Self {
            _database: Arc::new(database),
            connection,
        })
    }

    /// Executes a mutation SQL query with the given parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the query contains a reserved table prefix,
    /// if the SQL type is incorrect, or if there is an issue executing the query.
    pub async fn execute(&self, query: &str, params: Vec<SqlParam>) -> Result<u64, Error> {
        if query.contains(RESERVED_TABLE_PREFIX) {
            return Err(Error::UsedReservedTablePrefix);
        }

        match SqlType::classify(query) {
            SqlType::Mutation => self
                .connection
                .execute(query, to_libsql_params(params))
                .await
                .map_err(Error::from),
            other => Err(Error::IncorrectSqlType(SqlType::Mutation, other)),
        }
    }

    /// Executes a migration SQL query, at most once per distinct query text.
    ///
    /// Returns `false` if the migration had already been applied.
    ///
    /// # Errors
    ///
    /// This function will return an error if the query contains a reserved table prefix,
    /// if the SQL type is incorrect, or if there is an issue executing the query.
    pub async fn migrate(&self, query: &str) -> Result<bool, Error> {
        if query.contains(RESERVED_TABLE_PREFIX) {
            return Err(Error::UsedReservedTablePrefix);
        }

        match SqlType::classify(query) {
            SqlType::Migration => {
                let mut hasher = Sha256::new();
                hasher.update(query);
                let hash = format!("{:x}", hasher.finalize());

                // first check if the migration has already been run
                let mut rows = self
                    .connection
                    .query(
                        "SELECT COUNT(*) FROM __mac2hostname_migrations WHERE query_hash = ?1",
                        to_libsql_params(vec![SqlParam::Text(hash.clone())]),
                    )
                    .await?;

                if let Some(row) = rows.next().await? {
                    if let Value::Integer(int) = row.get_value(0)? {
                        if int > 0 {
                            return Ok(false);
                        }
                    }
                }

                let transaction = self.connection.transaction().await?;

                transaction
                    .execute(query, to_libsql_params(vec![]))
                    .await?;

                let migration_params =
                    vec![SqlParam::Text(hash), SqlParam::Text(query.to_string())];

                transaction
                    .execute(INSERT_MIGRATION_SQL, to_libsql_params(migration_params))
                    .await?;

                transaction.commit().await?;

                debug!("applied migration: {}", query.trim());

                Ok(true)
            }
            other => Err(Error::IncorrectSqlType(SqlType::Migration, other)),
        }
    }

    /// Executes a query SQL statement with the given parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the query contains a reserved table prefix,
    /// if the SQL type is incorrect, or if there is an issue executing the query.
    pub async fn query(&self, query: &str, params: Vec<SqlParam>) -> Result<Rows, Error> {
        if query.contains(RESERVED_TABLE_PREFIX) {
            return Err(Error::UsedReservedTablePrefix);
        }

        match SqlType::classify(query) {
            SqlType::Query => {
                let libsql_rows = self
                    .connection
                    .query(query, to_libsql_params(params))
                    .await?;

                convert_libsql_rows(libsql_rows).await
            }
            other => Err(Error::IncorrectSqlType(SqlType::Query, other)),
        }
    }

    /// Begins a transaction with `BEGIN IMMEDIATE`, taking the write lock up front
    /// so no other writer can commit between the transaction's reads and writes.
    ///
    /// # Errors
    ///
    /// This function will return an error if the lock cannot be acquired within the
    /// busy timeout or the statement fails.
    pub async fn begin_transaction(&self) -> Result<Transaction, Error> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;

        Ok(Transaction::new(tx))
    }

    /// Rolls back a transaction left open on this connection, e.g. by a caller whose
    /// future was dropped between `BEGIN` and `COMMIT`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the rollback fails.
    pub async fn reset(&self) -> Result<(), Error> {
        if !self.connection.is_autocommit() {
            warn!("rolling back transaction abandoned on shared connection");
            self.connection
                .execute("ROLLBACK", to_libsql_params(vec![]))
                .await?;
        }

        Ok(())
    }
}

//! Storage-agnostic SQL interface used by the hostname resolver.
#![warn(clippy::all)]

mod rows;
mod sql_param;

pub use rows::{Row, Rows};
pub use sql_param::SqlParam;

use async_trait::async_trait;
use std::error::Error;
use std::fmt::Debug;

/// Marker trait for SQLStore errors
pub trait SqlStoreError: Debug + Error + Send + Sync + 'static {
    /// Whether the statement was rejected by a `UNIQUE` or `PRIMARY KEY` constraint.
    fn is_unique_violation(&self) -> bool;
}

/// A unit of work against a single connection.
///
/// The transaction holds the store's write lock from the moment it is begun, so
/// reads performed inside it cannot be invalidated by another writer before commit.
/// Dropping a transaction without committing discards its writes.
#[async_trait]
pub trait SqlTransaction: Send + Sync + 'static {
    type Error: SqlStoreError;

    /// Execute a SQL statement that modifies data
    async fn execute<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<u64, Self::Error>;

    /// Execute a SQL query that returns data
    async fn query<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<Rows, Self::Error>;

    async fn commit(self) -> Result<(), Self::Error>;

    async fn rollback(self) -> Result<(), Self::Error>;
}

#[async_trait]
pub trait SqlConnection: Clone + Send + Sync + 'static {
    type Error: SqlStoreError;
    type Transaction: SqlTransaction<Error = Self::Error>;

    /// Execute a SQL statement that modifies data
    async fn execute<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<u64, Self::Error>;

    /// Execute a SQL statement that modifies schema and returns bool indicating if needed to be run
    async fn migrate<Q: Into<String> + Send>(&self, query: Q) -> Result<bool, Self::Error>;

    /// Execute a SQL query that returns data
    async fn query<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<Rows, Self::Error>;

    /// Begin a write transaction.
    async fn begin_transaction(&self) -> Result<Self::Transaction, Self::Error>;
}

#[async_trait]
pub trait SqlStore: Clone + Send + Sync + 'static {
    type Error: SqlStoreError;
    type Connection: SqlConnection<Error = Self::Error>;

    /// Opens a connection, applying every registered migration first.
    async fn connect(&self) -> Result<Self::Connection, Self::Error>;

    /// Registers a migration to run on the next `connect`.
    async fn migrate<Q: Into<String> + Send>(&self, query: Q) -> Self;
}

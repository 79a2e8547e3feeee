use crate::SqlType;

use mac2hostname_sql::SqlStoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `SQLITE_CONSTRAINT` primary result code.
const SQLITE_CONSTRAINT: i32 = 19;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Copy of the `libsql::Error` variants this crate can observe, made serializable.
#[derive(Clone, Debug, Deserialize, Error, Serialize)]
pub enum LibSqlError {
    #[error("Failed to connect to database: `{0}`")]
    ConnectionFailed(String),

    #[error("SQLite failure: `{1}`")]
    SqliteFailure(i32, String),

    #[error("Null value")]
    NullValue,

    #[error("API misuse: `{0}`")]
    Misuse(String),

    #[error("Query returned no rows")]
    QueryReturnedNoRows,

    #[error("Invalid column name: `{0}`")]
    InvalidColumnName(String),

    #[error("invalid column index")]
    InvalidColumnIndex,

    #[error("invalid column type")]
    InvalidColumnType,

    #[error("path has invalid UTF-8")]
    InvalidUTF8Path,

    /// Added due to non-exhaustive enum.
    #[error("{0}")]
    OtherLibsqlError(String),
}

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Deserialize, Error, Serialize)]
pub enum Error {
    /// Incorrect SQL type for request.
    #[error("Incorrect SQL type. Expected {0}, got {1}")]
    IncorrectSqlType(SqlType, SqlType),

    /// Invalid column count.
    #[error("Invalid column count")]
    InvalidColumnCount,

    /// Libsql error.
    #[error(transparent)]
    Libsql(LibSqlError),

    /// Used reserved table prefix.
    #[error("Cannot use reserved table prefix")]
    UsedReservedTablePrefix,
}

impl Error {
    /// Whether SQLite rejected a write because of a `UNIQUE` or `PRIMARY KEY`
    /// constraint. Accepts both primary and extended result codes.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Libsql(LibSqlError::SqliteFailure(code, message)) => match *code {
                SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => true,
                SQLITE_CONSTRAINT => message.contains("UNIQUE constraint failed"),
                _ => false,
            },
            _ => false,
        }
    }
}

impl SqlStoreError for Error {
    fn is_unique_violation(&self) -> bool {
        Self::is_unique_violation(self)
    }
}

impl From<libsql::Error> for Error {
    fn from(error: libsql::Error) -> Self {
        Self::Libsql(match error {
            libsql::Error::ConnectionFailed(e) => LibSqlError::ConnectionFailed(e),
            libsql::Error::SqliteFailure(i, e) => LibSqlError::SqliteFailure(i, e),
            libsql::Error::NullValue => LibSqlError::NullValue,
            libsql::Error::Misuse(e) => LibSqlError::Misuse(e),
            libsql::Error::QueryReturnedNoRows => LibSqlError::QueryReturnedNoRows,
            libsql::Error::InvalidColumnName(e) => LibSqlError::InvalidColumnName(e),
            libsql::Error::InvalidColumnIndex => LibSqlError::InvalidColumnIndex,
            libsql::Error::InvalidColumnType => LibSqlError::InvalidColumnType,
            libsql::Error::InvalidUTF8Path => LibSqlError::InvalidUTF8Path,
            e => LibSqlError::OtherLibsqlError(format!("{e}")),
        })
    }
}

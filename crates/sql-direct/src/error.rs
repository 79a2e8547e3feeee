use mac2hostname_sql::SqlStoreError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Libsql errors.
    #[error(transparent)]
    Libsql(#[from] mac2hostname_libsql::Error),
}

impl SqlStoreError for Error {
    fn is_unique_violation(&self) -> bool {
        match self {
            Self::Libsql(e) => e.is_unique_violation(),
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error type
#[derive(Debug, Error)]
pub enum Error {
    /// Config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// The offending file.
        path: PathBuf,

        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid YAML/JSON or has wrongly typed keys.
    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),

    /// Port given as text that is not a valid port number.
    #[error("invalid port `{0}`")]
    InvalidPort(String),

    /// HTTP server error
    #[error(transparent)]
    Http(#[from] mac2hostname_http::Error),

    /// Resolver error
    #[error(transparent)]
    Resolver(#[from] mac2hostname_resolver::Error<mac2hostname_sql_direct::Error>),

    /// Store error
    #[error(transparent)]
    Store(#[from] mac2hostname_sql_direct::Error),
}

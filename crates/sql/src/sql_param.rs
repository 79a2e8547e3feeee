use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Represents a parameter for a SQL query
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SqlParam {
    /// Represents a BLOB value
    Blob(Bytes),

    /// Represents an INTEGER value
    Integer(i64),

    /// Represents a NULL value
    Null,

    /// Represents a REAL value
    Real(f64),

    /// Represents a TEXT value
    Text(String),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

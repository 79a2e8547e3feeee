use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Kind of statement, derived from its leading keyword.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SqlType {
    /// Schema changes (`CREATE`, `ALTER`, `DROP`).
    Migration,

    /// Data changes.
    Mutation,

    /// `SELECT` statements.
    Query,
}

impl SqlType {
    pub(crate) fn classify(sql: &str) -> Self {
        let sql = sql.trim_start().to_uppercase();

        if sql.starts_with("SELECT") {
            Self::Query
        } else if sql.starts_with("CREATE") || sql.starts_with("ALTER") || sql.starts_with("DROP") {
            Self::Migration
        } else {
            Self::Mutation
        }
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Migration => write!(f, "Migration"),
            Self::Mutation => write!(f, "Mutation"),
            Self::Query => write!(f, "Query"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            SqlType::classify("  select hostname_id FROM machines"),
            SqlType::Query
        );
        assert_eq!(
            SqlType::classify("CREATE UNIQUE INDEX IF NOT EXISTS mac_machines ON machines (mac)"),
            SqlType::Migration
        );
        assert_eq!(
            SqlType::classify("INSERT INTO machines(mac) VALUES (?1)"),
            SqlType::Mutation
        );
    }
}

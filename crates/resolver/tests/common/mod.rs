#![allow(dead_code)]

use std::path::Path;

use mac2hostname_resolver::{HostnameResolver, ResolverConfig};
use mac2hostname_sql::{SqlConnection, SqlStore};
use mac2hostname_sql_direct::{Connection, DirectSqlStore};
use tempfile::TempDir;

pub struct TestStore {
    // Held so the database file outlives the test.
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("mac2hostname.sqlite3")
    }

    pub async fn connection(&self) -> Connection {
        connect(&self.path()).await
    }

    pub async fn resolver(&self) -> HostnameResolver<Connection> {
        HostnameResolver::new(self.connection().await, ResolverConfig::default())
            .await
            .expect("Failed to create resolver")
    }
}

pub async fn connect(path: &Path) -> Connection {
    DirectSqlStore::new(path)
        .connect()
        .await
        .expect("Failed to connect")
}

/// All `(mac, hostname_base, hostname_id)` rows, ordered by group then sequence.
pub async fn stored_rows(connection: &Connection) -> Vec<(String, String, i64)> {
    let rows = connection
        .query(
            "SELECT mac, hostname_base, hostname_id FROM machines ORDER BY hostname_base, hostname_id",
            vec![],
        )
        .await
        .expect("Failed to read machines");

    rows.iter()
        .map(|row| {
            (
                row.get_text(0).unwrap().to_string(),
                row.get_text(1).unwrap().to_string(),
                row.get_integer(2).unwrap(),
            )
        })
        .collect()
}

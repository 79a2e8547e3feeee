//! SQL store backed directly by a local libsql database file.
#![warn(clippy::all)]

mod connection;
mod error;
mod transaction;

pub use connection::Connection;
pub use error::Error;
pub use transaction::Transaction;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use mac2hostname_sql::{SqlConnection, SqlStore};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct DirectSqlStore {
    path: PathBuf,
    migrations: Arc<Mutex<Vec<String>>>,
}

impl DirectSqlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            migrations: Arc::default(),
        }
    }
}

#[async_trait]
impl SqlStore for DirectSqlStore {
    type Error = Error;
    type Connection = Connection;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let connection = Connection::new(self.path.clone()).await?;

        for migration in self.migrations.lock().await.iter() {
            connection.migrate(migration.as_str()).await?;
        }

        info!("sql store opened at {}", self.path.display());

        Ok(connection)
    }

    async fn migrate<Q: Into<String> + Send>(&self, query: Q) -> Self {
        self.migrations.lock().await.push(query.into());

        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mac2hostname_sql::{SqlParam, SqlTransaction};
    use tempfile::tempdir;

    const CREATE_MACHINES: &str = "CREATE TABLE IF NOT EXISTS machines (hostname_id INTEGER, mac TEXT UNIQUE NOT NULL)";

    #[tokio::test]
    async fn test_sql_store() {
        let dir = tempdir().unwrap();

        let store = DirectSqlStore::new(dir.path().join("test.db"))
            .migrate(CREATE_MACHINES)
            .await;
        let connection = store.connect().await.unwrap();

        let response = connection
            .execute(
                "INSERT INTO machines (hostname_id, mac) VALUES (?1, ?2)",
                vec![
                    SqlParam::Integer(1),
                    SqlParam::Text("00:11:22:33:44:55".to_string()),
                ],
            )
            .await
            .unwrap();

        assert_eq!(response, 1);

        let response = connection
            .query("SELECT hostname_id, mac FROM machines", vec![])
            .await
            .unwrap();

        assert_eq!(response.column_count, 2);
        assert_eq!(response.column_names, vec!["hostname_id", "mac"]);
        assert_eq!(response.column_types, vec!["INTEGER", "TEXT"]);
        assert_eq!(
            response.rows,
            vec![vec![
                SqlParam::Integer(1),
                SqlParam::Text("00:11:22:33:44:55".to_string())
            ]]
        );
    }

    #[tokio::test]
    async fn test_dropped_transaction_is_rolled_back() {
        let dir = tempdir().unwrap();
        let store = DirectSqlStore::new(dir.path().join("test.db"))
            .migrate(CREATE_MACHINES)
            .await;
        let connection = store.connect().await.unwrap();

        let tx = connection.begin_transaction().await.unwrap();
        tx.execute(
            "INSERT INTO machines (hostname_id, mac) VALUES (?1, ?2)",
            vec![SqlParam::Integer(1), "00:11:22:33:44:55".into()],
        )
        .await
        .unwrap();
        drop(tx);

        let rows = connection
            .query("SELECT mac FROM machines", vec![])
            .await
            .unwrap();
        assert!(rows.is_empty());

        // The connection is usable for new transactions afterwards.
        let tx = connection.begin_transaction().await.unwrap();
        tx.execute(
            "INSERT INTO machines (hostname_id, mac) VALUES (?1, ?2)",
            vec![SqlParam::Integer(1), "00:11:22:33:44:55".into()],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let rows = connection
            .query("SELECT mac FROM machines", vec![])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_unique_violation_surfaces_through_store_error() {
        use mac2hostname_sql::SqlStoreError;

        let dir = tempdir().unwrap();
        let store = DirectSqlStore::new(dir.path().join("test.db"))
            .migrate(CREATE_MACHINES)
            .await;
        let connection = store.connect().await.unwrap();

        let insert = "INSERT INTO machines (hostname_id, mac) VALUES (?1, ?2)";
        connection
            .execute(insert, vec![SqlParam::Integer(1), "00:11:22:33:44:55".into()])
            .await
            .unwrap();

        let tx = connection.begin_transaction().await.unwrap();
        let err = tx
            .execute(insert, vec![SqlParam::Integer(2), "00:11:22:33:44:55".into()])
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        tx.rollback().await.unwrap();
    }
}

use crate::{Error, transaction::Transaction};

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use mac2hostname_libsql::Database;
use mac2hostname_sql::{Rows, SqlConnection, SqlParam};
use tokio::sync::{Mutex, MutexGuard};

/// A single libsql connection shared by every clone.
///
/// Statements are serialized through the mutex; an open [`Transaction`] keeps the
/// mutex for its whole lifetime so nothing else can run inside it.
#[derive(Clone, Debug)]
pub struct Connection {
    database: Arc<Mutex<Database>>,
}

impl Connection {
    pub(crate) async fn new(path: PathBuf) -> Result<Self, Error> {
        let database = Arc::new(Mutex::new(Database::connect(path).await?));

        Ok(Self { database })
    }

    async fn lock(&self) -> Result<MutexGuard<'_, Database>, Error> {
        let database = self.database.lock().await;
        database.reset().await?;
        Ok(database)
    }
}

#[async_trait]
impl SqlConnection for Connection {
    type Error = Error;
    type Transaction = Transaction;

    async fn execute<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<u64, Self::Error> {
        let query: String = query.into();
        Ok(self.lock().await?.execute(&query, params).await?)
    }

    async fn migrate<Q: Into<String> + Send>(&self, query: Q) -> Result<bool, Self::Error> {
        let query: String = query.into();
        Ok(self.lock().await?.migrate(&query).await?)
    }

    async fn query<Q: Into<String> + Send>(
        &self,
        query: Q,
        params: Vec<SqlParam>,
    ) -> Result<Rows, Self::Error> {
        let query: String = query.into();
        Ok(self.lock().await?.query(&query, params).await?)
    }

    async fn begin_transaction(&self) -> Result<Self::Transaction, Self::Error> {
        let database = self.database.clone().lock_owned().await;
        database.reset().await?;
        let tx = database.begin_transaction().await?;

        Ok(Transaction::new(tx, database))
    }
}

use crate::error::{Error, Result};
use crate::{Assignment, MacAddress, ResolverConfig};

use std::sync::Arc;

use mac2hostname_sql::{SqlConnection, SqlParam, SqlStoreError, SqlTransaction};
use tracing::{debug, info, warn};

static CREATE_MACHINES_TABLE_SQL: &str = include_str!("../sql/create_machines_table.sql");
static CREATE_MAC_INDEX_SQL: &str = include_str!("../sql/create_mac_index.sql");
static SELECT_ASSIGNMENT_SQL: &str = include_str!("../sql/select_assignment.sql");
static SELECT_MAX_SEQUENCE_SQL: &str = include_str!("../sql/select_max_sequence.sql");
static INSERT_ASSIGNMENT_SQL: &str = include_str!("../sql/insert_assignment.sql");

/// Allocations that may lose a uniqueness race before giving up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Result of looking a MAC up without allocating.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup {
    Found(Assignment),
    NotFound,
}

/// Result of one allocation transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Allocation {
    Created(Assignment),

    /// The insert hit a uniqueness constraint and was rolled back.
    Conflict,
}

/// Looks up or allocates the permanent hostname of a MAC address.
///
/// Clones share the underlying connection.
pub struct HostnameResolver<C>
where
    C: SqlConnection,
{
    connection: C,
    config: Arc<ResolverConfig>,
}

impl<C> Clone for HostnameResolver<C>
where
    C: SqlConnection,
{
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C> HostnameResolver<C>
where
    C: SqlConnection,
{
    /// Creates the `machines` schema if needed and wraps the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if a migration fails.
    pub async fn new(connection: C, config: ResolverConfig) -> Result<Self, C::Error> {
        connection
            .migrate(CREATE_MACHINES_TABLE_SQL)
            .await
            .map_err(Error::Storage)?;
        connection
            .migrate(CREATE_MAC_INDEX_SQL)
            .await
            .map_err(Error::Storage)?;

        info!(default_group = %config.default_group, "hostname resolver ready");

        Ok(Self {
            connection,
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn default_group(&self) -> &str {
        &self.config.default_group
    }

    /// Returns the hostname of `mac`, allocating the next one in `group` on first sight.
    ///
    /// A known MAC keeps its original hostname whatever `group` is passed. `None` or an
    /// empty group selects the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on store failures. Uniqueness conflicts caused by
    /// concurrent registrations are resolved by re-reading the winner's assignment.
    pub async fn resolve(&self, mac: &str, group: Option<&str>) -> Result<String, C::Error> {
        Ok(self.resolve_assignment(mac, group).await?.hostname())
    }

    /// Like [`Self::resolve`] but returns the whole assignment.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_assignment(
        &self,
        mac: &str,
        group: Option<&str>,
    ) -> Result<Assignment, C::Error> {
        let mac = MacAddress::normalize(mac);
        let group = group
            .filter(|group| !group.is_empty())
            .unwrap_or(self.config.default_group.as_str());

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            if let Lookup::Found(assignment) = self.lookup(&mac).await? {
                debug!(%mac, hostname = %assignment.hostname(), "known mac");
                return Ok(assignment);
            }

            match self.allocate(&mac, group).await? {
                Allocation::Created(assignment) => {
                    info!(%mac, hostname = %assignment.hostname(), "allocated hostname");
                    return Ok(assignment);
                }
                Allocation::Conflict => {
                    debug!(%mac, attempt, "allocation conflicted, retrying lookup");
                }
            }
        }

        Err(Error::ConflictsExhausted {
            mac,
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Reads the assignment of `mac`, ignoring groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on store failures and [`Error::MalformedRow`] if the
    /// stored row cannot be decoded.
    pub async fn lookup(&self, mac: &MacAddress) -> Result<Lookup, C::Error> {
        let rows = self
            .connection
            .query(SELECT_ASSIGNMENT_SQL, vec![SqlParam::from(mac.as_str())])
            .await
            .map_err(Error::Storage)?;

        match rows.row(0) {
            Some(row) => Assignment::from_row(mac.clone(), &row)
                .map(Lookup::Found)
                .ok_or_else(|| Error::MalformedRow { mac: mac.clone() }),
            None => Ok(Lookup::NotFound),
        }
    }

    /// Inserts `mac` as the next member of `group` in a single write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] for any failure other than a uniqueness conflict.
    pub async fn allocate(&self, mac: &MacAddress, group: &str) -> Result<Allocation, C::Error> {
        let tx = self
            .connection
            .begin_transaction()
            .await
            .map_err(Error::Storage)?;

        match Self::insert_next(&tx, mac, group).await {
            Ok(assignment) => {
                tx.commit().await.map_err(Error::Storage)?;
                Ok(Allocation::Created(assignment))
            }
            Err(Error::Storage(e)) if e.is_unique_violation() => {
                tx.rollback().await.map_err(Error::Storage)?;
                Ok(Allocation::Conflict)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(%mac, "rollback after failed allocation failed: {rollback_error}");
                }
                Err(e)
            }
        }
    }

    async fn insert_next(
        tx: &C::Transaction,
        mac: &MacAddress,
        group: &str,
    ) -> Result<Assignment, C::Error> {
        let rows = tx
            .query(SELECT_MAX_SEQUENCE_SQL, vec![SqlParam::from(group)])
            .await
            .map_err(Error::Storage)?;

        let current = match rows.row(0) {
            Some(row) if !row.is_null(0) => row
                .get_integer(0)
                .and_then(|max| u64::try_from(max).ok())
                .ok_or_else(|| Error::MalformedRow { mac: mac.clone() })?,
            _ => 0,
        };
        let sequence = current + 1;
        let stored_sequence =
            i64::try_from(sequence).map_err(|_| Error::MalformedRow { mac: mac.clone() })?;

        tx.execute(
            INSERT_ASSIGNMENT_SQL,
            vec![
                SqlParam::from(mac.as_str()),
                SqlParam::Integer(stored_sequence),
                SqlParam::from(group),
            ],
        )
        .await
        .map_err(Error::Storage)?;

        Ok(Assignment {
            mac: mac.clone(),
            group: group.to_string(),
            sequence,
        })
    }
}

impl<C> std::fmt::Debug for HostnameResolver<C>
where
    C: SqlConnection,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostnameResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

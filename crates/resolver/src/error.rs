use crate::MacAddress;

use mac2hostname_sql::SqlStoreError;
use thiserror::Error;

pub type Result<T, SE> = std::result::Result<T, Error<SE>>;

/// Errors surfaced by [`crate::HostnameResolver`].
///
/// Uniqueness conflicts are handled internally and only appear here once the retry
/// budget is spent.
#[derive(Debug, Error)]
pub enum Error<SE>
where
    SE: SqlStoreError,
{
    /// The store failed (I/O, locking, bad SQL).
    #[error("storage failure: {0}")]
    Storage(#[source] SE),

    /// A stored row could not be decoded into an assignment.
    #[error("malformed assignment row for {mac}")]
    MalformedRow {
        /// The MAC whose row is unreadable.
        mac: MacAddress,
    },

    /// Every allocation attempt lost a uniqueness race yet no winner was visible.
    #[error("allocation for {mac} conflicted {attempts} times")]
    ConflictsExhausted {
        /// The MAC being allocated.
        mac: MacAddress,

        /// How many allocations were tried.
        attempts: usize,
    },
}

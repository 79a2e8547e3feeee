//! Deterministic MAC address to hostname allocation.
//!
//! The first time a MAC address is seen it is given the next free number in its group,
//! producing hostnames such as `machine1`, `machine2` or `printer1`. Every later lookup
//! of that MAC returns the same hostname, whichever group it names.
//!
//! Allocation reads the group's highest number and inserts the successor inside one
//! write transaction, so concurrent registrations in a group never share a number.
//! The store's uniqueness constraint on the MAC catches two callers registering the
//! same address at once; the loser rolls back and returns the winner's hostname.
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod assignment;
mod config;
mod error;
mod mac;
mod resolver;

pub use assignment::Assignment;
pub use config::{DEFAULT_GROUP, ResolverConfig};
pub use error::{Error, Result};
pub use mac::MacAddress;
pub use resolver::{Allocation, HostnameResolver, Lookup, MAX_ALLOCATION_ATTEMPTS};

//! External collaborators: connection pool and connection
//!
//! The batch layer never opens sockets. It asks a pool for a connection and
//! hands it one packed mutation map per `send`. Pooling, retries at the
//! transport level, and timeouts all live behind these traits.

use crate::wire::MutationMap;
use cassia_core::{CassiaResult, ConsistencyLevel};

/// A live store connection
pub trait Connection {
    /// Apply every mutation in the map as one request
    ///
    /// The map is borrowed so that a failed call can be repeated with the
    /// identical payload.
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Transport` when the request could not be
    /// delivered and `CassiaError::Store` when the store rejected it.
    fn batch_mutate(
        &mut self,
        mutation_map: &MutationMap,
        consistency_level: ConsistencyLevel,
    ) -> CassiaResult<()>;
}

/// Source of store connections
///
/// Thread safety: pools are shared between mutators and must be safe to
/// call concurrently (requires Send + Sync).
pub trait ConnectionPool: Send + Sync {
    /// Acquire a connection
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Transport` when no connection is available.
    fn connection(&self) -> CassiaResult<Box<dyn Connection + '_>>;
}

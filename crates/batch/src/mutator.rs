//! Batched writes across column families
//!
//! A [`Mutator`] collects insertions and deletions for any number of rows and
//! column families and delivers them in one `batch_mutate` call.
//!
//! ## State
//!
//! ```text
//! Empty ──insert/remove──▶ Pending ──send ok──▶ Empty
//!                            │  ▲
//!                            └──┘ insert/remove, send failed
//! ```
//!
//! `send` on an `Empty` mutator is skipped: no connection is acquired and
//! `Ok(())` is returned.
//!
//! ## Timestamps
//!
//! Default timestamps come from the mutator's [`Clock`] at the moment
//! `insert` or `remove` is called, never at `send`.
//!
//! ## Thread safety
//!
//! A mutator is owned by one caller. Mutating methods take `&mut self`, so
//! sharing one across threads needs an outer lock.

use crate::buffer::{BufferState, BufferedOperation, MutationBuffer, Operation};
use crate::column_family::ColumnFamily;
use crate::columns::{check_name, ColumnSet};
use crate::transport::ConnectionPool;
use crate::wire::{mutation_count, MutationMap};
use cassia_core::{CassiaError, CassiaResult, Clock, ConsistencyLevel, SystemClock, Timestamp, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Buffers writes and sends them as one batch
pub struct Mutator {
    pool: Arc<dyn ConnectionPool>,
    consistency_level: ConsistencyLevel,
    buffer: MutationBuffer,
    clock: Arc<dyn Clock>,
}

impl Mutator {
    /// Create an empty mutator
    ///
    /// Without an explicit level, batches are sent at `ONE` unless `send`
    /// names a level.
    pub fn new(pool: Arc<dyn ConnectionPool>, consistency_level: Option<ConsistencyLevel>) -> Self {
        Mutator {
            pool,
            consistency_level: consistency_level.unwrap_or_default(),
            buffer: MutationBuffer::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` for default timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Level used by `send` when none is given
    pub fn consistency_level(&self) -> ConsistencyLevel {
        self.consistency_level
    }

    /// Buffer one insertion per column (or super column) in `columns`
    ///
    /// `timestamp` defaults to the clock's current time; `ttl` applies to
    /// every column written by this call. Nothing is sent. TimeUUID names
    /// given as dates are fixed to concrete UUIDs here, so every later
    /// `mutation_map` and `send` carries the same bytes.
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Validation` if the key or columns do not fit the
    /// column family. The buffer is unchanged on error.
    pub fn insert(
        &mut self,
        column_family: &ColumnFamily,
        key: impl Into<Value>,
        columns: ColumnSet,
        timestamp: Option<Timestamp>,
        ttl: Option<u32>,
    ) -> CassiaResult<&mut Self> {
        let schema = column_family.schema();
        let key = schema.key_type.resolve(&key.into());
        check_key(column_family, &key)?;
        let columns = columns.resolve(schema);
        columns.validate(schema, ttl)?;

        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());
        trace!(
            target: "cassia::batch",
            column_family = %schema.name,
            columns = columns.len(),
            timestamp = %timestamp,
            "Buffered insert"
        );
        for column in columns.into_entries() {
            self.buffer.push(
                Arc::clone(schema),
                key.clone(),
                Operation::Insertion {
                    column,
                    timestamp,
                    ttl,
                },
            );
        }
        Ok(self)
    }

    /// Buffer one deletion
    ///
    /// With `columns == None` the whole row is deleted, or the whole super
    /// column when `super_column` is given. Otherwise only the named columns
    /// are deleted, scoped to `super_column` if given.
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Validation` if the key, names or super column do
    /// not fit the column family. The buffer is unchanged on error.
    pub fn remove(
        &mut self,
        column_family: &ColumnFamily,
        key: impl Into<Value>,
        columns: Option<Vec<Value>>,
        super_column: Option<Value>,
        timestamp: Option<Timestamp>,
    ) -> CassiaResult<&mut Self> {
        let schema = column_family.schema();
        let key = schema.key_type.resolve(&key.into());
        check_key(column_family, &key)?;

        let super_column = super_column.map(|sc| schema.comparator.resolve(&sc));
        let name_type = schema.name_type(super_column.is_some());
        let columns =
            columns.map(|names| names.iter().map(|n| name_type.resolve(n)).collect::<Vec<_>>());

        if let Some(sc) = &super_column {
            if !schema.is_super() {
                return Err(CassiaError::validation(format!(
                    "'{}' is not a super column family; cannot scope a deletion to super column {:?}",
                    schema.name, sc
                )));
            }
            check_name(schema, sc, false)?;
        }
        if let Some(names) = &columns {
            if names.is_empty() {
                return Err(CassiaError::validation(format!(
                    "empty column list for deletion from '{}'; pass None to delete the row",
                    schema.name
                )));
            }
            for name in names {
                check_name(schema, name, super_column.is_some())?;
            }
        }

        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());
        trace!(
            target: "cassia::batch",
            column_family = %schema.name,
            columns = columns.as_ref().map_or(0, Vec::len),
            timestamp = %timestamp,
            "Buffered remove"
        );
        self.buffer.push(
            Arc::clone(schema),
            key,
            Operation::Deletion {
                columns,
                super_column,
                timestamp,
            },
        );
        Ok(self)
    }

    /// Deliver every buffered operation in one `batch_mutate` call
    ///
    /// Uses `consistency_level` if given, else the mutator's level. The
    /// buffer is cleared only on success. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns codec, transport or store errors unchanged. The buffer is left
    /// intact so the same payload can be sent again.
    pub fn send(&mut self, consistency_level: Option<ConsistencyLevel>) -> CassiaResult<()> {
        if self.buffer.is_empty() {
            debug!(target: "cassia::batch", "Skipping send of empty batch");
            return Ok(());
        }

        let level = consistency_level.unwrap_or(self.consistency_level);
        let map = self.buffer.to_mutation_map()?;
        debug!(
            target: "cassia::batch",
            rows = map.len(),
            mutations = mutation_count(&map),
            consistency_level = %level,
            "Sending batch"
        );

        let result = self
            .pool
            .connection()
            .and_then(|mut conn| conn.batch_mutate(&map, level));
        match result {
            Ok(()) => {
                self.buffer.clear();
                Ok(())
            }
            Err(e) => {
                warn!(
                    target: "cassia::batch",
                    error = %e,
                    retained = self.buffer.len(),
                    "batch_mutate failed, operations retained"
                );
                Err(e)
            }
        }
    }

    /// Number of buffered operations
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// `Empty` or `Pending`
    pub fn state(&self) -> BufferState {
        self.buffer.state()
    }

    /// Buffered operations in call order
    pub fn operations(&self) -> &[BufferedOperation] {
        self.buffer.operations()
    }

    /// Build the map `send` would deliver, without sending it
    ///
    /// # Errors
    ///
    /// Returns the first codec error hit while packing.
    pub fn mutation_map(&self) -> CassiaResult<MutationMap> {
        self.buffer.to_mutation_map()
    }
}

fn check_key(column_family: &ColumnFamily, key: &Value) -> CassiaResult<()> {
    let schema = column_family.schema();
    schema.key_type.accepts(key, false).map_err(|e| {
        CassiaError::validation(format!(
            "row key {:?} rejected for '{}': {}",
            key, schema.name, e
        ))
    })
}

impl fmt::Debug for Mutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutator")
            .field("consistency_level", &self.consistency_level)
            .field("pending", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

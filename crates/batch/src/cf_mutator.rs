//! Single column family facade over [`Mutator`]

use crate::buffer::{BufferState, BufferedOperation};
use crate::column_family::ColumnFamily;
use crate::columns::ColumnSet;
use crate::mutator::Mutator;
use crate::wire::MutationMap;
use cassia_core::{CassiaResult, Clock, ConsistencyLevel, Timestamp, Value};
use std::sync::Arc;

/// A [`Mutator`] bound to one column family
///
/// Batches go through the column family's pool. The write level is the one
/// given at construction, else the column family's declared default.
#[derive(Debug)]
pub struct CfMutator<'cf> {
    column_family: &'cf ColumnFamily,
    mutator: Mutator,
}

impl<'cf> CfMutator<'cf> {
    /// Create an empty mutator for `column_family`
    pub fn new(
        column_family: &'cf ColumnFamily,
        write_consistency_level: Option<ConsistencyLevel>,
    ) -> Self {
        let level = write_consistency_level.unwrap_or(column_family.write_consistency_level());
        CfMutator {
            column_family,
            mutator: Mutator::new(Arc::clone(column_family.pool()), Some(level)),
        }
    }

    /// Use `clock` for default timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.mutator = self.mutator.with_clock(clock);
        self
    }

    /// The bound column family
    pub fn column_family(&self) -> &'cf ColumnFamily {
        self.column_family
    }

    /// Level used by `send` when none is given
    pub fn consistency_level(&self) -> ConsistencyLevel {
        self.mutator.consistency_level()
    }

    /// See [`Mutator::insert`]
    pub fn insert(
        &mut self,
        key: impl Into<Value>,
        columns: ColumnSet,
        timestamp: Option<Timestamp>,
        ttl: Option<u32>,
    ) -> CassiaResult<&mut Self> {
        self.mutator
            .insert(self.column_family, key, columns, timestamp, ttl)?;
        Ok(self)
    }

    /// See [`Mutator::remove`]
    pub fn remove(
        &mut self,
        key: impl Into<Value>,
        columns: Option<Vec<Value>>,
        super_column: Option<Value>,
        timestamp: Option<Timestamp>,
    ) -> CassiaResult<&mut Self> {
        self.mutator
            .remove(self.column_family, key, columns, super_column, timestamp)?;
        Ok(self)
    }

    /// See [`Mutator::send`]
    pub fn send(&mut self, consistency_level: Option<ConsistencyLevel>) -> CassiaResult<()> {
        self.mutator.send(consistency_level)
    }

    /// Number of buffered operations
    pub fn len(&self) -> usize {
        self.mutator.len()
    }

    /// Whether nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.mutator.is_empty()
    }

    /// `Empty` or `Pending`
    pub fn state(&self) -> BufferState {
        self.mutator.state()
    }

    /// Buffered operations in call order
    pub fn operations(&self) -> &[BufferedOperation] {
        self.mutator.operations()
    }

    /// Build the map `send` would deliver, without sending it
    ///
    /// # Errors
    ///
    /// Returns the first codec error hit while packing.
    pub fn mutation_map(&self) -> CassiaResult<MutationMap> {
        self.mutator.mutation_map()
    }
}

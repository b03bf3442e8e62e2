//! Batched mutations for column-family stores
//!
//! This crate buffers writes client-side and delivers them in one
//! `batch_mutate` round-trip:
//! - ColumnFamily: schema types plus the pool that serves them
//! - ColumnSet: validated column input for `insert`
//! - MutationBuffer: pending operations in call order
//! - Mutator / CfMutator: insert, remove, send
//! - Wire: packed mutation records handed to the transport
//! - ClientConfig: column family schemas from `cassia.toml`
//!
//! Sockets, pooling and transport-level retry stay behind the
//! [`ConnectionPool`] and [`Connection`] traits.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod cf_mutator;
pub mod column_family;
pub mod columns;
pub mod config;
pub mod mutator;
pub mod transport;
pub mod wire;

pub use buffer::{BufferState, BufferedOperation, MutationBuffer, Operation};
pub use cf_mutator::CfMutator;
pub use column_family::{ColumnFamily, ColumnFamilySchema, ColumnType, InsertFormat};
pub use columns::{ColumnEntry, ColumnSet};
pub use config::{ClientConfig, ColumnFamilyDef, CONFIG_FILE_NAME};
pub use mutator::Mutator;
pub use transport::{Connection, ConnectionPool};
pub use wire::{
    mutation_count, Column, ColumnOrSuperColumn, CounterColumn, Deletion, Mutation, MutationMap,
    SlicePredicate,
};

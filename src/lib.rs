//! Cassia - typed codecs and batched mutations for column-family stores
//!
//! Cassia packs native values into the store's marshal formats and buffers
//! insertions and deletions client-side so a whole batch reaches the store
//! in one `batch_mutate` call.
//!
//! # Quick Start
//!
//! ```
//! use cassia::{
//!     CassiaResult, ColumnFamily, ColumnFamilySchema, ColumnSet, Connection,
//!     ConnectionPool, ConsistencyLevel, DataType, Mutator, MutationMap,
//! };
//! use std::sync::Arc;
//!
//! struct LoggingPool;
//! struct LoggingConnection;
//!
//! impl Connection for LoggingConnection {
//!     fn batch_mutate(&mut self, map: &MutationMap, _: ConsistencyLevel) -> CassiaResult<()> {
//!         assert_eq!(map.len(), 1);
//!         Ok(())
//!     }
//! }
//!
//! impl ConnectionPool for LoggingPool {
//!     fn connection(&self) -> CassiaResult<Box<dyn Connection + '_>> {
//!         Ok(Box::new(LoggingConnection))
//!     }
//! }
//!
//! # fn main() -> CassiaResult<()> {
//! let pool: Arc<dyn ConnectionPool> = Arc::new(LoggingPool);
//! let users = ColumnFamily::new(
//!     ColumnFamilySchema::new("Users")
//!         .key_type(DataType::Utf8)
//!         .comparator(DataType::Utf8)
//!         .default_validator(DataType::Utf8),
//!     pool.clone(),
//! );
//!
//! let mut mutator = Mutator::new(pool, Some(ConsistencyLevel::Quorum));
//! mutator
//!     .insert(&users, "k1", ColumnSet::dictionary([("c1", "v1")]), None, None)?
//!     .insert(&users, "k1", ColumnSet::dictionary([("c2", "v2")]), None, None)?;
//! mutator.send(None)?;
//! assert!(mutator.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `cassia-core`: errors, consistency levels, timestamps, values
//! - `cassia-codec`: `DataType` pack / unpack / compare and the type registry
//! - `cassia-batch`: column families, the mutation buffer, `Mutator`,
//!   `CfMutator`, and `cassia.toml` loading
//!
//! Transport is supplied by the caller through [`ConnectionPool`].

pub use cassia_batch::*;
pub use cassia_codec::{time_uuid_micros, DataType, PackContext, SliceEnd, MARSHAL_PACKAGE};
pub use cassia_core::*;

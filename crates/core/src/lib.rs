//! Core types for cassia
//!
//! This crate defines the foundational types shared by the codec and batch
//! layers:
//! - CassiaError: Error type hierarchy
//! - ConsistencyLevel: Replica acknowledgment requirement for writes
//! - Timestamp / Clock: Write timestamps and their sources
//! - Value: Native values before packing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod consistency;
pub mod error;
pub mod timestamp;
pub mod value;

pub use consistency::ConsistencyLevel;
pub use error::{BoxError, CassiaError, CassiaResult, StoreErrorKind};
pub use timestamp::{Clock, ManualClock, SystemClock, Timestamp};
pub use value::Value;

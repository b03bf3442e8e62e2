//! Binary codecs for column-family store data types
//!
//! This crate translates native [`Value`](cassia_core::Value)s into the
//! store's wire bytes and back:
//! - DataType: closed set of types with pack / unpack / compare
//! - PackContext / SliceEnd: role and range-boundary hints for `pack`
//! - Registry: resolves schema class names into `DataType`s
//!
//! Codec errors are local. Nothing here retries or touches shared state.
//!
//! ```
//! use cassia_codec::{DataType, PackContext};
//! use cassia_core::Value;
//!
//! let t = DataType::from_name("BooleanType").unwrap();
//! let bytes = t.pack(&Value::Bool(true), PackContext::value()).unwrap();
//! assert_eq!(bytes, vec![0x01]);
//! assert_eq!(t.unpack(&bytes, false).unwrap(), Value::Bool(true));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod composite;
pub mod context;
pub mod data_type;
pub mod registry;
mod scalar;
mod time_uuid;

pub use context::{PackContext, SliceEnd};
pub use data_type::DataType;
pub use registry::MARSHAL_PACKAGE;
pub use time_uuid::time_uuid_micros;

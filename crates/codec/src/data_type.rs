//! The closed set of store data types
//!
//! Each variant fixes the byte layout of its domain and the sort order the
//! store applies when the type is used as a comparator. Adding a type means
//! adding a variant here and an entry in the registry.
//!
//! ## Laws
//!
//! - `unpack(pack(v)) == v` for every value in the type's domain. `DateType`
//!   is lossy below one millisecond; TimeUUIDs packed from a `Date` unpack
//!   as the generated `Uuid`.
//! - Fixed-width types reject any other length with a decode error.
//! - Empty byte strings sort before every non-empty value.

use crate::context::PackContext;
use crate::{composite, scalar, time_uuid};
use cassia_core::{CassiaResult, Value};
use std::cmp::Ordering;
use std::fmt;

/// A store data type with pack, unpack and compare
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Raw bytes, ordered lexically
    Bytes,
    /// ASCII text
    Ascii,
    /// UTF-8 text
    Utf8,
    /// 8-byte signed integer
    Long,
    /// 4-byte signed integer
    Int32,
    /// Variable-length signed integer
    Integer,
    /// Single-byte boolean
    Boolean,
    /// 4-byte IEEE-754 float
    Float,
    /// 8-byte IEEE-754 float
    Double,
    /// Milliseconds since epoch
    Date,
    /// Version 1 UUID ordered by time
    TimeUuid,
    /// UUID ordered by its signed halves
    LexicalUuid,
    /// UUID of any version
    Uuid,
    /// Counter column value
    CounterColumn,
    /// Tuple of component types
    Composite(Vec<DataType>),
    /// Another type with inverted ordering
    Reversed(Box<DataType>),
}

impl DataType {
    /// Class name used by the store's schema
    pub fn class_name(&self) -> String {
        match self {
            DataType::Composite(types) => format!(
                "CompositeType({})",
                types
                    .iter()
                    .map(DataType::class_name)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            DataType::Reversed(inner) => format!("ReversedType({})", inner.class_name()),
            simple => simple.simple_name().to_string(),
        }
    }

    pub(crate) fn simple_name(&self) -> &'static str {
        match self {
            DataType::Bytes => "BytesType",
            DataType::Ascii => "AsciiType",
            DataType::Utf8 => "UTF8Type",
            DataType::Long => "LongType",
            DataType::Int32 => "Int32Type",
            DataType::Integer => "IntegerType",
            DataType::Boolean => "BooleanType",
            DataType::Float => "FloatType",
            DataType::Double => "DoubleType",
            DataType::Date => "DateType",
            DataType::TimeUuid => "TimeUUIDType",
            DataType::LexicalUuid => "LexicalUUIDType",
            DataType::Uuid => "UUIDType",
            DataType::CounterColumn => "CounterColumnType",
            DataType::Composite(_) => "CompositeType",
            DataType::Reversed(_) => "ReversedType",
        }
    }

    /// Whether values of this type are counters
    pub fn is_counter(&self) -> bool {
        matches!(self, DataType::CounterColumn)
    }

    /// Serialize a value into its canonical bytes
    ///
    /// `ctx` only matters for composite names and TimeUUIDs; every other
    /// type ignores it.
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Encode` if the value has the wrong shape for
    /// this type.
    pub fn pack(&self, value: &Value, ctx: PackContext) -> CassiaResult<Vec<u8>> {
        let name = self.simple_name();
        match self {
            DataType::Bytes => scalar::pack_bytes(name, value),
            DataType::Ascii => scalar::pack_ascii(name, value),
            DataType::Utf8 => scalar::pack_utf8(name, value),
            DataType::Long | DataType::CounterColumn => scalar::pack_i64(name, value),
            DataType::Int32 => scalar::pack_i32(name, value),
            DataType::Integer => scalar::pack_varint(name, value),
            DataType::Boolean => scalar::pack_bool(name, value),
            DataType::Float => scalar::pack_f32(name, value),
            DataType::Double => scalar::pack_f64(name, value),
            DataType::Date => scalar::pack_date(name, value),
            DataType::TimeUuid => time_uuid::pack_time_uuid(name, value, ctx),
            DataType::LexicalUuid | DataType::Uuid => time_uuid::pack_uuid(name, value),
            DataType::Composite(types) => composite::pack(name, types, value, ctx),
            DataType::Reversed(inner) => inner.pack(value, ctx),
        }
    }

    /// Deserialize bytes produced by [`DataType::pack`]
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Decode` if the length or content is not a legal
    /// encoding for this type.
    pub fn unpack(&self, bytes: &[u8], is_name: bool) -> CassiaResult<Value> {
        let name = self.simple_name();
        match self {
            DataType::Bytes => Ok(Value::Bytes(bytes.to_vec())),
            DataType::Ascii => scalar::unpack_ascii(name, bytes),
            DataType::Utf8 => scalar::unpack_utf8(name, bytes),
            DataType::Long | DataType::CounterColumn => scalar::read_i64(name, bytes).map(Value::Int),
            DataType::Int32 => scalar::read_i32(name, bytes).map(|i| Value::Int(i64::from(i))),
            DataType::Integer => scalar::unpack_varint(name, bytes),
            DataType::Boolean => scalar::unpack_bool(name, bytes),
            DataType::Float => scalar::read_f32(name, bytes).map(Value::Float),
            DataType::Double => scalar::read_f64(name, bytes).map(Value::Double),
            DataType::Date => scalar::unpack_date(name, bytes),
            DataType::TimeUuid => time_uuid::unpack_time_uuid(name, bytes),
            DataType::LexicalUuid | DataType::Uuid => time_uuid::unpack_uuid(name, bytes),
            DataType::Composite(types) => composite::unpack(name, types, bytes),
            DataType::Reversed(inner) => inner.unpack(bytes, is_name),
        }
    }

    /// Order two packed values the way the store sorts them
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Decode` if either side is not a legal encoding
    /// for types whose order depends on the decoded value.
    pub fn compare(&self, a: &[u8], b: &[u8]) -> CassiaResult<Ordering> {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => {}
        }
        let name = self.simple_name();
        match self {
            DataType::Bytes | DataType::Ascii | DataType::Utf8 | DataType::Boolean => Ok(a.cmp(b)),
            DataType::Long | DataType::Date | DataType::CounterColumn => {
                Ok(scalar::read_i64(name, a)?.cmp(&scalar::read_i64(name, b)?))
            }
            DataType::Int32 => Ok(scalar::read_i32(name, a)?.cmp(&scalar::read_i32(name, b)?)),
            DataType::Integer => Ok(scalar::compare_varint(a, b)),
            DataType::Float => Ok(scalar::read_f32(name, a)?.total_cmp(&scalar::read_f32(name, b)?)),
            DataType::Double => {
                Ok(scalar::read_f64(name, a)?.total_cmp(&scalar::read_f64(name, b)?))
            }
            DataType::TimeUuid => time_uuid::compare_time_uuid(name, a, b),
            DataType::LexicalUuid => time_uuid::compare_lexical_uuid(name, a, b),
            DataType::Uuid => time_uuid::compare_any_uuid(name, a, b),
            DataType::Composite(types) => composite::compare(name, types, a, b),
            DataType::Reversed(inner) => inner.compare(a, b).map(Ordering::reverse),
        }
    }

    /// Check that a value would pack as stored data
    ///
    /// # Errors
    ///
    /// Returns the same `CassiaError::Encode` that `pack` would.
    pub fn accepts(&self, value: &Value, is_name: bool) -> CassiaResult<()> {
        let ctx = if is_name {
            PackContext::name()
        } else {
            PackContext::value()
        };
        self.pack(value, ctx).map(|_| ())
    }

    /// Replace generated parts of a stored value with concrete ones
    ///
    /// A `Date` given to a TimeUUID becomes the version 1 `Uuid` that `pack`
    /// would generate for it, so packing the result always yields the same
    /// bytes. Composite components resolve with their own types. Values that
    /// would not pack come back unchanged.
    pub fn resolve(&self, value: &Value) -> Value {
        match (self, value) {
            (DataType::TimeUuid, Value::Date(_)) => self
                .pack(value, PackContext::name())
                .and_then(|bytes| time_uuid::unpack_time_uuid(self.simple_name(), &bytes))
                .unwrap_or_else(|_| value.clone()),
            (DataType::Reversed(inner), _) => inner.resolve(value),
            (DataType::Composite(types), Value::Composite(components)) => Value::Composite(
                components
                    .iter()
                    .enumerate()
                    .map(|(i, c)| types.get(i).map_or_else(|| c.clone(), |t| t.resolve(c)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

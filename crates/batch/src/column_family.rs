//! Column family descriptors
//!
//! A [`ColumnFamily`] pairs the schema the codec needs (key, comparator and
//! validator types, insert format, default write level) with the pool its
//! connections come from. The schema is shared behind an `Arc` so buffered
//! operations can keep it alive until they are sent.

use crate::transport::ConnectionPool;
use cassia_codec::DataType;
use cassia_core::{ConsistencyLevel, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shape callers use to hand columns to `insert`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertFormat {
    /// Unique scalar names mapped to values
    #[default]
    Dictionary,
    /// Ordered (name, value) pairs; names may be composite tuples
    Array,
}

impl fmt::Display for InsertFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertFormat::Dictionary => f.write_str("dictionary"),
            InsertFormat::Array => f.write_str("array"),
        }
    }
}

/// Whether rows hold columns or super columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnType {
    /// Rows hold columns
    #[default]
    Standard,
    /// Rows hold super columns, each holding subcolumns
    Super,
}

/// Types and defaults of one column family
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFamilySchema {
    /// Column family name
    pub name: String,
    /// Standard or super
    pub column_type: ColumnType,
    /// Row key type
    pub key_type: DataType,
    /// Column (or super column) name type
    pub comparator: DataType,
    /// Subcolumn name type for super column families
    pub subcomparator: DataType,
    /// Value type for columns without a specific validator
    pub default_validator: DataType,
    /// Value types for named columns
    pub column_validators: HashMap<String, DataType>,
    /// Expected shape of `insert` input
    pub insert_format: InsertFormat,
    /// Write level used when nothing more specific is given
    pub write_consistency_level: ConsistencyLevel,
}

impl ColumnFamilySchema {
    /// Schema with every type set to `BytesType`
    pub fn new(name: impl Into<String>) -> Self {
        ColumnFamilySchema {
            name: name.into(),
            column_type: ColumnType::Standard,
            key_type: DataType::Bytes,
            comparator: DataType::Bytes,
            subcomparator: DataType::Bytes,
            default_validator: DataType::Bytes,
            column_validators: HashMap::new(),
            insert_format: InsertFormat::Dictionary,
            write_consistency_level: ConsistencyLevel::default(),
        }
    }

    /// Set the row key type
    pub fn key_type(mut self, t: DataType) -> Self {
        self.key_type = t;
        self
    }

    /// Set the column name type
    pub fn comparator(mut self, t: DataType) -> Self {
        self.comparator = t;
        self
    }

    /// Make this a super column family with the given subcolumn name type
    pub fn super_columns(mut self, subcomparator: DataType) -> Self {
        self.column_type = ColumnType::Super;
        self.subcomparator = subcomparator;
        self
    }

    /// Set the default value type
    pub fn default_validator(mut self, t: DataType) -> Self {
        self.default_validator = t;
        self
    }

    /// Set the value type of one named column
    pub fn column_validator(mut self, column: impl Into<String>, t: DataType) -> Self {
        self.column_validators.insert(column.into(), t);
        self
    }

    /// Set the insert format
    pub fn insert_format(mut self, format: InsertFormat) -> Self {
        self.insert_format = format;
        self
    }

    /// Set the default write consistency level
    pub fn write_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.write_consistency_level = level;
        self
    }

    /// Whether rows hold super columns
    pub fn is_super(&self) -> bool {
        self.column_type == ColumnType::Super
    }

    /// Whether values are counters
    pub fn is_counter(&self) -> bool {
        self.default_validator.is_counter()
    }

    /// Type of a column name; subcolumns use the subcomparator
    pub fn name_type(&self, subcolumn: bool) -> &DataType {
        if subcolumn {
            &self.subcomparator
        } else {
            &self.comparator
        }
    }

    /// Type of the value stored under `column_name`
    ///
    /// Validators are keyed by the name's raw bytes, so `Text` and `Bytes`
    /// names match. Other names use the default validator.
    pub fn value_type(&self, column_name: &Value) -> &DataType {
        let raw = match column_name {
            Value::Text(s) => s.as_bytes(),
            Value::Bytes(b) => b.as_slice(),
            _ => return &self.default_validator,
        };
        std::str::from_utf8(raw)
            .ok()
            .and_then(|name| self.column_validators.get(name))
            .unwrap_or(&self.default_validator)
    }
}

/// A column family bound to the pool that serves it
#[derive(Clone)]
pub struct ColumnFamily {
    schema: Arc<ColumnFamilySchema>,
    pool: Arc<dyn ConnectionPool>,
}

impl ColumnFamily {
    /// Bind a schema to a pool
    pub fn new(schema: ColumnFamilySchema, pool: Arc<dyn ConnectionPool>) -> Self {
        ColumnFamily {
            schema: Arc::new(schema),
            pool,
        }
    }

    /// Column family name
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Shared schema
    pub fn schema(&self) -> &Arc<ColumnFamilySchema> {
        &self.schema
    }

    /// Pool connections come from
    pub fn pool(&self) -> &Arc<dyn ConnectionPool> {
        &self.pool
    }

    /// Declared default write level
    pub fn write_consistency_level(&self) -> ConsistencyLevel {
        self.schema.write_consistency_level
    }

    /// Declared insert format
    pub fn insert_format(&self) -> InsertFormat {
        self.schema.insert_format
    }
}

impl fmt::Debug for ColumnFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnFamily")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

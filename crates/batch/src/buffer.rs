//! Pending operations and their conversion to wire records
//!
//! The buffer is a flat list in call order. Grouping by row key and column
//! family happens only when the mutation map is built, which keeps per
//! (key, column family) order identical to call order without any merging:
//! a deletion followed by an insertion of the same column stays two records.

use crate::column_family::ColumnFamilySchema;
use crate::columns::ColumnEntry;
use crate::wire::{
    Column, ColumnOrSuperColumn, CounterColumn, Deletion, Mutation, MutationMap, SlicePredicate,
};
use cassia_codec::{DataType, PackContext};
use cassia_core::{CassiaError, CassiaResult, Timestamp, Value};
use std::sync::Arc;

/// Whether any operations are waiting to be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferState {
    /// Nothing buffered
    Empty,
    /// At least one operation buffered
    Pending,
}

/// A buffered write
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Write one column, or one super column with its subcolumns
    Insertion {
        /// Column or super column to write
        column: ColumnEntry,
        /// Write timestamp
        timestamp: Timestamp,
        /// Seconds until expiry
        ttl: Option<u32>,
    },
    /// Delete a row, a super column, or named columns
    Deletion {
        /// Columns to delete; `None` deletes the row or whole super column
        columns: Option<Vec<Value>>,
        /// Super column scoping the deletion
        super_column: Option<Value>,
        /// Deletion timestamp
        timestamp: Timestamp,
    },
}

impl Operation {
    /// Timestamp the operation was buffered with
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Operation::Insertion { timestamp, .. } | Operation::Deletion { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// An operation together with the row and column family it targets
#[derive(Debug, Clone)]
pub struct BufferedOperation {
    /// Row key, unpacked
    pub key: Value,
    /// Operation to apply
    pub operation: Operation,
    schema: Arc<ColumnFamilySchema>,
}

impl BufferedOperation {
    /// Name of the target column family
    pub fn column_family(&self) -> &str {
        &self.schema.name
    }

    /// Pack into the row key and wire record
    fn to_wire(&self) -> CassiaResult<(Vec<u8>, Mutation)> {
        let schema = &*self.schema;
        let key = schema.key_type.pack(&self.key, PackContext::value())?;
        let mutation = match &self.operation {
            Operation::Insertion {
                column,
                timestamp,
                ttl,
            } => Mutation::Insert(pack_insertion(schema, column, *timestamp, *ttl)?),
            Operation::Deletion {
                columns,
                super_column,
                timestamp,
            } => Mutation::Delete(pack_deletion(
                schema,
                columns.as_deref(),
                super_column.as_ref(),
                *timestamp,
            )?),
        };
        Ok((key, mutation))
    }
}

fn pack_name(t: &DataType, name: &Value) -> CassiaResult<Vec<u8>> {
    t.pack(name, PackContext::name())
}

fn pack_counter(schema: &ColumnFamilySchema, t: &DataType, name: &Value, value: &Value) -> CassiaResult<CounterColumn> {
    let amount = value.as_int().ok_or_else(|| {
        CassiaError::validation(format!(
            "counter column {:?} in '{}' needs an Int, got {}",
            name,
            schema.name,
            value.type_name()
        ))
    })?;
    Ok(CounterColumn {
        name: pack_name(t, name)?,
        value: amount,
    })
}

fn pack_column(
    schema: &ColumnFamilySchema,
    t: &DataType,
    name: &Value,
    value: &Value,
    timestamp: Timestamp,
    ttl: Option<u32>,
) -> CassiaResult<Column> {
    Ok(Column {
        name: pack_name(t, name)?,
        value: schema.value_type(name).pack(value, PackContext::value())?,
        timestamp: timestamp.as_micros(),
        ttl,
    })
}

fn pack_insertion(
    schema: &ColumnFamilySchema,
    column: &ColumnEntry,
    timestamp: Timestamp,
    ttl: Option<u32>,
) -> CassiaResult<ColumnOrSuperColumn> {
    let counter = schema.is_counter();
    let record = match column {
        ColumnEntry::Column { name, value } if counter => {
            ColumnOrSuperColumn::CounterColumn(pack_counter(schema, &schema.comparator, name, value)?)
        }
        ColumnEntry::Column { name, value } => ColumnOrSuperColumn::Column(pack_column(
            schema,
            &schema.comparator,
            name,
            value,
            timestamp,
            ttl,
        )?),
        ColumnEntry::SuperColumn { name, columns } if counter => {
            ColumnOrSuperColumn::CounterSuperColumn {
                name: pack_name(&schema.comparator, name)?,
                columns: columns
                    .iter()
                    .map(|(n, v)| pack_counter(schema, &schema.subcomparator, n, v))
                    .collect::<CassiaResult<_>>()?,
            }
        }
        ColumnEntry::SuperColumn { name, columns } => ColumnOrSuperColumn::SuperColumn {
            name: pack_name(&schema.comparator, name)?,
            columns: columns
                .iter()
                .map(|(n, v)| pack_column(schema, &schema.subcomparator, n, v, timestamp, ttl))
                .collect::<CassiaResult<_>>()?,
        },
    };
    Ok(record)
}

fn pack_deletion(
    schema: &ColumnFamilySchema,
    columns: Option<&[Value]>,
    super_column: Option<&Value>,
    timestamp: Timestamp,
) -> CassiaResult<Deletion> {
    let name_type = schema.name_type(super_column.is_some());
    let predicate = columns
        .map(|names| {
            names
                .iter()
                .map(|n| pack_name(name_type, n))
                .collect::<CassiaResult<Vec<_>>>()
                .map(|column_names| SlicePredicate { column_names })
        })
        .transpose()?;
    Ok(Deletion {
        timestamp: Some(timestamp.as_micros()),
        super_column: super_column
            .map(|sc| pack_name(&schema.comparator, sc))
            .transpose()?,
        predicate,
    })
}

/// Operations waiting for `send`
#[derive(Debug, Clone, Default)]
pub struct MutationBuffer {
    operations: Vec<BufferedOperation>,
}

impl MutationBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one operation
    pub fn push(&mut self, schema: Arc<ColumnFamilySchema>, key: Value, operation: Operation) {
        self.operations.push(BufferedOperation {
            key,
            operation,
            schema,
        });
    }

    /// Number of buffered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Current state
    pub fn state(&self) -> BufferState {
        if self.operations.is_empty() {
            BufferState::Empty
        } else {
            BufferState::Pending
        }
    }

    /// Drop every buffered operation
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Buffered operations in call order
    pub fn operations(&self) -> &[BufferedOperation] {
        &self.operations
    }

    /// Pack every operation into a mutation map
    ///
    /// The buffer is not modified, so a failed build or send can be retried.
    ///
    /// # Errors
    ///
    /// Returns the first codec error hit while packing.
    pub fn to_mutation_map(&self) -> CassiaResult<MutationMap> {
        let mut map = MutationMap::new();
        for op in &self.operations {
            let (key, mutation) = op.to_wire()?;
            map.entry(key)
                .or_default()
                .entry(op.column_family().to_string())
                .or_default()
                .push(mutation);
        }
        Ok(map)
    }
}

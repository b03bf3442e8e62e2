//! Wire-level mutation records
//!
//! These mirror the store's RPC structures for `batch_mutate`. Every name,
//! value and key has already been packed by the codec.
//!
//! ```text
//! MutationMap:
//!   row key (bytes)
//!     └── column family name
//!           └── [Mutation, Mutation, ...]   (call order)
//!
//! Mutation = Insert(ColumnOrSuperColumn) | Delete(Deletion)
//! ```

use std::collections::BTreeMap;

/// Row key → column family → mutations, in buffer order per family
pub type MutationMap = BTreeMap<Vec<u8>, BTreeMap<String, Vec<Mutation>>>;

/// A regular column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Packed column name
    pub name: Vec<u8>,
    /// Packed column value
    pub value: Vec<u8>,
    /// Write timestamp, microseconds since epoch
    pub timestamp: i64,
    /// Seconds until the column expires
    pub ttl: Option<u32>,
}

/// A counter column; counters carry no timestamp or TTL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterColumn {
    /// Packed column name
    pub name: Vec<u8>,
    /// Amount to add
    pub value: i64,
}

/// The payload of an insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrSuperColumn {
    /// A single column
    Column(Column),
    /// A super column and the subcolumns written under it
    SuperColumn {
        /// Packed super column name
        name: Vec<u8>,
        /// Subcolumns
        columns: Vec<Column>,
    },
    /// A single counter column
    CounterColumn(CounterColumn),
    /// A counter super column and its counter subcolumns
    CounterSuperColumn {
        /// Packed super column name
        name: Vec<u8>,
        /// Counter subcolumns
        columns: Vec<CounterColumn>,
    },
}

/// Explicit list of column names a deletion targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlicePredicate {
    /// Packed column names
    pub column_names: Vec<Vec<u8>>,
}

/// A deletion of a row, a super column, or named columns
///
/// Without a predicate the whole row (or whole super column, when
/// `super_column` is set) is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deletion {
    /// Deletion timestamp, microseconds since epoch
    pub timestamp: Option<i64>,
    /// Packed super column name scoping the deletion
    pub super_column: Option<Vec<u8>>,
    /// Columns to delete
    pub predicate: Option<SlicePredicate>,
}

/// A single mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Write columns
    Insert(ColumnOrSuperColumn),
    /// Delete columns
    Delete(Deletion),
}

impl Mutation {
    /// Whether this record is an insertion
    pub fn is_insert(&self) -> bool {
        matches!(self, Mutation::Insert(_))
    }

    /// Timestamp carried by the record, if any
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Mutation::Insert(ColumnOrSuperColumn::Column(c)) => Some(c.timestamp),
            Mutation::Insert(ColumnOrSuperColumn::SuperColumn { columns, .. }) => {
                columns.first().map(|c| c.timestamp)
            }
            Mutation::Insert(_) => None,
            Mutation::Delete(d) => d.timestamp,
        }
    }
}

/// Total number of mutation records in a map
pub fn mutation_count(map: &MutationMap) -> usize {
    map.values()
        .flat_map(|families| families.values())
        .map(Vec::len)
        .sum()
}

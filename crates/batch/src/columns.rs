//! Column input for `insert`
//!
//! A [`ColumnSet`] records which insert format the caller used so it can be
//! checked against the column family before anything is buffered.

use crate::column_family::{ColumnFamilySchema, InsertFormat};
use cassia_core::{CassiaError, CassiaResult, Value};

/// One entry of a column set
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEntry {
    /// A column in a standard column family
    Column {
        /// Column name
        name: Value,
        /// Column value
        value: Value,
    },
    /// A super column and its subcolumns
    SuperColumn {
        /// Super column name
        name: Value,
        /// Subcolumn (name, value) pairs
        columns: Vec<(Value, Value)>,
    },
}

impl ColumnEntry {
    /// Name of the column or super column
    pub fn name(&self) -> &Value {
        match self {
            ColumnEntry::Column { name, .. } | ColumnEntry::SuperColumn { name, .. } => name,
        }
    }
}

/// Columns handed to a single `insert` call
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSet {
    format: InsertFormat,
    entries: Vec<ColumnEntry>,
}

fn pairs<I, N, V>(columns: I) -> Vec<(Value, Value)>
where
    I: IntoIterator<Item = (N, V)>,
    N: Into<Value>,
    V: Into<Value>,
{
    columns
        .into_iter()
        .map(|(n, v)| (n.into(), v.into()))
        .collect()
}

impl ColumnSet {
    /// Unique scalar names mapped to values
    pub fn dictionary<I, N, V>(columns: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<Value>,
        V: Into<Value>,
    {
        Self::standard(InsertFormat::Dictionary, columns)
    }

    /// Ordered (name, value) pairs; names may be composite
    pub fn array<I, N, V>(columns: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<Value>,
        V: Into<Value>,
    {
        Self::standard(InsertFormat::Array, columns)
    }

    fn standard<I, N, V>(format: InsertFormat, columns: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<Value>,
        V: Into<Value>,
    {
        let entries = pairs(columns)
            .into_iter()
            .map(|(name, value)| ColumnEntry::Column { name, value })
            .collect();
        ColumnSet { format, entries }
    }

    /// Super columns, each with its subcolumns
    pub fn super_columns<I, S, C, N, V>(format: InsertFormat, supers: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<Value>,
        C: IntoIterator<Item = (N, V)>,
        N: Into<Value>,
        V: Into<Value>,
    {
        let entries = supers
            .into_iter()
            .map(|(name, columns)| ColumnEntry::SuperColumn {
                name: name.into(),
                columns: pairs(columns),
            })
            .collect();
        ColumnSet { format, entries }
    }

    /// Format the set was built with
    pub fn format(&self) -> InsertFormat {
        self.format
    }

    /// Entries in input order
    pub fn entries(&self) -> &[ColumnEntry] {
        &self.entries
    }

    /// Consume into entries
    pub fn into_entries(self) -> Vec<ColumnEntry> {
        self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fix generated names and values, such as TimeUUIDs given as dates
    ///
    /// Value types are looked up by the name as given.
    pub(crate) fn resolve(self, schema: &ColumnFamilySchema) -> ColumnSet {
        let subcolumn = |(name, value): (Value, Value)| {
            let value = schema.value_type(&name).resolve(&value);
            (schema.name_type(true).resolve(&name), value)
        };
        let entries = self
            .entries
            .into_iter()
            .map(|entry| match entry {
                ColumnEntry::Column { name, value } => ColumnEntry::Column {
                    value: schema.value_type(&name).resolve(&value),
                    name: schema.name_type(false).resolve(&name),
                },
                ColumnEntry::SuperColumn { name, columns } => ColumnEntry::SuperColumn {
                    name: schema.name_type(false).resolve(&name),
                    columns: columns.into_iter().map(&subcolumn).collect(),
                },
            })
            .collect();
        ColumnSet {
            format: self.format,
            entries,
        }
    }

    /// Check the set against a column family's declared shape
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Validation` describing the first mismatch.
    pub fn validate(&self, schema: &ColumnFamilySchema, ttl: Option<u32>) -> CassiaResult<()> {
        if self.entries.is_empty() {
            return Err(CassiaError::validation(format!(
                "no columns to insert into '{}'",
                schema.name
            )));
        }
        if self.format != schema.insert_format {
            return Err(CassiaError::validation(format!(
                "column family '{}' expects {} format, got {}",
                schema.name, schema.insert_format, self.format
            )));
        }
        if schema.is_counter() && ttl.is_some() {
            return Err(CassiaError::validation(format!(
                "TTL is not supported for counter column family '{}'",
                schema.name
            )));
        }

        let dictionary = self.format == InsertFormat::Dictionary;
        let names: Vec<&Value> = self.entries.iter().map(ColumnEntry::name).collect();
        if dictionary {
            check_dictionary_names(schema, &names)?;
        }

        for entry in &self.entries {
            match (entry, schema.is_super()) {
                (ColumnEntry::Column { name, value }, false) => {
                    check_column(schema, name, value, false)?;
                }
                (ColumnEntry::SuperColumn { name, columns }, true) => {
                    check_name(schema, name, false)?;
                    if columns.is_empty() {
                        return Err(CassiaError::validation(format!(
                            "super column {:?} in '{}' has no subcolumns",
                            name, schema.name
                        )));
                    }
                    if dictionary {
                        let subnames: Vec<&Value> = columns.iter().map(|(n, _)| n).collect();
                        check_dictionary_names(schema, &subnames)?;
                    }
                    for (subname, value) in columns {
                        check_column(schema, subname, value, true)?;
                    }
                }
                (ColumnEntry::Column { .. }, true) => {
                    return Err(CassiaError::validation(format!(
                        "'{}' is a super column family; insert super columns",
                        schema.name
                    )));
                }
                (ColumnEntry::SuperColumn { .. }, false) => {
                    return Err(CassiaError::validation(format!(
                        "'{}' is a standard column family; super columns are not allowed",
                        schema.name
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_dictionary_names(schema: &ColumnFamilySchema, names: &[&Value]) -> CassiaResult<()> {
    for (i, name) in names.iter().enumerate() {
        if name.is_composite() {
            return Err(CassiaError::validation(format!(
                "dictionary format cannot hold composite name {:?} for '{}'; use array format",
                name, schema.name
            )));
        }
        if names[..i].contains(name) {
            return Err(CassiaError::validation(format!(
                "duplicate column name {:?} for '{}'",
                name, schema.name
            )));
        }
    }
    Ok(())
}

/// Name must pack with the comparator, or the subcomparator for subcolumns
pub(crate) fn check_name(
    schema: &ColumnFamilySchema,
    name: &Value,
    subcolumn: bool,
) -> CassiaResult<()> {
    schema
        .name_type(subcolumn)
        .accepts(name, true)
        .map_err(|e| {
            CassiaError::validation(format!(
                "column name {:?} rejected for '{}': {}",
                name, schema.name, e
            ))
        })
}

fn check_column(
    schema: &ColumnFamilySchema,
    name: &Value,
    value: &Value,
    subcolumn: bool,
) -> CassiaResult<()> {
    check_name(schema, name, subcolumn)?;
    if schema.is_counter() {
        if value.as_int().is_none() {
            return Err(CassiaError::validation(format!(
                "counter column {:?} in '{}' needs an Int, got {}",
                name,
                schema.name,
                value.type_name()
            )));
        }
        return Ok(());
    }
    schema
        .value_type(name)
        .accepts(value, false)
        .map_err(|e| {
            CassiaError::validation(format!(
                "value for column {:?} rejected for '{}': {}",
                name, schema.name, e
            ))
        })
}

//! Type-name lookup
//!
//! Resolves the class names a store schema reports into [`DataType`]s.
//! Accepted forms:
//!
//! - short names: `UTF8Type`
//! - qualified names: `org.apache.cassandra.db.marshal.UTF8Type`
//! - parameterised names: `CompositeType(UTF8Type,LongType)`,
//!   `ReversedType(TimeUUIDType)`, nested arbitrarily
//!
//! The table of simple names is built once, on first use.

use crate::data_type::DataType;
use cassia_core::{CassiaError, CassiaResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

/// Package prefix the store puts in front of class names
pub const MARSHAL_PACKAGE: &str = "org.apache.cassandra.db.marshal.";

static SIMPLE_TYPES: Lazy<HashMap<&'static str, DataType>> = Lazy::new(|| {
    let mut types = HashMap::new();
    for t in [
        DataType::Bytes,
        DataType::Ascii,
        DataType::Utf8,
        DataType::Long,
        DataType::Int32,
        DataType::Integer,
        DataType::Boolean,
        DataType::Float,
        DataType::Double,
        DataType::Date,
        DataType::TimeUuid,
        DataType::LexicalUuid,
        DataType::Uuid,
        DataType::CounterColumn,
    ] {
        types.insert(t.simple_name(), t);
    }
    types.insert("TimestampType", DataType::Date);
    types
});

impl DataType {
    /// Resolve a class name into a data type
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::UnknownType` for names not in the registry or
    /// with malformed parameters.
    pub fn from_name(name: &str) -> CassiaResult<DataType> {
        let name = name.trim();
        let name = name.strip_prefix(MARSHAL_PACKAGE).unwrap_or(name);

        let Some(open) = name.find('(') else {
            return SIMPLE_TYPES
                .get(name)
                .cloned()
                .ok_or_else(|| CassiaError::unknown_type(name));
        };
        let args = name[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| CassiaError::unknown_type(name))?;
        let params = split_params(args)
            .ok_or_else(|| CassiaError::unknown_type(name))?
            .into_iter()
            .map(DataType::from_name)
            .collect::<CassiaResult<Vec<_>>>()?;

        match (&name[..open], params.len()) {
            ("CompositeType", n) if n > 0 => Ok(DataType::Composite(params)),
            ("ReversedType", 1) => {
                let inner = params.into_iter().next().ok_or_else(|| CassiaError::unknown_type(name))?;
                Ok(DataType::Reversed(Box::new(inner)))
            }
            _ => Err(CassiaError::unknown_type(name)),
        }
    }

    /// Names of every non-parameterised type in the registry
    pub fn simple_type_names() -> Vec<&'static str> {
        let mut names: Vec<_> = SIMPLE_TYPES.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl FromStr for DataType {
    type Err = CassiaError;

    fn from_str(s: &str) -> CassiaResult<Self> {
        DataType::from_name(s)
    }
}

/// Split on top-level commas; `None` on unbalanced parentheses or empty items
fn split_params(args: &str) -> Option<Vec<&str>> {
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in args.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                params.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    params.push(args[start..].trim());
    if params.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(params)
}

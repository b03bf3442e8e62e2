//! Client configuration via `cassia.toml`
//!
//! Declares the default write level and the schema of each column family the
//! client writes to. Type names are the store's marshal class names and are
//! resolved through the codec registry when the file is loaded.

use crate::column_family::{ColumnFamily, ColumnFamilySchema, ColumnType, InsertFormat};
use crate::mutator::Mutator;
use crate::transport::ConnectionPool;
use cassia_codec::DataType;
use cassia_core::{CassiaError, CassiaResult, ConsistencyLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "cassia.toml";

fn default_level_str() -> String {
    ConsistencyLevel::One.as_str().to_string()
}

fn default_type_str() -> String {
    DataType::Bytes.class_name()
}

/// One `[[column_family]]` table
///
/// ```toml
/// [[column_family]]
/// name = "Users"
/// key_validation_class = "UTF8Type"
/// comparator_type = "UTF8Type"
/// default_validation_class = "UTF8Type"
///
/// [column_family.column_validators]
/// age = "LongType"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnFamilyDef {
    /// Column family name
    pub name: String,
    /// `"Standard"` or `"Super"`
    #[serde(default)]
    pub column_type: ColumnType,
    /// Row key type
    #[serde(default = "default_type_str")]
    pub key_validation_class: String,
    /// Column name type
    #[serde(default = "default_type_str")]
    pub comparator_type: String,
    /// Subcolumn name type, super column families only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcomparator_type: Option<String>,
    /// Default value type
    #[serde(default = "default_type_str")]
    pub default_validation_class: String,
    /// `"dictionary"` or `"array"`
    #[serde(default)]
    pub insert_format: InsertFormat,
    /// Overrides the client-wide write level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_consistency_level: Option<String>,
    /// Value types of specific columns
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_validators: BTreeMap<String, String>,
}

impl ColumnFamilyDef {
    /// Definition with every type set to `BytesType`
    pub fn new(name: impl Into<String>) -> Self {
        ColumnFamilyDef {
            name: name.into(),
            column_type: ColumnType::Standard,
            key_validation_class: default_type_str(),
            comparator_type: default_type_str(),
            subcomparator_type: None,
            default_validation_class: default_type_str(),
            insert_format: InsertFormat::Dictionary,
            write_consistency_level: None,
            column_validators: BTreeMap::new(),
        }
    }

    /// Resolve type names into a schema
    ///
    /// `fallback_level` applies when the definition names no level.
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::UnknownType` for an unknown type name and
    /// `CassiaError::Config` for an invalid level or a subcomparator on a
    /// standard column family.
    pub fn schema(&self, fallback_level: ConsistencyLevel) -> CassiaResult<ColumnFamilySchema> {
        let mut schema = ColumnFamilySchema::new(&self.name)
            .key_type(DataType::from_name(&self.key_validation_class)?)
            .comparator(DataType::from_name(&self.comparator_type)?)
            .default_validator(DataType::from_name(&self.default_validation_class)?)
            .insert_format(self.insert_format);

        match (self.column_type, &self.subcomparator_type) {
            (ColumnType::Super, sub) => {
                let sub = match sub {
                    Some(name) => DataType::from_name(name)?,
                    None => DataType::Bytes,
                };
                schema = schema.super_columns(sub);
            }
            (ColumnType::Standard, Some(_)) => {
                return Err(CassiaError::config(format!(
                    "column family '{}' sets subcomparator_type but is not a Super column family",
                    self.name
                )));
            }
            (ColumnType::Standard, None) => {}
        }

        for (column, type_name) in &self.column_validators {
            schema = schema.column_validator(column.clone(), DataType::from_name(type_name)?);
        }

        let level = match &self.write_consistency_level {
            Some(s) => s.parse()?,
            None => fallback_level,
        };
        Ok(schema.write_consistency_level(level))
    }
}

/// Client configuration loaded from `cassia.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Default write level, e.g. `"ONE"` or `"LOCAL_QUORUM"`
    #[serde(default = "default_level_str")]
    pub write_consistency_level: String,
    /// Declared column families
    #[serde(default, rename = "column_family")]
    pub column_families: Vec<ColumnFamilyDef>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            write_consistency_level: default_level_str(),
            column_families: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Parse the client-wide write level
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Config` if the name is not a known level.
    pub fn consistency_level(&self) -> CassiaResult<ConsistencyLevel> {
        self.write_consistency_level.parse()
    }

    /// Check every level and type name, and that family names are unique
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> CassiaResult<()> {
        let level = self.consistency_level()?;
        for (i, def) in self.column_families.iter().enumerate() {
            if self.column_families[..i].iter().any(|d| d.name == def.name) {
                return Err(CassiaError::config(format!(
                    "column family '{}' is declared more than once",
                    def.name
                )));
            }
            def.schema(level)?;
        }
        Ok(())
    }

    /// Returns the default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# Cassia client configuration
#
# Default write consistency level for mutators:
#   ANY, ONE, TWO, THREE, QUORUM, LOCAL_QUORUM, EACH_QUORUM, LOCAL_ONE, ALL
write_consistency_level = "ONE"

# Column families. Types are marshal class names such as UTF8Type,
# LongType, TimeUUIDType, CompositeType(UTF8Type,LongType).
#
# [[column_family]]
# name = "Users"
# column_type = "Standard"            # or "Super"
# key_validation_class = "UTF8Type"
# comparator_type = "UTF8Type"
# # subcomparator_type = "UTF8Type"   # Super only
# default_validation_class = "UTF8Type"
# insert_format = "dictionary"        # or "array"
# # write_consistency_level = "QUORUM"
#
# [column_family.column_validators]
# age = "LongType"
"#
    }

    /// Parse and validate config text
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Config` if the text is not valid TOML or names
    /// an invalid level, and `CassiaError::UnknownType` for an unknown type.
    pub fn from_toml_str(content: &str) -> CassiaResult<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| CassiaError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> CassiaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CassiaError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CassiaError::Config { message } => {
                CassiaError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> CassiaResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                CassiaError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path
    pub fn write_to_file(&self, path: &Path) -> CassiaResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CassiaError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            CassiaError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Build the named column family bound to `pool`
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Config` if no such family is declared, or any
    /// error from resolving its types.
    pub fn column_family(
        &self,
        name: &str,
        pool: Arc<dyn ConnectionPool>,
    ) -> CassiaResult<ColumnFamily> {
        let def = self
            .column_families
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| {
                CassiaError::config(format!("column family '{}' is not declared", name))
            })?;
        let schema = def.schema(self.consistency_level()?)?;
        Ok(ColumnFamily::new(schema, pool))
    }

    /// Build a mutator at the configured default level
    ///
    /// # Errors
    ///
    /// Returns `CassiaError::Config` if the level is invalid.
    pub fn mutator(&self, pool: Arc<dyn ConnectionPool>) -> CassiaResult<Mutator> {
        Ok(Mutator::new(pool, Some(self.consistency_level()?)))
    }
}

//! Column families declared in cassia.toml

use crate::common::*;
use cassia::{ClientConfig, CONFIG_FILE_NAME};
use tempfile::TempDir;

const CONFIG: &str = r#"
write_consistency_level = "TWO"

[[column_family]]
name = "Users"
key_validation_class = "UTF8Type"
comparator_type = "UTF8Type"
default_validation_class = "UTF8Type"
write_consistency_level = "quorum"

[column_family.column_validators]
age = "LongType"

[[column_family]]
name = "Events"
key_validation_class = "UTF8Type"
comparator_type = "CompositeType(UTF8Type, ReversedType(LongType))"
insert_format = "array"
"#;

#[test]
fn configured_families_drive_mutations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, CONFIG).unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    let pool = RecordingPool::new();
    let users = config.column_family("Users", pool.clone()).unwrap();
    let events = config.column_family("Events", pool.clone()).unwrap();

    let mut m = config.mutator(pool.clone()).unwrap();
    assert_eq!(m.consistency_level(), ConsistencyLevel::Two);
    m.insert(
        &users,
        "k",
        ColumnSet::dictionary([("age", Value::Int(3))]),
        Some(Timestamp::from_micros(1)),
        None,
    )
    .unwrap();
    m.insert(
        &events,
        "k",
        ColumnSet::array([(
            Value::composite([Value::from("x"), Value::Int(2)]),
            Value::Bytes(vec![1]),
        )]),
        Some(Timestamp::from_micros(1)),
        None,
    )
    .unwrap();
    m.send(None).unwrap();

    let sent = pool.sent();
    assert_eq!(sent[0].consistency_level, ConsistencyLevel::Two);
    assert_eq!(
        mutations_for(&sent[0].mutation_map, "k", "Users"),
        &[column(b"age", &3i64.to_be_bytes(), 1, None)]
    );
    assert_eq!(mutations_for(&sent[0].mutation_map, "k", "Events").len(), 1);

    let cf_mutator = CfMutator::new(&users, None);
    assert_eq!(cf_mutator.consistency_level(), ConsistencyLevel::Quorum);
    let cf_mutator = CfMutator::new(&events, None);
    assert_eq!(cf_mutator.consistency_level(), ConsistencyLevel::Two);
}

#[test]
fn default_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    ClientConfig::write_default_if_missing(&path).unwrap();
    let config = ClientConfig::from_file(&path).unwrap();
    assert_eq!(config.consistency_level().unwrap(), ConsistencyLevel::One);
    assert!(config.column_families.is_empty());
}

#[test]
fn unknown_type_name_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "[[column_family]]\nname = \"A\"\ndefault_validation_class = \"DecimalType\"\n",
    )
    .unwrap();
    let err = ClientConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, CassiaError::UnknownType { .. }));
}

//! Schema class names resolve to codecs

use crate::common::*;

#[test]
fn every_simple_name_round_trips_through_class_name() {
    let names = DataType::simple_type_names();
    assert!(names.len() >= 14);
    for name in names {
        let t = DataType::from_name(name).unwrap();
        if name != "TimestampType" {
            assert_eq!(t.class_name(), name);
        }
        let qualified = format!("{}{}", MARSHAL_PACKAGE, name);
        assert_eq!(DataType::from_name(&qualified).unwrap(), t);
    }
}

#[test]
fn parameterised_names() {
    let t = DataType::from_name(
        "org.apache.cassandra.db.marshal.CompositeType(org.apache.cassandra.db.marshal.UTF8Type,ReversedType(TimeUUIDType))",
    )
    .unwrap();
    assert_eq!(
        t,
        DataType::Composite(vec![
            DataType::Utf8,
            DataType::Reversed(Box::new(DataType::TimeUuid)),
        ])
    );
    assert_eq!(t.class_name(), "CompositeType(UTF8Type,ReversedType(TimeUUIDType))");
    let parsed: DataType = t.class_name().parse().unwrap();
    assert_eq!(parsed, t);
}

#[test]
fn unknown_and_malformed_names() {
    for bad in [
        "NopeType",
        "DecimalType",
        "CompositeType()",
        "ReversedType(LongType,UTF8Type)",
        "CompositeType(UTF8Type",
        "CompositeType(UTF8Type,)",
        "ListType(UTF8Type)",
    ] {
        match DataType::from_name(bad) {
            Err(CassiaError::UnknownType { .. }) => {}
            other => panic!("{}: expected unknown type, got {:?}", bad, other),
        }
    }
}

//! Counter and super column families on the wire

use crate::common::*;

#[test]
fn counter_insert_has_no_timestamp_or_ttl() {
    let pool = RecordingPool::new();
    let hits = page_hits(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    m.insert(
        &hits,
        "home",
        ColumnSet::dictionary([("views", 3i64), ("clicks", -1i64)]),
        None,
        None,
    )
    .unwrap();
    m.send(None).unwrap();

    let sent = pool.sent();
    assert_eq!(
        mutations_for(&sent[0].mutation_map, "home", "PageHits"),
        &[
            Mutation::Insert(ColumnOrSuperColumn::CounterColumn(CounterColumn {
                name: b"views".to_vec(),
                value: 3,
            })),
            Mutation::Insert(ColumnOrSuperColumn::CounterColumn(CounterColumn {
                name: b"clicks".to_vec(),
                value: -1,
            })),
        ]
    );
}

#[test]
fn counter_ttl_is_rejected() {
    let pool = RecordingPool::new();
    let hits = page_hits(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    let err = m
        .insert(&hits, "home", ColumnSet::dictionary([("views", 1i64)]), None, Some(5))
        .unwrap_err();
    assert!(matches!(err, CassiaError::Validation { .. }));
    assert!(m.is_empty());
}

#[test]
fn super_column_insert_packs_subcolumns_with_subcomparator() {
    let pool = RecordingPool::new();
    let posts = posts(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    m.insert(
        &posts,
        "alice",
        ColumnSet::super_columns(
            InsertFormat::Dictionary,
            [
                ("p1", vec![(Value::Int(1), Value::from("hi")), (Value::Int(2), Value::from("there"))]),
                ("p2", vec![(Value::Int(1), Value::from("bye"))]),
            ],
        ),
        Some(Timestamp::from_micros(42)),
        Some(10),
    )
    .unwrap();
    assert_eq!(m.len(), 2);

    fn sub(n: i64, v: &[u8]) -> Column {
        Column {
            name: n.to_be_bytes().to_vec(),
            value: v.to_vec(),
            timestamp: 42,
            ttl: Some(10),
        }
    }
    let map = m.mutation_map().unwrap();
    assert_eq!(
        mutations_for(&map, "alice", "Posts"),
        &[
            Mutation::Insert(ColumnOrSuperColumn::SuperColumn {
                name: b"p1".to_vec(),
                columns: vec![sub(1, b"hi"), sub(2, b"there")],
            }),
            Mutation::Insert(ColumnOrSuperColumn::SuperColumn {
                name: b"p2".to_vec(),
                columns: vec![sub(1, b"bye")],
            }),
        ]
    );
}

#[test]
fn super_column_deletion_shapes() {
    let pool = RecordingPool::new();
    let posts = posts(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    let ts = Some(Timestamp::from_micros(9));
    m.remove(&posts, "alice", None, Some("p1".into()), ts)
        .unwrap()
        .remove(&posts, "alice", Some(vec![Value::Int(2)]), Some("p1".into()), ts)
        .unwrap()
        .remove(&posts, "alice", Some(vec!["p2".into()]), None, ts)
        .unwrap();

    let map = m.mutation_map().unwrap();
    assert_eq!(
        mutations_for(&map, "alice", "Posts"),
        &[
            Mutation::Delete(Deletion {
                timestamp: Some(9),
                super_column: Some(b"p1".to_vec()),
                predicate: None,
            }),
            Mutation::Delete(Deletion {
                timestamp: Some(9),
                super_column: Some(b"p1".to_vec()),
                predicate: Some(SlicePredicate {
                    column_names: vec![2i64.to_be_bytes().to_vec()],
                }),
            }),
            Mutation::Delete(Deletion {
                timestamp: Some(9),
                super_column: None,
                predicate: Some(SlicePredicate {
                    column_names: vec![b"p2".to_vec()],
                }),
            }),
        ]
    );
}

#[test]
fn subcolumn_names_are_checked_against_subcomparator() {
    let pool = RecordingPool::new();
    let posts = posts(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    let err = m
        .remove(&posts, "alice", Some(vec!["two".into()]), Some("p1".into()), None)
        .unwrap_err();
    assert!(matches!(err, CassiaError::Validation { .. }));
    assert!(m.is_empty());
}

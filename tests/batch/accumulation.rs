//! Buffer accumulation and ordering

use crate::common::*;

#[test]
fn operations_accumulate_in_call_order_across_families() {
    let pool = RecordingPool::new();
    let users = users(&pool);
    let posts = posts(&pool);
    let clock = manual_clock(10);
    let mut m = mutator_at(&pool, None, &clock);

    m.insert(&users, "k1", ColumnSet::dictionary([("name", "ada")]), None, None)
        .unwrap();
    clock.advance(1);
    m.remove(&posts, "k2", None, Some("p1".into()), None).unwrap();
    clock.advance(1);
    m.insert(&users, "k3", ColumnSet::dictionary([("name", "bob")]), None, None)
        .unwrap();
    clock.advance(1);
    m.remove(&users, "k1", Some(vec!["name".into()]), None, None)
        .unwrap();

    assert_eq!(m.len(), 4);
    assert_eq!(m.state(), BufferState::Pending);
    let seen: Vec<(String, &str, i64)> = m
        .operations()
        .iter()
        .map(|op| {
            (
                op.key.as_text().unwrap().to_string(),
                op.column_family(),
                op.operation.timestamp().as_micros(),
            )
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            ("k1".to_string(), "Users", 10),
            ("k2".to_string(), "Posts", 11),
            ("k3".to_string(), "Users", 12),
            ("k1".to_string(), "Users", 13),
        ]
    );
    assert_eq!(pool.acquired(), 0);
}

#[test]
fn one_insertion_per_column() {
    let pool = RecordingPool::new();
    let users = users(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    m.insert(
        &users,
        "k",
        ColumnSet::dictionary([
            ("name", Value::from("ada")),
            ("age", Value::Int(36)),
            ("city", Value::from("london")),
        ]),
        Some(Timestamp::from_micros(5)),
        Some(3600),
    )
    .unwrap();

    assert_eq!(m.len(), 3);
    for op in m.operations() {
        match &op.operation {
            Operation::Insertion { timestamp, ttl, .. } => {
                assert_eq!(timestamp.as_micros(), 5);
                assert_eq!(*ttl, Some(3600));
            }
            other => panic!("unexpected operation {:?}", other),
        }
    }
}

#[test]
fn two_inserts_for_one_row_become_one_entry() {
    let pool = RecordingPool::new();
    let users = users(&pool);
    let clock = manual_clock(1_000);
    let mut m = mutator_at(&pool, None, &clock);

    m.insert(&users, "k1", ColumnSet::dictionary([("c1", "v1")]), None, None)
        .unwrap();
    clock.advance(1);
    m.insert(&users, "k1", ColumnSet::dictionary([("c2", "v2")]), None, None)
        .unwrap();
    m.send(None).unwrap();

    let sent = pool.sent();
    assert_eq!(sent.len(), 1);
    let map = &sent[0].mutation_map;
    assert_eq!(map.len(), 1);
    assert_eq!(map[b"k1".as_slice()].len(), 1);
    assert_eq!(
        mutations_for(map, "k1", "Users"),
        &[
            column(b"c1", b"v1", 1_000, None),
            column(b"c2", b"v2", 1_001, None),
        ]
    );
}

#[test]
fn delete_then_insert_keeps_both_records_and_timestamps() {
    let pool = RecordingPool::new();
    let users = users(&pool);
    let mut m = Mutator::new(pool.clone(), None);

    m.remove(
        &users,
        "k1",
        Some(vec!["c1".into()]),
        None,
        Some(Timestamp::from_micros(100)),
    )
    .unwrap();
    m.insert(
        &users,
        "k1",
        ColumnSet::dictionary([("c1", "v3")]),
        Some(Timestamp::from_micros(101)),
        None,
    )
    .unwrap();
    m.send(None).unwrap();

    let sent = pool.sent();
    assert_eq!(
        mutations_for(&sent[0].mutation_map, "k1", "Users"),
        &[
            Mutation::Delete(Deletion {
                timestamp: Some(100),
                super_column: None,
                predicate: Some(SlicePredicate {
                    column_names: vec![b"c1".to_vec()],
                }),
            }),
            column(b"c1", b"v3", 101, None),
        ]
    );
}

#[test]
fn insert_after_later_delete_is_not_merged() {
    let pool = RecordingPool::new();
    let users = users(&pool);
    let mut m = Mutator::new(pool.clone(), None);

    m.insert(
        &users,
        "k",
        ColumnSet::dictionary([("c", "v")]),
        Some(Timestamp::from_micros(50)),
        None,
    )
    .unwrap()
    .remove(&users, "k", None, None, Some(Timestamp::from_micros(40)))
    .unwrap();

    let map = m.mutation_map().unwrap();
    let records = mutations_for(&map, "k", "Users");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].timestamp(), Some(50));
    assert_eq!(records[1].timestamp(), Some(40));
    assert!(records[0].is_insert());
    assert!(!records[1].is_insert());
}

#[test]
fn ttl_and_value_types_reach_the_wire() {
    let pool = RecordingPool::new();
    let users = users(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    m.insert(
        &users,
        "k",
        ColumnSet::dictionary([("age", Value::Int(36))]),
        Some(Timestamp::from_micros(7)),
        Some(60),
    )
    .unwrap();

    let map = m.mutation_map().unwrap();
    assert_eq!(
        mutations_for(&map, "k", "Users"),
        &[column(b"age", &36i64.to_be_bytes(), 7, Some(60))]
    );
}

#[test]
fn composite_names_pack_per_component() {
    let pool = RecordingPool::new();
    let events = events(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    let name = Value::composite([Value::from("click"), Value::Int(1)]);
    m.insert(
        &events,
        "k",
        ColumnSet::array([(name.clone(), Value::Bytes(vec![9])), (name, Value::Bytes(vec![8]))]),
        Some(Timestamp::from_micros(1)),
        None,
    )
    .unwrap();

    let mut packed = vec![0, 5];
    packed.extend_from_slice(b"click");
    packed.push(0);
    packed.extend_from_slice(&[0, 8, 0, 0, 0, 0, 0, 0, 0, 1, 0]);

    let map = m.mutation_map().unwrap();
    assert_eq!(
        mutations_for(&map, "k", "Events"),
        &[column(&packed, &[9], 1, None), column(&packed, &[8], 1, None)]
    );
}

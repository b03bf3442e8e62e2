//! send: clearing, retention on failure, consistency levels

use crate::common::*;

fn pending(pool: &std::sync::Arc<RecordingPool>, level: Option<ConsistencyLevel>) -> (ColumnFamily, Mutator) {
    let users = users(pool);
    let mut m = Mutator::new(pool.clone(), level);
    m.insert(
        &users,
        "k1",
        ColumnSet::dictionary([("c1", "v1")]),
        Some(Timestamp::from_micros(1)),
        None,
    )
    .unwrap()
    .remove(&users, "k2", None, None, Some(Timestamp::from_micros(2)))
    .unwrap();
    (users, m)
}

// ============================================================================
// Success
// ============================================================================

#[test]
fn send_clears_buffer_on_success() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);

    m.send(None).unwrap();

    assert_eq!(m.state(), BufferState::Empty);
    assert!(m.is_empty());
    assert_eq!(pool.sent().len(), 1);
    assert_eq!(pool.acquired(), 1);
}

#[test]
fn second_send_after_success_is_skipped() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);
    m.send(None).unwrap();
    m.send(None).unwrap();
    assert_eq!(pool.sent().len(), 1);
    assert_eq!(pool.acquired(), 1);
}

#[test]
fn empty_send_is_skipped() {
    let pool = RecordingPool::new();
    let mut m = Mutator::new(pool.clone(), None);
    assert_eq!(m.state(), BufferState::Empty);

    m.send(Some(ConsistencyLevel::All)).unwrap();

    assert_eq!(pool.acquired(), 0);
    assert_eq!(pool.attempts(), 0);
    assert!(pool.sent().is_empty());
}

#[test]
fn empty_send_is_skipped_even_when_transport_is_down() {
    let pool = RecordingPool::new();
    pool.fail_with(Failure::Acquire);
    let mut m = Mutator::new(pool.clone(), None);
    m.send(None).unwrap();
}

// ============================================================================
// Failure
// ============================================================================

#[test]
fn transport_failure_preserves_buffer_and_retry_sends_identical_payload() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);
    let before = m.mutation_map().unwrap();

    pool.fail_with(Failure::Transport);
    let err = m.send(None).unwrap_err();
    assert!(matches!(err, CassiaError::Transport { .. }));
    assert!(err.is_retryable());
    assert_eq!(m.state(), BufferState::Pending);
    assert_eq!(m.len(), 2);
    assert!(pool.sent().is_empty());

    pool.succeed();
    m.send(None).unwrap();

    let sent = pool.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].mutation_map, before);
    assert_eq!(pool.attempts(), 2);
    assert!(m.is_empty());
}

#[test]
fn store_error_is_surfaced_verbatim() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);

    pool.fail_with(Failure::Store(StoreErrorKind::InvalidRequest));
    let err = m.send(None).unwrap_err();
    assert!(matches!(
        err,
        CassiaError::Store {
            kind: StoreErrorKind::InvalidRequest,
            ..
        }
    ));
    assert!(!err.is_retryable());
    assert_eq!(m.len(), 2);

    pool.fail_with(Failure::Store(StoreErrorKind::Unavailable));
    assert!(m.send(None).unwrap_err().is_retryable());
    assert_eq!(m.len(), 2);
}

#[test]
fn acquire_failure_preserves_buffer() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);

    pool.fail_with(Failure::Acquire);
    assert!(m.send(None).is_err());
    assert_eq!(pool.attempts(), 0);
    assert_eq!(m.len(), 2);

    pool.succeed();
    m.send(None).unwrap();
    assert_eq!(pool.sent().len(), 1);
}

#[test]
fn repeated_failures_never_change_the_buffer() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);
    let before = m.mutation_map().unwrap();

    pool.fail_with(Failure::Transport);
    for _ in 0..3 {
        assert!(m.send(None).is_err());
    }
    assert_eq!(m.mutation_map().unwrap(), before);
    assert_eq!(pool.attempts(), 3);
}

// ============================================================================
// Consistency levels
// ============================================================================

#[test]
fn explicit_send_level_wins() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, Some(ConsistencyLevel::Quorum));
    m.send(Some(ConsistencyLevel::Three)).unwrap();
    assert_eq!(pool.sent()[0].consistency_level, ConsistencyLevel::Three);
}

#[test]
fn constructor_level_is_the_default() {
    let pool = RecordingPool::new();
    let (users, mut m) = pending(&pool, Some(ConsistencyLevel::EachQuorum));
    m.send(None).unwrap();
    m.insert(&users, "k", ColumnSet::dictionary([("a", "b")]), None, None)
        .unwrap();
    m.send(None).unwrap();
    let levels: Vec<_> = pool.sent().iter().map(|b| b.consistency_level).collect();
    assert_eq!(levels, vec![ConsistencyLevel::EachQuorum; 2]);
}

#[test]
fn mutator_without_level_sends_at_one() {
    let pool = RecordingPool::new();
    let (_users, mut m) = pending(&pool, None);
    assert_eq!(m.consistency_level(), ConsistencyLevel::One);
    m.send(None).unwrap();
    assert_eq!(pool.sent()[0].consistency_level, ConsistencyLevel::One);
}

// ============================================================================
// Generated names
// ============================================================================

#[test]
fn retry_resends_time_uuids_generated_at_insert() {
    let pool = RecordingPool::new();
    let timeline = timeline(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    m.insert(
        &timeline,
        "k1",
        ColumnSet::dictionary([(date(1_600_000_000), "e")]),
        Some(Timestamp::from_micros(5)),
        None,
    )
    .unwrap()
    .remove(&timeline, "k1", Some(vec![date(1_600_000_001)]), None, None)
    .unwrap();

    let before = m.mutation_map().unwrap();
    assert_eq!(m.mutation_map().unwrap(), before);
    assert!(matches!(
        &m.operations()[0].operation,
        Operation::Insertion { column, .. } if matches!(column.name(), Value::Uuid(_))
    ));

    pool.fail_with(Failure::Transport);
    assert!(m.send(None).is_err());
    assert_eq!(m.mutation_map().unwrap(), before);

    pool.succeed();
    m.send(None).unwrap();
    assert_eq!(pool.sent()[0].mutation_map, before);
}

#[test]
fn equal_dates_become_distinct_time_uuid_columns() {
    let pool = RecordingPool::new();
    let timeline = timeline(&pool);
    let mut m = Mutator::new(pool.clone(), None);
    m.insert(
        &timeline,
        "k1",
        ColumnSet::dictionary([(date(1_600_000_000), "a"), (date(1_600_000_000), "b")]),
        None,
        None,
    )
    .unwrap();

    let map = m.mutation_map().unwrap();
    let records = mutations_for(&map, "k1", "Timeline");
    assert_eq!(records.len(), 2);
    assert_ne!(records[0], records[1]);
}

#[test]
fn cf_mutator_retry_resends_composite_time_uuids() {
    let pool = RecordingPool::new();
    let feed = feed(&pool);
    let mut m = CfMutator::new(&feed, None);
    let name = Value::composite([Value::from("post"), date(1_600_000_000)]);
    m.insert("k1", ColumnSet::array([(name, "hello")]), None, None)
        .unwrap();
    let before = m.mutation_map().unwrap();

    pool.fail_with(Failure::Store(StoreErrorKind::TimedOut));
    assert!(m.send(None).unwrap_err().is_retryable());

    pool.succeed();
    m.send(None).unwrap();
    assert_eq!(pool.sent()[0].mutation_map, before);
}

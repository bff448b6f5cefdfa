//! Typed reads through `get` and `find_all`.

use ormkit_testkit::prelude::*;

fn alice() -> User {
    User {
        email: Some("alice@example.com".into()),
        ..User::new(1, "Alice", 30)
    }
}

/// A record whose slot list is shorter than its column list.
#[derive(Debug, Default)]
struct Lopsided {
    id: i64,
}

impl Model for Lopsided {
    fn table_name(&self) -> &str {
        "lopsided"
    }

    fn columns(&self) -> Vec<&str> {
        vec!["id", "extra"]
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into(), Value::Null]
    }

    fn pointers(&mut self) -> Vec<&mut dyn Slot> {
        vec![&mut self.id]
    }
}

#[test]
fn get_forces_read_one_and_limit_one() {
    init_tracing();
    let adapter = RecordingAdapter::new().with_row(alice().row());
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let found: User = get(
        &db,
        db.query(&probe)
            .filter([eq("name", "Alice")])
            .limit(50)
            .offset(3),
    )
    .unwrap();

    assert_eq!(found, alice());
    let calls = adapter.calls();
    assert_eq!(calls.len(), 1);
    let Call::QueryRow(query) = &calls[0] else {
        panic!("expected query_row, got {calls:?}");
    };
    assert_eq!(query.action, Action::ReadOne);
    assert_eq!(query.limit, 1);
    assert_eq!(query.offset, 3);
    assert_eq!(query.columns, vec!["id", "name", "email", "age", "active"]);
    assert_eq!(query.conditions[0].field(), "name");
}

#[test]
fn get_surfaces_not_found() {
    let adapter = RecordingAdapter::new();
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let result: OrmResult<User> = get(&db, db.query(&probe).filter([eq("id", 99)]));

    let err = result.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, OrmError::NotFound));
}

#[test]
fn get_surfaces_slot_errors() {
    let adapter = RecordingAdapter::new().with_row(vec![Value::Integer(1)]);
    let db = Db::new(adapter);
    let probe = User::default();

    let result: OrmResult<User> = get(&db, db.query(&probe));

    assert!(matches!(
        result,
        Err(OrmError::SlotCount {
            expected: 1,
            actual: 5
        })
    ));
}

#[test]
fn get_with_uses_factory() {
    let adapter = RecordingAdapter::new().with_row(vec![
        Value::Integer(7),
        Value::from("sensor"),
        Value::Float(1.5),
        Value::Bytes(vec![1, 2]),
    ]);
    let db = Db::new(adapter);
    let probe = Reading::default();

    let reading = get_with(&db, db.query(&probe), || Reading {
        sensor: "placeholder".into(),
        ..Reading::default()
    })
    .unwrap();

    assert_eq!(reading.id, 7);
    assert_eq!(reading.sensor, "sensor");
    assert_eq!(reading.payload, vec![1, 2]);
}

#[test]
fn reads_reject_nameless_models_without_calls() {
    let adapter = RecordingAdapter::new().with_row(vec![]);
    let db = Db::new(adapter.clone());
    let probe = RawModel::nameless();

    let one: OrmResult<RawModel> = get(&db, db.query(&probe));
    let all: OrmResult<Vec<RawModel>> = find_all(&db, db.query(&probe));

    assert_eq!(one.unwrap_err(), OrmError::EmptyTable);
    assert_eq!(all.unwrap_err(), OrmError::EmptyTable);
    assert_eq!(adapter.call_count(), 0);
}

#[test]
fn reads_reject_incapable_destinations_without_calls() {
    let adapter = RecordingAdapter::new();
    let db = Db::new(adapter.clone());
    let probe = Lopsided::default();

    let one: OrmResult<Lopsided> = get(&db, db.query(&probe));
    let all: OrmResult<Vec<Lopsided>> = find_all(&db, db.query(&probe));

    for err in [one.unwrap_err(), all.unwrap_err()] {
        let OrmError::Capability { type_name } = err else {
            panic!("expected capability error, got {err:?}");
        };
        assert!(type_name.ends_with("Lopsided"));
    }
    assert_eq!(adapter.call_count(), 0);
}

#[test]
fn find_all_with_no_rows_is_empty_and_closes() {
    let adapter = RecordingAdapter::new();
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let users: Vec<User> = find_all(&db, db.query(&probe)).unwrap();

    assert!(users.is_empty());
    assert_eq!(adapter.close_count(), 1);
}

#[test]
fn find_all_keeps_adapter_order_and_paging() {
    let rows = vec![
        User::new(3, "Carol", 52).row(),
        User::new(1, "Alice", 30).row(),
        User::new(2, "Bob", 41).row(),
    ];
    let adapter = RecordingAdapter::new().with_rows(rows);
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let users: Vec<User> = find_all(
        &db,
        db.query(&probe)
            .filter([gte("age", 18)])
            .order_by("age", "DESC")
            .group_by(["name"])
            .limit(20)
            .offset(5),
    )
    .unwrap();

    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    let query = adapter.calls()[0].query().cloned().unwrap();
    assert_eq!(query.action, Action::ReadAll);
    assert_eq!(query.limit, 20);
    assert_eq!(query.offset, 5);
    assert_eq!(query.order_by[0].column(), "age");
    assert_eq!(query.order_by[0].dir(), "DESC");
    assert_eq!(query.group_by, vec!["name"]);
    assert_eq!(adapter.close_count(), 1);
}

#[test]
fn find_all_scan_failure_discards_partial_results() {
    let rows = (1..=4).map(|i| User::new(i, "u", 20).row()).collect();
    let err = OrmError::adapter("corrupt row");
    let adapter = RecordingAdapter::new()
        .with_rows(rows)
        .fail_scan_at(2, err.clone());
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let result: OrmResult<Vec<User>> = find_all(&db, db.query(&probe));

    assert_eq!(result, Err(err));
    assert_eq!(adapter.close_count(), 1);
}

#[test]
fn find_all_surfaces_terminal_iteration_error() {
    let err = OrmError::adapter("connection reset");
    let adapter = RecordingAdapter::new()
        .with_rows(vec![User::new(1, "Alice", 30).row()])
        .fail_iteration(err.clone());
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let result: OrmResult<Vec<User>> = find_all(&db, db.query(&probe));

    assert_eq!(result, Err(err));
    assert_eq!(adapter.close_count(), 1);
}

#[test]
fn find_all_open_failure_closes_nothing() {
    let err = OrmError::adapter("no such table");
    let adapter = RecordingAdapter::new().fail_open(err.clone());
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let result: OrmResult<Vec<User>> = find_all(&db, db.query(&probe));

    assert_eq!(result, Err(err));
    assert_eq!(adapter.close_count(), 0);
}

#[test]
fn find_all_close_failure_does_not_mask_results() {
    let adapter = RecordingAdapter::new()
        .with_rows(vec![User::new(1, "Alice", 30).row()])
        .fail_close(OrmError::adapter("close failed"));
    let db = Db::new(adapter.clone());
    let probe = User::default();

    let users: Vec<User> = find_all(&db, db.query(&probe)).unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(adapter.close_count(), 1);
}

#[test]
fn find_all_with_builds_each_destination() {
    let adapter = RecordingAdapter::new().with_rows(vec![
        User::new(1, "Alice", 30).row(),
        User::new(2, "Bob", 41).row(),
    ]);
    let db = Db::new(adapter);
    let probe = User::default();
    let mut built = 0;

    let users = find_all_with(&db, db.query(&probe), || {
        built += 1;
        User::default()
    })
    .unwrap();

    assert_eq!(users.len(), 2);
    // one probe for the capability check, one per row
    assert_eq!(built, 3);
}

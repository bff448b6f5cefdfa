//! Typed reads.
//!
//! [`get`] and [`find_all`] allocate destination records, hand their slots
//! to the adapter's scanner or cursor, and return fully typed results. The
//! core never learns the record's shape; it only sees [`Model::pointers`].

use crate::adapter::Rows;
use crate::builder::QueryBuilder;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::query::Action;
use crate::validate::validate;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace, warn};

/// Reads a single record.
///
/// The query is sent as [`Action::ReadOne`] with `limit = 1`, whatever limit
/// the builder carried. Its `columns` name the destination's columns, in the
/// order the row values must arrive.
///
/// # Errors
///
/// - A validation error for the builder's model.
/// - [`OrmError::Capability`] if `T` does not expose one slot per column.
/// - Whatever the scanner reports, commonly [`OrmError::NotFound`].
pub fn get<T>(db: &Db, qb: QueryBuilder<'_>) -> OrmResult<T>
where
    T: Model + Default,
{
    get_with(db, qb, T::default)
}

/// Like [`get`], with `factory` supplying the empty destination.
///
/// # Errors
///
/// See [`get`].
pub fn get_with<T, F>(db: &Db, qb: QueryBuilder<'_>, factory: F) -> OrmResult<T>
where
    T: Model,
    F: FnOnce() -> T,
{
    validate(Action::ReadOne, qb.model())?;

    let mut query = qb.into_query();
    query.action = Action::ReadOne;
    query.limit = 1;

    let mut dest = factory();
    ensure_capability(&mut dest)?;
    query.columns = owned_columns(&dest);

    debug!(action = %query.action, table = %query.table, "dispatching query_row");
    let mut scanner = db.adapter().query_row(&query);
    scanner.scan(&mut dest.pointers())?;
    Ok(dest)
}

/// Reads every matching record, in the adapter's order.
///
/// The query is sent as [`Action::ReadAll`] carrying the destination's
/// columns; the builder's limit and offset are kept. The row cursor is closed exactly once whichever way this
/// returns.
///
/// # Errors
///
/// - A validation error for the builder's model.
/// - [`OrmError::Capability`] if `T` does not expose one slot per column.
/// - Whatever the adapter reports when opening, scanning or finishing the
///   cursor. No partial results are returned.
pub fn find_all<T>(db: &Db, qb: QueryBuilder<'_>) -> OrmResult<Vec<T>>
where
    T: Model + Default,
{
    find_all_with(db, qb, T::default)
}

/// Like [`find_all`], with `factory` supplying each empty destination.
///
/// # Errors
///
/// See [`find_all`].
pub fn find_all_with<T, F>(db: &Db, qb: QueryBuilder<'_>, mut factory: F) -> OrmResult<Vec<T>>
where
    T: Model,
    F: FnMut() -> T,
{
    validate(Action::ReadAll, qb.model())?;

    let mut query = qb.into_query();
    query.action = Action::ReadAll;

    let mut probe = factory();
    ensure_capability(&mut probe)?;
    query.columns = owned_columns(&probe);

    debug!(
        action = %query.action,
        table = %query.table,
        limit = query.limit,
        offset = query.offset,
        "dispatching query"
    );
    let mut rows = Cursor::new(db.adapter().query(&query)?);

    let mut results = Vec::new();
    while rows.next() {
        let mut dest = factory();
        rows.scan(&mut dest.pointers())?;
        trace!(row = results.len(), "scanned row");
        results.push(dest);
    }
    rows.err()?;

    Ok(results)
}

fn owned_columns(dest: &dyn Model) -> Vec<String> {
    dest.columns().into_iter().map(str::to_owned).collect()
}

/// Checks that a destination exposes one slot per column.
fn ensure_capability<T: Model>(dest: &mut T) -> OrmResult<()> {
    let columns = dest.columns().len();
    let slots = dest.pointers().len();
    if columns != slots {
        return Err(OrmError::Capability {
            type_name: std::any::type_name::<T>(),
        });
    }
    Ok(())
}

/// Closes the wrapped cursor when dropped.
struct Cursor<'a> {
    rows: Box<dyn Rows + 'a>,
}

impl<'a> Cursor<'a> {
    fn new(rows: Box<dyn Rows + 'a>) -> Self {
        Self { rows }
    }
}

impl<'a> Deref for Cursor<'a> {
    type Target = dyn Rows + 'a;

    fn deref(&self) -> &Self::Target {
        self.rows.as_ref()
    }
}

impl<'a> DerefMut for Cursor<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.rows.as_mut()
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.rows.close() {
            warn!(error = %err, "failed to close row cursor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Adapter, Scanner};
    use crate::model::{assign_slots, Slot};
    use crate::query::{eq, Query};
    use crate::value::Value;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Default, PartialEq)]
    struct User {
        id: i64,
        name: String,
    }

    impl Model for User {
        fn table_name(&self) -> &str {
            "users"
        }

        fn columns(&self) -> Vec<&str> {
            vec!["id", "name"]
        }

        fn values(&self) -> Vec<Value> {
            vec![self.id.into(), self.name.clone().into()]
        }

        fn pointers(&mut self) -> Vec<&mut dyn Slot> {
            vec![&mut self.id, &mut self.name]
        }
    }

    /// Declares two columns but only exposes one slot.
    #[derive(Default)]
    struct Lopsided {
        id: i64,
    }

    impl Model for Lopsided {
        fn table_name(&self) -> &str {
            "lopsided"
        }

        fn columns(&self) -> Vec<&str> {
            vec!["id", "name"]
        }

        fn values(&self) -> Vec<Value> {
            vec![self.id.into(), Value::Null]
        }

        fn pointers(&mut self) -> Vec<&mut dyn Slot> {
            vec![&mut self.id]
        }
    }

    struct OneRow(Option<Vec<Value>>);

    impl Scanner for OneRow {
        fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()> {
            match self.0.take() {
                Some(row) => assign_slots(slots, row),
                None => Err(OrmError::NotFound),
            }
        }
    }

    struct VecRows {
        rows: std::vec::IntoIter<Vec<Value>>,
        current: Option<Vec<Value>>,
        closes: Arc<Mutex<usize>>,
    }

    impl Rows for VecRows {
        fn next(&mut self) -> bool {
            self.current = self.rows.next();
            self.current.is_some()
        }

        fn scan(&mut self, slots: &mut [&mut dyn Slot]) -> OrmResult<()> {
            let row = self.current.take().ok_or(OrmError::NotFound)?;
            assign_slots(slots, row)
        }

        fn close(&mut self) -> OrmResult<()> {
            *self.closes.lock() += 1;
            Ok(())
        }

        fn err(&self) -> OrmResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Fixed {
        row: Option<Vec<Value>>,
        rows: Vec<Vec<Value>>,
        queries: Mutex<Vec<Query>>,
        closes: Arc<Mutex<usize>>,
    }

    impl Adapter for Fixed {
        fn exec(&self, query: &Query) -> OrmResult<()> {
            self.queries.lock().push(query.clone());
            Ok(())
        }

        fn query_row(&self, query: &Query) -> Box<dyn Scanner + '_> {
            self.queries.lock().push(query.clone());
            Box::new(OneRow(self.row.clone()))
        }

        fn query(&self, query: &Query) -> OrmResult<Box<dyn Rows + '_>> {
            self.queries.lock().push(query.clone());
            Ok(Box::new(VecRows {
                rows: self.rows.clone().into_iter(),
                current: None,
                closes: Arc::clone(&self.closes),
            }))
        }
    }

    fn row(id: i64, name: &str) -> Vec<Value> {
        vec![Value::Integer(id), Value::Text(name.into())]
    }

    #[test]
    fn get_forces_read_one_and_limit() {
        let adapter = Arc::new(Fixed {
            row: Some(row(1, "Alice")),
            ..Fixed::default()
        });
        let db = Db::from_arc(adapter.clone());

        let probe = User::default();
        let qb = db.query(&probe).filter([eq("id", 1)]).limit(50);
        let user: User = get(&db, qb).unwrap();

        assert_eq!(
            user,
            User {
                id: 1,
                name: "Alice".into()
            }
        );
        let queries = adapter.queries.lock();
        assert_eq!(queries[0].action, Action::ReadOne);
        assert_eq!(queries[0].limit, 1);
        assert_eq!(queries[0].columns, vec!["id", "name"]);
    }

    #[test]
    fn get_propagates_not_found() {
        let db = Db::new(Fixed::default());
        let probe = User::default();
        let result: OrmResult<User> = get(&db, db.query(&probe));
        assert_eq!(result, Err(OrmError::NotFound));
    }

    #[test]
    fn find_all_keeps_limit_and_closes_once() {
        let adapter = Arc::new(Fixed {
            rows: vec![row(1, "Alice"), row(2, "Bob")],
            ..Fixed::default()
        });
        let db = Db::from_arc(adapter.clone());

        let probe = User::default();
        let users: Vec<User> = find_all(&db, db.query(&probe).limit(5)).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Bob");
        assert_eq!(adapter.queries.lock()[0].action, Action::ReadAll);
        assert_eq!(adapter.queries.lock()[0].limit, 5);
        assert_eq!(adapter.queries.lock()[0].columns, vec!["id", "name"]);
        assert_eq!(*adapter.closes.lock(), 1);
    }

    #[test]
    fn capability_is_checked_before_adapter() {
        let adapter = Arc::new(Fixed {
            row: Some(row(1, "Alice")),
            ..Fixed::default()
        });
        let db = Db::from_arc(adapter.clone());
        let probe = User::default();

        let one: OrmResult<Lopsided> = get(&db, db.query(&probe));
        assert!(matches!(one, Err(OrmError::Capability { .. })));

        let all: OrmResult<Vec<Lopsided>> = find_all(&db, db.query(&probe));
        assert!(matches!(all, Err(OrmError::Capability { .. })));

        assert!(adapter.queries.lock().is_empty());
    }

    #[test]
    fn factory_supplies_destinations() {
        let db = Db::new(Fixed {
            rows: vec![row(7, "Grace")],
            ..Fixed::default()
        });
        let probe = User::default();
        let mut made = 0;
        let users = find_all_with(&db, db.query(&probe), || {
            made += 1;
            User::default()
        })
        .unwrap();

        assert_eq!(users[0].id, 7);
        // one probe plus one per row
        assert_eq!(made, 2);
    }
}

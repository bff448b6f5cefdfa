//! In-memory tables.

use crate::error::{MemoryError, MemoryResult};
use crate::plan::{Direction, Plan, Predicate};
use ormkit_core::{Action, Compiler, OrmError, OrmResult, Query, Value};

/// One table: an ordered column list and rows laid out in that order.
///
/// The column list grows as writes mention new columns; existing rows are
/// padded with `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    case_insensitive_like: bool,
}

impl Table {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets whether compiled plans treat `LIKE` case-insensitively.
    #[must_use]
    pub fn with_case_insensitive_like(mut self, value: bool) -> Self {
        self.case_insensitive_like = value;
        self
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column names in storage order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the stored rows.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, column: &str) -> MemoryResult<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| MemoryError::unknown_column(&self.name, column))
    }

    fn position_or_add(&mut self, column: &str) -> usize {
        if let Some(i) = self.columns.iter().position(|c| c == column) {
            return i;
        }
        self.columns.push(column.to_owned());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        self.columns.len() - 1
    }

    /// Appends a row built from parallel `columns` and `values`.
    pub fn insert(&mut self, columns: &[String], values: &[Value]) {
        let indices: Vec<usize> = columns.iter().map(|c| self.position_or_add(c)).collect();
        let mut row = vec![Value::Null; self.columns.len()];
        for (index, value) in indices.into_iter().zip(values) {
            row[index] = value.clone();
        }
        self.rows.push(row);
    }

    /// Sets `columns` to `values` on every row matching `plan`.
    ///
    /// Returns the number of rows changed.
    pub fn update(&mut self, plan: &Plan, columns: &[String], values: &[Value]) -> usize {
        let indices: Vec<usize> = columns.iter().map(|c| self.position_or_add(c)).collect();
        let mut changed = 0;
        for row in &mut self.rows {
            if plan.matches(row) {
                for (&index, value) in indices.iter().zip(values) {
                    row[index] = value.clone();
                }
                changed += 1;
            }
        }
        changed
    }

    /// Removes every row matching `plan`. Returns the number removed.
    pub fn delete(&mut self, plan: &Plan) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !plan.matches(row));
        before - self.rows.len()
    }

    /// Returns the rows selected by `plan`.
    pub fn select(&self, plan: &Plan) -> Vec<Vec<Value>> {
        plan.select(&self.rows)
    }

    pub(crate) fn compile_plan(&self, query: &Query) -> MemoryResult<Plan> {
        let predicates = query
            .conditions
            .iter()
            .map(|c| {
                Ok(Predicate {
                    index: self.position(c.field())?,
                    operator: c.operator(),
                    value: c.value().clone(),
                    logic: c.logic(),
                })
            })
            .collect::<MemoryResult<Vec<_>>>()?;

        let order = query
            .order_by
            .iter()
            .map(|o| Ok((self.position(o.column())?, Direction::parse(o.dir())?)))
            .collect::<MemoryResult<Vec<_>>>()?;

        let group = query
            .group_by
            .iter()
            .map(|g| self.position(g))
            .collect::<MemoryResult<Vec<_>>>()?;

        // Writes name the columns they set, not the columns they return.
        let projection = match query.action {
            Action::ReadOne | Action::ReadAll => query
                .columns
                .iter()
                .map(|c| self.position(c))
                .collect::<MemoryResult<Vec<_>>>()?,
            Action::Create | Action::Update | Action::Delete => Vec::new(),
        };

        Ok(Plan {
            predicates,
            order,
            group,
            projection,
            limit: bound("limit", query.limit)?,
            offset: bound("offset", query.offset)?.unwrap_or(0),
            case_insensitive_like: self.case_insensitive_like,
        })
    }
}

/// Converts a non-negative bound; `0` becomes `None`.
fn bound(name: &'static str, value: i64) -> MemoryResult<Option<usize>> {
    if value < 0 {
        return Err(MemoryError::NegativeBound { name, value });
    }
    Ok(usize::try_from(value).ok().filter(|&n| n > 0))
}

impl Compiler for Table {
    type Plan = Plan;

    fn compile(&self, query: &Query) -> OrmResult<Plan> {
        self.compile_plan(query).map_err(OrmError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormkit_core::{eq, gt, Condition};

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    fn people() -> Table {
        let mut t = Table::new("people");
        let c = cols(&["id", "name"]);
        t.insert(&c, &[1.into(), "Alice".into()]);
        t.insert(&c, &[2.into(), "Bob".into()]);
        t
    }

    fn read(conditions: Vec<Condition>) -> Query {
        Query {
            action: Action::ReadAll,
            table: "people".into(),
            conditions,
            ..Query::default()
        }
    }

    #[test]
    fn insert_extends_columns() {
        let mut t = people();
        t.insert(&cols(&["id", "age"]), &[3.into(), 40.into()]);
        assert_eq!(t.columns(), cols(&["id", "name", "age"]).as_slice());
        assert_eq!(t.rows()[0][2], Value::Null);
        assert_eq!(t.rows()[2][1], Value::Null);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn compile_resolves_columns() {
        let t = people();
        let plan = t.compile(&read(vec![eq("name", "Bob")])).unwrap();
        assert_eq!(plan.predicates[0].index, 1);
        assert_eq!(
            t.select(&plan),
            vec![vec![Value::Integer(2), Value::from("Bob")]]
        );
    }

    #[test]
    fn compile_rejects_unknown_column() {
        let t = people();
        let err = t.compile(&read(vec![gt("salary", 1)])).unwrap_err();
        assert!(matches!(err, OrmError::Adapter { .. }));
    }

    #[test]
    fn compile_rejects_negative_bounds() {
        let t = people();
        let mut q = read(vec![]);
        q.limit = -1;
        assert!(t.compile(&q).is_err());
        q.limit = 0;
        q.offset = -5;
        assert!(t.compile(&q).is_err());
    }

    #[test]
    fn reads_project_requested_columns() {
        let t = people();
        let mut q = read(vec![eq("id", 2)]);
        q.columns = cols(&["name", "id"]);
        let plan = t.compile(&q).unwrap();
        assert_eq!(
            t.select(&plan),
            vec![vec![Value::from("Bob"), Value::Integer(2)]]
        );

        q.columns = cols(&["nickname"]);
        assert!(matches!(t.compile(&q), Err(OrmError::Adapter { .. })));
    }

    #[test]
    fn update_and_delete_report_counts() {
        let mut t = people();
        let plan = t.compile(&read(vec![eq("id", 1)])).unwrap();
        assert_eq!(t.update(&plan, &cols(&["name"]), &["Alicia".into()]), 1);
        assert_eq!(t.rows()[0][1], Value::from("Alicia"));

        let all = t.compile(&read(vec![])).unwrap();
        assert_eq!(t.delete(&all), 2);
        assert!(t.is_empty());
    }
}

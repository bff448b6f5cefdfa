//! Compiled read/write plans over a single table.

use crate::error::{MemoryError, MemoryResult};
use ormkit_core::{Logic, Operator, Value};
use std::cmp::Ordering;

/// A condition with its column resolved to an index.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column position in the table.
    pub index: usize,
    /// Comparison operator.
    pub operator: Operator,
    /// Operand.
    pub value: Value,
    /// Join with the predicates before it.
    pub logic: Logic,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl Direction {
    /// Parses `ASC` or `DESC`, ignoring case.
    pub fn parse(dir: &str) -> MemoryResult<Self> {
        if dir.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if dir.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(MemoryError::InvalidDirection(dir.to_owned()))
        }
    }
}

/// A query compiled against one table's layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Filters in query order.
    pub predicates: Vec<Predicate>,
    /// Sort keys in priority order.
    pub order: Vec<(usize, Direction)>,
    /// Grouping key columns.
    pub group: Vec<usize>,
    /// Maximum rows; `None` is unbounded.
    pub limit: Option<usize>,
    /// Rows to skip.
    pub offset: usize,
    /// Whether `LIKE` ignores case.
    pub case_insensitive_like: bool,
    /// Columns returned by reads, in output order. Empty returns whole rows.
    pub projection: Vec<usize>,
}

impl Plan {
    /// Returns true if `row` passes the predicates.
    ///
    /// Predicates fold left: an OR-tagged predicate ORs with everything
    /// before it, an AND-tagged one ANDs. The first predicate's tag is
    /// ignored. No predicates match everything.
    pub fn matches(&self, row: &[Value]) -> bool {
        let mut iter = self.predicates.iter();
        let Some(first) = iter.next() else {
            return true;
        };
        iter.fold(self.test(first, row), |acc, p| match p.logic {
            Logic::And => acc && self.test(p, row),
            Logic::Or => acc || self.test(p, row),
        })
    }

    fn test(&self, predicate: &Predicate, row: &[Value]) -> bool {
        let Some(actual) = row.get(predicate.index) else {
            return false;
        };
        let expected = &predicate.value;
        match predicate.operator {
            Operator::Eq => values_equal(actual, expected),
            Operator::Neq => !values_equal(actual, expected),
            Operator::Gt => actual.compare(expected) == Some(Ordering::Greater),
            Operator::Gte => matches!(
                actual.compare(expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt => actual.compare(expected) == Some(Ordering::Less),
            Operator::Lte => matches!(
                actual.compare(expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Like => match (actual, expected) {
                (Value::Text(text), Value::Text(pattern)) => {
                    if self.case_insensitive_like {
                        like_match(&text.to_lowercase(), &pattern.to_lowercase())
                    } else {
                        like_match(text, pattern)
                    }
                }
                _ => false,
            },
        }
    }

    /// Runs the read pipeline: filter, group, sort, offset, limit, project.
    pub fn select(&self, rows: &[Vec<Value>]) -> Vec<Vec<Value>> {
        let mut selected: Vec<Vec<Value>> =
            rows.iter().filter(|r| self.matches(r)).cloned().collect();

        if !self.group.is_empty() {
            selected = self.first_per_group(selected);
        }

        if !self.order.is_empty() {
            selected.sort_by(|a, b| {
                for &(index, dir) in &self.order {
                    let ord = sort_cmp(&a[index], &b[index]);
                    let ord = match dir {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        let iter = selected.into_iter().skip(self.offset);
        let paged: Vec<Vec<Value>> = match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        };

        if self.projection.is_empty() {
            return paged;
        }
        paged
            .into_iter()
            .map(|row| self.projection.iter().map(|&i| row[i].clone()).collect())
            .collect()
    }

    /// Keeps the first row of each distinct grouping key.
    fn first_per_group(&self, rows: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
        let mut keys: Vec<Vec<Value>> = Vec::new();
        let mut kept = Vec::new();
        for row in rows {
            let key: Vec<Value> = self.group.iter().map(|&i| row[i].clone()).collect();
            if !keys.contains(&key) {
                keys.push(key);
                kept.push(row);
            }
        }
        kept
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    a == b || a.compare(b) == Some(Ordering::Equal)
}

/// Total order for sorting: comparable values by value, otherwise by kind.
fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    a.compare(b)
        .unwrap_or_else(|| kind_rank(a).cmp(&kind_rank(b)))
}

fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Integer(_) | Value::Float(_) => 2,
        Value::Text(_) => 3,
        Value::Bytes(_) => 4,
    }
}

/// SQL-style `LIKE`: `%` matches any run, `_` matches one character.
pub fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // dp[j]: pattern[..i] matches text[..j]
    let mut dp = vec![false; text.len() + 1];
    dp[0] = true;
    for &p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= dp[j];
                    next[j] = seen;
                }
            }
            _ => {
                for j in 1..=text.len() {
                    next[j] = dp[j - 1] && (p == '_' || p == text[j - 1]);
                }
            }
        }
        dp = next;
    }
    dp[text.len()]
}

//! INSERT / UPDATE / DELETE statement assembly.
//!
//! Value-map keys are matched to the table's columns case-insensitively and
//! written in the table's column order. Keys that match nothing, keys that
//! repeat a column already matched, and columns that may not be written are
//! listed in a trailing comment.

use std::collections::BTreeMap;

use crate::model::{Column, SqlValue, Table, ValueMap};
use crate::sql::{col, Delete, Dialect, Expr, ExprExt, Insert, SqlDialect, Update};

use super::error::{comment_lines, GenerateError, GenerateResult};
use super::values::value_expr;

/// A column left out of the statement, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub reason: &'static str,
}

/// Schema-qualified target table.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub table: &'a Table,
    pub schema: &'a str,
}

impl<'a> Target<'a> {
    pub fn new(table: &'a Table, default_schema: &'a str) -> Self {
        let schema = if table.schema.trim().is_empty() {
            default_schema
        } else {
            table.schema.as_str()
        };
        Self { table, schema }
    }

    fn display(&self, dialect: Dialect) -> String {
        format!(
            "{}.{}",
            dialect.quote_identifier(self.schema),
            dialect.quote_identifier(&self.table.name)
        )
    }
}

/// Pair each value with its column, in table column order.
///
/// When several keys name the same column (differing only in case), the
/// first key in map order is used and the rest are reported as duplicates.
fn matched<'t, 'v>(
    table: &'t Table,
    values: &'v ValueMap,
    skipped: &mut Vec<Skipped>,
) -> Vec<(&'t Column, &'v SqlValue)> {
    let mut claimed: BTreeMap<usize, &'v SqlValue> = BTreeMap::new();

    for (key, value) in values {
        let reason = match table.column_position(key) {
            Some(idx) if !claimed.contains_key(&idx) => {
                claimed.insert(idx, value);
                continue;
            }
            Some(_) => "duplicate column",
            None => "unknown column",
        };
        log::warn!("ignoring value for {reason} {}.{}", table.name, key);
        skipped.push(Skipped {
            name: key.clone(),
            reason,
        });
    }

    claimed
        .into_iter()
        .map(|(idx, value)| (&table.columns[idx], value))
        .collect()
}

/// WHERE predicate from match values; NULL matches with IS NULL.
fn match_predicate(table: &Table, where_values: &ValueMap, skipped: &mut Vec<Skipped>) -> Option<Expr> {
    matched(table, where_values, skipped)
        .into_iter()
        .map(|(column, value)| {
            if value.is_null() {
                col(&column.name).is_null()
            } else {
                col(&column.name).eq(value_expr(value))
            }
        })
        .reduce(|acc, p| acc.and(p))
}

fn skipped_comment(skipped: &[Skipped]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }
    let list = skipped
        .iter()
        .map(|s| format!("{} ({})", s.name, s.reason))
        .collect::<Vec<_>>()
        .join(", ");
    Some(comment_lines(&[format!("Skipped columns: {list}")]))
}

fn finish(sql: String, skipped: &[Skipped]) -> String {
    match skipped_comment(skipped) {
        Some(comment) => format!("{sql}\n{comment}"),
        None => sql,
    }
}

pub fn insert(target: Target<'_>, values: &ValueMap, dialect: Dialect) -> GenerateResult<String> {
    let mut skipped = Vec::new();
    let mut columns = Vec::new();
    let mut row = Vec::new();

    for (column, value) in matched(target.table, values, &mut skipped) {
        if column.is_computed {
            skipped.push(Skipped {
                name: column.name.clone(),
                reason: "computed",
            });
            continue;
        }
        columns.push(column.name.clone());
        row.push(value_expr(value));
    }

    if columns.is_empty() {
        return Err(GenerateError::NoWritableColumns {
            table: target.table.name.clone(),
            reason: "no insertable values supplied".into(),
        });
    }

    let sql = Insert::into(&target.table.name)
        .schema(target.schema)
        .columns(columns)
        .values(row)
        .to_sql(dialect);
    Ok(finish(sql, &skipped))
}

pub fn update(
    target: Target<'_>,
    values: &ValueMap,
    where_values: &ValueMap,
    dialect: Dialect,
) -> GenerateResult<String> {
    let mut skipped = Vec::new();
    let mut stmt = Update::table(&target.table.name).schema(target.schema);

    for (column, value) in matched(target.table, values, &mut skipped) {
        let reason = if column.is_computed {
            "computed"
        } else if column.is_primary_key {
            "primary key"
        } else {
            stmt = stmt.set(&column.name, value_expr(value));
            continue;
        };
        skipped.push(Skipped {
            name: column.name.clone(),
            reason,
        });
    }

    if stmt.set.is_empty() {
        return Err(GenerateError::NoWritableColumns {
            table: target.table.name.clone(),
            reason: "no updatable values supplied".into(),
        });
    }

    let filter = match_predicate(target.table, where_values, &mut skipped);
    let unbounded = filter.is_none();
    if let Some(filter) = filter {
        stmt = stmt.filter(filter);
    }

    let mut sql = stmt.to_sql(dialect);
    if unbounded {
        log::warn!("UPDATE of {} has no WHERE clause", target.table.name);
        sql = format!(
            "{}\n{sql}",
            comment_lines(&[format!(
                "WARNING: no WHERE clause. This UPDATE changes every row in {}.",
                target.display(dialect)
            )])
        );
    }
    Ok(finish(sql, &skipped))
}

pub fn delete(target: Target<'_>, where_values: &ValueMap, dialect: Dialect) -> GenerateResult<String> {
    let mut skipped = Vec::new();
    let mut stmt = Delete::from(&target.table.name).schema(target.schema);

    let Some(filter) = match_predicate(target.table, where_values, &mut skipped) else {
        log::warn!("DELETE from {} has no WHERE clause", target.table.name);
        let warning = comment_lines(&[format!(
            "WARNING: no WHERE clause. This DELETE removes every row in {}.",
            target.display(dialect)
        )]);
        let safety = comment_lines(&[safety_clause(target.table, dialect)]);
        let sql = format!("{warning}\n{}\n{safety}", stmt.to_sql(dialect));
        return Ok(finish(sql, &skipped));
    };

    stmt = stmt.filter(filter);
    Ok(finish(stmt.to_sql(dialect), &skipped))
}

/// Commented-out WHERE the caller can enable: the key column bound to a
/// parameter, or a predicate that matches nothing.
fn safety_clause(table: &Table, dialect: Dialect) -> String {
    match table.columns.iter().find(|c| c.is_primary_key) {
        Some(pk) => format!(
            "WHERE {} = @{}",
            dialect.quote_identifier(&pk.name),
            parameter_name(&pk.name)
        ),
        None => "WHERE 1 = 0".to_string(),
    }
}

fn parameter_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

//! SELECT list construction and output-name de-duplication.

use std::collections::HashSet;

use crate::model::{Aggregate, AggregateFunction, Column, QueryModel, Table};
use crate::sql::{
    avg, count, count_distinct, max, min, raw_sql, sum, table_col, Expr, ExprExt, SelectExpr,
};

use super::alias::AliasAllocator;
use super::error::{GenerateError, GenerateResult};
use super::join_graph::JoinPlan;

/// Placed tables with their aliases, ordered by table name.
pub struct Scope<'a> {
    pub tables: Vec<(&'a Table, String)>,
}

impl<'a> Scope<'a> {
    pub fn new(
        model: &'a QueryModel,
        plan: &JoinPlan,
        aliases: &AliasAllocator,
    ) -> GenerateResult<Self> {
        let mut tables = Vec::new();
        for idx in plan.placed() {
            let table = &model.tables[idx];
            let alias = aliases.get(&table.id).ok_or_else(|| {
                GenerateError::Internal(format!("no alias allocated for {}", table.name))
            })?;
            tables.push((table, alias.to_string()));
        }
        // Stable: same-named tables keep placement order.
        tables.sort_by_key(|(t, _)| t.name.to_lowercase());
        Ok(Self { tables })
    }

    /// Alias of a placed table, by id.
    pub fn alias_of(&self, table_id: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|(t, _)| t.id == table_id)
            .map(|(_, a)| a.as_str())
    }

    /// Selected columns of each table, ordered by column name.
    pub fn selected(&self) -> impl Iterator<Item = (&'a Table, &str, &'a Column)> + '_ {
        self.tables.iter().flat_map(|(table, alias)| {
            let table: &'a Table = *table;
            let mut columns: Vec<&'a Column> = table.selected_columns().collect();
            columns.sort_by_key(|c| c.name.to_lowercase());
            columns
                .into_iter()
                .map(move |c| (table, alias.as_str(), c))
        })
    }
}

/// Reference to a column: the parenthesized expression for computed
/// columns, `[alias].[name]` otherwise.
pub fn column_expr(alias: &str, column: &Column) -> Expr {
    match column.expression() {
        Some(expression) => raw_sql(expression).paren(),
        None => table_col(alias, &column.name),
    }
}

/// Output names already emitted in one SELECT list.
///
/// Compared case-insensitively, as SQL Server does.
#[derive(Debug, Default)]
pub struct OutputNames {
    used: HashSet<String>,
}

impl OutputNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `preferred`, or the first free fallback: `<prefix>_<name>`
    /// when a prefix is given, then `<name>_<n>`.
    pub fn claim(&mut self, preferred: &str, prefix: Option<&str>) -> String {
        let mut candidates = Vec::with_capacity(2);
        candidates.push(preferred.to_string());
        if let Some(prefix) = prefix {
            candidates.push(format!("{prefix}_{preferred}"));
        }

        let name = candidates
            .into_iter()
            .find(|c| !self.is_used(c))
            .or_else(|| {
                (1..)
                    .map(|n| format!("{preferred}_{n}"))
                    .find(|c| !self.is_used(c))
            })
            .unwrap_or_else(|| preferred.to_string());

        self.used.insert(name.to_lowercase());
        name
    }

    fn is_used(&self, name: &str) -> bool {
        self.used.contains(&name.to_lowercase())
    }
}

/// Select item for one column, aliased when renamed or de-duplicated.
fn column_item(alias: &str, column: &Column, names: &mut OutputNames) -> SelectExpr {
    let natural = column.query_alias().unwrap_or(&column.name);
    let output = names.claim(natural, Some(alias));
    let item = SelectExpr::new(column_expr(alias, column));

    if column.expression().is_some() || output != column.name {
        item.with_alias(&output)
    } else {
        item
    }
}

/// Table columns of a plain SELECT.
///
/// Falls back to each table's key column when nothing is selected.
pub fn table_items(scope: &Scope<'_>, names: &mut OutputNames) -> Vec<SelectExpr> {
    let mut items: Vec<SelectExpr> = scope
        .selected()
        .map(|(_, alias, column)| column_item(alias, column, names))
        .collect();

    if items.is_empty() {
        log::debug!("no selected columns; falling back to key columns");
        items = scope
            .tables
            .iter()
            .filter_map(|(table, alias)| {
                table
                    .key_column()
                    .map(|column| column_item(alias, column, names))
            })
            .collect();
    }

    items
}

/// Predefined `<expression> AS [alias]` items.
pub fn predefined_items(model: &QueryModel, names: &mut OutputNames) -> Vec<SelectExpr> {
    model
        .predefined_columns
        .iter()
        .filter(|p| !p.expression.trim().is_empty())
        .map(|p| {
            let alias = if p.alias.trim().is_empty() {
                "Expr"
            } else {
                p.alias.trim()
            };
            raw_sql(p.expression.trim()).alias(&names.claim(alias, None))
        })
        .collect()
}

/// Group-by columns of a grouped SELECT, with the matching GROUP BY keys.
pub fn group_items(
    model: &QueryModel,
    scope: &Scope<'_>,
    column_ids: &[String],
    names: &mut OutputNames,
) -> (Vec<SelectExpr>, Vec<Expr>) {
    let mut items = Vec::new();
    let mut keys = Vec::new();

    for id in column_ids {
        let Some((alias, column)) = placed_column(model, scope, id) else {
            continue;
        };
        items.push(column_item(alias, column, names));
        keys.push(column_expr(alias, column));
    }

    (items, keys)
}

/// Aggregate items of a grouped SELECT.
pub fn aggregate_items(
    model: &QueryModel,
    scope: &Scope<'_>,
    aggregates: &[Aggregate],
    names: &mut OutputNames,
) -> Vec<SelectExpr> {
    aggregates
        .iter()
        .filter_map(|agg| {
            let (alias, column) = placed_column(model, scope, &agg.column_id)?;
            let arg = column_expr(alias, column);
            let expr = match agg.function {
                AggregateFunction::Count => count(arg),
                AggregateFunction::Sum => sum(arg),
                AggregateFunction::Avg => avg(arg),
                AggregateFunction::Min => min(arg),
                AggregateFunction::Max => max(arg),
                AggregateFunction::CountDistinct => count_distinct(arg),
            };
            let default_alias = format!("{}_{}", agg.function.label(), column.name);
            let preferred = agg
                .alias
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or(&default_alias);
            Some(expr.alias(&names.claim(preferred, None)))
        })
        .collect()
}

/// Resolve a column id to its placed table alias and column.
fn placed_column<'a, 's>(
    model: &'a QueryModel,
    scope: &'s Scope<'_>,
    column_id: &str,
) -> Option<(&'s str, &'a Column)> {
    let Some((table, column)) = model.find_column(column_id) else {
        log::warn!("skipping unknown column id {column_id}");
        return None;
    };
    let Some(alias) = scope.alias_of(&table.id) else {
        log::warn!(
            "skipping column {}.{}: table is not part of the statement",
            table.name,
            column.name
        );
        return None;
    };
    Some((alias, column))
}

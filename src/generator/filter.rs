//! WHERE clause construction from column filters.

use crate::model::{Column, Filter, FilterOperator};
use crate::sql::{lit_str, raw_sql, Expr, ExprExt};

use super::select::{column_expr, Scope};
use super::values::filter_operand;

/// Predicate for one filter against `target`.
pub fn predicate(target: Expr, column: &Column, filter: &Filter) -> Expr {
    let operand = |v: &str| filter_operand(column, v);

    match filter.operator {
        FilterOperator::Eq => target.eq(operand(&filter.value)),
        FilterOperator::Ne => target.ne(operand(&filter.value)),
        FilterOperator::Lt => target.lt(operand(&filter.value)),
        FilterOperator::Lte => target.lte(operand(&filter.value)),
        FilterOperator::Gt => target.gt(operand(&filter.value)),
        FilterOperator::Gte => target.gte(operand(&filter.value)),
        FilterOperator::Like => target.like(lit_str(&format!("%{}%", filter.value))),
        FilterOperator::NotLike => target.not_like(lit_str(&format!("%{}%", filter.value))),
        // The value is a caller-authored SQL list.
        FilterOperator::In => target.in_list(in_values(&filter.value)),
        FilterOperator::NotIn => target.not_in_list(in_values(&filter.value)),
        FilterOperator::IsNull => target.is_null(),
        FilterOperator::IsNotNull => target.is_not_null(),
        FilterOperator::Between => match filter
            .second_value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
        {
            Some(high) => target.between(operand(&filter.value), operand(high)),
            None => target.eq(operand(&filter.value)),
        },
    }
}

fn in_values(value: &str) -> Vec<Expr> {
    let list = value.trim();
    if list.is_empty() {
        Vec::new()
    } else {
        vec![raw_sql(list)]
    }
}

/// AND of every filter on a selected column, in SELECT order.
pub fn where_clause(scope: &Scope<'_>) -> Option<Expr> {
    scope
        .selected()
        .filter_map(|(_, alias, column)| {
            column
                .filter
                .as_ref()
                .map(|f| predicate(column_expr(alias, column), column, f))
        })
        .reduce(|acc, p| acc.and(p))
}

//! Literal rendering for DML values and filter operands.

use crate::model::{Column, SqlValue};
use crate::sql::{lit_bool, lit_float, lit_int, lit_null, lit_str, raw_sql, Expr, Literal};

/// SQL Server types whose filter values are written unquoted.
const NUMERIC_TYPES: &[&str] = &[
    "int",
    "bigint",
    "smallint",
    "tinyint",
    "decimal",
    "numeric",
    "float",
    "real",
    "money",
    "smallmoney",
    "bit",
];

/// Expression for a typed DML value.
pub fn value_expr(value: &SqlValue) -> Expr {
    match value {
        SqlValue::Null => lit_null(),
        SqlValue::Bool(b) => lit_bool(*b),
        SqlValue::Int(n) => lit_int(*n),
        SqlValue::Float(f) => lit_float(*f),
        SqlValue::Guid(u) => lit_str(&u.to_string()),
        SqlValue::Timestamp(ts) => Expr::Literal(Literal::Timestamp(*ts)),
        SqlValue::Date(d) => Expr::Literal(Literal::Date(*d)),
        SqlValue::Text(s) => lit_str(s),
    }
}

/// Whether a declared type such as `DECIMAL(18, 2)` is numeric.
pub fn is_numeric_type(data_type: &str) -> bool {
    let base = data_type
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    NUMERIC_TYPES.contains(&base.as_str())
}

/// Operand for a filter value typed in by the user.
///
/// Numbers against numeric columns are written as-is; everything else
/// becomes an escaped string literal.
pub fn filter_operand(column: &Column, value: &str) -> Expr {
    if !is_numeric_type(&column.data_type) {
        return lit_str(value);
    }

    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return lit_int(n);
    }
    if is_decimal_literal(trimmed) {
        // Keep the user's spelling (trailing zeros, exponent) verbatim.
        return raw_sql(trimmed);
    }
    if column.data_type.trim().eq_ignore_ascii_case("bit") {
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return lit_bool(true),
            "false" => return lit_bool(false),
            _ => {}
        }
    }
    lit_str(value)
}

/// Plain decimal or exponent notation. Rejects `inf`, `NaN` and anything
/// else `f64::from_str` accepts that T-SQL would not.
fn is_decimal_literal(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && s.parse::<f64>().is_ok_and(f64::is_finite)
}

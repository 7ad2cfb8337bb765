//! SQL Dialect definitions and formatting rules.
//!
//! The generator targets exactly one dialect, SQL Server's T-SQL. The
//! trait still separates *what* is emitted from *how* it is spelled so that
//! every quoting and literal rule lives in one place:
//!
//! - Identifier quoting: `[name]`, with `]` doubled inside the brackets
//! - String literals: `'...'` with `''` escaping, `N'...'` for non-ASCII text
//! - Boolean literals: `1` / `0`
//! - Date literals: plain quoted strings (no `DATE` keyword)
//!
//! # Usage
//!
//! ```ignore
//! use sqlcanvas::sql::dialect::{Dialect, SqlDialect};
//!
//! let quoted = Dialect::TSql.quote_identifier("Order Details"); // [Order Details]
//! ```

pub mod helpers;
mod tsql;

pub use tsql::TSql;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// Single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    // =========================================================================
    // Date/Time
    // =========================================================================

    /// Format a date literal (`YYYY-MM-DD`).
    fn format_date_literal(&self, date: &str) -> String {
        format!("DATE '{}'", date)
    }

    /// Format a timestamp literal (`YYYY-MM-DD HH:MM:SS[.fff]`).
    fn format_timestamp_literal(&self, ts: &str) -> String {
        format!("TIMESTAMP '{}'", ts)
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    TSql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::TSql => &TSql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn format_date_literal(&self, date: &str) -> String {
        self.dialect().format_date_literal(date)
    }

    fn format_timestamp_literal(&self, ts: &str) -> String {
        self.dialect().format_timestamp_literal(ts)
    }
}

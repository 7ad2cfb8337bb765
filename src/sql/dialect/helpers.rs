//! Shared helper functions for SQL dialect implementations.
//!
//! Small reusable building blocks the `SqlDialect` implementation composes.

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with square brackets.
/// Used by: T-SQL (SQL Server, Azure SQL)
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", escape_single_quotes(s))
}

/// Quote string with N prefix for Unicode (T-SQL).
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", escape_single_quotes(s))
}

/// Double every embedded single quote.
pub fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "''")
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as numeric 1/0.
/// Used by: T-SQL
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

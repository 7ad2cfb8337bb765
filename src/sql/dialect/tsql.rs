//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL differences from ANSI that the generator relies on:
//! - Square bracket identifier quoting (`[name]`)
//! - No native boolean literal (`1`/`0`)
//! - N'...' prefix for Unicode strings
//! - Date literals are plain strings (no `DATE '...'` syntax)

use super::helpers;
use super::SqlDialect;

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_date_literal(&self, date: &str) -> String {
        format!("'{}'", date)
    }

    fn format_timestamp_literal(&self, ts: &str) -> String {
        format!("'{}'", ts)
    }
}

//! SQL emission module.
//!
//! A type-safe SQL builder for the one dialect the generator targets.
//! It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`ddl`] - CREATE TABLE
//! - [`dml`] - INSERT, UPDATE, DELETE
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementation

pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;


// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, col, count, count_distinct, lit_bool, lit_float, lit_int, lit_null, lit_str, max, min,
    raw_sql, sum, table_col, BinaryOperator, Expr, ExprExt, Literal,
};
pub use query::{Join, JoinType, Query, SelectExpr, TableRef};
pub use token::{Token, TokenStream};

pub use ddl::{ColumnDef, CreateTable};
pub use dml::{Delete, Insert, Update};

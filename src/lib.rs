//! # sqlcanvas
//!
//! Turns a visually composed graph of tables, relationships and filters
//! into T-SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Canvas model (JSON / UI)                 │
//! │     (tables, columns, relationships, filters, aliases)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [relevance]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Relevant tables (selected + connected)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [join_graph + alias]
//! ┌─────────────────────────────────────────────────────────┐
//! │         Root table + spanning JOIN plan + aliases        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [select / filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │              sql::Query → TokenStream → T-SQL            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sqlcanvas::prelude::*;
//!
//! let model = QueryModel::new().with_table(
//!     Table::new("t1", "Customers").with_column(Column::new("c1", "Name").selected()),
//! );
//! let sql = QueryGenerator::default().generate_select(&model);
//! assert_eq!(sql, "SELECT\n    [cus].[Name]\nFROM\n    [dbo].[Customers] AS [cus]");
//! ```

pub mod config;
pub mod generator;
pub mod model;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::generator::{AliasStyle, GeneratorOptions, QueryGenerator};
    pub use crate::model::{
        Aggregate, AggregateFunction, Column, Filter, FilterOperator, JoinKind, QueryModel,
        Relationship, SqlValue, Table, ValueMap,
    };
    pub use crate::sql::{Dialect, SqlDialect};
}

// Also export at crate root for convenience
pub use generator::{GeneratorOptions, QueryGenerator};
pub use model::QueryModel;

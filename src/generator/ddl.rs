//! CREATE TABLE scripts for canvas tables.

use crate::model::Table;
use crate::sql::{raw_sql, ColumnDef, CreateTable, Dialect};

use super::error::{GenerateError, GenerateResult};

/// Audit columns appended when enabled: name, type, and whether the column
/// defaults to the current time.
const AUDIT_COLUMNS: &[(&str, &str, bool)] = &[
    ("CreatedBy", "NVARCHAR(255)", false),
    ("CreatedAt", "DATETIME2", true),
    ("ModifiedBy", "NVARCHAR(255)", false),
    ("ModifiedAt", "DATETIME2", true),
];

pub fn create_table(
    table: &Table,
    default_schema: &str,
    audit_columns: bool,
    dialect: Dialect,
) -> GenerateResult<String> {
    if table.columns.is_empty() {
        return Err(GenerateError::EmptyTable(table.name.clone()));
    }

    let schema = if table.schema.trim().is_empty() {
        default_schema
    } else {
        table.schema.as_str()
    };

    let mut stmt = CreateTable::new(&table.name).schema(schema);
    for column in &table.columns {
        let def = match column.expression() {
            Some(expression) => ColumnDef::computed(&column.name, expression),
            None => {
                let mut def = ColumnDef::new(&column.name, column.declared_type());
                if !column.is_nullable {
                    def = def.not_null();
                }
                if column.is_primary_key {
                    def = def.primary_key();
                }
                def
            }
        };
        stmt = stmt.column(def);
    }

    if audit_columns {
        for &(name, data_type, stamped) in AUDIT_COLUMNS {
            if stmt.has_column(name) {
                log::debug!("{} already declares {name}; not adding audit column", table.name);
                continue;
            }
            let mut def = ColumnDef::new(name, data_type);
            if stamped {
                def = def.default(raw_sql("GETDATE()"));
            }
            stmt = stmt.column(def);
        }
    }

    Ok(stmt.to_sql(dialect))
}

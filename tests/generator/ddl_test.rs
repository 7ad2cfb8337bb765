// tests/generator/ddl_test.rs
use insta::assert_snapshot;
use sqlcanvas::model::{Column, Table};
use sqlcanvas::{GeneratorOptions, QueryGenerator};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_tsql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&MsSqlDialect {}, sql) {
        panic!("Invalid T-SQL: {}\nSQL: {}", e, sql);
    }
}

fn invoices() -> Table {
    Table::new("i", "Invoices")
        .with_column(Column::new("1", "InvoiceId").typed("INT").not_null().primary_key())
        .with_column(Column::new("2", "Customer").typed("NVARCHAR").max_length(200).not_null())
        .with_column(Column::new("3", "Net").typed("DECIMAL(18, 2)"))
        .with_column(Column::new("4", "Gross").computed("Net * 1.2"))
}

#[test]
fn test_create_table_with_audit_columns() {
    let sql = QueryGenerator::default().generate_create_table(&invoices());

    assert_snapshot!(sql, @r"
    CREATE TABLE [dbo].[Invoices] (
        [InvoiceId] INT NOT NULL PRIMARY KEY,
        [Customer] NVARCHAR(200) NOT NULL,
        [Net] DECIMAL(18, 2),
        [Gross] AS (Net * 1.2),
        [CreatedBy] NVARCHAR(255),
        [CreatedAt] DATETIME2 DEFAULT GETDATE(),
        [ModifiedBy] NVARCHAR(255),
        [ModifiedAt] DATETIME2 DEFAULT GETDATE()
    )
    ");
}

#[test]
fn test_create_table_without_audit_columns() {
    let mut generator = QueryGenerator::new(GeneratorOptions {
        audit_columns: false,
        ..GeneratorOptions::default()
    });

    let sql = generator.generate_create_table(&invoices().with_schema("billing"));

    assert_snapshot!(sql, @r"
    CREATE TABLE [billing].[Invoices] (
        [InvoiceId] INT NOT NULL PRIMARY KEY,
        [Customer] NVARCHAR(200) NOT NULL,
        [Net] DECIMAL(18, 2),
        [Gross] AS (Net * 1.2)
    )
    ");
}

#[test]
fn test_existing_audit_column_is_not_duplicated() {
    let table = Table::new("a", "Accounts")
        .with_column(Column::new("1", "Id").typed("INT").primary_key())
        .with_column(Column::new("2", "ModifiedBy").typed("INT"));

    let sql = QueryGenerator::default().generate_create_table(&table);

    assert_eq!(sql.matches("[ModifiedBy]").count(), 1);
    assert!(sql.contains("[ModifiedBy] INT,"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_table_without_columns_is_a_comment() {
    let sql = QueryGenerator::default().generate_create_table(&Table::new("e", "Empty"));

    assert_eq!(sql, "-- Unable to generate SQL: table Empty has no columns");
}

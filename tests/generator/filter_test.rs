// tests/generator/filter_test.rs
use insta::assert_snapshot;
use sqlcanvas::model::{Column, Filter, FilterOperator, QueryModel, Table};
use sqlcanvas::QueryGenerator;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_tsql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&MsSqlDialect {}, sql) {
        panic!("Invalid T-SQL: {}\nSQL: {}", e, sql);
    }
}

fn generate(columns: Vec<Column>) -> String {
    let table = columns
        .into_iter()
        .fold(Table::new("o", "Orders"), |t, c| t.with_column(c));
    QueryGenerator::default().generate_select(&QueryModel::new().with_table(table))
}

/// The WHERE clause body, or None when there is no WHERE.
fn where_body(sql: &str) -> Option<&str> {
    sql.split_once("\nWHERE\n    ").map(|(_, rest)| rest)
}

#[test]
fn test_filters_are_anded_in_select_order() {
    let sql = generate(vec![
        Column::new("1", "Status")
            .selected()
            .with_filter(Filter::new(FilterOperator::Eq, "Open")),
        Column::new("2", "Id").typed("int").primary_key().selected(),
        Column::new("3", "Qty")
            .typed("int")
            .selected()
            .with_filter(Filter::between("1", "10")),
        Column::new("4", "Region")
            .selected()
            .with_filter(Filter::new(FilterOperator::In, "'N', 'S'")),
    ]);

    assert_snapshot!(sql, @r"
    SELECT
        [ord].[Id],
        [ord].[Qty],
        [ord].[Region],
        [ord].[Status]
    FROM
        [dbo].[Orders] AS [ord]
    WHERE
        [ord].[Qty] BETWEEN 1 AND 10 AND [ord].[Region] IN ('N', 'S') AND [ord].[Status] = 'Open'
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_filters_on_unselected_columns_are_ignored() {
    let sql = generate(vec![
        Column::new("1", "Id").selected(),
        Column::new("2", "Secret").with_filter(Filter::new(FilterOperator::Eq, "x")),
    ]);

    assert_eq!(where_body(&sql), None);
}

#[test]
fn test_between_without_second_value_is_equality() {
    let sql = generate(vec![Column::new("1", "Qty")
        .typed("int")
        .selected()
        .with_filter(Filter::new(FilterOperator::Between, "5"))]);

    assert_eq!(where_body(&sql), Some("[ord].[Qty] = 5"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_like_escapes_and_wraps() {
    let sql = generate(vec![Column::new("1", "Name")
        .selected()
        .with_filter(Filter::new(FilterOperator::Like, "O'Brien"))]);

    assert_eq!(where_body(&sql), Some("[ord].[Name] LIKE '%O''Brien%'"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_unicode_value_is_national_string() {
    let sql = generate(vec![Column::new("1", "City")
        .selected()
        .with_filter(Filter::new(FilterOperator::NotLike, "Zürich"))]);

    assert_eq!(where_body(&sql), Some("[ord].[City] NOT LIKE N'%Zürich%'"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_null_checks() {
    let sql = generate(vec![
        Column::new("1", "ShippedAt")
            .typed("datetime2")
            .selected()
            .with_filter(Filter::new(FilterOperator::IsNull, "ignored")),
        Column::new("2", "Total")
            .typed("money")
            .selected()
            .with_filter(Filter::new(FilterOperator::IsNotNull, "")),
    ]);

    assert_eq!(
        where_body(&sql),
        Some("[ord].[ShippedAt] IS NULL AND [ord].[Total] IS NOT NULL")
    );
    assert_valid_tsql(&sql);
}

#[test]
fn test_computed_column_filter_uses_expression() {
    let sql = generate(vec![Column::new("1", "LineTotal")
        .typed("decimal(18, 2)")
        .computed("Price * Qty")
        .selected()
        .with_filter(Filter::new(FilterOperator::Gt, "100.00"))]);

    assert_eq!(where_body(&sql), Some("(Price * Qty) > 100.00"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_numeric_value_on_text_column_stays_quoted() {
    let sql = generate(vec![Column::new("1", "Zip")
        .typed("nvarchar")
        .max_length(10)
        .selected()
        .with_filter(Filter::new(FilterOperator::Ne, "02134"))]);

    assert_eq!(where_body(&sql), Some("[ord].[Zip] <> '02134'"));
}

#[test]
fn test_empty_in_list_matches_nothing() {
    let sql = generate(vec![Column::new("1", "Region")
        .selected()
        .with_filter(Filter::new(FilterOperator::In, ""))]);

    assert_eq!(where_body(&sql), Some("1 = 0"));
    assert_valid_tsql(&sql);
}

// tests/generator/grouped_test.rs
use insta::assert_snapshot;
use sqlcanvas::model::{
    Aggregate, AggregateFunction, Column, Filter, FilterOperator, QueryModel, Relationship, Table,
};
use sqlcanvas::QueryGenerator;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_tsql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&MsSqlDialect {}, sql) {
        panic!("Invalid T-SQL: {}\nSQL: {}", e, sql);
    }
}

fn sales() -> QueryModel {
    QueryModel::new()
        .with_table(
            Table::new("orders", "Orders")
                .with_column(Column::new("o.id", "Id").typed("int").primary_key())
                .with_column(Column::new("o.cust", "CustomerId").typed("int").foreign_key())
                .with_column(Column::new("o.amount", "Amount").typed("decimal(18, 2)")),
        )
        .with_table(
            Table::new("customers", "Customers")
                .with_column(Column::new("c.id", "Id").typed("int").primary_key())
                .with_column(Column::new("c.name", "Name"))
                .with_column(Column::new("c.region", "Region")),
        )
        .with_relationship(Relationship::new(
            "r1",
            ("orders", "o.cust"),
            ("customers", "c.id"),
        ))
}

#[test]
fn test_group_by_with_aggregates() {
    let aggregates = vec![
        Aggregate::new(AggregateFunction::Sum, "o.amount"),
        Aggregate::new(AggregateFunction::CountDistinct, "o.id").with_alias("Orders"),
    ];

    let sql = QueryGenerator::default().generate_grouped_select(
        &sales(),
        &["c.name".to_string()],
        &aggregates,
    );

    assert_snapshot!(sql, @r"
    SELECT
        [cus].[Name],
        SUM([ord].[Amount]) AS [Sum_Amount],
        COUNT(DISTINCT [ord].[Id]) AS [Orders]
    FROM
        [dbo].[Orders] AS [ord]
    INNER JOIN [dbo].[Customers] AS [cus]
        ON [ord].[CustomerId] = [cus].[Id]
    GROUP BY
        [cus].[Name]
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_default_aliases_are_deduplicated() {
    let aggregates = vec![
        Aggregate::new(AggregateFunction::Sum, "o.amount"),
        Aggregate::new(AggregateFunction::Sum, "o.amount").with_alias("  "),
        Aggregate::new(AggregateFunction::CountDistinct, "o.id"),
    ];

    let sql = QueryGenerator::default().generate_grouped_select(&sales(), &[], &aggregates);

    assert_snapshot!(sql, @r"
    SELECT
        SUM([ord].[Amount]) AS [Sum_Amount],
        SUM([ord].[Amount]) AS [Sum_Amount_1],
        COUNT(DISTINCT [ord].[Id]) AS [CountDistinct_Id]
    FROM
        [dbo].[Orders] AS [ord]
    INNER JOIN [dbo].[Customers] AS [cus]
        ON [ord].[CustomerId] = [cus].[Id]
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_filters_and_order_by_apply() {
    let mut model = sales();
    model.tables[1].columns[2] = Column::new("c.region", "Region")
        .selected()
        .with_filter(Filter::new(FilterOperator::Eq, "West"));
    model.order_by_columns = vec!["[cus].[Region]".to_string()];
    let aggregates = vec![Aggregate::new(AggregateFunction::Max, "o.amount").with_alias("Largest")];

    let sql = QueryGenerator::default().generate_grouped_select(
        &model,
        &["c.region".to_string()],
        &aggregates,
    );

    assert_snapshot!(sql, @r"
    SELECT
        [cus].[Region],
        MAX([ord].[Amount]) AS [Largest]
    FROM
        [dbo].[Customers] AS [cus]
    INNER JOIN [dbo].[Orders] AS [ord]
        ON [ord].[CustomerId] = [cus].[Id]
    WHERE
        [cus].[Region] = 'West'
    GROUP BY
        [cus].[Region]
    ORDER BY
        [cus].[Region]
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_unknown_columns_are_skipped() {
    let sql = QueryGenerator::default().generate_grouped_select(
        &sales(),
        &["missing".to_string(), "c.name".to_string()],
        &[Aggregate::new(AggregateFunction::Count, "also-missing")],
    );

    assert_snapshot!(sql, @r"
    SELECT
        [cus].[Name]
    FROM
        [dbo].[Orders] AS [ord]
    INNER JOIN [dbo].[Customers] AS [cus]
        ON [ord].[CustomerId] = [cus].[Id]
    GROUP BY
        [cus].[Name]
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_nothing_to_group_is_a_comment() {
    let sql = QueryGenerator::default().generate_grouped_select(&sales(), &[], &[]);

    assert!(sql.starts_with("-- No tables selected or connected."));
}

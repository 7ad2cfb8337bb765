// tests/generator/join_graph_test.rs
use std::collections::HashSet;

use insta::assert_snapshot;
use sqlcanvas::generator::{AliasStyle, GeneratorOptions};
use sqlcanvas::model::{Column, JoinKind, QueryModel, Relationship, Table};
use sqlcanvas::QueryGenerator;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_tsql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&MsSqlDialect {}, sql) {
        panic!("Invalid T-SQL: {}\nSQL: {}", e, sql);
    }
}

/// Table with a selected `Id` and one unselected foreign key column.
fn table(id: &str, name: &str, fk: &str) -> Table {
    Table::new(id, name)
        .with_column(Column::new(format!("{id}.id"), "Id").primary_key().selected())
        .with_column(Column::new(format!("{id}.fk"), fk).foreign_key())
}

fn fk(id: &str, from: &str, to: &str) -> Relationship {
    Relationship::new(
        id,
        (from, format!("{from}.fk").as_str()),
        (to, format!("{to}.id").as_str()),
    )
}

fn triangle() -> QueryModel {
    QueryModel::new()
        .with_table(table("a", "Alpha", "BId"))
        .with_table(table("b", "Beta", "CId"))
        .with_table(table("c", "Gamma", "AId"))
        .with_relationship(fk("r1", "a", "b"))
        .with_relationship(fk("r2", "b", "c"))
        .with_relationship(fk("r3", "c", "a"))
}

#[test]
fn test_cycle_joins_each_table_once() {
    let sql = QueryGenerator::default().generate_select(&triangle());

    assert_snapshot!(sql, @r"
    SELECT
        [alp].[Id],
        [bet].[Id] AS [bet_Id],
        [gam].[Id] AS [gam_Id]
    FROM
        [dbo].[Alpha] AS [alp]
    INNER JOIN [dbo].[Beta] AS [bet]
        ON [alp].[BId] = [bet].[Id]
    INNER JOIN [dbo].[Gamma] AS [gam]
        ON [bet].[CId] = [gam].[Id]
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_inner_joins_are_emitted_before_outer() {
    let model = QueryModel::new()
        .with_table(table("h", "Hub", "Unused"))
        .with_table(table("x", "Extra", "Unused"))
        .with_table(table("y", "Yard", "Unused"))
        .with_relationship(
            Relationship::new("r1", ("x", "x.fk"), ("h", "h.id")).kind(JoinKind::Left),
        )
        .with_relationship(Relationship::new("r2", ("y", "y.fk"), ("h", "h.id")));

    let sql = QueryGenerator::default().generate_select(&model);

    let inner = sql.find("INNER JOIN [dbo].[Yard]").unwrap();
    let left = sql.find("LEFT JOIN [dbo].[Extra]").unwrap();
    assert!(inner < left, "{sql}");
    assert!(sql.contains("ON [ext].[Unused] = [hub].[Id]"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_colliding_prefixes_get_unique_aliases() {
    let model = QueryModel::new()
        .with_table(table("1", "Customers", "Unused"))
        .with_table(table("2", "Customer_Notes", "CustomerId"))
        .with_table(table("3", "Cusp", "CustomerId"))
        .with_relationship(fk("r1", "2", "1"))
        .with_relationship(fk("r2", "3", "1"));
    let mut generator = QueryGenerator::default();

    let sql = generator.generate_select(&model);

    let aliases: Vec<&str> = ["1", "2", "3"]
        .iter()
        .map(|id| generator.table_alias(id).unwrap())
        .collect();
    assert_eq!(aliases, vec!["cus", "cus1", "cus2"]);
    assert_eq!(aliases.iter().collect::<HashSet<_>>().len(), 3);
    assert!(sql.contains("AS [cus1]"));
    assert_valid_tsql(&sql);
}

#[test]
fn test_user_alias_collision_falls_back_to_synthesized() {
    let model = QueryModel::new()
        .with_table(table("1", "Orders", "Unused").with_alias("o"))
        .with_table(table("2", "Owners", "OrderId").with_alias("O"))
        .with_relationship(fk("r1", "2", "1"));
    let mut generator = QueryGenerator::default();

    generator.generate_select(&model);

    assert_eq!(generator.table_alias("1"), Some("o"));
    assert_eq!(generator.table_alias("2"), Some("own"));
}

#[test]
fn test_word_alias_style() {
    let model = QueryModel::new().with_table(table("1", "Order_Line Items", "Unused"));
    let mut generator = QueryGenerator::new(GeneratorOptions {
        alias_style: AliasStyle::Words,
        ..GeneratorOptions::default()
    });

    let sql = generator.generate_select(&model);

    assert_eq!(generator.table_alias("1"), Some("oli"));
    assert!(sql.ends_with("[dbo].[Order_Line Items] AS [oli]"));
}

fn islands() -> QueryModel {
    QueryModel::new()
        .with_table(table("o", "Orders", "CustomerId"))
        .with_table(table("c", "Customers", "Unused"))
        .with_table(table("p", "Products", "Unused"))
        .with_relationship(fk("r1", "o", "c"))
}

#[test]
fn test_disconnected_tables_are_dropped_with_warning() {
    let sql = QueryGenerator::default().generate_select(&islands());

    assert_snapshot!(sql, @r"
    SELECT
        [cus].[Id],
        [ord].[Id] AS [ord_Id]
    FROM
        [dbo].[Orders] AS [ord]
    INNER JOIN [dbo].[Customers] AS [cus]
        ON [ord].[CustomerId] = [cus].[Id]
    -- Warning: table(s) not connected to the join graph were omitted: Products
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_strict_mode_refuses_disconnected_tables() {
    let mut generator = QueryGenerator::new(GeneratorOptions {
        strict_connectivity: true,
        ..GeneratorOptions::default()
    });

    let sql = generator.generate_select(&islands());

    assert_eq!(
        sql,
        "-- Unable to generate SQL: table(s) not connected to the join graph: Products"
    );
}

#[test]
fn test_strict_mode_accepts_connected_model() {
    let mut generator = QueryGenerator::new(GeneratorOptions {
        strict_connectivity: true,
        ..GeneratorOptions::default()
    });

    let sql = generator.generate_select(&triangle());

    assert!(sql.starts_with("SELECT"));
}

#[test]
fn test_long_relationship_chain() {
    const LEN: usize = 4000;
    let mut model = QueryModel::new();
    for i in 0..LEN {
        let mut t = Table::new(format!("t{i}"), format!("Node{i}"))
            .with_alias(format!("n{i}"))
            .with_column(Column::new(format!("t{i}.id"), "Id").primary_key())
            .with_column(Column::new(format!("t{i}.fk"), "NextId").foreign_key());
        if i == 0 {
            t.columns[0].is_selected = true;
        }
        model = model.with_table(t);
    }
    for i in 0..LEN - 1 {
        let (from, to) = (format!("t{i}"), format!("t{}", i + 1));
        model = model.with_relationship(fk(&format!("r{i}"), &from, &to));
    }

    let sql = QueryGenerator::default().generate_select(&model);

    assert_eq!(sql.lines().count(), 4 + 2 * (LEN - 1));
    assert!(sql.starts_with("SELECT\n    [n0].[Id]\nFROM\n    [dbo].[Node0] AS [n0]\n"));
    assert!(sql.ends_with(
        "INNER JOIN [dbo].[Node3999] AS [n3999]\n    ON [n3998].[NextId] = [n3999].[Id]"
    ));
}

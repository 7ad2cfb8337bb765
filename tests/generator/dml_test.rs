// tests/generator/dml_test.rs
use chrono::NaiveDate;
use insta::assert_snapshot;
use sqlcanvas::model::{Column, SqlValue, Table, ValueMap};
use sqlcanvas::QueryGenerator;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_tsql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&MsSqlDialect {}, sql) {
        panic!("Invalid T-SQL: {}\nSQL: {}", e, sql);
    }
}

fn customers() -> Table {
    Table::new("c", "Customers")
        .with_schema("crm")
        .with_column(Column::new("1", "Id").typed("int").primary_key())
        .with_column(Column::new("2", "Name").typed("nvarchar").max_length(100))
        .with_column(Column::new("3", "Active").typed("bit"))
        .with_column(Column::new("4", "Joined").typed("date"))
        .with_column(Column::new("5", "Label").computed("Name + N' (' + CAST(Id AS nvarchar) + N')'"))
}

fn values(json: &str) -> ValueMap {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_insert_from_json_values() {
    let row = values(r#"{"name": "O'Hara", "Id": 12, "Active": true, "Joined": "2024-03-01"}"#);
    assert_eq!(
        row["Joined"],
        SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );

    let sql = QueryGenerator::default().generate_insert(&customers(), &row);

    assert_snapshot!(sql, @r"
    INSERT INTO [crm].[Customers] ([Id], [Name], [Active], [Joined])
    VALUES (12, 'O''Hara', 1, '2024-03-01')
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_insert_skips_computed_and_unknown() {
    let row = values(r#"{"Name": "Ada", "Label": "x", "Nickname": "A"}"#);

    let sql = QueryGenerator::default().generate_insert(&customers(), &row);

    assert_snapshot!(sql, @r"
    INSERT INTO [crm].[Customers] ([Name])
    VALUES ('Ada')
    -- Skipped columns: Nickname (unknown column), Label (computed)
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_repeated_key_in_other_case_is_reported() {
    let row = values(r#"{"Name": "Ada", "name": "Grace"}"#);

    let sql = QueryGenerator::default().generate_insert(&customers(), &row);

    assert_snapshot!(sql, @r"
    INSERT INTO [crm].[Customers] ([Name])
    VALUES ('Ada')
    -- Skipped columns: name (duplicate column)
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_insert_with_only_computed_values_is_a_comment() {
    let row = values(r#"{"Label": "x"}"#);

    let sql = QueryGenerator::default().generate_insert(&customers(), &row);

    assert_eq!(
        sql,
        "-- Unable to generate SQL: no writable columns for Customers: no insertable values supplied"
    );
}

#[test]
fn test_update_with_where() {
    let set = values(r#"{"Name": "Grace", "Active": false, "Id": 99}"#);
    let filter = values(r#"{"Id": 7}"#);

    let sql = QueryGenerator::default().generate_update(&customers(), &set, &filter);

    assert_snapshot!(sql, @r"
    UPDATE [crm].[Customers]
    SET
        [Name] = 'Grace',
        [Active] = 0
    WHERE
        [Id] = 7
    -- Skipped columns: Id (primary key)
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_update_without_where_warns() {
    let set = values(r#"{"Active": false}"#);

    let sql = QueryGenerator::default().generate_update(&customers(), &set, &ValueMap::new());

    assert_snapshot!(sql, @r"
    -- WARNING: no WHERE clause. This UPDATE changes every row in [crm].[Customers].
    UPDATE [crm].[Customers]
    SET
        [Active] = 0
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_update_of_key_only_is_a_comment() {
    let set = values(r#"{"Id": 1}"#);

    let sql = QueryGenerator::default().generate_update(&customers(), &set, &values(r#"{"Id": 2}"#));

    assert!(sql.starts_with("-- Unable to generate SQL: no writable columns for Customers"));
}

#[test]
fn test_delete_with_where() {
    let filter = values(r#"{"Active": false, "Joined": null}"#);

    let sql = QueryGenerator::default().generate_delete(&customers(), &filter);

    assert_snapshot!(sql, @r"
    DELETE FROM [crm].[Customers]
    WHERE
        [Active] = 0 AND [Joined] IS NULL
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_delete_without_where_is_commented_out() {
    let sql = QueryGenerator::default().generate_delete(&customers(), &ValueMap::new());

    assert_snapshot!(sql, @r"
    -- WARNING: no WHERE clause. This DELETE removes every row in [crm].[Customers].
    DELETE FROM [crm].[Customers]
    -- WHERE [Id] = @Id
    ");
    assert_valid_tsql(&sql);
}

#[test]
fn test_blank_schema_uses_configured_default() {
    let table = Table::new("t", "Notes")
        .with_schema("")
        .with_column(Column::new("1", "Body"));
    let mut generator = QueryGenerator::new(sqlcanvas::GeneratorOptions {
        default_schema: "app".to_string(),
        ..Default::default()
    });

    let sql = generator.generate_insert(&table, &values(r#"{"Body": "hi"}"#));

    assert!(sql.starts_with("INSERT INTO [app].[Notes] ([Body])"));
}

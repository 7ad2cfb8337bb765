//! Canvas data model.
//!
//! These types mirror what the canvas UI serializes when it asks for SQL:
//! tables with their columns, the relationships drawn between columns, and
//! the per-column filters. The generator only ever reads them.
//!
//! JSON field names are camelCase, matching the UI's wire format.

pub mod value;

use serde::{Deserialize, Serialize};

pub use value::{SqlValue, ValueMap};

fn default_schema() -> String {
    "dbo".to_string()
}

fn default_data_type() -> String {
    "nvarchar".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Table / Column
// =============================================================================

/// A table placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    /// User-declared alias; blank means "synthesize one".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Canvas geometry. Never read by the generator.
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub size: Size,
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            schema: default_schema(),
            alias: None,
            columns: Vec::new(),
            position: Position::default(),
            size: Size::default(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Position of the column with this name, compared case-insensitively.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn selected_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_columns().count()
    }

    /// The primary key column, or the first column when none is flagged.
    pub fn key_column(&self) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.is_primary_key)
            .or_else(|| self.columns.first())
    }
}

/// A column of a canvas table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    /// Output rename applied in SELECT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub is_computed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            alias: None,
            data_type: default_data_type(),
            max_length: None,
            is_nullable: true,
            is_primary_key: false,
            is_foreign_key: false,
            is_selected: false,
            is_computed: false,
            computed_expression: None,
            filter: None,
        }
    }

    pub fn typed(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    pub fn max_length(mut self, len: u32) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    pub fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }

    pub fn computed(mut self, expression: impl Into<String>) -> Self {
        self.is_computed = true;
        self.computed_expression = Some(expression.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// The computed expression, if this column is computed and has one.
    pub fn expression(&self) -> Option<&str> {
        if !self.is_computed {
            return None;
        }
        self.computed_expression
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// The non-blank query alias, if any.
    pub fn query_alias(&self) -> Option<&str> {
        self.alias.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// Declared type including length, e.g. `nvarchar(50)`.
    pub fn declared_type(&self) -> String {
        match self.max_length {
            Some(len) => format!("{}({})", self.data_type, len),
            None => self.data_type.clone(),
        }
    }
}

/// Canvas position. Opaque to the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Canvas size. Opaque to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 250.0,
            height: 300.0,
        }
    }
}

// =============================================================================
// Relationships
// =============================================================================

/// Join kind declared on a relationship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    FullOuter,
    Cross,
}

impl JoinKind {
    /// Ordering used when several relationships leave the same table:
    /// inner joins are emitted first.
    pub fn rank(self) -> u8 {
        match self {
            JoinKind::Inner => 0,
            JoinKind::Left => 1,
            JoinKind::Right => 2,
            JoinKind::FullOuter => 3,
            JoinKind::Cross => 4,
        }
    }
}

/// A relationship drawn between two columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source_table_id: String,
    pub source_column_id: String,
    pub target_table_id: String,
    pub target_column_id: String,
    #[serde(default)]
    pub join_type: JoinKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        (source_table_id, source_column_id): (&str, &str),
        (target_table_id, target_column_id): (&str, &str),
    ) -> Self {
        Self {
            id: id.into(),
            source_table_id: source_table_id.into(),
            source_column_id: source_column_id.into(),
            target_table_id: target_table_id.into(),
            target_column_id: target_column_id.into(),
            join_type: JoinKind::Inner,
            name: None,
            cardinality: None,
        }
    }

    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.join_type = kind;
        self
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Filter operators offered by the column filter editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=", alias = "<>")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "NOT LIKE")]
    NotLike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
    #[serde(rename = "BETWEEN")]
    Between,
}

/// A filter attached to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: String,
    /// Upper bound for BETWEEN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_value: Option<String>,
}

impl Filter {
    pub fn new(operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
            second_value: None,
        }
    }

    pub fn between(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            operator: FilterOperator::Between,
            value: low.into(),
            second_value: Some(high.into()),
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// A literal output column appended after the table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredefinedColumn {
    /// SQL expression, emitted verbatim.
    pub expression: String,
    pub alias: String,
}

/// Snapshot of the whole canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// GROUP BY entries, emitted verbatim.
    #[serde(default)]
    pub group_by_columns: Vec<String>,
    /// ORDER BY entries, emitted verbatim.
    #[serde(default)]
    pub order_by_columns: Vec<String>,
    #[serde(default)]
    pub predefined_columns: Vec<PredefinedColumn>,
}

impl QueryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_predefined(mut self, expression: &str, alias: &str) -> Self {
        self.predefined_columns.push(PredefinedColumn {
            expression: expression.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Find the table owning a column id.
    pub fn find_column(&self, column_id: &str) -> Option<(&Table, &Column)> {
        self.tables
            .iter()
            .find_map(|t| t.column(column_id).map(|c| (t, c)))
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Aggregate functions available in grouped queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    CountDistinct,
}

impl AggregateFunction {
    /// Name used in default output aliases (`Sum_Amount`).
    pub fn label(self) -> &'static str {
        match self {
            AggregateFunction::Count => "Count",
            AggregateFunction::Sum => "Sum",
            AggregateFunction::Avg => "Avg",
            AggregateFunction::Min => "Min",
            AggregateFunction::Max => "Max",
            AggregateFunction::CountDistinct => "CountDistinct",
        }
    }
}

impl std::str::FromStr for AggregateFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "COUNT" => Ok(AggregateFunction::Count),
            "SUM" => Ok(AggregateFunction::Sum),
            "AVG" => Ok(AggregateFunction::Avg),
            "MIN" => Ok(AggregateFunction::Min),
            "MAX" => Ok(AggregateFunction::Max),
            "COUNT_DISTINCT" | "COUNTDISTINCT" => Ok(AggregateFunction::CountDistinct),
            other => Err(format!("unknown aggregate function: {other}")),
        }
    }
}

/// An aggregate over one column, for grouped queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub column_id: String,
    pub function: AggregateFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Aggregate {
    pub fn new(function: AggregateFunction, column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            function,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

//! CREATE TABLE builder.
//!
//! Column types are carried as the declared type text (`NVARCHAR(50)`,
//! `DECIMAL(18, 2)`) rather than a portable type enum, since only one
//! dialect is targeted.

use super::dialect::Dialect;
use super::expr::Expr;
use super::token::{Token, TokenStream};

/// CREATE TABLE statement, one column definition per line.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl CreateTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Whether a column with this name (case-insensitive) is already defined.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Create)
            .space()
            .push(Token::Table)
            .space()
            .push(Token::QualifiedIdent {
                schema: self.schema.clone(),
                name: self.name.clone(),
            })
            .space()
            .lparen();

        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1).append(&col.to_tokens());
        }

        ts.newline().rparen();
        ts
    }
}

/// One column of a CREATE TABLE.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    /// Declared type, emitted verbatim.
    pub data_type: String,
    pub not_null: bool,
    pub default: Option<Expr>,
    pub primary_key: bool,
    /// Computed column expression; replaces the type and constraints.
    pub computed: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            not_null: false,
            default: None,
            primary_key: false,
            computed: None,
        }
    }

    /// `[name] AS (expression)`.
    pub fn computed(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            computed: Some(expression.into()),
            ..Self::new(name, "")
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default(mut self, expr: Expr) -> Self {
        self.default = Some(expr);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone())).space();

        if let Some(expression) = &self.computed {
            ts.push(Token::As)
                .space()
                .lparen()
                .push(Token::Raw(expression.clone()))
                .rparen();
            return ts;
        }

        ts.push(Token::Raw(self.data_type.clone()));
        if self.not_null {
            ts.space().push(Token::Not).space().push(Token::Null);
        }
        if let Some(default) = &self.default {
            ts.space()
                .push(Token::Default)
                .space()
                .append(&default.to_tokens());
        }
        if self.primary_key {
            ts.space().push(Token::Primary).space().push(Token::Key);
        }
        ts
    }
}

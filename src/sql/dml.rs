//! Single-row write statements against one table: INSERT, UPDATE, DELETE.

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

fn target(schema: &Option<String>, table: &str) -> Token {
    Token::QualifiedIdent {
        schema: schema.clone(),
        name: table.to_string(),
    }
}

fn and_onto(existing: Option<Expr>, condition: Expr) -> Option<Expr> {
    Some(match existing {
        Some(existing) => existing.and(condition),
        None => condition,
    })
}

fn push_where(ts: &mut TokenStream, filter: &Option<Expr>) {
    if let Some(filter) = filter {
        ts.newline()
            .push(Token::Where)
            .newline()
            .indent(1)
            .append(&filter.to_tokens());
    }
}

/// `INSERT INTO t (cols) VALUES (row)`.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Insert {
    pub schema: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Expr>,
}

impl Insert {
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Row of values, positionally matching `columns`.
    pub fn values(mut self, values: Vec<Expr>) -> Self {
        self.values = values;
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(target(&self.schema, &self.table))
            .space()
            .lparen();
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(col.clone()));
        }
        ts.rparen();

        ts.newline().push(Token::Values).space().lparen();
        for (i, val) in self.values.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&val.to_tokens());
        }
        ts.rparen();
        ts
    }
}

/// `UPDATE t SET ... [WHERE ...]`, one assignment per line.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Update {
    pub schema: Option<String>,
    pub table: String,
    pub set: Vec<(String, Expr)>,
    pub filter: Option<Expr>,
}

impl Update {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            set: Vec::new(),
            filter: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: Expr) -> Self {
        self.set.push((column.into(), value));
        self
    }

    /// Add a WHERE condition, ANDed onto any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter = and_onto(self.filter, condition);
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Update)
            .space()
            .push(target(&self.schema, &self.table))
            .newline()
            .push(Token::Set);
        for (i, (col, value)) in self.set.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline()
                .indent(1)
                .push(Token::Ident(col.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&value.to_tokens());
        }
        push_where(&mut ts, &self.filter);
        ts
    }
}

/// `DELETE FROM t [WHERE ...]`.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Delete {
    pub schema: Option<String>,
    pub table: String,
    pub filter: Option<Expr>,
}

impl Delete {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            filter: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a WHERE condition, ANDed onto any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter = and_onto(self.filter, condition);
        self
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Delete)
            .space()
            .push(Token::From)
            .space()
            .push(target(&self.schema, &self.table));
        push_where(&mut ts, &self.filter);
        ts
    }
}

//! SELECT statement builder.
//!
//! Layout is fixed: every clause keyword on its own line, its body indented
//! one level underneath, joins flush left with `ON` indented below them.

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

/// A SELECT list item: expression with optional output alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.expr.to_tokens();
        push_alias(&mut ts, self.alias.as_deref());
        ts
    }
}

/// `[schema].[table] AS [alias]`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.table.clone(),
        });
        push_alias(&mut ts, self.alias.as_deref());
        ts
    }
}

fn push_alias(ts: &mut TokenStream, alias: Option<&str>) {
    if let Some(alias) = alias {
        ts.space()
            .push(Token::As)
            .space()
            .push(Token::Ident(alias.to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    fn keyword(self) -> Token {
        match self {
            JoinType::Inner => Token::Inner,
            JoinType::Left => Token::Left,
            JoinType::Right => Token::Right,
            JoinType::Full => Token::Full,
            JoinType::Cross => Token::Cross,
        }
    }
}

/// A JOIN clause. `on` is `None` only for CROSS JOIN.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Option<Expr>,
}

impl Join {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(self.join_type.keyword()).space();
        if self.join_type == JoinType::Full {
            ts.push(Token::Outer).space();
        }
        ts.push(Token::Join).space().append(&self.table.to_tokens());

        if let Some(on) = &self.on {
            ts.newline()
                .indent(1)
                .push(Token::On)
                .space()
                .append(&on.to_tokens());
        }
        ts
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<Expr>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, items: Vec<SelectExpr>) -> Self {
        self.select = items;
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    pub fn join(mut self, join_type: JoinType, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join_type,
            table,
            on: Some(on),
        });
        self
    }

    pub fn cross_join(mut self, table: TableRef) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Cross,
            table,
            on: None,
        });
        self
    }

    /// Add a WHERE condition, ANDed onto any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn order_by(mut self, exprs: Vec<Expr>) -> Self {
        self.order_by = exprs;
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1).append(&item.to_tokens());
        }

        if let Some(from) = &self.from {
            clause(&mut ts, Token::From).append(&from.to_tokens());
        }

        for join in &self.joins {
            ts.newline().append(&join.to_tokens());
        }

        if let Some(condition) = &self.where_clause {
            clause(&mut ts, Token::Where).append(&condition.to_tokens());
        }

        if !self.group_by.is_empty() {
            clause(&mut ts, Token::GroupBy);
            inline_list(&mut ts, &self.group_by);
        }

        if !self.order_by.is_empty() {
            clause(&mut ts, Token::OrderBy);
            inline_list(&mut ts, &self.order_by);
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens().serialize(dialect)
    }
}

/// Clause keyword on its own line, then an indented body line.
fn clause(ts: &mut TokenStream, keyword: Token) -> &mut TokenStream {
    ts.newline().push(keyword).newline().indent(1)
}

fn inline_list(ts: &mut TokenStream, exprs: &[Expr]) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&expr.to_tokens());
    }
}

//! Tokens: the atoms every generated statement is assembled from.
//!
//! Builders push tokens; only [`Token::serialize`] knows how a token is
//! spelled, and it asks the dialect for anything that needs quoting.

use super::dialect::{Dialect, SqlDialect};

/// One element of a generated statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Clauses and keywords
    Select,
    From,
    Where,
    And,
    Not,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    GroupBy,
    OrderBy,
    In,
    Between,
    Like,
    IsNull,
    IsNotNull,
    Distinct,
    Null,
    Create,
    Table,
    Primary,
    Key,
    Default,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,

    // Punctuation and comparison
    Comma,
    Dot,
    LParen,
    RParen,
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,

    // Layout
    Space,
    Newline,
    /// Four spaces per level.
    Indent(usize),

    /// Table, column or alias name.
    Ident(String),
    /// `[schema].[name]`, or `[name]` alone when there is no schema.
    QualifiedIdent {
        schema: Option<String>,
        name: String,
    },
    LitInt(i64),
    LitFloat(f64),
    LitString(String),
    LitBool(bool),
    LitNull,
    /// Pre-formatted `YYYY-MM-DD`.
    LitDate(String),
    /// Pre-formatted `YYYY-MM-DD HH:MM:SS[.fff]`.
    LitTimestamp(String),
    /// Upper-cased on output.
    FunctionName(String),
    /// `-- text`, always a single line.
    Comment(String),
    /// SQL the canvas user typed on purpose (computed expressions, IN lists,
    /// predefined columns, GROUP BY / ORDER BY entries). Emitted unescaped,
    /// so values must never travel through here.
    Raw(String),
}

impl Token {
    /// Fixed spelling, for tokens that have one.
    fn keyword(&self) -> Option<&'static str> {
        let text = match self {
            Token::Select => "SELECT",
            Token::From => "FROM",
            Token::Where => "WHERE",
            Token::And => "AND",
            Token::Not => "NOT",
            Token::As => "AS",
            Token::On => "ON",
            Token::Join => "JOIN",
            Token::Inner => "INNER",
            Token::Left => "LEFT",
            Token::Right => "RIGHT",
            Token::Full => "FULL",
            Token::Outer => "OUTER",
            Token::Cross => "CROSS",
            Token::GroupBy => "GROUP BY",
            Token::OrderBy => "ORDER BY",
            Token::In => "IN",
            Token::Between => "BETWEEN",
            Token::Like => "LIKE",
            Token::IsNull => "IS NULL",
            Token::IsNotNull => "IS NOT NULL",
            Token::Distinct => "DISTINCT",
            Token::Null => "NULL",
            Token::Create => "CREATE",
            Token::Table => "TABLE",
            Token::Primary => "PRIMARY",
            Token::Key => "KEY",
            Token::Default => "DEFAULT",
            Token::Insert => "INSERT",
            Token::Into => "INTO",
            Token::Values => "VALUES",
            Token::Update => "UPDATE",
            Token::Set => "SET",
            Token::Delete => "DELETE",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Space => " ",
            Token::Newline => "\n",
            _ => return None,
        };
        Some(text)
    }

    /// Spell this token for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        if let Some(text) = self.keyword() {
            return text.to_string();
        }
        match self {
            Token::Indent(level) => "    ".repeat(*level),
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::QualifiedIdent { schema, name } => {
                let name = dialect.quote_identifier(name);
                match schema {
                    Some(schema) => format!("{}.{name}", dialect.quote_identifier(schema)),
                    None => name,
                }
            }
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                assert!(f.is_finite(), "Cannot serialize non-finite float {f} to SQL");
                ryu::Buffer::new().format_finite(*f).to_string()
            }
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitBool(b) => dialect.format_bool(*b).to_string(),
            Token::LitNull => dialect.format_null().to_string(),
            Token::LitDate(d) => dialect.format_date_literal(d),
            Token::LitTimestamp(ts) => dialect.format_timestamp_literal(ts),
            Token::FunctionName(name) => name.to_uppercase(),
            // An embedded newline would end the comment and leak the rest as SQL.
            Token::Comment(text) => format!("-- {}", text.replace(['\r', '\n'], " ")),
            Token::Raw(sql) => sql.clone(),
            _ => unreachable!("{self:?} has a fixed spelling"),
        }
    }
}

/// An ordered run of tokens, built with chained pushes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend_from_slice(&other.tokens);
        self
    }

    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }

    pub fn indent(&mut self, level: usize) -> &mut Self {
        self.push(Token::Indent(level))
    }

    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }

    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }

    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

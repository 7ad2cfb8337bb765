//! Generation errors and their comment rendering.

use crate::sql::{Dialect, Token};

/// Reasons a statement could not be produced.
///
/// None of these escape the facade: each is rendered as a `--` comment.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("No tables selected or connected.")]
    NoRelevantTables,

    #[error("no writable columns for {table}: {reason}")]
    NoWritableColumns { table: String, reason: String },

    #[error("table(s) not connected to the join graph: {}", .tables.join(", "))]
    Disconnected { tables: Vec<String> },

    #[error("table {0} has no columns")]
    EmptyTable(String),

    #[error("{0}")]
    Internal(String),
}

pub type GenerateResult<T> = Result<T, GenerateError>;

impl GenerateError {
    /// Render as the SQL comment returned to the caller.
    pub fn to_comment(&self) -> String {
        let lines: Vec<String> = match self {
            GenerateError::NoRelevantTables => vec![
                self.to_string(),
                "Select columns or create relationships between tables.".to_string(),
            ],
            GenerateError::Internal(msg) => vec![format!("Error generating SQL: {msg}")],
            other => vec![format!("Unable to generate SQL: {other}")],
        };
        comment_lines(&lines)
    }
}

/// Join lines as `-- ` comments, one per line.
pub(crate) fn comment_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| Token::Comment(l.clone()).serialize(Dialect::TSql))
        .collect::<Vec<_>>()
        .join("\n")
}

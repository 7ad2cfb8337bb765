//! Table alias allocation.
//!
//! Every table placed in a statement gets a short alias that is unique
//! within that statement. Aliases are cached by table id, so repeated
//! lookups during one pass agree. The allocator is reset at the start of
//! every top-level generate call.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Table;

/// Separators for the word-aware style.
static WORD_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_\-]+").unwrap());

const PREFIX_LEN: usize = 3;
const MAX_WORDS: usize = 3;
const FALLBACK_ALIAS: &str = "t";

/// How aliases are synthesized when the user did not supply one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasStyle {
    /// First three characters, lower-cased: `Customers` -> `cus`.
    #[default]
    Prefix,
    /// First letter of up to three words: `Order_Line_Items` -> `oli`.
    Words,
}

/// Per-pass alias bookkeeping.
#[derive(Debug, Default)]
pub struct AliasAllocator {
    style: AliasStyle,
    /// Lower-cased, since T-SQL compares identifiers case-insensitively.
    used: HashSet<String>,
    by_table: HashMap<String, String>,
}

impl AliasAllocator {
    pub fn new(style: AliasStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Forget every alias handed out so far.
    pub fn reset(&mut self) {
        self.used.clear();
        self.by_table.clear();
    }

    /// Alias for `table`, allocating one on first sight.
    pub fn alias_for(&mut self, table: &Table) -> String {
        if let Some(alias) = self.by_table.get(&table.id) {
            return alias.clone();
        }

        let alias = match user_alias(table) {
            Some(alias) if !self.is_taken(alias) => alias.to_string(),
            _ => self.unique(&synthesize(&table.name, self.style)),
        };

        log::debug!("alias {} -> [{}]", table.name, alias);
        self.used.insert(alias.to_lowercase());
        self.by_table.insert(table.id.clone(), alias.clone());
        alias
    }

    /// Alias previously allocated for a table id.
    pub fn get(&self, table_id: &str) -> Option<&str> {
        self.by_table.get(table_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }

    fn is_taken(&self, alias: &str) -> bool {
        self.used.contains(&alias.to_lowercase())
    }

    fn unique(&self, base: &str) -> String {
        if !self.is_taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.is_taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// The user alias, when it is non-blank and differs from the table name.
fn user_alias(table: &Table) -> Option<&str> {
    table
        .alias
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case(&table.name))
}

/// Short alias candidate for a table name.
pub fn synthesize(name: &str, style: AliasStyle) -> String {
    let candidate: String = match style {
        AliasStyle::Prefix => name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .take(PREFIX_LEN)
            .collect(),
        AliasStyle::Words => WORD_SPLIT
            .split(name)
            .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
            .take(MAX_WORDS)
            .collect(),
    };

    if candidate.is_empty() {
        FALLBACK_ALIAS.to_string()
    } else {
        candidate.to_lowercase()
    }
}

//! Per-database spelling rules consulted by the renderer.
//!
//! The tree is dialect-agnostic; everything that differs between databases
//! (identifier quoting, placeholders, paging clauses, how an INSERT hands back
//! the generated key, string literal escaping) is answered here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sql_tree::TextMatchKind;

const LIKE_ESCAPE: char = '\\';

/// How a page window is spelled after ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStyle {
    /// `LIMIT m OFFSET n`
    LimitOffset,
    /// `OFFSET n ROWS FETCH <keyword> m ROWS ONLY`. When `offset_required`,
    /// an absent offset is written as `OFFSET 0 ROWS`.
    OffsetFetch {
        fetch_keyword: &'static str,
        offset_required: bool,
    },
}

/// How an INSERT returns the key of the row it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRetrieval {
    None,
    /// `... RETURNING "Id"`
    Returning,
    /// `INSERT INTO t (...) OUTPUT INSERTED.[Id] VALUES (...)`
    OutputInserted,
    /// `...; SELECT LAST_INSERT_ID()`
    LastInsertId,
}

pub trait SqlDialect: fmt::Debug + Send + Sync {
    fn kind(&self) -> DialectKind;

    fn quote_identifier(&self, identifier: &str) -> String;

    /// Placeholder for the parameter `name`, the `position`-th (1-based)
    /// parameter written to the statement.
    fn placeholder(&self, name: &str, _position: usize) -> String {
        name.to_string()
    }

    fn paging_style(&self) -> PagingStyle;

    fn key_retrieval(&self) -> KeyRetrieval;

    /// Characters with a wildcard meaning inside LIKE patterns.
    fn like_wildcards(&self) -> &'static [char] {
        &['%', '_']
    }

    fn string_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    /// The right-hand side of a LIKE for a text match, including an ESCAPE
    /// clause when the text contains wildcard or escape characters.
    fn like_pattern(&self, kind: TextMatchKind, text: &str) -> String {
        let mut body = String::with_capacity(text.len());
        let mut escaped = false;
        for c in text.chars() {
            if c == LIKE_ESCAPE || self.like_wildcards().contains(&c) {
                body.push(LIKE_ESCAPE);
                escaped = true;
            }
            body.push(c);
        }

        let pattern = match kind {
            TextMatchKind::StartsWith => format!("{}%", body),
            TextMatchKind::EndsWith => format!("%{}", body),
            TextMatchKind::Contains => format!("%{}%", body),
        };
        let literal = self.string_literal(&pattern);
        if escaped {
            format!(
                "{} ESCAPE {}",
                literal,
                self.string_literal(&LIKE_ESCAPE.to_string())
            )
        } else {
            literal
        }
    }
}

fn quote_with(identifier: &str, open: char, close: char) -> String {
    let doubled = format!("{}{}", close, close);
    format!("{}{}{}", open, identifier.replace(close, &doubled), close)
}

/// SQL-92 spelling; the default for debug output.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Ansi
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_with(identifier, '"', '"')
    }

    fn paging_style(&self) -> PagingStyle {
        PagingStyle::OffsetFetch {
            fetch_keyword: "FIRST",
            offset_required: false,
        }
    }

    fn key_retrieval(&self) -> KeyRetrieval {
        KeyRetrieval::None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgreSqlDialect;

impl SqlDialect for PostgreSqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::PostgreSql
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_with(identifier, '"', '"')
    }

    fn placeholder(&self, _name: &str, position: usize) -> String {
        format!("${}", position)
    }

    fn paging_style(&self) -> PagingStyle {
        PagingStyle::LimitOffset
    }

    fn key_retrieval(&self) -> KeyRetrieval {
        KeyRetrieval::Returning
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlDialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_with(identifier, '[', ']')
    }

    fn paging_style(&self) -> PagingStyle {
        PagingStyle::OffsetFetch {
            fetch_keyword: "NEXT",
            offset_required: true,
        }
    }

    fn key_retrieval(&self) -> KeyRetrieval {
        KeyRetrieval::OutputInserted
    }

    fn like_wildcards(&self) -> &'static [char] {
        &['%', '_', '[']
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_with(identifier, '`', '`')
    }

    fn paging_style(&self) -> PagingStyle {
        PagingStyle::LimitOffset
    }

    fn key_retrieval(&self) -> KeyRetrieval {
        KeyRetrieval::LastInsertId
    }

    // Backslash is an escape character inside MySQL string literals.
    fn string_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_with(identifier, '"', '"')
    }

    fn paging_style(&self) -> PagingStyle {
        PagingStyle::LimitOffset
    }

    fn key_retrieval(&self) -> KeyRetrieval {
        KeyRetrieval::Returning
    }
}

/// Selects one of the built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Ansi,
    #[serde(alias = "postgres")]
    PostgreSql,
    #[serde(alias = "mssql")]
    SqlServer,
    MySql,
    Sqlite,
}

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Ansi,
        DialectKind::PostgreSql,
        DialectKind::SqlServer,
        DialectKind::MySql,
        DialectKind::Sqlite,
    ];

    pub fn dialect(self) -> &'static dyn SqlDialect {
        match self {
            DialectKind::Ansi => &AnsiDialect,
            DialectKind::PostgreSql => &PostgreSqlDialect,
            DialectKind::SqlServer => &SqlServerDialect,
            DialectKind::MySql => &MySqlDialect,
            DialectKind::Sqlite => &SqliteDialect,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DialectKind::Ansi => "ansi",
            DialectKind::PostgreSql => "postgresql",
            DialectKind::SqlServer => "sqlserver",
            DialectKind::MySql => "mysql",
            DialectKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown SQL dialect '{0}' (expected one of: ansi, postgresql, sqlserver, mysql, sqlite)")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ansi" => Ok(DialectKind::Ansi),
            "postgresql" | "postgres" => Ok(DialectKind::PostgreSql),
            "sqlserver" | "mssql" => Ok(DialectKind::SqlServer),
            "mysql" => Ok(DialectKind::MySql),
            "sqlite" => Ok(DialectKind::Sqlite),
            _ => Err(UnknownDialect(value.to_string())),
        }
    }
}

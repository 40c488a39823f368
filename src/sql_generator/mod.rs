//! Turns SQL trees into dialect-specific text plus ordered parameters.

pub mod dialect;
mod renderer;

pub use dialect::{
    AnsiDialect, DialectKind, KeyRetrieval, MySqlDialect, PagingStyle, PostgreSqlDialect,
    SqlDialect, SqlServerDialect, SqliteDialect, UnknownDialect,
};
pub use renderer::{RenderedParameter, RenderedSql, SqlRenderer};

/// Renders a compiled statement for `dialect`.
pub fn render(compiled: &crate::sql_tree::CompiledStatement, dialect: DialectKind) -> RenderedSql {
    SqlRenderer::new(dialect.dialect()).render(compiled)
}

//! Errors raised while loading and querying the persisted schema description.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Unknown resource type '{resource}'")]
    UnknownResource { resource: String },

    #[error("Invalid {what} '{value}'")]
    InvalidIdentifier { what: &'static str, value: String },

    #[error("Column '{column}' of table '{table}' is mapped more than once")]
    ColumnConflict { table: String, column: String },

    #[error("Failed to read schema file: {error}")]
    ConfigReadError { error: String },

    #[error("Failed to parse schema: {error}")]
    ConfigParseError { error: String },

    #[error("Invalid schema: {message}")]
    InvalidConfig { message: String },
}

impl CatalogError {
    /// Invalid-schema error naming the resource the problem was found in.
    pub fn config_error_with_context(resource: &str, message: impl Into<String>) -> Self {
        CatalogError::InvalidConfig {
            message: format!("{}\n  Context: resource '{}'", message.into(), resource),
        }
    }
}

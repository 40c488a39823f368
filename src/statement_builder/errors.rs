use thiserror::Error;

use crate::resource_catalog::{AttributeType, CatalogError};
use crate::sql_tree::SqlTreeError;

/// Errors raised while translating a resource-level description into a tree.
///
/// Everything except `Catalog` and `Tree` is caused by the caller's input and
/// carries the offending field path.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    #[error("Unknown resource type '{0}'")]
    UnknownResource(String),

    #[error("Field '{field}' does not exist on resource type '{resource}'")]
    UnknownField { resource: String, field: String },

    #[error("Invalid field chain '{chain}': {reason}")]
    InvalidFieldChain { chain: String, reason: String },

    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    #[error("Cannot convert {value} to {expected:?} for field '{field}'")]
    ValueConversion {
        field: String,
        expected: AttributeType,
        value: String,
    },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Include path '{path}' exceeds the maximum depth of {max_depth}")]
    IncludeDepthExceeded { path: String, max_depth: u32 },

    #[error("Invalid write: {0}")]
    InvalidWrite(String),

    #[error("Nothing to write for resource type '{0}'")]
    EmptyWrite(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Internal translation error: {0}")]
    Tree(#[from] SqlTreeError),
}

impl TranslationError {
    pub(crate) fn invalid_chain(chain: &str, reason: impl Into<String>) -> Self {
        TranslationError::InvalidFieldChain {
            chain: chain.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_field(resource: &str, field: &str) -> Self {
        TranslationError::UnknownField {
            resource: resource.to_string(),
            field: field.to_string(),
        }
    }
}

use thiserror::Error;

/// Errors raised while constructing or resolving SQL tree nodes.
///
/// These are programmer errors: the statement builder only hands finished,
/// validated input to the node constructors, so any of these surfacing means
/// the translation logic itself is wrong.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlTreeError {
    #[error("Invalid {node} node: {reason}")]
    InvalidNode { node: &'static str, reason: String },

    #[error("Column '{column}' not found in table source{}", .table_alias.as_ref().map(|a| format!(" '{}'", a)).unwrap_or_default())]
    ColumnNotFound {
        column: String,
        table_alias: Option<String>,
    },

    #[error("Malformed table alias '{0}' (expected one prefix character followed by an ordinal)")]
    MalformedTableAlias(String),

    #[error("Table alias '{alias}' breaks introduction order: {reason}")]
    AliasOrderViolation { alias: String, reason: String },
}

impl SqlTreeError {
    pub(crate) fn invalid(node: &'static str, reason: impl Into<String>) -> Self {
        SqlTreeError::InvalidNode {
            node,
            reason: reason.into(),
        }
    }
}

/// Fails with `InvalidNode` when a required identifier is empty.
pub(crate) fn require_identifier(
    node: &'static str,
    what: &str,
    value: &str,
) -> Result<(), SqlTreeError> {
    if value.trim().is_empty() {
        return Err(SqlTreeError::invalid(node, format!("{} cannot be empty", what)));
    }
    Ok(())
}

pub(crate) fn require_alias(node: &'static str, alias: Option<&str>) -> Result<(), SqlTreeError> {
    match alias {
        Some(alias) => require_identifier(node, "alias", alias),
        None => Ok(()),
    }
}

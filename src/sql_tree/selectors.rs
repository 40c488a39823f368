use super::errors::{require_alias, SqlTreeError};
use super::ColumnNode;

/// Projects a single column, optionally under an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSelectorNode {
    column: Box<ColumnNode>,
    alias: Option<String>,
}

impl ColumnSelectorNode {
    pub fn new(column: ColumnNode, alias: Option<String>) -> Result<Self, SqlTreeError> {
        require_alias("column selector", alias.as_deref())?;
        Ok(Self {
            column: Box::new(column),
            alias,
        })
    }

    pub fn column(&self) -> &ColumnNode {
        &self.column
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The name under which the column is visible to an enclosing query.
    pub fn identity(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.column.name())
    }
}

/// Projects the constant `1`, used inside EXISTS sub-selects.
#[derive(Debug, Clone, PartialEq)]
pub struct OneSelectorNode {
    alias: Option<String>,
}

impl OneSelectorNode {
    pub fn new(alias: Option<String>) -> Result<Self, SqlTreeError> {
        require_alias("one selector", alias.as_deref())?;
        Ok(Self { alias })
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// Projects `COUNT(*)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSelectorNode {
    alias: Option<String>,
}

impl CountSelectorNode {
    pub fn new(alias: Option<String>) -> Result<Self, SqlTreeError> {
        require_alias("count selector", alias.as_deref())?;
        Ok(Self { alias })
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorNode {
    Column(ColumnSelectorNode),
    One(OneSelectorNode),
    Count(CountSelectorNode),
}

impl SelectorNode {
    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectorNode::Column(selector) => selector.alias(),
            SelectorNode::One(selector) => selector.alias(),
            SelectorNode::Count(selector) => selector.alias(),
        }
    }

    pub fn as_column(&self) -> Option<&ColumnSelectorNode> {
        match self {
            SelectorNode::Column(selector) => Some(selector),
            _ => None,
        }
    }
}

impl From<ColumnSelectorNode> for SelectorNode {
    fn from(selector: ColumnSelectorNode) -> Self {
        SelectorNode::Column(selector)
    }
}

impl From<OneSelectorNode> for SelectorNode {
    fn from(selector: OneSelectorNode) -> Self {
        SelectorNode::One(selector)
    }
}

impl From<CountSelectorNode> for SelectorNode {
    fn from(selector: CountSelectorNode) -> Self {
        SelectorNode::Count(selector)
    }
}

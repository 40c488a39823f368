use serde::{Deserialize, Serialize};

use super::errors::SqlTreeError;
use super::{ColumnNode, SelectNode, ValueNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonOperator {
    pub fn sql_symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessOrEqual => "<=",
        }
    }

    /// The operator that keeps the comparison true when its operands swap sides.
    pub fn mirrored(self) -> Self {
        match self {
            ComparisonOperator::Equals => ComparisonOperator::Equals,
            ComparisonOperator::GreaterThan => ComparisonOperator::LessThan,
            ComparisonOperator::GreaterOrEqual => ComparisonOperator::LessOrEqual,
            ComparisonOperator::LessThan => ComparisonOperator::GreaterThan,
            ComparisonOperator::LessOrEqual => ComparisonOperator::GreaterOrEqual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonNode {
    operator: ComparisonOperator,
    left: ValueNode,
    right: ValueNode,
}

impl ComparisonNode {
    pub fn new(operator: ComparisonOperator, left: ValueNode, right: ValueNode) -> Self {
        Self {
            operator,
            left,
            right,
        }
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn left(&self) -> &ValueNode {
        &self.left
    }

    pub fn right(&self) -> &ValueNode {
        &self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalNode {
    operator: LogicalOperator,
    terms: Vec<FilterNode>,
}

impl LogicalNode {
    pub fn new(operator: LogicalOperator, terms: Vec<FilterNode>) -> Result<Self, SqlTreeError> {
        if terms.len() < 2 {
            return Err(SqlTreeError::invalid(
                "logical",
                format!("{} requires at least two terms, got {}", operator.keyword(), terms.len()),
            ));
        }
        Ok(Self { operator, terms })
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn terms(&self) -> &[FilterNode] {
        &self.terms
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotNode {
    child: Box<FilterNode>,
}

impl NotNode {
    pub fn new(child: FilterNode) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    pub fn child(&self) -> &FilterNode {
        &self.child
    }
}

/// Set membership: `column IN (value, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InNode {
    column: ColumnNode,
    values: Vec<ValueNode>,
}

impl InNode {
    pub fn new(column: ColumnNode, values: Vec<ValueNode>) -> Result<Self, SqlTreeError> {
        if values.is_empty() {
            return Err(SqlTreeError::invalid("in", "candidate value list cannot be empty"));
        }
        Ok(Self { column, values })
    }

    pub fn column(&self) -> &ColumnNode {
        &self.column
    }

    pub fn values(&self) -> &[ValueNode] {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatchKind {
    StartsWith,
    EndsWith,
    Contains,
}

/// Text match against a literal: `column LIKE 'text%'`.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeNode {
    column: ColumnNode,
    match_kind: TextMatchKind,
    text: String,
}

impl LikeNode {
    pub fn new(column: ColumnNode, match_kind: TextMatchKind, text: impl Into<String>) -> Self {
        Self {
            column,
            match_kind,
            text: text.into(),
        }
    }

    pub fn column(&self) -> &ColumnNode {
        &self.column
    }

    pub fn match_kind(&self) -> TextMatchKind {
        self.match_kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExistsNode {
    sub_select: Box<SelectNode>,
}

impl ExistsNode {
    pub fn new(sub_select: SelectNode) -> Self {
        Self {
            sub_select: Box::new(sub_select),
        }
    }

    pub fn sub_select(&self) -> &SelectNode {
        &self.sub_select
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Comparison(ComparisonNode),
    Logical(LogicalNode),
    Not(NotNode),
    In(InNode),
    Like(LikeNode),
    Exists(ExistsNode),
}

impl From<ComparisonNode> for FilterNode {
    fn from(node: ComparisonNode) -> Self {
        FilterNode::Comparison(node)
    }
}

impl From<LogicalNode> for FilterNode {
    fn from(node: LogicalNode) -> Self {
        FilterNode::Logical(node)
    }
}

impl From<NotNode> for FilterNode {
    fn from(node: NotNode) -> Self {
        FilterNode::Not(node)
    }
}

impl From<InNode> for FilterNode {
    fn from(node: InNode) -> Self {
        FilterNode::In(node)
    }
}

impl From<LikeNode> for FilterNode {
    fn from(node: LikeNode) -> Self {
        FilterNode::Like(node)
    }
}

impl From<ExistsNode> for FilterNode {
    fn from(node: ExistsNode) -> Self {
        FilterNode::Exists(node)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereNode {
    filter: FilterNode,
}

impl WhereNode {
    pub fn new(filter: FilterNode) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &FilterNode {
        &self.filter
    }
}

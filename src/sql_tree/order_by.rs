use super::errors::SqlTreeError;
use super::{ColumnNode, CountNode};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByColumnNode {
    column: ColumnNode,
    is_ascending: bool,
}

impl OrderByColumnNode {
    pub fn new(column: ColumnNode, is_ascending: bool) -> Self {
        Self {
            column,
            is_ascending,
        }
    }

    pub fn column(&self) -> &ColumnNode {
        &self.column
    }

    pub fn is_ascending(&self) -> bool {
        self.is_ascending
    }
}

/// Sorts on the number of related rows produced by a counting sub-select.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByCountNode {
    count: CountNode,
    is_ascending: bool,
}

impl OrderByCountNode {
    pub fn new(count: CountNode, is_ascending: bool) -> Self {
        Self {
            count,
            is_ascending,
        }
    }

    pub fn count(&self) -> &CountNode {
        &self.count
    }

    pub fn is_ascending(&self) -> bool {
        self.is_ascending
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderByTermNode {
    Column(OrderByColumnNode),
    Count(OrderByCountNode),
}

impl OrderByTermNode {
    pub fn is_ascending(&self) -> bool {
        match self {
            OrderByTermNode::Column(term) => term.is_ascending(),
            OrderByTermNode::Count(term) => term.is_ascending(),
        }
    }
}

impl From<OrderByColumnNode> for OrderByTermNode {
    fn from(term: OrderByColumnNode) -> Self {
        OrderByTermNode::Column(term)
    }
}

impl From<OrderByCountNode> for OrderByTermNode {
    fn from(term: OrderByCountNode) -> Self {
        OrderByTermNode::Count(term)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByNode {
    terms: Vec<OrderByTermNode>,
}

impl OrderByNode {
    pub fn new(terms: Vec<OrderByTermNode>) -> Result<Self, SqlTreeError> {
        if terms.is_empty() {
            return Err(SqlTreeError::invalid("order by", "at least one term is required"));
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[OrderByTermNode] {
        &self.terms
    }
}

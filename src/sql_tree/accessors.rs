use super::errors::SqlTreeError;
use super::{ColumnNode, TableSourceNode};

/// The root table source of a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct FromNode {
    source: TableSourceNode,
}

impl FromNode {
    pub fn new(source: TableSourceNode) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &TableSourceNode {
        &self.source
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    InnerJoin,
    LeftJoin,
}

impl JoinType {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::InnerJoin => "INNER JOIN",
            JoinType::LeftJoin => "LEFT JOIN",
        }
    }
}

/// Joins `source` on `outer_column = inner_column`, where the outer column
/// belongs to an already-introduced table and the inner column to `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
    join_type: JoinType,
    source: TableSourceNode,
    outer_column: ColumnNode,
    inner_column: ColumnNode,
}

impl JoinNode {
    pub fn new(
        join_type: JoinType,
        source: TableSourceNode,
        outer_column: ColumnNode,
        inner_column: ColumnNode,
    ) -> Result<Self, SqlTreeError> {
        if inner_column.table_alias() != source.alias() {
            return Err(SqlTreeError::invalid(
                "join",
                format!(
                    "inner column '{}' is not owned by the joined source {}",
                    inner_column.name(),
                    source.alias().unwrap_or("<unaliased>")
                ),
            ));
        }
        Ok(Self {
            join_type,
            source,
            outer_column,
            inner_column,
        })
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn source(&self) -> &TableSourceNode {
        &self.source
    }

    pub fn outer_column(&self) -> &ColumnNode {
        &self.outer_column
    }

    pub fn inner_column(&self) -> &ColumnNode {
        &self.inner_column
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableAccessorNode {
    From(FromNode),
    Join(JoinNode),
}

impl TableAccessorNode {
    pub fn source(&self) -> &TableSourceNode {
        match self {
            TableAccessorNode::From(from) => from.source(),
            TableAccessorNode::Join(join) => join.source(),
        }
    }
}

impl From<FromNode> for TableAccessorNode {
    fn from(from: FromNode) -> Self {
        TableAccessorNode::From(from)
    }
}

impl From<JoinNode> for TableAccessorNode {
    fn from(join: JoinNode) -> Self {
        TableAccessorNode::Join(join)
    }
}

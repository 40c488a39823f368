use super::errors::SqlTreeError;
use super::{ColumnNode, ParameterNode, SelectNode, TableNode, ValueNode, WhereNode};

/// `column = value` inside INSERT and UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssignmentNode {
    column: ColumnNode,
    value: ValueNode,
}

impl ColumnAssignmentNode {
    pub fn new(column: ColumnNode, value: ValueNode) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> &ColumnNode {
        &self.column
    }

    pub fn value(&self) -> &ValueNode {
        &self.value
    }
}

fn validate_assignments(
    node: &'static str,
    table: &TableNode,
    assignments: &[ColumnAssignmentNode],
) -> Result<(), SqlTreeError> {
    if assignments.is_empty() {
        return Err(SqlTreeError::invalid(node, "at least one assignment is required"));
    }
    for assignment in assignments {
        let column = assignment.column();
        if table
            .find_column(column.name(), Some(column.column_type()), column.table_alias())
            .is_none()
        {
            return Err(SqlTreeError::invalid(
                node,
                format!(
                    "column '{}' does not belong to table '{}'",
                    column.name(),
                    table.name()
                ),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertNode {
    table: TableNode,
    assignments: Vec<ColumnAssignmentNode>,
}

impl InsertNode {
    pub fn new(
        table: TableNode,
        assignments: Vec<ColumnAssignmentNode>,
    ) -> Result<Self, SqlTreeError> {
        validate_assignments("insert", &table, &assignments)?;
        Ok(Self { table, assignments })
    }

    pub fn table(&self) -> &TableNode {
        &self.table
    }

    pub fn assignments(&self) -> &[ColumnAssignmentNode] {
        &self.assignments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateNode {
    table: TableNode,
    assignments: Vec<ColumnAssignmentNode>,
    where_clause: WhereNode,
}

impl UpdateNode {
    pub fn new(
        table: TableNode,
        assignments: Vec<ColumnAssignmentNode>,
        where_clause: WhereNode,
    ) -> Result<Self, SqlTreeError> {
        validate_assignments("update", &table, &assignments)?;
        Ok(Self {
            table,
            assignments,
            where_clause,
        })
    }

    pub fn table(&self) -> &TableNode {
        &self.table
    }

    pub fn assignments(&self) -> &[ColumnAssignmentNode] {
        &self.assignments
    }

    pub fn where_clause(&self) -> &WhereNode {
        &self.where_clause
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteNode {
    table: TableNode,
    where_clause: WhereNode,
}

impl DeleteNode {
    pub fn new(table: TableNode, where_clause: WhereNode) -> Self {
        Self {
            table,
            where_clause,
        }
    }

    pub fn table(&self) -> &TableNode {
        &self.table
    }

    pub fn where_clause(&self) -> &WhereNode {
        &self.where_clause
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementNode {
    Select(SelectNode),
    Insert(InsertNode),
    Update(UpdateNode),
    Delete(DeleteNode),
}

impl StatementNode {
    pub fn as_select(&self) -> Option<&SelectNode> {
        match self {
            StatementNode::Select(select) => Some(select),
            _ => None,
        }
    }
}

impl From<SelectNode> for StatementNode {
    fn from(select: SelectNode) -> Self {
        StatementNode::Select(select)
    }
}

impl From<InsertNode> for StatementNode {
    fn from(insert: InsertNode) -> Self {
        StatementNode::Insert(insert)
    }
}

impl From<UpdateNode> for StatementNode {
    fn from(update: UpdateNode) -> Self {
        StatementNode::Update(update)
    }
}

impl From<DeleteNode> for StatementNode {
    fn from(delete: DeleteNode) -> Self {
        StatementNode::Delete(delete)
    }
}

/// Row window applied to a top-level SELECT by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    limit: ParameterNode,
    offset: Option<ParameterNode>,
}

impl PageWindow {
    pub fn new(limit: ParameterNode, offset: Option<ParameterNode>) -> Self {
        Self { limit, offset }
    }

    pub fn limit(&self) -> &ParameterNode {
        &self.limit
    }

    pub fn offset(&self) -> Option<&ParameterNode> {
        self.offset.as_ref()
    }
}

/// A finished statement tree plus the statement-level metadata the renderer
/// needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    statement: StatementNode,
    page: Option<PageWindow>,
}

impl CompiledStatement {
    pub fn new(statement: StatementNode) -> Self {
        Self {
            statement,
            page: None,
        }
    }

    pub fn paged(select: SelectNode, page: PageWindow) -> Self {
        Self {
            statement: StatementNode::Select(select),
            page: Some(page),
        }
    }

    pub fn statement(&self) -> &StatementNode {
        &self.statement
    }

    pub fn page(&self) -> Option<&PageWindow> {
        self.page.as_ref()
    }
}

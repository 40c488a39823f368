use super::errors::{require_alias, require_identifier, SqlTreeError};
use super::{ColumnInTableNode, ColumnNode, ColumnType, SelectNode};

/// A reference to a physical table, with the columns it is mapped to.
#[derive(Debug, Clone, PartialEq)]
pub struct TableNode {
    name: String,
    key_column: String,
    alias: Option<String>,
    columns: Vec<ColumnNode>,
}

impl TableNode {
    /// Builds a table reference. `column_mappings` lists every persisted column
    /// with its type; the derived column nodes are owned by `alias`.
    pub fn new<I, S>(
        name: impl Into<String>,
        key_column: impl Into<String>,
        column_mappings: I,
        alias: Option<String>,
    ) -> Result<Self, SqlTreeError>
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        let name = name.into();
        let key_column = key_column.into();
        require_identifier("table", "table name", &name)?;
        require_identifier("table", "key column", &key_column)?;
        require_alias("table", alias.as_deref())?;

        let columns = column_mappings
            .into_iter()
            .map(|(column, column_type)| {
                ColumnInTableNode::new(column, column_type, alias.clone()).map(ColumnNode::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !columns
            .iter()
            .any(|c| c.name() == key_column && c.column_type() == ColumnType::Scalar)
        {
            return Err(SqlTreeError::invalid(
                "table",
                format!(
                    "key column '{}' is not a scalar column of table '{}'",
                    key_column, name
                ),
            ));
        }

        Ok(Self {
            name,
            key_column,
            alias,
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn columns(&self) -> &[ColumnNode] {
        &self.columns
    }

    /// Finds a mapped column. Matches only when `owning_alias` is unspecified
    /// or names this table.
    pub fn find_column(
        &self,
        persisted_name: &str,
        column_type: Option<ColumnType>,
        owning_alias: Option<&str>,
    ) -> Option<&ColumnNode> {
        if owning_alias.is_some() && owning_alias != self.alias() {
            return None;
        }
        self.columns.iter().find(|column| {
            column.name() == persisted_name
                && column_type.map_or(true, |expected| column.column_type() == expected)
        })
    }
}

/// Anything rows can be read from.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSourceNode {
    Table(TableNode),
    Select(Box<SelectNode>),
}

impl TableSourceNode {
    pub fn alias(&self) -> Option<&str> {
        match self {
            TableSourceNode::Table(table) => table.alias(),
            TableSourceNode::Select(select) => select.alias(),
        }
    }

    pub fn columns(&self) -> &[ColumnNode] {
        match self {
            TableSourceNode::Table(table) => table.columns(),
            TableSourceNode::Select(select) => select.columns(),
        }
    }

    pub fn find_column(
        &self,
        persisted_name: &str,
        column_type: Option<ColumnType>,
        owning_alias: Option<&str>,
    ) -> Option<&ColumnNode> {
        match self {
            TableSourceNode::Table(table) => {
                table.find_column(persisted_name, column_type, owning_alias)
            }
            TableSourceNode::Select(select) => {
                select.find_column(persisted_name, column_type, owning_alias)
            }
        }
    }

    /// Like [`find_column`](Self::find_column), for callers that have already
    /// established the column must exist.
    pub fn get_column(
        &self,
        persisted_name: &str,
        column_type: Option<ColumnType>,
        owning_alias: Option<&str>,
    ) -> Result<&ColumnNode, SqlTreeError> {
        self.find_column(persisted_name, column_type, owning_alias)
            .ok_or_else(|| SqlTreeError::ColumnNotFound {
                column: persisted_name.to_string(),
                table_alias: owning_alias.map(str::to_string),
            })
    }
}

impl From<TableNode> for TableSourceNode {
    fn from(table: TableNode) -> Self {
        TableSourceNode::Table(table)
    }
}

impl From<SelectNode> for TableSourceNode {
    fn from(select: SelectNode) -> Self {
        TableSourceNode::Select(Box::new(select))
    }
}

use super::errors::{require_alias, SqlTreeError};
use super::{
    ColumnInSelectNode, ColumnNode, ColumnType, OrderByNode, SelectorNode, TableAccessorNode,
    WhereNode,
};

/// A SELECT statement, usable both at the top level and as a nested table
/// source or sub-query.
///
/// Selectors are keyed by the table accessor they read from, in introduction
/// order: the first accessor is the FROM, the rest are JOINs. The projected
/// columns are derived from the column selectors once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectNode {
    selectors: Vec<(TableAccessorNode, Vec<SelectorNode>)>,
    where_clause: Option<WhereNode>,
    order_by: Option<OrderByNode>,
    alias: Option<String>,
    columns: Vec<ColumnNode>,
}

impl SelectNode {
    pub fn new(
        selectors: Vec<(TableAccessorNode, Vec<SelectorNode>)>,
        where_clause: Option<WhereNode>,
        order_by: Option<OrderByNode>,
        alias: Option<String>,
    ) -> Result<Self, SqlTreeError> {
        require_alias("select", alias.as_deref())?;

        match selectors.first() {
            Some((TableAccessorNode::From(_), _)) => {}
            Some((TableAccessorNode::Join(_), _)) => {
                return Err(SqlTreeError::invalid(
                    "select",
                    "the first table accessor must be a FROM",
                ))
            }
            None => return Err(SqlTreeError::invalid("select", "no table accessors")),
        }
        if selectors
            .iter()
            .skip(1)
            .any(|(accessor, _)| matches!(accessor, TableAccessorNode::From(_)))
        {
            return Err(SqlTreeError::invalid(
                "select",
                "only the first table accessor can be a FROM",
            ));
        }
        if selectors.iter().all(|(_, list)| list.is_empty()) {
            return Err(SqlTreeError::invalid("select", "no selectors"));
        }

        let columns: Vec<ColumnNode> = selectors
            .iter()
            .flat_map(|(_, list)| list.iter())
            .filter_map(SelectorNode::as_column)
            .map(|selector| ColumnNode::from(ColumnInSelectNode::new(selector.clone(), alias.clone())))
            .collect();

        Ok(Self {
            selectors,
            where_clause,
            order_by,
            alias,
            columns,
        })
    }

    pub fn selectors(&self) -> &[(TableAccessorNode, Vec<SelectorNode>)] {
        &self.selectors
    }

    pub fn where_clause(&self) -> Option<&WhereNode> {
        self.where_clause.as_ref()
    }

    pub fn order_by(&self) -> Option<&OrderByNode> {
        self.order_by.as_ref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Columns this SELECT projects, owned by its alias.
    pub fn columns(&self) -> &[ColumnNode] {
        &self.columns
    }

    /// Resolves a column through this SELECT.
    ///
    /// When `owning_alias` names this SELECT, only its own projected columns
    /// are searched, by the name they are projected under. Otherwise every underlying table
    /// source is searched and a hit is lifted to the projected column whose
    /// selector wraps it; an inner column that is not projected is invisible.
    pub fn find_column(
        &self,
        persisted_name: &str,
        column_type: Option<ColumnType>,
        owning_alias: Option<&str>,
    ) -> Option<&ColumnNode> {
        if owning_alias.is_some() && owning_alias == self.alias() {
            return self.columns.iter().find(|column| {
                column.name() == persisted_name
                    && column_type.map_or(true, |expected| column.column_type() == expected)
            });
        }

        self.selectors.iter().find_map(|(accessor, _)| {
            let inner = accessor
                .source()
                .find_column(persisted_name, column_type, owning_alias)?;
            self.lift(inner)
        })
    }

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

    fn lift(&self, inner: &ColumnNode) -> Option<&ColumnNode> {
        self.columns.iter().find(|column| match column {
            ColumnNode::InSelect(projected) => projected.selector().column() == inner,
            ColumnNode::InTable(_) => false,
        })
    }
}

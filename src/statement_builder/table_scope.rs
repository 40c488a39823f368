//! The table sources of one SELECT under construction.
//!
//! Joins are discovered while translating includes, filters and sorts, so the
//! accessors and their selectors are collected here first and frozen into a
//! [`SelectNode`] once translation of that SELECT is complete.

use crate::resource_catalog::ResourceType;
use crate::sql_tree::{
    ColumnNode, ColumnType, FromNode, OrderByNode, SelectNode, SelectorNode, TableAccessorNode,
    TableNode, WhereNode,
};

use super::errors::TranslationError;

pub(crate) struct ScopedTable<'a> {
    /// Relationship path from the scope root; empty for the root itself.
    pub path: String,
    pub resource: &'a ResourceType,
    pub accessor: TableAccessorNode,
    pub selectors: Vec<SelectorNode>,
    /// Joined for an include, as opposed to only for a filter or sort.
    pub included: bool,
    pub to_many: bool,
}

pub(crate) struct TableScope<'a> {
    tables: Vec<ScopedTable<'a>>,
}

impl<'a> TableScope<'a> {
    pub const ROOT: usize = 0;

    pub fn new(resource: &'a ResourceType, table: TableNode) -> Self {
        Self {
            tables: vec![ScopedTable {
                path: String::new(),
                resource,
                accessor: FromNode::new(table.into()).into(),
                selectors: Vec::new(),
                included: true,
                to_many: false,
            }],
        }
    }

    pub fn tables(&self) -> &[ScopedTable<'a>] {
        &self.tables
    }

    pub fn table(&self, index: usize) -> &ScopedTable<'a> {
        &self.tables[index]
    }

    pub fn table_mut(&mut self, index: usize) -> &mut ScopedTable<'a> {
        &mut self.tables[index]
    }

    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.tables.iter().position(|table| table.path == path)
    }

    pub fn push(&mut self, table: ScopedTable<'a>) -> usize {
        self.tables.push(table);
        self.tables.len() - 1
    }

    /// Path of a relationship reached from the table at `index`.
    pub fn child_path(&self, index: usize, relationship: &str) -> String {
        let parent = &self.tables[index].path;
        if parent.is_empty() {
            relationship.to_string()
        } else {
            format!("{}.{}", parent, relationship)
        }
    }

    /// Resolves a persisted column of the table at `index`, as seen from
    /// outside its source (a nested SELECT yields its projected column).
    pub fn column(
        &self,
        index: usize,
        column: &str,
        column_type: ColumnType,
    ) -> Result<ColumnNode, TranslationError> {
        let source = self.tables[index].accessor.source();
        Ok(source
            .get_column(column, Some(column_type), source.alias())?
            .clone())
    }

    /// The key column of the table at `index`.
    pub fn id_column(&self, index: usize) -> Result<ColumnNode, TranslationError> {
        let id = &self.tables[index].resource.id().column;
        self.column(index, id, ColumnType::Scalar)
    }

    pub fn into_select(
        self,
        where_clause: Option<WhereNode>,
        order_by: Option<OrderByNode>,
        alias: Option<String>,
    ) -> Result<SelectNode, TranslationError> {
        let selectors = self
            .tables
            .into_iter()
            .map(|table| (table.accessor, table.selectors))
            .collect();
        Ok(SelectNode::new(selectors, where_clause, order_by, alias)?)
    }
}

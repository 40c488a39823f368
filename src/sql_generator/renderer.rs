use std::fmt;

use serde::Serialize;

use super::dialect::{DialectKind, KeyRetrieval, PagingStyle, SqlDialect};
use crate::sql_tree::visitor::SqlTreeNodeVisitor;
use crate::sql_tree::*;

/// A parameter as handed to the execution layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedParameter {
    pub name: String,
    pub value: ParameterValue,
}

/// SQL text plus its parameters, in the order their placeholders appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSql {
    pub sql: String,
    pub parameters: Vec<RenderedParameter>,
}

/// Writes a tree as single-line SQL text for one dialect.
#[derive(Debug)]
pub struct SqlRenderer<'a> {
    dialect: &'a dyn SqlDialect,
    sql: String,
    parameters: Vec<RenderedParameter>,
}

impl<'a> SqlRenderer<'a> {
    pub fn new(dialect: &'a dyn SqlDialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn render(mut self, compiled: &CompiledStatement) -> RenderedSql {
        compiled.statement().accept(&mut self, ());
        if let Some(page) = compiled.page() {
            self.write_page(page);
        }
        log::trace!(
            "Rendered {} SQL with {} parameters: {}",
            self.dialect.kind(),
            self.parameters.len(),
            self.sql
        );
        RenderedSql {
            sql: self.sql,
            parameters: self.parameters,
        }
    }

    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn write_identifier(&mut self, identifier: &str) {
        let quoted = self.dialect.quote_identifier(identifier);
        self.sql.push_str(&quoted);
    }

    fn write_selector_alias(&mut self, alias: Option<&str>) {
        if let Some(alias) = alias {
            self.push(" AS ");
            self.write_identifier(alias);
        }
    }

    fn write_qualified_column(&mut self, table_alias: Option<&str>, name: &str) {
        if let Some(alias) = table_alias {
            self.push(alias);
            self.push(".");
        }
        self.write_identifier(name);
    }

    fn write_separated<T>(&mut self, items: &[T], separator: &str, mut write: impl FnMut(&mut Self, &T)) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.push(separator);
            }
            write(self, item);
        }
    }

    fn write_sub_select(&mut self, select: &SelectNode) {
        self.push("(");
        select.accept(self, ());
        self.push(")");
    }

    /// A nested SELECT in FROM/JOIN is parenthesized and carries its alias.
    fn write_table_source(&mut self, source: &TableSourceNode) {
        match source {
            TableSourceNode::Table(table) => table.accept(self, ()),
            TableSourceNode::Select(select) => {
                self.write_sub_select(select);
                if let Some(alias) = select.alias() {
                    self.push(" AS ");
                    self.push(alias);
                }
            }
        }
    }

    fn write_page(&mut self, page: &PageWindow) {
        match self.dialect.paging_style() {
            PagingStyle::LimitOffset => {
                self.push(" LIMIT ");
                page.limit().accept(self, ());
                if let Some(offset) = page.offset() {
                    self.push(" OFFSET ");
                    offset.accept(self, ());
                }
            }
            PagingStyle::OffsetFetch {
                fetch_keyword,
                offset_required,
            } => {
                match page.offset() {
                    Some(offset) => {
                        self.push(" OFFSET ");
                        offset.accept(self, ());
                        self.push(" ROWS");
                    }
                    None if offset_required => self.push(" OFFSET 0 ROWS"),
                    None => {}
                }
                self.push(" FETCH ");
                self.push(fetch_keyword);
                self.push(" ");
                page.limit().accept(self, ());
                self.push(" ROWS ONLY");
            }
        }
    }

    fn write_assignments(&mut self, assignments: &[ColumnAssignmentNode]) {
        self.write_separated(assignments, ", ", |renderer, assignment| {
            assignment.accept(renderer, ());
        });
    }
}

impl SqlTreeNodeVisitor<(), ()> for SqlRenderer<'_> {
    fn visit_select(&mut self, node: &SelectNode, _argument: ()) {
        self.push("SELECT ");
        let selectors: Vec<&SelectorNode> = node
            .selectors()
            .iter()
            .flat_map(|(_, selectors)| selectors.iter())
            .collect();
        self.write_separated(&selectors, ", ", |renderer, selector| {
            selector.accept(renderer, ());
        });

        for (accessor, _) in node.selectors() {
            accessor.accept(self, ());
        }
        if let Some(where_clause) = node.where_clause() {
            where_clause.accept(self, ());
        }
        if let Some(order_by) = node.order_by() {
            order_by.accept(self, ());
        }
    }

    fn visit_insert(&mut self, node: &InsertNode, _argument: ()) {
        self.push("INSERT INTO ");
        node.table().accept(self, ());
        self.push(" (");
        self.write_separated(node.assignments(), ", ", |renderer, assignment| {
            renderer.write_identifier(assignment.column().name());
        });
        self.push(")");

        let key_retrieval = self.dialect.key_retrieval();
        if key_retrieval == KeyRetrieval::OutputInserted {
            self.push(" OUTPUT INSERTED.");
            self.write_identifier(node.table().key_column());
        }

        self.push(" VALUES (");
        self.write_separated(node.assignments(), ", ", |renderer, assignment| {
            assignment.value().accept(renderer, ());
        });
        self.push(")");

        match key_retrieval {
            KeyRetrieval::Returning => {
                self.push(" RETURNING ");
                self.write_identifier(node.table().key_column());
            }
            KeyRetrieval::LastInsertId => self.push("; SELECT LAST_INSERT_ID()"),
            KeyRetrieval::None | KeyRetrieval::OutputInserted => {}
        }
    }

    fn visit_update(&mut self, node: &UpdateNode, _argument: ()) {
        self.push("UPDATE ");
        node.table().accept(self, ());
        self.push(" SET ");
        self.write_assignments(node.assignments());
        node.where_clause().accept(self, ());
    }

    fn visit_delete(&mut self, node: &DeleteNode, _argument: ()) {
        self.push("DELETE FROM ");
        node.table().accept(self, ());
        node.where_clause().accept(self, ());
    }

    fn visit_table(&mut self, node: &TableNode, _argument: ()) {
        self.write_identifier(node.name());
        if let Some(alias) = node.alias() {
            self.push(" AS ");
            self.push(alias);
        }
    }

    fn visit_from(&mut self, node: &FromNode, _argument: ()) {
        self.push(" FROM ");
        self.write_table_source(node.source());
    }

    fn visit_join(&mut self, node: &JoinNode, _argument: ()) {
        self.push(" ");
        self.push(node.join_type().keyword());
        self.push(" ");
        self.write_table_source(node.source());
        self.push(" ON ");
        node.outer_column().accept(self, ());
        self.push(" = ");
        node.inner_column().accept(self, ());
    }

    fn visit_column_in_table(&mut self, node: &ColumnInTableNode, _argument: ()) {
        self.write_qualified_column(node.table_alias(), node.name());
    }

    fn visit_column_in_select(&mut self, node: &ColumnInSelectNode, _argument: ()) {
        self.write_qualified_column(node.table_alias(), node.name());
    }

    fn visit_column_selector(&mut self, node: &ColumnSelectorNode, _argument: ()) {
        node.column().accept(self, ());
        self.write_selector_alias(node.alias());
    }

    fn visit_one_selector(&mut self, node: &OneSelectorNode, _argument: ()) {
        self.push("1");
        self.write_selector_alias(node.alias());
    }

    fn visit_count_selector(&mut self, node: &CountSelectorNode, _argument: ()) {
        self.push("COUNT(*)");
        self.write_selector_alias(node.alias());
    }

    fn visit_where(&mut self, node: &WhereNode, _argument: ()) {
        self.push(" WHERE ");
        node.filter().accept(self, ());
    }

    fn visit_comparison(&mut self, node: &ComparisonNode, _argument: ()) {
        if node.operator() == ComparisonOperator::Equals {
            let null_test = match (node.left().is_null(), node.right().is_null()) {
                (false, true) => Some(node.left()),
                (true, false) => Some(node.right()),
                _ => None,
            };
            if let Some(value) = null_test {
                value.accept(self, ());
                self.push(" IS NULL");
                return;
            }
        }

        node.left().accept(self, ());
        self.push(" ");
        self.push(node.operator().sql_symbol());
        self.push(" ");
        node.right().accept(self, ());
    }

    fn visit_logical(&mut self, node: &LogicalNode, _argument: ()) {
        let separator = format!(" {} ", node.operator().keyword());
        self.write_separated(node.terms(), &separator, |renderer, term| {
            if matches!(term, FilterNode::Logical(_)) {
                renderer.push("(");
                term.accept(renderer, ());
                renderer.push(")");
            } else {
                term.accept(renderer, ());
            }
        });
    }

    fn visit_not(&mut self, node: &NotNode, _argument: ()) {
        self.push("NOT (");
        node.child().accept(self, ());
        self.push(")");
    }

    fn visit_in(&mut self, node: &InNode, _argument: ()) {
        node.column().accept(self, ());
        self.push(" IN (");
        self.write_separated(node.values(), ", ", |renderer, value| {
            value.accept(renderer, ());
        });
        self.push(")");
    }

    fn visit_like(&mut self, node: &LikeNode, _argument: ()) {
        node.column().accept(self, ());
        self.push(" LIKE ");
        let pattern = self.dialect.like_pattern(node.match_kind(), node.text());
        self.push(&pattern);
    }

    fn visit_exists(&mut self, node: &ExistsNode, _argument: ()) {
        self.push("EXISTS ");
        self.write_sub_select(node.sub_select());
    }

    fn visit_count(&mut self, node: &CountNode, _argument: ()) {
        self.write_sub_select(node.sub_select());
    }

    fn visit_order_by(&mut self, node: &OrderByNode, _argument: ()) {
        self.push(" ORDER BY ");
        self.write_separated(node.terms(), ", ", |renderer, term| {
            term.accept(renderer, ());
            if !term.is_ascending() {
                renderer.push(" DESC");
            }
        });
    }

    fn visit_order_by_column(&mut self, node: &OrderByColumnNode, _argument: ()) {
        node.column().accept(self, ());
    }

    fn visit_order_by_count(&mut self, node: &OrderByCountNode, _argument: ()) {
        node.count().accept(self, ());
    }

    fn visit_column_assignment(&mut self, node: &ColumnAssignmentNode, _argument: ()) {
        self.write_identifier(node.column().name());
        self.push(" = ");
        node.value().accept(self, ());
    }

    fn visit_parameter(&mut self, node: &ParameterNode, _argument: ()) {
        self.parameters.push(RenderedParameter {
            name: node.name().to_string(),
            value: node.value().clone(),
        });
        let placeholder = self.dialect.placeholder(node.name(), self.parameters.len());
        self.push(&placeholder);
    }

    fn visit_null_constant(&mut self, _node: &NullConstantNode, _argument: ()) {
        self.push("NULL");
    }
}

/// Debug rendering of any node with the ANSI dialect.
macro_rules! impl_display_via_renderer {
    ($($node:ty),* $(,)?) => {
        $(
            impl fmt::Display for $node {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let mut renderer = SqlRenderer::new(DialectKind::Ansi.dialect());
                    self.accept(&mut renderer, ());
                    f.write_str(&renderer.sql)
                }
            }
        )*
    };
}

impl_display_via_renderer! {
    StatementNode, SelectNode, InsertNode, UpdateNode, DeleteNode,
    TableNode, TableSourceNode, FromNode, JoinNode, TableAccessorNode,
    ColumnInTableNode, ColumnInSelectNode, ColumnNode,
    ColumnSelectorNode, OneSelectorNode, CountSelectorNode, SelectorNode,
    WhereNode, FilterNode, ComparisonNode, LogicalNode, NotNode, InNode, LikeNode, ExistsNode,
    CountNode, ValueNode, ParameterNode, NullConstantNode,
    OrderByNode, OrderByTermNode, OrderByColumnNode, OrderByCountNode, ColumnAssignmentNode,
}

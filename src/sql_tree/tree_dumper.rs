use std::fmt::Write;

use super::visitor::SqlTreeNodeVisitor;
use super::*;

/// Renders a tree as an indented outline of its nodes, one node per line.
/// Used for diagnostics; the output format is not stable.
#[derive(Debug, Default)]
pub struct TreeDumper {
    output: String,
}

impl TreeDumper {
    pub fn dump(statement: &StatementNode) -> String {
        let mut dumper = Self::default();
        statement.accept(&mut dumper, 0);
        dumper.output
    }

    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        let _ = writeln!(self.output, "{}{}", "  ".repeat(depth), text.as_ref());
    }
}

fn alias_suffix(alias: Option<&str>) -> String {
    alias.map(|a| format!(" AS {}", a)).unwrap_or_default()
}

fn qualified(alias: Option<&str>, name: &str) -> String {
    match alias {
        Some(alias) => format!("{}.{}", alias, name),
        None => name.to_string(),
    }
}

impl SqlTreeNodeVisitor<usize, ()> for TreeDumper {
    fn visit_select(&mut self, node: &SelectNode, depth: usize) {
        self.line(depth, format!("Select{}", alias_suffix(node.alias())));
        for (accessor, selectors) in node.selectors() {
            accessor.accept(self, depth + 1);
            for selector in selectors {
                selector.accept(self, depth + 2);
            }
        }
        if let Some(where_clause) = node.where_clause() {
            where_clause.accept(self, depth + 1);
        }
        if let Some(order_by) = node.order_by() {
            order_by.accept(self, depth + 1);
        }
    }

    fn visit_insert(&mut self, node: &InsertNode, depth: usize) {
        self.line(depth, "Insert");
        node.table().accept(self, depth + 1);
        for assignment in node.assignments() {
            assignment.accept(self, depth + 1);
        }
    }

    fn visit_update(&mut self, node: &UpdateNode, depth: usize) {
        self.line(depth, "Update");
        node.table().accept(self, depth + 1);
        for assignment in node.assignments() {
            assignment.accept(self, depth + 1);
        }
        node.where_clause().accept(self, depth + 1);
    }

    fn visit_delete(&mut self, node: &DeleteNode, depth: usize) {
        self.line(depth, "Delete");
        node.table().accept(self, depth + 1);
        node.where_clause().accept(self, depth + 1);
    }

    fn visit_table(&mut self, node: &TableNode, depth: usize) {
        self.line(depth, format!("Table {}{}", node.name(), alias_suffix(node.alias())));
    }

    fn visit_from(&mut self, node: &FromNode, depth: usize) {
        self.line(depth, "From");
        node.source().accept(self, depth + 1);
    }

    fn visit_join(&mut self, node: &JoinNode, depth: usize) {
        self.line(depth, format!("Join {:?}", node.join_type()));
        node.source().accept(self, depth + 1);
        self.line(depth + 1, "On");
        node.outer_column().accept(self, depth + 2);
        node.inner_column().accept(self, depth + 2);
    }

    fn visit_column_in_table(&mut self, node: &ColumnInTableNode, depth: usize) {
        self.line(
            depth,
            format!(
                "Column {} ({:?})",
                qualified(node.table_alias(), node.name()),
                node.column_type()
            ),
        );
    }

    fn visit_column_in_select(&mut self, node: &ColumnInSelectNode, depth: usize) {
        self.line(
            depth,
            format!(
                "ProjectedColumn {} -> {}",
                qualified(node.table_alias(), node.name()),
                qualified(node.base_column().table_alias(), node.persisted_column_name())
            ),
        );
    }

    fn visit_column_selector(&mut self, node: &ColumnSelectorNode, depth: usize) {
        self.line(depth, format!("ColumnSelector{}", alias_suffix(node.alias())));
        node.column().accept(self, depth + 1);
    }

    fn visit_one_selector(&mut self, node: &OneSelectorNode, depth: usize) {
        self.line(depth, format!("OneSelector{}", alias_suffix(node.alias())));
    }

    fn visit_count_selector(&mut self, node: &CountSelectorNode, depth: usize) {
        self.line(depth, format!("CountSelector{}", alias_suffix(node.alias())));
    }

    fn visit_where(&mut self, node: &WhereNode, depth: usize) {
        self.line(depth, "Where");
        node.filter().accept(self, depth + 1);
    }

    fn visit_comparison(&mut self, node: &ComparisonNode, depth: usize) {
        self.line(depth, format!("Comparison {:?}", node.operator()));
        node.left().accept(self, depth + 1);
        node.right().accept(self, depth + 1);
    }

    fn visit_logical(&mut self, node: &LogicalNode, depth: usize) {
        self.line(depth, format!("Logical {:?}", node.operator()));
        for term in node.terms() {
            term.accept(self, depth + 1);
        }
    }

    fn visit_not(&mut self, node: &NotNode, depth: usize) {
        self.line(depth, "Not");
        node.child().accept(self, depth + 1);
    }

    fn visit_in(&mut self, node: &InNode, depth: usize) {
        self.line(depth, "In");
        node.column().accept(self, depth + 1);
        for value in node.values() {
            value.accept(self, depth + 1);
        }
    }

    fn visit_like(&mut self, node: &LikeNode, depth: usize) {
        self.line(depth, format!("Like {:?} {:?}", node.match_kind(), node.text()));
        node.column().accept(self, depth + 1);
    }

    fn visit_exists(&mut self, node: &ExistsNode, depth: usize) {
        self.line(depth, "Exists");
        node.sub_select().accept(self, depth + 1);
    }

    fn visit_count(&mut self, node: &CountNode, depth: usize) {
        self.line(depth, "Count");
        node.sub_select().accept(self, depth + 1);
    }

    fn visit_order_by(&mut self, node: &OrderByNode, depth: usize) {
        self.line(depth, "OrderBy");
        for term in node.terms() {
            term.accept(self, depth + 1);
        }
    }

    fn visit_order_by_column(&mut self, node: &OrderByColumnNode, depth: usize) {
        self.line(depth, format!("OrderByColumn ascending={}", node.is_ascending()));
        node.column().accept(self, depth + 1);
    }

    fn visit_order_by_count(&mut self, node: &OrderByCountNode, depth: usize) {
        self.line(depth, format!("OrderByCount ascending={}", node.is_ascending()));
        node.count().accept(self, depth + 1);
    }

    fn visit_column_assignment(&mut self, node: &ColumnAssignmentNode, depth: usize) {
        self.line(depth, "Assignment");
        node.column().accept(self, depth + 1);
        node.value().accept(self, depth + 1);
    }

    fn visit_parameter(&mut self, node: &ParameterNode, depth: usize) {
        self.line(depth, format!("Parameter {} = {}", node.name(), node.value()));
    }

    fn visit_null_constant(&mut self, _node: &NullConstantNode, depth: usize) {
        self.line(depth, "Null");
    }
}

//! Double-dispatch protocol for walking SQL trees.
//!
//! Every concrete node implements `accept`, which calls exactly one method on
//! the visitor: the one named after that node kind. Consumers (SQL rendering,
//! debug dumps, alias collection) implement [`SqlTreeNodeVisitor`] and never
//! inspect node types themselves.
//!
//! The default method bodies walk into child nodes and return `R::default()`,
//! so a consumer interested in a handful of node kinds only overrides those.
//!
//! # Example
//!
//! ```ignore
//! struct ParameterCounter(usize);
//!
//! impl SqlTreeNodeVisitor<(), ()> for ParameterCounter {
//!     fn visit_parameter(&mut self, _node: &ParameterNode, _argument: ()) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut counter = ParameterCounter(0);
//! select.accept(&mut counter, ());
//! ```

use super::{
    ColumnAssignmentNode, ColumnInSelectNode, ColumnInTableNode, ColumnSelectorNode,
    ComparisonNode, CountNode, CountSelectorNode, DeleteNode, ExistsNode, FromNode, InNode,
    InsertNode, JoinNode, LikeNode, LogicalNode, NotNode, NullConstantNode, OneSelectorNode,
    OrderByColumnNode, OrderByCountNode, OrderByNode, ParameterNode, SelectNode, TableNode,
    UpdateNode, WhereNode,
};

/// Visitor over SQL tree nodes. `A` is an argument threaded through the walk
/// (for example the nesting depth), `R` is the per-node result.
pub trait SqlTreeNodeVisitor<A: Copy, R: Default> {
    fn visit_select(&mut self, node: &SelectNode, argument: A) -> R {
        for (accessor, selectors) in node.selectors() {
            accessor.accept(self, argument);
            for selector in selectors {
                selector.accept(self, argument);
            }
        }
        if let Some(where_clause) = node.where_clause() {
            where_clause.accept(self, argument);
        }
        if let Some(order_by) = node.order_by() {
            order_by.accept(self, argument);
        }
        R::default()
    }

    fn visit_insert(&mut self, node: &InsertNode, argument: A) -> R {
        node.table().accept(self, argument);
        for assignment in node.assignments() {
            assignment.accept(self, argument);
        }
        R::default()
    }

    fn visit_update(&mut self, node: &UpdateNode, argument: A) -> R {
        node.table().accept(self, argument);
        for assignment in node.assignments() {
            assignment.accept(self, argument);
        }
        node.where_clause().accept(self, argument);
        R::default()
    }

    fn visit_delete(&mut self, node: &DeleteNode, argument: A) -> R {
        node.table().accept(self, argument);
        node.where_clause().accept(self, argument);
        R::default()
    }

    fn visit_table(&mut self, _node: &TableNode, _argument: A) -> R {
        R::default()
    }

    fn visit_from(&mut self, node: &FromNode, argument: A) -> R {
        node.source().accept(self, argument);
        R::default()
    }

    fn visit_join(&mut self, node: &JoinNode, argument: A) -> R {
        node.source().accept(self, argument);
        node.outer_column().accept(self, argument);
        node.inner_column().accept(self, argument);
        R::default()
    }

    fn visit_column_in_table(&mut self, _node: &ColumnInTableNode, _argument: A) -> R {
        R::default()
    }

    fn visit_column_in_select(&mut self, _node: &ColumnInSelectNode, _argument: A) -> R {
        R::default()
    }

    fn visit_column_selector(&mut self, node: &ColumnSelectorNode, argument: A) -> R {
        node.column().accept(self, argument);
        R::default()
    }

    fn visit_one_selector(&mut self, _node: &OneSelectorNode, _argument: A) -> R {
        R::default()
    }

    fn visit_count_selector(&mut self, _node: &CountSelectorNode, _argument: A) -> R {
        R::default()
    }

    fn visit_where(&mut self, node: &WhereNode, argument: A) -> R {
        node.filter().accept(self, argument);
        R::default()
    }

    fn visit_comparison(&mut self, node: &ComparisonNode, argument: A) -> R {
        node.left().accept(self, argument);
        node.right().accept(self, argument);
        R::default()
    }

    fn visit_logical(&mut self, node: &LogicalNode, argument: A) -> R {
        for term in node.terms() {
            term.accept(self, argument);
        }
        R::default()
    }

    fn visit_not(&mut self, node: &NotNode, argument: A) -> R {
        node.child().accept(self, argument);
        R::default()
    }

    fn visit_in(&mut self, node: &InNode, argument: A) -> R {
        node.column().accept(self, argument);
        for value in node.values() {
            value.accept(self, argument);
        }
        R::default()
    }

    fn visit_like(&mut self, node: &LikeNode, argument: A) -> R {
        node.column().accept(self, argument);
        R::default()
    }

    fn visit_exists(&mut self, node: &ExistsNode, argument: A) -> R {
        node.sub_select().accept(self, argument);
        R::default()
    }

    fn visit_count(&mut self, node: &CountNode, argument: A) -> R {
        node.sub_select().accept(self, argument);
        R::default()
    }

    fn visit_order_by(&mut self, node: &OrderByNode, argument: A) -> R {
        for term in node.terms() {
            term.accept(self, argument);
        }
        R::default()
    }

    fn visit_order_by_column(&mut self, node: &OrderByColumnNode, argument: A) -> R {
        node.column().accept(self, argument);
        R::default()
    }

    fn visit_order_by_count(&mut self, node: &OrderByCountNode, argument: A) -> R {
        node.count().accept(self, argument);
        R::default()
    }

    fn visit_column_assignment(&mut self, node: &ColumnAssignmentNode, argument: A) -> R {
        node.column().accept(self, argument);
        node.value().accept(self, argument);
        R::default()
    }

    fn visit_parameter(&mut self, _node: &ParameterNode, _argument: A) -> R {
        R::default()
    }

    fn visit_null_constant(&mut self, _node: &NullConstantNode, _argument: A) -> R {
        R::default()
    }
}

/// Implements `accept` for a concrete node by forwarding to its visit method.
macro_rules! impl_accept {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl $node {
                pub fn accept<A, R, V>(&self, visitor: &mut V, argument: A) -> R
                where
                    A: Copy,
                    R: Default,
                    V: SqlTreeNodeVisitor<A, R> + ?Sized,
                {
                    visitor.$method(self, argument)
                }
            }
        )*
    };
}

impl_accept! {
    SelectNode => visit_select,
    InsertNode => visit_insert,
    UpdateNode => visit_update,
    DeleteNode => visit_delete,
    TableNode => visit_table,
    FromNode => visit_from,
    JoinNode => visit_join,
    ColumnInTableNode => visit_column_in_table,
    ColumnInSelectNode => visit_column_in_select,
    ColumnSelectorNode => visit_column_selector,
    OneSelectorNode => visit_one_selector,
    CountSelectorNode => visit_count_selector,
    WhereNode => visit_where,
    ComparisonNode => visit_comparison,
    LogicalNode => visit_logical,
    NotNode => visit_not,
    InNode => visit_in,
    LikeNode => visit_like,
    ExistsNode => visit_exists,
    CountNode => visit_count,
    OrderByNode => visit_order_by,
    OrderByColumnNode => visit_order_by_column,
    OrderByCountNode => visit_order_by_count,
    ColumnAssignmentNode => visit_column_assignment,
    ParameterNode => visit_parameter,
    NullConstantNode => visit_null_constant,
}

/// Implements `accept` for a node enum by delegating to the wrapped node.
macro_rules! impl_enum_accept {
    ($($node:ty { $($variant:ident),* $(,)? }),* $(,)?) => {
        $(
            impl $node {
                pub fn accept<A, R, V>(&self, visitor: &mut V, argument: A) -> R
                where
                    A: Copy,
                    R: Default,
                    V: SqlTreeNodeVisitor<A, R> + ?Sized,
                {
                    match self {
                        $(Self::$variant(inner) => inner.accept(visitor, argument),)*
                    }
                }
            }
        )*
    };
}

impl_enum_accept! {
    super::ColumnNode { InTable, InSelect },
    super::ValueNode { Column, Parameter, Null, Count },
    super::FilterNode { Comparison, Logical, Not, In, Like, Exists },
    super::SelectorNode { Column, One, Count },
    super::TableSourceNode { Table, Select },
    super::TableAccessorNode { From, Join },
    super::OrderByTermNode { Column, Count },
    super::StatementNode { Select, Insert, Update, Delete },
}

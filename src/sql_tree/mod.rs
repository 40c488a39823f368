//! Immutable SQL syntax tree.
//!
//! Nodes are built bottom-up with their finished children and never change
//! afterwards. Constructors validate structural invariants and fail with
//! [`SqlTreeError`]; a tree that exists is structurally valid.
//!
//! Traversal goes through [`visitor::SqlTreeNodeVisitor`]: every node has an
//! `accept` method that calls the visit method named after its kind.

mod accessors;
pub mod alias;
mod errors;
mod filters;
mod order_by;
mod select;
mod selectors;
mod statements;
mod table_sources;
pub mod tree_dumper;
mod values;
pub mod visitor;

pub use accessors::{FromNode, JoinNode, JoinType, TableAccessorNode};
pub use alias::{get_table_alias_index, verify_table_aliases, TableAliasGenerator};
pub use errors::SqlTreeError;
pub use filters::{
    ComparisonNode, ComparisonOperator, ExistsNode, FilterNode, InNode, LikeNode, LogicalNode,
    LogicalOperator, NotNode, TextMatchKind, WhereNode,
};
pub use order_by::{OrderByColumnNode, OrderByCountNode, OrderByNode, OrderByTermNode};
pub use select::SelectNode;
pub use selectors::{ColumnSelectorNode, CountSelectorNode, OneSelectorNode, SelectorNode};
pub use statements::{
    ColumnAssignmentNode, CompiledStatement, DeleteNode, InsertNode, PageWindow, StatementNode,
    UpdateNode,
};
pub use table_sources::{TableNode, TableSourceNode};
pub use tree_dumper::TreeDumper;
pub use values::{
    ColumnInSelectNode, ColumnInTableNode, ColumnNode, ColumnType, CountNode, NullConstantNode,
    ParameterNode, ParameterValue, ValueNode, PARAMETER_SIGIL,
};

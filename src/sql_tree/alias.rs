//! Table alias assignment.
//!
//! Every table source introduced while translating one statement gets the next
//! ordinal alias: `t1`, `t2`, ... The alias encodes the introduction order, so
//! inverting it is a plain numeric parse of the alias minus its leading
//! character.

use super::errors::SqlTreeError;
use super::visitor::SqlTreeNodeVisitor;
use super::{SelectNode, TableNode};

pub const TABLE_ALIAS_PREFIX: char = 't';

/// Hands out ordinal table aliases for a single translation call.
#[derive(Debug, Default)]
pub struct TableAliasGenerator {
    last_index: usize,
}

impl TableAliasGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_alias(&mut self) -> String {
        self.last_index += 1;
        format!("{}{}", TABLE_ALIAS_PREFIX, self.last_index)
    }
}

/// Parses the ordinal out of an alias produced by [`TableAliasGenerator`].
/// The leading character is dropped whatever it is; the rest must be digits.
pub fn get_table_alias_index(alias: &str) -> Result<usize, SqlTreeError> {
    let mut chars = alias.chars();
    if chars.next().is_none() {
        return Err(SqlTreeError::MalformedTableAlias(alias.to_string()));
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SqlTreeError::MalformedTableAlias(alias.to_string()));
    }
    digits
        .parse::<usize>()
        .map_err(|_| SqlTreeError::MalformedTableAlias(alias.to_string()))
}

/// Collects the aliases of every table source in a tree, in the order the
/// sources appear: a nested SELECT's own alias comes before the tables inside it.
///
/// Alongside the flat list it keeps one sequence per SELECT: the SELECT's own
/// alias followed by the aliases of its accessors, FROM first.
#[derive(Debug, Default)]
pub struct TableAliasCollector {
    aliases: Vec<String>,
    levels: Vec<Vec<String>>,
}

impl TableAliasCollector {
    pub fn collect(select: &SelectNode) -> Vec<String> {
        Self::walk(select).aliases
    }

    fn walk(select: &SelectNode) -> Self {
        let mut collector = Self::default();
        select.accept(&mut collector, ());
        collector
    }
}

impl SqlTreeNodeVisitor<(), ()> for TableAliasCollector {
    fn visit_select(&mut self, node: &SelectNode, _argument: ()) {
        if let Some(alias) = node.alias() {
            self.aliases.push(alias.to_string());
        }
        let level = node
            .alias()
            .into_iter()
            .chain(
                node.selectors()
                    .iter()
                    .filter_map(|(accessor, _)| accessor.source().alias()),
            )
            .map(str::to_string)
            .collect();
        self.levels.push(level);

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

    fn visit_table(&mut self, node: &TableNode, _argument: ()) {
        if let Some(alias) = node.alias() {
            self.aliases.push(alias.to_string());
        }
    }
}

/// Checks that the tree's table aliases are exactly `t1..tN` in introduction
/// order, and returns `N`.
///
/// Every ordinal from 1 to `N` must be used once. Within each SELECT the
/// ordinals must rise in accessor order, and a nested SELECT's own alias must
/// come before every alias inside it. Sub-selects in WHERE and ORDER BY are
/// introduced while the enclosing joins are still being added, so their
/// position relative to those joins is not checked.
pub fn verify_table_aliases(select: &SelectNode) -> Result<usize, SqlTreeError> {
    let collector = TableAliasCollector::walk(select);
    let mut indexes = collector
        .aliases
        .iter()
        .map(|alias| get_table_alias_index(alias).map(|index| (index, alias)))
        .collect::<Result<Vec<_>, _>>()?;
    indexes.sort_by_key(|(index, _)| *index);

    for (position, (index, alias)) in indexes.iter().enumerate() {
        if *index != position + 1 {
            return Err(SqlTreeError::AliasOrderViolation {
                alias: alias.to_string(),
                reason: format!("expected {}{}", TABLE_ALIAS_PREFIX, position + 1),
            });
        }
    }

    for level in &collector.levels {
        for pair in level.windows(2) {
            if get_table_alias_index(&pair[1])? <= get_table_alias_index(&pair[0])? {
                return Err(SqlTreeError::AliasOrderViolation {
                    alias: pair[1].clone(),
                    reason: format!("introduced after {}", pair[0]),
                });
            }
        }
    }
    Ok(indexes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_tree::{
        ColumnNode, ColumnSelectorNode, ColumnType, FromNode, JoinNode, JoinType, SelectorNode,
        TableAccessorNode, TableSourceNode,
    };

    #[test]
    fn test_generator_hands_out_ordinals() {
        let mut generator = TableAliasGenerator::new();
        assert_eq!(generator.next_alias(), "t1");
        assert_eq!(generator.next_alias(), "t2");
        assert_eq!(generator.next_alias(), "t3");
    }

    #[test]
    fn test_alias_index_round_trips() {
        let mut generator = TableAliasGenerator::new();
        for expected in 1..=12 {
            let alias = generator.next_alias();
            assert_eq!(get_table_alias_index(&alias), Ok(expected));
        }
    }

    #[test]
    fn test_alias_index_drops_any_leading_character() {
        assert_eq!(get_table_alias_index("x1"), Ok(1));
        assert_eq!(get_table_alias_index("T12"), Ok(12));
    }

    #[test]
    fn test_malformed_aliases_are_rejected() {
        for alias in ["", "t", "t1a", "t-1", "customers"] {
            assert_eq!(
                get_table_alias_index(alias),
                Err(SqlTreeError::MalformedTableAlias(alias.to_string())),
                "alias {:?}",
                alias
            );
        }
    }

    fn customers(alias: &str) -> TableNode {
        TableNode::new(
            "Customers",
            "Id",
            [("Id", ColumnType::Scalar)],
            Some(alias.to_string()),
        )
        .unwrap()
    }

    fn id_of(source: &TableSourceNode) -> ColumnNode {
        source.columns()[0].clone()
    }

    /// `SELECT` from `from`, left joining one source per entry of `joins`.
    fn select_joining(
        from: TableSourceNode,
        joins: Vec<TableSourceNode>,
        alias: Option<&str>,
    ) -> SelectNode {
        let root_id = id_of(&from);
        let mut selectors: Vec<(TableAccessorNode, Vec<SelectorNode>)> = vec![(
            FromNode::new(from).into(),
            vec![ColumnSelectorNode::new(root_id.clone(), None).unwrap().into()],
        )];
        for joined in joins {
            let joined_id = id_of(&joined);
            let join = JoinNode::new(JoinType::LeftJoin, joined, root_id.clone(), joined_id).unwrap();
            selectors.push((join.into(), vec![]));
        }
        SelectNode::new(selectors, None, None, alias.map(str::to_string)).unwrap()
    }

    fn table_source(alias: &str) -> TableSourceNode {
        customers(alias).into()
    }

    #[test]
    fn test_verify_accepts_nested_select_before_its_tables() {
        let nested = select_joining(table_source("t3"), vec![table_source("t4")], Some("t2"));
        let select = select_joining(
            table_source("t1"),
            vec![TableSourceNode::from(nested), table_source("t5")],
            None,
        );
        assert_eq!(verify_table_aliases(&select), Ok(5));
    }

    #[test]
    fn test_verify_rejects_gap() {
        let select = select_joining(table_source("t1"), vec![table_source("t3")], None);
        assert_eq!(
            verify_table_aliases(&select),
            Err(SqlTreeError::AliasOrderViolation {
                alias: "t3".into(),
                reason: "expected t2".into(),
            })
        );
    }

    #[test]
    fn test_verify_rejects_duplicate() {
        let select = select_joining(
            table_source("t1"),
            vec![table_source("t2"), table_source("t2")],
            None,
        );
        assert_eq!(
            verify_table_aliases(&select),
            Err(SqlTreeError::AliasOrderViolation {
                alias: "t2".into(),
                reason: "expected t3".into(),
            })
        );
    }

    #[test]
    fn test_verify_rejects_join_before_from() {
        let select = select_joining(table_source("t2"), vec![table_source("t1")], None);
        assert_eq!(
            verify_table_aliases(&select),
            Err(SqlTreeError::AliasOrderViolation {
                alias: "t1".into(),
                reason: "introduced after t2".into(),
            })
        );
    }

    #[test]
    fn test_verify_rejects_nested_select_named_after_its_tables() {
        let nested = select_joining(table_source("t2"), vec![], Some("t3"));
        let select = select_joining(table_source("t1"), vec![TableSourceNode::from(nested)], None);
        assert_eq!(
            verify_table_aliases(&select),
            Err(SqlTreeError::AliasOrderViolation {
                alias: "t2".into(),
                reason: "introduced after t3".into(),
            })
        );
    }
}

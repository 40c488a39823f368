//! Correlated sub-selects over to-many relationships, and the nested SELECT
//! that stands in for a filtered include.

use super::errors::TranslationError;
use super::filter_builder::split_chain;
use super::table_scope::TableScope;
use super::QueryTranslator;
use crate::query_description::FilterExpression;
use crate::resource_catalog::RelationshipSchema;
use crate::sql_tree::{
    ColumnSelectorNode, ColumnType, ComparisonNode, ComparisonOperator, CountSelectorNode,
    FilterNode, LogicalNode, LogicalOperator, OneSelectorNode, SelectNode, SelectorNode,
    WhereNode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SubSelectKind {
    /// `SELECT 1`, for `EXISTS`.
    Exists,
    /// `SELECT COUNT(*)`, for comparisons and sorting.
    Count,
}

impl<'a> QueryTranslator<'a> {
    /// Builds a sub-select over the to-many relationship that ends `chain`,
    /// correlated to the table reached from `index` through the to-one
    /// prefix of the chain.
    pub(super) fn build_correlated_select(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        chain: &str,
        kind: SubSelectKind,
        filter: Option<&FilterExpression>,
    ) -> Result<SelectNode, TranslationError> {
        let segments = split_chain(chain)?;
        let Some((last, prefix)) = segments.split_last() else {
            return Err(TranslationError::invalid_chain(chain, "empty relationship chain"));
        };
        let owner = self.walk_to_one(scope, index, chain, prefix)?;

        let resource = scope.table(owner).resource;
        let relationship = match resource.relationship(last) {
            Some(relationship) if relationship.is_to_many() => relationship,
            Some(_) => {
                return Err(TranslationError::invalid_chain(
                    chain,
                    format!("'{}' is a to-one relationship, expected a to-many relationship", last),
                ))
            }
            None => {
                return Err(TranslationError::invalid_chain(
                    chain,
                    format!("'{}' is not a relationship of '{}'", last, resource.name()),
                ))
            }
        };

        let target = self.resource(&relationship.resource)?;
        let alias = self.context.next_alias();
        let mut inner = TableScope::new(target, target.table_node(Some(alias))?);
        let selector: SelectorNode = match kind {
            SubSelectKind::Exists => OneSelectorNode::new(None)?.into(),
            SubSelectKind::Count => CountSelectorNode::new(None)?.into(),
        };
        inner.table_mut(TableScope::ROOT).selectors.push(selector);

        let correlation: FilterNode = ComparisonNode::new(
            ComparisonOperator::Equals,
            inner
                .column(TableScope::ROOT, &relationship.foreign_key, ColumnType::ForeignKey)?
                .into(),
            scope.id_column(owner)?.into(),
        )
        .into();
        let condition = match filter {
            Some(filter) => {
                let filter = self.translate_filter(&mut inner, TableScope::ROOT, filter)?;
                LogicalNode::new(LogicalOperator::And, vec![correlation, filter])?.into()
            }
            None => correlation,
        };

        inner.into_select(Some(WhereNode::new(condition)), None, None)
    }

    /// Joins a to-many include through a nested SELECT that applies the
    /// include filter, so the parent rows survive when no child matches.
    pub(super) fn join_filtered_relationship(
        &mut self,
        scope: &mut TableScope<'a>,
        parent: usize,
        relationship: &RelationshipSchema,
        filter: &FilterExpression,
    ) -> Result<usize, TranslationError> {
        let target = self.resource(&relationship.resource)?;
        let select_alias = self.context.next_alias();
        let table_alias = self.context.next_alias();

        let mut inner = TableScope::new(target, target.table_node(Some(table_alias))?);
        let selectors = target
            .columns()
            .iter()
            .map(|(column, column_type)| {
                let column = inner.column(TableScope::ROOT, column, *column_type)?;
                Ok(ColumnSelectorNode::new(column, None)?.into())
            })
            .collect::<Result<Vec<_>, TranslationError>>()?;
        inner.table_mut(TableScope::ROOT).selectors = selectors;

        let condition = self.translate_filter(&mut inner, TableScope::ROOT, filter)?;
        let sub_select =
            inner.into_select(Some(WhereNode::new(condition)), None, Some(select_alias))?;

        let path = scope.child_path(parent, &relationship.name);
        self.push_join(scope, parent, relationship, path, target, sub_select.into())
    }
}

use super::errors::TranslationError;
use super::subquery_builder::SubSelectKind;
use super::table_scope::TableScope;
use super::QueryTranslator;
use crate::query_description::{SortElement, SortTarget};
use crate::sql_tree::{CountNode, OrderByColumnNode, OrderByCountNode, OrderByTermNode};

impl<'a> QueryTranslator<'a> {
    /// Sort elements in request order. Field chains join their to-one
    /// relationships; counts become correlated `COUNT(*)` sub-selects.
    pub(super) fn translate_sort(
        &mut self,
        scope: &mut TableScope<'a>,
        sort: &[SortElement],
    ) -> Result<Vec<OrderByTermNode>, TranslationError> {
        sort.iter()
            .map(|element| {
                Ok(match &element.target {
                    SortTarget::Field(chain) => {
                        let (column, _) = self.resolve_field(scope, TableScope::ROOT, chain)?;
                        OrderByColumnNode::new(column, element.ascending).into()
                    }
                    SortTarget::Count(chain) => {
                        let sub_select = self.build_correlated_select(
                            scope,
                            TableScope::ROOT,
                            chain,
                            SubSelectKind::Count,
                            None,
                        )?;
                        OrderByCountNode::new(CountNode::new(sub_select), element.ascending).into()
                    }
                })
            })
            .collect()
    }
}

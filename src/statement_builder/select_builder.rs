use std::collections::BTreeMap;

use super::errors::TranslationError;
use super::table_scope::{ScopedTable, TableScope};
use super::QueryTranslator;
use crate::query_description::{Pagination, QueryDescription};
use crate::resource_catalog::{RelationshipSchema, ResourceType};
use crate::sql_tree::{
    verify_table_aliases, ColumnNode, ColumnSelectorNode, ColumnType, CompiledStatement,
    CountSelectorNode, JoinNode, JoinType, OrderByColumnNode, OrderByNode, OrderByTermNode,
    PageWindow, ParameterValue, TableSourceNode, WhereNode,
};

impl<'a> QueryTranslator<'a> {
    pub(super) fn build_select(
        mut self,
        query: &QueryDescription,
    ) -> Result<CompiledStatement, TranslationError> {
        let resource = self.resource(&query.resource)?;
        let includes = self.resolve_includes(resource, &query.include)?;
        let has_to_many_include = includes.iter().flatten().any(|r| r.is_to_many());
        self.check_include_filters(query, &includes)?;
        if query.page.is_some() && has_to_many_include {
            return Err(TranslationError::InvalidPagination(
                "pagination cannot be combined with to-many includes".to_string(),
            ));
        }

        let mut scope = self.root_scope(resource)?;
        for chain in &includes {
            self.join_include(&mut scope, chain, query)?;
        }

        let where_clause = match &query.filter {
            Some(filter) => Some(WhereNode::new(self.translate_filter(
                &mut scope,
                TableScope::ROOT,
                filter,
            )?)),
            None => None,
        };

        let mut terms = self.translate_sort(&mut scope, &query.sort)?;
        self.add_selectors(&mut scope, &query.fields)?;
        add_default_ordering(
            &scope,
            &mut terms,
            query.page.is_some() || has_to_many_include,
            has_to_many_include,
        )?;
        let order_by = if terms.is_empty() {
            None
        } else {
            Some(OrderByNode::new(terms)?)
        };

        let page = self.page_window(query.page)?;
        let select = scope.into_select(where_clause, order_by, None)?;
        let sources = verify_table_aliases(&select)?;
        log::debug!(
            "Built select for '{}' over {} table sources",
            query.resource,
            sources
        );

        Ok(match page {
            Some(page) => CompiledStatement::paged(select, page),
            None => CompiledStatement::new(select.into()),
        })
    }

    pub(super) fn build_count(
        mut self,
        query: &QueryDescription,
    ) -> Result<CompiledStatement, TranslationError> {
        let resource = self.resource(&query.resource)?;
        if !query.include.is_empty() || !query.sort.is_empty() || query.page.is_some() {
            log::warn!("Count query ignores includes, sorting and pagination");
        }

        let mut scope = self.root_scope(resource)?;
        let where_clause = match &query.filter {
            Some(filter) => Some(WhereNode::new(self.translate_filter(
                &mut scope,
                TableScope::ROOT,
                filter,
            )?)),
            None => None,
        };
        scope
            .table_mut(TableScope::ROOT)
            .selectors
            .push(CountSelectorNode::new(None)?.into());

        let select = scope.into_select(where_clause, None, None)?;
        verify_table_aliases(&select)?;
        Ok(CompiledStatement::new(select.into()))
    }

    pub(super) fn root_scope(
        &mut self,
        resource: &'a ResourceType,
    ) -> Result<TableScope<'a>, TranslationError> {
        let alias = self.context.next_alias();
        Ok(TableScope::new(resource, resource.table_node(Some(alias))?))
    }

    fn resolve_includes(
        &self,
        resource: &'a ResourceType,
        paths: &[String],
    ) -> Result<Vec<Vec<&'a RelationshipSchema>>, TranslationError> {
        let max_depth = self.config.max_include_depth;
        paths
            .iter()
            .map(|path| {
                let segments: Vec<&str> = path.split('.').collect();
                if segments.iter().any(|segment| segment.is_empty()) {
                    return Err(TranslationError::invalid_chain(path, "empty relationship name"));
                }
                if segments.len() > max_depth as usize {
                    return Err(TranslationError::IncludeDepthExceeded {
                        path: path.clone(),
                        max_depth,
                    });
                }

                let mut current = resource;
                let mut chain = Vec::with_capacity(segments.len());
                for segment in segments {
                    let relationship = current.relationship(segment).ok_or_else(|| {
                        TranslationError::invalid_chain(
                            path,
                            format!("'{}' is not a relationship of '{}'", segment, current.name()),
                        )
                    })?;
                    current = self.resource(&relationship.resource)?;
                    chain.push(relationship);
                }
                Ok(chain)
            })
            .collect()
    }

    /// Scoped include filters must name an included to-many path.
    fn check_include_filters(
        &self,
        query: &QueryDescription,
        includes: &[Vec<&'a RelationshipSchema>],
    ) -> Result<(), TranslationError> {
        for path in query.include_filters.keys() {
            let target = includes.iter().find_map(|chain| {
                (1..=chain.len()).find_map(|length| {
                    let prefix: Vec<&str> =
                        chain[..length].iter().map(|r| r.name.as_str()).collect();
                    (prefix.join(".") == *path).then(|| chain[length - 1])
                })
            });
            match target {
                Some(relationship) if relationship.is_to_many() => {}
                Some(_) => {
                    return Err(TranslationError::UnsupportedFilter(format!(
                        "include filter on '{}' requires a to-many relationship",
                        path
                    )))
                }
                None => {
                    return Err(TranslationError::UnsupportedFilter(format!(
                        "include filter on '{}' does not match an included relationship",
                        path
                    )))
                }
            }
        }
        Ok(())
    }

    fn join_include(
        &mut self,
        scope: &mut TableScope<'a>,
        chain: &[&'a RelationshipSchema],
        query: &QueryDescription,
    ) -> Result<(), TranslationError> {
        let mut current = TableScope::ROOT;
        for relationship in chain {
            let path = scope.child_path(current, &relationship.name);
            current = match (scope.index_of(&path), query.include_filters.get(&path)) {
                (Some(existing), _) => existing,
                (None, Some(filter)) => {
                    self.join_filtered_relationship(scope, current, relationship, filter)?
                }
                (None, None) => self.join_relationship(scope, current, relationship)?,
            };
            scope.table_mut(current).included = true;
        }
        Ok(())
    }

    /// LEFT JOINs the target of `relationship` once per relationship path and
    /// returns its scope index.
    pub(super) fn join_relationship(
        &mut self,
        scope: &mut TableScope<'a>,
        parent: usize,
        relationship: &RelationshipSchema,
    ) -> Result<usize, TranslationError> {
        let path = scope.child_path(parent, &relationship.name);
        if let Some(existing) = scope.index_of(&path) {
            return Ok(existing);
        }

        let target = self.resource(&relationship.resource)?;
        let alias = self.context.next_alias();
        let source: TableSourceNode = target.table_node(Some(alias))?.into();
        self.push_join(scope, parent, relationship, path, target, source)
    }

    pub(super) fn push_join(
        &mut self,
        scope: &mut TableScope<'a>,
        parent: usize,
        relationship: &RelationshipSchema,
        path: String,
        target: &'a ResourceType,
        source: TableSourceNode,
    ) -> Result<usize, TranslationError> {
        let (outer, inner) = if relationship.key_on_declaring_table() {
            let outer = scope.column(parent, &relationship.foreign_key, ColumnType::ForeignKey)?;
            let inner = source.get_column(&target.id().column, Some(ColumnType::Scalar), source.alias())?;
            (outer, inner.clone())
        } else {
            let outer = scope.id_column(parent)?;
            let inner =
                source.get_column(&relationship.foreign_key, Some(ColumnType::ForeignKey), source.alias())?;
            (outer, inner.clone())
        };

        log::trace!(
            "Joining '{}' as {} on {} = {}",
            path,
            source.alias().unwrap_or("<unaliased>"),
            outer,
            inner
        );
        let join = JoinNode::new(JoinType::LeftJoin, source, outer, inner)?;
        Ok(scope.push(ScopedTable {
            path,
            resource: target,
            accessor: join.into(),
            selectors: Vec::new(),
            included: false,
            to_many: relationship.is_to_many(),
        }))
    }

    fn add_selectors(
        &self,
        scope: &mut TableScope<'a>,
        fields: &BTreeMap<String, Vec<String>>,
    ) -> Result<(), TranslationError> {
        for resource in fields.keys() {
            self.resource(resource)?;
        }

        for index in 0..scope.tables().len() {
            let table = scope.table(index);
            if !table.included {
                continue;
            }
            let columns = selected_columns(table.resource, fields.get(table.resource.name()))?;
            let selectors = columns
                .iter()
                .map(|(column, column_type)| {
                    let column = scope.column(index, column, *column_type)?;
                    Ok(ColumnSelectorNode::new(column, None)?.into())
                })
                .collect::<Result<Vec<_>, TranslationError>>()?;
            scope.table_mut(index).selectors = selectors;
        }
        Ok(())
    }

    fn page_window(
        &mut self,
        page: Option<Pagination>,
    ) -> Result<Option<PageWindow>, TranslationError> {
        let Some(page) = page else {
            return Ok(None);
        };
        if page.number < 1 {
            return Err(TranslationError::InvalidPagination(
                "page number must be at least 1".to_string(),
            ));
        }
        let size = page.size.unwrap_or(self.config.default_page_size);
        if size < 1 || size > self.config.max_page_size {
            return Err(TranslationError::InvalidPagination(format!(
                "page size must be between 1 and {}",
                self.config.max_page_size
            )));
        }

        let limit = self
            .context
            .next_parameter(ParameterValue::Integer(i64::from(size)))?;
        let offset = if page.number > 1 {
            let skipped = (i64::from(page.number) - 1) * i64::from(size);
            Some(self.context.next_parameter(ParameterValue::Integer(skipped))?)
        } else {
            None
        };
        Ok(Some(PageWindow::new(limit, offset)))
    }
}

/// Columns to select for `resource`: all of them without a sparse field set,
/// otherwise the id plus the listed attributes and locally stored keys.
fn selected_columns(
    resource: &ResourceType,
    field_set: Option<&Vec<String>>,
) -> Result<Vec<(String, ColumnType)>, TranslationError> {
    let Some(field_set) = field_set else {
        return Ok(resource.columns().to_vec());
    };

    let mut wanted = vec![resource.id().column.as_str()];
    for field in field_set {
        if let Some(attribute) = resource.attribute(field) {
            wanted.push(&attribute.column);
        } else if let Some(relationship) = resource.relationship(field) {
            if relationship.key_on_declaring_table() {
                wanted.push(&relationship.foreign_key);
            }
        } else {
            return Err(TranslationError::unknown_field(resource.name(), field));
        }
    }

    Ok(resource
        .columns()
        .iter()
        .filter(|(column, _)| wanted.contains(&column.as_str()))
        .cloned()
        .collect())
}

fn contains_column(terms: &[OrderByTermNode], column: &ColumnNode) -> bool {
    terms.iter().any(|term| match term {
        OrderByTermNode::Column(term) => term.column() == column,
        OrderByTermNode::Count(_) => false,
    })
}

/// Root id when the caller gave no sort but rows must come back in a stable
/// order, then the id of every to-many include so rows group per parent.
fn add_default_ordering(
    scope: &TableScope<'_>,
    terms: &mut Vec<OrderByTermNode>,
    needs_stable_order: bool,
    has_to_many_include: bool,
) -> Result<(), TranslationError> {
    let root_id = scope.id_column(TableScope::ROOT)?;
    let needs_root = (terms.is_empty() && needs_stable_order) || has_to_many_include;
    if needs_root && !contains_column(terms, &root_id) {
        terms.push(OrderByColumnNode::new(root_id, true).into());
    }

    if has_to_many_include {
        for (index, table) in scope.tables().iter().enumerate() {
            if table.included && table.to_many {
                let id = scope.id_column(index)?;
                if !contains_column(terms, &id) {
                    terms.push(OrderByColumnNode::new(id, true).into());
                }
            }
        }
    }
    Ok(())
}

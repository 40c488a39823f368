use super::errors::TranslationError;
use super::subquery_builder::SubSelectKind;
use super::table_scope::TableScope;
use super::value_conversion::convert_literal;
use super::QueryTranslator;
use crate::query_description::{FilterExpression, FilterOperand, LiteralValue};
use crate::resource_catalog::AttributeType;
use crate::sql_tree::{
    ColumnNode, ColumnType, ComparisonNode, ComparisonOperator, CountNode, ExistsNode, FilterNode,
    InNode, LikeNode, LogicalNode, LogicalOperator, NotNode, NullConstantNode, ValueNode,
};

/// A comparison side after resolution.
enum Operand<'q> {
    Column {
        column: ColumnNode,
        value_type: AttributeType,
        field: &'q str,
    },
    Count {
        count: CountNode,
        chain: &'q str,
    },
    Literal(&'q LiteralValue),
}

impl Operand<'_> {
    fn is_literal(&self) -> bool {
        matches!(self, Operand::Literal(_))
    }
}

impl<'a> QueryTranslator<'a> {
    /// Translates `filter` against the table at `index` of `scope`. Joins
    /// the filter needs are added to `scope`.
    pub(super) fn translate_filter(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        filter: &FilterExpression,
    ) -> Result<FilterNode, TranslationError> {
        match filter {
            FilterExpression::Comparison {
                operator,
                left,
                right,
            } => self.translate_comparison(scope, index, *operator, left, right),
            FilterExpression::And(terms) => {
                self.translate_logical(scope, index, LogicalOperator::And, terms)
            }
            FilterExpression::Or(terms) => {
                self.translate_logical(scope, index, LogicalOperator::Or, terms)
            }
            FilterExpression::Not(inner) => {
                Ok(NotNode::new(self.translate_filter(scope, index, inner)?).into())
            }
            FilterExpression::Any { field, values } => self.translate_any(scope, index, field, values),
            FilterExpression::Match { field, kind, text } => {
                let (column, value_type) = self.resolve_field(scope, index, field)?;
                if value_type != AttributeType::Text {
                    return Err(TranslationError::UnsupportedFilter(format!(
                        "text matching on '{}' requires a text field",
                        field
                    )));
                }
                Ok(LikeNode::new(column, *kind, text.as_str()).into())
            }
            FilterExpression::Has {
                relationship,
                filter,
            } => {
                let sub_select = self.build_correlated_select(
                    scope,
                    index,
                    relationship,
                    SubSelectKind::Exists,
                    filter.as_deref(),
                )?;
                Ok(ExistsNode::new(sub_select).into())
            }
        }
    }

    fn translate_logical(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        operator: LogicalOperator,
        terms: &[FilterExpression],
    ) -> Result<FilterNode, TranslationError> {
        let mut translated = terms
            .iter()
            .map(|term| self.translate_filter(scope, index, term))
            .collect::<Result<Vec<_>, _>>()?;
        match translated.len() {
            0 => Err(TranslationError::UnsupportedFilter(format!(
                "{} requires at least one term",
                operator.keyword()
            ))),
            1 => Ok(translated.remove(0)),
            _ => Ok(LogicalNode::new(operator, translated)?.into()),
        }
    }

    fn translate_operand<'q>(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        operand: &'q FilterOperand,
    ) -> Result<Operand<'q>, TranslationError> {
        Ok(match operand {
            FilterOperand::Field(chain) => {
                let (column, value_type) = self.resolve_field(scope, index, chain)?;
                Operand::Column {
                    column,
                    value_type,
                    field: chain,
                }
            }
            FilterOperand::Count(chain) => {
                let sub_select =
                    self.build_correlated_select(scope, index, chain, SubSelectKind::Count, None)?;
                Operand::Count {
                    count: CountNode::new(sub_select),
                    chain,
                }
            }
            FilterOperand::Value(literal) => Operand::Literal(literal),
        })
    }

    fn translate_comparison(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        operator: ComparisonOperator,
        left: &FilterOperand,
        right: &FilterOperand,
    ) -> Result<FilterNode, TranslationError> {
        let left = self.translate_operand(scope, index, left)?;
        let right = self.translate_operand(scope, index, right)?;

        // Keep the field on the left so the literal is converted to its type.
        let (operator, left, right) = if left.is_literal() {
            (operator.mirrored(), right, left)
        } else {
            (operator, left, right)
        };

        let (left, expected, field) = match left {
            Operand::Column {
                column,
                value_type,
                field,
            } => (ValueNode::from(column), value_type, field.to_string()),
            Operand::Count { count, chain } => {
                (ValueNode::from(count), AttributeType::Integer, format!("count({})", chain))
            }
            // Only left after the swap when both sides are literals.
            Operand::Literal(_) => {
                return Err(TranslationError::UnsupportedFilter(
                    "a comparison needs at least one field or count operand".to_string(),
                ))
            }
        };

        let right = match right {
            Operand::Literal(LiteralValue::Null) => {
                if operator != ComparisonOperator::Equals {
                    return Err(TranslationError::UnsupportedFilter(format!(
                        "'{}' cannot be compared with null using '{}'",
                        field,
                        operator.sql_symbol()
                    )));
                }
                ValueNode::from(NullConstantNode)
            }
            Operand::Literal(literal) => {
                let value = convert_literal(literal, expected, &field)?;
                self.context.next_parameter(value)?.into()
            }
            Operand::Column { column, .. } => column.into(),
            Operand::Count { count, .. } => count.into(),
        };

        Ok(ComparisonNode::new(operator, left, right).into())
    }

    fn translate_any(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        field: &str,
        values: &[LiteralValue],
    ) -> Result<FilterNode, TranslationError> {
        if values.is_empty() {
            return Err(TranslationError::UnsupportedFilter(format!(
                "any() on '{}' requires at least one value",
                field
            )));
        }
        if values.iter().any(LiteralValue::is_null) {
            return Err(TranslationError::UnsupportedFilter(format!(
                "any() on '{}' cannot contain null",
                field
            )));
        }

        let (column, value_type) = self.resolve_field(scope, index, field)?;
        let candidates = values
            .iter()
            .map(|literal| {
                let value = convert_literal(literal, value_type, field)?;
                Ok(self.context.next_parameter(value)?.into())
            })
            .collect::<Result<Vec<ValueNode>, TranslationError>>()?;
        Ok(InNode::new(column, candidates)?.into())
    }

    /// Resolves a dotted attribute chain, joining every to-one relationship
    /// on the way, and returns the attribute's column with its declared type.
    pub(super) fn resolve_field(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        chain: &str,
    ) -> Result<(ColumnNode, AttributeType), TranslationError> {
        let segments = split_chain(chain)?;
        let Some((last, relationships)) = segments.split_last() else {
            return Err(TranslationError::invalid_chain(chain, "empty field chain"));
        };
        let owner = self.walk_to_one(scope, index, chain, relationships)?;

        let resource = scope.table(owner).resource;
        let attribute = match resource.attribute(last) {
            Some(attribute) => attribute,
            None if resource.relationship(last).is_some() => {
                return Err(TranslationError::invalid_chain(
                    chain,
                    format!("'{}' is a relationship, expected an attribute", last),
                ))
            }
            None => return Err(TranslationError::unknown_field(resource.name(), last)),
        };
        let column = scope.column(owner, &attribute.column, ColumnType::Scalar)?;
        Ok((column, attribute.value_type))
    }

    /// Joins the to-one relationships named by `segments`, starting at the
    /// table at `index`, and returns the index of the last joined table.
    pub(super) fn walk_to_one(
        &mut self,
        scope: &mut TableScope<'a>,
        index: usize,
        chain: &str,
        segments: &[&str],
    ) -> Result<usize, TranslationError> {
        let mut current = index;
        for segment in segments {
            let resource = scope.table(current).resource;
            let relationship = resource.relationship(segment).ok_or_else(|| {
                TranslationError::invalid_chain(
                    chain,
                    format!("'{}' is not a relationship of '{}'", segment, resource.name()),
                )
            })?;
            if relationship.is_to_many() {
                return Err(TranslationError::invalid_chain(
                    chain,
                    format!(
                        "to-many relationship '{}' can only be used in has() or count()",
                        segment
                    ),
                ));
            }
            current = self.join_relationship(scope, current, relationship)?;
        }
        Ok(current)
    }
}

pub(super) fn split_chain(chain: &str) -> Result<Vec<&str>, TranslationError> {
    let segments: Vec<&str> = chain.split('.').collect();
    if segments.iter().any(|segment| segment.trim().is_empty()) {
        return Err(TranslationError::invalid_chain(chain, "empty field name"));
    }
    Ok(segments)
}

//! INSERT / UPDATE / DELETE for resource writes. Write statements address
//! their table without an alias.

use std::collections::BTreeMap;

use super::errors::TranslationError;
use super::value_conversion::convert_literal;
use super::QueryTranslator;
use crate::query_description::{LiteralValue, WriteOperation};
use crate::resource_catalog::{AttributeType, RelationshipSchema, ResourceType, ID_FIELD};
use crate::sql_tree::{
    ColumnAssignmentNode, ColumnNode, ColumnType, CompiledStatement, ComparisonNode,
    ComparisonOperator, DeleteNode, FilterNode, InNode, InsertNode, LogicalNode, LogicalOperator,
    NullConstantNode, SqlTreeError, StatementNode, TableNode, UpdateNode, ValueNode, WhereNode,
};

/// A column value waiting for its parameter, keyed by table column position.
struct PendingAssignment<'q> {
    position: usize,
    column: String,
    column_type: ColumnType,
    value_type: AttributeType,
    field: &'q str,
    literal: &'q LiteralValue,
}

impl<'a> QueryTranslator<'a> {
    pub(super) fn build_write(
        mut self,
        operation: &WriteOperation,
    ) -> Result<CompiledStatement, TranslationError> {
        let statement: StatementNode = match operation {
            WriteOperation::Create {
                resource,
                attributes,
                relationships,
            } => {
                let resource = self.resource(resource)?;
                let table = resource.table_node(None)?;
                let pending = self.collect_assignments(resource, attributes, relationships, true)?;
                let assignments = self.assignments(&table, pending)?;
                InsertNode::new(table, assignments)?.into()
            }
            WriteOperation::Update {
                resource,
                id,
                attributes,
                relationships,
            } => {
                let resource = self.resource(resource)?;
                let table = resource.table_node(None)?;
                let pending =
                    self.collect_assignments(resource, attributes, relationships, false)?;
                let assignments = self.assignments(&table, pending)?;
                let where_clause = self.id_equals(resource, &table, id)?;
                UpdateNode::new(table, assignments, where_clause)?.into()
            }
            WriteOperation::Delete { resource, id } => {
                let resource = self.resource(resource)?;
                let table = resource.table_node(None)?;
                let where_clause = self.id_equals(resource, &table, id)?;
                DeleteNode::new(table, where_clause).into()
            }
            WriteOperation::AddToRelationship {
                resource,
                id,
                relationship,
                related_ids,
            } => self.relink(resource, id, relationship, related_ids, true)?,
            WriteOperation::RemoveFromRelationship {
                resource,
                id,
                relationship,
                related_ids,
            } => self.relink(resource, id, relationship, related_ids, false)?,
        };
        Ok(CompiledStatement::new(statement))
    }

    fn collect_assignments<'q>(
        &self,
        resource: &'a ResourceType,
        attributes: &'q BTreeMap<String, LiteralValue>,
        relationships: &'q BTreeMap<String, LiteralValue>,
        is_create: bool,
    ) -> Result<Vec<PendingAssignment<'q>>, TranslationError> {
        let mut pending = Vec::with_capacity(attributes.len() + relationships.len());

        for (field, literal) in attributes {
            if field == ID_FIELD && !is_create {
                return Err(TranslationError::InvalidWrite(format!(
                    "the id of '{}' cannot be updated",
                    resource.name()
                )));
            }
            let Some(attribute) = resource.attribute(field) else {
                if resource.relationship(field).is_some() {
                    return Err(TranslationError::InvalidWrite(format!(
                        "'{}' is a relationship of '{}', assign it under relationships",
                        field,
                        resource.name()
                    )));
                }
                return Err(TranslationError::unknown_field(resource.name(), field));
            };
            pending.push(PendingAssignment {
                position: column_position(resource, &attribute.column, ColumnType::Scalar)?,
                column: attribute.column.clone(),
                column_type: ColumnType::Scalar,
                value_type: attribute.value_type,
                field,
                literal,
            });
        }

        for (field, literal) in relationships {
            let relationship = resource
                .relationship(field)
                .ok_or_else(|| TranslationError::unknown_field(resource.name(), field))?;
            if !relationship.key_on_declaring_table() {
                return Err(TranslationError::InvalidWrite(format!(
                    "relationship '{}' of '{}' is not stored on its table; use add/remove instead",
                    field,
                    resource.name()
                )));
            }
            let target = self.resource(&relationship.resource)?;
            pending.push(PendingAssignment {
                position: column_position(
                    resource,
                    &relationship.foreign_key,
                    ColumnType::ForeignKey,
                )?,
                column: relationship.foreign_key.clone(),
                column_type: ColumnType::ForeignKey,
                value_type: target.id().value_type,
                field,
                literal,
            });
        }

        if pending.is_empty() {
            return Err(TranslationError::EmptyWrite(resource.name().to_string()));
        }
        pending.sort_by_key(|assignment| assignment.position);
        Ok(pending)
    }

    fn assignments(
        &mut self,
        table: &TableNode,
        pending: Vec<PendingAssignment<'_>>,
    ) -> Result<Vec<ColumnAssignmentNode>, TranslationError> {
        pending
            .into_iter()
            .map(|assignment| {
                let column = table_column(table, &assignment.column, assignment.column_type)?;
                let value = self.write_value(assignment.literal, assignment.value_type, assignment.field)?;
                Ok(ColumnAssignmentNode::new(column, value))
            })
            .collect()
    }

    fn write_value(
        &mut self,
        literal: &LiteralValue,
        value_type: AttributeType,
        field: &str,
    ) -> Result<ValueNode, TranslationError> {
        if literal.is_null() {
            return Ok(NullConstantNode.into());
        }
        let value = convert_literal(literal, value_type, field)?;
        Ok(self.context.next_parameter(value)?.into())
    }

    /// A non-null id converted to the resource's id type, as a parameter.
    fn id_parameter(
        &mut self,
        resource: &ResourceType,
        id: &LiteralValue,
        field: &str,
    ) -> Result<ValueNode, TranslationError> {
        if id.is_null() {
            return Err(TranslationError::InvalidWrite(format!(
                "'{}' of '{}' cannot be null",
                field,
                resource.name()
            )));
        }
        self.write_value(id, resource.id().value_type, field)
    }

    fn id_equals(
        &mut self,
        resource: &ResourceType,
        table: &TableNode,
        id: &LiteralValue,
    ) -> Result<WhereNode, TranslationError> {
        let key = table_column(table, &resource.id().column, ColumnType::Scalar)?;
        let value = self.id_parameter(resource, id, ID_FIELD)?;
        Ok(WhereNode::new(
            ComparisonNode::new(ComparisonOperator::Equals, key.into(), value).into(),
        ))
    }

    /// Points the foreign keys of the related rows at the parent (add) or
    /// clears them when they currently point at it (remove).
    fn relink(
        &mut self,
        resource: &str,
        id: &LiteralValue,
        relationship: &str,
        related_ids: &[LiteralValue],
        add: bool,
    ) -> Result<StatementNode, TranslationError> {
        let parent = self.resource(resource)?;
        let relationship: &RelationshipSchema = parent
            .relationship(relationship)
            .ok_or_else(|| TranslationError::unknown_field(parent.name(), relationship))?;
        if !relationship.is_to_many() {
            return Err(TranslationError::InvalidWrite(format!(
                "'{}' of '{}' is a to-one relationship; assign it with an update",
                relationship.name,
                parent.name()
            )));
        }
        if related_ids.is_empty() {
            return Err(TranslationError::EmptyWrite(parent.name().to_string()));
        }

        let child = self.resource(&relationship.resource)?;
        let table = child.table_node(None)?;
        let foreign_key = table_column(&table, &relationship.foreign_key, ColumnType::ForeignKey)?;
        let child_key = table_column(&table, &child.id().column, ColumnType::Scalar)?;

        let parent_id = self.id_parameter(parent, id, ID_FIELD)?;
        let related = related_ids
            .iter()
            .map(|related_id| self.id_parameter(child, related_id, &relationship.name))
            .collect::<Result<Vec<_>, _>>()?;
        let members: FilterNode = InNode::new(child_key, related)?.into();

        let (assigned, where_clause) = if add {
            (parent_id, members)
        } else {
            let owned: FilterNode = ComparisonNode::new(
                ComparisonOperator::Equals,
                foreign_key.clone().into(),
                parent_id,
            )
            .into();
            (
                ValueNode::from(NullConstantNode),
                LogicalNode::new(LogicalOperator::And, vec![owned, members])?.into(),
            )
        };

        let assignment = ColumnAssignmentNode::new(foreign_key, assigned);
        Ok(UpdateNode::new(table, vec![assignment], WhereNode::new(where_clause))?.into())
    }
}

fn column_position(
    resource: &ResourceType,
    column: &str,
    column_type: ColumnType,
) -> Result<usize, TranslationError> {
    resource
        .columns()
        .iter()
        .position(|(name, ty)| name == column && *ty == column_type)
        .ok_or_else(|| {
            TranslationError::Tree(SqlTreeError::ColumnNotFound {
                column: column.to_string(),
                table_alias: None,
            })
        })
}

fn table_column(
    table: &TableNode,
    column: &str,
    column_type: ColumnType,
) -> Result<ColumnNode, TranslationError> {
    table
        .find_column(column, Some(column_type), None)
        .cloned()
        .ok_or_else(|| {
            TranslationError::Tree(SqlTreeError::ColumnNotFound {
                column: column.to_string(),
                table_alias: table.alias().map(str::to_string),
            })
        })
}

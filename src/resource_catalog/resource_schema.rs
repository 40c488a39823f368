use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use crate::sql_tree::{ColumnType, SqlTreeError, TableNode};

/// Field name every resource exposes its primary key under.
pub const ID_FIELD: &str = "id";

/// Declared value type of an attribute; drives literal conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Text,
    #[default]
    Integer,
    Float,
    Decimal,
    Boolean,
    DateTime,
    Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    pub name: String,
    pub column: String,
    pub value_type: AttributeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    ToOne,
    ToMany,
}

/// Which side of a relationship stores the foreign key column.
///
/// `Left` means the declaring resource's table; `Right` the related one.
/// To-many relationships are always `Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeySide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipSchema {
    pub name: String,
    pub kind: RelationshipKind,
    pub resource: String,
    pub foreign_key: String,
    pub foreign_key_side: ForeignKeySide,
}

impl RelationshipSchema {
    pub fn is_to_many(&self) -> bool {
        self.kind == RelationshipKind::ToMany
    }

    /// True when the foreign key column lives on the declaring resource's table.
    pub fn key_on_declaring_table(&self) -> bool {
        self.foreign_key_side == ForeignKeySide::Left
    }
}

/// A resource type bound to its table, with the table's full column mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    name: String,
    table: String,
    id: AttributeSchema,
    attributes: Vec<AttributeSchema>,
    relationships: Vec<RelationshipSchema>,
    columns: Vec<(String, ColumnType)>,
}

impl ResourceType {
    pub(crate) fn new(
        name: String,
        table: String,
        id: AttributeSchema,
        attributes: Vec<AttributeSchema>,
        relationships: Vec<RelationshipSchema>,
    ) -> Result<Self, CatalogError> {
        let mut resource = Self {
            name,
            table,
            id,
            attributes,
            relationships,
            columns: Vec::new(),
        };

        let scalar_columns: Vec<String> = std::iter::once(&resource.id)
            .chain(resource.attributes.iter())
            .map(|attribute| attribute.column.clone())
            .collect();
        for column in scalar_columns {
            resource.add_column(column, ColumnType::Scalar)?;
        }

        let own_keys: Vec<String> = resource
            .relationships
            .iter()
            .filter(|relationship| relationship.key_on_declaring_table())
            .map(|relationship| relationship.foreign_key.clone())
            .collect();
        for column in own_keys {
            resource.add_foreign_key(column)?;
        }

        Ok(resource)
    }

    fn add_column(&mut self, column: String, column_type: ColumnType) -> Result<(), CatalogError> {
        if self.columns.iter().any(|(existing, _)| *existing == column) {
            return Err(CatalogError::ColumnConflict {
                table: self.table.clone(),
                column,
            });
        }
        self.columns.push((column, column_type));
        Ok(())
    }

    /// Registers a foreign key column stored on this table. Several
    /// relationships may share one key column; a key that collides with a
    /// scalar column is a conflict.
    pub(crate) fn add_foreign_key(&mut self, column: String) -> Result<(), CatalogError> {
        match self.column_type(&column) {
            Some(ColumnType::ForeignKey) => Ok(()),
            Some(ColumnType::Scalar) => Err(CatalogError::ColumnConflict {
                table: self.table.clone(),
                column,
            }),
            None => self.add_column(column, ColumnType::ForeignKey),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id(&self) -> &AttributeSchema {
        &self.id
    }

    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    pub fn relationships(&self) -> &[RelationshipSchema] {
        &self.relationships
    }

    /// Every persisted column in table order: id, attributes, then foreign keys.
    pub fn columns(&self) -> &[(String, ColumnType)] {
        &self.columns
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, column_type)| *column_type)
    }

    /// Looks up an attribute by field name; `id` resolves to the key.
    pub fn attribute(&self, field: &str) -> Option<&AttributeSchema> {
        if field == ID_FIELD {
            return Some(&self.id);
        }
        self.attributes.iter().find(|attribute| attribute.name == field)
    }

    pub fn relationship(&self, field: &str) -> Option<&RelationshipSchema> {
        self.relationships
            .iter()
            .find(|relationship| relationship.name == field)
    }

    /// A table reference for this resource owned by `alias`.
    pub fn table_node(&self, alias: Option<String>) -> Result<TableNode, SqlTreeError> {
        TableNode::new(
            self.table.as_str(),
            self.id.column.as_str(),
            self.columns
                .iter()
                .map(|(column, column_type)| (column.as_str(), *column_type)),
            alias,
        )
    }
}

/// All resource types known to the compiler, keyed by resource name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCatalog {
    resources: BTreeMap<String, ResourceType>,
}

impl ResourceCatalog {
    pub(crate) fn from_resources(resources: BTreeMap<String, ResourceType>) -> Self {
        Self { resources }
    }

    pub fn get(&self, resource: &str) -> Result<&ResourceType, CatalogError> {
        self.resources
            .get(resource)
            .ok_or_else(|| CatalogError::UnknownResource {
                resource: resource.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

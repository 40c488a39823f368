//! YAML description of resource types and their tables.
//!
//! ```yaml
//! resources:
//!   - name: customers
//!     table: Customers
//!     id: { column: Id, type: integer }
//!     attributes:
//!       - { name: name, column: Name, type: text }
//!     relationships:
//!       - { name: orders, kind: to_many, resource: orders, foreign_key: CustomerId }
//! ```
//!
//! An attribute without a `column` maps to the PascalCase form of its name.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use super::resource_schema::{
    AttributeSchema, AttributeType, ForeignKeySide, RelationshipKind, RelationshipSchema,
    ResourceCatalog, ResourceType, ID_FIELD,
};

lazy_static! {
    static ref FIELD_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap();
    static ref SQL_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub resources: Vec<ResourceDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub id: IdDefinition,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdDefinition {
    #[serde(default = "default_id_column")]
    pub column: String,
    #[serde(rename = "type", default)]
    pub value_type: AttributeType,
}

impl Default for IdDefinition {
    fn default() -> Self {
        Self {
            column: default_id_column(),
            value_type: AttributeType::default(),
        }
    }
}

fn default_id_column() -> String {
    "Id".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: AttributeType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    pub name: String,
    pub kind: RelationshipKind,
    pub resource: String,
    pub foreign_key: String,
    #[serde(default)]
    pub foreign_key_side: Option<ForeignKeySide>,
}

fn to_pascal_case(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn check(pattern: &Regex, what: &'static str, value: &str) -> Result<(), CatalogError> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(CatalogError::InvalidIdentifier {
            what,
            value: value.to_string(),
        })
    }
}

impl CatalogConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ConfigReadError {
            error: e.to_string(),
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Validates the definitions and derives every table's column mapping.
    pub fn build(&self) -> Result<ResourceCatalog, CatalogError> {
        if self.resources.is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: "Schema must contain at least one resource definition".to_string(),
            });
        }

        let mut resources = BTreeMap::new();
        for definition in &self.resources {
            let resource = definition.build()?;
            if resources.insert(definition.name.clone(), resource).is_some() {
                return Err(CatalogError::InvalidConfig {
                    message: format!("Duplicate resource name: {}", definition.name),
                });
            }
        }

        // Keys stored on the related table: to-many relationships and to-one
        // relationships whose key sits on the right.
        for definition in &self.resources {
            for relationship in &definition.relationships {
                let target = resources.get_mut(&relationship.resource).ok_or_else(|| {
                    CatalogError::config_error_with_context(
                        &definition.name,
                        format!(
                            "relationship '{}' targets unknown resource '{}'",
                            relationship.name, relationship.resource
                        ),
                    )
                })?;
                let side = relationship.side();
                if side == ForeignKeySide::Right {
                    target.add_foreign_key(relationship.foreign_key.clone())?;
                }
            }
        }

        log::debug!("Loaded resource catalog with {} resource types", resources.len());
        Ok(ResourceCatalog::from_resources(resources))
    }
}

impl ResourceDefinition {
    fn build(&self) -> Result<ResourceType, CatalogError> {
        check(&FIELD_NAME, "resource name", &self.name)?;
        check(&SQL_IDENTIFIER, "table name", &self.table)?;
        check(&SQL_IDENTIFIER, "column name", &self.id.column)?;

        let id = AttributeSchema {
            name: ID_FIELD.to_string(),
            column: self.id.column.clone(),
            value_type: self.id.value_type,
        };

        let mut field_names = vec![ID_FIELD];
        let mut attributes = Vec::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            check(&FIELD_NAME, "field name", &attribute.name)?;
            if field_names.contains(&attribute.name.as_str()) {
                return Err(CatalogError::config_error_with_context(
                    &self.name,
                    format!("duplicate field name '{}'", attribute.name),
                ));
            }
            field_names.push(&attribute.name);

            let column = attribute
                .column
                .clone()
                .unwrap_or_else(|| to_pascal_case(&attribute.name));
            check(&SQL_IDENTIFIER, "column name", &column)?;
            attributes.push(AttributeSchema {
                name: attribute.name.clone(),
                column,
                value_type: attribute.value_type,
            });
        }

        let mut relationships = Vec::with_capacity(self.relationships.len());
        for relationship in &self.relationships {
            check(&FIELD_NAME, "field name", &relationship.name)?;
            check(&SQL_IDENTIFIER, "column name", &relationship.foreign_key)?;
            if field_names.contains(&relationship.name.as_str()) {
                return Err(CatalogError::config_error_with_context(
                    &self.name,
                    format!("duplicate field name '{}'", relationship.name),
                ));
            }
            field_names.push(&relationship.name);

            if relationship.kind == RelationshipKind::ToMany
                && relationship.foreign_key_side == Some(ForeignKeySide::Left)
            {
                return Err(CatalogError::config_error_with_context(
                    &self.name,
                    format!(
                        "to-many relationship '{}' cannot store its key on the declaring table",
                        relationship.name
                    ),
                ));
            }
            relationships.push(RelationshipSchema {
                name: relationship.name.clone(),
                kind: relationship.kind,
                resource: relationship.resource.clone(),
                foreign_key: relationship.foreign_key.clone(),
                foreign_key_side: relationship.side(),
            });
        }

        ResourceType::new(
            self.name.clone(),
            self.table.clone(),
            id,
            attributes,
            relationships,
        )
    }
}

impl RelationshipDefinition {
    fn side(&self) -> ForeignKeySide {
        match (self.kind, self.foreign_key_side) {
            (RelationshipKind::ToMany, _) => ForeignKeySide::Right,
            (RelationshipKind::ToOne, side) => side.unwrap_or(ForeignKeySide::Left),
        }
    }
}

impl ResourceCatalog {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        CatalogConfig::from_yaml_str(yaml)?.build()
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        CatalogConfig::from_yaml_file(path)?.build()
    }
}

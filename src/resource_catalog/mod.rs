//! Persisted schema description: which table backs each resource type, how
//! its fields map to columns, and where relationship keys are stored.

pub mod config;
pub mod errors;
pub mod resource_schema;

pub use config::CatalogConfig;
pub use errors::CatalogError;
pub use resource_schema::{
    AttributeSchema, AttributeType, ForeignKeySide, RelationshipKind, RelationshipSchema,
    ResourceCatalog, ResourceType, ID_FIELD,
};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::filter::LiteralValue;
use super::query::{read_description, DescriptionError};

/// A resource-level write request.
///
/// `relationships` on create/update assign to-one relationships: the value is
/// the related resource's id, or null to clear it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum WriteOperation {
    Create {
        resource: String,
        #[serde(default)]
        attributes: BTreeMap<String, LiteralValue>,
        #[serde(default)]
        relationships: BTreeMap<String, LiteralValue>,
    },
    Update {
        resource: String,
        id: LiteralValue,
        #[serde(default)]
        attributes: BTreeMap<String, LiteralValue>,
        #[serde(default)]
        relationships: BTreeMap<String, LiteralValue>,
    },
    Delete {
        resource: String,
        id: LiteralValue,
    },
    AddToRelationship {
        resource: String,
        id: LiteralValue,
        relationship: String,
        related_ids: Vec<LiteralValue>,
    },
    RemoveFromRelationship {
        resource: String,
        id: LiteralValue,
        relationship: String,
        related_ids: Vec<LiteralValue>,
    },
}

impl WriteOperation {
    pub fn resource(&self) -> &str {
        match self {
            WriteOperation::Create { resource, .. }
            | WriteOperation::Update { resource, .. }
            | WriteOperation::Delete { resource, .. }
            | WriteOperation::AddToRelationship { resource, .. }
            | WriteOperation::RemoveFromRelationship { resource, .. } => resource,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DescriptionError> {
        read_description(path.as_ref())
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::filter::FilterExpression;

/// What a sort term orders by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortTarget {
    /// Dotted field chain over to-one relationships.
    Field(String),
    /// Number of related resources behind a to-many relationship.
    Count(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortElement {
    #[serde(flatten)]
    pub target: SortTarget,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl SortElement {
    pub fn field(chain: &str, ascending: bool) -> Self {
        Self {
            target: SortTarget::Field(chain.to_string()),
            ascending,
        }
    }

    pub fn count(relationship: &str, ascending: bool) -> Self {
        Self {
            target: SortTarget::Count(relationship.to_string()),
            ascending,
        }
    }
}

/// One-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page_number")]
    pub number: u32,
    #[serde(default)]
    pub size: Option<u32>,
}

fn default_page_number() -> u32 {
    1
}

/// Everything the document layer asks of a resource collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDescription {
    pub resource: String,
    #[serde(default)]
    pub filter: Option<FilterExpression>,
    #[serde(default)]
    pub sort: Vec<SortElement>,
    #[serde(default)]
    pub page: Option<Pagination>,
    /// Sparse field sets keyed by resource type name.
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<String>>,
    /// Dotted relationship paths to include, e.g. `orders.lines`.
    #[serde(default)]
    pub include: Vec<String>,
    /// Filters scoped to an included to-many relationship path.
    #[serde(default)]
    pub include_filters: BTreeMap<String, FilterExpression>,
}

impl QueryDescription {
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortElement) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_page(mut self, number: u32, size: u32) -> Self {
        self.page = Some(Pagination {
            number,
            size: Some(size),
        });
        self
    }

    pub fn with_fields(mut self, resource: &str, fields: &[&str]) -> Self {
        self.fields.insert(
            resource.to_string(),
            fields.iter().map(|field| field.to_string()).collect(),
        );
        self
    }

    pub fn with_include(mut self, path: &str) -> Self {
        self.include.push(path.to_string());
        self
    }

    pub fn with_include_filter(mut self, path: &str, filter: FilterExpression) -> Self {
        self.include_filters.insert(path.to_string(), filter);
        self
    }

    /// Reads a description from a YAML or JSON file; JSON is chosen by the
    /// `.json` extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DescriptionError> {
        read_description(path.as_ref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("Failed to read description file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse description file '{path}': {message}")]
    Parse { path: String, message: String },
}

pub(crate) fn read_description<T>(path: &Path) -> Result<T, DescriptionError>
where
    T: for<'de> Deserialize<'de>,
{
    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|source| DescriptionError::Read {
        path: display.clone(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    } else {
        from_yaml_str(&contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| DescriptionError::Parse {
        path: display,
        message,
    })
}

/// Parses YAML where enums are written as single-key maps
/// (`comparison: {...}`), the same shape serde_json expects.
pub(crate) fn from_yaml_str<T>(yaml: &str) -> Result<T, serde_yaml::Error>
where
    T: for<'de> Deserialize<'de>,
{
    serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(yaml))
}

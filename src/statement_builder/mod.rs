//! Translates resource-level query and write descriptions into SQL trees.
//!
//! One [`StatementBuilder`] serves any number of calls; every call gets a
//! fresh translator whose alias and parameter counters start over, so the
//! root table is always `t1` and the first literal always `@p1`.
//!
//! Reads:
//! - includes are joined first, in request order (LEFT JOIN per relationship
//!   path, deduplicated across includes, filters and sorts)
//! - filters over to-one chains join; filters over to-many relationships
//!   become correlated `EXISTS` / `COUNT(*)` sub-selects
//! - every literal becomes a parameter converted to the field's declared type
//! - pagination is attached to the [`CompiledStatement`], not the tree

mod context;
pub mod errors;
mod filter_builder;
mod select_builder;
mod sort_builder;
mod subquery_builder;
mod table_scope;
mod value_conversion;
mod write_builder;

#[cfg(test)]
mod tests;

pub use errors::TranslationError;

use crate::config::CompilerConfig;
use crate::query_description::{QueryDescription, WriteOperation};
use crate::resource_catalog::{ResourceCatalog, ResourceType};
use crate::sql_tree::CompiledStatement;
use context::TranslationContext;

pub struct StatementBuilder<'a> {
    catalog: &'a ResourceCatalog,
    config: &'a CompilerConfig,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(catalog: &'a ResourceCatalog, config: &'a CompilerConfig) -> Self {
        Self { catalog, config }
    }

    /// SELECT for a resource collection.
    pub fn build_select(&self, query: &QueryDescription) -> Result<CompiledStatement, TranslationError> {
        log::debug!("Building select for resource '{}'", query.resource);
        self.translator().build_select(query)
    }

    /// `SELECT COUNT(*)` over the filtered collection, ignoring includes,
    /// sorting and pagination.
    pub fn build_count(&self, query: &QueryDescription) -> Result<CompiledStatement, TranslationError> {
        log::debug!("Building count for resource '{}'", query.resource);
        self.translator().build_count(query)
    }

    pub fn build_write(&self, operation: &WriteOperation) -> Result<CompiledStatement, TranslationError> {
        log::debug!("Building write for resource '{}'", operation.resource());
        self.translator().build_write(operation)
    }

    fn translator(&self) -> QueryTranslator<'a> {
        QueryTranslator {
            catalog: self.catalog,
            config: self.config,
            context: TranslationContext::default(),
        }
    }
}

/// State of a single translation call.
pub(crate) struct QueryTranslator<'a> {
    catalog: &'a ResourceCatalog,
    config: &'a CompilerConfig,
    context: TranslationContext,
}

impl<'a> QueryTranslator<'a> {
    fn resource(&self, name: &str) -> Result<&'a ResourceType, TranslationError> {
        self.catalog
            .get(name)
            .map_err(|_| TranslationError::UnknownResource(name.to_string()))
    }
}

//! Integration tests - the public API end to end, from schema and description
//! files to rendered SQL.
//!
//! No database is involved; the tests compare SQL text and parameter lists.

mod dialect_rendering_tests;
mod file_loading_tests;
mod write_rendering_tests;

use std::path::PathBuf;

use resource_sql::config::CompilerConfig;
use resource_sql::resource_catalog::ResourceCatalog;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("rust")
        .join("fixtures")
        .join(name)
}

pub fn library_catalog() -> ResourceCatalog {
    ResourceCatalog::from_yaml_file(fixture_path("library_schema.yaml"))
        .expect("library schema should load")
}

pub fn default_config() -> CompilerConfig {
    CompilerConfig::default()
}

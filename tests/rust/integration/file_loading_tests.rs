//! Descriptions and configuration read from disk, the way the CLI reads them.

use std::fs;

use resource_sql::config::{CliConfig, CompilerConfig};
use resource_sql::query_description::{QueryDescription, WriteOperation};
use resource_sql::resource_catalog::{CatalogError, ResourceCatalog};
use resource_sql::sql_generator::{render, DialectKind};
use resource_sql::statement_builder::{StatementBuilder, TranslationError};

use super::{default_config, library_catalog};

const AUTHORS_QUERY: &str = r#"
resource: authors
filter:
  or:
    - comparison: { operator: equals, left: { field: country }, right: { value: FR } }
    - comparison: { operator: greater_than, left: { count: books }, right: { value: 10 } }
sort:
  - { field: name }
include: [books]
fields:
  books: [title]
"#;

#[test]
fn test_yaml_query_file_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("authors.yaml");
    fs::write(&path, AUTHORS_QUERY).unwrap();

    let query = QueryDescription::from_file(&path).unwrap();
    let catalog = library_catalog();
    let config = default_config();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_select(&query)
        .unwrap();

    assert_eq!(
        render(&compiled, DialectKind::Ansi).sql,
        concat!(
            r#"SELECT t1."Id", t1."Name", t1."Country", t2."BookId", t2."Title""#,
            r#" FROM "Authors" AS t1 LEFT JOIN "Books" AS t2 ON t1."Id" = t2."AuthorId""#,
            r#" WHERE t1."Country" = @p1"#,
            r#" OR (SELECT COUNT(*) FROM "Books" AS t3 WHERE t3."AuthorId" = t1."Id") > @p2"#,
            r#" ORDER BY t1."Name", t1."Id", t2."BookId""#
        )
    );
}

#[test]
fn test_json_write_file_compiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.json");
    fs::write(
        &path,
        r#"{"operation": "update", "resource": "reviews", "id": 5, "attributes": {"rating": 2, "body": "Meh"}}"#,
    )
    .unwrap();

    let operation = WriteOperation::from_file(&path).unwrap();
    let catalog = library_catalog();
    let config = default_config();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_write(&operation)
        .unwrap();

    assert_eq!(
        render(&compiled, DialectKind::MySql).sql,
        "UPDATE `Reviews` SET `Rating` = @p1, `Body` = @p2 WHERE `Id` = @p3"
    );
}

#[test]
fn test_unknown_resource_in_file_is_a_translation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("query.yaml");
    fs::write(&path, "resource: publishers\n").unwrap();

    let query = QueryDescription::from_file(&path).unwrap();
    let catalog = library_catalog();
    let config = default_config();
    let error = StatementBuilder::new(&catalog, &config)
        .build_select(&query)
        .unwrap_err();
    assert_eq!(error, TranslationError::UnknownResource("publishers".into()));
    assert_eq!(error.to_string(), "Unknown resource type 'publishers'");
}

#[test]
fn test_missing_schema_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let error = ResourceCatalog::from_yaml_file(dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(error, CatalogError::ConfigReadError { .. }));
}

#[test]
fn test_config_file_then_cli_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiler.yaml");
    fs::write(&path, "dialect: postgres\nmax_page_size: 50\n").unwrap();

    let mut config = CompilerConfig::from_yaml_file(&path).unwrap();
    assert_eq!(config.dialect, DialectKind::PostgreSql);
    assert_eq!(config.max_page_size, 50);
    assert_eq!(config.default_page_size, 10);

    config
        .merge(&CliConfig {
            dialect: Some(DialectKind::Sqlite),
            ..CliConfig::default()
        })
        .unwrap();
    assert_eq!(config.dialect, DialectKind::Sqlite);
    assert_eq!(config.max_page_size, 50);

    let invalid = config.merge(&CliConfig {
        default_page_size: Some(80),
        ..CliConfig::default()
    });
    assert!(invalid.is_err(), "default page size above the maximum must fail");
}

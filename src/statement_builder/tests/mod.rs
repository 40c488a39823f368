//! Translation tests against a small shop catalog.
//!
//! Most assertions compare ANSI-rendered SQL, which spells out aliases,
//! joins and parameter order in one string.

mod filter_tests;

use crate::config::CompilerConfig;
use crate::query_description::{QueryDescription, WriteOperation};
use crate::resource_catalog::ResourceCatalog;
use crate::sql_generator::{render, DialectKind, RenderedSql};
use crate::sql_tree::{CompiledStatement, ParameterValue};

use super::{StatementBuilder, TranslationError};

pub(super) const SHOP_SCHEMA: &str = r#"
resources:
  - name: customers
    table: Customers
    id: { column: Id, type: integer }
    attributes:
      - { name: name, column: Name, type: text }
      - { name: age, column: Age, type: integer }
    relationships:
      - { name: orders, kind: to_many, resource: orders, foreign_key: CustomerId }
      - { name: profile, kind: to_one, resource: profiles, foreign_key: CustomerId, foreign_key_side: right }
  - name: orders
    table: Orders
    attributes:
      - { name: status, column: Status, type: text }
      - { name: total, column: Total, type: decimal }
      - { name: placed_at, column: PlacedAt, type: date_time }
    relationships:
      - { name: customer, kind: to_one, resource: customers, foreign_key: CustomerId }
      - { name: lines, kind: to_many, resource: order_lines, foreign_key: OrderId }
  - name: order_lines
    table: OrderLines
    attributes:
      - { name: quantity, column: Quantity, type: integer }
    relationships:
      - { name: order, kind: to_one, resource: orders, foreign_key: OrderId }
      - { name: product, kind: to_one, resource: products, foreign_key: ProductId }
  - name: products
    table: Products
    attributes:
      - { name: name, column: Name, type: text }
  - name: profiles
    table: Profiles
    attributes:
      - { name: bio, column: Bio, type: text }
    relationships:
      - { name: customer, kind: to_one, resource: customers, foreign_key: CustomerId }
"#;

pub(super) fn shop_catalog() -> ResourceCatalog {
    ResourceCatalog::from_yaml_str(SHOP_SCHEMA).expect("shop schema should load")
}

pub(super) fn select(query: &QueryDescription) -> Result<CompiledStatement, TranslationError> {
    let catalog = shop_catalog();
    let config = CompilerConfig::default();
    StatementBuilder::new(&catalog, &config).build_select(query)
}

pub(super) fn select_sql(query: &QueryDescription) -> RenderedSql {
    render(&select(query).expect("query should translate"), DialectKind::Ansi)
}

pub(super) fn count_sql(query: &QueryDescription) -> RenderedSql {
    let catalog = shop_catalog();
    let config = CompilerConfig::default();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_count(query)
        .expect("count should translate");
    render(&compiled, DialectKind::Ansi)
}

pub(super) fn write(operation: &WriteOperation) -> Result<CompiledStatement, TranslationError> {
    let catalog = shop_catalog();
    let config = CompilerConfig::default();
    StatementBuilder::new(&catalog, &config).build_write(operation)
}

pub(super) fn write_sql(operation: &WriteOperation) -> RenderedSql {
    render(&write(operation).expect("write should translate"), DialectKind::Ansi)
}

/// `(name, value)` pairs in placeholder order.
pub(super) fn parameters(rendered: &RenderedSql) -> Vec<(&str, &ParameterValue)> {
    rendered
        .parameters
        .iter()
        .map(|parameter| (parameter.name.as_str(), &parameter.value))
        .collect()
}

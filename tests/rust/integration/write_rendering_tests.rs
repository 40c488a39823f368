use std::collections::BTreeMap;

use resource_sql::query_description::{LiteralValue, WriteOperation};
use resource_sql::sql_generator::{render, DialectKind};
use resource_sql::sql_tree::ParameterValue;
use resource_sql::statement_builder::StatementBuilder;
use rust_decimal::Decimal;
use test_case::test_case;

use super::{default_config, library_catalog};

const BOOK_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

fn create_book() -> WriteOperation {
    let mut attributes = BTreeMap::new();
    attributes.insert("id".to_string(), LiteralValue::from(BOOK_ID));
    attributes.insert("title".to_string(), LiteralValue::from("Dune"));
    attributes.insert("price".to_string(), LiteralValue::from("9.99"));
    attributes.insert("in_print".to_string(), LiteralValue::from(true));
    let mut relationships = BTreeMap::new();
    relationships.insert("author".to_string(), LiteralValue::Integer(3));

    WriteOperation::Create {
        resource: "books".into(),
        attributes,
        relationships,
    }
}

#[test_case(DialectKind::Ansi,
    r#"INSERT INTO "Books" ("BookId", "Title", "Price", "InPrint", "AuthorId") VALUES (@p1, @p2, @p3, @p4, @p5)"#;
    "ansi")]
#[test_case(DialectKind::PostgreSql,
    r#"INSERT INTO "Books" ("BookId", "Title", "Price", "InPrint", "AuthorId") VALUES ($1, $2, $3, $4, $5) RETURNING "BookId""#;
    "postgresql")]
#[test_case(DialectKind::SqlServer,
    "INSERT INTO [Books] ([BookId], [Title], [Price], [InPrint], [AuthorId]) OUTPUT INSERTED.[BookId] VALUES (@p1, @p2, @p3, @p4, @p5)";
    "sqlserver")]
#[test_case(DialectKind::MySql,
    "INSERT INTO `Books` (`BookId`, `Title`, `Price`, `InPrint`, `AuthorId`) VALUES (@p1, @p2, @p3, @p4, @p5); SELECT LAST_INSERT_ID()";
    "mysql")]
#[test_case(DialectKind::Sqlite,
    r#"INSERT INTO "Books" ("BookId", "Title", "Price", "InPrint", "AuthorId") VALUES (@p1, @p2, @p3, @p4, @p5) RETURNING "BookId""#;
    "sqlite")]
fn test_insert_key_retrieval_per_dialect(dialect: DialectKind, expected: &str) {
    let catalog = library_catalog();
    let config = default_config();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_write(&create_book())
        .unwrap();
    assert_eq!(render(&compiled, dialect).sql, expected);
}

#[test]
fn test_insert_parameters_are_typed() {
    let catalog = library_catalog();
    let config = default_config();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_write(&create_book())
        .unwrap();
    let values: Vec<ParameterValue> = render(&compiled, DialectKind::Ansi)
        .parameters
        .into_iter()
        .map(|parameter| parameter.value)
        .collect();

    assert_eq!(
        values,
        vec![
            ParameterValue::Uuid(uuid::Uuid::parse_str(BOOK_ID).unwrap()),
            ParameterValue::Text("Dune".into()),
            ParameterValue::Decimal(Decimal::new(999, 2)),
            ParameterValue::Boolean(true),
            ParameterValue::Integer(3),
        ]
    );
}

#[test]
fn test_relationship_update_uses_child_id_type() {
    let catalog = library_catalog();
    let config = default_config();
    let operation = WriteOperation::AddToRelationship {
        resource: "authors".into(),
        id: LiteralValue::Integer(3),
        relationship: "books".into(),
        related_ids: vec![LiteralValue::from(BOOK_ID)],
    };
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_write(&operation)
        .unwrap();
    let rendered = render(&compiled, DialectKind::SqlServer);

    assert_eq!(
        rendered.sql,
        "UPDATE [Books] SET [AuthorId] = @p1 WHERE [BookId] IN (@p2)"
    );
    assert_eq!(rendered.parameters[0].value, ParameterValue::Integer(3));
    assert!(matches!(rendered.parameters[1].value, ParameterValue::Uuid(_)));
}

#[test]
fn test_rendered_sql_serializes_to_json() {
    let catalog = library_catalog();
    let config = default_config();
    let operation = WriteOperation::Delete {
        resource: "reviews".into(),
        id: LiteralValue::Integer(12),
    };
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_write(&operation)
        .unwrap();
    let json = serde_json::to_value(render(&compiled, DialectKind::PostgreSql)).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "sql": "DELETE FROM \"Reviews\" WHERE \"Id\" = $1",
            "parameters": [{ "name": "@p1", "value": 12 }]
        })
    );
}

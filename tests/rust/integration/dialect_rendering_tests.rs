//! One query rendered for every dialect.

use resource_sql::query_description::{FilterExpression, FilterOperand, QueryDescription, SortElement};
use resource_sql::sql_generator::{render, DialectKind};
use resource_sql::sql_tree::{ComparisonOperator, ParameterValue, TextMatchKind};
use resource_sql::statement_builder::StatementBuilder;
use test_case::test_case;

use super::{default_config, library_catalog};

/// Books by authors whose name starts with "Le" that have a review rated 4 or
/// more, newest first, second page of 20.
fn well_reviewed_books() -> QueryDescription {
    QueryDescription::new("books")
        .with_filter(FilterExpression::And(vec![
            FilterExpression::matches("author.name", TextMatchKind::StartsWith, "Le"),
            FilterExpression::has(
                "reviews",
                Some(FilterExpression::comparison(
                    ComparisonOperator::GreaterOrEqual,
                    FilterOperand::field("rating"),
                    FilterOperand::value(4),
                )),
            ),
        ]))
        .with_sort(SortElement::field("published_at", false))
        .with_page(2, 20)
}

#[test_case(DialectKind::Ansi, concat!(
    r#"SELECT t1."BookId", t1."Title", t1."Price", t1."PublishedAt", t1."InPrint", t1."AuthorId""#,
    r#" FROM "Books" AS t1 LEFT JOIN "Authors" AS t2 ON t1."AuthorId" = t2."Id""#,
    r#" WHERE t2."Name" LIKE 'Le%' AND EXISTS (SELECT 1 FROM "Reviews" AS t3 WHERE t3."BookId" = t1."BookId" AND t3."Rating" >= @p1)"#,
    r#" ORDER BY t1."PublishedAt" DESC OFFSET @p3 ROWS FETCH FIRST @p2 ROWS ONLY"#
); "ansi")]
#[test_case(DialectKind::PostgreSql, concat!(
    r#"SELECT t1."BookId", t1."Title", t1."Price", t1."PublishedAt", t1."InPrint", t1."AuthorId""#,
    r#" FROM "Books" AS t1 LEFT JOIN "Authors" AS t2 ON t1."AuthorId" = t2."Id""#,
    r#" WHERE t2."Name" LIKE 'Le%' AND EXISTS (SELECT 1 FROM "Reviews" AS t3 WHERE t3."BookId" = t1."BookId" AND t3."Rating" >= $1)"#,
    r#" ORDER BY t1."PublishedAt" DESC LIMIT $2 OFFSET $3"#
); "postgresql")]
#[test_case(DialectKind::SqlServer, concat!(
    "SELECT t1.[BookId], t1.[Title], t1.[Price], t1.[PublishedAt], t1.[InPrint], t1.[AuthorId]",
    " FROM [Books] AS t1 LEFT JOIN [Authors] AS t2 ON t1.[AuthorId] = t2.[Id]",
    " WHERE t2.[Name] LIKE 'Le%' AND EXISTS (SELECT 1 FROM [Reviews] AS t3 WHERE t3.[BookId] = t1.[BookId] AND t3.[Rating] >= @p1)",
    " ORDER BY t1.[PublishedAt] DESC OFFSET @p3 ROWS FETCH NEXT @p2 ROWS ONLY"
); "sqlserver")]
#[test_case(DialectKind::MySql, concat!(
    "SELECT t1.`BookId`, t1.`Title`, t1.`Price`, t1.`PublishedAt`, t1.`InPrint`, t1.`AuthorId`",
    " FROM `Books` AS t1 LEFT JOIN `Authors` AS t2 ON t1.`AuthorId` = t2.`Id`",
    " WHERE t2.`Name` LIKE 'Le%' AND EXISTS (SELECT 1 FROM `Reviews` AS t3 WHERE t3.`BookId` = t1.`BookId` AND t3.`Rating` >= @p1)",
    " ORDER BY t1.`PublishedAt` DESC LIMIT @p2 OFFSET @p3"
); "mysql")]
#[test_case(DialectKind::Sqlite, concat!(
    r#"SELECT t1."BookId", t1."Title", t1."Price", t1."PublishedAt", t1."InPrint", t1."AuthorId""#,
    r#" FROM "Books" AS t1 LEFT JOIN "Authors" AS t2 ON t1."AuthorId" = t2."Id""#,
    r#" WHERE t2."Name" LIKE 'Le%' AND EXISTS (SELECT 1 FROM "Reviews" AS t3 WHERE t3."BookId" = t1."BookId" AND t3."Rating" >= @p1)"#,
    r#" ORDER BY t1."PublishedAt" DESC LIMIT @p2 OFFSET @p3"#
); "sqlite")]
fn test_query_renders_per_dialect(dialect: DialectKind, expected: &str) {
    let catalog = library_catalog();
    let config = default_config();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_select(&well_reviewed_books())
        .unwrap();

    let rendered = render(&compiled, dialect);
    assert_eq!(rendered.sql, expected);
    assert_eq!(rendered.parameters.len(), 3);
}

#[test]
fn test_parameters_follow_placeholder_order() {
    let catalog = library_catalog();
    let config = default_config();
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_select(&well_reviewed_books())
        .unwrap();

    let ansi: Vec<(String, ParameterValue)> = render(&compiled, DialectKind::Ansi)
        .parameters
        .into_iter()
        .map(|parameter| (parameter.name, parameter.value))
        .collect();
    assert_eq!(
        ansi,
        vec![
            ("@p1".to_string(), ParameterValue::Integer(4)),
            ("@p3".to_string(), ParameterValue::Integer(20)),
            ("@p2".to_string(), ParameterValue::Integer(20)),
        ]
    );

    let postgres: Vec<String> = render(&compiled, DialectKind::PostgreSql)
        .parameters
        .into_iter()
        .map(|parameter| parameter.name)
        .collect();
    assert_eq!(postgres, vec!["@p1", "@p2", "@p3"]);
}

#[test]
fn test_rendering_is_deterministic() {
    let catalog = library_catalog();
    let config = default_config();
    let builder = StatementBuilder::new(&catalog, &config);
    let query = well_reviewed_books().with_include("author");

    for dialect in DialectKind::ALL {
        let first = render(&builder.build_select(&query).unwrap(), dialect);
        let second = render(&builder.build_select(&query).unwrap(), dialect);
        assert_eq!(first, second, "{} rendering changed between runs", dialect);
    }
}

#[test]
fn test_uuid_ids_are_converted() {
    let catalog = library_catalog();
    let config = default_config();
    let query = QueryDescription::new("reviews").with_filter(FilterExpression::equals(
        "book.id",
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
    ));
    let compiled = StatementBuilder::new(&catalog, &config)
        .build_select(&query)
        .unwrap();
    let rendered = render(&compiled, DialectKind::PostgreSql);

    assert!(rendered.sql.ends_with(r#"WHERE t2."BookId" = $1"#), "{}", rendered.sql);
    assert!(matches!(rendered.parameters[0].value, ParameterValue::Uuid(_)));

    let invalid = QueryDescription::new("reviews")
        .with_filter(FilterExpression::equals("book.id", "not-a-uuid"));
    assert!(StatementBuilder::new(&catalog, &config)
        .build_select(&invalid)
        .is_err());
}

use super::*;
use crate::query_description::{FilterExpression, FilterOperand, LiteralValue};
use crate::resource_catalog::AttributeType;
use crate::sql_tree::{ComparisonOperator, FilterNode, TextMatchKind, ValueNode};

fn filtered(resource: &str, filter: FilterExpression) -> QueryDescription {
    QueryDescription::new(resource).with_filter(filter)
}

fn where_sql(resource: &str, filter: FilterExpression) -> (String, RenderedSql) {
    let rendered = select_sql(&filtered(resource, filter));
    let clause = rendered
        .sql
        .split_once(" WHERE ")
        .map(|(_, clause)| clause.to_string())
        .expect("query should have a WHERE clause");
    (clause, rendered)
}

fn compare(operator: ComparisonOperator, field: &str, value: impl Into<LiteralValue>) -> FilterExpression {
    FilterExpression::comparison(operator, FilterOperand::field(field), FilterOperand::value(value))
}

#[test]
fn test_comparison_on_root_attribute_becomes_parameter() {
    let compiled = select(&filtered(
        "customers",
        compare(ComparisonOperator::GreaterOrEqual, "age", 18),
    ))
    .unwrap();

    let select_node = compiled.statement().as_select().unwrap();
    match select_node.where_clause().unwrap().filter() {
        FilterNode::Comparison(comparison) => {
            assert_eq!(comparison.operator(), ComparisonOperator::GreaterOrEqual);
            match comparison.left() {
                ValueNode::Column(column) => {
                    assert_eq!(column.table_alias(), Some("t1"));
                    assert_eq!(column.name(), "Age");
                }
                other => panic!("expected a column, got {:?}", other),
            }
            match comparison.right() {
                ValueNode::Parameter(parameter) => {
                    assert_eq!(parameter.name(), "@p1");
                    assert_eq!(parameter.value(), &ParameterValue::Integer(18));
                }
                other => panic!("expected a parameter, got {:?}", other),
            }
        }
        other => panic!("expected a comparison, got {:?}", other),
    }
}

#[test]
fn test_literal_on_left_is_mirrored() {
    let filter = FilterExpression::comparison(
        ComparisonOperator::LessOrEqual,
        FilterOperand::value(18),
        FilterOperand::field("age"),
    );
    let (clause, _) = where_sql("customers", filter);
    assert_eq!(clause, r#"t1."Age" >= @p1"#);
}

#[test]
fn test_two_literals_cannot_be_compared() {
    let filter = FilterExpression::comparison(
        ComparisonOperator::Equals,
        FilterOperand::value(1),
        FilterOperand::value(1),
    );
    assert!(matches!(
        select(&filtered("customers", filter)),
        Err(TranslationError::UnsupportedFilter(_))
    ));
}

#[test]
fn test_equals_null_is_null_test() {
    let filter = FilterExpression::comparison(
        ComparisonOperator::Equals,
        FilterOperand::field("name"),
        FilterOperand::null(),
    );
    let (clause, rendered) = where_sql("customers", filter);
    assert_eq!(clause, r#"t1."Name" IS NULL"#);
    assert!(rendered.parameters.is_empty());
}

#[test]
fn test_ordering_against_null_is_rejected() {
    let filter = FilterExpression::comparison(
        ComparisonOperator::GreaterThan,
        FilterOperand::field("age"),
        FilterOperand::null(),
    );
    assert!(matches!(
        select(&filtered("customers", filter)),
        Err(TranslationError::UnsupportedFilter(_))
    ));
}

#[test]
fn test_exists_with_nested_filter() {
    let filter = FilterExpression::has("orders", Some(FilterExpression::equals("status", "Shipped")));
    let (clause, rendered) = where_sql("customers", filter);
    assert_eq!(
        clause,
        concat!(
            r#"EXISTS (SELECT 1 FROM "Orders" AS t2"#,
            r#" WHERE t2."CustomerId" = t1."Id" AND t2."Status" = @p1)"#
        )
    );
    assert_eq!(
        parameters(&rendered),
        vec![("@p1", &ParameterValue::Text("Shipped".into()))]
    );
}

#[test]
fn test_exists_without_filter_only_correlates() {
    let (clause, _) = where_sql("customers", FilterExpression::has("orders", None));
    assert_eq!(
        clause,
        r#"EXISTS (SELECT 1 FROM "Orders" AS t2 WHERE t2."CustomerId" = t1."Id")"#
    );
}

#[test]
fn test_nested_filter_joins_inside_its_sub_select() {
    let filter = FilterExpression::has(
        "lines",
        Some(FilterExpression::equals("product.name", "Lamp")),
    );
    let (clause, _) = where_sql("orders", filter);
    assert_eq!(
        clause,
        concat!(
            r#"EXISTS (SELECT 1 FROM "OrderLines" AS t2"#,
            r#" LEFT JOIN "Products" AS t3 ON t2."ProductId" = t3."Id""#,
            r#" WHERE t2."OrderId" = t1."Id" AND t3."Name" = @p1)"#
        )
    );
}

#[test]
fn test_has_over_to_one_relationship_is_rejected() {
    let error = select(&filtered("orders", FilterExpression::has("customer", None))).unwrap_err();
    assert!(matches!(error, TranslationError::InvalidFieldChain { .. }));
}

#[test]
fn test_count_comparison() {
    let filter = FilterExpression::comparison(
        ComparisonOperator::GreaterThan,
        FilterOperand::count("orders"),
        FilterOperand::value("2"),
    );
    let (clause, rendered) = where_sql("customers", filter);
    assert_eq!(
        clause,
        r#"(SELECT COUNT(*) FROM "Orders" AS t2 WHERE t2."CustomerId" = t1."Id") > @p1"#
    );
    assert_eq!(parameters(&rendered), vec![("@p1", &ParameterValue::Integer(2))]);
}

#[test]
fn test_to_one_chain_adds_joins() {
    let (clause, rendered) = where_sql(
        "order_lines",
        FilterExpression::equals("order.customer.name", "Ann"),
    );
    assert_eq!(clause, r#"t3."Name" = @p1"#);
    assert!(rendered.sql.contains(concat!(
        r#" FROM "OrderLines" AS t1"#,
        r#" LEFT JOIN "Orders" AS t2 ON t1."OrderId" = t2."Id""#,
        r#" LEFT JOIN "Customers" AS t3 ON t2."CustomerId" = t3."Id""#,
    )));
    // Joined only for filtering, so nothing of t2 or t3 is selected.
    assert!(rendered.sql.starts_with(
        r#"SELECT t1."Id", t1."Quantity", t1."OrderId", t1."ProductId" FROM"#
    ));
}

#[test]
fn test_to_many_relationship_inside_chain_is_rejected() {
    let error = select(&filtered("customers", FilterExpression::equals("orders.status", "Open")))
        .unwrap_err();
    match error {
        TranslationError::InvalidFieldChain { chain, reason } => {
            assert_eq!(chain, "orders.status");
            assert!(reason.contains("has() or count()"), "{}", reason);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_unknown_and_relationship_fields_are_rejected() {
    assert_eq!(
        select(&filtered("customers", FilterExpression::equals("nickname", "x"))).unwrap_err(),
        TranslationError::UnknownField {
            resource: "customers".into(),
            field: "nickname".into(),
        }
    );
    assert!(matches!(
        select(&filtered("orders", FilterExpression::equals("customer", 1))),
        Err(TranslationError::InvalidFieldChain { .. })
    ));
    assert!(matches!(
        select(&filtered("orders", FilterExpression::equals("customer..name", 1))),
        Err(TranslationError::InvalidFieldChain { .. })
    ));
}

#[test]
fn test_literal_is_converted_to_declared_type() {
    let (_, rendered) = where_sql("orders", FilterExpression::equals("total", "19.99"));
    assert_eq!(
        parameters(&rendered),
        vec![("@p1", &ParameterValue::Decimal(rust_decimal::Decimal::new(1999, 2)))]
    );

    let error = select(&filtered("customers", FilterExpression::equals("age", "abc"))).unwrap_err();
    assert_eq!(
        error,
        TranslationError::ValueConversion {
            field: "age".into(),
            expected: AttributeType::Integer,
            value: "'abc'".into(),
        }
    );
}

#[test]
fn test_logical_nesting_is_parenthesized() {
    let filter = FilterExpression::Or(vec![
        FilterExpression::equals("status", "Open"),
        FilterExpression::And(vec![
            compare(ComparisonOperator::GreaterThan, "total", 100),
            FilterExpression::Not(Box::new(FilterExpression::comparison(
                ComparisonOperator::Equals,
                FilterOperand::field("placed_at"),
                FilterOperand::null(),
            ))),
        ]),
    ]);
    let (clause, rendered) = where_sql("orders", filter);
    assert_eq!(
        clause,
        r#"t1."Status" = @p1 OR (t1."Total" > @p2 AND NOT (t1."PlacedAt" IS NULL))"#
    );
    assert_eq!(rendered.parameters.len(), 2);
}

#[test]
fn test_single_term_logical_collapses_and_empty_fails() {
    let (clause, _) = where_sql(
        "orders",
        FilterExpression::And(vec![FilterExpression::equals("status", "Open")]),
    );
    assert_eq!(clause, r#"t1."Status" = @p1"#);

    assert!(matches!(
        select(&filtered("orders", FilterExpression::Or(Vec::new()))),
        Err(TranslationError::UnsupportedFilter(_))
    ));
}

#[test]
fn test_any_becomes_in_list() {
    let filter = FilterExpression::Any {
        field: "status".into(),
        values: vec!["Open".into(), "Shipped".into()],
    };
    let (clause, rendered) = where_sql("orders", filter);
    assert_eq!(clause, r#"t1."Status" IN (@p1, @p2)"#);
    assert_eq!(
        parameters(&rendered),
        vec![
            ("@p1", &ParameterValue::Text("Open".into())),
            ("@p2", &ParameterValue::Text("Shipped".into())),
        ]
    );

    let with_null = FilterExpression::Any {
        field: "status".into(),
        values: vec![LiteralValue::Null],
    };
    assert!(matches!(
        select(&filtered("orders", with_null)),
        Err(TranslationError::UnsupportedFilter(_))
    ));
}

#[test]
fn test_text_match_is_inlined_with_escaping() {
    let (clause, rendered) = where_sql(
        "customers",
        FilterExpression::matches("name", TextMatchKind::StartsWith, "O'Ne_"),
    );
    assert_eq!(clause, r#"t1."Name" LIKE 'O''Ne\_%' ESCAPE '\'"#);
    assert!(rendered.parameters.is_empty());

    assert!(matches!(
        select(&filtered(
            "customers",
            FilterExpression::matches("age", TextMatchKind::Contains, "1")
        )),
        Err(TranslationError::UnsupportedFilter(_))
    ));
}

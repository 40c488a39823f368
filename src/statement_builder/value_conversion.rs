//! Converts document-level literals to the declared type of the field they
//! are bound to.

use std::str::FromStr;

use chrono::DateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::errors::TranslationError;
use crate::query_description::LiteralValue;
use crate::resource_catalog::AttributeType;
use crate::sql_tree::ParameterValue;

fn describe(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::Null => "null".to_string(),
        LiteralValue::Boolean(value) => value.to_string(),
        LiteralValue::Integer(value) => value.to_string(),
        LiteralValue::Float(value) => value.to_string(),
        LiteralValue::Text(value) => format!("'{}'", value),
    }
}

pub(crate) fn convert_literal(
    literal: &LiteralValue,
    expected: AttributeType,
    field: &str,
) -> Result<ParameterValue, TranslationError> {
    let failed = || TranslationError::ValueConversion {
        field: field.to_string(),
        expected,
        value: describe(literal),
    };

    let converted = match (expected, literal) {
        (_, LiteralValue::Null) => ParameterValue::Null,

        (AttributeType::Text, LiteralValue::Text(text)) => ParameterValue::Text(text.clone()),
        (AttributeType::Text, LiteralValue::Integer(value)) => ParameterValue::Text(value.to_string()),
        (AttributeType::Text, LiteralValue::Float(value)) => ParameterValue::Text(value.to_string()),
        (AttributeType::Text, LiteralValue::Boolean(value)) => ParameterValue::Text(value.to_string()),

        (AttributeType::Integer, LiteralValue::Integer(value)) => ParameterValue::Integer(*value),
        (AttributeType::Integer, LiteralValue::Float(value))
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 =>
        {
            ParameterValue::Integer(*value as i64)
        }
        (AttributeType::Integer, LiteralValue::Text(text)) => {
            ParameterValue::Integer(text.trim().parse().map_err(|_| failed())?)
        }

        (AttributeType::Float, LiteralValue::Float(value)) => ParameterValue::Float(*value),
        (AttributeType::Float, LiteralValue::Integer(value)) => ParameterValue::Float(*value as f64),
        (AttributeType::Float, LiteralValue::Text(text)) => {
            ParameterValue::Float(text.trim().parse().map_err(|_| failed())?)
        }

        (AttributeType::Decimal, LiteralValue::Integer(value)) => {
            ParameterValue::Decimal(Decimal::from(*value))
        }
        (AttributeType::Decimal, LiteralValue::Float(value)) => {
            ParameterValue::Decimal(Decimal::try_from(*value).map_err(|_| failed())?)
        }
        (AttributeType::Decimal, LiteralValue::Text(text)) => {
            ParameterValue::Decimal(Decimal::from_str(text.trim()).map_err(|_| failed())?)
        }

        (AttributeType::Boolean, LiteralValue::Boolean(value)) => ParameterValue::Boolean(*value),
        (AttributeType::Boolean, LiteralValue::Text(text)) => {
            match text.trim().to_ascii_lowercase().as_str() {
                "true" => ParameterValue::Boolean(true),
                "false" => ParameterValue::Boolean(false),
                _ => return Err(failed()),
            }
        }

        (AttributeType::DateTime, LiteralValue::Text(text)) => {
            ParameterValue::DateTime(DateTime::parse_from_rfc3339(text.trim()).map_err(|_| failed())?)
        }

        (AttributeType::Uuid, LiteralValue::Text(text)) => {
            ParameterValue::Uuid(Uuid::parse_str(text.trim()).map_err(|_| failed())?)
        }

        _ => return Err(failed()),
    };
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_literals_convert_to_declared_type() {
        assert_eq!(
            convert_literal(&LiteralValue::Text("42".into()), AttributeType::Integer, "age"),
            Ok(ParameterValue::Integer(42))
        );
        assert_eq!(
            convert_literal(&LiteralValue::Text("TRUE".into()), AttributeType::Boolean, "active"),
            Ok(ParameterValue::Boolean(true))
        );
        assert_eq!(
            convert_literal(&LiteralValue::Text("19.99".into()), AttributeType::Decimal, "price"),
            Ok(ParameterValue::Decimal(Decimal::new(1999, 2)))
        );
        let uuid = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            convert_literal(&LiteralValue::Text(uuid.into()), AttributeType::Uuid, "key"),
            Ok(ParameterValue::Uuid(Uuid::parse_str(uuid).unwrap()))
        );
    }

    #[test]
    fn test_date_time_keeps_offset() {
        let converted = convert_literal(
            &LiteralValue::Text("2024-03-01T10:00:00+02:00".into()),
            AttributeType::DateTime,
            "placed_at",
        )
        .unwrap();
        match converted {
            ParameterValue::DateTime(value) => {
                assert_eq!(value.offset().local_minus_utc(), 7200);
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_whole_floats_become_integers() {
        assert_eq!(
            convert_literal(&LiteralValue::Float(3.0), AttributeType::Integer, "age"),
            Ok(ParameterValue::Integer(3))
        );
        assert!(convert_literal(&LiteralValue::Float(3.5), AttributeType::Integer, "age").is_err());
    }

    #[test]
    fn test_conversion_error_names_field() {
        let error =
            convert_literal(&LiteralValue::Text("soon".into()), AttributeType::DateTime, "orders.placed_at")
                .unwrap_err();
        assert_eq!(
            error,
            TranslationError::ValueConversion {
                field: "orders.placed_at".into(),
                expected: AttributeType::DateTime,
                value: "'soon'".into(),
            }
        );
        assert!(convert_literal(&LiteralValue::Boolean(true), AttributeType::Uuid, "key").is_err());
    }

    #[test]
    fn test_null_passes_through() {
        assert_eq!(
            convert_literal(&LiteralValue::Null, AttributeType::Uuid, "key"),
            Ok(ParameterValue::Null)
        );
    }
}

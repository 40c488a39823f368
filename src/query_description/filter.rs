use serde::{Deserialize, Serialize};

use crate::sql_tree::{ComparisonOperator, TextMatchKind};

/// A literal as it arrives from the document layer, before conversion to the
/// declared type of the field it is compared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LiteralValue {
    pub fn is_null(&self) -> bool {
        matches!(self, LiteralValue::Null)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Integer(i64::from(value))
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Integer(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperand {
    /// Dotted field chain, e.g. `customer.name`.
    Field(String),
    /// Number of related resources behind a to-many relationship chain.
    Count(String),
    Value(LiteralValue),
}

impl FilterOperand {
    pub fn field(chain: impl Into<String>) -> Self {
        FilterOperand::Field(chain.into())
    }

    pub fn count(chain: impl Into<String>) -> Self {
        FilterOperand::Count(chain.into())
    }

    pub fn value(value: impl Into<LiteralValue>) -> Self {
        FilterOperand::Value(value.into())
    }

    pub fn null() -> Self {
        FilterOperand::Value(LiteralValue::Null)
    }
}

/// Resource-level filter expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpression {
    Comparison {
        operator: ComparisonOperator,
        left: FilterOperand,
        right: FilterOperand,
    },
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
    Not(Box<FilterExpression>),
    /// Set membership: the field equals one of the values.
    Any {
        field: String,
        values: Vec<LiteralValue>,
    },
    Match {
        field: String,
        kind: TextMatchKind,
        text: String,
    },
    /// At least one related resource exists (optionally matching `filter`).
    Has {
        relationship: String,
        #[serde(default)]
        filter: Option<Box<FilterExpression>>,
    },
}

impl FilterExpression {
    pub fn comparison(operator: ComparisonOperator, left: FilterOperand, right: FilterOperand) -> Self {
        FilterExpression::Comparison {
            operator,
            left,
            right,
        }
    }

    pub fn equals(field: &str, value: impl Into<LiteralValue>) -> Self {
        Self::comparison(
            ComparisonOperator::Equals,
            FilterOperand::field(field),
            FilterOperand::value(value),
        )
    }

    pub fn has(relationship: &str, filter: Option<FilterExpression>) -> Self {
        FilterExpression::Has {
            relationship: relationship.to_string(),
            filter: filter.map(Box::new),
        }
    }

    pub fn matches(field: &str, kind: TextMatchKind, text: &str) -> Self {
        FilterExpression::Match {
            field: field.to_string(),
            kind,
            text: text.to_string(),
        }
    }
}

use std::fmt;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{require_alias, require_identifier, SqlTreeError};
use super::{ColumnSelectorNode, SelectNode};

/// Sigil every parameter name starts with.
pub const PARAMETER_SIGIL: char = '@';

/// Whether a column holds a plain value or a reference to another table's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Scalar,
    ForeignKey,
}

/// A column owned by a table reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInTableNode {
    name: String,
    column_type: ColumnType,
    table_alias: Option<String>,
}

impl ColumnInTableNode {
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        table_alias: Option<String>,
    ) -> Result<Self, SqlTreeError> {
        let name = name.into();
        require_identifier("column", "column name", &name)?;
        require_alias("column", table_alias.as_deref())?;
        Ok(Self {
            name,
            column_type,
            table_alias,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }
}

/// A column projected by a nested SELECT.
///
/// Its name is the identity of the selector it was projected through (the
/// selector alias, or the inner column name when unaliased).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInSelectNode {
    selector: ColumnSelectorNode,
    table_alias: Option<String>,
}

impl ColumnInSelectNode {
    pub fn new(selector: ColumnSelectorNode, table_alias: Option<String>) -> Self {
        Self {
            selector,
            table_alias,
        }
    }

    pub fn name(&self) -> &str {
        self.selector.identity()
    }

    pub fn column_type(&self) -> ColumnType {
        self.selector.column().column_type()
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    pub fn selector(&self) -> &ColumnSelectorNode {
        &self.selector
    }

    /// Name of the physical column this projection ultimately reads from.
    pub fn persisted_column_name(&self) -> &str {
        self.base_column().name()
    }

    /// Unwraps nested projections down to the owning base column.
    pub fn base_column(&self) -> &ColumnInTableNode {
        match self.selector.column() {
            ColumnNode::InTable(column) => column,
            ColumnNode::InSelect(column) => column.base_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnNode {
    InTable(ColumnInTableNode),
    InSelect(ColumnInSelectNode),
}

impl ColumnNode {
    pub fn name(&self) -> &str {
        match self {
            ColumnNode::InTable(column) => column.name(),
            ColumnNode::InSelect(column) => column.name(),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnNode::InTable(column) => column.column_type(),
            ColumnNode::InSelect(column) => column.column_type(),
        }
    }

    pub fn table_alias(&self) -> Option<&str> {
        match self {
            ColumnNode::InTable(column) => column.table_alias(),
            ColumnNode::InSelect(column) => column.table_alias(),
        }
    }

    pub fn persisted_column_name(&self) -> &str {
        match self {
            ColumnNode::InTable(column) => column.name(),
            ColumnNode::InSelect(column) => column.persisted_column_name(),
        }
    }

    pub fn base_column(&self) -> &ColumnInTableNode {
        match self {
            ColumnNode::InTable(column) => column,
            ColumnNode::InSelect(column) => column.base_column(),
        }
    }
}

impl From<ColumnInTableNode> for ColumnNode {
    fn from(column: ColumnInTableNode) -> Self {
        ColumnNode::InTable(column)
    }
}

impl From<ColumnInSelectNode> for ColumnNode {
    fn from(column: ColumnInSelectNode) -> Self {
        ColumnNode::InSelect(column)
    }
}

/// A typed value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    DateTime(DateTime<FixedOffset>),
    Uuid(Uuid),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => write!(f, "null"),
            ParameterValue::Boolean(value) => write!(f, "{}", value),
            ParameterValue::Integer(value) => write!(f, "{}", value),
            ParameterValue::Float(value) => write!(f, "{}", value),
            ParameterValue::Decimal(value) => write!(f, "{}", value),
            ParameterValue::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
            ParameterValue::DateTime(value) => write!(f, "'{}'", value.to_rfc3339()),
            ParameterValue::Uuid(value) => write!(f, "'{}'", value),
        }
    }
}

/// A named statement parameter. Two parameters are equal when both name and
/// value are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    name: String,
    value: ParameterValue,
}

impl ParameterNode {
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Result<Self, SqlTreeError> {
        let name = name.into();
        if !name.starts_with(PARAMETER_SIGIL) || name.chars().count() < 2 {
            return Err(SqlTreeError::invalid(
                "parameter",
                format!(
                    "name '{}' must start with '{}' and have at least one more character",
                    name, PARAMETER_SIGIL
                ),
            ));
        }
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullConstantNode;

/// Scalar result of a sub-select that projects `COUNT(*)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountNode {
    sub_select: Box<SelectNode>,
}

impl CountNode {
    pub fn new(sub_select: SelectNode) -> Self {
        Self {
            sub_select: Box::new(sub_select),
        }
    }

    pub fn sub_select(&self) -> &SelectNode {
        &self.sub_select
    }
}

/// Anything that produces a scalar inside a filter, assignment or sort.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Column(ColumnNode),
    Parameter(ParameterNode),
    Null(NullConstantNode),
    Count(CountNode),
}

impl ValueNode {
    pub fn is_null(&self) -> bool {
        matches!(self, ValueNode::Null(_))
    }
}

impl From<ColumnNode> for ValueNode {
    fn from(column: ColumnNode) -> Self {
        ValueNode::Column(column)
    }
}

impl From<ParameterNode> for ValueNode {
    fn from(parameter: ParameterNode) -> Self {
        ValueNode::Parameter(parameter)
    }
}

impl From<NullConstantNode> for ValueNode {
    fn from(null: NullConstantNode) -> Self {
        ValueNode::Null(null)
    }
}

impl From<CountNode> for ValueNode {
    fn from(count: CountNode) -> Self {
        ValueNode::Count(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_name_requires_sigil() {
        assert!(ParameterNode::new("p1", ParameterValue::Integer(1)).is_err());
        assert!(ParameterNode::new("@", ParameterValue::Integer(1)).is_err());

        let parameter = ParameterNode::new("@p1", ParameterValue::Integer(1)).unwrap();
        assert_eq!(parameter.name(), "@p1");
        assert_eq!(parameter.value(), &ParameterValue::Integer(1));
    }

    #[test]
    fn test_parameter_equality_is_by_name_and_value() {
        let a = ParameterNode::new("@p1", ParameterValue::Text("x".into())).unwrap();
        let b = ParameterNode::new("@p1", ParameterValue::Text("x".into())).unwrap();
        let c = ParameterNode::new("@p1", ParameterValue::Text("y".into())).unwrap();
        let d = ParameterNode::new("@p2", ParameterValue::Text("x".into())).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_column_requires_name() {
        assert!(ColumnInTableNode::new("", ColumnType::Scalar, None).is_err());
        assert!(ColumnInTableNode::new("Name", ColumnType::Scalar, Some(String::new())).is_err());
    }

    #[test]
    fn test_projected_column_unwraps_to_base_column() {
        let base = ColumnInTableNode::new("Id", ColumnType::Scalar, Some("t1".into())).unwrap();
        let inner = ColumnSelectorNode::new(base.clone().into(), None).unwrap();
        let projected = ColumnInSelectNode::new(inner, Some("t2".into()));
        let outer = ColumnSelectorNode::new(projected.into(), Some("CustomerKey".into())).unwrap();
        let lifted = ColumnInSelectNode::new(outer, Some("t3".into()));

        assert_eq!(lifted.name(), "CustomerKey");
        assert_eq!(lifted.persisted_column_name(), "Id");
        assert_eq!(lifted.base_column(), &base);
        assert_eq!(lifted.table_alias(), Some("t3"));
    }

    #[test]
    fn test_text_value_display_escapes_quotes() {
        assert_eq!(ParameterValue::Text("O'Neil".into()).to_string(), "'O''Neil'");
        assert_eq!(ParameterValue::Integer(18).to_string(), "18");
    }
}

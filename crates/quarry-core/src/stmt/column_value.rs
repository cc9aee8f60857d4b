use super::Value;
use crate::schema::{Column, ColumnId};

/// A column paired with the value to store in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    pub column: ColumnId,
    pub value: Value,
}

impl ColumnValue {
    pub fn new(column: impl Into<ColumnId>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl From<(&Column, Value)> for ColumnValue {
    fn from((column, value): (&Column, Value)) -> Self {
        Self::new(column, value)
    }
}

use super::{ColumnValue, Statement, Value};
use crate::schema::{ColumnId, TableId};

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableId,

    /// Column values for the inserted row
    pub values: Vec<ColumnValue>,
}

impl Insert {
    pub fn new(table: impl Into<TableId>) -> Self {
        Self {
            table: table.into(),
            values: vec![],
        }
    }

    pub fn value(mut self, column: impl Into<ColumnId>, value: impl Into<Value>) -> Self {
        self.values.push(ColumnValue::new(column, value));
        self
    }

    pub fn values(mut self, values: impl IntoIterator<Item = ColumnValue>) -> Self {
        self.values.extend(values);
        self
    }
}

impl Statement {
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(..))
    }

    /// Attempts to return a reference to an inner [`Insert`].
    pub fn as_insert(&self) -> Option<&Insert> {
        match self {
            Self::Insert(insert) => Some(insert),
            _ => None,
        }
    }

    /// Consumes `self` and attempts to return the inner [`Insert`].
    pub fn into_insert(self) -> Option<Insert> {
        match self {
            Self::Insert(insert) => Some(insert),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner [`Insert`].
    ///
    /// # Panics
    ///
    /// If `self` is not a [`Statement::Insert`].
    pub fn unwrap_insert(self) -> Insert {
        match self {
            Self::Insert(insert) => insert,
            v => panic!("expected `Insert`, found {v:#?}"),
        }
    }
}

impl From<Insert> for Statement {
    fn from(src: Insert) -> Self {
        Self::Insert(src)
    }
}

use super::{ColumnValue, Statement, Value};
use crate::schema::{ColumnId, TableId};

/// An insert-or-update statement, keyed on one column.
///
/// When no row carries the key value, the full value set is inserted. When a
/// row exists, every non-key value is written over it. Dialects without native
/// upsert support reject the statement; no emulation is synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub table: TableId,

    /// The column the existing-row check keys on
    pub key: ColumnId,

    /// Column values for the row, key included
    pub values: Vec<ColumnValue>,
}

impl Merge {
    pub fn new(table: impl Into<TableId>, key: impl Into<ColumnId>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
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
    pub fn is_merge(&self) -> bool {
        matches!(self, Self::Merge(..))
    }

    /// Attempts to return a reference to an inner [`Merge`].
    pub fn as_merge(&self) -> Option<&Merge> {
        match self {
            Self::Merge(merge) => Some(merge),
            _ => None,
        }
    }

    /// Consumes `self` and attempts to return the inner [`Merge`].
    pub fn into_merge(self) -> Option<Merge> {
        match self {
            Self::Merge(merge) => Some(merge),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner [`Merge`].
    ///
    /// # Panics
    ///
    /// If `self` is not a [`Statement::Merge`].
    pub fn unwrap_merge(self) -> Merge {
        match self {
            Self::Merge(merge) => merge,
            v => panic!("expected `Merge`, found {v:#?}"),
        }
    }
}

impl From<Merge> for Statement {
    fn from(src: Merge) -> Self {
        Self::Merge(src)
    }
}

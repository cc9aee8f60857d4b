use super::{Condition, Statement};
use crate::schema::TableId;

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableId,

    /// No filter deletes every row in the table
    pub filter: Option<Condition>,
}

impl Delete {
    pub fn new(table: impl Into<TableId>) -> Self {
        Self {
            table: table.into(),
            filter: None,
        }
    }

    /// Sets the filter, replacing any previous one.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }
}

impl Statement {
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete(..))
    }

    /// Attempts to return a reference to an inner [`Delete`].
    pub fn as_delete(&self) -> Option<&Delete> {
        match self {
            Self::Delete(delete) => Some(delete),
            _ => None,
        }
    }

    /// Consumes `self` and attempts to return the inner [`Delete`].
    pub fn into_delete(self) -> Option<Delete> {
        match self {
            Self::Delete(delete) => Some(delete),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner [`Delete`].
    ///
    /// # Panics
    ///
    /// If `self` is not a [`Statement::Delete`].
    pub fn unwrap_delete(self) -> Delete {
        match self {
            Self::Delete(delete) => delete,
            v => panic!("expected `Delete`, found {v:#?}"),
        }
    }
}

impl From<Delete> for Statement {
    fn from(src: Delete) -> Self {
        Self::Delete(src)
    }
}

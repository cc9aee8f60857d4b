use super::{ColumnValue, Condition, Statement, Value};
use crate::schema::{ColumnId, TableId};

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableId,

    /// Column assignments for the SET clause
    pub assignments: Vec<ColumnValue>,

    pub filter: Option<Condition>,
}

impl Update {
    pub fn new(table: impl Into<TableId>) -> Self {
        Self {
            table: table.into(),
            assignments: vec![],
            filter: None,
        }
    }

    pub fn set(mut self, column: impl Into<ColumnId>, value: impl Into<Value>) -> Self {
        self.assignments.push(ColumnValue::new(column, value));
        self
    }

    pub fn assignments(mut self, assignments: impl IntoIterator<Item = ColumnValue>) -> Self {
        self.assignments.extend(assignments);
        self
    }

    /// Sets the filter, replacing any previous one.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }
}

impl Statement {
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(..))
    }

    /// Attempts to return a reference to an inner [`Update`].
    pub fn as_update(&self) -> Option<&Update> {
        match self {
            Self::Update(update) => Some(update),
            _ => None,
        }
    }

    /// Consumes `self` and attempts to return the inner [`Update`].
    pub fn into_update(self) -> Option<Update> {
        match self {
            Self::Update(update) => Some(update),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner [`Update`].
    ///
    /// # Panics
    ///
    /// If `self` is not a [`Statement::Update`].
    pub fn unwrap_update(self) -> Update {
        match self {
            Self::Update(update) => update,
            v => panic!("expected `Update`, found {v:#?}"),
        }
    }
}

impl From<Update> for Statement {
    fn from(src: Update) -> Self {
        Self::Update(src)
    }
}

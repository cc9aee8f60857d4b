use super::Condition;
use crate::schema::TableId;

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,

    /// The table to join
    pub table: TableId,

    /// The join condition
    pub on: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl Join {
    pub fn inner(table: impl Into<TableId>, on: Condition) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            on,
        }
    }

    pub fn left(table: impl Into<TableId>, on: Condition) -> Self {
        Self {
            kind: JoinKind::Left,
            table: table.into(),
            on,
        }
    }
}

use super::{TableId, Type};
use crate::stmt;

use std::fmt;

/// A table column.
#[derive(Debug)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the database.
    pub name: String,

    /// The declared column type.
    pub ty: Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,

    /// True if the column carries a single-column UNIQUE constraint
    pub unique: bool,

    /// True if the column is an integer that the storage engine assigns
    /// on insertion when no value is given
    pub auto_increment: bool,

    /// The column this one references, for foreign keys
    pub references: Option<ColumnId>,
}

/// Uniquely identifies a column in the schema.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    /// Builds an equality condition on this column.
    ///
    /// Comparing against an absent optional compares against NULL; the SQL
    /// generator rewrites that to `IS NULL` when the column is nullable and
    /// rejects it when it is not.
    pub fn eq(&self, rhs: impl Into<stmt::Operand>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Eq, rhs)
    }

    pub fn ne(&self, rhs: impl Into<stmt::Operand>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Ne, rhs)
    }

    pub fn gt(&self, rhs: impl Into<stmt::Operand>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Gt, rhs)
    }

    pub fn ge(&self, rhs: impl Into<stmt::Operand>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Ge, rhs)
    }

    pub fn lt(&self, rhs: impl Into<stmt::Operand>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Lt, rhs)
    }

    pub fn le(&self, rhs: impl Into<stmt::Operand>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Le, rhs)
    }

    /// Builds a `LIKE` pattern condition on this column.
    pub fn like(&self, pattern: impl Into<stmt::Value>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Like, pattern.into())
    }

    /// Builds a regular expression condition on this column.
    ///
    /// The pattern is bound as a parameter, never spliced into the SQL text.
    /// Dialects without a regex operator reject the statement at generation
    /// time.
    pub fn regex_match(&self, pattern: impl Into<stmt::Value>) -> stmt::Condition {
        stmt::Condition::compare(self.id, stmt::CompareOp::Regex, pattern.into())
    }

    pub fn is_null(&self) -> stmt::Condition {
        stmt::Condition::is_null(self.id)
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}

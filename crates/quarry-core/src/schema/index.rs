use super::{ColumnId, TableId};

use std::fmt;

/// A secondary index over one or more columns.
#[derive(Debug)]
pub struct Index {
    pub id: IndexId,

    /// Name of the index in the database
    pub name: String,

    /// Indexed columns, in index order
    pub columns: Vec<ColumnId>,

    /// True for a unique index; a multi-column unique index is how a
    /// composite UNIQUE constraint is declared
    pub unique: bool,
}

/// Uniquely identifies an index in the schema.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct IndexId {
    pub table: TableId,
    pub index: usize,
}

impl fmt::Debug for IndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "IndexId({}/{})", self.table.0, self.index)
    }
}

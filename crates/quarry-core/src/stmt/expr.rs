use super::{Func, Value};
use crate::schema::{Column, ColumnId};

/// An expression in a projection or GROUP BY list.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference a column
    Column(ColumnId),

    /// An aggregate function
    Func(Func),

    /// A literal value
    Value(Value),
}

impl Expr {
    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    pub fn as_column(&self) -> Option<ColumnId> {
        match self {
            Self::Column(column) => Some(*column),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Self::Func(func) => Some(func),
            _ => None,
        }
    }
}

impl From<ColumnId> for Expr {
    fn from(src: ColumnId) -> Self {
        Self::Column(src)
    }
}

impl From<&Column> for Expr {
    fn from(src: &Column) -> Self {
        Self::Column(src.id)
    }
}

impl From<Func> for Expr {
    fn from(src: Func) -> Self {
        Self::Func(src)
    }
}

impl From<Value> for Expr {
    fn from(src: Value) -> Self {
        Self::Value(src)
    }
}

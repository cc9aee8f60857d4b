use crate::schema::ColumnId;

/// An aggregate function in a projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Func {
    pub kind: FuncKind,

    /// The aggregated column; `None` means `*`.
    pub arg: Option<ColumnId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuncKind {
    Avg,
    Count,
    Max,
    Min,
    Sum,
}

impl Func {
    /// `COUNT(*)`
    pub fn count() -> Self {
        Self {
            kind: FuncKind::Count,
            arg: None,
        }
    }

    pub fn count_column(column: impl Into<ColumnId>) -> Self {
        Self {
            kind: FuncKind::Count,
            arg: Some(column.into()),
        }
    }

    pub fn avg(column: impl Into<ColumnId>) -> Self {
        Self {
            kind: FuncKind::Avg,
            arg: Some(column.into()),
        }
    }

    pub fn max(column: impl Into<ColumnId>) -> Self {
        Self {
            kind: FuncKind::Max,
            arg: Some(column.into()),
        }
    }

    pub fn min(column: impl Into<ColumnId>) -> Self {
        Self {
            kind: FuncKind::Min,
            arg: Some(column.into()),
        }
    }

    pub fn sum(column: impl Into<ColumnId>) -> Self {
        Self {
            kind: FuncKind::Sum,
            arg: Some(column.into()),
        }
    }
}

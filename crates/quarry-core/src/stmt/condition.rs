use super::{CompareOp, Value};
use crate::schema::{Column, ColumnId};

/// A filter predicate.
///
/// Negation is a flag on the node rather than a wrapping node, so `NOT` can
/// compose with the NULL rewrite (`IS NULL` flips to `IS NOT NULL` instead of
/// rendering `NOT (... IS NULL)`).
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// When set, the rendered predicate is negated as a whole.
    pub negated: bool,

    pub kind: ConditionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    /// Compare a column against a value or another column
    Compare {
        column: ColumnId,
        op: CompareOp,
        rhs: Operand,
    },

    /// Test a column for NULL
    IsNull { column: ColumnId },

    /// Every operand must hold
    And(Vec<Condition>),

    /// At least one operand must hold
    Or(Vec<Condition>),
}

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal, bound as a parameter at render time
    Value(Value),

    /// Another column, for join conditions
    Column(ColumnId),
}

impl Condition {
    pub fn compare(
        column: impl Into<ColumnId>,
        op: CompareOp,
        rhs: impl Into<Operand>,
    ) -> Self {
        Self {
            negated: false,
            kind: ConditionKind::Compare {
                column: column.into(),
                op,
                rhs: rhs.into(),
            },
        }
    }

    pub fn is_null(column: impl Into<ColumnId>) -> Self {
        Self {
            negated: false,
            kind: ConditionKind::IsNull {
                column: column.into(),
            },
        }
    }

    pub fn and(operands: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            negated: false,
            kind: ConditionKind::And(operands.into_iter().collect()),
        }
    }

    pub fn or(operands: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            negated: false,
            kind: ConditionKind::Or(operands.into_iter().collect()),
        }
    }

    /// Flips the negation flag.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl From<Value> for Operand {
    fn from(src: Value) -> Self {
        Self::Value(src)
    }
}

impl From<ColumnId> for Operand {
    fn from(src: ColumnId) -> Self {
        Self::Column(src)
    }
}

impl From<&Column> for Operand {
    fn from(src: &Column) -> Self {
        Self::Column(src.id)
    }
}

impl From<bool> for Operand {
    fn from(src: bool) -> Self {
        Self::Value(src.into())
    }
}

impl From<i32> for Operand {
    fn from(src: i32) -> Self {
        Self::Value(src.into())
    }
}

impl From<i64> for Operand {
    fn from(src: i64) -> Self {
        Self::Value(src.into())
    }
}

impl From<f64> for Operand {
    fn from(src: f64) -> Self {
        Self::Value(src.into())
    }
}

impl From<&str> for Operand {
    fn from(src: &str) -> Self {
        Self::Value(src.into())
    }
}

impl From<String> for Operand {
    fn from(src: String) -> Self {
        Self::Value(src.into())
    }
}

/// A present optional compares against its inner value; an absent optional
/// compares against NULL.
impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(src: Option<T>) -> Self {
        Self::Value(src.into())
    }
}

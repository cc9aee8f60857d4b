/// Comparison operator of a [`Condition`](super::Condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal
    Eq,

    /// Not equal
    Ne,

    /// Greater than
    Gt,

    /// Greater than or equal
    Ge,

    /// Less than
    Lt,

    /// Less than or equal
    Le,

    /// SQL `LIKE` pattern match
    Like,

    /// Regular expression match
    Regex,
}

impl CompareOp {
    /// Returns `true` for `Eq` and `Ne`.
    ///
    /// Only equality operators participate in the NULL comparison rewrite.
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

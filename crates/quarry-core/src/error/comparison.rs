use super::Error;

/// Error when a condition compares values that can never be compared.
///
/// The main source is equating a non-nullable column with an absent optional:
/// the column can never hold NULL, so the condition is a programming error
/// rather than a query that matches nothing.
#[derive(Debug)]
pub(super) struct ComparisonError {
    message: Box<str>,
}

impl std::error::Error for ComparisonError {}

impl core::fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid comparison: {}", self.message)
    }
}

impl Error {
    /// Creates a comparison error.
    pub fn comparison(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Comparison(ComparisonError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a comparison error.
    pub fn is_comparison(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Comparison(_))
    }
}

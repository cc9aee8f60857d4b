use super::Error;

/// Error when a value is requested from a result row that does not carry it.
#[derive(Debug)]
pub(super) struct LookupError {
    context: Box<str>,
}

impl std::error::Error for LookupError {}

impl core::fmt::Display for LookupError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "lookup failed: {}", self.context)
    }
}

impl Error {
    /// Creates a lookup error.
    ///
    /// The context parameter names the column or function that was requested.
    pub fn lookup(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Lookup(LookupError {
            context: context.into().into(),
        }))
    }

    /// Returns `true` if this error is a lookup error.
    pub fn is_lookup(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Lookup(_))
    }
}

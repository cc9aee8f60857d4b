use super::Error;

/// Which way a single-row expectation was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The result contained no rows.
    Zero,
    /// The result contained more than one row.
    Many,
}

/// Error when an operation expects exactly one row and the result disagrees.
#[derive(Debug)]
pub(super) struct CardinalityError {
    cardinality: Cardinality,
    context: Option<Box<str>>,
}

impl std::error::Error for CardinalityError {}

impl core::fmt::Display for CardinalityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.cardinality {
            Cardinality::Zero => f.write_str("no rows")?,
            Cardinality::Many => f.write_str("more than one row")?,
        }
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a cardinality error for a result that contained no rows.
    ///
    /// The context parameter describes the operation that required a row.
    pub fn no_rows(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Cardinality(CardinalityError {
            cardinality: Cardinality::Zero,
            context: Some(context.into().into()),
        }))
    }

    /// Creates a cardinality error for a result that contained more than one row.
    pub fn many_rows(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Cardinality(CardinalityError {
            cardinality: Cardinality::Many,
            context: Some(context.into().into()),
        }))
    }

    /// Returns `true` if this error is a cardinality error.
    pub fn is_cardinality(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Cardinality(_))
    }

    /// Returns which cardinality violation occurred, if this is a cardinality error.
    pub fn cardinality(&self) -> Option<Cardinality> {
        match self.kind() {
            super::ErrorKind::Cardinality(err) => Some(err.cardinality),
            _ => None,
        }
    }
}

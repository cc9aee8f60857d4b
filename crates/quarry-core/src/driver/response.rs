use crate::{stmt::ValueStream, Result};

/// What a connection hands back after executing a statement.
#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a stream of rows
    Values(ValueStream),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn value_stream(values: impl Into<ValueStream>) -> Self {
        Self {
            rows: Rows::Values(values.into()),
        }
    }

    pub fn empty_value_stream() -> Self {
        Self {
            rows: Rows::Values(ValueStream::default()),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self.rows {
            Rows::Count(count) => Ok(count),
            Rows::Values(_) => crate::bail!("expected a row count, found a row stream"),
        }
    }

    pub fn into_values(self) -> Result<ValueStream> {
        match self.rows {
            Rows::Values(values) => Ok(values),
            Rows::Count(count) => crate::bail!("expected a row stream, found count={count}"),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }
}

use crate::row::{ExpressionValue, QueryResult};
use crate::session::{QueryGuard, Session};

use quarry_core::schema::Schema;
use quarry_core::stmt::{Expr, Row, ValueStream};
use quarry_core::{Error, Result};

use std::fmt;
use std::sync::Arc;

/// A forward-only walk over a query's rows.
///
/// Rows materialize lazily: each advancement pulls one driver row, converts
/// its values to the projection's declared column types, and stamps the
/// owning session as active so the idle sweeper leaves it alone.
pub struct Cursor {
    schema: Arc<Schema>,
    session: Arc<Session>,
    exprs: Vec<Expr>,
    values: ValueStream,

    /// Exempts the session from idle reaping while this cursor lives.
    _guard: QueryGuard,
}

impl Cursor {
    pub(crate) fn new(
        schema: Arc<Schema>,
        session: Arc<Session>,
        exprs: Vec<Expr>,
        values: ValueStream,
    ) -> Self {
        let guard = session.track_query();
        Self {
            schema,
            session,
            exprs,
            values,
            _guard: guard,
        }
    }

    /// Advances to the next row.
    pub async fn next(&mut self) -> Option<Result<QueryResult>> {
        let row = match self.values.next().await? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };

        self.session.touch();
        Some(self.materialize(row))
    }

    /// The row, when the query produced exactly one.
    pub async fn one(mut self) -> Result<QueryResult> {
        let Some(first) = self.next().await else {
            return Err(Error::no_rows("query returned no results"));
        };
        let first = first?;

        if self.next().await.is_some() {
            return Err(Error::many_rows("query returned more than one row"));
        }

        Ok(first)
    }

    /// The first row, if any.
    pub async fn first(mut self) -> Result<Option<QueryResult>> {
        self.next().await.transpose()
    }

    /// Collects every remaining row.
    pub async fn collect(mut self) -> Result<Vec<QueryResult>> {
        let mut ret = Vec::with_capacity(self.values.min_len());

        while let Some(row) = self.next().await {
            ret.push(row?);
        }

        Ok(ret)
    }

    fn materialize(&self, row: Row) -> Result<QueryResult> {
        if row.len() != self.exprs.len() {
            quarry_core::bail!(
                "statement projected {} expressions but the row carries {} values",
                self.exprs.len(),
                row.len()
            );
        }

        let values = self
            .exprs
            .iter()
            .zip(row)
            .map(|(expr, value)| {
                let value = match expr {
                    Expr::Column(id) => self.schema.column(*id).ty.coerce(value)?,
                    _ => value,
                };
                Ok(ExpressionValue {
                    expr: expr.clone(),
                    value,
                })
            })
            .collect::<Result<_>>()?;

        Ok(QueryResult::new(values))
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").finish()
    }
}

/// What executing a statement produced.
#[derive(Debug)]
pub enum ExecOutcome {
    /// Number of rows impacted by a write
    Count(u64),

    /// A cursor over a query's rows
    Rows(Cursor),
}

impl ExecOutcome {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_rows(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    /// Consumes `self` and returns the affected-row count.
    pub fn into_count(self) -> Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            Self::Rows(_) => quarry_core::bail!("expected a row count, found a row cursor"),
        }
    }

    /// Consumes `self` and returns the row cursor.
    pub fn into_rows(self) -> Result<Cursor> {
        match self {
            Self::Rows(cursor) => Ok(cursor),
            Self::Count(count) => quarry_core::bail!("expected rows, found count={count}"),
        }
    }
}

use crate::Value;

use quarry_core::{async_trait, driver::Response, stmt, Error, Result};

use regex::Regex;
use rusqlite::{functions::FunctionFlags, types::ValueRef, Connection as RusqliteConnection};

use std::{path::Path, sync::Arc};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A session's handle to one SQLite database connection.
#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::storage_engine)?;
        Self::prepare(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::storage_engine)?;
        Self::prepare(connection)
    }

    fn prepare(connection: RusqliteConnection) -> Result<Self> {
        register_regexp(&connection).map_err(Error::storage_engine)?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl quarry_core::Connection for Connection {
    async fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> Result<Response> {
        let params: Vec<Value> = params.iter().cloned().map(Value::from).collect();

        let mut prepared = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::storage_engine)?;

        // A prepared statement with no output columns is a write; SQLite
        // reports its affected-row count instead of producing rows.
        let width = prepared.column_count();
        if width == 0 {
            let count = prepared
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::storage_engine)?;
            return Ok(Response::count(count as u64));
        }

        let mut rows = prepared
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::storage_engine)?;

        let mut ret: Vec<stmt::Row> = vec![];
        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);
                    for index in 0..width {
                        let value = Value::from_sql(row, index).map_err(Error::storage_engine)?;
                        items.push(value.into_inner());
                    }
                    ret.push(items);
                }
                Ok(None) => break,
                Err(err) => return Err(Error::storage_engine(err)),
            }
        }

        Ok(Response::value_stream(stmt::ValueStream::from_vec(ret)))
    }

    fn autocommit(&self) -> bool {
        self.connection.is_autocommit()
    }

    async fn set_autocommit(&mut self, autocommit: bool) -> Result<()> {
        if autocommit == self.connection.is_autocommit() {
            return Ok(());
        }

        let sql = if autocommit { "COMMIT" } else { "BEGIN DEFERRED" };
        self.connection
            .execute_batch(sql)
            .map_err(Error::storage_engine)
    }

    async fn commit(&mut self) -> Result<()> {
        self.connection
            .execute_batch("COMMIT")
            .map_err(Error::storage_engine)
    }

    async fn rollback(&mut self) -> Result<()> {
        self.connection
            .execute_batch("ROLLBACK")
            .map_err(Error::storage_engine)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.connection
            .close()
            .map_err(|(_, err)| Error::storage_engine(err))
    }
}

/// Registers the scalar function behind the `REGEXP` operator.
///
/// SQLite rewrites `X REGEXP Y` to `regexp(Y, X)`, so the pattern is the
/// first argument and its compiled form is cached on it. A NULL subject
/// never matches.
fn register_regexp(connection: &RusqliteConnection) -> rusqlite::Result<()> {
    connection.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern: Arc<Regex> =
                ctx.get_or_create_aux(0, |vr| -> std::result::Result<_, BoxError> {
                    Ok(Regex::new(vr.as_str()?)?)
                })?;

            let text = match ctx.get_raw(1) {
                ValueRef::Null => return Ok(false),
                vr => vr
                    .as_str()
                    .map_err(|err| rusqlite::Error::UserFunctionError(err.into()))?,
            };

            Ok(pattern.is_match(text))
        },
    )
}

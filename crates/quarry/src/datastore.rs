mod builder;
pub use builder::Builder;

use crate::cursor::{Cursor, ExecOutcome};
use crate::mapper::{Mapper, Mapping};
use crate::session::{Registry, Session};
use crate::Context;

use quarry_core::driver::Rows;
use quarry_core::schema::{ColumnId, Schema, TableId};
use quarry_core::stmt::{self, Expr, Statement};
use quarry_core::Result;
use quarry_sql::{Dialect, Generator, Sql};

use std::sync::Arc;

/// Shared state between all `Datastore` clones.
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,
    pub(crate) dialect: Box<dyn Dialect>,
    pub(crate) registry: Registry,
    pub(crate) cache_capacity: usize,
}

/// Handle to the storage engine.
///
/// Cloning is cheap; clones share the schema, the dialect, and the session
/// arena. Every operation takes a [`Context`]: calls under the same context
/// id run on the same session and therefore the same connection.
#[derive(Clone)]
pub struct Datastore {
    shared: Arc<Shared>,
}

impl Datastore {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn dialect(&self) -> &dyn Dialect {
        &*self.shared.dialect
    }

    /// Starts a SELECT over the given projection.
    pub fn select<E: Into<Expr>>(&self, exprs: impl IntoIterator<Item = E>) -> stmt::Select {
        stmt::Select::new(exprs)
    }

    /// Starts an INSERT into `table`.
    pub fn insert(&self, table: impl Into<TableId>) -> stmt::Insert {
        stmt::Insert::new(table)
    }

    /// An INSERT of a full value set in one call.
    pub fn insert_into(
        &self,
        table: impl Into<TableId>,
        values: impl IntoIterator<Item = stmt::ColumnValue>,
    ) -> stmt::Insert {
        stmt::Insert::new(table).values(values)
    }

    /// Starts an UPDATE of `table`.
    pub fn update(&self, table: impl Into<TableId>) -> stmt::Update {
        stmt::Update::new(table)
    }

    /// Starts an insert-or-update of `table`, keyed on `key`.
    pub fn merge(&self, table: impl Into<TableId>, key: impl Into<ColumnId>) -> stmt::Merge {
        stmt::Merge::new(table, key)
    }

    /// Starts a DELETE from `table`.
    pub fn delete(&self, table: impl Into<TableId>) -> stmt::Delete {
        stmt::Delete::new(table)
    }

    /// Renders and executes a statement on the context's session.
    ///
    /// Writes come back as an affected-row count; queries come back as a
    /// cursor that materializes rows lazily.
    pub async fn exec(&self, cx: &Context, statement: impl Into<Statement>) -> Result<ExecOutcome> {
        let statement = statement.into();
        let sql = self.generate(&statement)?;

        let session = self.session(cx).await?;
        let response = session.exec(&sql.text, &sql.params).await?;

        match response.rows {
            Rows::Count(count) => Ok(ExecOutcome::Count(count)),
            Rows::Values(values) => {
                let exprs = statement.into_select().map(|s| s.exprs).unwrap_or_default();
                Ok(ExecOutcome::Rows(Cursor::new(
                    self.shared.schema.clone(),
                    session,
                    exprs,
                    values,
                )))
            }
        }
    }

    /// Executes a SELECT, returning a cursor over its rows.
    pub async fn query(&self, cx: &Context, select: stmt::Select) -> Result<Cursor> {
        self.exec(cx, select).await?.into_rows()
    }

    /// Whether the storage engine has a table named `table`.
    pub async fn table_exists(&self, cx: &Context, table: &str) -> Result<bool> {
        let rows = self
            .catalog_query(cx, self.shared.dialect.table_exists_sql(table))
            .await?;
        Ok(!rows.is_empty())
    }

    /// The storage engine's table names.
    pub async fn list_tables(&self, cx: &Context) -> Result<Vec<String>> {
        let rows = self
            .catalog_query(cx, self.shared.dialect.list_tables_sql())
            .await?;
        Self::first_column_strings(rows)
    }

    /// The column names of `table`, as the storage engine reports them.
    pub async fn list_columns(&self, cx: &Context, table: &str) -> Result<Vec<String>> {
        let rows = self
            .catalog_query(cx, self.shared.dialect.list_columns_sql(table))
            .await?;
        Self::first_column_strings(rows)
    }

    /// Renders CREATE statements for the schema tables the storage engine
    /// does not have yet, index statements after all table bodies.
    pub async fn ddl(&self, cx: &Context, if_not_exists: bool) -> Result<String> {
        let existing = self.list_tables(cx).await?;
        Ok(self.generator().ddl(&existing, if_not_exists))
    }

    /// Creates the schema tables the storage engine does not have yet,
    /// along with their indices.
    pub async fn create_missing_tables(&self, cx: &Context) -> Result<()> {
        let existing = self.list_tables(cx).await?;
        let statements = self.generator().ddl_statements(&existing, false);

        let session = self.session(cx).await?;
        for statement in statements {
            session.exec(&statement, &[]).await?;
        }
        Ok(())
    }

    /// Builds a mapper over this datastore's schema.
    pub fn mapper<T: Clone>(&self, mapping: Mapping<T>) -> Result<Mapper<T>> {
        Mapper::new(
            self.shared.schema.clone(),
            mapping,
            self.shared.cache_capacity,
        )
    }

    /// Removes and closes the context's session.
    pub async fn dispose(&self, cx: &Context) {
        self.shared.registry.dispose(cx.id()).await;
    }

    /// Stops the idle sweeper and closes every session.
    pub async fn shutdown(&self) {
        self.shared.registry.shutdown().await;
    }

    pub(crate) async fn session(&self, cx: &Context) -> Result<Arc<Session>> {
        self.shared.registry.session(cx).await
    }

    fn generator(&self) -> Generator<'_> {
        Generator::new(&self.shared.schema, &*self.shared.dialect)
    }

    fn generate(&self, statement: &Statement) -> Result<Sql> {
        self.generator().generate(statement)
    }

    async fn catalog_query(&self, cx: &Context, sql: Sql) -> Result<Vec<stmt::Row>> {
        let session = self.session(cx).await?;
        let response = session.exec(&sql.text, &sql.params).await?;
        response.into_values()?.collect().await
    }

    fn first_column_strings(rows: Vec<stmt::Row>) -> Result<Vec<String>> {
        let mut ret = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(value) = row.into_iter().next() {
                ret.push(value.to_string()?);
            }
        }
        Ok(ret)
    }
}

impl std::fmt::Debug for Datastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datastore")
            .field("dialect", &self.shared.dialect.name())
            .field("tables", &self.shared.schema.tables.len())
            .finish()
    }
}

#[macro_use]
mod fmt;
use fmt::ToSql;

mod ddl;

mod delim;
use delim::{Comma, Delimited};

mod expr;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

mod statement;

mod validate;

use crate::dialect::Dialect;

use quarry_core::{
    schema::Schema,
    stmt::{Statement, Value},
    Result,
};

/// A rendered statement: SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Sql {
    pub text: String,
    pub params: Vec<Value>,
}

/// Renders statements against a schema for one dialect.
pub struct Generator<'a> {
    schema: &'a Schema,
    dialect: &'a dyn Dialect,
}

impl<'a> Generator<'a> {
    pub fn new(schema: &'a Schema, dialect: &'a dyn Dialect) -> Self {
        Self { schema, dialect }
    }

    /// Renders `stmt` to SQL.
    ///
    /// Validation runs first: a statement the dialect cannot express, or a
    /// comparison that can never hold, fails with a typed error before any
    /// SQL text is produced. Rendering itself is infallible. Parameters are
    /// collected in the order their placeholders appear in the text, so
    /// executing binds them positionally.
    pub fn generate(&self, stmt: &Statement) -> Result<Sql> {
        validate::statement(self.schema, self.dialect, stmt)?;

        let mut params = vec![];
        let text = self.render(stmt, &mut params);
        Ok(Sql { text, params })
    }

    fn render(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut f = Formatter {
            generator: self,
            dst: &mut ret,
            params,
            qualify: false,
        };

        stmt.to_sql(&mut f);

        ret.push(';');
        ret
    }
}

struct Formatter<'a, T> {
    /// Handle to the generator
    generator: &'a Generator<'a>,

    /// Where to write the rendered SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// True when column references are prefixed with their table name.
    /// Multi-table selects set this.
    qualify: bool,
}

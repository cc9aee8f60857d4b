mod context;
pub use context::{Context, ContextId};

mod cursor;
pub use cursor::{Cursor, ExecOutcome};

mod datastore;
pub use datastore::{Builder, Datastore};

pub mod mapper;
pub use mapper::{Mapper, Mapping};

mod row;
pub use row::{ExpressionValue, QueryResult};

mod session;

mod transaction;

pub use quarry_core::{schema, stmt, Cardinality, Error, Result, Schema};

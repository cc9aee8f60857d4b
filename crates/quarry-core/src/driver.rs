mod response;
pub use response::{Response, Rows};

use crate::{async_trait, stmt};

use std::fmt::Debug;

/// Supplies connections to a storage engine.
///
/// Pooling is out of scope here: an implementation may hand out pooled
/// connections, but the engine only asks for one connection per session and
/// holds it for the session's lifetime.
#[async_trait]
pub trait ConnectionSource: Debug + Send + Sync + 'static {
    /// Opens a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// A single storage engine connection.
///
/// A connection is owned by exactly one session and is never used
/// concurrently. Statements arrive as rendered SQL text with positional
/// parameters; binding order matches parameter order.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Executes a statement, binding `params` positionally.
    async fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> crate::Result<Response>;

    /// Whether the connection currently commits each statement on its own.
    fn autocommit(&self) -> bool;

    /// Switches autocommit. Turning it off opens a transaction; turning it
    /// back on while a transaction is open commits that transaction.
    async fn set_autocommit(&mut self, autocommit: bool) -> crate::Result<()>;

    /// Commits the open transaction.
    async fn commit(&mut self) -> crate::Result<()>;

    /// Rolls back the open transaction.
    async fn rollback(&mut self) -> crate::Result<()>;

    /// Closes the connection.
    async fn close(self: Box<Self>) -> crate::Result<()>;
}

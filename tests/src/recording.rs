//! A connection source wrapper that records every engine call, so scenarios
//! can assert on transaction traffic rather than just on visible rows.

use quarry_core::driver::{Connection, ConnectionSource, Response};
use quarry_core::{async_trait, stmt, Result};

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Exec(String),
    SetAutocommit(bool),
    Commit,
    Rollback,
    Close,
}

pub type Ops = Arc<Mutex<Vec<Op>>>;

#[derive(Debug)]
pub struct RecordingSource<S> {
    inner: S,
    ops: Ops,
}

impl<S> RecordingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the shared log. Grab it before handing the source off.
    pub fn ops(&self) -> Ops {
        self.ops.clone()
    }
}

#[async_trait]
impl<S: ConnectionSource> ConnectionSource for RecordingSource<S> {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        let inner = self.inner.connect().await?;
        Ok(Box::new(RecordingConnection {
            inner,
            ops: self.ops.clone(),
        }))
    }
}

struct RecordingConnection {
    inner: Box<dyn Connection>,
    ops: Ops,
}

impl RecordingConnection {
    fn log(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    async fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> Result<Response> {
        self.log(Op::Exec(sql.to_string()));
        self.inner.exec(sql, params).await
    }

    fn autocommit(&self) -> bool {
        self.inner.autocommit()
    }

    async fn set_autocommit(&mut self, autocommit: bool) -> Result<()> {
        self.log(Op::SetAutocommit(autocommit));
        self.inner.set_autocommit(autocommit).await
    }

    async fn commit(&mut self) -> Result<()> {
        self.log(Op::Commit);
        self.inner.commit().await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.log(Op::Rollback);
        self.inner.rollback().await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.log(Op::Close);
        self.inner.close().await
    }
}

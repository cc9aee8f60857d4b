use crate::{Context, ContextId};

use quarry_core::driver::{Connection, ConnectionSource, Response};
use quarry_core::{stmt, Result};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One storage engine connection bound to one context.
///
/// Execution, transaction control, and close all go through the inner lock,
/// so nothing ever interleaves on the connection. The idle stamp and the
/// active-query counter live outside it: the sweeper reads both without
/// waiting on statements in flight.
pub(crate) struct Session {
    inner: Mutex<Inner>,

    /// When the session last did work.
    last_active: std::sync::Mutex<Instant>,

    /// Queries still reading from this session.
    active_queries: AtomicUsize,
}

struct Inner {
    /// `None` once the session is closed.
    connection: Option<Box<dyn Connection>>,

    /// Transaction nesting depth. Zero outside any transaction scope.
    depth: usize,

    /// Autocommit flag captured when the outermost scope began.
    autocommit_snapshot: Option<bool>,
}

impl Session {
    pub(crate) fn new(connection: Box<dyn Connection>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                connection: Some(connection),
                depth: 0,
                autocommit_snapshot: None,
            }),
            last_active: std::sync::Mutex::new(Instant::now()),
            active_queries: AtomicUsize::new(0),
        }
    }

    /// Executes rendered SQL on this session's connection.
    pub(crate) async fn exec(
        self: &Arc<Self>,
        sql: &str,
        params: &[stmt::Value],
    ) -> Result<Response> {
        let _guard = self.track_query();

        let mut inner = self.inner.lock().await;
        let connection = inner.connection_mut()?;

        tracing::debug!(sql, params = params.len(), "executing statement");
        let response = connection.exec(sql, params).await;
        drop(inner);

        self.touch();
        response
    }

    /// Opens a transaction scope.
    ///
    /// Only the outermost scope touches the connection: it records the
    /// autocommit flag and turns autocommit off.
    pub(crate) async fn begin_transaction(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.depth == 0 {
            let connection = inner.connection_mut()?;
            let autocommit = connection.autocommit();
            connection.set_autocommit(false).await?;
            inner.autocommit_snapshot = Some(autocommit);
        }

        inner.depth += 1;
        Ok(())
    }

    /// Unwinds one scope level on success.
    ///
    /// At the root the open transaction commits and the autocommit flag is
    /// restored. A commit failure surfaces to the caller; the transaction is
    /// rolled away first so the connection never sits on half-applied work.
    pub(crate) async fn commit_transaction(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        assert!(inner.depth > 0, "commit without an open transaction scope");

        inner.depth -= 1;
        if inner.depth > 0 {
            return Ok(());
        }

        let autocommit = inner.autocommit_snapshot.take().unwrap_or(true);
        let connection = inner.connection_mut()?;

        match connection.commit().await {
            Ok(()) => connection.set_autocommit(autocommit).await,
            Err(err) => {
                if let Err(rollback_err) = connection.rollback().await {
                    tracing::warn!(
                        error = %rollback_err,
                        "rollback after failed commit also failed"
                    );
                }
                if let Err(restore_err) = connection.set_autocommit(autocommit).await {
                    tracing::warn!(
                        error = %restore_err,
                        "failed to restore autocommit after failed commit"
                    );
                }
                Err(err)
            }
        }
    }

    /// Unwinds one scope level on failure.
    ///
    /// Intermediate levels only decrement; the root rolls back once and
    /// restores the autocommit flag.
    pub(crate) async fn rollback_transaction(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        assert!(inner.depth > 0, "rollback without an open transaction scope");

        inner.depth -= 1;
        if inner.depth > 0 {
            return Ok(());
        }

        let autocommit = inner.autocommit_snapshot.take().unwrap_or(true);
        let connection = inner.connection_mut()?;

        let rolled_back = connection.rollback().await;
        if let Err(restore_err) = connection.set_autocommit(autocommit).await {
            tracing::warn!(error = %restore_err, "failed to restore autocommit after rollback");
            if rolled_back.is_ok() {
                return Err(restore_err);
            }
        }
        rolled_back
    }

    /// Closes the session's connection. Later calls on the session fail.
    pub(crate) async fn close(&self) -> Result<()> {
        let connection = self.inner.lock().await.connection.take();
        match connection {
            Some(connection) => connection.close().await,
            None => Ok(()),
        }
    }

    /// Resets the idle clock.
    pub(crate) fn touch(&self) {
        *self.last_active.lock().unwrap() = Instant::now();
    }

    pub(crate) fn idle_for(&self) -> Duration {
        self.last_active.lock().unwrap().elapsed()
    }

    pub(crate) fn active_queries(&self) -> usize {
        self.active_queries.load(Ordering::SeqCst)
    }

    /// Marks a query in flight. The sweeper never reaps a session while a
    /// guard is live.
    pub(crate) fn track_query(self: &Arc<Self>) -> QueryGuard {
        self.active_queries.fetch_add(1, Ordering::SeqCst);
        QueryGuard {
            session: self.clone(),
        }
    }
}

impl Inner {
    fn connection_mut(&mut self) -> Result<&mut Box<dyn Connection>> {
        match self.connection.as_mut() {
            Some(connection) => Ok(connection),
            None => Err(quarry_core::err!("session is closed")),
        }
    }
}

/// Keeps a session's active-query count up while rows remain unread.
pub(crate) struct QueryGuard {
    session: Arc<Session>,
}

impl Drop for QueryGuard {
    fn drop(&mut self) {
        self.session.active_queries.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The session arena: one session per context, created on first use.
pub(crate) struct Registry {
    shared: Arc<RegistryShared>,
    sweeper: JoinHandle<()>,
}

struct RegistryShared {
    sessions: std::sync::Mutex<HashMap<ContextId, Arc<Session>>>,
    source: Box<dyn ConnectionSource>,
    session_timeout: Duration,
}

impl Registry {
    pub(crate) fn new(
        source: Box<dyn ConnectionSource>,
        session_timeout: Duration,
        sweep_interval: Duration,
    ) -> Self {
        let shared = Arc::new(RegistryShared {
            sessions: std::sync::Mutex::new(HashMap::new()),
            source,
            session_timeout,
        });

        let sweeper = tokio::spawn(sweep(shared.clone(), sweep_interval));

        Self { shared, sweeper }
    }

    /// Returns the context's session, opening a connection on first use.
    pub(crate) async fn session(&self, cx: &Context) -> Result<Arc<Session>> {
        if let Some(session) = self.lookup(cx.id()) {
            session.touch();
            return Ok(session);
        }

        // Connect outside the registry lock.
        let connection = self.shared.source.connect().await?;
        let session = Arc::new(Session::new(connection));

        let existing = {
            let mut sessions = self.shared.sessions.lock().unwrap();
            match sessions.entry(cx.id().clone()) {
                Entry::Occupied(entry) => Some(entry.get().clone()),
                Entry::Vacant(entry) => {
                    entry.insert(session.clone());
                    None
                }
            }
        };

        match existing {
            // Another call on the same context registered first; its session
            // stands and the fresh connection goes away.
            Some(existing) => {
                if let Err(err) = session.close().await {
                    tracing::warn!(context = %cx.id(), error = %err, "failed to close extra connection");
                }
                existing.touch();
                Ok(existing)
            }
            None => {
                tracing::debug!(context = %cx.id(), "session created");
                Ok(session)
            }
        }
    }

    /// Removes and closes one context's session.
    pub(crate) async fn dispose(&self, id: &ContextId) {
        let session = self.shared.sessions.lock().unwrap().remove(id);
        if let Some(session) = session {
            tracing::debug!(context = %id, "session disposed");
            if let Err(err) = session.close().await {
                tracing::warn!(context = %id, error = %err, "failed to close session");
            }
        }
    }

    /// Stops the sweeper and closes every session.
    pub(crate) async fn shutdown(&self) {
        self.sweeper.abort();

        let sessions: Vec<_> = {
            let mut sessions = self.shared.sessions.lock().unwrap();
            sessions.drain().collect()
        };

        for (id, session) in sessions {
            if let Err(err) = session.close().await {
                tracing::warn!(context = %id, error = %err, "failed to close session");
            }
        }
    }

    fn lookup(&self, id: &ContextId) -> Option<Arc<Session>> {
        self.shared.sessions.lock().unwrap().get(id).cloned()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

/// Reaps sessions idle beyond the timeout.
///
/// A nonzero active-query count exempts a session no matter how long it has
/// been idle. Expired sessions leave the map under the lock; their
/// connections close after it is released.
async fn sweep(shared: Arc<RegistryShared>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let expired: Vec<_> = {
            let mut sessions = shared.sessions.lock().unwrap();
            let ids: Vec<_> = sessions
                .iter()
                .filter(|(_, session)| {
                    session.active_queries() == 0
                        && session.idle_for() >= shared.session_timeout
                })
                .map(|(id, _)| id.clone())
                .collect();

            ids.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|session| (id, session)))
                .collect()
        };

        for (id, session) in expired {
            tracing::debug!(context = %id, "session expired");
            if let Err(err) = session.close().await {
                tracing::warn!(context = %id, error = %err, "failed to close expired session");
            }
        }
    }
}

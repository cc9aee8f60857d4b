use crate::{Context, Datastore};

use quarry_core::Result;

impl Datastore {
    /// Runs `f` inside a transaction scope on the context's session.
    ///
    /// Scopes nest by depth: only the outermost scope begins, commits, or
    /// rolls back on the connection, so a failure anywhere inside a nest
    /// unwinds to exactly one rollback at the root and exactly one autocommit
    /// restore. A commit failure at the root surfaces to the caller rather
    /// than being swallowed; a rollback failure is logged and never masks the
    /// error that triggered it.
    pub async fn transaction<O>(
        &self,
        cx: &Context,
        f: impl AsyncFnOnce(&Datastore) -> Result<O>,
    ) -> Result<O> {
        let session = self.session(cx).await?;
        session.begin_transaction().await?;

        match f(self).await {
            Ok(value) => {
                session.commit_transaction().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = session.rollback_transaction().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

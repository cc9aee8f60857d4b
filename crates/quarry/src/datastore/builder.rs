use super::{Datastore, Shared};
use crate::session::Registry;

use quarry_core::driver::ConnectionSource;
use quarry_core::{Error, Result, Schema};
use quarry_sql::{Dialect, GenericDialect};

use std::sync::Arc;
use std::time::Duration;

/// Configures and builds a [`Datastore`].
pub struct Builder {
    schema: Option<Schema>,
    source: Option<Box<dyn ConnectionSource>>,
    dialect: Box<dyn Dialect>,
    session_timeout: Duration,
    sweep_interval: Duration,
    instance_cache_capacity: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            schema: None,
            source: None,
            dialect: Box::new(GenericDialect::new()),
            session_timeout: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(1),
            instance_cache_capacity: 1024,
        }
    }
}

impl Builder {
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    /// Sets where session connections come from.
    pub fn connection_source(&mut self, source: impl ConnectionSource) -> &mut Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets the dialect statements render in. Defaults to [`GenericDialect`].
    pub fn dialect(&mut self, dialect: impl Dialect) -> &mut Self {
        self.dialect = Box::new(dialect);
        self
    }

    /// How long a session may sit idle before the sweeper closes it.
    /// Defaults to five minutes.
    pub fn session_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.session_timeout = timeout;
        self
    }

    /// How often the sweeper looks for idle sessions. Defaults to one second.
    pub fn sweep_interval(&mut self, interval: Duration) -> &mut Self {
        self.sweep_interval = interval;
        self
    }

    /// Caps how many instances each mapper keeps around for diff-based
    /// updates. Defaults to 1024.
    pub fn instance_cache_capacity(&mut self, capacity: usize) -> &mut Self {
        self.instance_cache_capacity = capacity;
        self
    }

    /// Builds the datastore and starts the idle sweeper.
    ///
    /// Sessions connect lazily; nothing talks to the storage engine here.
    pub async fn build(&mut self) -> Result<Datastore> {
        let schema = self
            .schema
            .take()
            .ok_or_else(|| Error::configuration("no schema was provided"))?;
        let source = self
            .source
            .take()
            .ok_or_else(|| Error::configuration("no connection source was provided"))?;
        let dialect = std::mem::replace(&mut self.dialect, Box::new(GenericDialect::new()));

        let registry = Registry::new(source, self.session_timeout, self.sweep_interval);

        Ok(Datastore {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                dialect,
                registry,
                cache_capacity: self.instance_cache_capacity,
            }),
        })
    }
}

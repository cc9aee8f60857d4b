use std::fmt;
use std::sync::Arc;

/// Identifies one logical unit of work.
///
/// The id is caller-supplied: a request id, a job id, a worker name. Every
/// datastore call made under the same id runs on the same session and
/// therefore the same connection, which is what makes transactions spanning
/// several calls possible. Nothing here is tied to threads.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextId(Arc<str>);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({:?})", &*self.0)
    }
}

impl From<&str> for ContextId {
    fn from(src: &str) -> Self {
        Self(Arc::from(src))
    }
}

impl From<String> for ContextId {
    fn from(src: String) -> Self {
        Self(Arc::from(src))
    }
}

/// The handle callers thread through every datastore operation.
#[derive(Debug, Clone)]
pub struct Context {
    id: ContextId,
}

impl Context {
    pub fn new(id: impl Into<ContextId>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &ContextId {
        &self.id
    }
}

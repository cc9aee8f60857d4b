use super::Error;

/// Error from the underlying storage engine.
#[derive(Debug)]
pub(super) struct StorageEngineError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for StorageEngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for StorageEngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        // Display the error and walk its source chain
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a storage engine error.
    ///
    /// This is the preferred way to convert driver-specific errors (rusqlite
    /// errors and the like) into quarry errors. The source error is preserved
    /// and reachable through [`std::error::Error::source`].
    pub fn storage_engine(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::StorageEngine(StorageEngineError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a storage engine error.
    pub fn is_storage_engine(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::StorageEngine(_))
    }
}

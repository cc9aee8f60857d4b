mod connection;
pub use connection::Connection;

mod dialect;
pub use dialect::SqliteDialect;

mod value;
pub(crate) use value::Value;

use quarry_core::{async_trait, driver::ConnectionSource, Error, Result};

use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Creates a SQLite connection source from a connection URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::storage_engine)?;

        if url.scheme() != "sqlite" {
            return Err(Error::configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Creates an in-memory SQLite database.
    ///
    /// Every connection opens a fresh, empty database, so sessions do not
    /// share data. Use a single context, or a file-backed database, when
    /// more than one session must see the same rows.
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Opens a SQLite database at the given file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl ConnectionSource for Sqlite {
    async fn connect(&self) -> Result<Box<dyn quarry_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

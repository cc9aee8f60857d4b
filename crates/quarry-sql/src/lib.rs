pub mod dialect;
pub use dialect::{Dialect, GenericDialect};

pub mod generator;
pub use generator::{Generator, Sql};

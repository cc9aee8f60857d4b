mod column_value;
pub use column_value::ColumnValue;

mod condition;
pub use condition::{Condition, ConditionKind, Operand};

mod delete;
pub use delete::Delete;

mod expr;
pub use expr::Expr;

mod func;
pub use func::{Func, FuncKind};

mod insert;
pub use insert::Insert;

mod join;
pub use join::{Join, JoinKind};

mod limit;
pub use limit::Limit;

mod merge;
pub use merge::Merge;

mod op;
pub use op::CompareOp;

mod order_by;
pub use order_by::{Direction, OrderBy};

mod select;
pub use select::Select;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

mod value_stream;
pub use value_stream::{Row, ValueStream};

/// A statement to execute against the storage engine.
///
/// Statements are immutable value objects: built fresh per call, rendered to
/// SQL by a generator, then discarded. Nothing in a statement borrows from the
/// schema it was built against.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Delete rows from a table
    Delete(Delete),

    /// Insert a row into a table
    Insert(Insert),

    /// Insert a row or update it in place, keyed on one column
    Merge(Merge),

    /// Query the database
    Select(Select),

    /// Update existing rows
    Update(Update),
}

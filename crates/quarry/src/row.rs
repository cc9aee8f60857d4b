use quarry_core::schema::{Column, ColumnId, TableId};
use quarry_core::stmt::{Expr, Func, Value};
use quarry_core::{Error, Result};

/// One projected expression paired with the value the row carried for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionValue {
    pub expr: Expr,
    pub value: Value,
}

/// One materialized result row.
///
/// Values sit in projection order. Lookups scan: projections are a handful
/// of expressions wide, so a scan beats building a map per row.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    values: Vec<ExpressionValue>,
}

impl QueryResult {
    pub(crate) fn new(values: Vec<ExpressionValue>) -> Self {
        Self { values }
    }

    /// The value the row carried for `column`.
    pub fn value_of(&self, column: &Column) -> Result<&Value> {
        self.column_value(column.id).ok_or_else(|| {
            Error::lookup(format!(
                "column `{}` is not part of this result",
                column.name
            ))
        })
    }

    /// The value the row carried for the aggregate `func`.
    pub fn func_value(&self, func: &Func) -> Result<&Value> {
        self.values
            .iter()
            .find(|ev| ev.expr.as_func() == Some(func))
            .map(|ev| &ev.value)
            .ok_or_else(|| Error::lookup("function is not part of this result"))
    }

    /// Every expression-value pair, in projection order.
    pub fn values(&self) -> &[ExpressionValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn column_value(&self, column: ColumnId) -> Option<&Value> {
        self.values
            .iter()
            .find(|ev| ev.expr.as_column() == Some(column))
            .map(|ev| &ev.value)
    }

    /// The columns of `table` this row carries, with their values.
    pub(crate) fn table_columns(
        &self,
        table: TableId,
    ) -> impl Iterator<Item = (ColumnId, &Value)> + '_ {
        self.values.iter().filter_map(move |ev| match ev.expr {
            Expr::Column(id) if id.table == table => Some((id, &ev.value)),
            _ => None,
        })
    }
}

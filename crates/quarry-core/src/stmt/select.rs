use super::{Condition, Expr, Join, Limit, OrderBy, Statement};
use crate::schema::{Table, TableId};

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Projected expressions, in output order
    pub exprs: Vec<Expr>,

    /// Tables in the FROM clause
    pub from: Vec<TableId>,

    pub joins: Vec<Join>,

    pub filter: Option<Condition>,

    pub group_by: Vec<Expr>,

    pub order_by: Vec<OrderBy>,

    pub limit: Option<Limit>,
}

impl Select {
    pub fn new<E: Into<Expr>>(exprs: impl IntoIterator<Item = E>) -> Self {
        Self {
            exprs: exprs.into_iter().map(Into::into).collect(),
            from: vec![],
            joins: vec![],
            filter: None,
            group_by: vec![],
            order_by: vec![],
            limit: None,
        }
    }

    /// Selects every column of `table`, in declaration order.
    pub fn from_table(table: &Table) -> Self {
        Self::new(table.columns.iter()).from(table.id)
    }

    pub fn from(mut self, table: impl Into<TableId>) -> Self {
        self.from.push(table.into());
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Sets the filter, replacing any previous one.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(Limit::new(limit));
        self
    }

    pub fn limit_offset(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some(Limit {
            limit,
            offset: Some(offset),
        });
        self
    }
}

impl Statement {
    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select(..))
    }

    /// Attempts to return a reference to an inner [`Select`].
    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    /// Consumes `self` and attempts to return the inner [`Select`].
    pub fn into_select(self) -> Option<Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner [`Select`].
    ///
    /// # Panics
    ///
    /// If `self` is not a [`Statement::Select`].
    pub fn unwrap_select(self) -> Select {
        match self {
            Self::Select(select) => select,
            v => panic!("expected `Select`, found {v:#?}"),
        }
    }
}

impl From<Select> for Statement {
    fn from(src: Select) -> Self {
        Self::Select(src)
    }
}

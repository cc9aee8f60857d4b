use crate::dialect::Dialect;

use quarry_core::{
    schema::{ColumnId, Schema, TableId},
    stmt::{
        ColumnValue, Condition, ConditionKind, Delete, Expr, Insert, Merge, Operand, Select,
        Statement, Update, Value,
    },
    Error, Result,
};

/// Checks a statement before any SQL text is rendered.
///
/// Everything rejected here is a property of the statement itself: columns
/// that belong to other tables, comparisons that can never hold, operations
/// the dialect has no spelling for. Passing validation makes rendering
/// infallible.
pub(super) fn statement(schema: &Schema, dialect: &dyn Dialect, stmt: &Statement) -> Result<()> {
    match stmt {
        Statement::Delete(stmt) => delete(schema, dialect, stmt),
        Statement::Insert(stmt) => insert(schema, stmt),
        Statement::Merge(stmt) => merge(schema, dialect, stmt),
        Statement::Select(stmt) => select(schema, dialect, stmt),
        Statement::Update(stmt) => update(schema, dialect, stmt),
    }
}

fn select(schema: &Schema, dialect: &dyn Dialect, stmt: &Select) -> Result<()> {
    if stmt.exprs.is_empty() {
        return Err(Error::configuration("select has no projection"));
    }
    if stmt.from.is_empty() {
        return Err(Error::configuration("select has no source table"));
    }

    let mut scope: Vec<TableId> = stmt.from.clone();
    scope.extend(stmt.joins.iter().map(|join| join.table));

    for expr in stmt.exprs.iter().chain(&stmt.group_by) {
        expr_in_scope(schema, &scope, expr)?;
    }
    for join in &stmt.joins {
        condition(schema, dialect, &join.on, &scope)?;
    }
    if let Some(filter) = &stmt.filter {
        condition(schema, dialect, filter, &scope)?;
    }
    for order_by in &stmt.order_by {
        expr_in_scope(schema, &scope, &order_by.expr)?;
    }

    Ok(())
}

fn insert(schema: &Schema, stmt: &Insert) -> Result<()> {
    if stmt.values.is_empty() {
        return Err(Error::configuration("insert has no values"));
    }
    column_values(schema, stmt.table, &stmt.values)
}

fn update(schema: &Schema, dialect: &dyn Dialect, stmt: &Update) -> Result<()> {
    if stmt.assignments.is_empty() {
        return Err(Error::configuration("update has no assignments"));
    }
    column_values(schema, stmt.table, &stmt.assignments)?;

    if let Some(filter) = &stmt.filter {
        condition(schema, dialect, filter, &[stmt.table])?;
    }
    Ok(())
}

fn delete(schema: &Schema, dialect: &dyn Dialect, stmt: &Delete) -> Result<()> {
    if let Some(filter) = &stmt.filter {
        condition(schema, dialect, filter, &[stmt.table])?;
    }
    Ok(())
}

fn merge(schema: &Schema, dialect: &dyn Dialect, stmt: &Merge) -> Result<()> {
    if !dialect.supports_merge() {
        return Err(Error::unsupported_operation(format!(
            "dialect `{}` cannot merge in one statement",
            dialect.name()
        )));
    }
    if stmt.values.is_empty() {
        return Err(Error::configuration("merge has no values"));
    }
    column_values(schema, stmt.table, &stmt.values)?;
    column_in_scope(schema, &[stmt.table], stmt.key)?;

    if !stmt.values.iter().any(|cv| cv.column == stmt.key) {
        return Err(Error::configuration(format!(
            "merge values do not include the key column `{}`",
            schema.column(stmt.key).name
        )));
    }

    // The existing-row check rides on a uniqueness constraint; without one
    // the storage engine would insert unconditionally.
    let key = schema.column(stmt.key);
    if !key.primary_key && !key.unique {
        return Err(Error::configuration(format!(
            "merge key column `{}` is neither a primary key nor unique",
            key.name
        )));
    }

    Ok(())
}

fn condition(
    schema: &Schema,
    dialect: &dyn Dialect,
    cond: &Condition,
    scope: &[TableId],
) -> Result<()> {
    match &cond.kind {
        ConditionKind::Compare { column, op, rhs } => {
            column_in_scope(schema, scope, *column)?;

            match rhs {
                Operand::Value(Value::Null) => {
                    if !op.is_equality() {
                        return Err(Error::comparison(format!(
                            "`{:?}` against NULL on column `{}` can never hold",
                            op,
                            schema.column(*column).name
                        )));
                    }
                    let lhs = schema.column(*column);
                    if !lhs.nullable {
                        return Err(Error::comparison(format!(
                            "column `{}` is not nullable; comparing it to an absent value can never hold",
                            lhs.name
                        )));
                    }
                    // Renders as a NULL test, no operator text involved.
                    Ok(())
                }
                Operand::Value(_) => operator(dialect, *op),
                Operand::Column(rhs_column) => {
                    column_in_scope(schema, scope, *rhs_column)?;
                    operator(dialect, *op)
                }
            }
        }
        ConditionKind::IsNull { column } => column_in_scope(schema, scope, *column),
        ConditionKind::And(operands) | ConditionKind::Or(operands) => {
            if operands.is_empty() {
                return Err(Error::configuration("condition group has no operands"));
            }
            for operand in operands {
                condition(schema, dialect, operand, scope)?;
            }
            Ok(())
        }
    }
}

fn operator(dialect: &dyn Dialect, op: quarry_core::stmt::CompareOp) -> Result<()> {
    if dialect.condition_operator(op).is_some() {
        Ok(())
    } else {
        Err(Error::unsupported_operation(format!(
            "dialect `{}` has no `{:?}` operator",
            dialect.name(),
            op
        )))
    }
}

fn expr_in_scope(schema: &Schema, scope: &[TableId], expr: &Expr) -> Result<()> {
    match expr {
        Expr::Column(column) => column_in_scope(schema, scope, *column),
        Expr::Func(func) => match func.arg {
            Some(column) => column_in_scope(schema, scope, column),
            None => Ok(()),
        },
        Expr::Value(_) => Ok(()),
    }
}

fn column_in_scope(schema: &Schema, scope: &[TableId], column: ColumnId) -> Result<()> {
    if scope.contains(&column.table) {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "column `{}` does not belong to the statement's tables",
            schema.column(column).name
        )))
    }
}

fn column_values(schema: &Schema, table: TableId, values: &[ColumnValue]) -> Result<()> {
    for (i, cv) in values.iter().enumerate() {
        column_in_scope(schema, &[table], cv.column)?;
        if values[..i].iter().any(|prev| prev.column == cv.column) {
            return Err(Error::configuration(format!(
                "column `{}` is listed more than once",
                schema.column(cv.column).name
            )));
        }
    }
    Ok(())
}

use super::{Delimited, Formatter, Ident, Params, ToSql};

use quarry_core::{
    schema::ColumnId,
    stmt::{CompareOp, Condition, ConditionKind, Expr, Func, FuncKind, Operand, Value},
};

impl ToSql for ColumnId {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let column = f.generator.schema.column(self);
        if f.qualify {
            let table = f.generator.schema.table(self.table);
            fmt!(f, Ident(&table.name) "." Ident(&column.name));
        } else {
            fmt!(f, Ident(&column.name));
        }
    }
}

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::Column(column) => fmt!(f, *column),
            Expr::Func(func) => fmt!(f, func),
            Expr::Value(value) => fmt!(f, value),
        }
    }
}

impl ToSql for &Func {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = match self.kind {
            FuncKind::Avg => "AVG",
            FuncKind::Count => "COUNT",
            FuncKind::Max => "MAX",
            FuncKind::Min => "MIN",
            FuncKind::Sum => "SUM",
        };
        match self.arg {
            Some(column) => fmt!(f, name "(" column ")"),
            None => fmt!(f, name "(*)"),
        }
    }
}

/// Literals always render as a placeholder; the value itself goes to the
/// parameter list.
impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = f.params.push(self);
        placeholder.to_sql(f);
    }
}

impl ToSql for &Operand {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Operand::Value(value) => fmt!(f, value),
            Operand::Column(column) => fmt!(f, *column),
        }
    }
}

impl ToSql for &Condition {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match &self.kind {
            ConditionKind::Compare { column, op, rhs } => {
                // Equality against NULL renders as a NULL test; negation
                // folds into the test instead of wrapping it.
                if matches!(rhs, Operand::Value(Value::Null)) {
                    let negated = self.negated ^ matches!(op, CompareOp::Ne);
                    null_test(f, *column, negated);
                    return;
                }

                let Some(op_text) = f.generator.dialect.condition_operator(*op) else {
                    panic!("dialect has no operator for {op:?}")
                };

                if self.negated {
                    fmt!(f, "NOT (" column " " op_text " " rhs ")");
                } else {
                    fmt!(f, *column " " op_text " " rhs);
                }
            }
            ConditionKind::IsNull { column } => {
                null_test(f, *column, self.negated);
            }
            ConditionKind::And(operands) => {
                if self.negated {
                    fmt!(f, "NOT ");
                }
                fmt!(f, "(" Delimited(operands, " AND ") ")");
            }
            ConditionKind::Or(operands) => {
                if self.negated {
                    fmt!(f, "NOT ");
                }
                fmt!(f, "(" Delimited(operands, " OR ") ")");
            }
        }
    }
}

fn null_test<P: Params>(f: &mut Formatter<'_, P>, column: ColumnId, negated: bool) {
    if negated {
        fmt!(f, column " IS NOT NULL");
    } else {
        fmt!(f, column " IS NULL");
    }
}

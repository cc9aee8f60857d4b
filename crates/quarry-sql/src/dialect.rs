use crate::generator::Sql;

use quarry_core::{
    schema::{Column, Schema, Table, Type},
    stmt::{CompareOp, Value},
};

/// A SQL dialect.
///
/// The generator asks the dialect for everything engines spell differently:
/// placeholder syntax, identifier quoting, native type names, constraint
/// clauses, operator text, and catalog queries. The defaults are
/// ANSI-flavored; a driver overrides what its engine deviates on.
pub trait Dialect: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Writes the placeholder for the `n`th parameter, 1-based.
    fn placeholder(&self, _n: usize, dst: &mut String) {
        dst.push('?');
    }

    /// Quotes an identifier into `dst`.
    fn quote_ident(&self, ident: &str, dst: &mut String) {
        dst.push('"');
        for ch in ident.chars() {
            if ch == '"' {
                dst.push('"');
            }
            dst.push(ch);
        }
        dst.push('"');
    }

    /// The engine's name for a column's declared type.
    fn native_type(&self, column: &Column) -> String {
        match column.ty {
            Type::Boolean => "BOOLEAN",
            Type::Integer => "BIGINT",
            Type::Double => "DOUBLE PRECISION",
            Type::Text => "TEXT",
            Type::Blob => "BLOB",
        }
        .to_string()
    }

    /// Constraint clauses for a column definition, in emission order.
    ///
    /// A composite primary key is not rendered here; the table body carries
    /// it as a `PRIMARY KEY (...)` clause.
    fn column_constraints(&self, table: &Table, column: &Column, schema: &Schema) -> Vec<String> {
        let mut constraints = vec![];

        if column.primary_key && table.primary_key.len() == 1 {
            constraints.push("PRIMARY KEY".to_string());
        }
        if column.auto_increment {
            constraints.push("GENERATED BY DEFAULT AS IDENTITY".to_string());
        }
        if !column.nullable && !column.primary_key {
            constraints.push("NOT NULL".to_string());
        }
        if column.unique {
            constraints.push("UNIQUE".to_string());
        }
        if let Some(target) = column.references {
            let target_table = schema.table(target.table);
            let target_column = schema.column(target);
            let mut clause = "REFERENCES ".to_string();
            self.quote_ident(&target_table.name, &mut clause);
            clause.push_str(" (");
            self.quote_ident(&target_column.name, &mut clause);
            clause.push(')');
            constraints.push(clause);
        }

        constraints
    }

    /// Whether the engine can insert-or-update in one statement.
    fn supports_merge(&self) -> bool {
        false
    }

    /// The operator text for a comparison, or `None` when the engine has no
    /// spelling for it.
    fn condition_operator(&self, op: CompareOp) -> Option<&'static str> {
        match op {
            CompareOp::Eq => Some("="),
            CompareOp::Ne => Some("<>"),
            CompareOp::Gt => Some(">"),
            CompareOp::Ge => Some(">="),
            CompareOp::Lt => Some("<"),
            CompareOp::Le => Some("<="),
            CompareOp::Like => Some("LIKE"),
            CompareOp::Regex => None,
        }
    }

    /// Catalog query answering whether `table` exists. One row back means yes.
    fn table_exists_sql(&self, table: &str) -> Sql {
        let mut text =
            "SELECT table_name FROM information_schema.tables WHERE table_name = ".to_string();
        self.placeholder(1, &mut text);
        Sql {
            text,
            params: vec![Value::from(table)],
        }
    }

    /// Catalog query listing table names, one per row.
    fn list_tables_sql(&self) -> Sql {
        Sql {
            text: "SELECT table_name FROM information_schema.tables ORDER BY table_name"
                .to_string(),
            params: vec![],
        }
    }

    /// Catalog query listing the column names of `table`, one per row.
    fn list_columns_sql(&self, table: &str) -> Sql {
        let mut text =
            "SELECT column_name FROM information_schema.columns WHERE table_name = ".to_string();
        self.placeholder(1, &mut text);
        text.push_str(" ORDER BY ordinal_position");
        Sql {
            text,
            params: vec![Value::from(table)],
        }
    }
}

/// ANSI-flavored dialect with no engine-specific overrides.
///
/// Useful for rendering portable SQL and as the base line the bundled driver
/// dialects deviate from. No merge support and no regex operator.
#[derive(Debug, Default)]
pub struct GenericDialect;

impl GenericDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

use quarry_core::{
    schema::{Column, Schema, Table, Type},
    stmt::{CompareOp, Value},
};
use quarry_sql::{Dialect, Sql};

use std::fmt::Write;

/// SQLite's spelling of the generated SQL.
#[derive(Debug, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, n: usize, dst: &mut String) {
        write!(dst, "?{n}").unwrap();
    }

    /// SQLite stores booleans as integers and has no distinct double type.
    fn native_type(&self, column: &Column) -> String {
        match column.ty {
            Type::Boolean | Type::Integer => "INTEGER",
            Type::Double => "REAL",
            Type::Text => "TEXT",
            Type::Blob => "BLOB",
        }
        .to_string()
    }

    fn column_constraints(&self, table: &Table, column: &Column, schema: &Schema) -> Vec<String> {
        let mut constraints = vec![];

        // AUTOINCREMENT is only legal in the literal INTEGER PRIMARY KEY
        // column form.
        if column.primary_key && table.primary_key.len() == 1 {
            if column.auto_increment {
                constraints.push("PRIMARY KEY AUTOINCREMENT".to_string());
            } else {
                constraints.push("PRIMARY KEY".to_string());
            }
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

    fn supports_merge(&self) -> bool {
        true
    }

    fn condition_operator(&self, op: CompareOp) -> Option<&'static str> {
        match op {
            CompareOp::Eq => Some("="),
            CompareOp::Ne => Some("<>"),
            CompareOp::Gt => Some(">"),
            CompareOp::Ge => Some(">="),
            CompareOp::Lt => Some("<"),
            CompareOp::Le => Some("<="),
            CompareOp::Like => Some("LIKE"),
            // The driver registers the function this operator calls.
            CompareOp::Regex => Some("REGEXP"),
        }
    }

    fn table_exists_sql(&self, table: &str) -> Sql {
        let mut text =
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ".to_string();
        self.placeholder(1, &mut text);
        Sql {
            text,
            params: vec![Value::from(table)],
        }
    }

    fn list_tables_sql(&self) -> Sql {
        Sql {
            text: "SELECT name FROM sqlite_master WHERE type = 'table' \
                   AND name NOT LIKE 'sqlite_%' ORDER BY name"
                .to_string(),
            params: vec![],
        }
    }

    fn list_columns_sql(&self, table: &str) -> Sql {
        let mut text = "SELECT name FROM pragma_table_info(".to_string();
        self.placeholder(1, &mut text);
        text.push_str(") ORDER BY cid");
        Sql {
            text,
            params: vec![Value::from(table)],
        }
    }
}

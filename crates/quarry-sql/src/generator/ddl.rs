use super::Generator;

use quarry_core::schema::{Index, Table};

impl Generator<'_> {
    /// Renders a CREATE TABLE statement for `table`.
    ///
    /// Column definitions come from the dialect's native types and constraint
    /// clauses. A multi-column primary key renders as a `PRIMARY KEY (...)`
    /// clause in the table body since no single column definition can carry
    /// it.
    pub fn create_table(&self, table: &Table, if_not_exists: bool) -> String {
        let mut out = "CREATE TABLE ".to_string();
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.dialect.quote_ident(&table.name, &mut out);
        out.push_str(" (");

        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.dialect.quote_ident(&column.name, &mut out);
            out.push(' ');
            out.push_str(&self.dialect.native_type(column));

            for constraint in self.dialect.column_constraints(table, column, self.schema) {
                out.push(' ');
                out.push_str(&constraint);
            }
        }

        if table.primary_key.len() > 1 {
            out.push_str(", PRIMARY KEY (");
            for (i, column) in table.primary_key.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.dialect
                    .quote_ident(&self.schema.column(*column).name, &mut out);
            }
            out.push(')');
        }

        out.push(')');
        out
    }

    /// Renders a CREATE INDEX statement for `index`.
    pub fn create_index(&self, index: &Index) -> String {
        let mut out = if index.unique {
            "CREATE UNIQUE INDEX ".to_string()
        } else {
            "CREATE INDEX ".to_string()
        };
        self.dialect.quote_ident(&index.name, &mut out);

        out.push_str(" ON ");
        let table = self.schema.table(index.id.table);
        self.dialect.quote_ident(&table.name, &mut out);

        out.push_str(" (");
        for (i, column) in index.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.dialect
                .quote_ident(&self.schema.column(*column).name, &mut out);
        }
        out.push(')');
        out
    }

    /// Renders CREATE statements for every schema table absent from
    /// `existing`.
    ///
    /// All table statements come before any index statement so the script
    /// never indexes a table it has not created yet. Tables already present
    /// are skipped entirely, indices included.
    pub fn ddl_statements(&self, existing: &[String], if_not_exists: bool) -> Vec<String> {
        let missing: Vec<&Table> = self
            .schema
            .tables
            .iter()
            .filter(|table| !existing.contains(&table.name))
            .collect();

        let mut statements: Vec<String> = missing
            .iter()
            .map(|table| self.create_table(table, if_not_exists))
            .collect();

        statements.extend(
            missing
                .iter()
                .flat_map(|table| table.indices.iter())
                .map(|index| self.create_index(index)),
        );

        statements
    }

    /// Renders [`Generator::ddl_statements`] as one semicolon-joined script.
    pub fn ddl(&self, existing: &[String], if_not_exists: bool) -> String {
        let statements = self.ddl_statements(existing, if_not_exists);

        if statements.is_empty() {
            return String::new();
        }

        let mut script = statements.join(";\n");
        script.push(';');
        script
    }
}

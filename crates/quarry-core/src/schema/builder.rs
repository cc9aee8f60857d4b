use super::{Column, ColumnId, Index, IndexId, Schema, Table, TableId, Type};
use crate::{Error, Result};

/// Assembles a [`Schema`].
///
/// Tables and columns are declared by name; ids are assigned and every
/// by-name reference (foreign keys, index columns) is resolved when
/// [`build`](Builder::build) runs.
pub struct Builder {
    tables: Vec<TableBuilder>,
}

pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnBuilder>,
    indices: Vec<IndexBuilder>,
}

pub struct ColumnBuilder {
    name: String,
    ty: Type,
    nullable: bool,
    primary_key: bool,
    unique: bool,
    auto_increment: bool,
    references: Option<(String, String)>,
}

struct IndexBuilder {
    name: String,
    columns: Vec<String>,
    unique: bool,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self { tables: vec![] }
    }

    pub fn table(&mut self, name: impl Into<String>) -> &mut TableBuilder {
        self.tables.push(TableBuilder {
            name: name.into(),
            columns: vec![],
            indices: vec![],
        });
        self.tables.last_mut().unwrap()
    }

    pub fn build(self) -> Result<Schema> {
        for (i, table) in self.tables.iter().enumerate() {
            if self.tables[..i].iter().any(|t| t.name == table.name) {
                return Err(Error::configuration(format!(
                    "duplicate table `{}`",
                    table.name
                )));
            }
        }

        let mut tables = Vec::with_capacity(self.tables.len());

        for (table_index, tb) in self.tables.iter().enumerate() {
            let table_id = TableId(table_index);
            let mut columns = Vec::with_capacity(tb.columns.len());
            let mut primary_key = vec![];

            for (column_index, cb) in tb.columns.iter().enumerate() {
                if tb.columns[..column_index].iter().any(|c| c.name == cb.name) {
                    return Err(Error::configuration(format!(
                        "duplicate column `{}` in table `{}`",
                        cb.name, tb.name
                    )));
                }
                if cb.auto_increment && cb.ty != Type::Integer {
                    return Err(Error::configuration(format!(
                        "auto-increment column `{}` in table `{}` must be an integer",
                        cb.name, tb.name
                    )));
                }

                let id = ColumnId {
                    table: table_id,
                    index: column_index,
                };
                if cb.primary_key {
                    primary_key.push(id);
                }
                columns.push(Column {
                    id,
                    name: cb.name.clone(),
                    ty: cb.ty,
                    nullable: cb.nullable,
                    primary_key: cb.primary_key,
                    unique: cb.unique,
                    auto_increment: cb.auto_increment,
                    references: None,
                });
            }

            let mut indices = vec![];
            for (index_index, ib) in tb.indices.iter().enumerate() {
                let mut index_columns = vec![];
                for name in &ib.columns {
                    let Some(column) = columns.iter().find(|c| &c.name == name) else {
                        return Err(Error::configuration(format!(
                            "index `{}` references unknown column `{}` in table `{}`",
                            ib.name, name, tb.name
                        )));
                    };
                    index_columns.push(column.id);
                }
                indices.push(Index {
                    id: IndexId {
                        table: table_id,
                        index: index_index,
                    },
                    name: ib.name.clone(),
                    columns: index_columns,
                    unique: ib.unique,
                });
            }

            tables.push(Table {
                id: table_id,
                name: tb.name.clone(),
                columns,
                primary_key,
                indices,
            });
        }

        // Foreign keys resolve last so a column can reference a table
        // declared after its own.
        for (table_index, tb) in self.tables.iter().enumerate() {
            for (column_index, cb) in tb.columns.iter().enumerate() {
                let Some((ref_table, ref_column)) = &cb.references else {
                    continue;
                };
                let target = tables
                    .iter()
                    .find(|t| &t.name == ref_table)
                    .and_then(|t| t.column_named(ref_column))
                    .map(|c| c.id);
                let Some(target) = target else {
                    return Err(Error::configuration(format!(
                        "column `{}.{}` references unknown column `{}.{}`",
                        tb.name, cb.name, ref_table, ref_column
                    )));
                };
                tables[table_index].columns[column_index].references = Some(target);
            }
        }

        Ok(Schema { tables })
    }
}

impl TableBuilder {
    pub fn column(&mut self, name: impl Into<String>, ty: Type) -> &mut ColumnBuilder {
        self.columns.push(ColumnBuilder {
            name: name.into(),
            ty,
            nullable: false,
            primary_key: false,
            unique: false,
            auto_increment: false,
            references: None,
        });
        self.columns.last_mut().unwrap()
    }

    pub fn index(&mut self, name: impl Into<String>, columns: &[&str]) -> &mut Self {
        self.push_index(name.into(), columns, false);
        self
    }

    pub fn unique_index(&mut self, name: impl Into<String>, columns: &[&str]) -> &mut Self {
        self.push_index(name.into(), columns, true);
        self
    }

    fn push_index(&mut self, name: String, columns: &[&str], unique: bool) {
        self.indices.push(IndexBuilder {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique,
        });
    }
}

impl ColumnBuilder {
    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(&mut self) -> &mut Self {
        self.primary_key = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn references(&mut self, table: impl Into<String>, column: impl Into<String>) -> &mut Self {
        self.references = Some((table.into(), column.into()));
        self
    }
}

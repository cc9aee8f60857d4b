mod builder;
pub use builder::{Builder, ColumnBuilder, TableBuilder};

mod column;
pub use column::{Column, ColumnId};

mod index;
pub use index::{Index, IndexId};

mod table;
pub use table::{Table, TableId};

mod ty;
pub use ty::Type;

/// The full set of tables the engine operates over.
///
/// Built once at startup through [`Schema::builder`] and immutable afterwards.
/// Statements reference tables and columns by id; ids are only minted by the
/// builder, so id-based lookups index directly.
#[derive(Debug)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        &self.tables[id.into().0]
    }

    pub fn table_named(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        self.table(id.table).column(id)
    }
}

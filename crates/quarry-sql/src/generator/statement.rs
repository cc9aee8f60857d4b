use super::{Comma, Formatter, Ident, Params, ToSql};

use quarry_core::{
    schema::TableId,
    stmt::{ColumnValue, Delete, Insert, Join, JoinKind, Limit, Merge, OrderBy, Select, Statement, Update},
};

use std::fmt::Write;

/// A table reference, rendered as its quoted name.
struct TableName(TableId);

impl ToSql for TableName {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = f.generator.schema.table(self.0);
        fmt!(f, Ident(&table.name));
    }
}

/// A `SET`-style assignment pair.
struct Assign<'a>(&'a ColumnValue);

impl ToSql for Assign<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.0.column " = " self.0.value);
    }
}

/// An upsert assignment taking the would-be inserted value.
struct Excluded<'a>(&'a ColumnValue);

impl ToSql for Excluded<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.0.column " = excluded." self.0.column);
    }
}

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Merge(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        // With a single table in scope, bare column names are unambiguous.
        f.qualify = self.from.len() + self.joins.len() > 1;

        fmt!(
            f,
            "SELECT " Comma(&self.exprs)
            " FROM " Comma(self.from.iter().map(|id| TableName(*id)))
        );

        for join in &self.joins {
            fmt!(f, " " join);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(&self.group_by));
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        if let Some(limit) = &self.limit {
            fmt!(f, " " limit);
        }
    }
}

impl ToSql for &Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let keyword = match self.kind {
            JoinKind::Inner => "INNER JOIN ",
            JoinKind::Left => "LEFT JOIN ",
        };
        fmt!(f, keyword TableName(self.table) " ON " self.on);
    }
}

impl ToSql for &OrderBy {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use quarry_core::stmt::Direction;

        match self.direction {
            Direction::Asc => fmt!(f, &self.expr " ASC"),
            Direction::Desc => fmt!(f, &self.expr " DESC"),
        }
    }
}

/// Limits render as literals; only values bind as parameters.
impl ToSql for &Limit {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        write!(f.dst, "LIMIT {}", self.limit).unwrap();
        if let Some(offset) = self.offset {
            write!(f.dst, " OFFSET {offset}").unwrap();
        }
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            "INSERT INTO " TableName(self.table)
            " (" Comma(self.values.iter().map(|cv| cv.column)) ")"
            " VALUES (" Comma(self.values.iter().map(|cv| &cv.value)) ")"
        );
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            "UPDATE " TableName(self.table)
            " SET " Comma(self.assignments.iter().map(Assign))
        );

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " TableName(self.table));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &Merge {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            "INSERT INTO " TableName(self.table)
            " (" Comma(self.values.iter().map(|cv| cv.column)) ")"
            " VALUES (" Comma(self.values.iter().map(|cv| &cv.value)) ")"
            " ON CONFLICT (" self.key ")"
        );

        // Non-key values are written over the existing row. A merge carrying
        // only its key has nothing to update.
        let updates: Vec<&ColumnValue> = self
            .values
            .iter()
            .filter(|cv| cv.column != self.key)
            .collect();

        if updates.is_empty() {
            fmt!(f, " DO NOTHING");
        } else {
            fmt!(f, " DO UPDATE SET " Comma(updates.into_iter().map(Excluded)));
        }
    }
}

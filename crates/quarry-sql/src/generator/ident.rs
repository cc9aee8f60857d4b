use super::{Formatter, Params, ToSql};

/// An identifier, quoted by the dialect.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.generator.dialect.quote_ident(self.0.as_ref(), f.dst);
    }
}

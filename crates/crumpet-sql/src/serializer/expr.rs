use super::{Formatter, Ident, Params, ToSql};

use crumpet_core::stmt::{Direction, Filter, OrderBy};

/// A resolved column reference, qualified with the base table while a joined
/// select is being serialized.
pub(super) struct Column<'a>(pub(super) &'a str);

impl ToSql for Column<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match f.qualify.clone() {
            Some(table) => fmt!(f, Ident(table.as_str()) "." Ident(self.0)),
            None => fmt!(f, Ident(self.0)),
        }
    }
}

/// A projection, group-by, or order-by entry: a plain identifier is treated
/// as a column, anything else (aggregates, raw fragments) passes verbatim.
pub(super) struct ColumnOrFragment<'a>(pub(super) &'a str);

impl ToSql for ColumnOrFragment<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if is_simple_ident(self.0) {
            fmt!(f, Column(self.0));
        } else {
            fmt!(f, self.0);
        }
    }
}

impl ToSql for &Filter {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Filter::Eq(column, value) => {
                fmt!(f, Column(column) " = " value);
            }
            Filter::In(column, values) => {
                fmt!(f, Column(column) " IN (");
                let mut s = "";
                for value in values {
                    fmt!(f, s value);
                    s = ", ";
                }
                fmt!(f, ")");
            }
            Filter::Raw(sql, params) => {
                for param in params {
                    f.params.push(param);
                }
                fmt!(f, sql.as_str());
            }
        }
    }
}

impl ToSql for &OrderBy {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, ColumnOrFragment(&self.column) self.direction);
    }
}

impl ToSql for Direction {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push_str(match self {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        })
    }
}

fn is_simple_ident(s: &str) -> bool {
    let mut chars = s.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

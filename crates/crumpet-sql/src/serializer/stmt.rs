use super::expr::{Column, ColumnOrFragment};
use super::{Comma, Delimited, Formatter, Ident, Params, ToSql};

use crumpet_core::stmt::{Assignment, Delete, Filter, Insert, Query, Statement, Update};

impl ToSql for &Statement {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Statement::Select(query) => query.to_sql(f),
            Statement::Insert(insert) => insert.to_sql(f),
            Statement::Update(update) => update.to_sql(f),
            Statement::Delete(delete) => delete.to_sql(f),
        }
    }
}

impl ToSql for &Query {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        // With joins in play, plain columns need the base table qualifier to
        // stay unambiguous.
        if !self.joins.is_empty() {
            f.qualify = Some(self.model.table.clone());
        }

        fmt!(f, "SELECT ");

        let mut s = "";
        match &self.projection {
            Some(items) => {
                for item in items {
                    fmt!(f, s);
                    match self.model.field(item) {
                        Some(field) => fmt!(f, Column(field.column_name())),
                        None => fmt!(f, ColumnOrFragment(item)),
                    }
                    s = ", ";
                }
            }
            None => {
                for field in &self.model.fields {
                    fmt!(f, s Column(field.column_name()));
                    s = ", ";
                }
            }
        }

        // Joined columns are aliased "<reference>.<column>" so the
        // association resolver can slice them back out of the row.
        for join in &self.joins {
            for column in &join.columns {
                let alias = format!("{}.{}", join.reference, column);
                fmt!(
                    f, s Ident(join.table.as_str()) "." Ident(column.as_str())
                    " AS " Ident(alias.as_str())
                );
                s = ", ";
            }
        }

        fmt!(f, " FROM " Ident(self.model.table.as_str()));

        for join in &self.joins {
            fmt!(
                f, " JOIN " Ident(join.table.as_str())
                " ON " Ident(self.model.table.as_str()) "." Ident(join.owning_column.as_str())
                " = " Ident(join.table.as_str()) "." Ident(join.target_pk_column.as_str())
            );
        }

        where_clause(f, &self.filter);

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY ");
            let mut s = "";
            for column in &self.group_by {
                fmt!(f, s ColumnOrFragment(column));
                s = ", ";
            }
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(self.order_by.iter()));
        }

        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT " limit);
        }

        if let Some(offset) = self.offset {
            fmt!(f, " OFFSET " offset);
        }

        f.qualify = None;
    }
}

impl ToSql for &Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(self.columns.iter().map(|column| Ident(column.as_str())));

        fmt!(f, "INSERT INTO " Ident(self.table.as_str()) " (" columns ") VALUES ");

        let mut s = "";
        for row in &self.rows {
            fmt!(f, s "(");
            let mut v = "";
            for value in row {
                fmt!(f, v value);
                v = ", ";
            }
            fmt!(f, ")");
            s = ", ";
        }

        if let Some(returning) = &self.returning {
            let columns = Comma(returning.iter().map(|column| Ident(column.as_str())));
            fmt!(f, " RETURNING " columns);
        }
    }
}

impl ToSql for &Update {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(
            f, "UPDATE " Ident(self.table.as_str())
            " SET " Comma(self.assignments.iter())
        );
        where_clause(f, &self.filter);
    }
}

impl ToSql for &Assignment {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let value = &self.value;
        fmt!(f, Ident(self.column.as_str()) " = " value);
    }
}

impl ToSql for &Delete {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "DELETE FROM " Ident(self.table.as_str()));
        where_clause(f, &self.filter);
    }
}

fn where_clause<T: Params>(f: &mut Formatter<'_, T>, filter: &[Filter]) {
    if !filter.is_empty() {
        fmt!(f, " WHERE " Delimited(filter.iter(), " AND "));
    }
}

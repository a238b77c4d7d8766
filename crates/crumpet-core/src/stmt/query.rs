use super::{Assignments, Direction, Filter, Join, OrderBy, Value};
use crate::{
    schema::{Model, Schema},
    Error, Result,
};

use std::sync::Arc;

/// An immutable description of a selection or mutation over one table.
///
/// Builder methods take `&self` and return a fresh value with one component
/// replaced or extended, so a query can be shared and reused as a template.
/// Field and association names are resolved against the schema as clauses
/// are added; compiling to SQL happens only at execution time.
#[derive(Debug, Clone)]
pub struct Query {
    pub schema: Arc<Schema>,
    pub model: Arc<Model>,

    /// Selected columns; `None` selects every field's column. Entries that
    /// name a field resolve to its storage column, anything else is emitted
    /// verbatim (raw fragments, aggregate expressions).
    pub projection: Option<Vec<String>>,

    pub joins: Vec<Join>,

    /// Conjunctive predicate
    pub filter: Vec<Filter>,

    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,

    /// `SET` clauses, only meaningful when executed as an update
    pub assignments: Assignments,
}

impl Query {
    pub fn new(schema: Arc<Schema>, model: Arc<Model>) -> Self {
        Self {
            schema,
            model,
            projection: None,
            joins: Vec::new(),
            filter: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            assignments: Assignments::default(),
        }
    }

    /// Replace the projection list.
    pub fn select<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut query = self.clone();
        query.projection = Some(columns.into_iter().map(Into::into).collect());
        query
    }

    /// Join an owning-side reference, fetching every target column.
    pub fn join(&self, reference: &str) -> Result<Self> {
        self.join_entry(reference, None)
    }

    /// Join an owning-side reference, restricting the fetched target fields.
    /// Fields outside the subset stay unset on the nested record.
    pub fn join_with<I, S>(&self, reference: &str, select: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.join_entry(
            reference,
            Some(select.into_iter().map(Into::into).collect()),
        )
    }

    /// Add an equality constraint, or a membership (`IN`) constraint when the
    /// value is a list. Multiple calls conjunct. A to-one reference name
    /// resolves to its owning-key column compared against the target's
    /// primary key.
    pub fn filter(&self, field: &str, value: impl Into<Value>) -> Result<Self> {
        let filter = self.resolve_filter(field, value.into())?;

        let mut query = self.clone();
        query.filter.push(filter);
        Ok(query)
    }

    /// Add a verbatim SQL predicate fragment with its positional params.
    pub fn filter_raw(&self, sql: impl Into<String>, params: Vec<Value>) -> Self {
        let mut query = self.clone();
        query.filter.push(Filter::Raw(sql.into(), params));
        query
    }

    pub fn group_by<I, S>(&self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut query = self.clone();
        query
            .group_by
            .extend(columns.into_iter().map(|column| self.column_of(column.into())));
        query
    }

    pub fn order_by(&self, column: &str, direction: Direction) -> Self {
        let mut query = self.clone();
        query
            .order_by
            .push(OrderBy::new(self.column_of(column.to_string()), direction));
        query
    }

    pub fn limit(&self, limit: u64) -> Self {
        let mut query = self.clone();
        query.limit = Some(limit);
        query
    }

    pub fn offset(&self, offset: u64) -> Self {
        let mut query = self.clone();
        query.offset = Some(offset);
        query
    }

    /// Add a `SET` clause for execution as an update.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<Self> {
        let field = self
            .model
            .field(field)
            .ok_or_else(|| Error::unknown_field(&self.model.name, field))?;
        let value = field.to_store(value.into())?;

        let mut query = self.clone();
        query.assignments.set(field.column_name(), value);
        Ok(query)
    }

    /// Convenience terminal; the query itself already describes "all rows".
    pub fn all(&self) -> Self {
        self.clone()
    }

    /// The single deterministic row selector: order by primary key
    /// descending, limit 1.
    pub fn last(&self) -> Self {
        let mut query = self.clone();
        query.order_by = vec![OrderBy::new(
            self.model.primary_key_field().column_name(),
            Direction::Desc,
        )];
        query.limit = Some(1);
        query
    }

    fn resolve_filter(&self, name: &str, value: Value) -> Result<Filter> {
        if let Some(field) = self.model.field(name) {
            return constraint(field.column_name(), value, |value| field.to_store(value));
        }

        if let Some(reference) = self.model.reference(name) {
            let Some(to_one) = reference.as_to_one() else {
                return Err(Error::invalid_statement(format!(
                    "cannot filter {}.{name}: to-many references have no owning column",
                    self.model.name
                )));
            };

            // The constraint lands on the owning-key column; values are
            // target primary keys.
            let owning = &self.model.fields[to_one.owning_field];
            let target = self.schema.model(to_one.target);
            let pk = target.primary_key_field();

            return constraint(owning.column_name(), value, |value| pk.to_store(value));
        }

        Err(Error::unknown_field(&self.model.name, name))
    }

    fn join_entry(&self, name: &str, select: Option<Vec<String>>) -> Result<Self> {
        let reference = self
            .model
            .reference(name)
            .ok_or_else(|| Error::unknown_field(&self.model.name, name))?;

        let Some(to_one) = reference.as_to_one() else {
            return Err(Error::invalid_statement(format!(
                "cannot join {}.{name}: only owning-side references join in a single row",
                self.model.name
            )));
        };

        let target = self.schema.model(to_one.target);

        let columns = match select {
            Some(fields) => fields
                .iter()
                .map(|field| {
                    target
                        .field(field)
                        .map(|field| field.column_name().to_string())
                        .ok_or_else(|| Error::unknown_field(&target.name, field))
                })
                .collect::<Result<Vec<_>>>()?,
            None => target.columns().map(str::to_string).collect(),
        };

        let mut query = self.clone();
        query.joins.push(Join {
            reference: name.to_string(),
            table: target.table.clone(),
            owning_column: self.model.fields[to_one.owning_field]
                .column_name()
                .to_string(),
            target_pk_column: target.primary_key_field().column_name().to_string(),
            columns,
        });
        Ok(query)
    }

    /// Resolve a caller-facing name to its storage column, passing anything
    /// that is not a field through verbatim.
    fn column_of(&self, name: String) -> String {
        match self.model.field(&name) {
            Some(field) => field.column_name().to_string(),
            None => name,
        }
    }
}

fn constraint(
    column: &str,
    value: Value,
    to_store: impl Fn(Value) -> Result<Value>,
) -> Result<Filter> {
    Ok(match value {
        Value::List(items) => Filter::In(
            column.to_string(),
            items.into_iter().map(to_store).collect::<Result<_>>()?,
        ),
        value => Filter::Eq(column.to_string(), to_store(value)?),
    })
}

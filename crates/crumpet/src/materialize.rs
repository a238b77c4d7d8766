//! Row materialization: binding driver rows back to typed records.
//!
//! A row's columns are matched against the model's storage keys; present
//! columns become populated slots (converters applied on read), absent ones
//! stay unset. Columns aliased `"<reference>.<column>"` by a join are sliced
//! out and materialized as a nested record of the reference's target model —
//! all from the single result set, never by issuing another query.

use crate::Record;

use crumpet_core::{
    schema::{Model, Schema},
    stmt::{Row, Value},
    Result,
};

use std::sync::Arc;

/// Bind a driver row to a new record of the given model.
pub fn record(schema: &Arc<Schema>, model: &Arc<Model>, row: &Row) -> Result<Record> {
    let mut record = Record::new(model.clone());

    for (index, field) in model.fields.iter().enumerate() {
        if let Some(value) = row.get(field.column_name()) {
            record.set_value(index, field.from_store(value.clone())?);
        }
    }

    resolve_associations(schema, model, row, &mut record)?;

    record.refresh_snapshot();
    Ok(record)
}

/// Slice joined sub-columns out of the row and attach the nested records.
fn resolve_associations(
    schema: &Arc<Schema>,
    model: &Arc<Model>,
    row: &Row,
    record: &mut Record,
) -> Result<()> {
    for reference in &model.references {
        let Some(to_one) = reference.as_to_one() else {
            // To-many data cannot arrive in a single row
            continue;
        };

        let Some(sub_row) = slice(row, reference.name()) else {
            continue;
        };

        let target = schema.model(to_one.target);
        let nested = self::record(schema, target, &sub_row)?;
        record.attach_association(reference.name(), nested);
    }

    Ok(())
}

/// Extract the `"<reference>.<column>"` columns as a row of their own.
fn slice(row: &Row, reference: &str) -> Option<Row> {
    let mut columns = Vec::new();
    let mut values = Vec::new();

    for (name, value) in row.iter() {
        if let Some(column) = name.strip_prefix(reference).and_then(|rest| rest.strip_prefix('.')) {
            columns.push(column.to_string());
            values.push(value.clone());
        }
    }

    if columns.is_empty() || values.iter().all(Value::is_null) {
        return None;
    }

    Some(Row::new(Arc::new(columns), values))
}

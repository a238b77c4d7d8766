use crate::{Cursor, Record, Validator};

use crumpet_core::{
    driver::{Driver, Operation, Response},
    schema::{FieldDefault, Model, Schema},
    stmt::{Assignments, Delete, Filter, Insert, Query, Statement, Update, Value},
    Error, Result,
};
use crumpet_sql::Serializer;

use std::sync::Arc;

/// Executes compiled queries against the store and reconciles the results
/// with the in-memory records.
///
/// Holds no connection state; one logical call is one driver round trip (one
/// per batch for multi-record operations). Driver failures pass through
/// untouched — the repository raises its own errors only for its own
/// contracts.
pub struct Repository {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
    serializer: Serializer,
    validator: Option<Arc<dyn Validator>>,
}

impl Repository {
    pub fn new(schema: Arc<Schema>, driver: Arc<dyn Driver>, serializer: Serializer) -> Self {
        Self {
            schema,
            driver,
            serializer,
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Start a query builder against one of the registered models.
    pub fn query_builder(&self, model: &str) -> Result<Query> {
        self.schema.query(model)
    }

    /// Insert a single record; store-generated fields are populated on
    /// return and the snapshot is refreshed.
    pub async fn insert(&self, record: &mut Record) -> Result<()> {
        self.insert_batch(std::slice::from_mut(record)).await
    }

    /// Insert a batch as one multi-row statement. All-or-nothing at the
    /// statement level; a failure fails the entire call.
    pub async fn insert_many(&self, records: &mut [Record]) -> Result<()> {
        self.insert_batch(records).await
    }

    /// Execute a built query, returning a lazy cursor of records.
    pub async fn query(&self, query: &Query) -> Result<Cursor> {
        let response = self.exec_statement(&Statement::Select(query.clone())).await?;

        Ok(Cursor::new(
            self.schema.clone(),
            query.model.clone(),
            response.rows.into_values()?,
        ))
    }

    /// Execute raw SQL, materializing rows as records of the named model.
    pub async fn query_sql(
        &self,
        model: &str,
        sql: impl Into<String>,
        params: Vec<Value>,
    ) -> Result<Cursor> {
        let model = self.schema.model_by_name(model)?.clone();
        let response = self.driver.exec(Operation::query(sql, params)).await?;

        Ok(Cursor::new(
            self.schema.clone(),
            model,
            response.rows.into_values()?,
        ))
    }

    /// Eagerly collect a query into an ordered sequence.
    pub async fn query_all(&self, query: &Query) -> Result<Vec<Record>> {
        self.query(query).await?.collect().await
    }

    /// The first row materialized, or `None` for zero rows — never an error
    /// on an empty result.
    pub async fn first(&self, query: &Query) -> Result<Option<Record>> {
        let mut cursor = self.query(query).await?;

        match cursor.next().await {
            Some(record) => record.map(Some),
            None => Ok(None),
        }
    }

    /// Exactly one record: zero rows error, and so does more than one.
    pub async fn one(&self, query: &Query) -> Result<Record> {
        let mut cursor = self.query(query).await?;

        let Some(first) = cursor.next().await else {
            return Err(Error::no_results("query returned no rows"));
        };
        let record = first?;

        if cursor.next().await.is_some() {
            return Err(Error::too_many_records("expected 1 record, found multiple"));
        }

        Ok(record)
    }

    /// Write back the fields that changed since the record was last in sync
    /// with the store. An empty diff is a no-op that never contacts the
    /// store and returns `None`.
    pub async fn update(&self, record: &mut Record) -> Result<Option<u64>> {
        let model = record.model().clone();
        let dirty = record.dirty_fields();

        if dirty.is_empty() {
            return Ok(None);
        }

        if let Some(validator) = &self.validator {
            validator.validate(record)?;
        }

        let mut assignments = Assignments::default();
        for index in dirty {
            let field = &model.fields[index];
            let value = record
                .value_at(index)
                .cloned()
                .expect("dirty fields are set by construction");
            assignments.set(field.column_name(), field.to_store(value)?);
        }

        let update = Update {
            table: model.table.clone(),
            assignments,
            filter: vec![self.primary_key_filter(&model, record)?],
        };

        let count = self
            .exec_statement(&update.into())
            .await?
            .rows
            .into_count()?;

        record.refresh_snapshot();
        Ok(Some(count))
    }

    /// Execute a query's own `SET` clauses against its own predicate,
    /// independent of any in-memory record.
    pub async fn update_query(&self, query: &Query) -> Result<u64> {
        if query.assignments.is_empty() {
            return Err(Error::invalid_statement("update query has no set clauses"));
        }

        let update = Update {
            table: query.model.table.clone(),
            assignments: query.assignments.clone(),
            filter: query.filter.clone(),
        };

        self.exec_statement(&update.into()).await?.rows.into_count()
    }

    /// Delete a record by primary key. The in-memory instance remains a
    /// stale handle until the caller discards it.
    pub async fn delete(&self, record: &Record) -> Result<u64> {
        let model = record.model().clone();

        let delete = Delete {
            table: model.table.clone(),
            filter: vec![self.primary_key_filter(&model, record)?],
        };

        self.exec_statement(&delete.into()).await?.rows.into_count()
    }

    /// Delete a batch by primary keys in one `IN`-list statement.
    pub async fn delete_many(&self, records: &[Record]) -> Result<u64> {
        let Some(first) = records.first() else {
            return Ok(0);
        };
        let model = self.batch_model(first, records)?;
        let pk = model.primary_key_field();

        let keys = records
            .iter()
            .map(|record| {
                let value = record
                    .value_at(model.primary_key)
                    .cloned()
                    .ok_or_else(|| Error::unset_field(&model.name, &pk.name))?;
                pk.to_store(value)
            })
            .collect::<Result<Vec<_>>>()?;

        let delete = Delete {
            table: model.table.clone(),
            filter: vec![Filter::In(pk.column_name().to_string(), keys)],
        };

        self.exec_statement(&delete.into()).await?.rows.into_count()
    }

    /// Delete whatever the query's predicate matches.
    pub async fn delete_query(&self, query: &Query) -> Result<u64> {
        let delete = Delete {
            table: query.model.table.clone(),
            filter: query.filter.clone(),
        };

        self.exec_statement(&delete.into()).await?.rows.into_count()
    }

    /// Raw passthrough execution for statements with no materialization
    /// need; returns the driver's affected-row result.
    pub async fn exec(&self, sql: impl Into<String>, params: Vec<Value>) -> Result<u64> {
        self.driver
            .exec(Operation::execute(sql, params))
            .await?
            .rows
            .into_count()
    }

    /// The single column of the single row of a raw statement.
    pub async fn scalar(&self, sql: impl Into<String>, params: Vec<Value>) -> Result<Value> {
        let response = self.driver.exec(Operation::query(sql, params)).await?;
        Self::scalar_of(response).await
    }

    /// The single column of the single row of a built query.
    pub async fn scalar_query(&self, query: &Query) -> Result<Value> {
        let response = self.exec_statement(&Statement::Select(query.clone())).await?;
        Self::scalar_of(response).await
    }

    async fn scalar_of(response: Response) -> Result<Value> {
        let mut rows = response.rows.into_values()?;

        let Some(row) = rows.next().await else {
            return Err(Error::no_results("scalar query returned no rows"));
        };

        row?.get_index(0)
            .cloned()
            .ok_or_else(|| crumpet_core::err!("scalar query returned an empty row"))
    }

    async fn insert_batch(&self, records: &mut [Record]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let model = self.batch_model(first, records)?;

        for record in records.iter_mut() {
            self.apply_defaults(&model, record)?;

            if let Some(validator) = &self.validator {
                validator.validate(record)?;
            }
        }

        // Every non-store-generated column, uniformly across the batch
        let fields: Vec<_> = model
            .fields
            .iter()
            .filter(|field| !field.is_db_default())
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| {
                        let value = record
                            .value_at(field.id.index)
                            .cloned()
                            .unwrap_or(Value::Null);
                        field.to_store(value)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let returning: Vec<String> = model
            .fields
            .iter()
            .filter(|field| field.is_db_default())
            .map(|field| field.column_name().to_string())
            .collect();

        let insert = Insert {
            table: model.table.clone(),
            columns: fields
                .iter()
                .map(|field| field.column_name().to_string())
                .collect(),
            rows,
            returning: (!returning.is_empty()).then_some(returning),
        };

        let response = self.exec_statement(&insert.into()).await?;

        if let crumpet_core::driver::Rows::Values(stream) = response.rows {
            let generated = stream.collect().await?;

            if generated.len() != records.len() {
                crumpet_core::bail!(
                    "store returned {} generated rows for {} inserted records",
                    generated.len(),
                    records.len()
                );
            }

            for (record, row) in records.iter_mut().zip(generated) {
                for (column, value) in row.iter() {
                    if let Some(field) = model.field_by_column(column) {
                        record.set_value(field.id.index, field.from_store(value.clone())?);
                    }
                }
            }
        }

        for record in records.iter_mut() {
            record.refresh_snapshot();
        }

        Ok(())
    }

    /// Populate application defaults and enforce required-field presence
    /// before the insert leaves the process.
    fn apply_defaults(&self, model: &Arc<Model>, record: &mut Record) -> Result<()> {
        for (index, field) in model.fields.iter().enumerate() {
            if record.value_at(index).is_some() {
                continue;
            }

            match &field.default {
                FieldDefault::App(default) => record.set_value(index, default.value()),
                FieldDefault::Db => {}
                FieldDefault::None if field.nullable => {
                    // Sent as an explicit NULL; the snapshot then mirrors the
                    // stored row exactly.
                    record.set_value(index, Value::Null);
                }
                FieldDefault::None => {
                    return Err(Error::validation(format!(
                        "missing required field {}.{}",
                        model.name, field.name
                    )));
                }
            }
        }

        Ok(())
    }

    fn primary_key_filter(&self, model: &Arc<Model>, record: &Record) -> Result<Filter> {
        let pk = model.primary_key_field();
        let value = record
            .value_at(model.primary_key)
            .cloned()
            .ok_or_else(|| Error::unset_field(&model.name, &pk.name))?;

        Ok(Filter::Eq(
            pk.column_name().to_string(),
            pk.to_store(value)?,
        ))
    }

    fn batch_model(&self, first: &Record, records: &[Record]) -> Result<Arc<Model>> {
        let model = first.model().clone();

        for record in records {
            if !Arc::ptr_eq(record.model(), &model) {
                return Err(Error::invalid_statement(format!(
                    "batch mixes models: {} and {}",
                    model.name,
                    record.model().name
                )));
            }
        }

        Ok(model)
    }

    async fn exec_statement(&self, statement: &Statement) -> Result<Response> {
        let mut params: Vec<Value> = Vec::new();
        let sql = self.serializer.serialize(statement, &mut params);

        let op = if statement.returns_rows() {
            Operation::query(sql, params)
        } else {
            Operation::execute(sql, params)
        };

        self.driver.exec(op).await
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("driver", &self.driver)
            .field("serializer", &self.serializer)
            .field("validating", &self.validator.is_some())
            .finish()
    }
}

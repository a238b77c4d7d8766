use crate::{materialize, Record};

use crumpet_core::{
    schema::{Model, Schema},
    stmt::RowStream,
    Result,
};

use std::sync::Arc;

/// A lazy sequence of materialized records.
///
/// Finite, single-pass, not restartable: re-issuing requires re-running the
/// query. Rows materialize one at a time as the cursor is advanced.
pub struct Cursor {
    schema: Arc<Schema>,
    model: Arc<Model>,
    rows: RowStream,
}

impl Cursor {
    pub(crate) fn new(schema: Arc<Schema>, model: Arc<Model>, rows: RowStream) -> Self {
        Self {
            schema,
            model,
            rows,
        }
    }

    pub async fn next(&mut self) -> Option<Result<Record>> {
        Some(match self.rows.next().await? {
            Ok(row) => materialize::record(&self.schema, &self.model, &row),
            Err(err) => Err(err),
        })
    }

    /// Collect all remaining records, preserving row order.
    pub async fn collect(mut self) -> Result<Vec<Record>> {
        let mut ret = Vec::with_capacity(self.rows.min_len());

        while let Some(res) = self.next().await {
            ret.push(res?);
        }

        Ok(ret)
    }
}

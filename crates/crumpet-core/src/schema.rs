mod builder;
pub use builder::{Builder, ModelBuilder};

mod converter;
pub use converter::Converter;

mod field;
pub use field::{AppDefault, Field, FieldDefault, FieldId};

mod model;
pub use model::{Model, ModelId};

mod reference;
pub use reference::{Reference, ToMany, ToOne};

use crate::{stmt, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Process-wide, read-only record metadata.
///
/// Built once at startup via [`Builder`]; immutable and freely shared across
/// concurrent callers afterwards.
#[derive(Debug)]
pub struct Schema {
    pub models: Vec<Arc<Model>>,
    by_name: IndexMap<String, ModelId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(models: Vec<Arc<Model>>) -> Self {
        let by_name = models
            .iter()
            .map(|model| (model.name.clone(), model.id))
            .collect();

        Self { models, by_name }
    }

    pub fn model(&self, id: ModelId) -> &Arc<Model> {
        &self.models[id.0]
    }

    pub fn model_by_name(&self, name: &str) -> Result<&Arc<Model>> {
        match self.by_name.get(name) {
            Some(id) => Ok(self.model(*id)),
            None => Err(crate::err!("unknown model: {name}")),
        }
    }

    /// Start a query builder against one of the registered models.
    pub fn query(self: &Arc<Self>, model: &str) -> Result<stmt::Query> {
        let model = self.model_by_name(model)?.clone();
        Ok(stmt::Query::new(self.clone(), model))
    }
}

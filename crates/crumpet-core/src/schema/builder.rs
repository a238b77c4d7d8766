use super::{Field, FieldId, Model, ModelId, Reference, Schema, ToMany, ToOne};
use crate::{Error, Result};

use std::collections::HashSet;
use std::sync::Arc;

/// Builds the process-wide [`Schema`] at startup.
///
/// All consistency checks happen in [`Builder::build`]: an inconsistent
/// declaration is a configuration error surfaced before any query runs,
/// never at runtime.
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<ModelBuilder>,
}

#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    table: Option<String>,
    fields: Vec<Field>,
    references: Vec<ReferenceDef>,
}

#[derive(Debug)]
enum ReferenceDef {
    BelongsTo {
        name: String,
        target: String,
        owning_field: String,
    },
    HasMany {
        name: String,
        target: String,
        foreign_key: String,
    },
}

impl Builder {
    /// Declare a model; returns its builder for field and reference
    /// declarations.
    pub fn model(&mut self, name: impl Into<String>) -> &mut ModelBuilder {
        self.models.push(ModelBuilder {
            name: name.into(),
            table: None,
            fields: Vec::new(),
            references: Vec::new(),
        });

        self.models.last_mut().unwrap()
    }

    pub fn build(self) -> Result<Arc<Schema>> {
        let mut names = HashSet::new();
        for model in &self.models {
            if !names.insert(model.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate model: {}",
                    model.name
                )));
            }
        }

        // First pass: materialize models and assign ids so references can be
        // resolved across models in the second pass.
        let mut models = Vec::with_capacity(self.models.len());

        for (index, def) in self.models.iter().enumerate() {
            models.push(def.materialize(ModelId(index))?);
        }

        // Second pass: resolve references against the full model list.
        for (index, def) in self.models.iter().enumerate() {
            let references = def.resolve_references(ModelId(index), &models)?;
            models[index].references = references;
        }

        Ok(Arc::new(Schema::new(
            models.into_iter().map(Arc::new).collect(),
        )))
    }
}

impl ModelBuilder {
    /// Storage table override; defaults to the model name.
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(&mut self, field: Field) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Owning-side association: the foreign key lives on this model.
    pub fn belongs_to(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        owning_field: impl Into<String>,
    ) -> &mut Self {
        self.references.push(ReferenceDef::BelongsTo {
            name: name.into(),
            target: target.into(),
            owning_field: owning_field.into(),
        });
        self
    }

    /// Reverse association: the foreign key lives on the target model.
    pub fn has_many(
        &mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> &mut Self {
        self.references.push(ReferenceDef::HasMany {
            name: name.into(),
            target: target.into(),
            foreign_key: foreign_key.into(),
        });
        self
    }

    fn materialize(&self, id: ModelId) -> Result<Model> {
        let mut fields = self.fields.clone();

        let mut field_names = HashSet::new();
        for field in &fields {
            if !field_names.insert(field.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate field: {}.{}",
                    self.name, field.name
                )));
            }
        }

        for (index, field) in fields.iter_mut().enumerate() {
            field.id = FieldId { model: id, index };
        }

        let mut primary_keys = fields.iter().filter(|field| field.primary_key);
        let primary_key = match (primary_keys.next(), primary_keys.next()) {
            (Some(field), None) => field.id.index,
            (None, _) => {
                return Err(Error::invalid_schema(format!(
                    "model {} has no primary key",
                    self.name
                )))
            }
            (Some(_), Some(_)) => {
                return Err(Error::invalid_schema(format!(
                    "model {} has more than one primary key",
                    self.name
                )))
            }
        };

        Ok(Model {
            id,
            name: self.name.clone(),
            table: self.table.clone().unwrap_or_else(|| self.name.clone()),
            primary_key,
            fields,
            references: Vec::new(),
        })
    }

    fn resolve_references(&self, id: ModelId, models: &[Model]) -> Result<Vec<Reference>> {
        let model = &models[id.0];
        let mut references = Vec::with_capacity(self.references.len());
        let mut names = HashSet::new();

        for def in &self.references {
            let name = match def {
                ReferenceDef::BelongsTo { name, .. } => name,
                ReferenceDef::HasMany { name, .. } => name,
            };

            if model.field(name).is_some() || !names.insert(name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "reference name collides: {}.{name}",
                    self.name
                )));
            }

            references.push(def.resolve(model, models)?);
        }

        Ok(references)
    }
}

impl ReferenceDef {
    fn resolve(&self, model: &Model, models: &[Model]) -> Result<Reference> {
        match self {
            Self::BelongsTo {
                name,
                target,
                owning_field,
            } => {
                let target = lookup_model(models, target, &model.name, name)?;
                let owning = model.field(owning_field).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "reference {}.{name}: owning key {owning_field} is not a field",
                        model.name
                    ))
                })?;

                Ok(Reference::ToOne(ToOne {
                    name: name.clone(),
                    target: target.id,
                    owning_field: owning.id.index,
                    nullable: owning.nullable,
                }))
            }
            Self::HasMany {
                name,
                target,
                foreign_key,
            } => {
                let target = lookup_model(models, target, &model.name, name)?;
                let fk = target.field(foreign_key).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "reference {}.{name}: owning key {foreign_key} is not a field on {}",
                        model.name, target.name
                    ))
                })?;

                Ok(Reference::ToMany(ToMany {
                    name: name.clone(),
                    target: target.id,
                    foreign_key: fk.id.index,
                }))
            }
        }
    }
}

fn lookup_model<'a>(
    models: &'a [Model],
    target: &str,
    model: &str,
    reference: &str,
) -> Result<&'a Model> {
    models
        .iter()
        .find(|candidate| candidate.name == target)
        .ok_or_else(|| {
            Error::invalid_schema(format!(
                "reference {model}.{reference}: unknown target model {target}"
            ))
        })
}

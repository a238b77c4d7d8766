use super::{Field, Reference};

use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    pub id: ModelId,

    /// The model name, unique within the schema
    pub name: String,

    /// Storage table name
    pub table: String,

    /// Index of the primary-key field
    pub primary_key: usize,

    /// Ordered field descriptors
    pub fields: Vec<Field>,

    /// Declared associations
    pub references: Vec<Reference>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.column_name() == column)
    }

    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.references
            .iter()
            .find(|reference| reference.name() == name)
    }

    pub fn primary_key_field(&self) -> &Field {
        &self.fields[self.primary_key]
    }

    /// Storage columns of every field, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.column_name())
    }
}

impl ModelId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelId({})", self.0)
    }
}

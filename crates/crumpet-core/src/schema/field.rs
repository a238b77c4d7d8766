use super::{Converter, ModelId};
use crate::{
    stmt::{Type, Value},
    Result,
};

use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model. Assigned
    /// when the schema is built.
    pub id: FieldId,

    /// The field name
    pub name: String,

    /// Storage column override; `column_name()` falls back to the field name.
    pub column: Option<String>,

    /// The application-level value type
    pub ty: Type,

    /// True if the field can hold `Value::Null`
    pub nullable: bool,

    /// True if the field is the model's primary key
    pub primary_key: bool,

    /// How an unset field is populated on insert
    pub default: FieldDefault,

    /// Optional application <-> storage value transform
    pub converter: Option<Arc<dyn Converter>>,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
pub enum FieldDefault {
    /// No default; an unset nullable field inserts as null
    #[default]
    None,

    /// Computed by the application before the insert is sent
    App(AppDefault),

    /// Generated by the store; read back after insert
    Db,
}

#[derive(Clone)]
pub enum AppDefault {
    Value(Value),
    With(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            id: FieldId::placeholder(),
            name: name.into(),
            column: None,
            ty,
            nullable: false,
            primary_key: false,
            default: FieldDefault::None,
            converter: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// The store generates this field's value; it is excluded from inserts
    /// and read back afterwards.
    pub fn db_default(mut self) -> Self {
        self.default = FieldDefault::Db;
        self
    }

    pub fn app_default(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::App(AppDefault::Value(value.into()));
        self
    }

    pub fn app_default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = FieldDefault::App(AppDefault::With(Arc::new(f)));
        self
    }

    pub fn converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// The storage column key (explicit override or the field name).
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    pub fn is_db_default(&self) -> bool {
        matches!(self.default, FieldDefault::Db)
    }

    /// Application value -> storable value.
    pub fn to_store(&self, value: Value) -> Result<Value> {
        match &self.converter {
            Some(converter) => converter.to_store(value),
            None => Ok(value),
        }
    }

    /// Raw store value -> application value of the declared type.
    pub fn from_store(&self, value: Value) -> Result<Value> {
        let value = match &self.converter {
            Some(converter) => converter.from_store(value)?,
            None => value,
        };

        value.coerce(&self.ty)
    }
}

impl AppDefault {
    pub fn value(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::With(f) => f(),
        }
    }
}

impl FieldId {
    pub(crate) fn placeholder() -> Self {
        Self {
            model: ModelId::placeholder(),
            index: usize::MAX,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("column", &self.column)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .field("primary_key", &self.primary_key)
            .field("default", &self.default)
            .field("converter", &self.converter)
            .finish()
    }
}

impl fmt::Debug for AppDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::With(_) => f.write_str("With(..)"),
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({}/{})", self.model.0, self.index)
    }
}

use crumpet_core::{schema::Model, stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Per-field state: distinguishes "never fetched" from "fetched, possibly
/// null". A nilable field with no value is `Value(Value::Null)`; a field a
/// query never selected is `Unset`, and reading it is an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldSlot {
    #[default]
    Unset,
    Value(Value),
}

/// A record instance bound to its model descriptor.
///
/// Carries the live field slots, an immutable snapshot of the values as last
/// known to the store (taken at materialization time or right after a
/// successful write), and any nested records attached by a join. Setters
/// touch only the live slots; the repository alone refreshes the snapshot.
#[derive(Clone)]
pub struct Record {
    model: Arc<Model>,
    slots: Vec<FieldSlot>,
    snapshot: Vec<FieldSlot>,
    associations: IndexMap<String, Record>,
}

impl Record {
    pub fn new(model: Arc<Model>) -> Self {
        let slots = vec![FieldSlot::Unset; model.fields.len()];

        Self {
            snapshot: slots.clone(),
            slots,
            model,
            associations: IndexMap::new(),
        }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Read a field. Unset slots error rather than defaulting: a record
    /// loaded through a narrow projection must not masquerade as a fully
    /// loaded one.
    pub fn get(&self, field: &str) -> Result<&Value> {
        let index = self.index_of(field)?;

        match &self.slots[index] {
            FieldSlot::Value(value) => Ok(value),
            FieldSlot::Unset => Err(Error::unset_field(&self.model.name, field)),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(field)?;
        self.slots[index] = FieldSlot::Value(value.into());
        Ok(())
    }

    pub fn is_set(&self, field: &str) -> bool {
        match self.index_of(field) {
            Ok(index) => matches!(self.slots[index], FieldSlot::Value(_)),
            Err(_) => false,
        }
    }

    /// The primary-key value, if loaded.
    pub fn primary_key(&self) -> Result<&Value> {
        self.get(&self.model.primary_key_field().name)
    }

    /// A nested record attached by a join, keyed by reference name.
    pub fn association(&self, name: &str) -> Option<&Record> {
        self.associations.get(name)
    }

    /// Field indices whose live value differs from the store snapshot.
    pub fn dirty_fields(&self) -> Vec<usize> {
        self.slots
            .iter()
            .zip(self.snapshot.iter())
            .enumerate()
            .filter_map(|(index, (slot, snapshot))| match slot {
                FieldSlot::Unset => None,
                FieldSlot::Value(_) if slot != snapshot => Some(index),
                FieldSlot::Value(_) => None,
            })
            .collect()
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&Value> {
        match &self.slots[index] {
            FieldSlot::Value(value) => Some(value),
            FieldSlot::Unset => None,
        }
    }

    pub(crate) fn set_value(&mut self, index: usize, value: Value) {
        self.slots[index] = FieldSlot::Value(value);
    }

    pub(crate) fn attach_association(&mut self, name: impl Into<String>, record: Record) {
        self.associations.insert(name.into(), record);
    }

    /// Align the snapshot with the live slots after a successful round trip.
    pub(crate) fn refresh_snapshot(&mut self) {
        self.snapshot = self.slots.clone();
    }
}

impl From<&Record> for Value {
    fn from(record: &Record) -> Value {
        match record.value_at(record.model.primary_key) {
            Some(value) => value.clone(),
            None => panic!(
                "record used in a predicate has no primary key value; model={}",
                record.model.name
            ),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(&self.model.name);

        for (field, slot) in self.model.fields.iter().zip(self.slots.iter()) {
            match slot {
                FieldSlot::Value(value) => debug.field(&field.name, value),
                FieldSlot::Unset => debug.field(&field.name, &format_args!("<unset>")),
            };
        }

        debug.finish()
    }
}

impl Record {
    fn index_of(&self, field: &str) -> Result<usize> {
        match self.model.field(field) {
            Some(field) => Ok(field.id.index),
            None => Err(Error::unknown_field(&self.model.name, field)),
        }
    }
}

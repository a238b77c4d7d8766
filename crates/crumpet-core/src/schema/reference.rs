use super::ModelId;

/// A declared association between two models.
///
/// The two kinds differ structurally in where the storage key lives: the
/// owning side (to-one) holds the foreign key on its own table, while a
/// to-many reference is purely a reverse lookup keyed on the target's table.
#[derive(Debug, Clone)]
pub enum Reference {
    ToOne(ToOne),
    ToMany(ToMany),
}

#[derive(Debug, Clone)]
pub struct ToOne {
    pub name: String,
    pub target: ModelId,

    /// Index of the foreign-key field on the owning model
    pub owning_field: usize,

    /// Mirrors the owning field's nullability
    pub nullable: bool,
}

#[derive(Debug, Clone)]
pub struct ToMany {
    pub name: String,
    pub target: ModelId,

    /// Index of the foreign-key field on the target model
    pub foreign_key: usize,
}

impl Reference {
    pub fn name(&self) -> &str {
        match self {
            Self::ToOne(to_one) => &to_one.name,
            Self::ToMany(to_many) => &to_many.name,
        }
    }

    pub fn target(&self) -> ModelId {
        match self {
            Self::ToOne(to_one) => to_one.target,
            Self::ToMany(to_many) => to_many.target,
        }
    }

    pub fn is_to_one(&self) -> bool {
        matches!(self, Self::ToOne(_))
    }

    pub fn as_to_one(&self) -> Option<&ToOne> {
        match self {
            Self::ToOne(to_one) => Some(to_one),
            _ => None,
        }
    }

    pub fn as_to_many(&self) -> Option<&ToMany> {
        match self {
            Self::ToMany(to_many) => Some(to_many),
            _ => None,
        }
    }
}

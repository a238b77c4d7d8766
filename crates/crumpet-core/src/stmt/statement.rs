use super::{Delete, Insert, Query, Update};

#[derive(Debug, Clone)]
pub enum Statement {
    Select(Query),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// True when executing the statement produces a row set rather than an
    /// affected-row count.
    pub fn returns_rows(&self) -> bool {
        match self {
            Self::Select(_) => true,
            Self::Insert(insert) => insert.returning.is_some(),
            Self::Update(_) | Self::Delete(_) => false,
        }
    }
}

impl From<Query> for Statement {
    fn from(query: Query) -> Self {
        Self::Select(query)
    }
}

impl From<Insert> for Statement {
    fn from(insert: Insert) -> Self {
        Self::Insert(insert)
    }
}

impl From<Update> for Statement {
    fn from(update: Update) -> Self {
        Self::Update(update)
    }
}

impl From<Delete> for Statement {
    fn from(delete: Delete) -> Self {
        Self::Delete(delete)
    }
}

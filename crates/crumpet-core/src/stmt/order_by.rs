use super::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Resolved storage column (or verbatim expression)
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

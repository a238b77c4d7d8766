use super::Value;

/// One conjunct of a query predicate.
///
/// Columns are resolved storage names; the builder does field and association
/// resolution before a filter is created, so the serializer never needs the
/// schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = ?`
    Eq(String, Value),

    /// `column IN (?, ...)`
    In(String, Vec<Value>),

    /// Verbatim SQL fragment with its positional params.
    Raw(String, Vec<Value>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    pub fn in_list(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In(column.into(), values)
    }
}

use super::Value;

/// A multi-row insert statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,

    /// Storage columns, one per value position
    pub columns: Vec<String>,

    /// One entry per inserted record; every entry has `columns.len()` values
    pub rows: Vec<Vec<Value>>,

    /// Store-generated columns to read back (`RETURNING` clause)
    pub returning: Option<Vec<String>>,
}

use crate::stmt::Value;

/// One compiled statement, ready for the driver.
///
/// Every user-supplied value arrives in `params`; the SQL text never embeds
/// literals.
#[derive(Debug)]
pub struct Operation {
    /// Parameterized SQL text
    pub sql: String,

    /// Positional bound parameters
    pub params: Vec<Value>,

    /// True when the statement produces a row set (SELECT, or INSERT with a
    /// RETURNING clause); false for count-only execution.
    pub rows: bool,
}

impl Operation {
    /// A statement expected to produce rows.
    pub fn query(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            rows: true,
        }
    }

    /// A statement expected to produce an affected-row count.
    pub fn execute(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            rows: false,
        }
    }
}

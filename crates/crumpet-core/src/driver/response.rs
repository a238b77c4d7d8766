use crate::stmt::RowStream;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a stream of rows
    Values(RowStream),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn rows(rows: impl Into<RowStream>) -> Self {
        Self {
            rows: Rows::Values(rows.into()),
        }
    }

    pub fn empty_rows() -> Self {
        Self {
            rows: Rows::Values(RowStream::default()),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> crate::Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            Self::Values(_) => Err(crate::err!("expected a row count, driver returned rows")),
        }
    }

    pub fn into_values(self) -> crate::Result<RowStream> {
        match self {
            Self::Values(rows) => Ok(rows),
            Self::Count(count) => Err(crate::err!(
                "expected rows, driver returned a count ({count})"
            )),
        }
    }
}

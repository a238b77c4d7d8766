mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use crumpet_core::{
    async_trait,
    driver::{Driver, Operation, Response},
    stmt::{Row, RowStream},
    Error, Result,
};
use url::Url;

/// SQLite driver backed by a single `rusqlite` connection.
///
/// The connection sits behind a mutex; callers serialize on it, which is the
/// concurrency discipline this driver offers. SQLite executes one statement
/// at a time anyway.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<RusqliteConnection>,
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL
    /// (`sqlite::memory:` or `sqlite:/path/to/db`).
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::in_memory())
        } else {
            Self::open(url.path())
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        let connection = RusqliteConnection::open_in_memory().unwrap();

        Self {
            connection: Mutex::new(connection),
        }
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

#[async_trait]
impl Driver for Sqlite {
    async fn exec(&self, op: Operation) -> Result<Response> {
        let connection = self.connection.lock().unwrap();

        let mut stmt = connection
            .prepare_cached(&op.sql)
            .map_err(Error::driver_operation_failed)?;

        let params = op.params.into_iter().map(Value::from).collect::<Vec<_>>();

        if !op.rows {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver_operation_failed)?;

            return Ok(Response::count(count as u64));
        }

        let columns: Arc<Vec<String>> = Arc::new(
            stmt.column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
        let width = columns.len();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut values = Vec::with_capacity(width);

                    for index in 0..width {
                        values.push(Value::from_sql(row, index)?.into_inner());
                    }

                    ret.push(Row::new(columns.clone(), values));
                }
                Ok(None) => break,
                Err(err) => {
                    return Err(Error::driver_operation_failed(err));
                }
            }
        }

        Ok(Response::rows(RowStream::from_vec(ret)))
    }
}

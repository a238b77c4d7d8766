mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

use crate::async_trait;

use std::fmt::Debug;

/// The external store collaborator.
///
/// A driver executes one parameterized statement per call and hands back
/// either a row set or an affected-row count. It owns all connection state
/// and concurrency discipline; the core holds none.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute a database operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}

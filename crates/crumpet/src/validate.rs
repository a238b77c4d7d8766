use crate::Record;

use crumpet_core::Result;

/// The validation rule collaborator.
///
/// Invoked by the repository before a record write leaves the process; an
/// error aborts the operation before the store is contacted. Rule content is
/// entirely the collaborator's business — only the throwing contract is used
/// here.
pub trait Validator: Send + Sync + 'static {
    fn validate(&self, record: &Record) -> Result<()>;
}

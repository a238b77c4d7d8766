use crate::{stmt::Value, Result};

/// Bidirectional transform between an application-level value and its
/// storable representation (e.g. enum <-> integer).
///
/// Implementations must be stateless and pure; failures surface as
/// conversion errors, never silent defaults.
pub trait Converter: std::fmt::Debug + Send + Sync + 'static {
    /// Application value -> storable value, applied on write.
    fn to_store(&self, value: Value) -> Result<Value>;

    /// Raw store value -> application value, applied on read.
    fn from_store(&self, value: Value) -> Result<Value>;
}

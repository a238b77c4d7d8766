use std::sync::Arc;

/// Return early with an [`Error`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Create an [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Crumpet.
///
/// Driver failures are wrapped but never reinterpreted; everything else is a
/// violation of one of this crate's own contracts.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorKind>,
}

#[derive(Debug)]
enum ErrorKind {
    /// Bridge for ad-hoc errors created with `bail!` / `err!`.
    Anyhow(anyhow::Error),

    /// Opaque failure surfaced by the driver, passed through verbatim.
    Driver(Box<dyn std::error::Error + Send + Sync>),

    /// The validation collaborator rejected a record before a write.
    Validation(String),

    /// A query that required exactly one row returned zero rows.
    NoResults(String),

    /// A query that required exactly one row returned more than one.
    TooManyRecords(String),

    /// Read access to a field slot that was never selected or materialized.
    UnsetField { model: String, field: String },

    /// A name that does not exist on the model.
    UnknownField { model: String, field: String },

    /// A converter or value accessor could not transform a value.
    TypeConversion { value: String, target: String },

    /// The statement cannot be compiled (e.g. an UPDATE with no assignments).
    InvalidStatement(String),

    /// Startup-time schema configuration error.
    InvalidSchema(String),

    /// A driver connection URL that could not be parsed.
    InvalidConnectionUrl(String),
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            inner: Arc::new(kind),
        }
    }

    #[doc(hidden)]
    pub fn from_args(args: std::fmt::Arguments<'_>) -> Self {
        Self::new(ErrorKind::Anyhow(anyhow::Error::msg(args.to_string())))
    }

    pub fn driver_operation_failed(
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::new(ErrorKind::Driver(err.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation(msg.into()))
    }

    pub fn no_results(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoResults(msg.into()))
    }

    pub fn too_many_records(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooManyRecords(msg.into()))
    }

    pub fn unset_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsetField {
            model: model.into(),
            field: field.into(),
        })
    }

    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField {
            model: model.into(),
            field: field.into(),
        })
    }

    pub fn type_conversion(value: &crate::stmt::Value, target: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeConversion {
            value: value.ty_name().to_string(),
            target: target.into(),
        })
    }

    pub fn invalid_statement(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidStatement(msg.into()))
    }

    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSchema(msg.into()))
    }

    pub fn invalid_connection_url(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConnectionUrl(msg.into()))
    }

    pub fn is_driver(&self) -> bool {
        matches!(&*self.inner, ErrorKind::Driver(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(&*self.inner, ErrorKind::Validation(_))
    }

    pub fn is_no_results(&self) -> bool {
        matches!(&*self.inner, ErrorKind::NoResults(_))
    }

    pub fn is_too_many_records(&self) -> bool {
        matches!(&*self.inner, ErrorKind::TooManyRecords(_))
    }

    pub fn is_unset_field(&self) -> bool {
        matches!(&*self.inner, ErrorKind::UnsetField { .. })
    }

    pub fn is_unknown_field(&self) -> bool {
        matches!(&*self.inner, ErrorKind::UnknownField { .. })
    }

    pub fn is_type_conversion(&self) -> bool {
        matches!(&*self.inner, ErrorKind::TypeConversion { .. })
    }

    pub fn is_invalid_statement(&self) -> bool {
        matches!(&*self.inner, ErrorKind::InvalidStatement(_))
    }

    pub fn is_invalid_schema(&self) -> bool {
        matches!(&*self.inner, ErrorKind::InvalidSchema(_))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.inner {
            ErrorKind::Driver(err) => Some(err.as_ref()),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use ErrorKind::*;

        match &*self.inner {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            Validation(msg) => write!(f, "validation failed: {msg}"),
            NoResults(msg) => write!(f, "no results: {msg}"),
            TooManyRecords(msg) => write!(f, "too many records: {msg}"),
            UnsetField { model, field } => write!(f, "unset field: {model}.{field}"),
            UnknownField { model, field } => write!(f, "unknown field: {model}.{field}"),
            TypeConversion { value, target } => write!(f, "cannot convert {value} to {target}"),
            InvalidStatement(msg) => write!(f, "invalid statement: {msg}"),
            InvalidSchema(msg) => write!(f, "invalid schema: {msg}"),
            InvalidConnectionUrl(msg) => write!(f, "invalid connection URL: {msg}"),
        }
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            f.debug_struct("Error").field("kind", &self.inner).finish()
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::new(ErrorKind::Anyhow(err))
    }
}

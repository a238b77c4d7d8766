mod cursor;
pub use cursor::Cursor;

pub mod materialize;

mod record;
pub use record::{FieldSlot, Record};

mod repository;
pub use repository::Repository;

mod validate;
pub use validate::Validator;

pub use crumpet_core::{driver, schema, stmt, Error, Result, Schema};
pub use crumpet_sql::Serializer;

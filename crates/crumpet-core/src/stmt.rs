mod assignments;
pub use assignments::{Assignment, Assignments};

mod delete;
pub use delete::Delete;

mod direction;
pub use direction::Direction;

mod filter;
pub use filter::Filter;

mod insert;
pub use insert::Insert;

mod join;
pub use join::Join;

mod order_by;
pub use order_by::OrderBy;

mod query;
pub use query::Query;

mod row;
pub use row::Row;

mod row_stream;
pub use row_stream::RowStream;

mod statement;
pub use statement::Statement;

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

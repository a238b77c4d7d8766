#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod expr;
mod stmt;
mod value;

use crumpet_core::stmt::Statement;

/// Serialize a statement to a SQL string.
///
/// Pure translation: the statement tree already carries resolved table and
/// column names, so serialization needs no schema access. Every user value
/// is pushed through [`Params`] and rendered as a placeholder.
#[derive(Debug)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects
    /// (placeholder syntax, identifier quoting).
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Base table for qualifying plain column references; set while
    /// serializing a select that carries joins.
    qualify: Option<String>,
}

impl Serializer {
    pub fn sqlite() -> Self {
        Self {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Self {
        Self {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Self {
        Self {
            flavor: Flavor::Mysql,
        }
    }

    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            qualify: None,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }
}

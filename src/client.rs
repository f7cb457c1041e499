// ABOUTME: The single database capability the dump engine depends on
// ABOUTME: Execute one statement and get rows back, plus connection identity

use crate::error::DatabaseError;
use std::future::Future;

pub use mysql_async::Value;

/// One result row, column values in select order.
pub type Row = Vec<Value>;

/// Where a client is connected. Written into the dump header and handed to hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub host: String,
    pub database: String,
}

/// A connection able to run raw SQL text.
///
/// Calls take `&mut self`: a connection serves one logical operation at a
/// time and statements from two runs must never interleave on it.
pub trait Client {
    /// Execute `sql` and return every row it produced (empty for DML/DDL).
    fn raw_query(&mut self, sql: &str) -> impl Future<Output = Result<Vec<Row>, DatabaseError>>;

    fn server_info(&self) -> ServerInfo;
}

/// First column of the first row, as text.
pub(crate) fn first_value_as_string(rows: &[Row]) -> Option<String> {
    rows.first()
        .and_then(|row| row.first())
        .and_then(crate::mysql::converter::value_as_text)
}

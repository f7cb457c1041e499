// ABOUTME: Typed errors for dump, restore and maintenance operations
// ABOUTME: Separates unreadable input, statement failures and aborted imports

use crate::dump::ImportResult;
use std::path::PathBuf;
use thiserror::Error;

/// A statement failed on the server (or the connection carrying it failed).
///
/// Only the human-readable message is kept. It is what ends up in
/// [`ImportResult::error_msg`] when the failure happens during an import.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DatabaseError {
    pub message: String,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<mysql_async::Error> for DatabaseError {
    fn from(err: mysql_async::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Error type for export, import and maintenance runs.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The import input does not exist, is not a regular file, or cannot be opened.
    /// Raised before any statement is read.
    #[error("not a valid resource: {}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A query outside the import loop failed (table listing, version lookup,
    /// table export, maintenance statement).
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A statement kept failing past the retry budget with continue-on-error
    /// disabled. `partial` holds the counters accumulated up to that point.
    #[error("import aborted on statement `{sql}`: {source}")]
    ImportAborted {
        sql: String,
        #[source]
        source: DatabaseError,
        partial: Box<ImportResult>,
    },

    /// Reading the script or writing the dump failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DumpError {
    /// Counters gathered before an aborted import, if this is one.
    pub fn partial_result(&self) -> Option<&ImportResult> {
        match self {
            DumpError::ImportAborted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_displays_message_only() {
        let err = DatabaseError::new("Table 't' already exists");
        assert_eq!(err.to_string(), "Table 't' already exists");
    }

    #[test]
    fn test_partial_result_only_for_aborted_imports() {
        let partial = ImportResult {
            success_num: 2,
            error_num: 1,
            ..Default::default()
        };
        let aborted = DumpError::ImportAborted {
            sql: "INSERT INTO t VALUES (1);".to_string(),
            source: DatabaseError::new("Duplicate entry '1'"),
            partial: Box::new(partial.clone()),
        };
        assert_eq!(aborted.partial_result(), Some(&partial));
        assert!(aborted.to_string().contains("Duplicate entry '1'"));

        let db = DumpError::from(DatabaseError::new("gone away"));
        assert!(db.partial_result().is_none());
    }
}

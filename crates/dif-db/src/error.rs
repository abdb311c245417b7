//! Cache error types.

use dif_common::DifError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown column '{column}' in table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Cache lock poisoned")]
    Lock,
}

impl From<DbError> for DifError {
    fn from(err: DbError) -> Self {
        DifError::Cache(err.to_string())
    }
}

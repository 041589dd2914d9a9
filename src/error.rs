use rusqlite::{Error as SqlError, ErrorCode};
use thiserror::Error;

/// Failure kinds surfaced by the song library. The HTTP layer maps each
/// variant to its own status code.
#[derive(Debug, Error)]
pub enum SongError {
    /// Client input rejected before touching storage.
    #[error("{0}")]
    Invalid(String),

    #[error("song {0} not found")]
    NotFound(i64),

    /// A storage constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage or an upstream collaborator could not serve the request right now.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(#[source] SqlError),
}

impl SongError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Classify a rusqlite error. `id` is the record the statement targeted,
    /// when there was one, so an empty result can name it.
    pub fn from_sql(err: SqlError, id: Option<i64>) -> Self {
        if let (SqlError::QueryReturnedNoRows, Some(id)) = (&err, id) {
            return Self::NotFound(id);
        }
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::Conflict(err.to_string()),
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure,
            ) => Self::Unavailable(err.to_string()),
            _ => Self::Storage(err),
        }
    }
}

impl From<SqlError> for SongError {
    fn from(err: SqlError) -> Self {
        Self::from_sql(err, None)
    }
}

pub type Result<T, E = SongError> = std::result::Result<T, E>;

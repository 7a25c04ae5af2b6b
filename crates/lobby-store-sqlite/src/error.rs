//! Error type for `lobby-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lobby_core::Error),

  /// The database is locked or busy — the whole operation is safe to retry.
  #[error("database busy: {0}")]
  Busy(String),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored discriminant no Rust variant matches — a corrupt row or a
  /// schema drift, never produced by this crate's own writes.
  #[error("corrupt row: {0}")]
  Decode(String),
}

/// Surface lock contention as the retryable [`Error::Busy`] variant rather
/// than a generic database failure.
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      _,
    )) = &e
    {
      if matches!(
        failure.code,
        rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
      ) {
        return Error::Busy(e.to_string());
      }
    }
    Error::Database(e)
  }
}

impl lobby_core::error::StoreError for Error {
  fn as_core(&self) -> Option<&lobby_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }

  fn is_retryable(&self) -> bool {
    matches!(self, Error::Busy(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

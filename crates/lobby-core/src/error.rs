//! Error types for `lobby-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::visit::VisitStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// Missing or malformed input, rejected before any store access.
  #[error("validation failed: {0}")]
  Validation(String),

  /// No active employee matches the presented external code.
  #[error("no active employee with code {0:?}")]
  EmployeeNotFound(String),

  #[error("employee not found: {0}")]
  UnknownEmployee(Uuid),

  #[error("visit not found: {0}")]
  VisitNotFound(Uuid),

  #[error("department not found: {0}")]
  DepartmentNotFound(Uuid),

  /// The presented token does not match the visit's stored token.
  #[error("presented token does not match the visit")]
  InvalidToken,

  #[error("invalid transition: {from:?} -> {to:?}")]
  InvalidTransition { from: VisitStatus, to: VisitStatus },

  /// Unique-constraint violation (token collision, duplicate employee code
  /// or staff username).
  #[error("conflict: {0}")]
  Conflict(String),

  /// A department still owns employees and cannot be deleted.
  #[error("department {0} still has employees")]
  DepartmentNotEmpty(Uuid),

  /// An employee with visit history can only be deactivated, never deleted.
  #[error("employee {0} is referenced by visit history")]
  EmployeeHasVisits(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by store-backend error types so the presentation layer can map
/// domain failures to status codes without knowing the concrete backend.
pub trait StoreError: std::error::Error {
  /// The wrapped domain error, if this failure carries one.
  fn as_core(&self) -> Option<&Error>;

  /// Whether the whole operation is safe to retry (lock timeout, transient
  /// connection loss). Schema or configuration failures are not.
  fn is_retryable(&self) -> bool {
    false
  }
}

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lobby_core::error::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("authentication required")]
  Unauthorized,

  #[error("admin role required")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The store reported a transient failure; the client may retry.
  #[error("temporarily unavailable: {0}")]
  Unavailable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a storage-backend failure onto the HTTP taxonomy using the domain
  /// error it carries, if any.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StoreError + Send + Sync + 'static,
  {
    use lobby_core::Error as Core;

    match e.as_core() {
      Some(Core::Validation(m)) => ApiError::BadRequest(m.clone()),
      Some(
        core @ (Core::EmployeeNotFound(_)
        | Core::UnknownEmployee(_)
        | Core::VisitNotFound(_)
        | Core::DepartmentNotFound(_)),
      ) => ApiError::NotFound(core.to_string()),
      Some(
        core @ (Core::InvalidToken
        | Core::InvalidTransition { .. }
        | Core::Conflict(_)
        | Core::DepartmentNotEmpty(_)
        | Core::EmployeeHasVisits(_)),
      ) => ApiError::Conflict(core.to_string()),
      None if e.is_retryable() => ApiError::Unavailable(e.to_string()),
      None => ApiError::Store(Box::new(e)),
    }
  }

  fn code(&self) -> &'static str {
    match self {
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Unauthorized => "unauthorized",
      ApiError::Forbidden => "forbidden",
      ApiError::NotFound(_) => "not_found",
      ApiError::Conflict(_) => "conflict",
      ApiError::Unavailable(_) => "unavailable",
      ApiError::Store(_) => "internal",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %self, "store failure in API handler");
    }
    let body = json!({ "error": self.to_string(), "code": self.code() });
    (status, Json(body)).into_response()
  }
}

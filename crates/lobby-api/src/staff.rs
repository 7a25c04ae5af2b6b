//! Staff login and the session extractors guarding staff-only routes.

use argon2::{Argon2, PasswordHash, PasswordVerifier as _};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::request::Parts,
};
use lobby_core::{staff::StaffRole, store::VisitStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::SessionClaims};

// ─── Extractors ──────────────────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a valid staff
/// session token (`Authorization: Bearer <token>`).
pub struct AuthedStaff(pub SessionClaims);

impl AuthedStaff {
  /// The staff id to record on a check-in, when the caller is a
  /// receptionist. Admin actions are not attributed to a desk.
  pub fn receptionist_id(&self) -> Option<Uuid> {
    match self.0.role {
      StaffRole::Receptionist => Some(self.0.staff_id),
      StaffRole::Admin => None,
    }
  }
}

/// Like [`AuthedStaff`], but rejects non-admin sessions with 403.
pub struct AuthedAdmin(pub SessionClaims);

fn claims_from_parts<S>(
  parts: &Parts,
  state: &AppState<S>,
) -> Result<SessionClaims, ApiError> {
  let header = parts
    .headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;
  let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;
  state.sessions.verify(token).ok_or(ApiError::Unauthorized)
}

impl<S> FromRequestParts<AppState<S>> for AuthedStaff
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    claims_from_parts(parts, state).map(AuthedStaff)
  }
}

impl<S> FromRequestParts<AppState<S>> for AuthedAdmin
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let claims = claims_from_parts(parts, state)?;
    if claims.role != StaffRole::Admin {
      return Err(ApiError::Forbidden);
    }
    Ok(AuthedAdmin(claims))
  }
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginStaff {
  pub staff_id:  Uuid,
  pub username:  String,
  pub full_name: String,
  pub role:      StaffRole,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token: String,
  pub staff: LoginStaff,
}

/// `POST /auth/login` — body: `{"username":"…","password":"…"}`
///
/// An unknown username and a wrong password produce the same 401, so the
/// endpoint does not reveal which usernames exist.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: VisitStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let staff = state
    .store
    .find_staff_by_username(body.username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&staff.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  let token = state.sessions.issue(staff.staff_id, staff.role);
  Ok(Json(LoginResponse {
    token,
    staff: LoginStaff {
      staff_id:  staff.staff_id,
      username:  staff.username,
      full_name: staff.full_name,
      role:      staff.role,
    },
  }))
}

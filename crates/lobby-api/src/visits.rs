//! Handlers for `/visits` endpoints — the lifecycle surface.
//!
//! | Method | Path | Auth | Notes |
//! |--------|------|------|-------|
//! | `POST` | `/visits/register` | public | kiosk self-registration |
//! | `POST` | `/visits/verify` | public | read-only token check |
//! | `POST` | `/visits/:id/check-in` | staff | token re-checked server-side |
//! | `POST` | `/visits/:id/check-out` | staff | |
//! | `GET`  | `/visits/today` | staff | |
//! | `GET`  | `/visits/search` | staff | see [`VisitQuery`] |
//! | `GET`  | `/visits/:id` | staff | 404 if not found |
//! | `GET`  | `/visitors/history` | staff | all visitor rows, newest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use lobby_core::{
  error::StoreError,
  store::{VisitQuery, VisitStore},
  visit::VisitDetail,
  visitor::{NewRegistration, Registration, Visitor},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, staff::AuthedStaff};

// ─── Register ────────────────────────────────────────────────────────────────

/// `POST /visits/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(input): Json<NewRegistration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let registration: Registration = state
    .store
    .register_visit(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(registration)))
}

// ─── Verify ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  pub visit_id: Uuid,
  pub token:    String,
}

/// `POST /visits/verify` — the verification gate.
///
/// Responds 404 on any mismatch without revealing whether the id or the
/// token was wrong. Never changes visit state.
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<VerifyBody>,
) -> Result<Json<VisitDetail>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let detail = state
    .store
    .verify_token(body.visit_id, body.token)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound("invalid token or visit not found".into())
    })?;
  Ok(Json(detail))
}

// ─── Transitions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckInBody {
  pub token: String,
}

/// `POST /visits/:id/check-in` — body: `{"token":"123456"}`
pub async fn check_in<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  staff: AuthedStaff,
  Json(body): Json<CheckInBody>,
) -> Result<Json<VisitDetail>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let detail = state
    .store
    .check_in(id, body.token, staff.receptionist_id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(detail))
}

/// `POST /visits/:id/check-out`
pub async fn check_out<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _staff: AuthedStaff,
) -> Result<Json<VisitDetail>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let detail = state
    .store
    .check_out(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(detail))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /visits/today`
pub async fn today<S>(
  State(state): State<AppState<S>>,
  _staff: AuthedStaff,
) -> Result<Json<Vec<VisitDetail>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let visits = state
    .store
    .visits_on(Utc::now().date_naive())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(visits))
}

/// `GET /visits/search?name=&phone=&date=&department_id=&employee_code=&status=&id_proof_number=`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  _staff: AuthedStaff,
  Query(query): Query<VisitQuery>,
) -> Result<Json<Vec<VisitDetail>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let visits = state
    .store
    .search_visits(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(visits))
}

/// `GET /visitors/history` — every visitor ever registered, for the desk's
/// history view.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  _staff: AuthedStaff,
) -> Result<Json<Vec<Visitor>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let visitors = state
    .store
    .visitor_history()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(visitors))
}

/// `GET /visits/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _staff: AuthedStaff,
) -> Result<Json<VisitDetail>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let detail = state
    .store
    .get_visit(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("visit {id} not found")))?;
  Ok(Json(detail))
}

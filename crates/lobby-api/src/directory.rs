//! Handlers for `/departments` and `/employees`.
//!
//! Listings are public so the registration kiosk can populate its pickers;
//! all mutation requires the admin role.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use lobby_core::{
  directory::{Department, Employee, NewDepartment, NewEmployee},
  error::StoreError,
  store::VisitStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, staff::AuthedAdmin};

// ─── Departments ─────────────────────────────────────────────────────────────

/// `GET /departments`
pub async fn list_departments<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Department>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let departments = state
    .store
    .list_departments()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(departments))
}

/// `POST /departments`
pub async fn create_department<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
  Json(input): Json<NewDepartment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let department = state
    .store
    .add_department(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(department)))
}

/// `GET /departments/:id`
pub async fn get_department<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Department>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let department = state
    .store
    .get_department(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("department {id} not found")))?;
  Ok(Json(department))
}

/// `DELETE /departments/:id` — 409 while the department still has employees.
pub async fn delete_department<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _admin: AuthedAdmin,
) -> Result<StatusCode, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  state
    .store
    .delete_department(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Employees ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListEmployeesParams {
  pub department_id: Option<Uuid>,
}

/// `GET /employees[?department_id=<uuid>]`
pub async fn list_employees<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListEmployeesParams>,
) -> Result<Json<Vec<Employee>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let employees = state
    .store
    .list_employees(params.department_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(employees))
}

/// `POST /employees`
pub async fn create_employee<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
  Json(input): Json<NewEmployee>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let employee = state
    .store
    .add_employee(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(employee)))
}

/// `POST /employees/:id/deactivate` — the soft delete.
pub async fn deactivate_employee<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _admin: AuthedAdmin,
) -> Result<StatusCode, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  state
    .store
    .deactivate_employee(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /employees/:id` — 409 once the employee has visit history.
pub async fn delete_employee<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _admin: AuthedAdmin,
) -> Result<StatusCode, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  state
    .store
    .delete_employee(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

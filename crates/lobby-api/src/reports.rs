//! Handlers for `/reports` — the admin dashboard's read-only queries.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use lobby_core::{
  error::StoreError,
  report::{
    DailyReport, DepartmentShare, MonthlyReportRow, Statistics, TopVisitor,
    VisitorSummary,
  },
  store::{VisitStore, VisitorSummaryQuery},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, staff::AuthedAdmin};

#[derive(Debug, Deserialize)]
pub struct DailyParams {
  pub date: NaiveDate,
}

/// `GET /reports/daily?date=2026-08-30`
pub async fn daily<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
  Query(params): Query<DailyParams>,
) -> Result<Json<DailyReport>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let report = state
    .store
    .daily_report(params.date)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
  pub year:  i32,
  pub month: u32,
}

/// `GET /reports/monthly?year=2026&month=8`
pub async fn monthly<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
  Query(params): Query<MonthlyParams>,
) -> Result<Json<Vec<MonthlyReportRow>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let report = state
    .store
    .monthly_report(params.year, params.month)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(report))
}

/// `GET /reports/statistics`
pub async fn statistics<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
) -> Result<Json<Statistics>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let stats = state
    .store
    .statistics()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

/// `GET /reports/department-shares`
pub async fn department_shares<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
) -> Result<Json<Vec<DepartmentShare>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let shares = state
    .store
    .department_shares()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(shares))
}

#[derive(Debug, Deserialize)]
pub struct TopVisitorsParams {
  pub limit: Option<u32>,
}

/// `GET /reports/top-visitors?limit=5` — repeat visitors by visit count.
pub async fn top_visitors<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
  Query(params): Query<TopVisitorsParams>,
) -> Result<Json<Vec<TopVisitor>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let visitors = state
    .store
    .top_visitors(params.limit.unwrap_or(5))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(visitors))
}

/// `GET /reports/visitor-summaries?name=&email=` — per-person visit
/// aggregates with the departments they have visited.
pub async fn visitor_summaries<S>(
  State(state): State<AppState<S>>,
  _admin: AuthedAdmin,
  Query(query): Query<VisitorSummaryQuery>,
) -> Result<Json<Vec<VisitorSummary>>, ApiError>
where
  S: VisitStore,
  S::Error: StoreError + Send + Sync + 'static,
{
  let summaries = state
    .store
    .visitor_summaries(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(summaries))
}

//! The `VisitStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `lobby-store-sqlite`).
//! Higher layers (`lobby-api`, `lobby-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  directory::{Department, Employee, NewDepartment, NewEmployee},
  report::{
    DailyReport, DepartmentShare, MonthlyReportRow, Statistics, TopVisitor,
    VisitorSummary,
  },
  staff::{NewStaff, Staff},
  visit::{VisitDetail, VisitStatus},
  visitor::{NewRegistration, Registration, Visitor},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`VisitStore::search_visits`]. All filters are optional
/// and combine with AND; results come back newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitQuery {
  /// Substring match on the visitor's name.
  pub name:            Option<String>,
  /// Substring match on the visitor's phone.
  pub phone:           Option<String>,
  /// Restrict to visits created on this calendar date (UTC).
  pub date:            Option<NaiveDate>,
  pub department_id:   Option<Uuid>,
  /// Exact match on the employee's external code.
  pub employee_code:   Option<String>,
  pub status:          Option<VisitStatus>,
  /// Exact match on the visitor's identity-proof number.
  pub id_proof_number: Option<String>,
  pub limit:           Option<usize>,
  pub offset:          Option<usize>,
}

/// Parameters for [`VisitStore::visitor_summaries`]. Both filters are
/// optional substring matches combining with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitorSummaryQuery {
  pub name:  Option<String>,
  pub email: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Lobby storage backend.
///
/// Every lifecycle transition (`register_visit`, `check_in`, `check_out`)
/// runs as one atomic unit of work: the backend opens a transaction, reads
/// and validates the target row under a write lock, applies the change, and
/// commits — or rolls the whole transaction back on any failure.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait VisitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Visit lifecycle ───────────────────────────────────────────────────

  /// Create a visitor and a `Pending` visit against the active employee
  /// with the given external code, minting a fresh verification token.
  ///
  /// Fails with `EmployeeNotFound` (leaving no rows behind) if no active
  /// employee matches, and with `Conflict` if the bounded token-collision
  /// retry is exhausted.
  fn register_visit(
    &self,
    input: NewRegistration,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + '_;

  /// The verification gate: re-resolve the visit by **both** id and token.
  ///
  /// Returns `None` if either does not match — the caller cannot tell a
  /// wrong id from a wrong token. Purely a read; no effect on status.
  fn verify_token(
    &self,
    visit_id: Uuid,
    token: String,
  ) -> impl Future<Output = Result<Option<VisitDetail>, Self::Error>> + Send + '_;

  /// Transition `Pending -> CheckedIn`, re-checking the presented token
  /// against the stored value at the moment of the call.
  ///
  /// Sets `checkin_time` and records the acting receptionist, if any.
  /// Fails with `VisitNotFound`, `InvalidToken`, or `InvalidTransition`.
  fn check_in(
    &self,
    visit_id: Uuid,
    token: String,
    receptionist_id: Option<Uuid>,
  ) -> impl Future<Output = Result<VisitDetail, Self::Error>> + Send + '_;

  /// Transition `CheckedIn -> CheckedOut`, setting `checkout_time`.
  fn check_out(
    &self,
    visit_id: Uuid,
  ) -> impl Future<Output = Result<VisitDetail, Self::Error>> + Send + '_;

  // ── Visit reads ───────────────────────────────────────────────────────

  fn get_visit(
    &self,
    visit_id: Uuid,
  ) -> impl Future<Output = Result<Option<VisitDetail>, Self::Error>> + Send + '_;

  /// All visits created on `date` (UTC), newest first.
  fn visits_on(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<VisitDetail>, Self::Error>> + Send + '_;

  fn search_visits<'a>(
    &'a self,
    query: &'a VisitQuery,
  ) -> impl Future<Output = Result<Vec<VisitDetail>, Self::Error>> + Send + 'a;

  // ── Directory ─────────────────────────────────────────────────────────

  fn add_department(
    &self,
    input: NewDepartment,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  fn get_department(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Department>, Self::Error>> + Send + '_;

  /// Delete a department. Fails with `DepartmentNotEmpty` while any
  /// employee still belongs to it.
  fn delete_department(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_employee(
    &self,
    input: NewEmployee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  fn list_employees(
    &self,
    department_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  fn find_active_employee_by_code(
    &self,
    code: String,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  /// Soft delete: flip the `active` flag so no new visits can target the
  /// employee. Visit history is untouched.
  fn deactivate_employee(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Hard delete, permitted only when no visit references the employee.
  /// Fails with `EmployeeHasVisits` otherwise.
  fn delete_employee(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Staff ─────────────────────────────────────────────────────────────

  fn add_staff(
    &self,
    input: NewStaff,
  ) -> impl Future<Output = Result<Staff, Self::Error>> + Send + '_;

  fn find_staff_by_username(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  fn daily_report(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<DailyReport, Self::Error>> + Send + '_;

  /// One row per day of the given month that saw at least one visit.
  fn monthly_report(
    &self,
    year: i32,
    month: u32,
  ) -> impl Future<Output = Result<Vec<MonthlyReportRow>, Self::Error>> + Send + '_;

  fn statistics(
    &self,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;

  fn department_shares(
    &self,
  ) -> impl Future<Output = Result<Vec<DepartmentShare>, Self::Error>> + Send + '_;

  /// The most frequent visitors by person identity, ranked by visit count.
  fn top_visitors(
    &self,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<TopVisitor>, Self::Error>> + Send + '_;

  /// Per-person aggregates (visit counts, first/last visit, departments
  /// visited) over visits that progressed past `Pending`.
  fn visitor_summaries<'a>(
    &'a self,
    query: &'a VisitorSummaryQuery,
  ) -> impl Future<Output = Result<Vec<VisitorSummary>, Self::Error>> + Send + 'a;

  /// Every visitor row ever registered, newest first.
  fn visitor_history(
    &self,
  ) -> impl Future<Output = Result<Vec<Visitor>, Self::Error>> + Send + '_;
}

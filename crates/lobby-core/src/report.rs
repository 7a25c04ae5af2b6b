//! Read-only report rows for the admin dashboard.
//!
//! Reports run outside any lifecycle transaction and read committed data
//! only; they never affect lifecycle state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Check-in/check-out counts for the visits created on a single day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
  pub date:         NaiveDate,
  pub total_visits: i64,
  pub checkins:     i64,
  pub checkouts:    i64,
}

/// One per-day row of a monthly report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReportRow {
  pub date:         NaiveDate,
  pub total_visits: i64,
  pub checkins:     i64,
  pub checkouts:    i64,
}

/// All-time visit totals broken down by current status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTotals {
  pub total:       i64,
  pub pending:     i64,
  pub checked_in:  i64,
  pub checked_out: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCount {
  pub department:  String,
  pub visit_count: i64,
}

/// The dashboard statistics block: status totals plus per-department counts
/// of check-ins over the last 30 days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
  pub totals:        StatusTotals,
  pub by_department: Vec<DepartmentCount>,
}

/// A department's share of all visits ever recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentShare {
  pub department:    String,
  pub visit_count:   i64,
  pub share_percent: f64,
}

/// A repeat visitor ranked by total visit count.
///
/// Each registration records a fresh visitor row, so the ranking groups by
/// the person's (name, email, phone) identity rather than by row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopVisitor {
  pub name:        String,
  pub email:       Option<String>,
  pub phone:       String,
  pub visit_count: i64,
  /// Most recent check-in; `None` if the visitor never got past the gate.
  pub last_visit:  Option<DateTime<Utc>>,
}

/// Per-person aggregate over visits that progressed past `Pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorSummary {
  pub name:                String,
  pub email:               Option<String>,
  pub total_visits:        i64,
  pub first_visit:         DateTime<Utc>,
  pub last_visit:          DateTime<Utc>,
  pub departments_visited: Vec<String>,
}

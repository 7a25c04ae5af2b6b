//! Departments and the employees they own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organisational unit. Deletable only while it owns zero employees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
  pub department_id:  Uuid,
  pub name:           String,
  pub location:       Option<String>,
  pub contact_person: Option<String>,
  pub contact_phone:  Option<String>,
  pub created_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
  pub name:           String,
  #[serde(default)]
  pub location:       Option<String>,
  #[serde(default)]
  pub contact_person: Option<String>,
  #[serde(default)]
  pub contact_phone:  Option<String>,
}

/// A department member who can be visited.
///
/// `code` is the external employee code visitors key in at registration.
/// Deactivation is a soft delete: an employee referenced by visit history can
/// only have its `active` flag flipped, never be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
  pub employee_id:   Uuid,
  pub code:          String,
  pub name:          String,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub position:      Option<String>,
  pub department_id: Uuid,
  pub active:        bool,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
  pub code:          String,
  pub name:          String,
  #[serde(default)]
  pub email:         Option<String>,
  #[serde(default)]
  pub phone:         Option<String>,
  #[serde(default)]
  pub position:      Option<String>,
  pub department_id: Uuid,
}

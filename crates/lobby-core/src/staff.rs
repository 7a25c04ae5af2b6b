//! Staff accounts — receptionists and admins.
//!
//! The core only stores accounts; session issuance and verification are the
//! presentation layer's concern. `Staff` deliberately does not implement
//! `Serialize` so a password hash can never leak into a response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
  Admin,
  Receptionist,
}

#[derive(Debug, Clone)]
pub struct Staff {
  pub staff_id:      Uuid,
  pub role:          StaffRole,
  pub username:      String,
  /// Argon2 PHC string, e.g. `$argon2id$v=19$…`.
  pub password_hash: String,
  pub full_name:     String,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStaff {
  pub role:          StaffRole,
  pub username:      String,
  pub password_hash: String,
  pub full_name:     String,
}

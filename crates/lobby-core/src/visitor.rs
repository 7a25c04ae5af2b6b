//! Visitor — the identity of a person requesting access.
//!
//! Created once at registration and immutable thereafter. A visitor carries
//! no lifecycle state of its own; `Visit.status` is the single source of
//! truth, and any visitor-level view is computed by a join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
  pub visitor_id:      Uuid,
  pub name:            String,
  pub phone:           String,
  pub email:           Option<String>,
  pub address:         Option<String>,
  pub id_proof_type:   String,
  pub id_proof_number: String,
  pub created_at:      DateTime<Utc>,
}

/// Input for creating a visitor at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVisitor {
  pub name:            String,
  pub phone:           String,
  #[serde(default)]
  pub email:           Option<String>,
  #[serde(default)]
  pub address:         Option<String>,
  pub id_proof_type:   String,
  pub id_proof_number: String,
}

/// Input for the `register` transition: a new visitor, the external code of
/// the employee being visited, and the purpose of the visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistration {
  pub visitor:       NewVisitor,
  pub employee_code: String,
  pub purpose:       String,
}

impl NewRegistration {
  /// Reject missing or blank required fields before any store access.
  pub fn validate(&self) -> Result<()> {
    let required = [
      ("name", &self.visitor.name),
      ("phone", &self.visitor.phone),
      ("id_proof_type", &self.visitor.id_proof_type),
      ("id_proof_number", &self.visitor.id_proof_number),
      ("employee_code", &self.employee_code),
      ("purpose", &self.purpose),
    ];
    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
      }
    }
    Ok(())
  }
}

/// The result of a successful registration: the created rows plus the
/// display detail the confirmation screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
  pub visitor:         Visitor,
  pub visit:           crate::visit::Visit,
  pub employee_name:   String,
  pub department_name: String,
}

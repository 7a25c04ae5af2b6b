//! Visit — the lifecycle-bearing entity.
//!
//! A visit records one visitor seeking access to one employee. Its status
//! moves monotonically through `Pending -> CheckedIn -> CheckedOut`; the
//! transition rules live here as pure functions, and the store applies them
//! inside a single transaction per request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The closed set of visit lifecycle states.
///
/// Serialised snake_case (`"pending"` / `"checked_in"` / `"checked_out"`) in
/// both JSON and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
  Pending,
  CheckedIn,
  CheckedOut,
}

impl VisitStatus {
  /// Validate a requested transition against the state machine.
  ///
  /// Exactly two transitions are legal: `Pending -> CheckedIn` and
  /// `CheckedIn -> CheckedOut`. Everything else, including re-applying a
  /// transition that already happened, is an [`Error::InvalidTransition`].
  pub fn validate_transition(self, to: VisitStatus) -> Result<()> {
    match (self, to) {
      (VisitStatus::Pending, VisitStatus::CheckedIn) => Ok(()),
      (VisitStatus::CheckedIn, VisitStatus::CheckedOut) => Ok(()),
      (from, to) => Err(Error::InvalidTransition { from, to }),
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, VisitStatus::CheckedOut)
  }
}

// ─── Visit ───────────────────────────────────────────────────────────────────

/// One visitor's one purpose-of-visit instance directed at one employee.
///
/// Created in [`VisitStatus::Pending`] at registration, mutated only by
/// lifecycle transitions, never deleted (append-only history for reporting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
  pub visit_id:        Uuid,
  pub visitor_id:      Uuid,
  pub employee_id:     Uuid,
  /// Short human-enterable verification code, unique among all visits.
  pub token:           String,
  pub purpose:         String,
  pub status:          VisitStatus,
  /// Set iff status has reached `CheckedIn` or later.
  pub checkin_time:    Option<DateTime<Utc>>,
  /// Set iff status is `CheckedOut`.
  pub checkout_time:   Option<DateTime<Utc>>,
  pub receptionist_id: Option<Uuid>,
  pub created_at:      DateTime<Utc>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A visit joined with the display detail the reception desk needs. Never
/// stored, always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitDetail {
  pub visit:             Visit,
  pub visitor_name:      String,
  pub visitor_phone:     String,
  pub visitor_email:     Option<String>,
  pub employee_name:     String,
  pub employee_code:     String,
  pub department_name:   String,
  pub receptionist_name: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legal_transitions() {
    assert!(
      VisitStatus::Pending
        .validate_transition(VisitStatus::CheckedIn)
        .is_ok()
    );
    assert!(
      VisitStatus::CheckedIn
        .validate_transition(VisitStatus::CheckedOut)
        .is_ok()
    );
  }

  #[test]
  fn no_transition_skips_or_reverses() {
    let all = [
      VisitStatus::Pending,
      VisitStatus::CheckedIn,
      VisitStatus::CheckedOut,
    ];

    for from in all {
      for to in all {
        let legal = matches!(
          (from, to),
          (VisitStatus::Pending, VisitStatus::CheckedIn)
            | (VisitStatus::CheckedIn, VisitStatus::CheckedOut)
        );
        let result = from.validate_transition(to);
        assert_eq!(result.is_ok(), legal, "{from:?} -> {to:?}");
        if !legal {
          assert_eq!(result, Err(Error::InvalidTransition { from, to }));
        }
      }
    }
  }

  #[test]
  fn checked_out_is_terminal() {
    assert!(!VisitStatus::Pending.is_terminal());
    assert!(!VisitStatus::CheckedIn.is_terminal());
    assert!(VisitStatus::CheckedOut.is_terminal());
  }

  #[test]
  fn status_serialises_snake_case() {
    let json = serde_json::to_string(&VisitStatus::CheckedIn).unwrap();
    assert_eq!(json, "\"checked_in\"");
    let back: VisitStatus = serde_json::from_str("\"checked_out\"").unwrap();
    assert_eq!(back, VisitStatus::CheckedOut);
  }
}

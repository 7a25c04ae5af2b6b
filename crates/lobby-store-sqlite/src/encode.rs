//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings; date-only values as
//! `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase strings. Enums are
//! stored as their snake_case discriminants.

use chrono::{DateTime, NaiveDate, Utc};
use lobby_core::{
  directory::{Department, Employee},
  staff::{Staff, StaffRole},
  visit::{Visit, VisitDetail, VisitStatus},
  visitor::Visitor,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── VisitStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(s: VisitStatus) -> &'static str {
  match s {
    VisitStatus::Pending => "pending",
    VisitStatus::CheckedIn => "checked_in",
    VisitStatus::CheckedOut => "checked_out",
  }
}

pub fn decode_status(s: &str) -> Result<VisitStatus> {
  match s {
    "pending" => Ok(VisitStatus::Pending),
    "checked_in" => Ok(VisitStatus::CheckedIn),
    "checked_out" => Ok(VisitStatus::CheckedOut),
    other => Err(Error::Decode(format!("unknown visit status: {other:?}"))),
  }
}

// ─── StaffRole ───────────────────────────────────────────────────────────────

pub fn encode_role(r: StaffRole) -> &'static str {
  match r {
    StaffRole::Admin => "admin",
    StaffRole::Receptionist => "receptionist",
  }
}

pub fn decode_role(s: &str) -> Result<StaffRole> {
  match s {
    "admin" => Ok(StaffRole::Admin),
    "receptionist" => Ok(StaffRole::Receptionist),
    other => Err(Error::Decode(format!("unknown staff role: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `visits` row joined with its visitor, employee,
/// department, and (optional) receptionist.
pub struct RawVisitDetail {
  // visits columns
  pub visit_id:        String,
  pub visitor_id:      String,
  pub employee_id:     String,
  pub token:           String,
  pub purpose:         String,
  pub status:          String,
  pub checkin_time:    Option<String>,
  pub checkout_time:   Option<String>,
  pub receptionist_id: Option<String>,
  pub created_at:      String,
  // joined display columns
  pub visitor_name:      String,
  pub visitor_phone:     String,
  pub visitor_email:     Option<String>,
  pub employee_name:     String,
  pub employee_code:     String,
  pub department_name:   String,
  pub receptionist_name: Option<String>,
}

impl RawVisitDetail {
  pub fn into_detail(self) -> Result<VisitDetail> {
    let visit = Visit {
      visit_id:        decode_uuid(&self.visit_id)?,
      visitor_id:      decode_uuid(&self.visitor_id)?,
      employee_id:     decode_uuid(&self.employee_id)?,
      token:           self.token,
      purpose:         self.purpose,
      status:          decode_status(&self.status)?,
      checkin_time:    self.checkin_time.as_deref().map(decode_dt).transpose()?,
      checkout_time:   self.checkout_time.as_deref().map(decode_dt).transpose()?,
      receptionist_id: self
        .receptionist_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      created_at:      decode_dt(&self.created_at)?,
    };
    Ok(VisitDetail {
      visit,
      visitor_name: self.visitor_name,
      visitor_phone: self.visitor_phone,
      visitor_email: self.visitor_email,
      employee_name: self.employee_name,
      employee_code: self.employee_code,
      department_name: self.department_name,
      receptionist_name: self.receptionist_name,
    })
  }
}

pub struct RawVisitor {
  pub visitor_id:      String,
  pub name:            String,
  pub phone:           String,
  pub email:           Option<String>,
  pub address:         Option<String>,
  pub id_proof_type:   String,
  pub id_proof_number: String,
  pub created_at:      String,
}

impl RawVisitor {
  pub fn into_visitor(self) -> Result<Visitor> {
    Ok(Visitor {
      visitor_id:      decode_uuid(&self.visitor_id)?,
      name:            self.name,
      phone:           self.phone,
      email:           self.email,
      address:         self.address,
      id_proof_type:   self.id_proof_type,
      id_proof_number: self.id_proof_number,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawDepartment {
  pub department_id:  String,
  pub name:           String,
  pub location:       Option<String>,
  pub contact_person: Option<String>,
  pub contact_phone:  Option<String>,
  pub created_at:     String,
}

impl RawDepartment {
  pub fn into_department(self) -> Result<Department> {
    Ok(Department {
      department_id:  decode_uuid(&self.department_id)?,
      name:           self.name,
      location:       self.location,
      contact_person: self.contact_person,
      contact_phone:  self.contact_phone,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawEmployee {
  pub employee_id:   String,
  pub code:          String,
  pub name:          String,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub position:      Option<String>,
  pub department_id: String,
  pub active:        bool,
  pub created_at:    String,
}

impl RawEmployee {
  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      employee_id:   decode_uuid(&self.employee_id)?,
      code:          self.code,
      name:          self.name,
      email:         self.email,
      phone:         self.phone,
      position:      self.position,
      department_id: decode_uuid(&self.department_id)?,
      active:        self.active,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawStaff {
  pub staff_id:      String,
  pub role:          String,
  pub username:      String,
  pub password_hash: String,
  pub full_name:     String,
  pub created_at:    String,
}

impl RawStaff {
  pub fn into_staff(self) -> Result<Staff> {
    Ok(Staff {
      staff_id:      decode_uuid(&self.staff_id)?,
      role:          decode_role(&self.role)?,
      username:      self.username,
      password_hash: self.password_hash,
      full_name:     self.full_name,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

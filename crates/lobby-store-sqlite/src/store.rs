//! [`SqliteStore`] — the SQLite implementation of [`VisitStore`].
//!
//! Every lifecycle transition runs inside one IMMEDIATE rusqlite transaction
//! opened in a single `conn.call` closure: the write lock is taken up front,
//! the current row is read and validated, the update applied, and the
//! transaction committed — or rolled back wholly when validation fails.
//! Closures return plain outcome enums; they are mapped to typed errors
//! after the call.

use std::{collections::HashMap, path::Path, sync::Arc};

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use lobby_core::{
  directory::{Department, Employee, NewDepartment, NewEmployee},
  report::{
    DailyReport, DepartmentCount, DepartmentShare, MonthlyReportRow,
    Statistics, StatusTotals, TopVisitor, VisitorSummary,
  },
  staff::{NewStaff, Staff},
  store::{VisitQuery, VisitStore, VisitorSummaryQuery},
  token::{MAX_TOKEN_ATTEMPTS, NumericTokenGenerator, TokenGenerator},
  visit::{Visit, VisitDetail, VisitStatus},
  visitor::{NewRegistration, Registration, Visitor},
};

use crate::{
  Error, Result,
  encode::{
    RawDepartment, RawEmployee, RawStaff, RawVisitDetail, RawVisitor,
    decode_date, decode_dt, decode_status, encode_date, encode_dt,
    encode_role, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── SQL fragments ───────────────────────────────────────────────────────────

/// The joined projection behind every [`VisitDetail`] read.
const DETAIL_SELECT: &str = "
  SELECT
    v.visit_id, v.visitor_id, v.employee_id, v.token, v.purpose, v.status,
    v.checkin_time, v.checkout_time, v.receptionist_id, v.created_at,
    vis.name, vis.phone, vis.email,
    e.name, e.code, d.name,
    r.full_name
  FROM visits v
  JOIN visitors    vis ON vis.visitor_id  = v.visitor_id
  JOIN employees   e   ON e.employee_id   = v.employee_id
  JOIN departments d   ON d.department_id = e.department_id
  LEFT JOIN staff  r   ON r.staff_id      = v.receptionist_id";

fn map_detail(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVisitDetail> {
  Ok(RawVisitDetail {
    visit_id:          row.get(0)?,
    visitor_id:        row.get(1)?,
    employee_id:       row.get(2)?,
    token:             row.get(3)?,
    purpose:           row.get(4)?,
    status:            row.get(5)?,
    checkin_time:      row.get(6)?,
    checkout_time:     row.get(7)?,
    receptionist_id:   row.get(8)?,
    created_at:        row.get(9)?,
    visitor_name:      row.get(10)?,
    visitor_phone:     row.get(11)?,
    visitor_email:     row.get(12)?,
    employee_name:     row.get(13)?,
    employee_code:     row.get(14)?,
    department_name:   row.get(15)?,
    receptionist_name: row.get(16)?,
  })
}

fn detail_by_id(
  conn: &rusqlite::Connection,
  visit_id: &str,
) -> rusqlite::Result<Option<RawVisitDetail>> {
  conn
    .query_row(
      &format!("{DETAIL_SELECT} WHERE v.visit_id = ?1"),
      rusqlite::params![visit_id],
      map_detail,
    )
    .optional()
}

fn map_employee(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEmployee> {
  Ok(RawEmployee {
    employee_id:   row.get(0)?,
    code:          row.get(1)?,
    name:          row.get(2)?,
    email:         row.get(3)?,
    phone:         row.get(4)?,
    position:      row.get(5)?,
    department_id: row.get(6)?,
    active:        row.get(7)?,
    created_at:    row.get(8)?,
  })
}

const EMPLOYEE_SELECT: &str = "
  SELECT employee_id, code, name, email, phone, position, department_id,
         active, created_at
  FROM employees";

/// A UNIQUE violation on the token column specifically: the signal for the
/// bounded regenerate-and-retry loop.
fn is_token_collision(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, Some(msg))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && msg.contains("visits.token")
  )
}

fn is_unique_violation(e: &rusqlite::Error, column: &str) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, Some(msg))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && msg.contains(column)
  )
}

// ─── Outcome types ───────────────────────────────────────────────────────────

enum RegisterOutcome {
  EmployeeNotFound,
  TokenExhausted,
  Registered {
    employee_id:     String,
    employee_name:   String,
    department_name: String,
    token:           String,
  },
}

enum TransitionOutcome {
  NotFound,
  WrongToken,
  WrongState(String),
  Applied(RawVisitDetail),
}

enum DeleteDepartmentOutcome {
  NotFound,
  NotEmpty,
  Deleted,
}

enum AddEmployeeOutcome {
  DepartmentMissing,
  CodeTaken,
  Added,
}

enum DeleteEmployeeOutcome {
  NotFound,
  HasVisits,
  Deleted,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lobby visit store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All writes
/// go through one connection, so lifecycle transactions never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  tokens:          Arc<dyn TokenGenerator>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self {
      conn,
      tokens: Arc::new(NumericTokenGenerator),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self {
      conn,
      tokens: Arc::new(NumericTokenGenerator),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the token generator. Tests use this to force collisions.
  pub fn with_token_generator(mut self, tokens: Arc<dyn TokenGenerator>) -> Self {
    self.tokens = tokens;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── VisitStore impl ─────────────────────────────────────────────────────────

impl VisitStore for SqliteStore {
  type Error = Error;

  // ── Visit lifecycle ───────────────────────────────────────────────────────

  async fn register_visit(&self, input: NewRegistration) -> Result<Registration> {
    input.validate()?;

    let visitor = Visitor {
      visitor_id:      Uuid::new_v4(),
      name:            input.visitor.name,
      phone:           input.visitor.phone,
      email:           input.visitor.email,
      address:         input.visitor.address,
      id_proof_type:   input.visitor.id_proof_type,
      id_proof_number: input.visitor.id_proof_number,
      created_at:      Utc::now(),
    };
    let visit_id = Uuid::new_v4();
    let visit_created = Utc::now();

    // Candidate tokens for the bounded retry loop, drawn up front so the
    // transaction closure stays free of the generator.
    let candidates: Vec<String> =
      (0..MAX_TOKEN_ATTEMPTS).map(|_| self.tokens.generate()).collect();

    let employee_code = input.employee_code.clone();
    let purpose = input.purpose.clone();

    let visitor_id_str = encode_uuid(visitor.visitor_id);
    let visitor_row = (
      visitor.name.clone(),
      visitor.phone.clone(),
      visitor.email.clone(),
      visitor.address.clone(),
      visitor.id_proof_type.clone(),
      visitor.id_proof_number.clone(),
      encode_dt(visitor.created_at),
    );
    let visit_id_str = encode_uuid(visit_id);
    let visit_created_str = encode_dt(visit_created);
    let code_for_tx = employee_code.clone();

    let outcome: RegisterOutcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Resolve the target employee first; registration against an
        // unknown or inactive code must leave no rows behind.
        let employee: Option<(String, String, String)> = tx
          .query_row(
            "SELECT e.employee_id, e.name, d.name
             FROM employees e
             JOIN departments d ON d.department_id = e.department_id
             WHERE e.code = ?1 AND e.active = 1",
            rusqlite::params![code_for_tx],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
          )
          .optional()?;

        let Some((employee_id, employee_name, department_name)) = employee
        else {
          return Ok(RegisterOutcome::EmployeeNotFound);
        };

        tx.execute(
          "INSERT INTO visitors (
             visitor_id, name, phone, email, address,
             id_proof_type, id_proof_number, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            visitor_id_str,
            visitor_row.0,
            visitor_row.1,
            visitor_row.2,
            visitor_row.3,
            visitor_row.4,
            visitor_row.5,
            visitor_row.6,
          ],
        )?;

        let mut chosen: Option<String> = None;
        for token in candidates {
          let inserted = tx.execute(
            "INSERT INTO visits (
               visit_id, visitor_id, employee_id, token, purpose,
               status, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
            rusqlite::params![
              visit_id_str,
              visitor_id_str,
              employee_id,
              token,
              purpose,
              visit_created_str,
            ],
          );
          match inserted {
            Ok(_) => {
              chosen = Some(token);
              break;
            }
            Err(e) if is_token_collision(&e) => continue,
            Err(e) => return Err(e.into()),
          }
        }

        // Dropping the transaction without commit rolls everything back,
        // including the visitor row.
        let Some(token) = chosen else {
          return Ok(RegisterOutcome::TokenExhausted);
        };

        tx.commit()?;
        Ok(RegisterOutcome::Registered {
          employee_id,
          employee_name,
          department_name,
          token,
        })
      })
      .await?;

    match outcome {
      RegisterOutcome::EmployeeNotFound => {
        Err(lobby_core::Error::EmployeeNotFound(employee_code).into())
      }
      RegisterOutcome::TokenExhausted => Err(
        lobby_core::Error::Conflict(
          "token generation exhausted retry budget".into(),
        )
        .into(),
      ),
      RegisterOutcome::Registered {
        employee_id,
        employee_name,
        department_name,
        token,
      } => {
        let visit = Visit {
          visit_id,
          visitor_id: visitor.visitor_id,
          employee_id: crate::encode::decode_uuid(&employee_id)?,
          token,
          purpose: input.purpose,
          status: VisitStatus::Pending,
          checkin_time: None,
          checkout_time: None,
          receptionist_id: None,
          created_at: visit_created,
        };
        Ok(Registration { visitor, visit, employee_name, department_name })
      }
    }
  }

  async fn verify_token(
    &self,
    visit_id: Uuid,
    token: String,
  ) -> Result<Option<VisitDetail>> {
    let id_str = encode_uuid(visit_id);

    let raw: Option<RawVisitDetail> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "{DETAIL_SELECT} WHERE v.visit_id = ?1 AND v.token = ?2"
              ),
              rusqlite::params![id_str, token],
              map_detail,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVisitDetail::into_detail).transpose()
  }

  async fn check_in(
    &self,
    visit_id: Uuid,
    token: String,
    receptionist_id: Option<Uuid>,
  ) -> Result<VisitDetail> {
    let id_str = encode_uuid(visit_id);
    let now_str = encode_dt(Utc::now());
    let receptionist_str = receptionist_id.map(encode_uuid);

    let outcome: TransitionOutcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let row: Option<(String, String)> = tx
          .query_row(
            "SELECT token, status FROM visits WHERE visit_id = ?1",
            rusqlite::params![id_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let Some((stored_token, status)) = row else {
          return Ok(TransitionOutcome::NotFound);
        };

        // The token is re-checked here, at the moment of the transition;
        // a prior verify call is not trusted.
        if stored_token != token {
          return Ok(TransitionOutcome::WrongToken);
        }
        if status != encode_status(VisitStatus::Pending) {
          return Ok(TransitionOutcome::WrongState(status));
        }

        tx.execute(
          "UPDATE visits
           SET status = 'checked_in',
               checkin_time = ?1,
               receptionist_id = COALESCE(?2, receptionist_id)
           WHERE visit_id = ?3",
          rusqlite::params![now_str, receptionist_str, id_str],
        )?;

        let raw = detail_by_id(&tx, &id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(TransitionOutcome::Applied(raw))
      })
      .await?;

    match outcome {
      TransitionOutcome::NotFound => {
        Err(lobby_core::Error::VisitNotFound(visit_id).into())
      }
      TransitionOutcome::WrongToken => {
        Err(lobby_core::Error::InvalidToken.into())
      }
      TransitionOutcome::WrongState(s) => {
        let from = decode_status(&s)?;
        Err(
          lobby_core::Error::InvalidTransition {
            from,
            to: VisitStatus::CheckedIn,
          }
          .into(),
        )
      }
      TransitionOutcome::Applied(raw) => raw.into_detail(),
    }
  }

  async fn check_out(&self, visit_id: Uuid) -> Result<VisitDetail> {
    let id_str = encode_uuid(visit_id);
    let now_str = encode_dt(Utc::now());

    let outcome: TransitionOutcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let status: Option<String> = tx
          .query_row(
            "SELECT status FROM visits WHERE visit_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        let Some(status) = status else {
          return Ok(TransitionOutcome::NotFound);
        };
        if status != encode_status(VisitStatus::CheckedIn) {
          return Ok(TransitionOutcome::WrongState(status));
        }

        tx.execute(
          "UPDATE visits
           SET status = 'checked_out', checkout_time = ?1
           WHERE visit_id = ?2",
          rusqlite::params![now_str, id_str],
        )?;

        let raw = detail_by_id(&tx, &id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(TransitionOutcome::Applied(raw))
      })
      .await?;

    match outcome {
      TransitionOutcome::NotFound => {
        Err(lobby_core::Error::VisitNotFound(visit_id).into())
      }
      TransitionOutcome::WrongToken => unreachable!("check-out takes no token"),
      TransitionOutcome::WrongState(s) => {
        let from = decode_status(&s)?;
        Err(
          lobby_core::Error::InvalidTransition {
            from,
            to: VisitStatus::CheckedOut,
          }
          .into(),
        )
      }
      TransitionOutcome::Applied(raw) => raw.into_detail(),
    }
  }

  // ── Visit reads ───────────────────────────────────────────────────────────

  async fn get_visit(&self, visit_id: Uuid) -> Result<Option<VisitDetail>> {
    let id_str = encode_uuid(visit_id);

    let raw: Option<RawVisitDetail> = self
      .conn
      .call(move |conn| Ok(detail_by_id(conn, &id_str)?))
      .await?;

    raw.map(RawVisitDetail::into_detail).transpose()
  }

  async fn visits_on(&self, date: NaiveDate) -> Result<Vec<VisitDetail>> {
    let date_str = encode_date(date);

    let raws: Vec<RawVisitDetail> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{DETAIL_SELECT}
           WHERE substr(v.created_at, 1, 10) = ?1
           ORDER BY v.created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![date_str], map_detail)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVisitDetail::into_detail).collect()
  }

  async fn search_visits(&self, query: &VisitQuery) -> Result<Vec<VisitDetail>> {
    // Static SQL with optional positional filters; a NULL parameter
    // disables its clause.
    let name = query.name.clone();
    let phone = query.phone.clone();
    let date_str = query.date.map(encode_date);
    let department_str = query.department_id.map(encode_uuid);
    let employee_code = query.employee_code.clone();
    let status_str = query.status.map(|s| encode_status(s).to_owned());
    let id_proof = query.id_proof_number.clone();
    let limit_val = query.limit.unwrap_or(200) as i64;
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawVisitDetail> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{DETAIL_SELECT}
           WHERE (?1 IS NULL OR vis.name  LIKE '%' || ?1 || '%')
             AND (?2 IS NULL OR vis.phone LIKE '%' || ?2 || '%')
             AND (?3 IS NULL OR substr(v.created_at, 1, 10) = ?3)
             AND (?4 IS NULL OR d.department_id = ?4)
             AND (?5 IS NULL OR e.code = ?5)
             AND (?6 IS NULL OR v.status = ?6)
             AND (?7 IS NULL OR vis.id_proof_number = ?7)
           ORDER BY v.created_at DESC
           LIMIT ?8 OFFSET ?9"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              name,
              phone,
              date_str,
              department_str,
              employee_code,
              status_str,
              id_proof,
              limit_val,
              offset_val,
            ],
            map_detail,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVisitDetail::into_detail).collect()
  }

  // ── Directory ─────────────────────────────────────────────────────────────

  async fn add_department(&self, input: NewDepartment) -> Result<Department> {
    if input.name.trim().is_empty() {
      return Err(
        lobby_core::Error::Validation("department name is required".into())
          .into(),
      );
    }

    let department = Department {
      department_id:  Uuid::new_v4(),
      name:           input.name,
      location:       input.location,
      contact_person: input.contact_person,
      contact_phone:  input.contact_phone,
      created_at:     Utc::now(),
    };

    let row = (
      encode_uuid(department.department_id),
      department.name.clone(),
      department.location.clone(),
      department.contact_person.clone(),
      department.contact_phone.clone(),
      encode_dt(department.created_at),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO departments (
             department_id, name, location, contact_person, contact_phone,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![row.0, row.1, row.2, row.3, row.4, row.5],
        )?;
        Ok(())
      })
      .await?;

    Ok(department)
  }

  async fn list_departments(&self) -> Result<Vec<Department>> {
    let raws: Vec<RawDepartment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT department_id, name, location, contact_person,
                  contact_phone, created_at
           FROM departments ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawDepartment {
              department_id:  row.get(0)?,
              name:           row.get(1)?,
              location:       row.get(2)?,
              contact_person: row.get(3)?,
              contact_phone:  row.get(4)?,
              created_at:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDepartment::into_department).collect()
  }

  async fn get_department(&self, id: Uuid) -> Result<Option<Department>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDepartment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT department_id, name, location, contact_person,
                      contact_phone, created_at
               FROM departments WHERE department_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawDepartment {
                  department_id:  row.get(0)?,
                  name:           row.get(1)?,
                  location:       row.get(2)?,
                  contact_person: row.get(3)?,
                  contact_phone:  row.get(4)?,
                  created_at:     row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDepartment::into_department).transpose()
  }

  async fn delete_department(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let outcome: DeleteDepartmentOutcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM departments WHERE department_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(DeleteDepartmentOutcome::NotFound);
        }

        let employees: i64 = tx.query_row(
          "SELECT COUNT(*) FROM employees WHERE department_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?;
        if employees > 0 {
          return Ok(DeleteDepartmentOutcome::NotEmpty);
        }

        tx.execute(
          "DELETE FROM departments WHERE department_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(DeleteDepartmentOutcome::Deleted)
      })
      .await?;

    match outcome {
      DeleteDepartmentOutcome::NotFound => {
        Err(lobby_core::Error::DepartmentNotFound(id).into())
      }
      DeleteDepartmentOutcome::NotEmpty => {
        Err(lobby_core::Error::DepartmentNotEmpty(id).into())
      }
      DeleteDepartmentOutcome::Deleted => Ok(()),
    }
  }

  async fn add_employee(&self, input: NewEmployee) -> Result<Employee> {
    if input.code.trim().is_empty() || input.name.trim().is_empty() {
      return Err(
        lobby_core::Error::Validation(
          "employee code and name are required".into(),
        )
        .into(),
      );
    }

    let employee = Employee {
      employee_id:   Uuid::new_v4(),
      code:          input.code,
      name:          input.name,
      email:         input.email,
      phone:         input.phone,
      position:      input.position,
      department_id: input.department_id,
      active:        true,
      created_at:    Utc::now(),
    };

    let row = (
      encode_uuid(employee.employee_id),
      employee.code.clone(),
      employee.name.clone(),
      employee.email.clone(),
      employee.phone.clone(),
      employee.position.clone(),
      encode_uuid(employee.department_id),
      encode_dt(employee.created_at),
    );

    let outcome: AddEmployeeOutcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let department_exists: bool = tx
          .query_row(
            "SELECT 1 FROM departments WHERE department_id = ?1",
            rusqlite::params![row.6],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !department_exists {
          return Ok(AddEmployeeOutcome::DepartmentMissing);
        }

        let inserted = tx.execute(
          "INSERT INTO employees (
             employee_id, code, name, email, phone, position,
             department_id, active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
          rusqlite::params![
            row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7
          ],
        );
        match inserted {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e, "employees.code") => {
            return Ok(AddEmployeeOutcome::CodeTaken);
          }
          Err(e) => return Err(e.into()),
        }

        tx.commit()?;
        Ok(AddEmployeeOutcome::Added)
      })
      .await?;

    match outcome {
      AddEmployeeOutcome::DepartmentMissing => {
        Err(lobby_core::Error::DepartmentNotFound(employee.department_id).into())
      }
      AddEmployeeOutcome::CodeTaken => Err(
        lobby_core::Error::Conflict(format!(
          "employee code {:?} already taken",
          employee.code
        ))
        .into(),
      ),
      AddEmployeeOutcome::Added => Ok(employee),
    }
  }

  async fn list_employees(
    &self,
    department_id: Option<Uuid>,
  ) -> Result<Vec<Employee>> {
    let department_str = department_id.map(encode_uuid);

    let raws: Vec<RawEmployee> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(d) = department_str {
          let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT} WHERE department_id = ?1 ORDER BY name"
          ))?;
          stmt
            .query_map(rusqlite::params![d], map_employee)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("{EMPLOYEE_SELECT} ORDER BY name"))?;
          stmt
            .query_map([], map_employee)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  async fn find_active_employee_by_code(
    &self,
    code: String,
  ) -> Result<Option<Employee>> {
    let raw: Option<RawEmployee> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{EMPLOYEE_SELECT} WHERE code = ?1 AND active = 1"),
              rusqlite::params![code],
              map_employee,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEmployee::into_employee).transpose()
  }

  async fn deactivate_employee(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE employees SET active = 0 WHERE employee_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(lobby_core::Error::UnknownEmployee(id).into());
    }
    Ok(())
  }

  async fn delete_employee(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let outcome: DeleteEmployeeOutcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM employees WHERE employee_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(DeleteEmployeeOutcome::NotFound);
        }

        let visits: i64 = tx.query_row(
          "SELECT COUNT(*) FROM visits WHERE employee_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?;
        if visits > 0 {
          return Ok(DeleteEmployeeOutcome::HasVisits);
        }

        tx.execute(
          "DELETE FROM employees WHERE employee_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(DeleteEmployeeOutcome::Deleted)
      })
      .await?;

    match outcome {
      DeleteEmployeeOutcome::NotFound => {
        Err(lobby_core::Error::UnknownEmployee(id).into())
      }
      DeleteEmployeeOutcome::HasVisits => {
        Err(lobby_core::Error::EmployeeHasVisits(id).into())
      }
      DeleteEmployeeOutcome::Deleted => Ok(()),
    }
  }

  // ── Staff ─────────────────────────────────────────────────────────────────

  async fn add_staff(&self, input: NewStaff) -> Result<Staff> {
    let staff = Staff {
      staff_id:      Uuid::new_v4(),
      role:          input.role,
      username:      input.username,
      password_hash: input.password_hash,
      full_name:     input.full_name,
      created_at:    Utc::now(),
    };

    let row = (
      encode_uuid(staff.staff_id),
      encode_role(staff.role).to_owned(),
      staff.username.clone(),
      staff.password_hash.clone(),
      staff.full_name.clone(),
      encode_dt(staff.created_at),
    );

    let taken: bool = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO staff (
             staff_id, role, username, password_hash, full_name, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![row.0, row.1, row.2, row.3, row.4, row.5],
        );
        match inserted {
          Ok(_) => Ok(false),
          Err(e) if is_unique_violation(&e, "staff.username") => Ok(true),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if taken {
      return Err(
        lobby_core::Error::Conflict(format!(
          "username {:?} already taken",
          staff.username
        ))
        .into(),
      );
    }
    Ok(staff)
  }

  async fn find_staff_by_username(
    &self,
    username: String,
  ) -> Result<Option<Staff>> {
    let raw: Option<RawStaff> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT staff_id, role, username, password_hash, full_name,
                      created_at
               FROM staff WHERE username = ?1",
              rusqlite::params![username],
              |row| {
                Ok(RawStaff {
                  staff_id:      row.get(0)?,
                  role:          row.get(1)?,
                  username:      row.get(2)?,
                  password_hash: row.get(3)?,
                  full_name:     row.get(4)?,
                  created_at:    row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStaff::into_staff).transpose()
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn daily_report(&self, date: NaiveDate) -> Result<DailyReport> {
    let date_str = encode_date(date);

    let (total, checkins, checkouts): (i64, i64, i64) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*),
                  COUNT(CASE WHEN status = 'checked_in'  THEN 1 END),
                  COUNT(CASE WHEN status = 'checked_out' THEN 1 END)
           FROM visits WHERE substr(created_at, 1, 10) = ?1",
          rusqlite::params![date_str],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?)
      })
      .await?;

    Ok(DailyReport { date, total_visits: total, checkins, checkouts })
  }

  async fn monthly_report(
    &self,
    year: i32,
    month: u32,
  ) -> Result<Vec<MonthlyReportRow>> {
    if !(1..=12).contains(&month) {
      return Err(
        lobby_core::Error::Validation(format!("invalid month: {month}")).into(),
      );
    }
    let prefix = format!("{year:04}-{month:02}");

    let rows: Vec<(String, i64, i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT substr(created_at, 1, 10) AS day,
                  COUNT(*),
                  COUNT(CASE WHEN status = 'checked_in'  THEN 1 END),
                  COUNT(CASE WHEN status = 'checked_out' THEN 1 END)
           FROM visits
           WHERE substr(created_at, 1, 7) = ?1
           GROUP BY day ORDER BY day",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![prefix], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(day, total_visits, checkins, checkouts)| {
        Ok(MonthlyReportRow {
          date: decode_date(&day)?,
          total_visits,
          checkins,
          checkouts,
        })
      })
      .collect()
  }

  async fn statistics(&self) -> Result<Statistics> {
    let cutoff_str = encode_dt(Utc::now() - Duration::days(30));

    let (totals, by_department): ((i64, i64, i64, i64), Vec<(String, i64)>) =
      self
        .conn
        .call(move |conn| {
          let totals = conn.query_row(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN status = 'pending'     THEN 1 END),
                    COUNT(CASE WHEN status = 'checked_in'  THEN 1 END),
                    COUNT(CASE WHEN status = 'checked_out' THEN 1 END)
             FROM visits",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
          )?;

          let mut stmt = conn.prepare(
            "SELECT d.name, COUNT(v.visit_id)
             FROM visits v
             JOIN employees   e ON e.employee_id   = v.employee_id
             JOIN departments d ON d.department_id = e.department_id
             WHERE v.checkin_time IS NOT NULL AND v.checkin_time >= ?1
             GROUP BY d.department_id, d.name
             ORDER BY COUNT(v.visit_id) DESC",
          )?;
          let by_department = stmt
            .query_map(rusqlite::params![cutoff_str], |r| {
              Ok((r.get(0)?, r.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

          Ok((totals, by_department))
        })
        .await?;

    Ok(Statistics {
      totals:        StatusTotals {
        total:       totals.0,
        pending:     totals.1,
        checked_in:  totals.2,
        checked_out: totals.3,
      },
      by_department: by_department
        .into_iter()
        .map(|(department, visit_count)| DepartmentCount {
          department,
          visit_count,
        })
        .collect(),
    })
  }

  async fn department_shares(&self) -> Result<Vec<DepartmentShare>> {
    let rows: Vec<(String, i64, Option<f64>)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT d.name,
                  COUNT(v.visit_id),
                  ROUND(
                    COUNT(v.visit_id) * 100.0
                      / (SELECT COUNT(*) FROM visits),
                    2
                  )
           FROM visits v
           JOIN employees   e ON e.employee_id   = v.employee_id
           JOIN departments d ON d.department_id = e.department_id
           GROUP BY d.department_id, d.name
           ORDER BY COUNT(v.visit_id) DESC",
        )?;
        let rows = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(department, visit_count, share)| DepartmentShare {
          department,
          visit_count,
          share_percent: share.unwrap_or(0.0),
        })
        .collect(),
    )
  }

  async fn top_visitors(&self, limit: u32) -> Result<Vec<TopVisitor>> {
    let rows: Vec<(String, Option<String>, String, i64, Option<String>)> =
      self
        .conn
        .call(move |conn| {
          // Each registration records a fresh visitor row, so the ranking
          // groups by person identity rather than by row id.
          let mut stmt = conn.prepare(
            "SELECT vis.name, vis.email, vis.phone,
                    COUNT(v.visit_id),
                    MAX(v.checkin_time)
             FROM visitors vis
             JOIN visits v ON v.visitor_id = vis.visitor_id
             GROUP BY vis.name, vis.email, vis.phone
             ORDER BY COUNT(v.visit_id) DESC
             LIMIT ?1",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![limit], |r| {
              Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?;

    rows
      .into_iter()
      .map(|(name, email, phone, visit_count, last_visit)| {
        Ok(TopVisitor {
          name,
          email,
          phone,
          visit_count,
          last_visit: last_visit.as_deref().map(decode_dt).transpose()?,
        })
      })
      .collect()
  }

  async fn visitor_summaries(
    &self,
    query: &VisitorSummaryQuery,
  ) -> Result<Vec<VisitorSummary>> {
    let name = query.name.clone();
    let email = query.email.clone();

    type RawSummary = (String, Option<String>, i64, String, String);
    let (summaries, dept_pairs): (
      Vec<RawSummary>,
      Vec<(String, Option<String>, String)>,
    ) = self
      .conn
      .call(move |conn| {
        // Only visits that actually reached the desk count towards a
        // person's history.
        let mut stmt = conn.prepare(
          "SELECT vis.name, vis.email,
                  COUNT(v.visit_id),
                  MIN(v.created_at), MAX(v.created_at)
           FROM visitors vis
           JOIN visits v ON v.visitor_id = vis.visitor_id
           WHERE v.status != 'pending'
             AND (?1 IS NULL OR vis.name  LIKE '%' || ?1 || '%')
             AND (?2 IS NULL OR vis.email LIKE '%' || ?2 || '%')
           GROUP BY vis.name, vis.email
           ORDER BY COUNT(v.visit_id) DESC",
        )?;
        let summaries = stmt
          .query_map(rusqlite::params![name, email], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT DISTINCT vis.name, vis.email, d.name
           FROM visits v
           JOIN visitors    vis ON vis.visitor_id  = v.visitor_id
           JOIN employees   e   ON e.employee_id   = v.employee_id
           JOIN departments d   ON d.department_id = e.department_id
           WHERE v.status != 'pending'
           ORDER BY d.name",
        )?;
        let dept_pairs = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((summaries, dept_pairs))
      })
      .await?;

    let mut departments: HashMap<(String, Option<String>), Vec<String>> =
      HashMap::new();
    for (name, email, department) in dept_pairs {
      departments.entry((name, email)).or_default().push(department);
    }

    summaries
      .into_iter()
      .map(|(name, email, total_visits, first, last)| {
        let departments_visited = departments
          .remove(&(name.clone(), email.clone()))
          .unwrap_or_default();
        Ok(VisitorSummary {
          name,
          email,
          total_visits,
          first_visit: decode_dt(&first)?,
          last_visit: decode_dt(&last)?,
          departments_visited,
        })
      })
      .collect()
  }

  async fn visitor_history(&self) -> Result<Vec<Visitor>> {
    let raws: Vec<RawVisitor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT visitor_id, name, phone, email, address,
                  id_proof_type, id_proof_number, created_at
           FROM visitors
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map([], |r| {
            Ok(RawVisitor {
              visitor_id:      r.get(0)?,
              name:            r.get(1)?,
              phone:           r.get(2)?,
              email:           r.get(3)?,
              address:         r.get(4)?,
              id_proof_type:   r.get(5)?,
              id_proof_number: r.get(6)?,
              created_at:      r.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVisitor::into_visitor).collect()
  }
}

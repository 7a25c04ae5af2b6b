//! Integration tests for `SqliteStore` against an in-memory database.

use std::{
  collections::{HashSet, VecDeque},
  sync::{Arc, Mutex},
};

use lobby_core::{
  Error as CoreError,
  directory::{NewDepartment, NewEmployee},
  error::StoreError as _,
  staff::{NewStaff, StaffRole},
  store::{VisitQuery, VisitStore, VisitorSummaryQuery},
  token::TokenGenerator,
  visit::VisitStatus,
  visitor::{NewRegistration, NewVisitor},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Create a department and an active employee with code `E100`.
async fn seed_directory(s: &SqliteStore) -> (Uuid, Uuid) {
  let department = s
    .add_department(NewDepartment {
      name:           "Engineering".into(),
      location:       Some("Building 2".into()),
      contact_person: None,
      contact_phone:  None,
    })
    .await
    .unwrap();
  let employee = s
    .add_employee(NewEmployee {
      code:          "E100".into(),
      name:          "Priya Nair".into(),
      email:         None,
      phone:         None,
      position:      Some("Engineer".into()),
      department_id: department.department_id,
    })
    .await
    .unwrap();
  (department.department_id, employee.employee_id)
}

fn registration(employee_code: &str) -> NewRegistration {
  NewRegistration {
    visitor:       NewVisitor {
      name:            "Asha".into(),
      phone:           "555-0100".into(),
      email:           Some("asha@example.com".into()),
      address:         None,
      id_proof_type:   "passport".into(),
      id_proof_number: "P1234567".into(),
    },
    employee_code: employee_code.into(),
    purpose:       "interview".into(),
  }
}

fn registration_for(name: &str, email: Option<&str>) -> NewRegistration {
  NewRegistration {
    visitor:       NewVisitor {
      name:            name.into(),
      phone:           "555-0100".into(),
      email:           email.map(Into::into),
      address:         None,
      id_proof_type:   "passport".into(),
      id_proof_number: "P1234567".into(),
    },
    employee_code: "E100".into(),
    purpose:       "interview".into(),
  }
}

async fn count_rows(s: &SqliteStore, table: &'static str) -> i64 {
  s.conn
    .call(move |conn| {
      Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
        r.get(0)
      })?)
    })
    .await
    .unwrap()
}

fn core_err(e: &Error) -> &CoreError {
  e.as_core().expect("expected a core error")
}

/// Hands out tokens from a fixed queue; used to force collisions.
struct FixedTokens(Mutex<VecDeque<String>>);

impl FixedTokens {
  fn new(tokens: &[&str]) -> Arc<Self> {
    Arc::new(Self(Mutex::new(
      tokens.iter().map(|t| t.to_string()).collect(),
    )))
  }
}

impl TokenGenerator for FixedTokens {
  fn generate(&self) -> String {
    // Keep handing out the final token once the queue runs low, since the
    // registration path draws its whole candidate batch up front.
    let mut queue = self.0.lock().unwrap();
    if queue.len() > 1 {
      queue.pop_front().unwrap()
    } else {
      queue.front().cloned().expect("empty token queue")
    }
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_pending_visit_with_token() {
  let s = store().await;
  seed_directory(&s).await;

  let reg = s.register_visit(registration("E100")).await.unwrap();
  assert_eq!(reg.visit.status, VisitStatus::Pending);
  assert_eq!(reg.visit.token.len(), lobby_core::token::TOKEN_LEN);
  assert!(reg.visit.checkin_time.is_none());
  assert!(reg.visit.checkout_time.is_none());
  assert_eq!(reg.employee_name, "Priya Nair");
  assert_eq!(reg.department_name, "Engineering");
  assert_eq!(reg.visitor.name, "Asha");
}

#[tokio::test]
async fn register_unknown_employee_leaves_no_rows() {
  let s = store().await;
  seed_directory(&s).await;

  let err = s.register_visit(registration("E999")).await.unwrap_err();
  assert_eq!(core_err(&err), &CoreError::EmployeeNotFound("E999".into()));

  // Full rollback: neither a visitor nor a visit row survives.
  assert_eq!(count_rows(&s, "visitors").await, 0);
  assert_eq!(count_rows(&s, "visits").await, 0);
}

#[tokio::test]
async fn register_inactive_employee_fails() {
  let s = store().await;
  let (_, employee_id) = seed_directory(&s).await;
  s.deactivate_employee(employee_id).await.unwrap();

  let err = s.register_visit(registration("E100")).await.unwrap_err();
  assert!(matches!(core_err(&err), CoreError::EmployeeNotFound(_)));
  assert_eq!(count_rows(&s, "visitors").await, 0);
}

#[tokio::test]
async fn register_rejects_blank_input_before_store_access() {
  let s = store().await;
  seed_directory(&s).await;

  let mut input = registration("E100");
  input.visitor.name = "   ".into();
  let err = s.register_visit(input).await.unwrap_err();
  assert!(matches!(core_err(&err), CoreError::Validation(_)));
}

#[tokio::test]
async fn tokens_are_distinct_across_registrations() {
  let s = store().await;
  seed_directory(&s).await;

  let mut tokens = HashSet::new();
  for _ in 0..20 {
    let reg = s.register_visit(registration("E100")).await.unwrap();
    tokens.insert(reg.visit.token);
  }
  assert_eq!(tokens.len(), 20);
}

#[tokio::test]
async fn token_collision_triggers_regeneration() {
  let s = store().await;
  seed_directory(&s).await;

  // First registration takes "111111".
  let first = s
    .clone()
    .with_token_generator(FixedTokens::new(&[
      "111111", "111111", "111111", "111111",
    ]))
    .register_visit(registration("E100"))
    .await
    .unwrap();
  assert_eq!(first.visit.token, "111111");

  // Second registration collides twice, then lands on "222222" — the
  // first visit's token is never overwritten.
  let second = s
    .clone()
    .with_token_generator(FixedTokens::new(&[
      "111111", "111111", "222222", "333333",
    ]))
    .register_visit(registration("E100"))
    .await
    .unwrap();
  assert_eq!(second.visit.token, "222222");

  let untouched = s.get_visit(first.visit.visit_id).await.unwrap().unwrap();
  assert_eq!(untouched.visit.token, "111111");
}

#[tokio::test]
async fn token_retry_budget_is_bounded() {
  let s = store().await;
  seed_directory(&s).await;

  s.clone()
    .with_token_generator(FixedTokens::new(&["111111"]))
    .register_visit(registration("E100"))
    .await
    .unwrap();

  let err = s
    .clone()
    .with_token_generator(FixedTokens::new(&[
      "111111", "111111", "111111", "111111",
    ]))
    .register_visit(registration("E100"))
    .await
    .unwrap_err();
  assert!(matches!(core_err(&err), CoreError::Conflict(_)));

  // The failed registration rolled back its visitor row too.
  assert_eq!(count_rows(&s, "visitors").await, 1);
  assert_eq!(count_rows(&s, "visits").await, 1);
}

// ─── Verification gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn verify_requires_both_id_and_token() {
  let s = store().await;
  seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();

  let good = s
    .verify_token(reg.visit.visit_id, reg.visit.token.clone())
    .await
    .unwrap();
  let good = good.expect("matching pair verifies");
  assert_eq!(good.visit.visit_id, reg.visit.visit_id);
  assert_eq!(good.department_name, "Engineering");

  // Wrong token with the right id fails closed.
  let wrong_token = s
    .verify_token(reg.visit.visit_id, "000000".into())
    .await
    .unwrap();
  assert!(wrong_token.is_none());

  // Right token with the wrong id fails closed.
  let wrong_id = s
    .verify_token(Uuid::new_v4(), reg.visit.token.clone())
    .await
    .unwrap();
  assert!(wrong_id.is_none());

  // Verification had no side effect on status.
  let after = s.get_visit(reg.visit.visit_id).await.unwrap().unwrap();
  assert_eq!(after.visit.status, VisitStatus::Pending);
}

// ─── Lifecycle transitions ───────────────────────────────────────────────────

#[tokio::test]
async fn full_lifecycle_scenario() {
  let s = store().await;
  seed_directory(&s).await;
  let admin = s
    .add_staff(NewStaff {
      role:          StaffRole::Receptionist,
      username:      "front-desk".into(),
      password_hash: "$argon2id$stub".into(),
      full_name:     "Dana Cole".into(),
    })
    .await
    .unwrap();

  let reg = s.register_visit(registration("E100")).await.unwrap();
  let id = reg.visit.visit_id;
  let token = reg.visit.token.clone();

  assert!(s.verify_token(id, token.clone()).await.unwrap().is_some());

  let checked_in = s
    .check_in(id, token.clone(), Some(admin.staff_id))
    .await
    .unwrap();
  assert_eq!(checked_in.visit.status, VisitStatus::CheckedIn);
  assert!(checked_in.visit.checkin_time.is_some());
  assert!(checked_in.visit.checkout_time.is_none());
  assert_eq!(checked_in.visit.receptionist_id, Some(admin.staff_id));
  assert_eq!(checked_in.receptionist_name.as_deref(), Some("Dana Cole"));

  let checked_out = s.check_out(id).await.unwrap();
  assert_eq!(checked_out.visit.status, VisitStatus::CheckedOut);
  assert!(checked_out.visit.checkin_time.is_some());
  assert!(checked_out.visit.checkout_time.is_some());

  // A further check-in attempt on the terminal state is rejected.
  let err = s.check_in(id, token, None).await.unwrap_err();
  assert_eq!(
    core_err(&err),
    &CoreError::InvalidTransition {
      from: VisitStatus::CheckedOut,
      to:   VisitStatus::CheckedIn,
    }
  );
}

#[tokio::test]
async fn check_in_with_wrong_token_changes_nothing() {
  let s = store().await;
  seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();

  let err = s
    .check_in(reg.visit.visit_id, "WRONGTOKEN".into(), None)
    .await
    .unwrap_err();
  assert_eq!(core_err(&err), &CoreError::InvalidToken);

  let after = s.get_visit(reg.visit.visit_id).await.unwrap().unwrap();
  assert_eq!(after.visit.status, VisitStatus::Pending);
  assert!(after.visit.checkin_time.is_none());
}

#[tokio::test]
async fn check_in_unknown_visit_is_not_found() {
  let s = store().await;
  seed_directory(&s).await;

  let id = Uuid::new_v4();
  let err = s.check_in(id, "123456".into(), None).await.unwrap_err();
  assert_eq!(core_err(&err), &CoreError::VisitNotFound(id));
}

#[tokio::test]
async fn check_out_requires_checked_in() {
  let s = store().await;
  seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();
  let id = reg.visit.visit_id;

  // Pending -> CheckedOut skips a state.
  let err = s.check_out(id).await.unwrap_err();
  assert_eq!(
    core_err(&err),
    &CoreError::InvalidTransition {
      from: VisitStatus::Pending,
      to:   VisitStatus::CheckedOut,
    }
  );

  s.check_in(id, reg.visit.token.clone(), None).await.unwrap();
  s.check_out(id).await.unwrap();

  // Re-applying check-out is rejected, not silently absorbed.
  let err = s.check_out(id).await.unwrap_err();
  assert_eq!(
    core_err(&err),
    &CoreError::InvalidTransition {
      from: VisitStatus::CheckedOut,
      to:   VisitStatus::CheckedOut,
    }
  );
}

#[tokio::test]
async fn double_check_in_is_rejected() {
  let s = store().await;
  seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();

  s.check_in(reg.visit.visit_id, reg.visit.token.clone(), None)
    .await
    .unwrap();
  let err = s
    .check_in(reg.visit.visit_id, reg.visit.token.clone(), None)
    .await
    .unwrap_err();
  assert_eq!(
    core_err(&err),
    &CoreError::InvalidTransition {
      from: VisitStatus::CheckedIn,
      to:   VisitStatus::CheckedIn,
    }
  );
}

#[tokio::test]
async fn concurrent_check_in_has_exactly_one_winner() {
  let s = store().await;
  seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();
  let id = reg.visit.visit_id;
  let token = reg.visit.token.clone();

  let (a, b) = tokio::join!(
    s.check_in(id, token.clone(), None),
    s.check_in(id, token.clone(), None),
  );

  let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
  assert_eq!(successes, 1, "exactly one check-in must win");

  let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
  assert_eq!(
    core_err(&loser),
    &CoreError::InvalidTransition {
      from: VisitStatus::CheckedIn,
      to:   VisitStatus::CheckedIn,
    }
  );

  let after = s.get_visit(id).await.unwrap().unwrap();
  assert_eq!(after.visit.status, VisitStatus::CheckedIn);
}

// ─── Reads and search ────────────────────────────────────────────────────────

#[tokio::test]
async fn visits_on_filters_by_creation_date() {
  let s = store().await;
  seed_directory(&s).await;
  s.register_visit(registration("E100")).await.unwrap();

  let today = chrono::Utc::now().date_naive();
  let todays = s.visits_on(today).await.unwrap();
  assert_eq!(todays.len(), 1);

  let yesterday = today.pred_opt().unwrap();
  assert!(s.visits_on(yesterday).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_combines_filters() {
  let s = store().await;
  let (department_id, _) = seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();

  let by_name = s
    .search_visits(&VisitQuery { name: Some("sha".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_name.len(), 1);

  let by_department_and_status = s
    .search_visits(&VisitQuery {
      department_id: Some(department_id),
      status: Some(VisitStatus::Pending),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_department_and_status.len(), 1);

  let checked_out_only = s
    .search_visits(&VisitQuery {
      status: Some(VisitStatus::CheckedOut),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(checked_out_only.is_empty());

  let by_proof = s
    .search_visits(&VisitQuery {
      id_proof_number: Some("P1234567".into()),
      employee_code: Some("E100".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_proof[0].visit.visit_id, reg.visit.visit_id);
}

// ─── Directory invariants ────────────────────────────────────────────────────

#[tokio::test]
async fn department_with_employees_cannot_be_deleted() {
  let s = store().await;
  let (department_id, employee_id) = seed_directory(&s).await;

  let err = s.delete_department(department_id).await.unwrap_err();
  assert_eq!(core_err(&err), &CoreError::DepartmentNotEmpty(department_id));

  s.delete_employee(employee_id).await.unwrap();
  s.delete_department(department_id).await.unwrap();
  assert!(s.get_department(department_id).await.unwrap().is_none());
}

#[tokio::test]
async fn employee_with_history_survives_as_inactive() {
  let s = store().await;
  let (_, employee_id) = seed_directory(&s).await;
  s.register_visit(registration("E100")).await.unwrap();

  // Hard delete is refused while visit history references the employee.
  let err = s.delete_employee(employee_id).await.unwrap_err();
  assert_eq!(core_err(&err), &CoreError::EmployeeHasVisits(employee_id));

  // Soft delete works and stops new registrations.
  s.deactivate_employee(employee_id).await.unwrap();
  assert!(
    s.find_active_employee_by_code("E100".into())
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn duplicate_employee_code_is_a_conflict() {
  let s = store().await;
  let (department_id, _) = seed_directory(&s).await;

  let err = s
    .add_employee(NewEmployee {
      code:          "E100".into(),
      name:          "Someone Else".into(),
      email:         None,
      phone:         None,
      position:      None,
      department_id,
    })
    .await
    .unwrap_err();
  assert!(matches!(core_err(&err), CoreError::Conflict(_)));
}

#[tokio::test]
async fn list_employees_filters_by_department() {
  let s = store().await;
  let (department_id, _) = seed_directory(&s).await;
  let other = s
    .add_department(NewDepartment {
      name:           "Finance".into(),
      location:       None,
      contact_person: None,
      contact_phone:  None,
    })
    .await
    .unwrap();
  s.add_employee(NewEmployee {
    code:          "F200".into(),
    name:          "Noor Haddad".into(),
    email:         None,
    phone:         None,
    position:      None,
    department_id: other.department_id,
  })
  .await
  .unwrap();

  assert_eq!(s.list_employees(None).await.unwrap().len(), 2);
  let engineering = s.list_employees(Some(department_id)).await.unwrap();
  assert_eq!(engineering.len(), 1);
  assert_eq!(engineering[0].code, "E100");
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_usernames_are_unique() {
  let s = store().await;

  let input = NewStaff {
    role:          StaffRole::Admin,
    username:      "root".into(),
    password_hash: "$argon2id$stub".into(),
    full_name:     "Root Admin".into(),
  };
  s.add_staff(input.clone()).await.unwrap();
  let err = s.add_staff(input).await.unwrap_err();
  assert!(matches!(core_err(&err), CoreError::Conflict(_)));

  let found = s.find_staff_by_username("root".into()).await.unwrap();
  assert_eq!(found.unwrap().role, StaffRole::Admin);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_track_lifecycle_progress() {
  let s = store().await;
  seed_directory(&s).await;

  let a = s.register_visit(registration("E100")).await.unwrap();
  let b = s.register_visit(registration("E100")).await.unwrap();
  s.register_visit(registration("E100")).await.unwrap();

  s.check_in(a.visit.visit_id, a.visit.token.clone(), None)
    .await
    .unwrap();
  s.check_in(b.visit.visit_id, b.visit.token.clone(), None)
    .await
    .unwrap();
  s.check_out(b.visit.visit_id).await.unwrap();

  let today = chrono::Utc::now().date_naive();

  let daily = s.daily_report(today).await.unwrap();
  assert_eq!(daily.total_visits, 3);
  assert_eq!(daily.checkins, 1);
  assert_eq!(daily.checkouts, 1);

  use chrono::Datelike as _;
  let monthly = s.monthly_report(today.year(), today.month()).await.unwrap();
  assert_eq!(monthly.len(), 1);
  assert_eq!(monthly[0].date, today);
  assert_eq!(monthly[0].total_visits, 3);

  let stats = s.statistics().await.unwrap();
  assert_eq!(stats.totals.total, 3);
  assert_eq!(stats.totals.pending, 1);
  assert_eq!(stats.totals.checked_in, 1);
  assert_eq!(stats.totals.checked_out, 1);
  assert_eq!(stats.by_department.len(), 1);
  assert_eq!(stats.by_department[0].department, "Engineering");
  assert_eq!(stats.by_department[0].visit_count, 2);

  let shares = s.department_shares().await.unwrap();
  assert_eq!(shares.len(), 1);
  assert_eq!(shares[0].visit_count, 3);
  assert!((shares[0].share_percent - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn monthly_report_rejects_invalid_month() {
  let s = store().await;
  let err = s.monthly_report(2026, 13).await.unwrap_err();
  assert!(matches!(core_err(&err), CoreError::Validation(_)));
}

#[tokio::test]
async fn top_visitors_rank_repeat_visitors_by_person() {
  let s = store().await;
  seed_directory(&s).await;

  // Asha registers twice (two visitor rows, same person); Ravi once.
  let first = s
    .register_visit(registration_for("Asha", Some("asha@example.com")))
    .await
    .unwrap();
  s.register_visit(registration_for("Asha", Some("asha@example.com")))
    .await
    .unwrap();
  s.register_visit(registration_for("Ravi", None)).await.unwrap();

  s.check_in(first.visit.visit_id, first.visit.token.clone(), None)
    .await
    .unwrap();

  let top = s.top_visitors(5).await.unwrap();
  assert_eq!(top.len(), 2);
  assert_eq!(top[0].name, "Asha");
  assert_eq!(top[0].visit_count, 2);
  assert!(top[0].last_visit.is_some());
  assert_eq!(top[1].name, "Ravi");
  assert_eq!(top[1].visit_count, 1);
  assert!(top[1].last_visit.is_none());

  let top = s.top_visitors(1).await.unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].name, "Asha");
}

#[tokio::test]
async fn visitor_summaries_cover_only_visits_past_pending() {
  let s = store().await;
  seed_directory(&s).await;

  let sales = s
    .add_department(NewDepartment {
      name:           "Sales".into(),
      location:       None,
      contact_person: None,
      contact_phone:  None,
    })
    .await
    .unwrap();
  s.add_employee(NewEmployee {
    code:          "E200".into(),
    name:          "Mark Lee".into(),
    email:         None,
    phone:         None,
    position:      None,
    department_id: sales.department_id,
  })
  .await
  .unwrap();

  // Asha completes a visit in Engineering and checks in with Sales; a third
  // registration stays pending and must not count. Ravi never gets past the
  // gate at all.
  let a = s
    .register_visit(registration_for("Asha", Some("asha@example.com")))
    .await
    .unwrap();
  s.check_in(a.visit.visit_id, a.visit.token.clone(), None)
    .await
    .unwrap();
  s.check_out(a.visit.visit_id).await.unwrap();

  let mut to_sales = registration_for("Asha", Some("asha@example.com"));
  to_sales.employee_code = "E200".into();
  let b = s.register_visit(to_sales).await.unwrap();
  s.check_in(b.visit.visit_id, b.visit.token.clone(), None)
    .await
    .unwrap();

  s.register_visit(registration_for("Asha", Some("asha@example.com")))
    .await
    .unwrap();
  s.register_visit(registration_for("Ravi", None)).await.unwrap();

  let summaries =
    s.visitor_summaries(&VisitorSummaryQuery::default()).await.unwrap();
  assert_eq!(summaries.len(), 1);
  assert_eq!(summaries[0].name, "Asha");
  assert_eq!(summaries[0].total_visits, 2);
  assert_eq!(summaries[0].departments_visited, ["Engineering", "Sales"]);
  assert!(summaries[0].first_visit <= summaries[0].last_visit);

  let filtered = s
    .visitor_summaries(&VisitorSummaryQuery {
      name:  Some("Rav".into()),
      email: None,
    })
    .await
    .unwrap();
  assert!(filtered.is_empty());
}

#[tokio::test]
async fn visitor_history_lists_newest_first() {
  let s = store().await;
  seed_directory(&s).await;

  s.register_visit(registration_for("Asha", None)).await.unwrap();
  s.register_visit(registration_for("Ravi", None)).await.unwrap();

  let history = s.visitor_history().await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].name, "Ravi");
  assert_eq!(history[1].name, "Asha");
}

// ─── Error surface ───────────────────────────────────────────────────────────

#[tokio::test]
async fn busy_errors_are_marked_retryable() {
  let busy = Error::Busy("database is locked".into());
  assert!(busy.is_retryable());
  let core: Error = CoreError::InvalidToken.into();
  assert!(!core.is_retryable());
}

#[tokio::test]
async fn corrupt_status_row_is_a_decode_error() {
  let s = store().await;
  seed_directory(&s).await;
  let reg = s.register_visit(registration("E100")).await.unwrap();

  // Write a discriminant no enum variant matches, bypassing the store API.
  let id = reg.visit.visit_id.to_string();
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE visits SET status = 'archived' WHERE visit_id = ?1",
        rusqlite::params![id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.get_visit(reg.visit.visit_id).await.unwrap_err();
  assert!(matches!(err, Error::Decode(_)));
  assert!(err.to_string().starts_with("corrupt row"));
}

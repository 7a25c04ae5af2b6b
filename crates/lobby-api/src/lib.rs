//! JSON REST API for Lobby.
//!
//! Exposes an axum [`Router`] backed by any [`lobby_core::store::VisitStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! Visitor self-registration, token verification, and the directory listings
//! are public (they back the kiosk form). Lifecycle transitions require a
//! staff session; directory mutation and reports require the admin role.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lobby_api::api_router(state))
//! ```

pub mod directory;
pub mod error;
pub mod reports;
pub mod session;
pub mod staff;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use lobby_core::{error::StoreError, store::VisitStore};

pub use error::ApiError;
pub use session::SessionKeys;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionKeys>,
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`s.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      sessions: self.sessions.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: VisitStore + Send + Sync + 'static,
  S::Error: StoreError + Send + Sync + 'static,
{
  Router::new()
    // Visit lifecycle
    .route("/visits/register", post(visits::register::<S>))
    .route("/visits/verify", post(visits::verify::<S>))
    .route("/visits/today", get(visits::today::<S>))
    .route("/visits/search", get(visits::search::<S>))
    .route("/visits/{id}", get(visits::get_one::<S>))
    .route("/visits/{id}/check-in", post(visits::check_in::<S>))
    .route("/visits/{id}/check-out", post(visits::check_out::<S>))
    .route("/visitors/history", get(visits::history::<S>))
    // Directory
    .route(
      "/departments",
      get(directory::list_departments::<S>)
        .post(directory::create_department::<S>),
    )
    .route(
      "/departments/{id}",
      get(directory::get_department::<S>)
        .delete(directory::delete_department::<S>),
    )
    .route(
      "/employees",
      get(directory::list_employees::<S>).post(directory::create_employee::<S>),
    )
    .route("/employees/{id}", delete(directory::delete_employee::<S>))
    .route(
      "/employees/{id}/deactivate",
      post(directory::deactivate_employee::<S>),
    )
    // Staff auth
    .route("/auth/login", post(staff::login::<S>))
    // Reports
    .route("/reports/daily", get(reports::daily::<S>))
    .route("/reports/monthly", get(reports::monthly::<S>))
    .route("/reports/statistics", get(reports::statistics::<S>))
    .route(
      "/reports/department-shares",
      get(reports::department_shares::<S>),
    )
    .route("/reports/top-visitors", get(reports::top_visitors::<S>))
    .route(
      "/reports/visitor-summaries",
      get(reports::visitor_summaries::<S>),
    )
    .with_state(state)
}
